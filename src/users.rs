/// A tracked user. The set is fixed at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct User {
    pub id: &'static str,
    pub display_name: &'static str,
}

pub const USERS: &[User] = &[
    User { id: "noa", display_name: "Noa" },
    User { id: "milo", display_name: "Milo" },
    User { id: "balder", display_name: "Balder" },
    User { id: "lauge", display_name: "Lauge" },
];

pub fn find_user(id: &str) -> Option<&'static User> {
    USERS.iter().find(|user| user.id == id)
}
