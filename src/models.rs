use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type Counters = BTreeMap<String, i64>;

/// Free text attached to a log record. Serialized under the `reason` key for
/// form changes and `button_label` for quick-action buttons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Annotation {
    Reason(String),
    ButtonLabel(String),
}

impl Annotation {
    pub fn text(&self) -> &str {
        match self {
            Annotation::Reason(text) | Annotation::ButtonLabel(text) => text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredLogEntry")]
pub struct LogEntry {
    pub date: String,
    pub change: String,
    #[serde(flatten)]
    pub annotation: Annotation,
}

/// On-disk record shape. Hand-edited logs may carry neither annotation key;
/// those read back as an empty reason.
#[derive(Deserialize)]
struct StoredLogEntry {
    #[serde(default)]
    date: String,
    #[serde(default)]
    change: String,
    reason: Option<String>,
    button_label: Option<String>,
}

impl From<StoredLogEntry> for LogEntry {
    fn from(stored: StoredLogEntry) -> Self {
        let annotation = match (stored.reason, stored.button_label) {
            (Some(reason), _) => Annotation::Reason(reason),
            (None, Some(label)) => Annotation::ButtonLabel(label),
            (None, None) => Annotation::Reason(String::new()),
        };
        Self {
            date: stored.date,
            change: stored.change,
            annotation,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub label: String,
    pub amount: i64,
}

#[derive(Debug, Deserialize, Default)]
pub struct ChangeForm {
    pub amount: Option<String>,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct ButtonForm {
    #[serde(default)]
    pub button_label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub user: String,
    pub display_name: String,
    pub counter: i64,
    pub recent_log: Vec<LogEntry>,
    pub buttons: Vec<Button>,
    pub user_buttons: Vec<Button>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub user: String,
    pub display_name: String,
    pub counter: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChangeOutcome {
    pub user: String,
    pub counter: i64,
    pub entry: LogEntry,
}
