use crate::models::{Button, UserSummary, UserView};
use std::fmt::Write;

pub fn render_home(users: &[UserSummary]) -> String {
    let mut cards = String::new();
    for user in users {
        let _ = write!(
            cards,
            r#"<a class="card" href="/{id}"><span class="label">{name}</span><span class="value">{counter}</span></a>"#,
            id = escape(&user.user),
            name = escape(&user.display_name),
            counter = user.counter,
        );
    }
    page("Tally Board", &fill(HOME_BODY, &[("CARDS", cards.as_str())]))
}

pub fn render_user(view: &UserView) -> String {
    let user = escape(&view.user);
    let rows = if view.recent_log.is_empty() {
        r#"<tr><td colspan="3" class="empty">No changes yet</td></tr>"#.to_string()
    } else {
        view.recent_log
            .iter()
            .map(|entry| {
                format!(
                    "<tr><td>{}</td><td class=\"change\">{}</td><td>{}</td></tr>",
                    escape(&entry.date),
                    escape(&entry.change),
                    escape(entry.annotation.text()),
                )
            })
            .collect()
    };

    let name = escape(&view.display_name);
    let body = fill(
        USER_BODY,
        &[
            ("NAME", name.as_str()),
            ("COUNTER", view.counter.to_string().as_str()),
            ("USER", user.as_str()),
            ("BUTTONS", render_buttons(&view.user, &view.buttons).as_str()),
            ("USER_BUTTONS", render_buttons(&view.user, &view.user_buttons).as_str()),
            ("LOG_ROWS", rows.as_str()),
        ],
    );
    page(&name, &body)
}

/// Expands `{{KEY}}` placeholders in one pass over the template, so text
/// coming from the documents is never scanned for placeholders itself.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let key = &after[..end];
        match values.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n  <meta charset=\"UTF-8\" />\n  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\" />\n  <title>{title}</title>\n  <style>{STYLE}  </style>\n</head>\n<body>\n  {body}\n</body>\n</html>\n"
    )
}

fn render_buttons(user: &str, buttons: &[Button]) -> String {
    let user = escape(user);
    let mut out = String::new();
    for button in buttons {
        let label = escape(&button.label);
        // increment_by only takes non-negative amounts
        if button.amount >= 0 {
            let _ = write!(
                out,
                r#"<form method="post" action="/{user}/increment_by/{amount}"><input type="hidden" name="button_label" value="{label}" /><button class="btn-add" type="submit">{label} (+{amount})</button></form>"#,
                amount = button.amount,
            );
        } else {
            let _ = write!(
                out,
                r#"<form method="post" action="/{user}/decrement"><input type="hidden" name="amount" value="{amount}" /><input type="hidden" name="reason" value="{label}" /><button class="btn-sub" type="submit">{label} ({signed})</button></form>"#,
                amount = button.amount.unsigned_abs(),
                signed = button.amount,
            );
        }
    }
    out
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const STYLE: &str = r#"
    :root {
      --bg-1: #f8f3e6;
      --bg-2: #f5d3a7;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.86);
    }

    * { box-sizing: border-box; }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(135deg, var(--bg-1), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(760px, 100%);
      background: var(--card);
      border-radius: 28px;
      box-shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
      padding: 36px;
      display: grid;
      gap: 24px;
    }

    h1 { font-family: Georgia, serif; margin: 0; }
    a { color: var(--accent-2); }

    .grid {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(150px, 1fr));
      gap: 14px;
    }

    .card {
      background: white;
      border-radius: 18px;
      padding: 18px;
      border: 1px solid rgba(47, 72, 88, 0.08);
      display: grid;
      gap: 8px;
      text-decoration: none;
      color: inherit;
    }

    .label {
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #8b857d;
    }

    .value { font-size: 2.4rem; font-weight: 600; color: var(--accent); }

    form.change { display: flex; flex-wrap: wrap; gap: 10px; }
    input[type="number"], input[type="text"] {
      padding: 10px 12px;
      border-radius: 12px;
      border: 1px solid rgba(47, 72, 88, 0.2);
      font: inherit;
    }

    .buttons { display: flex; flex-wrap: wrap; gap: 10px; }

    button {
      border: none;
      border-radius: 14px;
      padding: 10px 16px;
      font: inherit;
      cursor: pointer;
      color: white;
    }

    .btn-add { background: var(--accent-2); }
    .btn-sub { background: var(--accent); }

    table { width: 100%; border-collapse: collapse; }
    td, th { text-align: left; padding: 8px; border-bottom: 1px solid rgba(47, 72, 88, 0.08); }
    td.change { font-weight: 600; }
    td.empty { color: #8b857d; }
"#;

const HOME_BODY: &str = r#"<main class="app">
    <h1>Tally Board</h1>
    <section class="grid">{{CARDS}}</section>
  </main>"#;

const USER_BODY: &str = r#"<main class="app">
    <header>
      <a href="/">&larr; All counters</a>
      <h1>{{NAME}}</h1>
    </header>
    <section class="card">
      <span class="label">Counter</span>
      <span id="counter" class="value">{{COUNTER}}</span>
    </section>
    <section>
      <form class="change" method="post">
        <input type="number" name="amount" value="1" />
        <input type="text" name="reason" placeholder="Reason" />
        <button class="btn-add" type="submit" formaction="/{{USER}}/increment">Add</button>
        <button class="btn-sub" type="submit" formaction="/{{USER}}/decrement">Subtract</button>
      </form>
    </section>
    <section class="buttons">{{BUTTONS}}</section>
    <section class="buttons">{{USER_BUTTONS}}</section>
    <section>
      <table>
        <thead><tr><th>Date</th><th>Change</th><th>Note</th></tr></thead>
        <tbody>{{LOG_ROWS}}</tbody>
      </table>
    </section>
  </main>"#;
