use crate::models::{Annotation, ChangeOutcome, LogEntry, UserSummary, UserView};
use crate::storage::{JsonStore, StoreError};
use crate::users::{USERS, find_user};
use chrono::{Local, NaiveDate};
use thiserror::Error;
use tracing::info;

/// Number of log records shown on a user page.
pub const RECENT_LOG_LEN: usize = 20;

#[derive(Debug, Error)]
pub enum TallyError {
    #[error("unknown user: {0}")]
    UnknownUser(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub async fn apply_change(
    store: &JsonStore,
    user: &str,
    delta: i64,
    annotation: Annotation,
) -> Result<ChangeOutcome, TallyError> {
    apply_change_on(store, user, delta, annotation, Local::now().date_naive()).await
}

/// Adds `delta` to the user's counter and appends one record to their log.
///
/// The log is written before the counters. The two writes are independent,
/// so a crash between them leaves the documents out of step.
pub async fn apply_change_on(
    store: &JsonStore,
    user: &str,
    delta: i64,
    annotation: Annotation,
    today: NaiveDate,
) -> Result<ChangeOutcome, TallyError> {
    let user = find_user(user).ok_or_else(|| TallyError::UnknownUser(user.to_string()))?;
    let _guard = store.lock_writes().await;

    let mut counters = store.read_counters().await?;
    let counter = counters.entry(user.id.to_string()).or_insert(0);
    let previous = *counter;
    *counter = previous.saturating_add(delta);
    let value = *counter;
    // differs from `delta` only when the counter saturated
    let applied = value - previous;

    let entry = LogEntry {
        date: date_label(today),
        change: format!("{applied:+}"),
        annotation,
    };
    let mut log = store.read_log(user.id).await?;
    log.push(entry.clone());

    store.write_log(user.id, &log).await?;
    store.write_counters(&counters).await?;

    info!(user = user.id, delta = applied, counter = value, "counter changed");

    Ok(ChangeOutcome {
        user: user.id.to_string(),
        counter: value,
        entry,
    })
}

pub async fn user_view(store: &JsonStore, user: &str) -> Result<UserView, TallyError> {
    let user = find_user(user).ok_or_else(|| TallyError::UnknownUser(user.to_string()))?;

    let counters = store.read_counters().await?;
    let log = store.read_log(user.id).await?;
    let buttons = store.read_buttons().await?;
    let user_buttons = store.read_user_buttons(user.id).await?;

    Ok(UserView {
        user: user.id.to_string(),
        display_name: user.display_name.to_string(),
        counter: counters.get(user.id).copied().unwrap_or(0),
        recent_log: recent_newest_first(&log),
        buttons,
        user_buttons,
    })
}

pub async fn summaries(store: &JsonStore) -> Result<Vec<UserSummary>, TallyError> {
    let counters = store.read_counters().await?;
    Ok(USERS
        .iter()
        .map(|user| UserSummary {
            user: user.id.to_string(),
            display_name: user.display_name.to_string(),
            counter: counters.get(user.id).copied().unwrap_or(0),
        })
        .collect())
}

fn recent_newest_first(log: &[LogEntry]) -> Vec<LogEntry> {
    let start = log.len().saturating_sub(RECENT_LOG_LEN);
    log[start..].iter().rev().cloned().collect()
}

fn date_label(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::tests::scratch_dir;
    use tokio::fs;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    async fn fresh_store(tag: &str) -> (JsonStore, std::path::PathBuf) {
        let dir = scratch_dir(tag);
        let store = JsonStore::new(dir.join("data"), dir.join("static"));
        store.bootstrap().await.unwrap();
        (store, dir)
    }

    #[tokio::test]
    async fn increment_then_decrement_scenario() {
        let (store, dir) = fresh_store("scenario").await;

        let outcome = apply_change_on(&store, "noa", 5, Annotation::Reason("test".into()), day())
            .await
            .unwrap();
        assert_eq!(outcome.counter, 5);
        assert_eq!(
            store.read_log("noa").await.unwrap(),
            vec![LogEntry {
                date: "17-10-2026".into(),
                change: "+5".into(),
                annotation: Annotation::Reason("test".into()),
            }]
        );

        apply_change_on(&store, "noa", -2, Annotation::Reason(String::new()), day())
            .await
            .unwrap();
        assert_eq!(store.read_counters().await.unwrap().get("noa"), Some(&3));
        let log = store.read_log("noa").await.unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[1].change, "-2");
        assert_eq!(log[1].annotation, Annotation::Reason(String::new()));

        let _ = fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn opposite_changes_restore_counter() {
        let (store, dir) = fresh_store("restore").await;
        apply_change_on(&store, "milo", 11, Annotation::Reason("seed".into()), day())
            .await
            .unwrap();

        for amount in [1, 7, 250, -40] {
            let before = store.read_counters().await.unwrap()["milo"];
            let log_len = store.read_log("milo").await.unwrap().len();

            apply_change_on(&store, "milo", amount, Annotation::Reason(String::new()), day())
                .await
                .unwrap();
            let outcome =
                apply_change_on(&store, "milo", -amount, Annotation::Reason(String::new()), day())
                    .await
                    .unwrap();

            assert_eq!(outcome.counter, before);
            assert_eq!(store.read_log("milo").await.unwrap().len(), log_len + 2);
            assert_eq!(outcome.entry.change, format!("{:+}", -amount));
        }

        let _ = fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn unknown_user_leaves_documents_untouched() {
        let (store, dir) = fresh_store("unknown").await;
        apply_change_on(&store, "balder", 3, Annotation::Reason("x".into()), day())
            .await
            .unwrap();
        let counters_before = fs::read(store.counters_path()).await.unwrap();
        let log_before = fs::read(store.log_path("balder")).await.unwrap();

        let err = apply_change_on(&store, "nobody", 1, Annotation::Reason(String::new()), day())
            .await
            .unwrap_err();

        assert!(matches!(err, TallyError::UnknownUser(ref name) if name == "nobody"));
        assert_eq!(fs::read(store.counters_path()).await.unwrap(), counters_before);
        assert_eq!(fs::read(store.log_path("balder")).await.unwrap(), log_before);
        assert!(!fs::try_exists(store.log_path("nobody")).await.unwrap());

        let _ = fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn view_shows_latest_twenty_newest_first() {
        let (store, dir) = fresh_store("window").await;
        for i in 1..=25 {
            apply_change_on(&store, "lauge", 1, Annotation::Reason(format!("r{i}")), day())
                .await
                .unwrap();
        }

        let view = user_view(&store, "lauge").await.unwrap();
        assert_eq!(view.counter, 25);
        assert_eq!(view.recent_log.len(), RECENT_LOG_LEN);
        let reasons: Vec<&str> = view.recent_log.iter().map(|e| e.annotation.text()).collect();
        let expected: Vec<String> = (6..=25).rev().map(|i| format!("r{i}")).collect();
        assert_eq!(reasons, expected);

        let _ = fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn button_change_records_label() {
        let (store, dir) = fresh_store("button").await;

        let outcome = apply_change_on(
            &store,
            "noa",
            4,
            Annotation::ButtonLabel("Chores".into()),
            day(),
        )
        .await
        .unwrap();

        assert_eq!(outcome.entry.change, "+4");
        let raw = fs::read_to_string(store.log_path("noa")).await.unwrap();
        assert!(raw.contains("\"button_label\": \"Chores\""));

        let _ = fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn saturated_counter_logs_the_applied_delta() {
        let (store, dir) = fresh_store("saturate").await;
        let mut counters = store.read_counters().await.unwrap();
        counters.insert("noa".into(), i64::MAX - 1);
        store.write_counters(&counters).await.unwrap();

        let outcome = apply_change_on(&store, "noa", 5, Annotation::Reason(String::new()), day())
            .await
            .unwrap();
        assert_eq!(outcome.counter, i64::MAX);
        assert_eq!(outcome.entry.change, "+1");

        let outcome = apply_change_on(&store, "noa", 3, Annotation::Reason(String::new()), day())
            .await
            .unwrap();
        assert_eq!(outcome.counter, i64::MAX);
        assert_eq!(outcome.entry.change, "+0");

        let log = store.read_log("noa").await.unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].change, "+1");

        let _ = fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn missing_counter_key_reads_as_zero() {
        let dir = scratch_dir("missing_key");
        let store = JsonStore::new(dir.join("data"), dir.join("static"));
        fs::create_dir_all(store.data_dir()).await.unwrap();
        fs::write(store.counters_path(), br#"{"noa": 2}"#).await.unwrap();

        assert_eq!(user_view(&store, "milo").await.unwrap().counter, 0);
        let outcome = apply_change_on(&store, "milo", -3, Annotation::Reason(String::new()), day())
            .await
            .unwrap();
        assert_eq!(outcome.counter, -3);
        assert_eq!(store.read_counters().await.unwrap().get("noa"), Some(&2));

        let summaries = summaries(&store).await.unwrap();
        assert_eq!(summaries.len(), USERS.len());

        let _ = fs::remove_dir_all(&dir).await;
    }
}
