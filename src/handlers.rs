use crate::errors::AppError;
use crate::models::{Annotation, ButtonForm, ChangeForm, UserView};
use crate::state::AppState;
use crate::tally::{apply_change, summaries, user_view};
use crate::ui::{render_home, render_user};
use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
    Form, Json,
};

pub async fn home(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let users = summaries(&state.store).await?;
    Ok(Html(render_home(&users)))
}

pub async fn user_page(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Result<Html<String>, AppError> {
    let view = user_view(&state.store, &user).await?;
    Ok(Html(render_user(&view)))
}

pub async fn user_json(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Result<Json<UserView>, AppError> {
    Ok(Json(user_view(&state.store, &user).await?))
}

pub async fn increment(
    State(state): State<AppState>,
    Path(user): Path<String>,
    form: Option<Form<ChangeForm>>,
) -> Result<Redirect, AppError> {
    let form = form_or_default(form);
    let amount = parse_amount(form.amount.as_deref());
    let outcome = apply_change(&state.store, &user, amount, Annotation::Reason(form.reason)).await?;
    Ok(Redirect::to(&format!("/{}", outcome.user)))
}

pub async fn decrement(
    State(state): State<AppState>,
    Path(user): Path<String>,
    form: Option<Form<ChangeForm>>,
) -> Result<Redirect, AppError> {
    let form = form_or_default(form);
    let amount = parse_amount(form.amount.as_deref());
    let outcome = apply_change(
        &state.store,
        &user,
        amount.saturating_neg(),
        Annotation::Reason(form.reason),
    )
    .await?;
    Ok(Redirect::to(&format!("/{}", outcome.user)))
}

pub async fn increment_by(
    State(state): State<AppState>,
    Path((user, amount)): Path<(String, String)>,
    form: Option<Form<ButtonForm>>,
) -> Result<Redirect, AppError> {
    let form = form_or_default(form);
    let amount = parse_path_amount(&amount).ok_or_else(AppError::not_found)?;
    let outcome = apply_change(
        &state.store,
        &user,
        amount,
        Annotation::ButtonLabel(form.button_label),
    )
    .await?;
    Ok(Redirect::to(&format!("/{}", outcome.user)))
}

/// A POST without a form body counts as an empty form.
fn form_or_default<T: Default>(form: Option<Form<T>>) -> T {
    form.map(|Form(inner)| inner).unwrap_or_default()
}

/// Form amounts fall back to 1 when absent or not an integer.
pub fn parse_amount(raw: Option<&str>) -> i64 {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .unwrap_or(1)
}

/// Button amounts come from the path and must be plain digits.
fn parse_path_amount(raw: &str) -> Option<i64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}
