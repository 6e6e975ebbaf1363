//! Complaint lodging and tracking for logged-in complainants.
//!
//! Complaints are always attributed to the session identity; no handler
//! reads a user ID from the request.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use grievance_core::ComplaintId;

use super::{admin::display_status, format_timestamp};
use crate::error::AppError;
use crate::middleware::{RequireUser, push_flash, take_flash};
use crate::models::{Complaint, Flash};
use crate::state::AppState;

/// Flash shown after lodging.
pub const COMPLAINT_LODGED: &str = "Complaint lodged.";

/// Lodge form data.
#[derive(Debug, Deserialize)]
pub struct ComplaintForm {
    #[serde(default)]
    pub complaint_text: String,
}

/// A complaint prepared for display.
pub struct ComplaintView {
    pub id: ComplaintId,
    pub text: String,
    pub status_label: String,
    pub created_at: String,
}

impl From<Complaint> for ComplaintView {
    fn from(c: Complaint) -> Self {
        Self {
            id: c.id,
            status_label: display_status(&c.status),
            text: c.text,
            created_at: format_timestamp(&c.created_at),
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "complaints/list.html")]
pub struct ComplaintListTemplate {
    pub flash: Option<Flash>,
    pub username: String,
    pub complaints: Vec<ComplaintView>,
}

#[derive(Template, WebTemplate)]
#[template(path = "complaints/new.html")]
pub struct NewComplaintTemplate {
    pub flash: Option<Flash>,
    pub error: Option<String>,
    pub complaint_text: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "complaints/show.html")]
pub struct ComplaintTemplate {
    pub flash: Option<Flash>,
    pub complaint: ComplaintView,
}

/// List the current user's complaints.
///
/// # Errors
///
/// Returns `AppError::Store` if the store fails.
pub async fn index(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let complaints = state.store().list_user_complaints(user.id).await?;

    Ok(ComplaintListTemplate {
        flash: take_flash(&session).await,
        username: user.username,
        complaints: complaints.into_iter().map(Into::into).collect(),
    })
}

/// Display the lodge form.
pub async fn new_page(RequireUser(_user): RequireUser, session: Session) -> impl IntoResponse {
    NewComplaintTemplate {
        flash: take_flash(&session).await,
        error: None,
        complaint_text: String::new(),
    }
}

/// Lodge a complaint.
///
/// # Errors
///
/// Returns `AppError::Store` if the store fails.
pub async fn create(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ComplaintForm>,
) -> Result<Response, AppError> {
    let text = form.complaint_text.trim();
    if text.is_empty() {
        return Ok(NewComplaintTemplate {
            flash: None,
            error: Some("Complaint text is required".to_owned()),
            complaint_text: form.complaint_text,
        }
        .into_response());
    }

    let complaint = state.store().create_complaint(user.id, text).await?;
    tracing::info!(user_id = %user.id, complaint_id = %complaint.id, "complaint lodged");

    push_flash(&session, Flash::success(COMPLAINT_LODGED)).await;
    Ok(Redirect::to(&format!("/complaints/{}", complaint.id)).into_response())
}

/// Track one complaint. Other users' complaints are a 404.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the ID is malformed or the complaint is
/// not the user's, `AppError::Store` if the store fails.
pub async fn show(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    session: Session,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let not_found = || AppError::NotFound(format!("complaint {raw_id}"));
    let id = ComplaintId::parse_positive(&raw_id).ok_or_else(not_found)?;

    let complaint = state
        .store()
        .get_user_complaint(user.id, id)
        .await?
        .ok_or_else(not_found)?;

    Ok(ComplaintTemplate {
        flash: take_flash(&session).await,
        complaint: complaint.into(),
    })
}
