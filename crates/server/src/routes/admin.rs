//! Admin dashboard and status updates.
//!
//! Both handlers take [`RequireAdmin`] as their first argument, so a missing
//! admin session redirects before the path, query or form is looked at.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tower_sessions::Session;

use grievance_core::{ComplaintId, ComplaintStatus};

use super::format_timestamp;
use crate::error::AppError;
use crate::middleware::{RequireAdmin, push_flash, take_flash};
use crate::models::{ComplaintWithUser, Flash, StatusCount};
use crate::state::AppState;

/// Flash shown after a successful update.
pub const STATUS_UPDATED: &str = "Complaint status updated.";

/// Dashboard query parameters.
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub status: Option<String>,
}

/// Status update form data.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    #[serde(default)]
    pub status: String,
}

/// One dashboard table row.
pub struct DashboardRow {
    pub id: ComplaintId,
    pub username: String,
    pub text: String,
    pub status: String,
    pub status_label: String,
    pub created_at: String,
}

impl From<ComplaintWithUser> for DashboardRow {
    fn from(c: ComplaintWithUser) -> Self {
        Self {
            status_label: display_status(&c.status),
            status: c.status.as_str().to_owned(),
            id: c.id,
            username: c.username,
            text: c.text,
            created_at: format_timestamp(&c.created_at),
        }
    }
}

/// One entry in the per-status summary.
pub struct StatusSummary {
    pub status: String,
    pub label: String,
    pub count: i64,
}

impl From<StatusCount> for StatusSummary {
    fn from(c: StatusCount) -> Self {
        Self {
            label: display_status(&c.status),
            status: c.status.as_str().to_owned(),
            count: c.count,
        }
    }
}

/// Well-known statuses get a friendly label; anything else is shown verbatim.
pub(crate) fn display_status(status: &ComplaintStatus) -> String {
    if status.is_well_known() {
        status.label()
    } else {
        status.as_str().to_owned()
    }
}

/// Admin dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "admin_dashboard.html")]
pub struct DashboardTemplate {
    pub flash: Option<Flash>,
    pub admin_username: String,
    pub filter: Option<String>,
    pub summary: Vec<StatusSummary>,
    pub total: i64,
    pub rows: Vec<DashboardRow>,
    pub statuses: Vec<&'static str>,
}

/// Display every complaint with its submitter.
///
/// `?status=` restricts the table to one status; an empty or invalid value
/// shows everything.
///
/// # Errors
///
/// Returns `AppError::Store` if the store fails.
pub async fn dashboard(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<DashboardQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filter = query
        .status
        .as_deref()
        .and_then(|s| ComplaintStatus::parse(s).ok());

    let complaints = state.store().list_complaints(filter.as_ref()).await?;
    let counts = state.store().count_by_status().await?;

    Ok(DashboardTemplate {
        flash: take_flash(&session).await,
        admin_username: admin.username,
        filter: filter.map(|s| s.as_str().to_owned()),
        total: counts.iter().map(|c| c.count).sum(),
        summary: counts.into_iter().map(Into::into).collect(),
        rows: complaints.into_iter().map(Into::into).collect(),
        statuses: ComplaintStatus::WELL_KNOWN.to_vec(),
    })
}

/// Change one complaint's status and return to the dashboard.
///
/// A non-numeric or non-positive ID is a 404. An invalid status or an
/// unknown complaint writes nothing and redirects with an error flash.
///
/// # Errors
///
/// Returns `AppError::NotFound` for a malformed ID, `AppError::Store` if the
/// store fails.
pub async fn update_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Path(raw_id): Path<String>,
    Form(form): Form<StatusForm>,
) -> Result<Redirect, AppError> {
    let id = ComplaintId::parse_positive(&raw_id)
        .ok_or_else(|| AppError::NotFound(format!("complaint {raw_id}")))?;

    let status = match ComplaintStatus::parse(&form.status) {
        Ok(status) => status,
        Err(e) => {
            push_flash(&session, Flash::error(format!("Invalid status: {e}"))).await;
            return Ok(Redirect::to("/admin-dashboard"));
        }
    };

    if state.store().update_status(id, &status).await? {
        tracing::info!(admin_id = %admin.id, complaint_id = %id, %status, "complaint status updated");
        push_flash(&session, Flash::success(STATUS_UPDATED)).await;
    } else {
        push_flash(&session, Flash::error(format!("Complaint #{id} not found"))).await;
    }

    Ok(Redirect::to("/admin-dashboard"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_status_displayed_verbatim() {
        let custom = ComplaintStatus::parse("escalated_to_board").expect("valid status");
        assert_eq!(display_status(&custom), "escalated_to_board");

        let known = ComplaintStatus::parse("in_progress").expect("valid status");
        assert_eq!(display_status(&known), "In progress");
    }
}
