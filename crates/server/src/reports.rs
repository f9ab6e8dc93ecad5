//! Google Sheets report endpoint

use api_types::report::ReportCreated;
use axum::{Extension, Json, extract::State};
use chrono::Utc;
use engine::User;
use sheets::{ReportRow, ReportTemplate};

use crate::{
    ServerError,
    server::{ServerState, require_superuser},
};

/// Export the closed projects, fastest funded first, to a new spreadsheet.
pub async fn export(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<ReportCreated>, ServerError> {
    require_superuser(&user)?;
    let Some(reporting) = state.reporting.as_deref() else {
        return Err(ServerError::Unavailable(
            "google reporting is not configured".to_string(),
        ));
    };

    let rows: Vec<ReportRow> = state
        .engine
        .closed_projects_by_fundraising_time()
        .await?
        .into_iter()
        .map(|project| ReportRow::new(project.name, project.elapsed, project.description))
        .collect();
    let template = ReportTemplate::new(Utc::now(), rows.len(), reporting.locale.clone());

    let url = sheets::export_report(
        &reporting.client,
        &template,
        &rows,
        reporting.share_with.as_deref(),
    )
    .await?;
    tracing::info!("{} exported a report with {} projects", user.username, rows.len());

    Ok(Json(ReportCreated {
        url,
        projects: rows.len(),
    }))
}
