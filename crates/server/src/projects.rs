//! Charity project API endpoints

use api_types::project::{ProjectNew, ProjectUpdate, ProjectView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{Project, User};

use crate::{
    ServerError,
    server::{ServerState, require_superuser},
};

fn project_view(project: Project) -> ProjectView {
    ProjectView {
        id: project.id,
        name: project.name,
        description: project.description,
        full_amount: project.funding.target_amount,
        invested_amount: project.funding.invested_amount,
        fully_invested: project.funding.is_closed,
        create_date: project.funding.created_at,
        close_date: project.funding.closed_at,
    }
}

/// Handle requests for listing every project. No authentication needed.
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<ProjectView>>, ServerError> {
    let projects = state.engine.projects().await?;
    Ok(Json(projects.into_iter().map(project_view).collect()))
}

/// Handle requests for creating a project
pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<ProjectNew>,
) -> Result<(StatusCode, Json<ProjectView>), ServerError> {
    require_superuser(&user)?;

    let project = state
        .engine
        .new_project(engine::ProjectNew::new(
            payload.name,
            payload.description,
            payload.full_amount,
        ))
        .await?;

    Ok((StatusCode::CREATED, Json(project_view(project))))
}

pub async fn update(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ProjectUpdate>,
) -> Result<Json<ProjectView>, ServerError> {
    require_superuser(&user)?;

    let mut cmd = engine::ProjectUpdate::new();
    if let Some(name) = payload.name {
        cmd = cmd.name(name);
    }
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }
    if let Some(full_amount) = payload.full_amount {
        cmd = cmd.target_amount(full_amount);
    }
    if cmd.is_empty() {
        return Err(ServerError::Generic(
            "name, description or full_amount required".to_string(),
        ));
    }

    let project = state.engine.update_project(id, cmd).await?;
    Ok(Json(project_view(project)))
}

pub async fn remove(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<Json<ProjectView>, ServerError> {
    require_superuser(&user)?;

    let project = state.engine.remove_project(id).await?;
    Ok(Json(project_view(project)))
}
