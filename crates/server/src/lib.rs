use axum::{
    Json,
    http::{StatusCode, header},
    response::IntoResponse,
};
use engine::EngineError;
use serde::Serialize;
use sheets::SheetsError;

pub use server::{Reporting, ServerState, router, run_with_listener, spawn_with_listener};

mod donations;
mod projects;
mod reports;
mod server;

pub mod types {
    pub mod project {
        pub use api_types::project::{ProjectNew, ProjectUpdate, ProjectView};
    }

    pub mod donation {
        pub use api_types::donation::{DonationFullView, DonationNew, DonationView};
    }

    pub mod report {
        pub use api_types::report::ReportCreated;
    }
}

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    Report(SheetsError),
    Unauthorized,
    Forbidden(String),
    Unavailable(String),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::Closed(_)
        | EngineError::AlreadyInvested(_)
        | EngineError::InvalidAmount(_)
        | EngineError::InvalidName(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => {
            tracing::warn!("rejected request: {other}");
            other.to_string()
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::Report(err) => {
                tracing::error!("report export failed: {err}");
                (StatusCode::BAD_GATEWAY, err.to_string())
            }
            ServerError::Unauthorized => {
                return (
                    StatusCode::UNAUTHORIZED,
                    [(header::WWW_AUTHENTICATE, "Basic realm=\"qrkot\"")],
                    Json(Error {
                        error: "invalid credentials".to_string(),
                    }),
                )
                    .into_response();
            }
            ServerError::Forbidden(err) => (StatusCode::FORBIDDEN, err),
            ServerError::Unavailable(err) => (StatusCode::SERVICE_UNAVAILABLE, err),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<SheetsError> for ServerError {
    fn from(value: SheetsError) -> Self {
        Self::Report(value)
    }
}
