use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{get, patch, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use sheets::GoogleSheetsClient;

use std::sync::Arc;

use crate::{ServerError, donations, projects, reports};
use engine::{Engine, User};

/// Google Sheets export settings. Without them `POST /google/` answers 503.
#[derive(Debug)]
pub struct Reporting {
    pub client: GoogleSheetsClient,
    /// Address granted write access on every new report.
    pub share_with: Option<String>,
    pub locale: String,
}

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub reporting: Option<Arc<Reporting>>,
}

impl ServerState {
    pub fn new(engine: Engine, reporting: Option<Reporting>) -> Self {
        Self {
            engine: Arc::new(engine),
            reporting: reporting.map(Arc::new),
        }
    }
}

/// Rejects callers that are not superusers.
pub(crate) fn require_superuser(user: &User) -> Result<(), ServerError> {
    if user.is_superuser {
        return Ok(());
    }
    tracing::warn!("user {} tried an admin operation", user.username);
    Err(ServerError::Forbidden(
        "only superusers can do that".to_string(),
    ))
}

async fn auth(
    auth_header: Option<TypedHeader<Authorization<Basic>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let Some(TypedHeader(auth_header)) = auth_header else {
        return Err(ServerError::Unauthorized);
    };
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(ServerError::Unauthorized);
    }

    let Some(user) = state
        .engine
        .authenticate(auth_header.username(), auth_header.password())
        .await?
    else {
        tracing::warn!("failed login for {}", auth_header.username());
        return Err(ServerError::Unauthorized);
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

pub fn router(state: ServerState) -> Router {
    let public = Router::new().route("/charity_project/", get(projects::list));

    let private = Router::new()
        .route("/charity_project/", post(projects::create))
        .route(
            "/charity_project/{id}",
            patch(projects::update).delete(projects::remove),
        )
        .route("/donation/", get(donations::list).post(donations::create))
        .route("/donation/my", get(donations::mine))
        .route("/google/", post(reports::export))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth));

    public.merge(private).with_state(state)
}

pub async fn run_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(state, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
