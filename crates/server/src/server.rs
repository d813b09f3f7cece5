use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post, put},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use std::sync::Arc;

use tokio::{net::TcpListener, sync::RwLock};

use crate::{backup, exports, history, members, payments, settings, statistics, years};
use ledger::Ledger;

/// Shared state handed to every handler. The ledger sits behind a
/// read/write lock so mutations are serialized within the process.
#[derive(Clone)]
pub struct ServerState {
    pub ledger: Arc<RwLock<Ledger>>,
    pub admin_password: Arc<String>,
}

impl ServerState {
    pub fn new(ledger: Ledger, admin_password: String) -> Self {
        Self {
            ledger: Arc::new(RwLock::new(ledger)),
            admin_password: Arc::new(admin_password),
        }
    }
}

/// Bearer-token gate for the mutating routes. Anything other than an
/// exact match of the configured password is a 401.
async fn admin_auth(
    auth_header: Option<TypedHeader<Authorization<Bearer>>>,
    State(state): State<ServerState>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(header) = auth_header else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    if header.token() != state.admin_password.as_str() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(next.run(request).await)
}

pub fn router(state: ServerState) -> Router {
    let admin = Router::new()
        .route("/years", post(years::create))
        .route("/years/{year}/copy_members", post(years::copy_members))
        .route("/years/{year}/members", post(members::add))
        .route("/years/{year}/members/{name}", delete(members::remove))
        .route("/years/{year}/payments", put(payments::set))
        .route("/years/{year}/payments/bulk", post(payments::bulk))
        .route("/years/{year}/settings", put(settings::update))
        .route("/restore", post(backup::restore))
        .route_layer(middleware::from_fn_with_state(state.clone(), admin_auth));

    Router::new()
        .route("/years", get(years::list))
        .route("/years/{year}", get(years::view))
        .route("/years/{year}/summary", get(statistics::summary))
        .route("/years/{year}/totals", get(statistics::totals))
        .route("/years/{year}/months", get(statistics::monthly))
        .route("/years/{year}/unpaid", get(statistics::unpaid))
        .route("/years/{year}/history", get(history::list))
        .route("/years/{year}/export", get(exports::year_report))
        .route("/years/{year}/history/export", get(exports::history_report))
        .route("/backup", get(backup::download))
        .merge(admin)
        .with_state(state)
}

pub async fn run(ledger: Ledger, admin_password: String) {
    let listener = match TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };

    if let Err(err) = run_with_listener(ledger, admin_password, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    ledger: Ledger,
    admin_password: String,
    listener: TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState::new(ledger, admin_password);
    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    ledger: Ledger,
    admin_password: String,
    listener: TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(ledger, admin_password, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
