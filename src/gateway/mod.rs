pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::api_auth::{
    AuthPipeline, AuthState, CredentialRepository, InMemoryNonceStore, NonceStore,
    auth_middleware, now_ms,
};
use crate::config::AppConfig;
use crate::contract::{ContractDocument, ContractError};
use crate::controllers::Controllers;
use crate::validation::{SchemaCompilationError, SchemaRegistry};
use state::AppState;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Contract(#[from] ContractError),
    #[error(transparent)]
    Schema(#[from] SchemaCompilationError),
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Everything a router needs, built from configuration and a loaded contract.
pub struct Gateway {
    pub state: AppState,
    pub auth: AuthState,
}

impl Gateway {
    pub fn new(config: &AppConfig, document: &ContractDocument) -> Result<Self, ServerError> {
        let registry = SchemaRegistry::compile(document)?
            .with_equivalences(&config.validation.equivalent_properties);

        let nonces: Arc<dyn NonceStore> =
            Arc::new(InMemoryNonceStore::new(config.auth.nonce_retention_ms()));
        let credentials = CredentialRepository::from_config(&config.auth);
        tracing::info!(
            credentials = credentials.len(),
            default_credential = config.auth.default_credential.is_some(),
            window_ms = config.auth.timestamp_window_ms,
            "Authentication configured"
        );
        let pipeline = AuthPipeline::new(nonces, credentials, config.auth.timestamp_window_ms);

        Ok(Self {
            state: AppState::new(registry, Controllers::new()),
            auth: AuthState {
                pipeline: Arc::new(pipeline),
                max_body_bytes: config.server.max_body_bytes,
            },
        })
    }

    pub fn router(&self) -> Router {
        build_router(self.state.clone(), self.auth.clone())
    }
}

/// Build the router.
///
/// Authentication wraps the contract layer, which wraps every handler;
/// unmatched routes fall through to a plain 404.
pub fn build_router(state: AppState, auth: AuthState) -> Router {
    let accounts = "/accounts/{accountId}";
    Router::new()
        .route("/capabilities", get(handlers::get_capabilities))
        // Accounts
        .route("/accounts", get(handlers::list_accounts))
        .route(accounts, get(handlers::get_account))
        .route(&format!("{accounts}/balances"), get(handlers::get_balances))
        // Trading
        .route("/trading/books", get(handlers::list_books))
        .route("/trading/books/{id}", get(handlers::get_book))
        .route("/trading/books/{id}/asks", get(handlers::get_asks))
        .route("/trading/books/{id}/bids", get(handlers::get_bids))
        .route(
            &format!("{accounts}/trading/orders"),
            get(handlers::list_orders).post(handlers::create_order),
        )
        .route(
            &format!("{accounts}/trading/orders/{{id}}"),
            get(handlers::get_order).delete(handlers::cancel_order),
        )
        // Liquidity
        .route(
            &format!("{accounts}/liquidity/capabilities"),
            get(handlers::get_quote_capabilities),
        )
        .route(
            &format!("{accounts}/liquidity/quotes"),
            get(handlers::list_quotes).post(handlers::create_quote),
        )
        .route(
            &format!("{accounts}/liquidity/quotes/{{id}}"),
            get(handlers::get_quote),
        )
        .route(
            &format!("{accounts}/liquidity/quotes/{{id}}/execute"),
            post(handlers::execute_quote),
        )
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware::contract_middleware,
        ))
        .route_layer(from_fn_with_state(auth, auth_middleware))
        .fallback(handlers::not_found)
        .with_state(state)
}

/// Periodically drop expired nonces.
pub fn spawn_nonce_sweeper(store: Arc<dyn NonceStore>, interval_ms: u64) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_millis(interval_ms.max(1)));
        // first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let removed = store.sweep(now_ms());
            if removed > 0 {
                tracing::debug!(removed, remaining = store.len(), "Nonce sweep");
            }
        }
    })
}

/// Start the HTTP server and serve until Ctrl-C.
pub async fn run_server(config: &AppConfig) -> Result<(), ServerError> {
    let document = ContractDocument::load(&config.server.contract_path)?;
    tracing::info!(
        title = %document.title,
        version = %document.version,
        path = %config.server.contract_path.display(),
        "Contract loaded"
    );
    let gateway = Gateway::new(config, &document)?;

    let sweeper = spawn_nonce_sweeper(
        gateway.auth.pipeline.nonce_store().clone(),
        config.auth.nonce_sweep_interval_ms,
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;
    tracing::info!(%addr, "Gateway listening");

    let result = axum::serve(listener, gateway.router())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve);
    sweeper.abort();
    tracing::info!("Gateway stopped");
    result
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
