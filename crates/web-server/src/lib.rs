use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use configuration::{CategoryCatalog, Settings};
use database::{DataComponents, DbRepository};
use forecaster::{ForecastError, Forecaster};
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer, ExposeHeaders},
    trace::TraceLayer,
};

pub mod error;
pub mod guard;
pub mod handlers;
pub mod schemas;
pub mod session;

pub use session::{InMemorySessionStore, SessionStore};

/// The shared application state that all handlers can access.
pub struct AppState {
    pub data: Arc<dyn DataComponents>,
    pub sessions: Arc<dyn SessionStore>,
    pub categories: CategoryCatalog,
    pub forecaster: Forecaster,
    pub max_steps: usize,
}

impl AppState {
    pub fn new(
        data: Arc<dyn DataComponents>,
        sessions: Arc<dyn SessionStore>,
        settings: &Settings,
    ) -> Result<Self, ForecastError> {
        Ok(Self {
            data,
            sessions,
            categories: settings.categories.clone(),
            forecaster: Forecaster::new(
                settings.forecast.interval_width,
                settings.forecast.max_history,
            )?,
            max_steps: settings.forecast.max_steps,
        })
    }
}

/// Builds the router with every route and the common middleware.
pub fn build_router(state: Arc<AppState>, body_limit: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any())
        .expose_headers(ExposeHeaders::any());

    Router::new()
        .route("/", get(handlers::root))
        .route("/login", post(handlers::login))
        .route("/permissions", get(handlers::permissions))
        .route("/logout", post(handlers::logout))
        .route("/secure-places", get(handlers::secure_places))
        .route("/grouped-data", post(handlers::grouped_data))
        .route("/predict", post(handlers::predict))
        .route("/new-data", post(handlers::new_data))
        .route("/register", post(handlers::register))
        .with_state(state)
        .layer(cors)
        // This middleware will automatically log information about every incoming request.
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(body_limit))
}

/// Connects to the database, applies migrations and serves the API until
/// the process is stopped. Tracing must already be initialised.
pub async fn run_server(settings: Settings) -> anyhow::Result<()> {
    let db_pool = database::connect(&settings.database).await?;
    database::run_migrations(&db_pool).await?;
    let db_repo = DbRepository::new(db_pool);

    if settings.categories.is_empty() {
        tracing::warn!("No crime categories configured; /new-data will reject every record.");
    }

    let app_state = Arc::new(AppState::new(
        Arc::new(db_repo),
        Arc::new(InMemorySessionStore::new()),
        &settings,
    )?);
    let app = build_router(app_state, settings.server.body_limit);

    let addr = settings.server.socket_addr();
    tracing::info!("Web server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
