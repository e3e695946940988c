mod extract;
pub mod handlers;
pub mod types;

pub use extract::AuthenticatedUser;
pub use handlers::AppState;

use crate::{
    Result,
    chat::ChatSession,
    classifier::{CandleClassifier, SkinAnalyzer},
    config::{Config, ServerConfig},
    history::HistoryStorage,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{info, warn};

/// API routes plus the frontend bundle as the fallback for everything else.
pub fn router(state: AppState, server: &ServerConfig) -> Router {
    Router::new()
        .route("/api/login", post(handlers::login))
        .route("/api/signup", post(handlers::signup))
        .route("/api/logout", get(handlers::logout))
        .route("/api/chat", post(handlers::chat))
        .route("/chat", post(handlers::chat))
        .route("/api/analyze", post(handlers::analyze))
        .route("/api/profile", get(handlers::profile))
        .route("/api/analyses", get(handlers::analyses))
        .route(
            "/api/appointments",
            get(handlers::appointments).post(handlers::book_appointment),
        )
        .layer(DefaultBodyLimit::max(server.max_upload_bytes))
        .with_state(state)
        .fallback_service(ServeDir::new(&server.static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&server.cors_origins))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

pub async fn run(config: Config) -> Result<()> {
    let history = HistoryStorage::new(&config.server.database_path).await?;

    let class_names = config.classifier.class_names.clone();
    let classifier = CandleClassifier::load(
        &config.classifier.model_path,
        config.classifier.image_size,
        class_names.len(),
    )?;
    info!(
        "Classifier loaded from {} ({} classes)",
        config.classifier.model_path,
        class_names.len()
    );
    let analyzer = SkinAnalyzer::new(Arc::new(classifier), class_names);

    let chat = ChatSession::new(config.llm.clone());

    let app = router(AppState::new(chat, analyzer, history), &config.server);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
