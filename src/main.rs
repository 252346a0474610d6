//! Biblioteca Server - Library & Course Management System
//!
//! A Rust REST API server for a community library that also runs courses.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use biblioteca_server::{api, config::AppConfig, repository::Repository, services::Services, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("biblioteca_server={},tower_http=debug", config.logging.level).into()
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Biblioteca Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(repository, config.auth.clone());

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().expect("Invalid host address"),
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Authentication & profile
        .route("/auth/register", post(api::auth::register))
        .route("/auth/login", post(api::auth::login))
        .route("/auth/me", get(api::auth::me))
        .route("/auth/password", put(api::auth::change_password))
        .route("/auth/email", put(api::auth::change_email))
        .route("/auth/phone", put(api::auth::change_phone))
        // Books (catalog)
        .route("/books", get(api::books::list_books))
        .route("/books", post(api::books::create_book))
        .route("/books/suggest", get(api::books::suggest_titles))
        .route("/books/featured", get(api::books::featured_book))
        .route("/books/genres", get(api::books::list_genres))
        .route("/books/genres", put(api::books::rename_genre))
        .route("/books/:id", get(api::books::get_book))
        .route("/books/:id", put(api::books::update_book))
        .route("/books/:id", delete(api::books::delete_book))
        .route("/books/:id/related", get(api::books::related_books))
        .route("/books/:id/download", post(api::books::record_download))
        .route("/books/:id/stats", get(api::books::book_stats))
        .route("/books/:id/reviews", get(api::feedback::book_reviews))
        .route("/books/:id/loans", get(api::loans::book_loan_history))
        // Courses
        .route("/courses", get(api::courses::list_courses))
        .route("/courses", post(api::courses::create_course))
        .route("/courses/fill-rates", get(api::courses::fill_rates))
        .route("/courses/:id", get(api::courses::get_course))
        .route("/courses/:id", put(api::courses::update_course))
        .route("/courses/:id", delete(api::courses::delete_course))
        .route("/courses/:id/views", post(api::courses::record_view))
        .route("/courses/:id/bookings", get(api::bookings::course_bookings))
        .route("/courses/:id/ratings", get(api::feedback::course_ratings))
        .route("/courses/:id/ratings", post(api::feedback::create_course_rating))
        // Members
        .route("/members", get(api::members::list_members))
        .route("/members/:id", get(api::members::get_member))
        .route("/members/:id", put(api::members::update_member))
        .route("/members/:id", delete(api::members::delete_member))
        .route("/members/:id/loans", get(api::loans::member_loans))
        .route("/members/:id/loans/history", get(api::loans::member_loan_history))
        .route("/members/:id/bookings", get(api::bookings::member_bookings))
        // Loans
        .route("/loans", get(api::loans::list_loans))
        .route("/loans", post(api::loans::checkout))
        .route("/loans/overdue", get(api::loans::overdue_loans))
        .route("/loans/expiring", get(api::loans::expiring_loans))
        .route("/loans/stats", get(api::loans::loan_stats))
        .route("/loans/alerts", get(api::loans::loan_alerts))
        .route("/loans/:id", delete(api::loans::delete_loan))
        .route("/loans/:id/extend", post(api::loans::extend_loan))
        .route("/loans/:id/terminate", post(api::loans::terminate_loan))
        // Bookings
        .route("/bookings", get(api::bookings::list_bookings))
        .route("/bookings", post(api::bookings::create_booking))
        .route("/bookings/:id/confirm", post(api::bookings::confirm_booking))
        .route("/bookings/:id/reject", post(api::bookings::reject_booking))
        // Reviews
        .route("/reviews", post(api::feedback::create_review))
        .route("/reviews/:id", put(api::feedback::update_review))
        // Statistics
        .route("/stats", get(api::stats::get_stats))
        .with_state(state.clone());

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
