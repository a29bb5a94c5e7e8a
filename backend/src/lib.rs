use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::{Redirect, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tower_http::{
    catch_panic::CatchPanicLayer, compression::CompressionLayer, services::ServeDir,
};
use tracing::trace;

pub mod booking;
pub mod config;
pub mod extract;
pub mod mailer;
pub mod pages;

use booking::{BookingApp, BookingOutcome};
use extract::BookingSubmission;

#[derive(Clone)]
pub struct AppState {
    pub booker: Arc<BookingApp>,
}

impl AppState {
    pub fn new(booker: BookingApp) -> Self {
        Self {
            booker: Arc::new(booker),
        }
    }
}

async fn handle_booking(
    State(state): State<AppState>,
    BookingSubmission(request): BookingSubmission,
) -> Redirect {
    let outcome = match request {
        Some(request) => state.booker.handle_booking(&request).await,
        None => BookingOutcome::FAILED,
    };
    Redirect::to(outcome.redirect_target())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

async fn log_request(request: Request, next: Next) -> Response {
    trace!("{}, {}", request.method(), request.uri().path());
    next.run(request).await
}

pub fn app(state: AppState, assets_dir: impl AsRef<Path>) -> Router {
    let middleware = tower::ServiceBuilder::new()
        .layer(CompressionLayer::new().quality(tower_http::CompressionLevel::Fastest))
        .layer(CatchPanicLayer::new())
        .layer(middleware::from_fn(log_request));

    Router::new()
        .route("/", get(pages::index))
        .route("/about", get(pages::about))
        .route("/menu", get(pages::menu))
        .route("/book-event", get(pages::book_event).post(handle_booking))
        .route("/health", get(health))
        .nest_service("/assets", ServeDir::new(assets_dir))
        .layer(middleware)
        .with_state(state)
}
