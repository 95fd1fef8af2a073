use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use tower_http::services::ServeDir;

use crate::handlers::{self, a001_bill::ReceiptStorage};
use crate::system::middleware::request_logger;

pub fn configure_routes(storage: ReceiptStorage) -> Router {
    let uploads_dir = storage.uploads_dir.clone();
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route(
            "/bills",
            get(handlers::a001_bill::list_all).post(handlers::a001_bill::create),
        )
        .route("/bills/receipt", post(handlers::a001_bill::upload_receipt))
        .route(
            "/bills/:id",
            patch(handlers::a001_bill::update).delete(handlers::a001_bill::delete),
        )
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .layer(middleware::from_fn(request_logger))
        .with_state(Arc::new(storage))
}
