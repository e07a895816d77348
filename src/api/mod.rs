pub mod health;
pub mod market;
pub mod prediction;
pub mod trading;

use crate::AppState;
use axum::Router;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/api/market", market::router())
        .nest("/api/prediction", prediction::router())
        .nest("/api/trading", trading::router())
}
