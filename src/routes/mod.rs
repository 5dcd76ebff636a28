use axum::Router;

use crate::{SensorStore, UserStore};

mod alerts;
mod health;
mod irrigation;
mod profiles;
mod readings;

// ---

pub fn router(sensors: SensorStore, users: UserStore) -> Router {
    // ---
    Router::new()
        .merge(readings::router())
        .merge(profiles::router())
        .merge(alerts::router())
        .merge(irrigation::router())
        .merge(health::router())
        .with_state((sensors, users))
}
