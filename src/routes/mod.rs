// Route exports
pub mod error;
pub mod matches;
pub mod messages;
pub mod profiles;

use actix_web::web;
use std::sync::Arc;

use crate::core::Matcher;
use crate::services::{MessageStore, NotificationQueue, ProfileStore};

pub use error::{handle_json_payload_error, ApiError};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub profiles: Arc<dyn ProfileStore>,
    pub messages: Arc<dyn MessageStore>,
    pub matcher: Matcher,
    pub notifications: NotificationQueue,
    pub app_url: String,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(matches::configure)
        .configure(profiles::configure)
        .configure(messages::configure);
}
