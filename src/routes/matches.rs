use actix_web::{web, HttpResponse, Responder};

use crate::models::{HealthResponse, MatchesResponse};
use crate::routes::{ApiError, AppState};

/// Configure health and match query routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/matches/{user_id}", web::get().to(get_matches));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let healthy = match state.profiles.health_check().await {
        Ok(healthy) => healthy,
        Err(e) => {
            tracing::warn!("Store health check failed: {}", e);
            false
        }
    };

    let (status, message) = if healthy {
        ("OK", "Choice Love API is running! 💕")
    } else {
        ("DEGRADED", "Choice Love API is running without its record store")
    };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        message: message.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Ranked matches for an existing user
///
/// GET /matches/{userId}
async fn get_matches(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();

    let subject = state
        .profiles
        .find_profile(&user_id)
        .await
        .map_err(ApiError::store("Error finding matches"))?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let pool = state
        .profiles
        .list_profiles()
        .await
        .map_err(ApiError::store("Error finding matches"))?;

    let matches = state.matcher.rank_matches(&subject, &pool);

    tracing::info!(
        "Returning {} matches for user {} (from {} profiles)",
        matches.len(),
        user_id,
        pool.len()
    );

    Ok(HttpResponse::Ok().json(MatchesResponse {
        success: true,
        matches,
    }))
}
