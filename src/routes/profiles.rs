use actix_web::{web, HttpResponse};
use serde_json::{Map, Value};

use crate::models::{
    generate_id, AckResponse, Profile, ProfileListResponse, ProfileResponse, ProfileSummary,
    SubmitResponse,
};
use crate::routes::{ApiError, AppState};
use crate::services::templates::match_notification;

/// Configure profile routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/submit", web::post().to(submit_quiz))
        .route("/users", web::get().to(list_users))
        .route("/user/{id}", web::get().to(get_user))
        .route("/user/{id}", web::put().to(update_user));
}

/// Store a quiz submission and return its matches
///
/// POST /submit
async fn submit_quiz(
    state: web::Data<AppState>,
    body: web::Json<Map<String, Value>>,
) -> Result<HttpResponse, ApiError> {
    let now = chrono::Utc::now();
    let user_id = generate_id("user", now);

    let profile = Profile::from_submission(user_id.clone(), body.into_inner(), now)
        .map_err(|e| ApiError::BadRequest(format!("Invalid profile: {}", e)))?;

    state
        .profiles
        .append_profile(&profile)
        .await
        .map_err(ApiError::store("Error processing your request. Please try again."))?;

    let pool = state
        .profiles
        .list_profiles()
        .await
        .map_err(ApiError::store("Error processing your request. Please try again."))?;

    let matches = state.matcher.rank_matches(&profile, &pool);

    tracing::info!(
        "New user {} submitted quiz, found {} matches",
        user_id,
        matches.len()
    );

    notify_existing_users(&state, &profile, &pool);

    Ok(HttpResponse::Ok().json(SubmitResponse {
        success: true,
        user_id,
        matches,
        message: "Profile created and matches found! 💕".to_string(),
    }))
}

/// Queue a match email for every existing user the newcomer suits
fn notify_existing_users(state: &AppState, newcomer: &Profile, pool: &[Profile]) {
    let mut queued = 0;

    for (existing, record) in state.matcher.interested_in(newcomer, pool) {
        let Some(email) = existing.email.as_deref() else {
            continue;
        };

        let notification = match_notification(
            email,
            existing.name.as_deref(),
            std::slice::from_ref(&record),
            &state.app_url,
        );

        if state.notifications.enqueue(notification).is_ok() {
            queued += 1;
        }
    }

    if queued > 0 {
        tracing::info!("Queued {} match notifications for newcomer {}", queued, newcomer.id);
    }
}

/// Fetch a profile document without its identifier
///
/// GET /user/{id}
async fn get_user(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let profile = state
        .profiles
        .find_profile(&id)
        .await
        .map_err(ApiError::store("Error fetching user profile"))?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let mut user = serde_json::to_value(&profile)
        .map_err(|e| ApiError::store("Error fetching user profile")(e.into()))?;
    if let Value::Object(map) = &mut user {
        map.remove("id");
    }

    Ok(HttpResponse::Ok().json(ProfileResponse {
        success: true,
        user,
    }))
}

/// Summaries of every stored profile
///
/// GET /users
async fn list_users(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let profiles = state
        .profiles
        .list_profiles()
        .await
        .map_err(ApiError::store("Error fetching users"))?;

    let users: Vec<ProfileSummary> = profiles
        .iter()
        .map(|profile| ProfileSummary {
            id: profile.id.clone(),
            name: profile.display_name().to_string(),
            age: profile.age,
            location: profile.location.clone(),
            created_at: profile.created_at,
        })
        .collect();

    Ok(HttpResponse::Ok().json(ProfileListResponse {
        success: true,
        total: users.len(),
        users,
    }))
}

/// Merge a partial update into an existing profile
///
/// PUT /user/{id}
async fn update_user(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<Map<String, Value>>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let existing = state
        .profiles
        .find_profile(&id)
        .await
        .map_err(ApiError::store("Error updating profile"))?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let updated = existing
        .merged_with(body.into_inner(), chrono::Utc::now())
        .map_err(|e| ApiError::BadRequest(format!("Invalid profile: {}", e)))?;

    let found = state
        .profiles
        .update_profile(&updated)
        .await
        .map_err(ApiError::store("Error updating profile"))?;

    if !found {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    tracing::debug!("Updated profile {}", id);

    Ok(HttpResponse::Ok().json(AckResponse {
        success: true,
        message: "Profile updated successfully! 💕".to_string(),
    }))
}
