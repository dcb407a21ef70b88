use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::core::group_conversations;
use crate::models::{
    generate_id, ConversationsResponse, Message, SendMessageRequest, SendMessageResponse,
};
use crate::routes::{ApiError, AppState};
use crate::services::templates::message_notification;

/// Configure messaging routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/send-message", web::post().to(send_message))
        .route("/messages/{user_id}", web::get().to(get_messages));
}

/// Store a direct message and notify the recipient
///
/// POST /send-message
async fn send_message(
    state: web::Data<AppState>,
    req: web::Json<SendMessageRequest>,
) -> Result<HttpResponse, ApiError> {
    if let Err(e) = req.validate() {
        tracing::debug!("Rejected message request: {}", e);
        return Err(ApiError::BadRequest(
            "Missing required fields: fromUserId, toUserId, message".to_string(),
        ));
    }
    let req = req.into_inner();

    let sender = state
        .profiles
        .find_profile(&req.from_user_id)
        .await
        .map_err(ApiError::store("Error sending message"))?;
    let recipient = state
        .profiles
        .find_profile(&req.to_user_id)
        .await
        .map_err(ApiError::store("Error sending message"))?;

    let (Some(sender), Some(recipient)) = (sender, recipient) else {
        return Err(ApiError::NotFound("One or both users not found".to_string()));
    };

    let from_user_name = match req.from_user_name.as_deref() {
        Some(name) if !name.trim().is_empty() => name.to_string(),
        _ => sender.display_name().to_string(),
    };

    let now = chrono::Utc::now();
    let message = Message {
        id: generate_id("msg", now),
        from_user_id: req.from_user_id,
        to_user_id: req.to_user_id,
        from_user_name,
        to_user_name: recipient.display_name().to_string(),
        message: req.message.trim().to_string(),
        timestamp: now,
        read: false,
    };

    state
        .messages
        .append_message(&message)
        .await
        .map_err(ApiError::store("Error sending message"))?;

    tracing::info!(
        "Message {} sent from {} to {}",
        message.id,
        message.from_user_id,
        message.to_user_id
    );

    if let Some(email) = recipient.email.as_deref() {
        let notification = message_notification(
            email,
            recipient.name.as_deref(),
            &message.from_user_name,
            &message.message,
            &state.app_url,
        );
        // Failures are logged by the queue
        let _ = state.notifications.enqueue(notification);
    }

    Ok(HttpResponse::Ok().json(SendMessageResponse {
        success: true,
        message: "Message sent successfully! 💌".to_string(),
        message_id: message.id,
    }))
}

/// Conversations involving a user
///
/// GET /messages/{userId}
async fn get_messages(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();

    let messages = state
        .messages
        .messages_for_user(&user_id)
        .await
        .map_err(ApiError::store("Error fetching messages"))?;

    let conversations = group_conversations(&user_id, &messages);

    tracing::debug!(
        "User {} has {} conversations across {} messages",
        user_id,
        conversations.len(),
        messages.len()
    );

    Ok(HttpResponse::Ok().json(ConversationsResponse {
        success: true,
        conversations,
    }))
}
