use serde::{Deserialize, Serialize};
use crate::models::domain::{Conversation, MatchRecord};

/// Response for the quiz submission endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
    #[serde(rename = "userId")]
    pub user_id: String,
    pub matches: Vec<MatchRecord>,
    pub message: String,
}

/// Response for the match query endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchesResponse {
    pub success: bool,
    pub matches: Vec<MatchRecord>,
}

/// Public summary of a stored profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub id: String,
    pub name: String,
    pub age: Option<i64>,
    pub location: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Response for the profile listing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileListResponse {
    pub success: bool,
    pub users: Vec<ProfileSummary>,
    pub total: usize,
}

/// Response for the single profile endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub user: serde_json::Value,
}

/// Response for write endpoints without a payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckResponse {
    pub success: bool,
    pub message: String,
}

/// Response for the send message endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "messageId")]
    pub message_id: String,
}

/// Response for the conversation listing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationsResponse {
    pub success: bool,
    pub conversations: Vec<Conversation>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}
