// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Category, Conversation, ConversationMessage, MatchRecord, MatchingRules, Message, Profile,
    ScoringWeights, generate_id,
};
pub use requests::SendMessageRequest;
pub use responses::{
    AckResponse, ConversationsResponse, ErrorResponse, HealthResponse, MatchesResponse,
    ProfileListResponse, ProfileResponse, ProfileSummary, SendMessageResponse, SubmitResponse,
};
