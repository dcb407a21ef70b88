// Core algorithm exports
pub mod conversations;
pub mod interests;
pub mod matcher;
pub mod scoring;
pub mod text;

pub use conversations::group_conversations;
pub use interests::shared_interests;
pub use matcher::Matcher;
pub use scoring::{age_proximity_score, calculate_compatibility, category_overlap_score, thought_similarity};
pub use text::tokenize_thoughts;
