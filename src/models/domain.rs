use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One of the ten tag-list attributes used for weighted overlap scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    CulturalValues,
    Family,
    Culture,
    RelationshipGoals,
    Lifestyle,
    Communication,
    LifeGoal,
    Art,
    Music,
    Travel,
}

impl Category {
    /// Fixed scan order used by both scoring and shared-interest extraction
    pub const ALL: [Category; 10] = [
        Category::CulturalValues,
        Category::Family,
        Category::Culture,
        Category::RelationshipGoals,
        Category::Lifestyle,
        Category::Communication,
        Category::LifeGoal,
        Category::Art,
        Category::Music,
        Category::Travel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::CulturalValues => "cultural_values",
            Category::Family => "family",
            Category::Culture => "culture",
            Category::RelationshipGoals => "relationship_goals",
            Category::Lifestyle => "lifestyle",
            Category::Communication => "communication",
            Category::LifeGoal => "life_goal",
            Category::Art => "art",
            Category::Music => "music",
            Category::Travel => "travel",
        }
    }
}

/// A stored quiz submission
///
/// Category fields accept any JSON value on input; anything that is not an
/// array is read as an empty list and non-string array items are dropped.
/// Fields the quiz sends that are not modelled here are kept in `extra` so
/// they survive a read/write cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(default, deserialize_with = "lenient_opt_text", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_age", skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
    #[serde(default, deserialize_with = "lenient_opt_text", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_text", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub thoughts: String,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub cultural_values: Vec<String>,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub family: Vec<String>,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub culture: Vec<String>,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub relationship_goals: Vec<String>,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub lifestyle: Vec<String>,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub communication: Vec<String>,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub life_goal: Vec<String>,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub art: Vec<String>,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub music: Vec<String>,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub travel: Vec<String>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "lastActive", default, skip_serializing_if = "Option::is_none")]
    pub last_active: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Profile {
    /// Tags recorded for a category
    pub fn tags(&self, category: Category) -> &[String] {
        match category {
            Category::CulturalValues => &self.cultural_values,
            Category::Family => &self.family,
            Category::Culture => &self.culture,
            Category::RelationshipGoals => &self.relationship_goals,
            Category::Lifestyle => &self.lifestyle,
            Category::Communication => &self.communication,
            Category::LifeGoal => &self.life_goal,
            Category::Art => &self.art,
            Category::Music => &self.music,
            Category::Travel => &self.travel,
        }
    }

    pub fn tags_mut(&mut self, category: Category) -> &mut Vec<String> {
        match category {
            Category::CulturalValues => &mut self.cultural_values,
            Category::Family => &mut self.family,
            Category::Culture => &mut self.culture,
            Category::RelationshipGoals => &mut self.relationship_goals,
            Category::Lifestyle => &mut self.lifestyle,
            Category::Communication => &mut self.communication,
            Category::LifeGoal => &mut self.life_goal,
            Category::Art => &mut self.art,
            Category::Music => &mut self.music,
            Category::Travel => &mut self.travel,
        }
    }

    /// Display name, falling back to "Anonymous"
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => "Anonymous",
        }
    }

    /// Build a new profile from a raw quiz submission
    ///
    /// Any `id`, `createdAt` or `lastActive` sent by the client is replaced.
    pub fn from_submission(
        id: String,
        mut submission: Map<String, Value>,
        now: DateTime<Utc>,
    ) -> Result<Self, serde_json::Error> {
        submission.insert("id".to_string(), Value::String(id));
        submission.insert("createdAt".to_string(), serde_json::to_value(now)?);
        submission.insert("lastActive".to_string(), serde_json::to_value(now)?);
        serde_json::from_value(Value::Object(submission))
    }

    /// Apply a partial update field by field
    ///
    /// The identifier never changes; `lastActive` is refreshed.
    pub fn merged_with(
        &self,
        patch: Map<String, Value>,
        now: DateTime<Utc>,
    ) -> Result<Self, serde_json::Error> {
        let mut document = match serde_json::to_value(self)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        for (key, value) in patch {
            if key == "id" {
                continue;
            }
            document.insert(key, value);
        }
        document.insert("lastActive".to_string(), serde_json::to_value(now)?);

        serde_json::from_value(Value::Object(document))
    }
}

fn lenient_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(tag) => Some(tag),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(text) => text,
        _ => String::new(),
    })
}

fn lenient_opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(text) => Some(text),
        _ => None,
    })
}

fn lenient_age<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => parse_leading_int(&s),
        _ => None,
    })
}

/// Parse an integer prefix the way form input is usually read: leading
/// whitespace and an optional sign, then at least one digit
pub fn parse_leading_int(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits: &str = match rest.find(|c: char| !c.is_ascii_digit()) {
        Some(end) => &rest[..end],
        None => rest,
    };
    if digits.is_empty() {
        return None;
    }

    let value: i64 = digits.parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Derived, never persisted result of ranking one candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub compatibility: u32,
    #[serde(rename = "sharedInterests")]
    pub shared_interests: Vec<String>,
    pub thoughts: String,
}

/// A direct message between two users
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    #[serde(rename = "fromUserId")]
    pub from_user_id: String,
    #[serde(rename = "toUserId")]
    pub to_user_id: String,
    #[serde(rename = "fromUserName")]
    pub from_user_name: String,
    #[serde(rename = "toUserName")]
    pub to_user_name: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
}

/// Message as seen from one participant's side of a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub id: String,
    #[serde(rename = "fromUserId")]
    pub from_user_id: String,
    #[serde(rename = "toUserId")]
    pub to_user_id: String,
    #[serde(rename = "fromUserName")]
    pub from_user_name: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
    #[serde(rename = "isFromCurrentUser")]
    pub is_from_current_user: bool,
}

/// All messages exchanged with one other user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    #[serde(rename = "otherUserId")]
    pub other_user_id: String,
    #[serde(rename = "otherUserName")]
    pub other_user_name: String,
    pub messages: Vec<ConversationMessage>,
}

/// Scoring weights, one per category plus the thought and age bonuses
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub cultural_values: f64,
    pub family: f64,
    pub culture: f64,
    pub relationship_goals: f64,
    pub lifestyle: f64,
    pub communication: f64,
    pub life_goal: f64,
    pub art: f64,
    pub music: f64,
    pub travel: f64,
    pub thoughts: f64,
    pub age: f64,
}

impl ScoringWeights {
    pub fn category(&self, category: Category) -> f64 {
        match category {
            Category::CulturalValues => self.cultural_values,
            Category::Family => self.family,
            Category::Culture => self.culture,
            Category::RelationshipGoals => self.relationship_goals,
            Category::Lifestyle => self.lifestyle,
            Category::Communication => self.communication,
            Category::LifeGoal => self.life_goal,
            Category::Art => self.art,
            Category::Music => self.music,
            Category::Travel => self.travel,
        }
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            cultural_values: 3.0,
            family: 2.5,
            culture: 2.5,
            relationship_goals: 2.5,
            lifestyle: 2.0,
            communication: 2.0,
            life_goal: 2.0,
            art: 1.5,
            music: 1.5,
            travel: 1.5,
            thoughts: 1.5,
            age: 1.0,
        }
    }
}

/// Thresholds applied when turning scores into a match list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchingRules {
    pub min_compatibility: u32,
    pub max_results: usize,
    pub max_shared_interests: usize,
}

impl Default for MatchingRules {
    fn default() -> Self {
        Self {
            min_compatibility: 40,
            max_results: 10,
            max_shared_interests: 5,
        }
    }
}

/// Generate a record id of the form `<prefix>_<unix millis>_<9 random chars>`
pub fn generate_id(prefix: &str, now: DateTime<Utc>) -> String {
    let random = uuid::Uuid::new_v4().simple().to_string();
    format!("{}_{}_{}", prefix, now.timestamp_millis(), &random[..9])
}
