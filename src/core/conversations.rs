use std::collections::HashMap;

use crate::models::{Conversation, ConversationMessage, Message};

/// Group a user's messages into conversations
///
/// Messages not involving `user_id` are ignored. Conversations appear in the
/// order their first message appears in `messages`; the other participant's
/// name is taken from that first message. Within a conversation messages are
/// sorted by timestamp, ascending, keeping input order for equal timestamps.
pub fn group_conversations(user_id: &str, messages: &[Message]) -> Vec<Conversation> {
    let mut conversations: Vec<Conversation> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for msg in messages {
        let is_from_current_user = msg.from_user_id == user_id;
        if !is_from_current_user && msg.to_user_id != user_id {
            continue;
        }

        let (other_user_id, other_user_name) = if is_from_current_user {
            (msg.to_user_id.as_str(), msg.to_user_name.as_str())
        } else {
            (msg.from_user_id.as_str(), msg.from_user_name.as_str())
        };

        let slot = *index.entry(other_user_id).or_insert_with(|| {
            conversations.push(Conversation {
                other_user_id: other_user_id.to_string(),
                other_user_name: other_user_name.to_string(),
                messages: Vec::new(),
            });
            conversations.len() - 1
        });

        conversations[slot].messages.push(ConversationMessage {
            id: msg.id.clone(),
            from_user_id: msg.from_user_id.clone(),
            to_user_id: msg.to_user_id.clone(),
            from_user_name: msg.from_user_name.clone(),
            message: msg.message.clone(),
            timestamp: msg.timestamp,
            read: msg.read,
            is_from_current_user,
        });
    }

    for conversation in &mut conversations {
        conversation.messages.sort_by_key(|m| m.timestamp);
    }

    conversations
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn message(id: &str, from: &str, to: &str, minutes: i64) -> Message {
        Message {
            id: id.to_string(),
            from_user_id: from.to_string(),
            to_user_id: to.to_string(),
            from_user_name: format!("{} name", from),
            to_user_name: format!("{} name", to),
            message: format!("body {}", id),
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap() + Duration::minutes(minutes),
            read: false,
        }
    }

    #[test]
    fn test_groups_by_other_participant() {
        let messages = vec![
            message("m1", "me", "bob", 5),
            message("m2", "alice", "me", 1),
            message("m3", "bob", "me", 2),
            message("m4", "carol", "dave", 3),
        ];

        let conversations = group_conversations("me", &messages);
        assert_eq!(conversations.len(), 2);

        assert_eq!(conversations[0].other_user_id, "bob");
        assert_eq!(conversations[0].other_user_name, "bob name");
        let ids: Vec<&str> = conversations[0].messages.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m3", "m1"]);
        assert!(!conversations[0].messages[0].is_from_current_user);
        assert!(conversations[0].messages[1].is_from_current_user);

        assert_eq!(conversations[1].other_user_id, "alice");
        assert_eq!(conversations[1].messages.len(), 1);
    }

    #[test]
    fn test_no_messages() {
        let messages = vec![message("m1", "a", "b", 0)];
        assert!(group_conversations("me", &messages).is_empty());
    }
}
