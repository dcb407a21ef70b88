// Integration tests for Choice Love

use choice_love::core::{group_conversations, Matcher};
use choice_love::models::{generate_id, Message, Profile};
use choice_love::services::{JsonFileStore, MessageStore, ProfileStore};
use chrono::Utc;
use std::path::PathBuf;

fn temp_dir() -> PathBuf {
    std::env::temp_dir().join(format!("choice-love-it-{}", uuid::Uuid::new_v4()))
}

fn create_test_profile(id: &str, music: &[&str], age: Option<i64>) -> Profile {
    Profile {
        id: id.to_string(),
        name: Some(format!("User {}", id)),
        age,
        music: music.iter().map(|m| m.to_string()).collect(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_integration_end_to_end_matching() {
    let store = JsonFileStore::open(temp_dir()).await.unwrap();
    let matcher = Matcher::with_default_weights();

    let subject = create_test_profile("subject", &["jazz"], Some(30));
    let pool = vec![
        create_test_profile("low", &["rock"], Some(35)),   // 32
        create_test_profile("edge", &["rock"], Some(30)),  // 40
        create_test_profile("mid", &["jazz", "rock"], Some(30)), // 70
        create_test_profile("high", &["jazz"], Some(30)),  // 100
        create_test_profile("silent", &[], None),          // 0
        subject.clone(),
    ];

    for profile in &pool {
        store.append_profile(profile).await.unwrap();
    }

    let stored = store.list_profiles().await.unwrap();
    let matches = matcher.rank_matches(&subject, &stored);

    let ranked: Vec<(&str, u32)> = matches
        .iter()
        .map(|m| (m.user_id.as_str(), m.compatibility))
        .collect();
    assert_eq!(ranked, vec![("high", 100), ("mid", 70), ("edge", 40)]);

    assert_eq!(matches[0].shared_interests, vec!["jazz"]);
    assert_eq!(matches[1].shared_interests, vec!["jazz"]);
    assert!(matches[2].shared_interests.is_empty());
}

#[tokio::test]
async fn test_integration_truncates_and_keeps_pool_order() {
    let store = JsonFileStore::open(temp_dir()).await.unwrap();
    let matcher = Matcher::with_default_weights();

    let subject = create_test_profile("subject", &["jazz"], Some(30));
    for i in 0..12 {
        let candidate = create_test_profile(&format!("c{:02}", i), &["jazz"], Some(30));
        store.append_profile(&candidate).await.unwrap();
    }

    let stored = store.list_profiles().await.unwrap();
    let matches = matcher.rank_matches(&subject, &stored);

    assert_eq!(matches.len(), 10);
    let ids: Vec<String> = matches.iter().map(|m| m.user_id.clone()).collect();
    let expected: Vec<String> = (0..10).map(|i| format!("c{:02}", i)).collect();
    assert_eq!(ids, expected);
}

#[tokio::test]
async fn test_integration_newcomer_interest() {
    let matcher = Matcher::with_default_weights();

    let existing = vec![
        create_test_profile("fan", &["jazz"], Some(29)),
        create_test_profile("stranger", &["metal"], Some(60)),
    ];
    let newcomer = create_test_profile("new", &["jazz"], Some(30));

    let interested = matcher.interested_in(&newcomer, &existing);

    assert_eq!(interested.len(), 1);
    let (profile, record) = &interested[0];
    assert_eq!(profile.id, "fan");
    assert_eq!(record.user_id, "new");
    assert_eq!(record.compatibility, 100);
}

#[tokio::test]
async fn test_integration_profiles_survive_reopen() {
    let dir = temp_dir();

    {
        let store = JsonFileStore::open(&dir).await.unwrap();
        let profile = create_test_profile("keep", &["jazz"], Some(41));
        let updated = profile
            .merged_with(
                serde_json::json!({"location": "Lagos", "id": "hijack"})
                    .as_object()
                    .cloned()
                    .unwrap(),
                Utc::now(),
            )
            .unwrap();

        store.append_profile(&profile).await.unwrap();
        assert!(store.update_profile(&updated).await.unwrap());
    }

    let store = JsonFileStore::open(&dir).await.unwrap();
    let found = store.find_profile("keep").await.unwrap().unwrap();
    assert_eq!(found.location.as_deref(), Some("Lagos"));
    assert_eq!(found.music, vec!["jazz"]);
    assert!(found.last_active.is_some());
    assert!(store.find_profile("hijack").await.unwrap().is_none());
}

#[tokio::test]
async fn test_integration_message_flow() {
    let store = JsonFileStore::open(temp_dir()).await.unwrap();

    for (from, to, body) in [("a", "b", "hello"), ("b", "a", "hi!"), ("c", "a", "hey")] {
        let now = Utc::now();
        store
            .append_message(&Message {
                id: generate_id("msg", now),
                from_user_id: from.to_string(),
                to_user_id: to.to_string(),
                from_user_name: format!("User {}", from),
                to_user_name: format!("User {}", to),
                message: body.to_string(),
                timestamp: now,
                read: false,
            })
            .await
            .unwrap();
    }

    let messages = store.messages_for_user("a").await.unwrap();
    assert_eq!(messages.len(), 3);
    assert!(store.messages_for_user("b").await.unwrap().len() == 2);

    let conversations = group_conversations("a", &messages);
    let others: Vec<&str> = conversations.iter().map(|c| c.other_user_id.as_str()).collect();
    assert_eq!(others, vec!["b", "c"]);
    assert_eq!(conversations[0].messages.len(), 2);
    assert_eq!(conversations[1].other_user_name, "User c");
}
