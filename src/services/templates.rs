use crate::models::MatchRecord;
use crate::services::notifier::Notification;

const BRAND: &str = "Choice Love";
const TAGLINE: &str = "Love is not just about who you talk to, but who you understand without speaking.";
const THOUGHTS_PREVIEW_CHARS: usize = 150;

/// Short label for a compatibility score
pub fn compatibility_message(score: u32) -> &'static str {
    match score {
        90..=u32::MAX => "Perfect soul connection! ✨",
        80..=89 => "Excellent match! 🌟",
        70..=79 => "Great potential! 💕",
        60..=69 => "Good compatibility! 💖",
        40..=59 => "Interesting match! 💫",
        _ => "Unique connection! 🌈",
    }
}

/// Email telling `recipient_name` about new matches
pub fn match_notification(
    to: &str,
    recipient_name: Option<&str>,
    matches: &[MatchRecord],
    app_url: &str,
) -> Notification {
    let noun = if matches.len() == 1 { "Match" } else { "Matches" };
    let subject = format!("💕 New Soul Matches Found! - {} {}", matches.len(), noun);

    let match_list: String = matches
        .iter()
        .enumerate()
        .map(|(index, m)| match_card(index + 1, m))
        .collect();

    let body = format!(
        r#"<h2 style="color: #fff; margin: 0 0 15px 0;">🎉 Great News, {name}!</h2>
<p style="margin: 0 0 20px 0; font-size: 1.1rem;">Someone new has joined {brand} and matches with your soul! Here are your new matches:</p>
{match_list}
{button}"#,
        name = escape_html(recipient_name.unwrap_or("Soul Seeker")),
        brand = BRAND,
        match_list = match_list,
        button = call_to_action(app_url, "💕 View All Matches"),
    );

    Notification {
        to: to.to_string(),
        subject,
        html: layout(
            &body,
            "💡 <strong>Tip:</strong> The more people who join Choice Love, the better your matches will be!",
            "This email was sent because you signed up for match notifications on Choice Love.",
        ),
    }
}

/// Email telling `recipient_name` about a new direct message
pub fn message_notification(
    to: &str,
    recipient_name: Option<&str>,
    sender_name: &str,
    message: &str,
    app_url: &str,
) -> Notification {
    let subject = format!("💌 New Message from {} on {}", sender_name, BRAND);

    let body = format!(
        r#"<h2 style="color: #fff; margin: 0 0 15px 0;">💌 New Message, {name}!</h2>
<p style="margin: 0 0 20px 0; font-size: 1.1rem;">You received a message from <strong>{sender}</strong>:</p>
<div style="background: rgba(255, 107, 157, 0.2); padding: 20px; border-radius: 15px; border-left: 4px solid #ff6b9d; margin: 20px 0;">
  <p style="margin: 0; font-size: 1.1rem; font-style: italic; color: #fff;">"{message}"</p>
</div>
{button}"#,
        name = escape_html(recipient_name.unwrap_or("Soul Seeker")),
        sender = escape_html(sender_name),
        message = escape_html(message),
        button = call_to_action(app_url, "💬 Reply to Message"),
    );

    Notification {
        to: to.to_string(),
        subject,
        html: layout(
            &body,
            "💡 <strong>Tip:</strong> Respond to keep the conversation flowing!",
            "This email was sent because you received a message on Choice Love.",
        ),
    }
}

fn match_card(position: usize, m: &MatchRecord) -> String {
    let interests = if m.shared_interests.is_empty() {
        String::new()
    } else {
        format!(
            r#"<p style="margin: 5px 0; color: #333;"><strong>Shared Interests:</strong> {}</p>"#,
            escape_html(&m.shared_interests.join(", "))
        )
    };

    let thoughts = if m.thoughts.is_empty() {
        String::new()
    } else {
        format!(
            r#"<p style="margin: 5px 0; color: #333;"><strong>Their Thoughts:</strong> "{}"</p>"#,
            escape_html(&preview(&m.thoughts, THOUGHTS_PREVIEW_CHARS))
        )
    };

    format!(
        r#"<div style="background: rgba(255, 107, 157, 0.1); padding: 15px; margin: 10px 0; border-radius: 10px; border-left: 4px solid #ff6b9d;">
  <h3 style="color: #ff6b9d; margin: 0 0 10px 0;">Match #{position} - {score}% Compatibility</h3>
  <p style="margin: 5px 0; color: #333;"><strong>User ID:</strong> {user_id}</p>
  <p style="margin: 5px 0; color: #333;"><strong>Compatibility:</strong> {label}</p>
  {interests}
  {thoughts}
</div>
"#,
        position = position,
        score = m.compatibility,
        user_id = escape_html(&m.user_id),
        label = compatibility_message(m.compatibility),
        interests = interests,
        thoughts = thoughts,
    )
}

fn call_to_action(app_url: &str, label: &str) -> String {
    format!(
        r#"<div style="text-align: center; margin-top: 25px;">
  <a href="{url}" style="background: linear-gradient(45deg, #ff6b9d, #ff8fab); color: white; padding: 15px 30px; text-decoration: none; border-radius: 15px; font-weight: bold; display: inline-block;">{label}</a>
</div>"#,
        url = escape_html(app_url),
        label = label,
    )
}

fn layout(body: &str, tip: &str, footer: &str) -> String {
    format!(
        r#"<div style="font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; max-width: 600px; margin: 0 auto; background: linear-gradient(135deg, #460d22 0%, #7a2c4a 100%); color: white; padding: 30px;">
  <div style="text-align: center; margin-bottom: 30px;">
    <h1 style="color: #ff6b9d; font-size: 2rem; margin: 0;">💚 {brand}</h1>
    <p style="font-style: italic; margin: 10px 0;">"{tagline}"</p>
  </div>
  <div style="background: rgba(255, 255, 255, 0.15); padding: 25px; border-radius: 20px; margin-bottom: 20px;">
{body}
  </div>
  <div style="background: rgba(255, 255, 255, 0.1); padding: 20px; border-radius: 15px; text-align: center;">
    <p style="margin: 0; font-size: 0.9rem; opacity: 0.9;">{tip}</p>
  </div>
  <div style="text-align: center; margin-top: 20px; font-size: 0.8rem; opacity: 0.7;">
    <p>{footer}</p>
    <p>If you no longer wish to receive these emails, please contact us.</p>
  </div>
</div>"#,
        brand = BRAND,
        tagline = TAGLINE,
        body = body,
        tip = tip,
        footer = footer,
    )
}

/// First `max_chars` characters of `text`, with an ellipsis when cut
fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, compatibility: u32, thoughts: &str) -> MatchRecord {
        MatchRecord {
            user_id: id.to_string(),
            compatibility,
            shared_interests: vec!["jazz".to_string(), "travel & food".to_string()],
            thoughts: thoughts.to_string(),
        }
    }

    #[test]
    fn test_compatibility_messages() {
        assert!(compatibility_message(95).starts_with("Perfect soul connection!"));
        assert!(compatibility_message(80).starts_with("Excellent match!"));
        assert!(compatibility_message(79).starts_with("Great potential!"));
        assert!(compatibility_message(60).starts_with("Good compatibility!"));
        assert!(compatibility_message(40).starts_with("Interesting match!"));
        assert!(compatibility_message(39).starts_with("Unique connection!"));
    }

    #[test]
    fn test_match_notification_subject_and_body() {
        let one = match_notification("a@example.com", Some("Ana"), &[record("user_1", 82, "")], "http://app");
        assert_eq!(one.to, "a@example.com");
        assert_eq!(one.subject, "💕 New Soul Matches Found! - 1 Match");
        assert!(one.html.contains("Great News, Ana!"));
        assert!(one.html.contains("Match #1 - 82% Compatibility"));
        assert!(one.html.contains("travel &amp; food"));
        assert!(!one.html.contains("Their Thoughts"));

        let two = match_notification(
            "a@example.com",
            None,
            &[record("user_1", 82, "hi"), record("user_2", 41, "hey")],
            "http://app",
        );
        assert_eq!(two.subject, "💕 New Soul Matches Found! - 2 Matches");
        assert!(two.html.contains("Great News, Soul Seeker!"));
        assert!(two.html.contains("Match #2 - 41% Compatibility"));
    }

    #[test]
    fn test_thoughts_are_truncated() {
        let long = "x".repeat(200);
        let n = match_notification("a@example.com", None, &[record("u", 50, &long)], "http://app");
        assert!(n.html.contains(&format!("\"{}...\"", "x".repeat(150))));
        assert!(!n.html.contains(&"x".repeat(151)));
    }

    #[test]
    fn test_message_notification_escapes_user_text() {
        let n = message_notification(
            "b@example.com",
            Some("Bo"),
            "Ana",
            "<script>alert('hi')</script>",
            "http://app",
        );
        assert_eq!(n.subject, "💌 New Message from Ana on Choice Love");
        assert!(n.html.contains("&lt;script&gt;alert(&#39;hi&#39;)&lt;/script&gt;"));
        assert!(!n.html.contains("<script>"));
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        assert_eq!(preview("héllo", 2), "hé...");
        assert_eq!(preview("hi", 5), "hi");
    }
}
