// List/filter helpers for contact-form messages.
use crate::types::ContactMessage;
use crate::util::parse_timestamp;

pub fn unread(messages: &[ContactMessage]) -> impl Iterator<Item = &ContactMessage> {
    messages.iter().filter(|m| !m.is_read)
}

/// Case-insensitive match on name, email or message body. An empty query
/// matches everything.
pub fn search<'a>(messages: &'a [ContactMessage], query: &str) -> Vec<&'a ContactMessage> {
    let query = query.trim().to_lowercase();
    messages
        .iter()
        .filter(|m| {
            query.is_empty()
                || m.name.to_lowercase().contains(&query)
                || m.email.to_lowercase().contains(&query)
                || m.message.to_lowercase().contains(&query)
        })
        .collect()
}

/// Newest first; messages without a usable timestamp go last.
pub fn newest_first(messages: &[ContactMessage]) -> Vec<&ContactMessage> {
    let mut sorted: Vec<&ContactMessage> = messages.iter().collect();
    sorted.sort_by_key(|m| {
        std::cmp::Reverse(m.created_at.as_deref().and_then(parse_timestamp))
    });
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(name: &str, body: &str, read: bool, at: Option<&str>) -> ContactMessage {
        ContactMessage {
            id: None,
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            message: body.to_string(),
            is_read: read,
            created_at: at.map(str::to_string),
        }
    }

    #[test]
    fn filters_unread_and_searches() {
        let messages = vec![
            msg("Asha", "Is parking available?", false, None),
            msg("Ravi", "Refund request", true, None),
        ];
        assert_eq!(unread(&messages).count(), 1);
        assert_eq!(search(&messages, "REFUND").len(), 1);
        assert_eq!(search(&messages, "asha@").len(), 1);
        assert_eq!(search(&messages, "  ").len(), 2);
    }

    #[test]
    fn sorts_newest_first() {
        let messages = vec![
            msg("a", "", false, Some("2026-10-01T10:00:00Z")),
            msg("b", "", false, None),
            msg("c", "", false, Some("2026-10-12T10:00:00Z")),
        ];
        let sorted = newest_first(&messages);
        let names: Vec<&str> = sorted.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }
}
