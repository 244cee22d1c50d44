use chrono::TimeZone;
use std::fmt;

use crate::store::ChatPreview;
use crate::time::{Clock, RelativeFormatter};

pub fn truncate(s: &str, max_len: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_len {
        s.to_string()
    } else if max_len <= 1 {
        "…".to_string()
    } else {
        let truncated: String = chars[..max_len - 1].iter().collect();
        format!("{}…", truncated)
    }
}

/// Collapse a message body to one line for a list row.
pub fn message_preview(body: &str, max_len: usize) -> String {
    let preview: String = body
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .filter(|c| !c.is_control())
        .collect();

    truncate(&preview, max_len)
}

pub const PEER_WIDTH: usize = 20;
pub const MESSAGE_WIDTH: usize = 40;

pub fn chat_row<C, Tz>(chat: &ChatPreview, formatter: &RelativeFormatter<C, Tz>) -> String
where
    C: Clock,
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let time = formatter.display_label(&chat.sent_at);
    let row = format!(
        "{:<peer$}  {:<msg$}  {}",
        truncate(&chat.peer, PEER_WIDTH),
        message_preview(&chat.last_message, MESSAGE_WIDTH),
        time,
        peer = PEER_WIDTH,
        msg = MESSAGE_WIDTH,
    );
    row.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::{DisplayLocale, FixedClock, RawTimestamp};
    use chrono::Utc;

    #[test]
    fn truncates_on_char_boundaries() {
        assert_eq!(truncate("héllo", 10), "héllo");
        assert_eq!(truncate("héllo wörld", 6), "héllo…");
        assert_eq!(truncate("abc", 1), "…");
    }

    #[test]
    fn preview_joins_lines() {
        assert_eq!(
            message_preview("  Hi!\n\n  Is the lamp\n still for sale?\n", 80),
            "Hi! Is the lamp still for sale?"
        );
    }

    #[test]
    fn row_ends_with_label() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 9, 0, 0).unwrap();
        let formatter = RelativeFormatter::new(FixedClock(now), Utc, DisplayLocale::default());
        let chat = ChatPreview {
            id: "1".to_string(),
            peer: "Amara".to_string(),
            last_message: "Deal".to_string(),
            sent_at: RawTimestamp::from(Utc.with_ymd_and_hms(2024, 6, 14, 18, 0, 0).unwrap()),
        };
        let row = chat_row(&chat, &formatter);
        assert!(row.starts_with("Amara "));
        assert!(row.ends_with("  Yesterday"));

        let blank = ChatPreview {
            sent_at: RawTimestamp::Missing,
            ..chat
        };
        assert!(chat_row(&blank, &formatter).ends_with("Deal"));
    }
}
