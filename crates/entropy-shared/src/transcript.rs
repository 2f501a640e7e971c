//! Ticket transcripts exported by the Discord bot.

use chrono::NaiveDateTime;
use sha2::{Digest, Sha256};

use crate::models::TranscriptMessage;

pub const USER_COLORS: [&str; 19] = [
    "#FF0000", "#008000", "#0000FF", "#800080", "#FFA500", "#00FFFF", "#808000", "#FF00FF",
    "#800000", "#008080", "#808080", "#FFC0CB", "#A52A2A", "#F0E68C", "#4682B4", "#D2691E",
    "#9ACD32", "#4B0082", "#B22222",
];

const EXPORT_TIMESTAMP: &str = "%Y-%m-%dT%H:%M:%SZ";
const DISPLAY_TIMESTAMP: &str = "%d.%m.%Y %H:%M";

/// Stable colour for a Discord user id, independent of message order.
pub fn user_color(user_id: &str) -> &'static str {
    let digest = Sha256::digest(user_id.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    let index = u64::from_be_bytes(prefix) % USER_COLORS.len() as u64;
    USER_COLORS[index as usize]
}

/// Adds display colours and reformats export timestamps in place.
pub fn annotate(messages: &mut [TranscriptMessage]) {
    for message in messages {
        message.color = Some(user_color(&message.user_id).to_string());
        if let Ok(ts) = NaiveDateTime::parse_from_str(&message.timestamp, EXPORT_TIMESTAMP) {
            message.timestamp = ts.format(DISPLAY_TIMESTAMP).to_string();
        }
    }
}

/// Ticket ids end up in file names, so only a conservative alphabet passes.
pub fn is_valid_ticket_id(ticket_id: &str) -> bool {
    !ticket_id.is_empty()
        && ticket_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Whether `file_name` is an export of `ticket_id` (`<ticket_id>_*.json`).
pub fn is_transcript_file(file_name: &str, ticket_id: &str) -> bool {
    file_name
        .strip_prefix(ticket_id)
        .and_then(|rest| rest.strip_prefix('_'))
        .is_some_and(|rest| rest.ends_with(".json"))
}
