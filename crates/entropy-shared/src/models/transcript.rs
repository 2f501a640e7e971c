use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptAttachment {
    pub filename: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One message of a ticket transcript written by the Discord bot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptMessage {
    #[serde(rename = "userID")]
    pub user_id: String,
    pub message: String,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<TranscriptAttachment>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
