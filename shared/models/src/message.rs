//! Generated communication models.
//!
//! Each completed run produces three messages, one per audience.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Audience for a generated message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageType {
    Supplier,
    Buyer,
    Management,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Supplier => "SUPPLIER",
            Self::Buyer => "BUYER",
            Self::Management => "MANAGEMENT",
        }
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "SUPPLIER" => Some(Self::Supplier),
            "BUYER" => Some(Self::Buyer),
            "MANAGEMENT" => Some(Self::Management),
            _ => None,
        }
    }

    /// Display label for the message recipient group.
    pub fn recipient_label(&self) -> &'static str {
        match self {
            Self::Supplier => "Suppliers",
            Self::Buyer => "Buyers",
            Self::Management => "Management",
        }
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted outbound communication draft.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratedMessage {
    pub id: Uuid,
    pub analysis_id: Uuid,
    pub message_type: MessageType,
    pub subject: String,
    pub body: String,
    pub recipient: String,
    pub created_at: DateTime<Utc>,
}

/// Insert shape for a generated message.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub analysis_id: Uuid,
    pub message_type: MessageType,
    pub subject: String,
    pub body: String,
    pub recipient: String,
}

impl NewMessage {
    pub fn new(analysis_id: Uuid, message_type: MessageType, subject: String, body: String) -> Self {
        Self {
            analysis_id,
            message_type,
            subject,
            body,
            recipient: message_type.recipient_label().to_string(),
        }
    }
}
