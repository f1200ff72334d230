use std::collections::HashMap;
use std::fmt::{Display, Formatter, Result};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectType {
    Case,
    Object,
    Decision,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventAction {
    Created,
    Updated,
    Closed,
}

/// The inbound webhook payload. Immutable once received.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationEvent {
    pub subject: SubjectType,
    pub action: EventAction,
    pub case_ref: String,

    #[serde(default)]
    pub attributes: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationChannel {
    Email,
    Sms,
}

impl Display for SubjectType {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            SubjectType::Case => write!(f, "case"),
            SubjectType::Object => write!(f, "object"),
            SubjectType::Decision => write!(f, "decision"),
        }
    }
}

impl Display for EventAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            EventAction::Created => write!(f, "created"),
            EventAction::Updated => write!(f, "updated"),
            EventAction::Closed => write!(f, "closed"),
        }
    }
}

impl Display for NotificationChannel {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            NotificationChannel::Email => write!(f, "email"),
            NotificationChannel::Sms => write!(f, "sms"),
        }
    }
}
