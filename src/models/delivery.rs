use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::event::NotificationChannel;

/// Ordered placeholder-to-value substitutions for one notification. Built
/// fresh per event and per channel, never shared between events.
pub type PersonalizationMap = BTreeMap<String, serde_json::Value>;

/// A template as listed by the delivery provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    pub id: String,

    #[serde(rename = "type")]
    pub channel: NotificationChannel,

    pub name: String,
}

/// Receipt returned by the delivery provider for one accepted send.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    pub id: Uuid,
    pub channel: NotificationChannel,
    pub template_id: String,
}

/// The exactly-once completion marker registered with the source system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMoment {
    #[serde(rename = "uuid")]
    pub id: Uuid,
    pub status: String,
}
