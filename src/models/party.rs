use serde::{Deserialize, Serialize};

use crate::models::event::NotificationChannel;

/// Normalized citizen/organization contact data, produced by the query
/// layer from the party registry's role shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonPartyData {
    pub first_name: String,
    pub surname_prefix: Option<String>,
    pub surname: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl CommonPartyData {
    /// Preferred delivery channel for this party: email when an address is
    /// known, SMS as fallback, `None` when the party is unreachable.
    pub fn preferred_channel(&self) -> Option<NotificationChannel> {
        if self.email.as_deref().is_some_and(|e| !e.is_empty()) {
            Some(NotificationChannel::Email)
        } else if self.phone.as_deref().is_some_and(|p| !p.is_empty()) {
            Some(NotificationChannel::Sms)
        } else {
            None
        }
    }

    pub fn contact_address(&self, channel: NotificationChannel) -> Option<&str> {
        match channel {
            NotificationChannel::Email => self.email.as_deref(),
            NotificationChannel::Sms => self.phone.as_deref(),
        }
    }
}
