use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One status entry of a case, ordered by `recorded_at` ascending when
/// returned by the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseStatus {
    #[serde(rename = "zaaktype")]
    pub case_type_ref: String,

    #[serde(rename = "statustoelichting")]
    pub description: Option<String>,

    #[serde(rename = "datumStatusGezet")]
    pub recorded_at: DateTime<Utc>,
}

/// Case-category metadata. Rarely changes upstream, so it is cached by
/// reference for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseType {
    #[serde(rename = "identificatie")]
    pub identification: String,

    #[serde(rename = "omschrijving")]
    pub name: String,

    #[serde(rename = "informeren")]
    pub is_notification_expected: bool,
}

/// Display attributes of one case instance. Fetched per event, never cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Case {
    #[serde(rename = "identificatie")]
    pub identification: String,

    #[serde(rename = "omschrijving")]
    pub name: String,

    #[serde(rename = "zaaktype")]
    pub case_type_ref: String,
}
