use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::{
    clients::{get_json, http_client},
    config::Config,
    errors::ProcessingError,
    models::party::CommonPartyData,
};

const SERVICE: &str = "party registry";

#[async_trait]
pub trait PartyRegistry: Send + Sync {
    async fn get_party_data(&self, case_ref: &str) -> Result<CommonPartyData, ProcessingError>;
}

pub struct HttpPartyRegistry {
    http_client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct RoleListResponse {
    results: Vec<RoleResource>,
}

#[derive(Deserialize)]
struct RoleResource {
    #[serde(rename = "betrokkeneIdentificatie")]
    party_identity: Option<RawPartyIdentity>,
}

#[derive(Deserialize)]
struct RawPartyIdentity {
    #[serde(rename = "voornamen")]
    first_name: Option<String>,

    #[serde(rename = "voorvoegselGeslachtsnaam")]
    surname_prefix: Option<String>,

    #[serde(rename = "geslachtsnaam")]
    surname: Option<String>,

    #[serde(rename = "telefoonnummer")]
    phone: Option<String>,

    #[serde(rename = "emailadres")]
    email: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl HttpPartyRegistry {
    pub fn new(config: &Config) -> Result<Self, ProcessingError> {
        info!(base_url = %config.party_registry_url, "Party registry client initialized");

        Ok(Self {
            http_client: http_client(config.upstream_timeout_seconds)?,
            base_url: config.party_registry_url.clone(),
        })
    }

    /// Different party shapes (citizen, organization branch) share the same
    /// identity fields; only the name fields are mandatory for us.
    fn normalize(
        identity: RawPartyIdentity,
        case_ref: &str,
    ) -> Result<CommonPartyData, ProcessingError> {
        let first_name = non_empty(identity.first_name).ok_or_else(|| {
            ProcessingError::MalformedResponse {
                service: SERVICE,
                detail: format!("role for '{}' is missing a first name", case_ref),
            }
        })?;

        let surname =
            non_empty(identity.surname).ok_or_else(|| ProcessingError::MalformedResponse {
                service: SERVICE,
                detail: format!("role for '{}' is missing a surname", case_ref),
            })?;

        Ok(CommonPartyData {
            first_name,
            surname_prefix: non_empty(identity.surname_prefix),
            surname,
            phone: non_empty(identity.phone),
            email: non_empty(identity.email),
        })
    }
}

#[async_trait]
impl PartyRegistry for HttpPartyRegistry {
    async fn get_party_data(&self, case_ref: &str) -> Result<CommonPartyData, ProcessingError> {
        let url = format!("{}/rollen?zaak={}", self.base_url, case_ref);

        debug!(case_ref, "Fetching party data");

        let listing: RoleListResponse =
            get_json(&self.http_client, &url, SERVICE, case_ref).await?;

        let identity = listing
            .results
            .into_iter()
            .find_map(|role| role.party_identity)
            .ok_or_else(|| ProcessingError::DataNotFound {
                service: SERVICE,
                reference: case_ref.to_string(),
            })?;

        Self::normalize(identity, case_ref)
    }
}
