use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::{
    clients::{get_json, http_client},
    config::Config,
    errors::ProcessingError,
    models::case::{Case, CaseStatus, CaseType},
};

const SERVICE: &str = "case registry";

#[async_trait]
pub trait CaseRegistry: Send + Sync {
    async fn get_case_statuses(&self, case_ref: &str) -> Result<Vec<CaseStatus>, ProcessingError>;

    async fn get_case_type(&self, case_type_ref: &str) -> Result<CaseType, ProcessingError>;

    async fn get_case(&self, case_ref: &str) -> Result<Case, ProcessingError>;
}

pub struct HttpCaseRegistry {
    http_client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct StatusListResponse {
    results: Vec<CaseStatus>,
}

impl HttpCaseRegistry {
    pub fn new(config: &Config) -> Result<Self, ProcessingError> {
        info!(base_url = %config.case_registry_url, "Case registry client initialized");

        Ok(Self {
            http_client: http_client(config.upstream_timeout_seconds)?,
            base_url: config.case_registry_url.clone(),
        })
    }

    fn case_type_url(&self, case_type_ref: &str) -> String {
        // References arrive either as absolute resource URLs or bare ids.
        if case_type_ref.starts_with("http") {
            case_type_ref.to_string()
        } else {
            format!("{}/zaaktypen/{}", self.base_url, case_type_ref)
        }
    }
}

#[async_trait]
impl CaseRegistry for HttpCaseRegistry {
    async fn get_case_statuses(&self, case_ref: &str) -> Result<Vec<CaseStatus>, ProcessingError> {
        let url = format!("{}/statussen?zaak={}", self.base_url, case_ref);

        debug!(case_ref, "Fetching case statuses");

        let listing: StatusListResponse =
            get_json(&self.http_client, &url, SERVICE, case_ref).await?;

        let mut statuses = listing.results;
        statuses.sort_by_key(|s| s.recorded_at);

        Ok(statuses)
    }

    async fn get_case_type(&self, case_type_ref: &str) -> Result<CaseType, ProcessingError> {
        let url = self.case_type_url(case_type_ref);

        debug!(case_type_ref, "Fetching case type");

        get_json(&self.http_client, &url, SERVICE, case_type_ref).await
    }

    async fn get_case(&self, case_ref: &str) -> Result<Case, ProcessingError> {
        let url = format!("{}/zaken/{}", self.base_url, case_ref);

        debug!(case_ref, "Fetching case");

        get_json(&self.http_client, &url, SERVICE, case_ref).await
    }
}
