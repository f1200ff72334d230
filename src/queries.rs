use std::sync::Arc;

use futures_util::try_join;
use tracing::debug;

use crate::{
    cache::CaseTypeCache,
    clients::{case_registry::CaseRegistry, party_registry::PartyRegistry},
    errors::ProcessingError,
    models::{
        case::{Case, CaseStatus, CaseType},
        party::CommonPartyData,
    },
};

/// The query-composition layer: aggregates the upstream calls one scenario
/// needs, and owns the process-wide case-type cache.
pub struct QueryServices {
    case_registry: Arc<dyn CaseRegistry>,
    party_registry: Arc<dyn PartyRegistry>,
    case_type_cache: CaseTypeCache,
}

impl QueryServices {
    pub fn new(case_registry: Arc<dyn CaseRegistry>, party_registry: Arc<dyn PartyRegistry>) -> Self {
        Self {
            case_registry,
            party_registry,
            case_type_cache: CaseTypeCache::new(),
        }
    }

    /// All statuses of a case, ordered by occurrence time ascending.
    pub async fn case_statuses(&self, case_ref: &str) -> Result<Vec<CaseStatus>, ProcessingError> {
        self.case_registry.get_case_statuses(case_ref).await
    }

    /// Resolves the case type referenced by the most recent status, through
    /// the shared read-through cache.
    pub async fn last_case_type(
        &self,
        case_ref: &str,
        statuses: &[CaseStatus],
    ) -> Result<CaseType, ProcessingError> {
        let last = statuses.last().ok_or_else(|| {
            debug!(case_ref, "Case has no statuses recorded");
            ProcessingError::DataNotFound {
                service: "case registry",
                reference: case_ref.to_string(),
            }
        })?;

        self.case_type_cache
            .get_or_fetch(&last.case_type_ref, || {
                self.case_registry.get_case_type(&last.case_type_ref)
            })
            .await
    }

    pub async fn party_data(&self, case_ref: &str) -> Result<CommonPartyData, ProcessingError> {
        self.party_registry.get_party_data(case_ref).await
    }

    pub async fn case(&self, case_ref: &str) -> Result<Case, ProcessingError> {
        self.case_registry.get_case(case_ref).await
    }

    /// Case display data and party data come from independent registries,
    /// so both are fetched concurrently.
    pub async fn case_with_party(
        &self,
        case_ref: &str,
    ) -> Result<(Case, CommonPartyData), ProcessingError> {
        debug!(case_ref, "Fetching case and party data");

        try_join!(self.case(case_ref), self.party_data(case_ref))
    }

    pub async fn cached_case_type_count(&self) -> usize {
        self.case_type_cache.len().await
    }
}
