pub mod case_closed;
pub mod case_created;
pub mod case_updated;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::{
    config::Config,
    errors::ProcessingError,
    models::{
        case::{Case, CaseStatus, CaseType},
        delivery::PersonalizationMap,
        event::{EventAction, NotificationChannel, NotificationEvent, SubjectType},
        party::CommonPartyData,
    },
    queries::QueryServices,
    validation::{validate_notify_permitted, validate_whitelisted},
};

pub use case_closed::CaseClosedScenario;
pub use case_created::CaseCreatedScenario;
pub use case_updated::CaseStatusUpdatedScenario;

/// Everything the scenario gathered for one event. Owned by the in-flight
/// task for that event and discarded afterwards.
#[derive(Debug, Clone)]
pub struct PreparedData {
    pub case_type: CaseType,
    pub case: Case,
    pub party: CommonPartyData,
    pub latest_status: Option<CaseStatus>,
}

/// The behavior contract every scenario fulfills. Adding a scenario means
/// adding a module with one implementation and a new arm in [`resolve`];
/// the shared pipeline is untouched.
#[async_trait]
pub trait NotificationScenario: Send + Sync {
    fn whitelist_name(&self) -> &'static str;

    fn email_template_id(&self, config: &Config) -> Result<String, ProcessingError>;

    fn sms_template_id(&self, config: &Config) -> Result<String, ProcessingError>;

    /// Fetches and validates everything the scenario needs before any
    /// externally visible side effect happens.
    async fn prepare_data(
        &self,
        queries: &QueryServices,
        config: &Config,
        event: &NotificationEvent,
    ) -> Result<PreparedData, ProcessingError>;

    fn email_personalization(&self, data: &PreparedData) -> PersonalizationMap;

    fn sms_personalization(&self, data: &PreparedData) -> PersonalizationMap;

    fn template_id(
        &self,
        config: &Config,
        channel: NotificationChannel,
    ) -> Result<String, ProcessingError> {
        match channel {
            NotificationChannel::Email => self.email_template_id(config),
            NotificationChannel::Sms => self.sms_template_id(config),
        }
    }

    fn personalization(
        &self,
        data: &PreparedData,
        channel: NotificationChannel,
    ) -> PersonalizationMap {
        match channel {
            NotificationChannel::Email => self.email_personalization(data),
            NotificationChannel::Sms => self.sms_personalization(data),
        }
    }
}

/// Maps an event's (subject, action) pair to its scenario. Pure lookup; an
/// unmapped pair is a "no action taken" outcome for the caller, not a
/// failure of the ingestion.
pub fn resolve(
    subject: SubjectType,
    action: EventAction,
) -> Result<Box<dyn NotificationScenario>, ProcessingError> {
    match (subject, action) {
        (SubjectType::Case, EventAction::Created) => Ok(Box::new(CaseCreatedScenario)),
        (SubjectType::Case, EventAction::Updated) => Ok(Box::new(CaseStatusUpdatedScenario)),
        (SubjectType::Case, EventAction::Closed) => Ok(Box::new(CaseClosedScenario)),
        (subject, action) => Err(ProcessingError::UnsupportedScenario { subject, action }),
    }
}

/// The shared preparation sequence: statuses, then the cached case type,
/// then the validation gate, then the independent case/party fetches.
/// Validation runs before the remaining fetches so a rejected event does
/// as little upstream work as possible.
pub(crate) async fn prepare_case_data(
    queries: &QueryServices,
    config: &Config,
    event: &NotificationEvent,
    whitelist_name: &'static str,
) -> Result<PreparedData, ProcessingError> {
    let statuses = queries.case_statuses(&event.case_ref).await?;
    let case_type = queries.last_case_type(&event.case_ref, &statuses).await?;

    validate_whitelisted(
        config.allow_list(whitelist_name),
        &case_type.identification,
        whitelist_name,
    )?;
    validate_notify_permitted(&case_type)?;

    let (case, party) = queries.case_with_party(&event.case_ref).await?;

    debug!(
        case = %case.identification,
        case_type = %case_type.identification,
        "Scenario data prepared"
    );

    Ok(PreparedData {
        case_type,
        case,
        party,
        latest_status: statuses.into_iter().last(),
    })
}

/// Placeholder values shared by every scenario. A fresh map per call; no
/// state survives the event.
pub(crate) fn base_personalization(data: &PreparedData) -> PersonalizationMap {
    let mut map = PersonalizationMap::new();

    map.insert("klant.voornaam".to_string(), json!(data.party.first_name));
    map.insert(
        "klant.voorvoegselAchternaam".to_string(),
        json!(data.party.surname_prefix.clone().unwrap_or_default()),
    );
    map.insert("klant.achternaam".to_string(), json!(data.party.surname));
    map.insert(
        "zaak.identificatie".to_string(),
        json!(data.case.identification),
    );
    map.insert("zaak.omschrijving".to_string(), json!(data.case.name));

    map
}
