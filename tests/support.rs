use std::collections::HashMap;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU32, Ordering},
};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tokio::time::{Duration, sleep};
use uuid::Uuid;

use case_notify_service::{
    clients::{
        case_registry::CaseRegistry, contact_moments::CompletionSink,
        delivery::DeliveryProvider, party_registry::PartyRegistry,
    },
    config::Config,
    errors::ProcessingError,
    models::{
        case::{Case, CaseStatus, CaseType},
        delivery::{ContactMoment, DeliveryReceipt, PersonalizationMap, Template},
        event::{EventAction, NotificationChannel, NotificationEvent, SubjectType},
        party::CommonPartyData,
    },
    processor::EventProcessor,
    queries::QueryServices,
};

pub fn test_config() -> Config {
    Config {
        case_registry_url: "http://case-registry.test".to_string(),
        party_registry_url: "http://party-registry.test".to_string(),
        delivery_api_url: "http://delivery.test".to_string(),
        delivery_api_key: "test-api-key".to_string(),
        contact_registry_url: "http://contact-registry.test".to_string(),
        upstream_timeout_seconds: 5,
        zaak_create_email_template_id: Some("tmpl-create-email".to_string()),
        zaak_create_sms_template_id: Some("tmpl-create-sms".to_string()),
        zaak_create_whitelist: vec!["T-9".to_string()],
        zaak_update_email_template_id: Some("tmpl-update-email".to_string()),
        zaak_update_sms_template_id: Some("tmpl-update-sms".to_string()),
        zaak_update_whitelist: vec!["T-9".to_string()],
        zaak_close_email_template_id: Some("tmpl-close-email".to_string()),
        zaak_close_sms_template_id: Some("tmpl-close-sms".to_string()),
        zaak_close_whitelist: vec!["T-9".to_string()],
    }
}

pub fn case_event(action: EventAction, case_ref: &str) -> NotificationEvent {
    NotificationEvent {
        subject: SubjectType::Case,
        action,
        case_ref: case_ref.to_string(),
        attributes: HashMap::new(),
    }
}

pub fn status(case_type_ref: &str, description: Option<&str>, hour: u32) -> CaseStatus {
    CaseStatus {
        case_type_ref: case_type_ref.to_string(),
        description: description.map(str::to_string),
        recorded_at: Utc.with_ymd_and_hms(2026, 1, 15, hour, 0, 0).unwrap(),
    }
}

pub fn case_type(identification: &str, is_notification_expected: bool) -> CaseType {
    CaseType {
        identification: identification.to_string(),
        name: format!("Case type {}", identification),
        is_notification_expected,
    }
}

pub fn case(identification: &str, case_type_ref: &str) -> Case {
    Case {
        identification: identification.to_string(),
        name: format!("Case {}", identification),
        case_type_ref: case_type_ref.to_string(),
    }
}

pub fn party_with_email(first_name: &str, surname: &str, email: &str) -> CommonPartyData {
    CommonPartyData {
        first_name: first_name.to_string(),
        surname_prefix: None,
        surname: surname.to_string(),
        phone: None,
        email: Some(email.to_string()),
    }
}

pub fn party_with_phone(first_name: &str, surname: &str, phone: &str) -> CommonPartyData {
    CommonPartyData {
        first_name: first_name.to_string(),
        surname_prefix: None,
        surname: surname.to_string(),
        phone: Some(phone.to_string()),
        email: None,
    }
}

#[derive(Default)]
pub struct MockCaseRegistry {
    pub statuses: HashMap<String, Vec<CaseStatus>>,
    pub case_types: HashMap<String, CaseType>,
    pub cases: HashMap<String, Case>,
    pub fail_statuses: bool,
    pub case_type_delay_ms: u64,
    pub case_type_failures_remaining: AtomicU32,
    pub status_calls: AtomicU32,
    pub case_type_calls: AtomicU32,
    pub case_calls: AtomicU32,
}

impl MockCaseRegistry {
    pub fn single_case(case_ref: &str, case_type_ref: &str, statuses: Vec<CaseStatus>) -> Self {
        Self {
            statuses: HashMap::from([(case_ref.to_string(), statuses)]),
            case_types: HashMap::from([(case_type_ref.to_string(), case_type(case_type_ref, true))]),
            cases: HashMap::from([(case_ref.to_string(), case(case_ref, case_type_ref))]),
            ..Self::default()
        }
    }

    pub fn upstream_calls(&self) -> u32 {
        self.status_calls.load(Ordering::SeqCst)
            + self.case_type_calls.load(Ordering::SeqCst)
            + self.case_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CaseRegistry for MockCaseRegistry {
    async fn get_case_statuses(&self, case_ref: &str) -> Result<Vec<CaseStatus>, ProcessingError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_statuses {
            return Err(ProcessingError::UpstreamUnavailable {
                service: "case registry",
                detail: "request timed out".to_string(),
            });
        }

        self.statuses
            .get(case_ref)
            .cloned()
            .ok_or_else(|| ProcessingError::DataNotFound {
                service: "case registry",
                reference: case_ref.to_string(),
            })
    }

    async fn get_case_type(&self, case_type_ref: &str) -> Result<CaseType, ProcessingError> {
        self.case_type_calls.fetch_add(1, Ordering::SeqCst);

        if self.case_type_delay_ms > 0 {
            sleep(Duration::from_millis(self.case_type_delay_ms)).await;
        }

        let remaining = self.case_type_failures_remaining.load(Ordering::SeqCst);
        if remaining > 0 {
            self.case_type_failures_remaining
                .fetch_sub(1, Ordering::SeqCst);
            return Err(ProcessingError::UpstreamUnavailable {
                service: "case registry",
                detail: "request timed out".to_string(),
            });
        }

        self.case_types
            .get(case_type_ref)
            .cloned()
            .ok_or_else(|| ProcessingError::DataNotFound {
                service: "case registry",
                reference: case_type_ref.to_string(),
            })
    }

    async fn get_case(&self, case_ref: &str) -> Result<Case, ProcessingError> {
        self.case_calls.fetch_add(1, Ordering::SeqCst);

        self.cases
            .get(case_ref)
            .cloned()
            .ok_or_else(|| ProcessingError::DataNotFound {
                service: "case registry",
                reference: case_ref.to_string(),
            })
    }
}

#[derive(Default)]
pub struct MockPartyRegistry {
    pub parties: HashMap<String, CommonPartyData>,
    pub calls: AtomicU32,
}

impl MockPartyRegistry {
    pub fn single_party(case_ref: &str, party: CommonPartyData) -> Self {
        Self {
            parties: HashMap::from([(case_ref.to_string(), party)]),
            calls: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl PartyRegistry for MockPartyRegistry {
    async fn get_party_data(&self, case_ref: &str) -> Result<CommonPartyData, ProcessingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        self.parties
            .get(case_ref)
            .cloned()
            .ok_or_else(|| ProcessingError::DataNotFound {
                service: "party registry",
                reference: case_ref.to_string(),
            })
    }
}

#[derive(Clone, Copy, PartialEq)]
pub enum SendBehavior {
    Succeed,
    FailTransient,
    Reject,
}

#[derive(Debug, Clone)]
pub struct SentNotification {
    pub channel: NotificationChannel,
    pub address: String,
    pub template_id: String,
    pub personalization: PersonalizationMap,
}

pub struct MockDeliveryProvider {
    pub templates: Vec<Template>,
    pub behavior: SendBehavior,
    pub send_delay_ms: u64,
    pub send_calls: AtomicU32,
    pub sent: Mutex<Vec<SentNotification>>,
}

impl MockDeliveryProvider {
    pub fn new(behavior: SendBehavior) -> Self {
        let templates = [
            "tmpl-create-email",
            "tmpl-update-email",
            "tmpl-close-email",
        ]
        .iter()
        .map(|id| Template {
            id: (*id).to_string(),
            channel: NotificationChannel::Email,
            name: (*id).to_string(),
        })
        .chain(
            ["tmpl-create-sms", "tmpl-update-sms", "tmpl-close-sms"]
                .iter()
                .map(|id| Template {
                    id: (*id).to_string(),
                    channel: NotificationChannel::Sms,
                    name: (*id).to_string(),
                }),
        )
        .collect();

        Self {
            templates,
            behavior,
            send_delay_ms: 0,
            send_calls: AtomicU32::new(0),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent_notifications(&self) -> Vec<SentNotification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeliveryProvider for MockDeliveryProvider {
    async fn list_templates(
        &self,
        channel: NotificationChannel,
    ) -> Result<Vec<Template>, ProcessingError> {
        Ok(self
            .templates
            .iter()
            .filter(|t| t.channel == channel)
            .cloned()
            .collect())
    }

    async fn send(
        &self,
        channel: NotificationChannel,
        address: &str,
        template_id: &str,
        personalization: &PersonalizationMap,
    ) -> Result<DeliveryReceipt, ProcessingError> {
        self.send_calls.fetch_add(1, Ordering::SeqCst);

        if self.send_delay_ms > 0 {
            sleep(Duration::from_millis(self.send_delay_ms)).await;
        }

        match self.behavior {
            SendBehavior::FailTransient => {
                Err(ProcessingError::DeliveryFailed("status 503".to_string()))
            }
            SendBehavior::Reject => Err(ProcessingError::DeliveryRejected(
                "template not found".to_string(),
            )),
            SendBehavior::Succeed => {
                self.sent.lock().unwrap().push(SentNotification {
                    channel,
                    address: address.to_string(),
                    template_id: template_id.to_string(),
                    personalization: personalization.clone(),
                });

                Ok(DeliveryReceipt {
                    id: Uuid::new_v4(),
                    channel,
                    template_id: template_id.to_string(),
                })
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReportedCompletion {
    pub case_ref: String,
    pub channel: Option<NotificationChannel>,
    pub outcome: String,
}

#[derive(Default)]
pub struct MockCompletionSink {
    pub fail: bool,
    pub reports: Mutex<Vec<ReportedCompletion>>,
}

impl MockCompletionSink {
    pub fn failing() -> Self {
        Self {
            fail: true,
            reports: Mutex::new(Vec::new()),
        }
    }

    pub fn reported(&self) -> Vec<ReportedCompletion> {
        self.reports.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionSink for MockCompletionSink {
    async fn report_completion(
        &self,
        event: &NotificationEvent,
        channel: Option<NotificationChannel>,
        outcome: &str,
    ) -> Result<ContactMoment, ProcessingError> {
        self.reports.lock().unwrap().push(ReportedCompletion {
            case_ref: event.case_ref.clone(),
            channel,
            outcome: outcome.to_string(),
        });

        if self.fail {
            return Err(ProcessingError::TelemetryFailed("status 502".to_string()));
        }

        Ok(ContactMoment {
            id: Uuid::new_v4(),
            status: "registered".to_string(),
        })
    }
}

pub struct TestHarness {
    pub case_registry: Arc<MockCaseRegistry>,
    pub party_registry: Arc<MockPartyRegistry>,
    pub delivery: Arc<MockDeliveryProvider>,
    pub sink: Arc<MockCompletionSink>,
    pub processor: EventProcessor,
}

pub fn harness(
    config: Config,
    case_registry: MockCaseRegistry,
    party_registry: MockPartyRegistry,
    delivery: MockDeliveryProvider,
    sink: MockCompletionSink,
) -> TestHarness {
    let case_registry = Arc::new(case_registry);
    let party_registry = Arc::new(party_registry);
    let delivery = Arc::new(delivery);
    let sink = Arc::new(sink);

    let processor = EventProcessor::new(
        config,
        QueryServices::new(
            Arc::clone(&case_registry) as Arc<dyn CaseRegistry>,
            Arc::clone(&party_registry) as Arc<dyn PartyRegistry>,
        ),
        Arc::clone(&delivery) as Arc<dyn DeliveryProvider>,
        Arc::clone(&sink) as Arc<dyn CompletionSink>,
    );

    TestHarness {
        case_registry,
        party_registry,
        delivery,
        sink,
        processor,
    }
}

pub fn default_harness(case_ref: &str, party: CommonPartyData) -> TestHarness {
    harness(
        test_config(),
        MockCaseRegistry::single_case(case_ref, "T-9", vec![status("T-9", None, 9)]),
        MockPartyRegistry::single_party(case_ref, party),
        MockDeliveryProvider::new(SendBehavior::Succeed),
        MockCompletionSink::default(),
    )
}
