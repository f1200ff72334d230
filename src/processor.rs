use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{
    clients::{
        case_registry::HttpCaseRegistry,
        contact_moments::{CompletionSink, HttpCompletionSink},
        delivery::{DeliveryProvider, NotifyDeliveryClient},
        party_registry::HttpPartyRegistry,
    },
    config::Config,
    errors::ProcessingError,
    models::{
        delivery::DeliveryReceipt,
        event::{NotificationChannel, NotificationEvent},
        outcome::EventOutcome,
    },
    queries::QueryServices,
    scenarios::{self, NotificationScenario},
};

/// Guarantees a completion report when an in-flight event is dropped after
/// its delivery attempt has started. Armed right before `send` and disarmed
/// once the normal reporting path takes over; an armed drop spawns the
/// report so the source system is not left waiting on a cancelled event.
struct CompletionGuard {
    telemetry: Arc<dyn CompletionSink>,
    event: NotificationEvent,
    channel: Option<NotificationChannel>,
}

impl CompletionGuard {
    fn new(telemetry: Arc<dyn CompletionSink>, event: NotificationEvent) -> Self {
        Self {
            telemetry,
            event,
            channel: None,
        }
    }

    fn arm(&mut self, channel: NotificationChannel) {
        self.channel = Some(channel);
    }

    fn disarm(&mut self) {
        self.channel = None;
    }
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        let Some(channel) = self.channel.take() else {
            return;
        };

        warn!(
            case_ref = %self.event.case_ref,
            "Event dropped after dispatch started, reporting completion from guard"
        );

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let telemetry = Arc::clone(&self.telemetry);
            let event = self.event.clone();

            handle.spawn(async move {
                if let Err(e) = telemetry
                    .report_completion(&event, Some(channel), "failed")
                    .await
                {
                    warn!(
                        case_ref = %event.case_ref,
                        "Completion reporting for cancelled event failed: {}",
                        e
                    );
                }
            });
        }
    }
}

/// Drives one event through scenario resolution, data preparation,
/// validation, personalization, dispatch, and completion reporting. One
/// instance is shared by all in-flight events; the only shared mutable
/// state behind it is the case-type cache inside [`QueryServices`].
pub struct EventProcessor {
    config: Config,
    queries: QueryServices,
    delivery: Arc<dyn DeliveryProvider>,
    telemetry: Arc<dyn CompletionSink>,
}

impl EventProcessor {
    pub fn new(
        config: Config,
        queries: QueryServices,
        delivery: Arc<dyn DeliveryProvider>,
        telemetry: Arc<dyn CompletionSink>,
    ) -> Self {
        Self {
            config,
            queries,
            delivery,
            telemetry,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ProcessingError> {
        let queries = QueryServices::new(
            Arc::new(HttpCaseRegistry::new(config)?),
            Arc::new(HttpPartyRegistry::new(config)?),
        );

        Ok(Self::new(
            config.clone(),
            queries,
            Arc::new(NotifyDeliveryClient::new(config)?),
            Arc::new(HttpCompletionSink::new(config)?),
        ))
    }

    /// Processes one event to its single terminal outcome. Every exit path
    /// funnels through exactly one completion report, except the two paths
    /// that must not produce any outward call at all: unsupported scenarios
    /// and business rejections.
    pub async fn process_event(&self, event: &NotificationEvent) -> EventOutcome {
        info!(
            subject = %event.subject,
            action = %event.action,
            case_ref = %event.case_ref,
            "Processing notification event"
        );

        let scenario = match scenarios::resolve(event.subject, event.action) {
            Ok(scenario) => scenario,
            Err(e) => {
                info!(
                    subject = %event.subject,
                    action = %event.action,
                    "No scenario mapped, event acknowledged without action: {}",
                    e
                );
                return EventOutcome::Skipped;
            }
        };

        let mut channel: Option<NotificationChannel> = None;
        let mut guard = CompletionGuard::new(Arc::clone(&self.telemetry), event.clone());
        let result = self
            .run_scenario(scenario.as_ref(), event, &mut channel, &mut guard)
            .await;
        guard.disarm();

        match result {
            Ok(receipt) => self.report_delivered(event, &receipt).await,
            Err(e) if e.is_rejection() => {
                info!(
                    case_ref = %event.case_ref,
                    whitelist = scenario.whitelist_name(),
                    "Event rejected before any side effect: {}",
                    e
                );
                EventOutcome::Rejected {
                    reason: e.to_string(),
                }
            }
            Err(e) => self.report_failed(event, channel, e).await,
        }
    }

    async fn run_scenario(
        &self,
        scenario: &dyn NotificationScenario,
        event: &NotificationEvent,
        channel: &mut Option<NotificationChannel>,
        guard: &mut CompletionGuard,
    ) -> Result<DeliveryReceipt, ProcessingError> {
        let data = scenario
            .prepare_data(&self.queries, &self.config, event)
            .await?;

        let selected =
            data.party
                .preferred_channel()
                .ok_or_else(|| ProcessingError::DataNotFound {
                    service: "party registry",
                    reference: format!("no reachable address for case '{}'", event.case_ref),
                })?;
        *channel = Some(selected);

        let template_id = scenario.template_id(&self.config, selected)?;
        let personalization = scenario.personalization(&data, selected);

        debug!(
            channel = %selected,
            template_id,
            placeholders = personalization.len(),
            "Personalization built"
        );

        let address = data
            .party
            .contact_address(selected)
            .ok_or_else(|| ProcessingError::DataNotFound {
                service: "party registry",
                reference: format!("no {} address for case '{}'", selected, event.case_ref),
            })?;

        // From here on a delivery attempt is in flight; if this future is
        // dropped mid-send, the guard still reports completion.
        guard.arm(selected);

        self.delivery
            .send(selected, address, &template_id, &personalization)
            .await
    }

    async fn report_delivered(
        &self,
        event: &NotificationEvent,
        receipt: &DeliveryReceipt,
    ) -> EventOutcome {
        match self
            .telemetry
            .report_completion(event, Some(receipt.channel), "delivered")
            .await
        {
            Ok(contact_moment) => {
                info!(
                    case_ref = %event.case_ref,
                    delivery_id = %receipt.id,
                    contact_moment_id = %contact_moment.id,
                    "Notification delivered and completion reported"
                );
                EventOutcome::Delivered {
                    contact_moment_id: Some(contact_moment.id),
                }
            }
            // The message was sent; a failed acknowledgement must not be
            // presented as a failed notification.
            Err(e) => {
                warn!(
                    case_ref = %event.case_ref,
                    delivery_id = %receipt.id,
                    "Delivered, but completion reporting failed: {}",
                    e
                );
                EventOutcome::Delivered {
                    contact_moment_id: None,
                }
            }
        }
    }

    async fn report_failed(
        &self,
        event: &NotificationEvent,
        channel: Option<NotificationChannel>,
        error: ProcessingError,
    ) -> EventOutcome {
        warn!(case_ref = %event.case_ref, "Event processing failed: {}", error);

        if let Err(report_err) = self
            .telemetry
            .report_completion(event, channel, "failed")
            .await
        {
            warn!(
                case_ref = %event.case_ref,
                "Completion reporting failed after processing failure: {}",
                report_err
            );
        }

        EventOutcome::Failed {
            reason: error.to_string(),
        }
    }

    /// Startup check: every configured template id must exist at the
    /// delivery provider.
    pub async fn verify_template_configuration(&self) -> Result<(), ProcessingError> {
        for channel in [NotificationChannel::Email, NotificationChannel::Sms] {
            let templates = self.delivery.list_templates(channel).await?;
            let known: HashSet<&str> = templates.iter().map(|t| t.id.as_str()).collect();

            for (key, configured) in self.configured_templates(channel) {
                if let Some(id) = configured
                    && !known.contains(id.as_str())
                {
                    return Err(ProcessingError::Configuration(format!(
                        "{} refers to unknown {} template '{}'",
                        key, channel, id
                    )));
                }
            }

            info!(%channel, template_count = templates.len(), "Template configuration verified");
        }

        Ok(())
    }

    fn configured_templates(
        &self,
        channel: NotificationChannel,
    ) -> Vec<(&'static str, &Option<String>)> {
        match channel {
            NotificationChannel::Email => vec![
                (
                    "ZAAK_CREATE_EMAIL_TEMPLATE_ID",
                    &self.config.zaak_create_email_template_id,
                ),
                (
                    "ZAAK_UPDATE_EMAIL_TEMPLATE_ID",
                    &self.config.zaak_update_email_template_id,
                ),
                (
                    "ZAAK_CLOSE_EMAIL_TEMPLATE_ID",
                    &self.config.zaak_close_email_template_id,
                ),
            ],
            NotificationChannel::Sms => vec![
                (
                    "ZAAK_CREATE_SMS_TEMPLATE_ID",
                    &self.config.zaak_create_sms_template_id,
                ),
                (
                    "ZAAK_UPDATE_SMS_TEMPLATE_ID",
                    &self.config.zaak_update_sms_template_id,
                ),
                (
                    "ZAAK_CLOSE_SMS_TEMPLATE_ID",
                    &self.config.zaak_close_sms_template_id,
                ),
            ],
        }
    }
}
