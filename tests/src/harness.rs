//! Shared pipeline harness wiring the whole system together: an in-memory
//! broker, a dispatcher with sample routes, the verification sink, and an
//! await receiver with a test-friendly cadence.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use eventline_bus::{BrokerRecord, InMemoryBroker, RecordPublisher, TopicFilter};
use eventline_dispatch::{
    DispatcherConfig, EventDispatcher, Responder, ResponderConfig, RouteListener, RouteRegistry,
    TopicRoute,
};
use eventline_types::{Envelope, EnvelopeHeaders, EventError, JsonCodec};
use eventline_verify::{
    AwaitConfig, EventDefinition, EventKey, EventReceiver, EventRegistry, EventSink, EventStore,
    SinkConfig,
};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use uuid::Uuid;

/// The single topic both requests and responses travel on.
pub const EVENT_TOPIC: &str = "EVENT_TOPIC";

/// Originator name the responder stamps on every response.
pub const SERVICE_NAME: &str = "billing-service";

/// Initialize test logging once; repeated calls are no-ops.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Sample payload handled by the customer routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
}

/// Echoes the customer back, the happy-path route.
pub struct CustomerCreateRoute;

#[async_trait]
impl TopicRoute for CustomerCreateRoute {
    type Payload = Customer;
    type Reply = Customer;

    fn supports(&self, action_type: &str) -> bool {
        action_type == "CUSTOMER_CREATE"
    }

    async fn apply(&self, envelope: Envelope<Customer>) -> anyhow::Result<Customer> {
        Ok(envelope.payload)
    }
}

/// Receipt reply emitted by [`CustomerNotifyRoute`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
}

/// Second independent route on the same action type, exercising fan-out.
/// Only registered by [`PipelineHarness::with_fanout`].
pub struct CustomerNotifyRoute;

#[async_trait]
impl TopicRoute for CustomerNotifyRoute {
    type Payload = Customer;
    type Reply = Notification;

    fn supports(&self, action_type: &str) -> bool {
        action_type == "CUSTOMER_CREATE"
    }

    async fn apply(&self, envelope: Envelope<Customer>) -> anyhow::Result<Notification> {
        Ok(Notification {
            message: format!("notified {}", envelope.payload.name),
        })
    }
}

/// Always fails with "not found", the failure-path route.
pub struct CustomerDeleteRoute;

#[async_trait]
impl TopicRoute for CustomerDeleteRoute {
    type Payload = Customer;
    type Reply = Customer;

    fn supports(&self, action_type: &str) -> bool {
        action_type == "CUSTOMER_DELETE"
    }

    async fn apply(&self, _envelope: Envelope<Customer>) -> anyhow::Result<Customer> {
        anyhow::bail!("not found")
    }
}

/// Definition of the create-success response event.
pub fn customer_create_success() -> EventDefinition<Customer> {
    EventDefinition::new("CUSTOMER_CREATE_SUCCESS", EVENT_TOPIC).with_originator(SERVICE_NAME)
}

/// Definition of the delete-failure response event.
pub fn customer_delete_failure() -> EventDefinition<EventError> {
    EventDefinition::new("CUSTOMER_DELETE_FAILURE", EVENT_TOPIC).with_originator(SERVICE_NAME)
}

fn event_registry() -> EventRegistry {
    EventRegistry::new([
        EventKey::new("CUSTOMER_CREATE_SUCCESS", EVENT_TOPIC).with_originator(SERVICE_NAME),
        EventKey::new("CUSTOMER_CREATE_FAILURE", EVENT_TOPIC).with_originator(SERVICE_NAME),
        EventKey::new("CUSTOMER_DELETE_SUCCESS", EVENT_TOPIC).with_originator(SERVICE_NAME),
        EventKey::new("CUSTOMER_DELETE_FAILURE", EVENT_TOPIC).with_originator(SERVICE_NAME),
    ])
}

/// Everything wired: broker, listener-fed dispatcher, sink, receiver.
pub struct PipelineHarness {
    pub broker: Arc<InMemoryBroker>,
    pub store: Arc<EventStore>,
    pub receiver: EventReceiver,
    listener: JoinHandle<()>,
    sink: JoinHandle<()>,
}

impl PipelineHarness {
    /// Wire the full pipeline with test-friendly poll cadence.
    pub fn new() -> Self {
        Self::build(false)
    }

    /// As [`new`](Self::new), but with a second route on `CUSTOMER_CREATE`
    /// so one request produces two independent responses.
    pub fn with_fanout() -> Self {
        Self::build(true)
    }

    fn build(fanout: bool) -> Self {
        init_tracing();

        let broker = Arc::new(InMemoryBroker::new());

        let mut builder = RouteRegistry::builder()
            .register(CustomerCreateRoute)
            .register(CustomerDeleteRoute);
        if fanout {
            builder = builder.register(CustomerNotifyRoute);
        }
        let registry = builder.build();
        let responder = Arc::new(Responder::new(
            broker.clone(),
            ResponderConfig::new(SERVICE_NAME).with_response_topic(EVENT_TOPIC),
        ));
        let dispatcher = Arc::new(EventDispatcher::new(
            Arc::new(registry),
            responder,
            DispatcherConfig::default(),
        ));
        let listener =
            RouteListener::spawn(&broker, TopicFilter::topics([EVENT_TOPIC]), dispatcher);

        let store = Arc::new(EventStore::new());
        let sink = EventSink::spawn(
            &broker,
            Arc::new(event_registry()),
            store.clone(),
            SinkConfig::default().with_poll_wait(Duration::from_millis(50)),
        );

        let receiver = EventReceiver::with_config(
            store.clone(),
            AwaitConfig::default()
                .with_poll_interval(Duration::from_millis(20))
                .with_timeout(Duration::from_secs(3)),
        );

        Self {
            broker,
            store,
            receiver,
            listener,
            sink,
        }
    }

    /// Publish a request envelope the way an upstream producer would,
    /// returning its fresh `actionId`.
    pub async fn send_request<T: Serialize>(&self, action_type: &str, payload: &T) -> String {
        self.send_request_with_parent(action_type, payload, None)
            .await
    }

    /// As [`send_request`](Self::send_request) with an explicit parent id.
    pub async fn send_request_with_parent<T: Serialize>(
        &self,
        action_type: &str,
        payload: &T,
        parent_action_id: Option<&str>,
    ) -> String {
        let headers = EnvelopeHeaders {
            action_id: Uuid::new_v4().to_string(),
            parent_action_id: parent_action_id.map(ToString::to_string),
            message_originator: Some("test-client".to_string()),
            action_type: action_type.to_string(),
        };
        let action_id = headers.action_id.clone();

        let payload = JsonCodec.encode(payload).expect("encodable payload");
        let record = BrokerRecord::new(EVENT_TOPIC, payload)
            .with_key(action_id.clone())
            .with_string_headers(&headers.to_map());
        self.broker.publish(record).await.expect("publish request");

        action_id
    }
}

impl Default for PipelineHarness {
    fn default() -> Self {
        Self::new()
    }
}
