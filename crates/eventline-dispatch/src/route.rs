//! Route traits: the typed handler surface and its object-safe erasure.

use async_trait::async_trait;
use eventline_types::{CodecError, Envelope, EventError, JsonCodec};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A predicate-guarded handler bound to one or more action types.
///
/// Routes are registered once at startup and never mutated afterwards. Many
/// routes may support the same action type; each is invoked independently.
#[async_trait]
pub trait TopicRoute: Send + Sync {
    /// The shape this route expects its payload decoded into.
    type Payload: DeserializeOwned + Send;

    /// The reply carried by the success response.
    type Reply: Serialize + Send;

    /// Membership test over the action type.
    fn supports(&self, action_type: &str) -> bool;

    /// Business logic. Any error becomes a `_FAILURE` response payload.
    async fn apply(&self, envelope: Envelope<Self::Payload>) -> anyhow::Result<Self::Reply>;
}

/// Outcome of one erased dispatch unit.
#[derive(Debug)]
pub enum RouteOutcome {
    /// Handler succeeded; reply already encoded for the response payload.
    Success(Vec<u8>),

    /// Handler failed; structured error to carry in the failure response.
    Failure(EventError),

    /// The unit was abandoned before the handler could finish: the payload
    /// did not decode into the route's shape, or the reply would not encode.
    /// No response is emitted.
    Abandoned(CodecError),
}

/// Object-safe counterpart of [`TopicRoute`], held by the registry.
///
/// The blanket impl erases the payload and reply types so heterogeneous
/// routes can live in one `Vec<Arc<dyn ErasedRoute>>`.
#[async_trait]
pub trait ErasedRoute: Send + Sync {
    /// Route name for logging.
    fn name(&self) -> &'static str;

    /// Membership test over the action type.
    fn supports(&self, action_type: &str) -> bool;

    /// Decode, apply, and encode in one unit.
    async fn run(&self, envelope: &Envelope<Vec<u8>>) -> RouteOutcome;
}

#[async_trait]
impl<R: TopicRoute> ErasedRoute for R {
    fn name(&self) -> &'static str {
        std::any::type_name::<R>()
    }

    fn supports(&self, action_type: &str) -> bool {
        TopicRoute::supports(self, action_type)
    }

    async fn run(&self, envelope: &Envelope<Vec<u8>>) -> RouteOutcome {
        let codec = JsonCodec;

        let payload: R::Payload = match codec.decode(&envelope.payload) {
            Ok(payload) => payload,
            Err(e) => return RouteOutcome::Abandoned(e),
        };
        let typed = envelope.clone().with_payload(payload);

        match self.apply(typed).await {
            Ok(reply) => match codec.encode(&reply) {
                Ok(bytes) => RouteOutcome::Success(bytes),
                Err(e) => RouteOutcome::Abandoned(e),
            },
            Err(err) => RouteOutcome::Failure(EventError::from(&err)),
        }
    }
}
