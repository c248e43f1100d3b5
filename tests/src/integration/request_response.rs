//! Request-to-response flow: routing, correlation chain, fan-out.

use std::collections::BTreeMap;
use std::time::Duration;

use eventline_bus::{BrokerRecord, RecordPublisher, TopicFilter};
use eventline_types::headers;
use eventline_verify::{AwaitConfig, EventReceiver};
use tokio::time::{sleep, timeout};

use crate::harness::{
    customer_create_success, Customer, PipelineHarness, EVENT_TOPIC, SERVICE_NAME,
};

/// Receiver over the harness store that gives up quickly, for asserting
/// that something does NOT arrive.
fn impatient_receiver(harness: &PipelineHarness) -> EventReceiver {
    EventReceiver::with_config(
        harness.store.clone(),
        AwaitConfig::default()
            .with_poll_interval(Duration::from_millis(20))
            .with_timeout(Duration::from_millis(300)),
    )
}

#[tokio::test]
async fn test_create_request_yields_correlated_success() {
    let harness = PipelineHarness::new();

    let customer = Customer {
        name: "Jo".to_string(),
    };
    let action_id = harness.send_request("CUSTOMER_CREATE", &customer).await;

    let reply: Customer = harness
        .receiver
        .await_result(&action_id, &customer_create_success())
        .await
        .expect("success response");
    assert_eq!(reply, customer);
}

#[tokio::test]
async fn test_response_has_fresh_id_and_service_originator() {
    let harness = PipelineHarness::new();

    let action_id = harness
        .send_request("CUSTOMER_CREATE", &Customer { name: "Jo".into() })
        .await;
    harness
        .receiver
        .await_event(&action_id, &customer_create_success())
        .await
        .expect("success response");

    let found = harness
        .store
        .find_correlated(customer_create_success().key(), &action_id);
    assert_eq!(found.len(), 1);

    let (_, response_headers) = &found[0];
    assert_ne!(response_headers[headers::ACTION_ID], action_id);
    assert_eq!(response_headers[headers::PARENT_ACTION_ID], action_id);
    assert_eq!(response_headers[headers::MESSAGE_ORIGINATOR], SERVICE_NAME);
}

#[tokio::test]
async fn test_response_preserves_parent_of_chained_request() {
    let harness = PipelineHarness::new();

    let root_id = "11111111-2222-3333-4444-555555555555";
    let action_id = harness
        .send_request_with_parent(
            "CUSTOMER_CREATE",
            &Customer { name: "Jo".into() },
            Some(root_id),
        )
        .await;

    // The response correlates to the chain root, not to the request itself.
    harness
        .receiver
        .await_event(root_id, &customer_create_success())
        .await
        .expect("response correlated to root");

    let err = impatient_receiver(&harness)
        .await_event(&action_id, &customer_create_success())
        .await
        .expect_err("nothing correlates to the intermediate id");
    assert!(matches!(
        err,
        eventline_verify::AwaitError::Timeout { .. }
    ));
}

#[tokio::test]
async fn test_unroutable_request_is_dropped_silently() {
    let harness = PipelineHarness::new();

    harness
        .send_request("ORDER_SUBMIT", &Customer { name: "Jo".into() })
        .await;
    sleep(Duration::from_millis(150)).await;
    assert!(harness.store.is_empty());

    // Pipeline is still alive afterwards
    let action_id = harness
        .send_request("CUSTOMER_CREATE", &Customer { name: "Jo".into() })
        .await;
    harness
        .receiver
        .await_event(&action_id, &customer_create_success())
        .await
        .expect("pipeline still serving");
}

#[tokio::test]
async fn test_record_without_action_id_is_dropped() {
    let harness = PipelineHarness::new();

    let map = BTreeMap::from([(
        headers::ACTION_TYPE.to_string(),
        "CUSTOMER_CREATE".to_string(),
    )]);
    harness
        .broker
        .publish(
            BrokerRecord::new(EVENT_TOPIC, br#"{"name":"Jo"}"#.to_vec())
                .with_string_headers(&map),
        )
        .await
        .unwrap();

    sleep(Duration::from_millis(150)).await;
    assert!(harness.store.is_empty());
}

#[tokio::test]
async fn test_fanout_emits_one_response_per_route() {
    let harness = PipelineHarness::with_fanout();

    let action_id = harness
        .send_request("CUSTOMER_CREATE", &Customer { name: "Jo".into() })
        .await;

    let key = customer_create_success();
    let deadline = tokio::time::Instant::now() + Duration::from_secs(3);
    loop {
        let found = harness.store.find_correlated(key.key(), &action_id);
        if found.len() == 2 {
            let first = &found[0].1[headers::ACTION_ID];
            let second = &found[1].1[headers::ACTION_ID];
            assert_ne!(first, second);
            break;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "expected 2 responses, found {}",
            found.len()
        );
        sleep(Duration::from_millis(20)).await;
    }
}

#[tokio::test]
async fn test_failing_request_does_not_disturb_concurrent_success() {
    let harness = PipelineHarness::new();

    let delete_id = harness
        .send_request("CUSTOMER_DELETE", &Customer { name: "Jo".into() })
        .await;
    let create_id = harness
        .send_request("CUSTOMER_CREATE", &Customer { name: "Bo".into() })
        .await;

    let reply: Customer = harness
        .receiver
        .await_result(&create_id, &customer_create_success())
        .await
        .expect("success unaffected by failing sibling");
    assert_eq!(reply.name, "Bo");

    harness
        .receiver
        .await_event(&delete_id, &crate::harness::customer_delete_failure())
        .await
        .expect("failure response recorded");
}

#[tokio::test]
async fn test_raw_response_record_shape() {
    // Observe the response on the wire rather than through the store.
    let harness = PipelineHarness::new();
    let mut responses = harness.broker.subscribe(TopicFilter::topics([EVENT_TOPIC]));

    let action_id = harness
        .send_request("CUSTOMER_CREATE", &Customer { name: "Jo".into() })
        .await;

    // First record seen is our own request; the response follows.
    let response = loop {
        let record = timeout(Duration::from_secs(2), responses.recv())
            .await
            .expect("timed out on wire")
            .expect("broker closed");
        let decoded = record.string_headers();
        if decoded.get(headers::ACTION_TYPE).map(String::as_str) == Some("CUSTOMER_CREATE_SUCCESS")
        {
            break record;
        }
    };

    let decoded = response.string_headers();
    // Record key mirrors the response's own action id
    assert_eq!(response.key.as_deref(), Some(decoded[headers::ACTION_ID].as_str()));
    assert_eq!(decoded[headers::PARENT_ACTION_ID], action_id);
    // Payload is the bare reply, not a wrapped envelope
    let reply: Customer = serde_json::from_slice(&response.payload).unwrap();
    assert_eq!(reply.name, "Jo");
}
