//! Factory and destination lookup share one fallback convention.

use std::sync::Arc;

use correlated_reply::broker::{Destination, InMemoryBroker};
use correlated_reply::naming::{InMemoryContext, LookupStrategy, NamingError, Resolver};
use correlated_reply::{
    ConnectError, ConsumerConfig, CorrelatedConsumer, DestinationName, MessageError,
};

/// A consumer listening on the movement module's reply queue.
struct MovementReplies;

impl DestinationName for MovementReplies {
    fn destination_name(&self) -> &str {
        "jms/queue/UVMSMovementEvent"
    }
}

#[test]
fn destination_falls_back_like_the_factory() {
    let context = InMemoryContext::new()
        .bind_factory("ConnectionFactory", Arc::new(InMemoryBroker::new()))
        .bind_destination("java:/jms/queue/UVMSMovementEvent", Destination::queue("UVMSMovementEvent"));

    let consumer =
        CorrelatedConsumer::initialize(&context, &MovementReplies, &ConsumerConfig::default())
            .ok()
            .unwrap();

    assert_eq!(consumer.destination().name(), "UVMSMovementEvent");
    assert_eq!(
        context.lookups(),
        vec![
            "ConnectionFactory",
            "jms/queue/UVMSMovementEvent",
            "java:/jms/queue/UVMSMovementEvent",
        ]
    );
}

#[test]
fn custom_fallback_prefix_from_config() {
    let context = InMemoryContext::new()
        .bind_factory("java:jboss/exported/ConnectionFactory", Arc::new(InMemoryBroker::new()))
        .bind_destination("jms/queue/UVMSMovementEvent", Destination::queue("UVMSMovementEvent"));
    let config = ConsumerConfig::from_json(r#"{ "fallback_prefix": "java:jboss/exported/" }"#).unwrap();

    assert!(CorrelatedConsumer::initialize(&context, &MovementReplies, &config).is_ok());
}

#[test]
fn missing_destination_is_a_connection_error() {
    let context = InMemoryContext::new().bind_factory("ConnectionFactory", Arc::new(InMemoryBroker::new()));

    let err = CorrelatedConsumer::initialize(&context, &MovementReplies, &ConsumerConfig::default())
        .err()
        .unwrap();

    match err {
        MessageError::Connection(ConnectError::Lookup(NamingError::Exhausted { name, tried })) => {
            assert_eq!(name, "jms/queue/UVMSMovementEvent");
            assert_eq!(
                tried,
                vec!["jms/queue/UVMSMovementEvent", "java:/jms/queue/UVMSMovementEvent"]
            );
        }
        other => panic!("expected connection error, got {:?}", other),
    }
}

#[test]
fn primary_only_resolver_never_falls_back() {
    let context = InMemoryContext::new()
        .bind_factory("java:/ConnectionFactory", Arc::new(InMemoryBroker::new()));
    let resolver = Resolver::new(vec![LookupStrategy::Primary]);

    assert!(matches!(
        resolver.resolve_factory(&context, "ConnectionFactory"),
        Err(NamingError::Exhausted { .. })
    ));
    assert_eq!(context.lookups(), vec!["ConnectionFactory"]);
}
