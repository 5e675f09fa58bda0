//! Request/reply against the in-memory broker.
//!
//! A responder thread answers requests on `jms/queue/UVMSRulesEvent`; the
//! caller blocks on the reply with the matching correlation id.
//!
//! Run with `RUST_LOG=correlated_reply=trace cargo run --example request_reply`.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use correlated_reply::broker::{Destination, InMemoryBroker, Message, Sender};
use correlated_reply::naming::InMemoryContext;
use correlated_reply::{ConsumerConfig, CorrelatedConsumer, DestinationName, Json, MessageError};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

struct RulesReplies;

impl DestinationName for RulesReplies {
    fn destination_name(&self) -> &str {
        "jms/queue/UVMSRulesEvent"
    }
}

#[derive(Debug, Deserialize)]
struct RuleVerdict {
    rule: String,
    triggered: bool,
}

fn main() -> Result<(), MessageError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let broker = Arc::new(InMemoryBroker::new());
    let context = InMemoryContext::new()
        .bind_factory("java:/ConnectionFactory", Arc::clone(&broker))
        .bind_destination("jms/queue/UVMSRulesEvent", Destination::queue("UVMSRulesEvent"));

    let consumer = CorrelatedConsumer::initialize(&context, &RulesReplies, &ConsumerConfig::default())?;

    // Responder: answers "req-1" after a short delay, never answers "req-2".
    let responder = Arc::clone(&broker);
    let replies = consumer.destination().clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_millis(300));
        let reply = Message::with_string_payload(
            "msg-1",
            r#"{"rule":"speed-over-20kn","triggered":true}"#,
        )
        .correlated("req-1");
        if let Err(err) = responder.send(&replies, reply) {
            eprintln!("responder failed: {}", err);
        }
    });

    let Json(verdict) = consumer.get_message::<Json<RuleVerdict>>("req-1", Duration::from_secs(2))?;
    println!("req-1 -> {} triggered={}", verdict.rule, verdict.triggered);

    match consumer.get_message::<String>("req-2", Duration::from_millis(500)) {
        Err(err) if err.is_timeout() => println!("req-2 -> {}", err),
        other => println!("req-2 -> unexpected {:?}", other),
    }

    println!("broker stats: {:?}", broker.stats());
    Ok(())
}
