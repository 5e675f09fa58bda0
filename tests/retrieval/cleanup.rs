//! Resources are released exactly once, whichever step fails.

use std::sync::Arc;
use std::time::Duration;

use correlated_reply::broker::{Destination, InMemoryBroker, Sender};
use correlated_reply::consumer::ConnectionManager;
use correlated_reply::{ConnectError, CorrelatedConsumer, MessageError};

use crate::support::{init_tracing, reply, Faults, FlakyBroker};

fn flaky(faults: Faults) -> (Arc<FlakyBroker>, CorrelatedConsumer<FlakyBroker>) {
    init_tracing();
    let broker = Arc::new(FlakyBroker::new(InMemoryBroker::new(), faults));
    let consumer = CorrelatedConsumer::new(Arc::clone(&broker), Destination::queue("replies"));
    (broker, consumer)
}

#[test]
fn connect_failure_opens_nothing_to_close() {
    let (broker, consumer) = flaky(Faults {
        connect: true,
        ..Faults::default()
    });

    let err = consumer
        .get_message::<String>("req-1", Duration::from_millis(50))
        .unwrap_err();

    assert!(matches!(
        err,
        MessageError::Connection(ConnectError::Transport(_))
    ));
    assert_eq!(broker.counts.connects(), 1);
    assert_eq!(broker.counts.closes(), 0);
    assert_eq!(broker.counts.consumers(), 0);
}

#[test]
fn session_failure_closes_half_open_connection() {
    let (broker, consumer) = flaky(Faults {
        session: true,
        ..Faults::default()
    });

    let err = consumer
        .get_message::<String>("req-1", Duration::from_millis(50))
        .unwrap_err();

    assert!(matches!(err, MessageError::Connection(_)));
    assert_eq!(broker.counts.closes(), 1);
    assert_eq!(broker.counts.consumers(), 0);
}

#[test]
fn start_failure_closes_connection() {
    let (broker, consumer) = flaky(Faults {
        start: true,
        ..Faults::default()
    });

    let err = consumer
        .get_message::<String>("req-1", Duration::from_millis(50))
        .unwrap_err();

    assert!(matches!(err, MessageError::Connection(_)));
    assert_eq!(broker.counts.closes(), 1);
}

#[test]
fn subscription_failure_is_retrieval_error() {
    let (broker, consumer) = flaky(Faults {
        consumer: true,
        ..Faults::default()
    });

    let err = consumer
        .get_message::<String>("req-1", Duration::from_millis(50))
        .unwrap_err();

    assert!(matches!(err, MessageError::Retrieval(_)));
    assert_eq!(broker.counts.stops(), 1);
    assert_eq!(broker.counts.closes(), 1);
}

#[test]
fn wait_failure_is_retrieval_error() {
    let (broker, consumer) = flaky(Faults {
        receive: true,
        ..Faults::default()
    });

    let err = consumer
        .get_message::<String>("req-1", Duration::from_millis(50))
        .unwrap_err();

    assert!(matches!(err, MessageError::Retrieval(_)));
    assert_eq!(broker.counts.consumers(), 1);
    assert_eq!(broker.counts.closes(), 1);
}

#[test]
fn stop_failure_does_not_mask_delivered_message() {
    let (broker, consumer) = flaky(Faults {
        stop: true,
        ..Faults::default()
    });
    broker
        .inner
        .send(consumer.destination(), reply("msg-1", "req-1", "ok"))
        .unwrap();

    let text: String = consumer.get_message("req-1", Duration::from_millis(50)).unwrap();

    assert_eq!(text, "ok");
    assert_eq!(broker.counts.stops(), 1);
    assert_eq!(broker.counts.closes(), 1);
}

#[test]
fn close_failure_does_not_mask_timeout() {
    let (broker, consumer) = flaky(Faults {
        close: true,
        ..Faults::default()
    });

    let err = consumer
        .get_message::<String>("req-1", Duration::from_millis(30))
        .unwrap_err();

    assert!(err.is_timeout());
    assert_eq!(broker.counts.closes(), 1);
}

#[test]
fn every_call_closes_its_own_connection() {
    let (broker, consumer) = flaky(Faults::default());

    for i in 0..3 {
        let _ = consumer.get_message::<String>(&format!("req-{}", i), Duration::from_millis(5));
    }

    assert_eq!(broker.counts.connects(), 3);
    assert_eq!(broker.counts.closes(), 3);
    assert_eq!(broker.inner.stats().connections_closed, 3);
}

#[test]
fn second_close_is_a_no_op() {
    let broker = Arc::new(FlakyBroker::new(InMemoryBroker::new(), Faults::default()));
    let manager = ConnectionManager::new(Arc::clone(&broker));

    let mut connection = manager.open().ok().unwrap();
    manager.close(&mut connection);
    manager.close(&mut connection);
    assert!(!connection.is_open());
    drop(connection);

    assert_eq!(broker.counts.stops(), 1);
    assert_eq!(broker.counts.closes(), 1);
}
