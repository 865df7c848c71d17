use super::Broker;
use crate::tests::support::message;
use crate::transport::message::ServerEvent;

fn received(event: ServerEvent) -> String {
    match event {
        ServerEvent::ReceiveMessage { message } => message.body,
        other => panic!("expected receiveMessage, got {other:?}"),
    }
}

#[test]
fn test_broker_new() {
    let broker = Broker::default();
    assert!(broker.listeners.is_empty());
}

#[test]
fn test_subscribe_and_unsubscribe() {
    let mut broker = Broker::new();
    let sub = broker.subscribe();
    assert!(broker.listeners.contains_key(&sub.id));

    broker.unsubscribe(&sub.id);
    assert!(!broker.listeners.contains_key(&sub.id));

    // idempotent
    broker.unsubscribe(&sub.id);
    assert_eq!(broker.listener_count(), 0);
}

#[test]
fn test_publish_reaches_every_listener() {
    let mut broker = Broker::new();
    let mut a = broker.subscribe();
    let mut b = broker.subscribe();

    assert_eq!(broker.publish(&message("User", "hello")), 2);

    assert_eq!(received(a.events.try_recv().unwrap()), "hello");
    assert_eq!(received(b.events.try_recv().unwrap()), "hello");
}

#[test]
fn test_publish_preserves_order_per_listener() {
    let mut broker = Broker::new();
    let mut sub = broker.subscribe();

    for i in 0..20 {
        broker.publish(&message("User", &format!("m{i}")));
    }

    let bodies: Vec<_> = (0..20)
        .map(|_| received(sub.events.try_recv().unwrap()))
        .collect();
    let expected: Vec<_> = (0..20).map(|i| format!("m{i}")).collect();
    assert_eq!(bodies, expected);
    assert!(sub.events.try_recv().is_err());
}

#[test]
fn test_dead_listener_is_isolated_and_pruned() {
    let mut broker = Broker::new();
    let dead = broker.subscribe();
    let mut alive = broker.subscribe();
    let dead_id = dead.id.clone();
    drop(dead);

    assert_eq!(broker.publish(&message("User", "still here")), 1);
    assert_eq!(received(alive.events.try_recv().unwrap()), "still here");
    assert!(!broker.listeners.contains_key(&dead_id));
    assert_eq!(broker.listener_count(), 1);
}

#[test]
fn test_deliver_targets_one_listener() {
    let mut broker = Broker::new();
    let mut a = broker.subscribe();
    let mut b = broker.subscribe();

    assert!(broker.deliver(&a.id, ServerEvent::history(vec![])));
    assert!(matches!(
        a.events.try_recv().unwrap(),
        ServerEvent::PreviousMessages { messages } if messages.is_empty()
    ));
    assert!(b.events.try_recv().is_err());

    let gone = b.id.clone();
    broker.unsubscribe(&gone);
    assert!(!broker.deliver(&gone, ServerEvent::error("nope")));
}

#[test]
fn test_publish_with_no_listeners() {
    let mut broker = Broker::new();
    assert_eq!(broker.publish(&message("AI", "echo")), 0);
}
