use nettu_notifier_domain::{CalendarEvent, CalendarEventKind, Topic};
use nettu_notifier_infra::{
    Broker, InMemoryBroker, InMemoryDeliveryAdapter, InMemoryProducer, NotifierContext,
    StaticTimeSys,
};
use chrono::{Duration, TimeZone, Utc};
use std::sync::Arc;

/// In memory context together with handles to inspect and steer its parts
pub struct TestContext {
    pub ctx: NotifierContext,
    pub broker: Arc<InMemoryBroker>,
    pub producer: Arc<InMemoryProducer>,
    pub delivery: Arc<InMemoryDeliveryAdapter>,
}

/// 2021-02-21T09:00:00Z
pub const NOW: i64 = 1613898000000;

pub fn setup() -> TestContext {
    let broker = InMemoryBroker::new();
    let producer = Arc::new(broker.producer());
    let delivery = Arc::new(InMemoryDeliveryAdapter::new());
    let mut ctx = NotifierContext::create_inmemory_with(
        Broker {
            producer: producer.clone(),
            consumer: Arc::new(broker.consumer()),
        },
        delivery.clone(),
    );
    ctx.sys = Arc::new(StaticTimeSys(NOW));

    TestContext {
        ctx,
        broker,
        producer,
        delivery,
    }
}

impl TestContext {
    pub fn topic(&self, topic: Topic) -> String {
        self.ctx.config.topics.name(topic).to_string()
    }
}

pub fn event_factory(kind: CalendarEventKind, starts_in: Duration) -> CalendarEvent {
    let start_time = Utc.timestamp_millis_opt(NOW).unwrap() + starts_in;
    CalendarEvent {
        id: "evt_1".into(),
        title: "Standup".into(),
        description: None,
        start_time,
        end_time: start_time + Duration::minutes(15),
        owner_id: "user_1".into(),
        kind,
    }
}
