use super::{BrokerError, IMessageConsumer, IMessageProducer, InboundMessage};
use std::{
    collections::{HashMap, HashSet, VecDeque},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
};
use tokio::sync::Notify;

#[derive(Default)]
struct BrokerState {
    subscribed: HashSet<String>,
    queue: VecDeque<InboundMessage>,
    published: Vec<InboundMessage>,
    acked: Vec<InboundMessage>,
    offsets: HashMap<String, i64>,
}

/// A single partition broker living in memory. Published messages on a
/// subscribed topic are delivered to the consumer, everything published is
/// kept in a log that tests can inspect.
#[derive(Default)]
pub struct InMemoryBroker {
    state: Mutex<BrokerState>,
    notify: Notify,
}

impl InMemoryBroker {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Appends a message to the topic as if another service produced it
    pub fn push(&self, topic: &str, key: Option<&str>, payload: &[u8]) {
        let mut state = self.state.lock().unwrap();
        let message = Self::next_message(&mut state, topic, key, payload);
        state.queue.push_back(message);
        drop(state);
        self.notify.notify_waiters();
    }

    /// Payloads published on the topic by this process in publish order
    pub fn published(&self, topic: &str) -> Vec<InboundMessage> {
        self.state
            .lock()
            .unwrap()
            .published
            .iter()
            .filter(|m| m.topic == topic)
            .cloned()
            .collect()
    }

    pub fn acked(&self) -> Vec<InboundMessage> {
        self.state.lock().unwrap().acked.clone()
    }

    pub fn pending(&self) -> usize {
        self.state.lock().unwrap().queue.len()
    }

    pub fn producer(self: &Arc<Self>) -> InMemoryProducer {
        InMemoryProducer {
            broker: self.clone(),
            connected: AtomicBool::new(false),
            failing: AtomicBool::new(false),
        }
    }

    pub fn consumer(self: &Arc<Self>) -> InMemoryConsumer {
        InMemoryConsumer {
            broker: self.clone(),
            connected: AtomicBool::new(false),
            unavailable: AtomicBool::new(false),
            closed: Notify::new(),
        }
    }

    fn next_message(
        state: &mut BrokerState,
        topic: &str,
        key: Option<&str>,
        payload: &[u8],
    ) -> InboundMessage {
        let offset = state.offsets.entry(topic.to_string()).or_insert(0);
        let message = InboundMessage {
            topic: topic.to_string(),
            partition: 0,
            offset: *offset,
            key: key.map(|k| k.as_bytes().to_vec()),
            payload: payload.to_vec(),
        };
        *offset += 1;
        message
    }
}

pub struct InMemoryProducer {
    broker: Arc<InMemoryBroker>,
    connected: AtomicBool,
    failing: AtomicBool,
}

impl InMemoryProducer {
    /// Makes every following publish fail as if the broker rejected it
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl IMessageProducer for InMemoryProducer {
    async fn connect(&self) -> Result<(), BrokerError> {
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn publish(&self, topic: &str, key: &str, payload: &[u8]) -> Result<(), BrokerError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(BrokerError::PublishFailed {
                topic: topic.to_string(),
                cause: "Broker rejected the message".into(),
            });
        }
        self.connected.store(true, Ordering::SeqCst);

        let mut state = self.broker.state.lock().unwrap();
        let message = InMemoryBroker::next_message(&mut state, topic, Some(key), payload);
        state.published.push(message.clone());
        if state.subscribed.contains(topic) {
            state.queue.push_back(message);
        }
        drop(state);
        self.broker.notify.notify_waiters();
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), BrokerError> {
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

pub struct InMemoryConsumer {
    broker: Arc<InMemoryBroker>,
    connected: AtomicBool,
    unavailable: AtomicBool,
    closed: Notify,
}

impl InMemoryConsumer {
    /// Makes subscribing fail as if the broker could not be reached
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl IMessageConsumer for InMemoryConsumer {
    async fn subscribe(&self, topics: &[String]) -> Result<(), BrokerError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(BrokerError::Unavailable("Connection refused".into()));
        }
        let mut state = self.broker.state.lock().unwrap();
        state.subscribed.extend(topics.iter().cloned());
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn recv(&self) -> Result<InboundMessage, BrokerError> {
        loop {
            let pushed = self.broker.notify.notified();
            let closed = self.closed.notified();
            if !self.connected.load(Ordering::SeqCst) {
                return Err(BrokerError::Disconnected);
            }
            if let Some(message) = self.broker.state.lock().unwrap().queue.pop_front() {
                return Ok(message);
            }
            tokio::select! {
                _ = pushed => (),
                _ = closed => (),
            }
        }
    }

    fn ack(&self, message: &InboundMessage) -> Result<(), BrokerError> {
        self.broker.state.lock().unwrap().acked.push(message.clone());
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), BrokerError> {
        self.connected.store(false, Ordering::SeqCst);
        self.closed.notify_waiters();
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}
