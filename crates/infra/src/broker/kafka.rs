use super::{BrokerError, IMessageConsumer, IMessageProducer, InboundMessage};
use crate::config::KafkaConfig;
use rdkafka::{
    config::ClientConfig,
    consumer::{Consumer, StreamConsumer},
    producer::{FutureProducer, FutureRecord, Producer},
    util::Timeout,
    Message,
};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};
use tokio::sync::{Notify, OnceCell};
use tracing::{error, info, warn};

fn client_config(config: &KafkaConfig) -> ClientConfig {
    let mut client_config = ClientConfig::new();
    client_config
        .set("bootstrap.servers", &config.brokers)
        .set("client.id", &config.client_id)
        .set(
            "socket.connection.setup.timeout.ms",
            config.connect_timeout.as_millis().to_string(),
        );
    client_config
}

struct Subscription {
    consumer: Arc<StreamConsumer>,
    topics: Vec<String>,
}

pub struct KafkaConsumer {
    config: KafkaConfig,
    subscription: Mutex<Option<Subscription>>,
    closed: Notify,
}

impl KafkaConsumer {
    pub fn new(config: KafkaConfig) -> Self {
        Self {
            config,
            subscription: Mutex::new(None),
            closed: Notify::new(),
        }
    }

    fn consumer(&self) -> Result<Arc<StreamConsumer>, BrokerError> {
        self.subscription
            .lock()
            .unwrap()
            .as_ref()
            .map(|s| s.consumer.clone())
            .ok_or(BrokerError::Disconnected)
    }

    fn create_consumer(&self) -> Result<StreamConsumer, BrokerError> {
        client_config(&self.config)
            .set("group.id", &self.config.consumer_group)
            // Offsets are stored once a message has been handled and committed in the background
            .set("enable.auto.commit", "true")
            .set("enable.auto.offset.store", "false")
            .set("auto.offset.reset", "earliest")
            .set(
                "session.timeout.ms",
                self.config.session_timeout.as_millis().to_string(),
            )
            .set(
                "heartbeat.interval.ms",
                self.config.heartbeat_interval.as_millis().to_string(),
            )
            .create()
            .map_err(|e| BrokerError::Unavailable(e.to_string()))
    }
}

#[async_trait::async_trait]
impl IMessageConsumer for KafkaConsumer {
    async fn subscribe(&self, topics: &[String]) -> Result<(), BrokerError> {
        if let Some(subscription) = self.subscription.lock().unwrap().as_ref() {
            if subscription.topics == topics {
                return Ok(());
            }
        }

        info!(brokers = %self.config.brokers, "Connecting Kafka consumer");
        let consumer = Arc::new(self.create_consumer()?);

        let probe = consumer.clone();
        let timeout = self.config.connect_timeout;
        let metadata = tokio::task::spawn_blocking(move || {
            probe
                .fetch_metadata(None, Timeout::After(timeout))
                .map(|metadata| metadata.brokers().len())
        })
        .await
        .map_err(|e| BrokerError::Unavailable(e.to_string()))?;
        match metadata {
            Ok(brokers) => info!(brokers, "Kafka cluster is reachable"),
            Err(e) => {
                error!(error = %e, "Unable to fetch Kafka cluster metadata");
                return Err(BrokerError::Unavailable(e.to_string()));
            }
        }

        let topic_refs: Vec<&str> = topics.iter().map(|t| t.as_str()).collect();
        consumer
            .subscribe(&topic_refs)
            .map_err(|e| BrokerError::Unavailable(e.to_string()))?;
        info!(topics = ?topics, group = %self.config.consumer_group, "Kafka consumer subscribed");

        *self.subscription.lock().unwrap() = Some(Subscription {
            consumer,
            topics: topics.to_vec(),
        });
        Ok(())
    }

    async fn recv(&self) -> Result<InboundMessage, BrokerError> {
        let consumer = self.consumer()?;
        tokio::select! {
            _ = self.closed.notified() => Err(BrokerError::Disconnected),
            message = consumer.recv() => {
                let message = message.map_err(|e| BrokerError::Receive(e.to_string()))?.detach();
                Ok(InboundMessage {
                    topic: message.topic().to_string(),
                    partition: message.partition(),
                    offset: message.offset(),
                    key: message.key().map(|k| k.to_vec()),
                    payload: message.payload().map(|p| p.to_vec()).unwrap_or_default(),
                })
            }
        }
    }

    fn ack(&self, message: &InboundMessage) -> Result<(), BrokerError> {
        self.consumer()?
            .store_offset(&message.topic, message.partition, message.offset)
            .map_err(|e| BrokerError::Receive(e.to_string()))
    }

    async fn disconnect(&self) -> Result<(), BrokerError> {
        let subscription = self.subscription.lock().unwrap().take();
        self.closed.notify_waiters();
        if let Some(subscription) = subscription {
            subscription.consumer.unsubscribe();
            info!("Kafka consumer disconnected");
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.subscription.lock().unwrap().is_some()
    }
}

pub struct KafkaProducer {
    config: KafkaConfig,
    producer: OnceCell<FutureProducer>,
    closed: AtomicBool,
}

impl KafkaProducer {
    pub fn new(config: KafkaConfig) -> Self {
        Self {
            config,
            producer: OnceCell::new(),
            closed: AtomicBool::new(false),
        }
    }

    async fn producer(&self) -> Result<&FutureProducer, BrokerError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(BrokerError::Disconnected);
        }
        self.producer
            .get_or_try_init(|| async {
                info!(brokers = %self.config.brokers, "Connecting Kafka producer");
                client_config(&self.config)
                    .set("enable.idempotence", "true")
                    .set("acks", "all")
                    .set("max.in.flight.requests.per.connection", "5")
                    // Bounds the time a message may spend in the queue including retries
                    .set(
                        "message.timeout.ms",
                        self.config.producer_timeout.as_millis().to_string(),
                    )
                    .create::<FutureProducer>()
                    .map_err(|e| BrokerError::Unavailable(e.to_string()))
            })
            .await
    }
}

#[async_trait::async_trait]
impl IMessageProducer for KafkaProducer {
    async fn connect(&self) -> Result<(), BrokerError> {
        self.producer().await.map(|_| ())
    }

    async fn publish(&self, topic: &str, key: &str, payload: &[u8]) -> Result<(), BrokerError> {
        let producer = self.producer().await?;
        let record = FutureRecord::to(topic).key(key).payload(payload);
        match producer
            .send(record, Timeout::After(self.config.producer_timeout))
            .await
        {
            Ok((partition, offset)) => {
                info!(topic, partition, offset, key, "Message published");
                Ok(())
            }
            Err((e, _)) => {
                error!(topic, key, error = %e, "Failed to publish message");
                Err(BrokerError::PublishFailed {
                    topic: topic.to_string(),
                    cause: e.to_string(),
                })
            }
        }
    }

    async fn disconnect(&self) -> Result<(), BrokerError> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        let producer = match self.producer.get() {
            Some(producer) => producer.clone(),
            None => return Ok(()),
        };
        let timeout = self.config.producer_timeout;
        info!("Flushing Kafka producer (timeout: {:?})", timeout);
        let flushed = tokio::task::spawn_blocking(move || producer.flush(Timeout::After(timeout)))
            .await
            .map_err(|e| BrokerError::Unavailable(e.to_string()))?;
        match flushed {
            Ok(()) => {
                info!("Kafka producer flushed and disconnected");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Kafka producer did not flush all messages");
                Err(BrokerError::PublishFailed {
                    topic: "*".into(),
                    cause: e.to_string(),
                })
            }
        }
    }

    fn is_connected(&self) -> bool {
        self.producer.initialized() && !self.closed.load(Ordering::SeqCst)
    }
}
