mod broker;
mod config;
mod reminder_queue;
mod repos;
mod services;
mod stats;
mod system;

pub use broker::*;
pub use config::{Config, KafkaConfig, TopicsConfig};
pub use reminder_queue::ReminderQueue;
pub use repos::{IReminderRepo, InMemoryReminderRepo, Repos};
pub use services::chat::*;
use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
pub use stats::StatsCounters;
use std::sync::Arc;
use system::RealSys;
pub use system::{ISys, ShutdownSignal, StaticTimeSys};
use tracing::info;

#[derive(Clone)]
pub struct NotifierContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub broker: Broker,
    pub delivery: Arc<dyn IDeliveryAdapter>,
    pub stats: Arc<StatsCounters>,
    pub shutdown: ShutdownSignal,
    pub reminder_queue: ReminderQueue,
}

impl NotifierContext {
    fn new(
        repos: Repos,
        config: Config,
        sys: Arc<dyn ISys>,
        broker: Broker,
        delivery: Arc<dyn IDeliveryAdapter>,
    ) -> Self {
        let stats = Arc::new(StatsCounters::new(sys.now()));
        Self {
            repos,
            config,
            sys,
            broker,
            delivery,
            stats,
            shutdown: ShutdownSignal::new(),
            reminder_queue: ReminderQueue::new(),
        }
    }

    /// Context backed entirely by in memory implementations
    pub fn create_inmemory() -> Self {
        let broker = InMemoryBroker::new();
        Self::create_inmemory_with(
            Broker {
                producer: Arc::new(broker.producer()),
                consumer: Arc::new(broker.consumer()),
            },
            Arc::new(InMemoryDeliveryAdapter::new()),
        )
    }

    pub fn create_inmemory_with(broker: Broker, delivery: Arc<dyn IDeliveryAdapter>) -> Self {
        Self::new(
            Repos::create_inmemory(),
            Config::new(),
            Arc::new(RealSys {}),
            broker,
            delivery,
        )
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> anyhow::Result<NotifierContext> {
    let config = Config::new();

    let repos = match get_psql_connection_string() {
        Some(connection_string) => {
            info!("DB CHECKING CONNECTION ...");
            let pool = connect_postgres(&connection_string).await?;
            run_migration(&pool).await?;
            info!("DB CHECKING CONNECTION ... [done]");
            Repos::create_postgres(pool)
        }
        None => {
            info!("Did not find DATABASE_URL environment variable. Reminders are kept in memory.");
            Repos::create_inmemory()
        }
    };

    let broker = Broker {
        producer: Arc::new(KafkaProducer::new(config.kafka.clone())),
        consumer: Arc::new(KafkaConsumer::new(config.kafka.clone())),
    };

    let delivery: Arc<dyn IDeliveryAdapter> = match &config.chat_webhook_url {
        Some(url) => Arc::new(WebhookChatClient::new(url.clone())),
        None => {
            info!(
                "Did not find CHAT_WEBHOOK_URL environment variable. Notifications are only recorded in memory."
            );
            Arc::new(InMemoryDeliveryAdapter::new())
        }
    };

    Ok(NotifierContext::new(
        repos,
        config,
        Arc::new(RealSys {}),
        broker,
        delivery,
    ))
}

fn get_psql_connection_string() -> Option<String> {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    std::env::var(PSQL_CONNECTION_STRING).ok()
}

async fn connect_postgres(connection_string: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(connection_string)
        .await
}

pub async fn run_migration(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!().run(pool).await
}
