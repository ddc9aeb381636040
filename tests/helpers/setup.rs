use nettu_notifier_api::Application;
use nettu_notifier_infra::{
    Broker, Config, InMemoryBroker, InMemoryConsumer, InMemoryDeliveryAdapter, InMemoryProducer,
    NotifierContext,
};
use nettu_notifier_sdk::NettuNotifierSDK;
use std::sync::Arc;

pub const ADMIN_KEY: &str = "test-admin-key";

pub struct TestApp {
    pub config: Config,
    pub address: String,
    pub broker: Arc<InMemoryBroker>,
    pub producer: Arc<InMemoryProducer>,
    pub consumer: Arc<InMemoryConsumer>,
    pub delivery: Arc<InMemoryDeliveryAdapter>,
}

/// In memory context on a random port together with handles to steer its
/// collaborators before the application is built
pub fn setup_app() -> (TestApp, NotifierContext) {
    let broker = InMemoryBroker::new();
    let producer = Arc::new(broker.producer());
    let consumer = Arc::new(broker.consumer());
    let delivery = Arc::new(InMemoryDeliveryAdapter::new());
    let mut ctx = NotifierContext::create_inmemory_with(
        Broker {
            producer: producer.clone(),
            consumer: consumer.clone(),
        },
        delivery.clone(),
    );
    ctx.config.port = 0; // Random port
    ctx.config.admin_secret_code = ADMIN_KEY.into();

    let app = TestApp {
        config: ctx.config.clone(),
        address: String::new(),
        broker,
        producer,
        consumer,
        delivery,
    };
    (app, ctx)
}

// Launch the application as a background task
pub async fn spawn_app() -> (TestApp, NettuNotifierSDK) {
    let (mut app, ctx) = setup_app();
    let application = Application::new(ctx)
        .await
        .expect("Failed to build application.");

    app.address = format!("http://localhost:{}", application.port());
    let _ = actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to shut down cleanly");
    });

    let sdk = NettuNotifierSDK::new(app.address.clone());
    (app, sdk)
}
