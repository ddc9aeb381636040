mod admin;
mod consumer;
mod error;
mod job_schedulers;
mod lifecycle;
mod notification;
mod reminder;
mod settings;
mod shared;
mod status;

use actix_cors::Cors;
use actix_web::{dev::Server, middleware, web, App, HttpServer};
use consumer::{run_consumer_loop, HandlerRegistry};
use job_schedulers::start_reminders_job;
use lifecycle::{release_pipeline, Lifecycle};
use nettu_notifier_infra::{BrokerError, DeliveryError, NotifierContext};
use std::net::TcpListener;
use thiserror::Error;
use tracing::{error, info};
use tracing_actix_web::TracingLogger;

pub fn configure_server_api(cfg: &mut web::ServiceConfig) {
    admin::configure_routes(cfg);
    notification::configure_routes(cfg);
    settings::configure_routes(cfg);
    status::configure_routes(cfg);
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Unable to start the http server: {0}")]
    Server(#[from] std::io::Error),
    #[error(transparent)]
    Broker(#[from] BrokerError),
    #[error("Unable to connect the chat client: {0}")]
    Delivery(#[from] DeliveryError),
}

pub struct Application {
    server: Server,
    port: u16,
    lifecycle: Lifecycle,
}

impl Application {
    pub async fn new(context: NotifierContext) -> Result<Self, StartupError> {
        let (server, port) = Application::configure_server(context.clone()).await?;

        let registry = HandlerRegistry::new(&context.config.topics);
        if let Err(e) = Application::connect_pipeline(&context, &registry).await {
            error!(error = %e, "Unable to start the notification pipeline");
            release_pipeline(&context, true).await;
            return Err(e);
        }

        let consumer_loop = actix_web::rt::spawn(run_consumer_loop(registry, context.clone()));
        let reminders_job = start_reminders_job(context.clone());
        let lifecycle = Lifecycle::new(context, server.handle(), consumer_loop, reminders_job);

        Ok(Self {
            server,
            port,
            lifecycle,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Failing to reach the broker or the chat platform at startup is fatal
    async fn connect_pipeline(
        context: &NotifierContext,
        registry: &HandlerRegistry,
    ) -> Result<(), StartupError> {
        context.delivery.connect().await?;
        context.broker.producer.connect().await?;
        context
            .broker
            .consumer
            .subscribe(&registry.topic_names())
            .await?;
        info!("Notification pipeline connected");
        Ok(())
    }

    async fn configure_server(context: NotifierContext) -> Result<(Server, u16), std::io::Error> {
        let port = context.config.port;
        let shutdown_timeout = context.config.shutdown_timeout.as_secs();
        let address = format!("0.0.0.0:{}", port);
        let listener = TcpListener::bind(&address)?;
        let port = listener.local_addr()?.port();

        let server = HttpServer::new(move || {
            let ctx = context.clone();

            App::new()
                .wrap(Cors::permissive())
                .wrap(middleware::Compress::default())
                .wrap(TracingLogger::default())
                .app_data(web::Data::new(ctx))
                .service(web::scope("/api/v1").configure(configure_server_api))
        })
        .listen(listener)?
        .workers(4)
        // Signals are handled by the lifecycle supervisor
        .disable_signals()
        .shutdown_timeout(shutdown_timeout)
        .run();

        Ok((server, port))
    }

    pub async fn start(self) -> anyhow::Result<()> {
        self.lifecycle.supervise(self.server).await
    }
}
