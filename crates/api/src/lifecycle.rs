use actix_web::dev::{Server, ServerHandle};
use nettu_notifier_infra::NotifierContext;
use std::time::Duration;
use tokio::{task::JoinHandle, time::timeout};
use tracing::{error, info, warn};

const CONSUMER_STOP_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug)]
enum ShutdownReason {
    ServerStopped,
    ServerFailed(String),
    Requested,
    Signal,
    TaskExited(&'static str),
}

/// Owns everything that was started for the pipeline and tears it down in
/// order: http server, consumer, reminder timers, producer, chat client.
pub struct Lifecycle {
    ctx: NotifierContext,
    server: ServerHandle,
    consumer_loop: JoinHandle<()>,
    reminders_job: JoinHandle<()>,
}

impl Lifecycle {
    pub fn new(
        ctx: NotifierContext,
        server: ServerHandle,
        consumer_loop: JoinHandle<()>,
        reminders_job: JoinHandle<()>,
    ) -> Self {
        Self {
            ctx,
            server,
            consumer_loop,
            reminders_job,
        }
    }

    /// Runs the server until a termination signal, a restart request or the
    /// death of a background task, then shuts everything down. Fails when
    /// the shutdown was caused by a failure.
    pub async fn supervise(mut self, server: Server) -> anyhow::Result<()> {
        let mut server = actix_web::rt::spawn(server);

        let reason = tokio::select! {
            res = &mut server => match res {
                Ok(Ok(())) => ShutdownReason::ServerStopped,
                Ok(Err(e)) => ShutdownReason::ServerFailed(e.to_string()),
                Err(e) => ShutdownReason::ServerFailed(e.to_string()),
            },
            _ = self.ctx.shutdown.triggered() => ShutdownReason::Requested,
            _ = termination_signal() => ShutdownReason::Signal,
            _ = &mut self.consumer_loop => ShutdownReason::TaskExited("consumer loop"),
            _ = &mut self.reminders_job => ShutdownReason::TaskExited("reminders job"),
        };
        info!(reason = ?reason, "Shutting down");

        self.shutdown().await;

        match reason {
            ShutdownReason::ServerFailed(e) => Err(anyhow::anyhow!("Http server failed: {}", e)),
            ShutdownReason::TaskExited(task) => {
                Err(anyhow::anyhow!("Background task exited unexpectedly: {}", task))
            }
            _ => Ok(()),
        }
    }

    /// Best effort graceful shutdown bounded by the configured shutdown timeout
    pub async fn shutdown(&mut self) {
        let shutdown_timeout = self.ctx.config.shutdown_timeout;
        if timeout(shutdown_timeout, self.shutdown_steps()).await.is_err() {
            warn!(
                "Shutdown did not complete within {:?}, exiting anyway",
                shutdown_timeout
            );
        }
    }

    async fn shutdown_steps(&mut self) {
        info!("Stopping http server");
        self.server.stop(true).await;

        info!("Disconnecting consumer");
        if let Err(e) = self.ctx.broker.consumer.disconnect().await {
            error!(error = %e, "Unable to disconnect consumer");
        }
        if !self.consumer_loop.is_finished()
            && timeout(CONSUMER_STOP_TIMEOUT, &mut self.consumer_loop)
                .await
                .is_err()
        {
            warn!("Consumer loop did not stop in time, aborting it");
            self.consumer_loop.abort();
        }

        info!("Aborting reminders job and armed reminder timers");
        self.reminders_job.abort();

        release_pipeline(&self.ctx, false).await;
        info!("Shutdown completed");
    }
}

/// Disconnects the producer, after draining it, and stops the chat client.
/// Also used to clean up after a failed startup, in which case the consumer
/// is disconnected as well. Every step is attempted whatever the outcome of
/// the previous one.
pub async fn release_pipeline(ctx: &NotifierContext, include_consumer: bool) {
    if include_consumer {
        info!("Disconnecting consumer");
        if let Err(e) = ctx.broker.consumer.disconnect().await {
            error!(error = %e, "Unable to disconnect consumer");
        }
    }

    info!("Disconnecting producer");
    if let Err(e) = ctx.broker.producer.disconnect().await {
        error!(error = %e, "Unable to disconnect producer");
    }

    info!("Stopping chat client");
    ctx.delivery.stop().await;
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Unable to listen for ctrl-c");
        futures::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn termination_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            tokio::select! {
                _ = ctrl_c() => (),
                _ = sigterm.recv() => (),
            }
        }
        Err(e) => {
            warn!(error = %e, "Unable to listen for SIGTERM");
            ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn termination_signal() {
    ctrl_c().await;
}
