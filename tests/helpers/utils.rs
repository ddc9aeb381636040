use std::time::Duration;

/// Polls the condition until it holds or the timeout runs out
pub async fn wait_until<F: Fn() -> bool>(condition: F, timeout: Duration) -> bool {
    let started = std::time::Instant::now();
    while started.elapsed() < timeout {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}
