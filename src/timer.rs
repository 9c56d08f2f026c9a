use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// Seconds left below which the clock is drawn as a warning.
pub const WARNING_SECONDS: i64 = 60;

/// A running one-second ticker. Dropping it stops the ticks.
#[derive(Debug)]
pub struct Countdown {
    handle: JoinHandle<()>,
}

impl Countdown {
    /// Send `tick()` once per second until the receiver goes away or the
    /// countdown is dropped.
    pub fn start<E, F>(runtime: &Handle, tx: UnboundedSender<E>, tick: F) -> Self
    where
        E: Send + 'static,
        F: Fn() -> E + Send + 'static,
    {
        let handle = runtime.spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            // first tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                if tx.send(tick()).is_err() {
                    break;
                }
            }
        });
        Self { handle }
    }

    pub fn stop(self) {
        self.handle.abort();
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// `m:ss`, clamped at zero.
pub fn format_clock(total_secs: i64) -> String {
    let secs = total_secs.max(0);
    format!("{}:{:02}", secs / 60, secs % 60)
}
