use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

pub const SUCCESS_MESSAGE: &str = "Payment successful! Check your email for details.";

/// Transient "payment successful" flag that hides itself after a delay.
///
/// Each `show` bumps a generation counter and arms a one-shot timer for that
/// generation. A timer only clears the flag if no newer `show` happened in
/// the meantime. Pending timers are aborted on re-arm and on drop.
pub struct SuccessBanner {
    shown: Arc<AtomicU64>,
    generation: u64,
    display_for: Duration,
    timer: Option<JoinHandle<()>>,
}

impl SuccessBanner {
    pub fn new(display_for: Duration) -> Self {
        Self {
            shown: Arc::new(AtomicU64::new(0)),
            generation: 0,
            display_for,
            timer: None,
        }
    }

    /// Must be called from within a tokio runtime.
    pub fn show(&mut self) {
        self.cancel_timer();
        self.generation += 1;
        let generation = self.generation;
        self.shown.store(generation, Ordering::SeqCst);

        let shown = Arc::clone(&self.shown);
        let display_for = self.display_for;
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(display_for).await;
            let _ = shown.compare_exchange(generation, 0, Ordering::SeqCst, Ordering::SeqCst);
        }));
    }

    pub fn is_visible(&self) -> bool {
        self.shown.load(Ordering::SeqCst) != 0
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for SuccessBanner {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}
