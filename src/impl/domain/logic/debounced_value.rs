use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use tokio::{sync::watch, task::JoinHandle};

/// Trailing debounce of a value.
///
/// Every [`set`](Self::set) restarts the delay; the latest value is published
/// once the delay passes with no further change. Dropping or disposing
/// cancels a pending publication, so nothing is ever emitted afterwards.
///
/// Must be used from within a tokio runtime.
pub struct DebouncedValue<T> {
    delay: Duration,
    sender: Arc<watch::Sender<T>>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<T> DebouncedValue<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(initial: T, delay: Duration) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            delay,
            sender: Arc::new(sender),
            pending: Mutex::new(None),
        }
    }

    fn pending(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set(&self, value: T) {
        let sender = Arc::clone(&self.sender);
        let delay = self.delay;
        let mut pending = self.pending();
        if let Some(previous) = pending.take() {
            previous.abort();
        }
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            sender.send_replace(value);
        }));
    }

    /// Last published value.
    pub fn get(&self) -> T {
        self.sender.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.sender.subscribe()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancel any pending publication.
    pub fn dispose(&self) {
        if let Some(previous) = self.pending().take() {
            previous.abort();
        }
    }
}

impl<T> Drop for DebouncedValue<T> {
    fn drop(&mut self) {
        let pending = self
            .pending
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = pending.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(400);

    async fn sleep_ms(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn emits_only_the_last_value_once() {
        let search = DebouncedValue::new(String::new(), DELAY);
        let mut rx = search.subscribe();

        search.set("a".to_string());
        sleep_ms(100).await;
        search.set("ap".to_string());
        sleep_ms(100).await;
        search.set("app".to_string());

        sleep_ms(399).await;
        assert!(!rx.has_changed().unwrap());
        assert_eq!(search.get(), "");

        sleep_ms(2).await;
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), "app");

        sleep_ms(1_000).await;
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn dispose_cancels_pending_emission() {
        let search = DebouncedValue::new(String::new(), DELAY);
        let rx = search.subscribe();
        search.set("tea".to_string());
        sleep_ms(100).await;
        search.dispose();
        sleep_ms(1_000).await;
        assert!(!rx.has_changed().unwrap());
        assert_eq!(search.get(), "");
    }

    #[tokio::test(start_paused = true)]
    async fn drop_never_emits() {
        let search = DebouncedValue::new(String::new(), DELAY);
        let rx = search.subscribe();
        search.set("tea".to_string());
        drop(search);
        sleep_ms(1_000).await;
        assert_eq!(*rx.borrow(), "");
    }

    #[tokio::test(start_paused = true)]
    async fn spaced_out_changes_each_emit() {
        let search = DebouncedValue::new(0u32, DELAY);
        let mut rx = search.subscribe();
        search.set(1);
        sleep_ms(500).await;
        assert_eq!(*rx.borrow_and_update(), 1);
        search.set(2);
        sleep_ms(500).await;
        assert_eq!(*rx.borrow_and_update(), 2);
    }
}
