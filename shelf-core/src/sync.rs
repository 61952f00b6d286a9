//! Debounced address-bar sync.
//!
//! Every filter change schedules a deferred write of the encoded state to
//! the host's address bar. Scheduling again within the quiet window aborts
//! the pending write, so a burst of keystrokes commits only its last state.
//! A change whose encoding already matches the address bar writes nothing.
//!
//! ```text
//! t=0     schedule(A)   -> pending A
//! t=300   schedule(AB)  -> A aborted, pending AB
//! t=1300                -> replace("...AB")
//! ```

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use shelf_types::{CatalogConfig, FilterState};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::codec::{decode, encode, normalize_query};

/// The host's address bar.
///
/// Queries are exchanged without the leading `?`; an empty query means
/// the bare page.
pub trait AddressBar: Send + Sync + 'static {
    /// Current query string.
    fn query(&self) -> String;

    /// Replaces the current history entry's query.
    fn replace(&self, query: &str);
}

/// Result of [`UrlSync::schedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The address bar already shows this state; nothing was scheduled.
    Unchanged,
    /// A write was scheduled (or performed, for a zero window).
    Scheduled,
}

/// Keeps the address bar in step with the search form.
///
/// Deferred writes run on the runtime captured at construction, so
/// `schedule` may be called from any thread.
pub struct UrlSync<A: AddressBar> {
    bar: Arc<A>,
    window: Duration,
    runtime: Handle,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<A: AddressBar> UrlSync<A> {
    /// Creates a sync with the given quiet window, spawning deferred writes
    /// on `runtime`.
    pub fn new(bar: Arc<A>, window: Duration, runtime: Handle) -> Self {
        Self {
            bar,
            window,
            runtime,
            pending: Mutex::new(None),
        }
    }

    /// Creates a sync using the configured debounce window.
    pub fn from_config(bar: Arc<A>, config: &CatalogConfig, runtime: Handle) -> Self {
        Self::new(bar, Duration::from_millis(config.debounce_ms), runtime)
    }

    /// Creates a sync on the runtime the caller is running in.
    ///
    /// Returns `None` outside a Tokio runtime.
    pub fn try_current(bar: Arc<A>, window: Duration) -> Option<Self> {
        match Handle::try_current() {
            Ok(runtime) => Some(Self::new(bar, window, runtime)),
            Err(_) => {
                warn!("no runtime for deferred address bar writes");
                None
            }
        }
    }

    /// The filter state encoded in the address bar right now.
    pub fn initial_state(&self) -> FilterState {
        decode(&self.bar.query())
    }

    /// Schedules a write of `state`.
    ///
    /// Any pending write is aborted first. If `state` encodes to the same
    /// canonical query the address bar already holds, nothing is scheduled.
    /// Only a zero window writes immediately.
    pub fn schedule(&self, state: &FilterState) -> SyncOutcome {
        self.cancel();

        let query = encode(state);
        if query == normalize_query(&self.bar.query()) {
            debug!(query = %query, "address bar already up to date");
            return SyncOutcome::Unchanged;
        }

        if self.window.is_zero() {
            self.bar.replace(&query);
            return SyncOutcome::Scheduled;
        }

        let bar = Arc::clone(&self.bar);
        let window = self.window;
        debug!(query = %query, window_ms = window.as_millis() as u64, "address bar write scheduled");
        let handle = self.runtime.spawn(async move {
            tokio::time::sleep(window).await;
            debug!(query = %query, "address bar write committed");
            bar.replace(&query);
        });

        *self.lock() = Some(handle);
        SyncOutcome::Scheduled
    }

    /// Explicit "clear filters": aborts any pending write and navigates to
    /// the bare page at once.
    pub fn clear(&self) {
        self.cancel();
        self.bar.replace("");
    }

    /// Aborts the pending write. Returns `true` if one was still waiting.
    pub fn cancel(&self) -> bool {
        match self.lock().take() {
            Some(handle) => {
                let waiting = !handle.is_finished();
                handle.abort();
                waiting
            }
            None => false,
        }
    }

    /// Returns `true` if a write is waiting for its window to elapse.
    pub fn is_pending(&self) -> bool {
        self.lock().as_ref().is_some_and(|h| !h.is_finished())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<A: AddressBar> Drop for UrlSync<A> {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_types::FilterField;

    #[derive(Default)]
    struct FakeBar {
        current: Mutex<String>,
        writes: Mutex<Vec<String>>,
    }

    impl FakeBar {
        fn at(query: &str) -> Arc<Self> {
            let bar = Self::default();
            *bar.current.lock().unwrap() = query.to_owned();
            Arc::new(bar)
        }

        fn writes(&self) -> Vec<String> {
            self.writes.lock().unwrap().clone()
        }
    }

    impl AddressBar for FakeBar {
        fn query(&self) -> String {
            self.current.lock().unwrap().clone()
        }

        fn replace(&self, query: &str) {
            *self.current.lock().unwrap() = query.to_owned();
            self.writes.lock().unwrap().push(query.to_owned());
        }
    }

    fn titled(title: &str) -> FilterState {
        let mut state = FilterState::new();
        state.set(FilterField::Title, title);
        state
    }

    async fn wait_ms(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn burst_commits_only_the_last_state() {
        let bar = FakeBar::at("");
        let sync = UrlSync::new(Arc::clone(&bar), Duration::from_millis(1000), Handle::current());

        assert_eq!(sync.schedule(&titled("s")), SyncOutcome::Scheduled);
        wait_ms(300).await;
        sync.schedule(&titled("so"));
        wait_ms(300).await;
        sync.schedule(&titled("sol"));
        assert!(sync.is_pending());

        wait_ms(900).await;
        assert!(bar.writes().is_empty());

        wait_ms(200).await;
        assert_eq!(bar.writes(), vec!["t%C3%ADtulo=sol"]);
        assert!(!sync.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn matching_state_is_not_written() {
        let bar = FakeBar::at("autor=Borges&utm_source=x");
        let sync = UrlSync::new(Arc::clone(&bar), Duration::from_millis(1000), Handle::current());

        let state = sync.initial_state();
        assert_eq!(state.author, "Borges");
        assert_eq!(sync.schedule(&state), SyncOutcome::Unchanged);
        assert!(!sync.is_pending());

        wait_ms(2000).await;
        assert!(bar.writes().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn reverting_to_current_state_cancels_pending_write() {
        let bar = FakeBar::at("");
        let sync = UrlSync::new(Arc::clone(&bar), Duration::from_millis(1000), Handle::current());

        sync.schedule(&titled("x"));
        assert_eq!(sync.schedule(&FilterState::new()), SyncOutcome::Unchanged);

        wait_ms(2000).await;
        assert!(bar.writes().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn clear_navigates_immediately() {
        let bar = FakeBar::at("t%C3%ADtulo=a");
        let sync = UrlSync::new(Arc::clone(&bar), Duration::from_millis(1000), Handle::current());

        sync.schedule(&titled("ab"));
        sync.clear();
        assert_eq!(bar.writes(), vec![""]);

        wait_ms(2000).await;
        assert_eq!(bar.writes(), vec![""]);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_sync_aborts_pending_write() {
        let bar = FakeBar::at("");
        {
            let sync = UrlSync::new(Arc::clone(&bar), Duration::from_millis(1000), Handle::current());
            sync.schedule(&titled("x"));
        }
        wait_ms(2000).await;
        assert!(bar.writes().is_empty());
    }

    fn paused_runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .start_paused(true)
            .build()
            .unwrap()
    }

    #[test]
    fn zero_window_writes_synchronously() {
        let rt = paused_runtime();
        let bar = FakeBar::at("");
        let sync = UrlSync::from_config(
            Arc::clone(&bar),
            &CatalogConfig::immediate(),
            rt.handle().clone(),
        );
        sync.schedule(&titled("x"));
        assert_eq!(bar.writes(), vec!["t%C3%ADtulo=x"]);
        assert!(!sync.is_pending());
    }

    #[test]
    fn scheduling_from_outside_the_runtime_still_debounces() {
        let rt = paused_runtime();
        let bar = FakeBar::at("");
        let sync = UrlSync::new(Arc::clone(&bar), Duration::from_millis(1000), rt.handle().clone());

        sync.schedule(&titled("s"));
        sync.schedule(&titled("so"));
        sync.schedule(&titled("sol"));
        assert!(bar.writes().is_empty());

        rt.block_on(wait_ms(1100));
        assert_eq!(bar.writes(), vec!["t%C3%ADtulo=sol"]);
    }

    #[test]
    fn try_current_needs_a_runtime() {
        let bar = FakeBar::at("");
        assert!(UrlSync::try_current(Arc::clone(&bar), Duration::from_millis(1000)).is_none());

        let rt = paused_runtime();
        let _guard = rt.enter();
        assert!(UrlSync::try_current(bar, Duration::from_millis(1000)).is_some());
    }
}
