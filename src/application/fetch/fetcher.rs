use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::policy::RetryPolicy;
use super::state::{FetchError, FetchState};
use crate::error::{Error, Result};

/// Boxed async operation keyed by the fetcher's dependency value.
pub type FetchOperation<K, T> = Arc<dyn Fn(K) -> BoxFuture<'static, Result<T>> + Send + Sync>;

/// Runs one backend call with bounded retry and publishes its state.
///
/// A cycle starts when the dependency key changes or on [`refetch`]. Each
/// cycle takes a generation number; a superseded cycle is aborted and, if it
/// resolves anyway, its result is discarded. Errors never leave the fetcher:
/// they end up in [`FetchState::Failed`].
///
/// Must be driven from within a tokio runtime.
///
/// [`refetch`]: RetryingFetcher::refetch
pub struct RetryingFetcher<K, T> {
    operation: FetchOperation<K, T>,
    policy: RetryPolicy,
    key: Mutex<Option<K>>,
    generation: Arc<AtomicU64>,
    state: Arc<watch::Sender<FetchState<T>>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl<K, T> RetryingFetcher<K, T>
where
    K: PartialEq + Clone + Send + 'static,
    T: Clone + Send + Sync + 'static,
{
    pub fn new<F, Fut>(policy: RetryPolicy, operation: F) -> Self
    where
        F: Fn(K) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let (state, _) = watch::channel(FetchState::Idle);
        Self {
            operation: Arc::new(move |key| operation(key).boxed()),
            policy,
            key: Mutex::new(None),
            generation: Arc::new(AtomicU64::new(0)),
            state: Arc::new(state),
            task: Mutex::new(None),
        }
    }

    /// Set the dependency key. A different key (or the first one) starts a
    /// fresh cycle; an equal key is a no-op. Returns whether a cycle started.
    pub fn set_dependencies(&self, key: K) -> bool {
        {
            let mut current = self.key.lock();
            if current.as_ref() == Some(&key) {
                return false;
            }
            *current = Some(key.clone());
        }
        self.start_cycle(key);
        true
    }

    /// Restart the cycle from attempt 1 with the stored key.
    ///
    /// Returns `false` when no key has been set yet.
    pub fn refetch(&self) -> bool {
        let key = self.key.lock().clone();
        match key {
            Some(key) => {
                self.start_cycle(key);
                true
            }
            None => false,
        }
    }

    /// Run a cycle for `key` (a refetch when the key is unchanged) and wait
    /// for its outcome.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Fetch`] when every attempt failed.
    pub async fn fetch(&self, key: K) -> Result<T> {
        let mut rx = self.subscribe();
        if !self.set_dependencies(key) {
            self.refetch();
        }
        let state = match rx.wait_for(FetchState::is_settled).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        };
        match state {
            FetchState::Success(data) => Ok(data),
            FetchState::Failed(err) => Err(err.into()),
            FetchState::Idle | FetchState::Loading => {
                Err(Error::Connection("fetch cycle cancelled".into()))
            }
        }
    }

    /// Observe state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FetchState<T>> {
        self.state.subscribe()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> FetchState<T> {
        self.state.borrow().clone()
    }

    #[must_use]
    pub const fn policy(&self) -> RetryPolicy {
        self.policy
    }

    fn start_cycle(&self, key: K) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(previous) = self.task.lock().take() {
            previous.abort();
        }

        self.state.send_replace(FetchState::Loading);
        debug!(generation, "Fetch cycle started");

        let cycle = Cycle {
            operation: Arc::clone(&self.operation),
            policy: self.policy,
            generation,
            latest: Arc::clone(&self.generation),
            state: Arc::clone(&self.state),
        };
        *self.task.lock() = Some(tokio::spawn(cycle.run(key)));
    }
}

impl<K, T> Drop for RetryingFetcher<K, T> {
    fn drop(&mut self) {
        if let Some(task) = self.task.get_mut().take() {
            task.abort();
        }
    }
}

struct Cycle<K, T> {
    operation: FetchOperation<K, T>,
    policy: RetryPolicy,
    generation: u64,
    latest: Arc<AtomicU64>,
    state: Arc<watch::Sender<FetchState<T>>>,
}

impl<K: Clone, T> Cycle<K, T> {
    fn is_current(&self) -> bool {
        self.latest.load(Ordering::SeqCst) == self.generation
    }

    /// Publish only while this cycle is still the latest. The check runs
    /// under the channel's write lock so a newer cycle's `Loading` cannot be
    /// overwritten.
    fn publish(&self, next: FetchState<T>) -> bool {
        self.state.send_if_modified(|state| {
            if !self.is_current() {
                return false;
            }
            *state = next;
            true
        })
    }

    async fn run(self, key: K) {
        let attempts = self.policy.attempts();
        let mut attempt = 1;

        loop {
            let result = (self.operation)(key.clone()).await;
            if !self.is_current() {
                debug!(generation = self.generation, "Superseded fetch cycle dropped");
                return;
            }

            match result {
                Ok(data) => {
                    if attempt > 1 {
                        info!(attempt, "Fetch succeeded after retry");
                    }
                    self.publish(FetchState::Success(data));
                    return;
                }
                Err(err) if attempt >= attempts => {
                    warn!(attempts, error = %err, "Fetch failed, retries exhausted");
                    self.publish(FetchState::Failed(FetchError::Exhausted {
                        attempts,
                        last_error: err.user_message(),
                    }));
                    return;
                }
                Err(err) => {
                    let delay = self.policy.delay_after(attempt);
                    warn!(
                        attempt,
                        max_attempts = attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Fetch attempt failed, retrying"
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;
    use std::time::Duration;

    use tokio::time::Instant;

    use crate::error::ApiError;

    fn policy() -> RetryPolicy {
        RetryPolicy::new(3, Duration::from_millis(1000))
    }

    fn unreachable() -> Error {
        ApiError::NoResponse("connection refused".into()).into()
    }

    fn assert_close(actual: Duration, expected_ms: u64) {
        let actual_ms = actual.as_millis() as u64;
        assert!(
            (expected_ms..=expected_ms + 5).contains(&actual_ms),
            "elapsed {actual_ms} ms, expected {expected_ms} ms"
        );
    }

    async fn settled<T: Clone>(rx: &mut watch::Receiver<FetchState<T>>) -> FetchState<T> {
        rx.wait_for(FetchState::is_settled).await.unwrap().clone()
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_after_failures_with_linear_backoff() {
        let calls: Arc<Mutex<Vec<Instant>>> = Arc::default();
        let log = Arc::clone(&calls);
        let fetcher = RetryingFetcher::new(policy(), move |()| {
            let attempt = {
                let mut log = log.lock();
                log.push(Instant::now());
                log.len()
            };
            async move {
                if attempt <= 2 {
                    Err(unreachable())
                } else {
                    Ok("data")
                }
            }
        });
        let mut rx = fetcher.subscribe();

        assert!(fetcher.set_dependencies(()));
        let state = settled(&mut rx).await;

        assert_eq!(state, FetchState::Success("data"));
        let calls = calls.lock().clone();
        assert_eq!(calls.len(), 3);
        assert_close(calls[1] - calls[0], 1000);
        assert_close(calls[2] - calls[1], 2000);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausts_without_trailing_sleep() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let fetcher = RetryingFetcher::<(), u8>::new(policy(), move |()| {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Err(unreachable()) }
        });
        let mut rx = fetcher.subscribe();

        let started = Instant::now();
        fetcher.set_dependencies(());
        let state = settled(&mut rx).await;

        let Some(FetchError::Exhausted {
            attempts,
            last_error,
        }) = state.error().cloned()
        else {
            panic!("expected failure, got {state:?}");
        };
        assert_eq!(attempts, 3);
        assert_eq!(
            last_error,
            "No response from server. Please check your connection."
        );
        assert_close(started.elapsed(), 3000);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn equal_key_is_noop_and_refetch_restarts() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let fetcher = RetryingFetcher::new(policy(), move |page: u32| {
            counter.fetch_add(1, Ordering::SeqCst);
            async move { Ok(page * 10) }
        });
        let mut rx = fetcher.subscribe();

        assert!(!fetcher.refetch());
        assert!(fetcher.set_dependencies(1));
        assert_eq!(settled(&mut rx).await, FetchState::Success(10));

        assert!(!fetcher.set_dependencies(1));
        assert!(fetcher.refetch());
        assert_eq!(fetcher.state(), FetchState::Loading);
        assert_eq!(settled(&mut rx).await, FetchState::Success(10));
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        assert!(fetcher.set_dependencies(2));
        assert_eq!(settled(&mut rx).await, FetchState::Success(20));
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_cycle_never_publishes() {
        let fetcher = RetryingFetcher::new(policy(), |page: u32| async move {
            let delay = if page == 1 { 5_000 } else { 100 };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            Ok(page)
        });
        let mut rx = fetcher.subscribe();

        fetcher.set_dependencies(1);
        fetcher.set_dependencies(2);
        assert_eq!(settled(&mut rx).await, FetchState::Success(2));

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(fetcher.state(), FetchState::Success(2));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_retries_makes_one_attempt() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let fetcher = RetryingFetcher::<(), u8>::new(
            RetryPolicy::new(0, Duration::from_millis(1000)),
            move |()| {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err(unreachable()) }
            },
        );
        let mut rx = fetcher.subscribe();

        fetcher.set_dependencies(());
        let state = settled(&mut rx).await;

        assert!(matches!(
            state,
            FetchState::Failed(FetchError::Exhausted { attempts: 1, .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_resolves_to_outcome() {
        let fetcher = RetryingFetcher::new(policy(), |page: u32| async move {
            if page == 0 {
                Err(unreachable())
            } else {
                Ok(page)
            }
        });

        assert_eq!(fetcher.fetch(3).await.unwrap(), 3);
        assert_eq!(fetcher.fetch(3).await.unwrap(), 3);
        assert!(matches!(
            fetcher.fetch(0).await,
            Err(Error::Fetch(FetchError::Exhausted { attempts: 3, .. }))
        ));
    }

    #[tokio::test]
    async fn starts_idle() {
        let fetcher = RetryingFetcher::new(policy(), |()| async { Ok(1u8) });
        assert_eq!(fetcher.state(), FetchState::Idle);
    }
}
