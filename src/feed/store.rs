//! In-memory, single-flight cache of the match list.

use futures_util::future::{BoxFuture, FutureExt, Shared};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::catalog::find_match;
use crate::feed::client::{FeedClient, FeedError};
use crate::feed::types::Match;

/// Outcome of one fetch attempt, cloned out to every waiter.
pub type FetchResult = Result<Arc<Vec<Match>>, Arc<FeedError>>;

type Attempt = Shared<BoxFuture<'static, FetchResult>>;

struct Cached {
    matches: Arc<Vec<Match>>,
    fetched_at: Instant,
}

enum Slot {
    Empty,
    Ready(Cached),
    Pending { attempt_id: u64, attempt: Attempt },
}

struct Inner {
    slot: Slot,
    next_attempt: u64,
}

/// Shared cache in front of a [`FeedClient`].
///
/// At most one fetch runs at a time. Callers arriving while it runs await the
/// same attempt and get its result, success or failure. Only successes are
/// stored; after a failure the next caller starts a new attempt.
#[derive(Clone)]
pub struct MatchStore {
    client: FeedClient,
    ttl: Option<Duration>,
    inner: Arc<Mutex<Inner>>,
}

impl MatchStore {
    /// `ttl_secs == 0` keeps the first successful fetch forever.
    pub fn new(client: FeedClient, ttl_secs: u64) -> Self {
        Self {
            client,
            ttl: (ttl_secs > 0).then(|| Duration::from_secs(ttl_secs)),
            inner: Arc::new(Mutex::new(Inner {
                slot: Slot::Empty,
                next_attempt: 0,
            })),
        }
    }

    /// The full match list, fetching it if needed.
    pub async fn matches(&self) -> FetchResult {
        let (attempt_id, attempt) = {
            let mut inner = self.inner.lock().await;
            let in_flight = match &inner.slot {
                Slot::Ready(cached) if self.is_fresh(cached) => {
                    return Ok(cached.matches.clone());
                }
                Slot::Ready(_) => {
                    tracing::debug!("Cached match list expired");
                    None
                }
                Slot::Pending {
                    attempt_id,
                    attempt,
                } => Some((*attempt_id, attempt.clone())),
                Slot::Empty => None,
            };

            match in_flight {
                Some((attempt_id, attempt)) => {
                    tracing::debug!(attempt_id, "Joining in-flight feed fetch");
                    (attempt_id, attempt)
                }
                None => {
                    let attempt_id = inner.next_attempt;
                    inner.next_attempt += 1;
                    let attempt = self.start_attempt();
                    inner.slot = Slot::Pending {
                        attempt_id,
                        attempt: attempt.clone(),
                    };
                    (attempt_id, attempt)
                }
            }
        };

        let result = attempt.await;
        self.settle(attempt_id, &result).await;
        result
    }

    /// Look up one match by id.
    pub async fn match_by_id(&self, id: &str) -> Result<Option<Match>, Arc<FeedError>> {
        let matches = self.matches().await?;
        Ok(find_match(&matches, id).cloned())
    }

    /// Drop the cached list; the next call fetches again.
    ///
    /// A fetch already in flight still answers its waiters but is not stored.
    pub async fn invalidate(&self) {
        self.inner.lock().await.slot = Slot::Empty;
        tracing::info!("Match cache invalidated");
    }

    fn start_attempt(&self) -> Attempt {
        let client = self.client.clone();
        async move { client.fetch().await.map(Arc::new).map_err(Arc::new) }
            .boxed()
            .shared()
    }

    /// Replace the pending slot with the attempt's outcome. Only the first
    /// waiter to get here for a given attempt changes anything.
    async fn settle(&self, attempt_id: u64, result: &FetchResult) {
        let mut inner = self.inner.lock().await;
        let current = matches!(
            &inner.slot,
            Slot::Pending { attempt_id: pending, .. } if *pending == attempt_id
        );
        if !current {
            return;
        }

        inner.slot = match result {
            Ok(matches) => Slot::Ready(Cached {
                matches: matches.clone(),
                fetched_at: Instant::now(),
            }),
            Err(_) => Slot::Empty,
        };
    }

    fn is_fresh(&self, cached: &Cached) -> bool {
        match self.ttl {
            Some(ttl) => cached.fetched_at.elapsed() < ttl,
            None => true,
        }
    }
}
