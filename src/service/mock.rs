//! In-memory domain service with simulated latency.
//!
//! Latency and failures can be scripted per call, the same way a mock HTTP
//! backend is given a queue of canned responses. Scripted entries are taken
//! in call order at the moment a call starts.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::domain::Entity;

use super::{Apply, DomainService, ServiceError};

/// Allocates ids for created entities.
///
/// Continues after the highest numeric id already present so created ids
/// never collide with seeded ones.
#[derive(Debug, Clone)]
pub struct IdSequence {
    next: u64,
}

impl IdSequence {
    pub fn after<T: Entity>(records: &[T]) -> Self {
        let max = records
            .iter()
            .filter_map(|r| r.id().parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Self { next: max + 1 }
    }

    pub fn next_id(&mut self) -> String {
        let id = self.next;
        self.next += 1;
        id.to_string()
    }
}

#[derive(Default)]
struct Script {
    latencies: VecDeque<Duration>,
    failures: VecDeque<ServiceError>,
}

struct MockInner<T> {
    records: Mutex<Vec<T>>,
    ids: Mutex<IdSequence>,
    script: Mutex<Script>,
    latency: Duration,
    base_url: String,
    calls: AtomicU64,
}

/// Mock-backed domain service over an in-memory dataset.
///
/// Cloning yields another handle to the same dataset.
pub struct MockService<T> {
    inner: Arc<MockInner<T>>,
}

impl<T> Clone for MockService<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// What one call will do once its latency has elapsed.
struct CallPlan {
    latency: Duration,
    failure: Option<ServiceError>,
}

impl CallPlan {
    async fn settle(self) -> Result<(), ServiceError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        match self.failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl<T: Apply> MockService<T> {
    pub fn new(records: Vec<T>, latency: Duration) -> Self {
        Self::with_base_url(records, latency, "mock://local")
    }

    pub fn with_base_url(records: Vec<T>, latency: Duration, base_url: &str) -> Self {
        let ids = IdSequence::after(&records);
        Self {
            inner: Arc::new(MockInner {
                records: Mutex::new(records),
                ids: Mutex::new(ids),
                script: Mutex::new(Script::default()),
                latency,
                base_url: base_url.to_string(),
                calls: AtomicU64::new(0),
            }),
        }
    }

    /// Use `latency` for the next call that has no scripted latency yet.
    pub fn enqueue_latency(&self, latency: Duration) {
        self.inner.script.lock().latencies.push_back(latency);
    }

    /// Fail the next call that has no scripted failure yet.
    pub fn enqueue_failure(&self, err: ServiceError) {
        self.inner.script.lock().failures.push_back(err);
    }

    /// Copy of the current dataset.
    pub fn records(&self) -> Vec<T> {
        self.inner.records.lock().clone()
    }

    /// Number of calls started so far.
    pub fn calls(&self) -> u64 {
        self.inner.calls.load(Ordering::SeqCst)
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    fn begin(&self, op: &'static str) -> CallPlan {
        let call = self.inner.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let mut script = self.inner.script.lock();
        let plan = CallPlan {
            latency: script.latencies.pop_front().unwrap_or(self.inner.latency),
            failure: script.failures.pop_front(),
        };
        tracing::debug!(
            domain = T::KIND,
            op,
            call,
            base_url = %self.inner.base_url,
            latency_ms = plan.latency.as_millis() as u64,
            scripted_failure = plan.failure.is_some(),
            "Mock service call"
        );
        plan
    }
}

impl<T: Apply> DomainService<T> for MockService<T> {
    async fn fetch_all(&self, filter: &T::Filter) -> Result<Vec<T>, ServiceError> {
        self.begin("fetch_all").settle().await?;
        let records = self.inner.records.lock();
        Ok(records.iter().filter(|r| r.matches(filter)).cloned().collect())
    }

    async fn fetch_one(&self, id: &str) -> Result<Option<T>, ServiceError> {
        self.begin("fetch_one").settle().await?;
        let records = self.inner.records.lock();
        Ok(records.iter().find(|r| r.id() == id).cloned())
    }

    async fn mutate(&self, action: T::Action) -> Result<T, ServiceError> {
        self.begin("mutate").settle().await?;
        let mut records = self.inner.records.lock();
        let mut ids = self.inner.ids.lock();
        T::apply(&mut records, action, &mut ids)
    }

    async fn remove(&self, id: &str) -> Result<(), ServiceError> {
        self.begin("remove").settle().await?;
        let mut records = self.inner.records.lock();
        let before = records.len();
        records.retain(|r| r.id() != id);
        if records.len() == before {
            return Err(ServiceError::NotFound {
                kind: T::KIND,
                id: id.to_string(),
            });
        }
        Ok(())
    }
}
