//! In-memory `Transport` double for unit tests.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::provider::client::Transport;
use crate::provider::types::{ProviderResult, TransportError};

type Handler = Box<dyn Fn(&Value) -> ProviderResult<Value> + Send + Sync>;

struct Route {
    method: &'static str,
    prefix: String,
    delay: Duration,
    handler: Handler,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A recorded outbound call.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: &'static str,
    pub url: String,
    pub body: Value,
}

/// Routes calls by method and URL prefix; unmatched calls fail with a
/// network error. Every call is recorded, matched or not.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<Vec<Arc<Route>>>,
    calls: Mutex<Vec<RecordedCall>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    bursts: AtomicUsize,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn add<F>(&self, method: &'static str, prefix: &str, delay: Duration, handler: F)
    where
        F: Fn(&Value) -> ProviderResult<Value> + Send + Sync + 'static,
    {
        lock(&self.routes).push(Arc::new(Route {
            method,
            prefix: prefix.to_string(),
            delay,
            handler: Box::new(handler),
        }));
    }

    pub fn on_get<F>(&self, prefix: &str, handler: F)
    where
        F: Fn(&Value) -> ProviderResult<Value> + Send + Sync + 'static,
    {
        self.add("GET", prefix, Duration::ZERO, handler);
    }

    pub fn on_post<F>(&self, prefix: &str, handler: F)
    where
        F: Fn(&Value) -> ProviderResult<Value> + Send + Sync + 'static,
    {
        self.add("POST", prefix, Duration::ZERO, handler);
    }

    /// GET route that answers only after `delay`.
    pub fn on_get_slow<F>(&self, prefix: &str, delay: Duration, handler: F)
    where
        F: Fn(&Value) -> ProviderResult<Value> + Send + Sync + 'static,
    {
        self.add("GET", prefix, delay, handler);
    }

    /// POST route that answers only after `delay`.
    pub fn on_post_slow<F>(&self, prefix: &str, delay: Duration, handler: F)
    where
        F: Fn(&Value) -> ProviderResult<Value> + Send + Sync + 'static,
    {
        self.add("POST", prefix, delay, handler);
    }

    /// Highest number of routed calls that were pending at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Number of times the transport went from idle to busy.
    pub fn bursts(&self) -> usize {
        self.bursts.load(Ordering::SeqCst)
    }

    /// Total number of calls issued.
    pub fn calls(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Number of calls whose URL starts with `prefix`.
    pub fn calls_to(&self, prefix: &str) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|c| c.url.starts_with(prefix))
            .count()
    }

    pub fn recorded(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    async fn dispatch(
        &self,
        method: &'static str,
        url: &str,
        body: Value,
        deadline: Duration,
    ) -> ProviderResult<Value> {
        lock(&self.calls).push(RecordedCall {
            method,
            url: url.to_string(),
            body: body.clone(),
        });

        let route = lock(&self.routes)
            .iter()
            .find(|r| r.method == method && url.starts_with(&r.prefix))
            .cloned();
        let Some(route) = route else {
            return Err(TransportError::Network(format!("no route for {} {}", method, url)).into());
        };

        let pending = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        if pending == 1 {
            self.bursts.fetch_add(1, Ordering::SeqCst);
        }
        self.peak_in_flight.fetch_max(pending, Ordering::SeqCst);

        let timed_out = route.delay > deadline;
        if !route.delay.is_zero() {
            tokio::time::sleep(route.delay.min(deadline)).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if timed_out {
            return Err(TransportError::Timeout(deadline.as_millis() as u64).into());
        }
        (route.handler)(&body)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get_json(&self, url: &str, deadline: Duration) -> ProviderResult<Value> {
        self.dispatch("GET", url, Value::Null, deadline).await
    }

    async fn post_json(
        &self,
        url: &str,
        body: &Value,
        deadline: Duration,
    ) -> ProviderResult<Value> {
        self.dispatch("POST", url, body.clone(), deadline).await
    }
}
