//! Stub transport for unit tests.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::options::ConnectionOptions;
use super::transport::{Request, Response, Transport};
use crate::error::ApiError;

enum Reply {
    Json(Value),
    Failure(String),
}

struct Route {
    fragment: String,
    replies: VecDeque<Reply>,
}

/// Replies to requests whose URL contains a registered fragment.
///
/// Replies for a fragment are consumed in order; the last one is repeated.
/// Every request is recorded.
#[derive(Clone, Default)]
pub(crate) struct StubTransport {
    routes: Arc<Mutex<Vec<Route>>>,
    calls: Arc<Mutex<Vec<(String, Request)>>>,
    yields: usize,
    in_flight: Arc<AtomicUsize>,
    peak_in_flight: Arc<AtomicUsize>,
}

impl StubTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(self, fragment: &str, body: Value) -> Self {
        self.push(fragment, Reply::Json(body));
        self
    }

    pub(crate) fn fail(self, fragment: &str, message: &str) -> Self {
        self.push(fragment, Reply::Failure(message.to_string()));
        self
    }

    /// Keeps every request pending for `yields` scheduler turns before replying,
    /// so that concurrent requests overlap.
    pub(crate) fn yielding(mut self, yields: usize) -> Self {
        self.yields = yields;
        self
    }

    fn push(&self, fragment: &str, reply: Reply) {
        let mut routes = self.routes.lock().unwrap();
        match routes.iter_mut().find(|r| r.fragment == fragment) {
            Some(route) => route.replies.push_back(reply),
            None => routes.push(Route {
                fragment: fragment.to_string(),
                replies: VecDeque::from([reply]),
            }),
        }
    }

    /// Connection options for `org`/`proj` on the default base URL using this stub.
    pub(crate) fn options(&self) -> ConnectionOptions {
        ConnectionOptions::builder()
            .organization("org")
            .project("proj")
            .transport(Arc::new(self.clone()))
            .build()
            .unwrap()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub(crate) fn urls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }

    pub(crate) fn requests(&self) -> Vec<(String, Request)> {
        self.calls.lock().unwrap().clone()
    }

    /// Highest number of requests that were pending at the same time.
    pub(crate) fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    pub(crate) fn calls_matching(&self, fragment: &str) -> usize {
        self.urls().iter().filter(|u| u.contains(fragment)).count()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn fetch(&self, url: &str, request: Request) -> Result<Response, ApiError> {
        let active = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(active, Ordering::SeqCst);
        for _ in 0..self.yields {
            tokio::task::yield_now().await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), request));

        let mut routes = self.routes.lock().unwrap();
        let route = routes
            .iter_mut()
            .find(|r| url.contains(&r.fragment))
            .ok_or_else(|| ApiError::Transport {
                url: url.to_string(),
                message: "no stubbed response".to_string(),
            })?;
        let reply = if route.replies.len() > 1 {
            route.replies.pop_front()
        } else {
            None
        };
        let reply = reply.as_ref().or(route.replies.front());

        match reply {
            Some(Reply::Json(body)) => Ok(Response::new(url, 200, body.to_string())),
            Some(Reply::Failure(message)) => Err(ApiError::Transport {
                url: url.to_string(),
                message: message.clone(),
            }),
            None => Err(ApiError::Transport {
                url: url.to_string(),
                message: "no stubbed response".to_string(),
            }),
        }
    }
}
