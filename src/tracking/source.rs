// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Geolocation source abstraction.
//!
//! The platform location service is an external collaborator. The tracker
//! sees it as a one-shot fix request plus a cancellable subscription that
//! yields a stream of samples.

use futures_util::stream::{self, BoxStream, StreamExt};
use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

use crate::models::GeoSample;

/// Errors reported by the location service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    /// The user declined location access. Terminal for the session.
    #[error("Location permission denied")]
    PermissionDenied,

    /// No fix arrived in time. Retry by starting again.
    #[error("Timed out waiting for a position fix")]
    Timeout,

    /// The platform cannot provide locations at all.
    #[error("Location unavailable: {0}")]
    Unavailable(String),
}

impl LocationError {
    /// Whether calling `start()` again may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LocationError::Timeout)
    }
}

/// Options for a single fix request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixOptions {
    pub timeout: Duration,
    pub high_accuracy: bool,
}

/// Handle identifying one continuous subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Stream of continuous position updates.
pub type PositionStream = BoxStream<'static, Result<GeoSample, LocationError>>;

/// A live subscription: the handle to cancel it and its update stream.
pub struct Subscription {
    pub id: SubscriptionId,
    pub updates: PositionStream,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// Platform location service.
pub trait GeolocationSource: Send + Sync {
    /// Request one fix, outside any subscription cadence.
    fn current_fix(
        &self,
        options: FixOptions,
    ) -> impl Future<Output = Result<GeoSample, LocationError>> + Send;

    /// Start continuous updates.
    fn subscribe(&self) -> Result<Subscription, LocationError>;

    /// Stop continuous updates. Unknown handles are ignored.
    fn unsubscribe(&self, id: SubscriptionId);
}

type UpdateSender = mpsc::UnboundedSender<Result<GeoSample, LocationError>>;
type FixSender = oneshot::Sender<Result<GeoSample, LocationError>>;

/// Bridge from a callback-style platform API to [`GeolocationSource`].
///
/// The platform glue pushes samples with [`ChannelSource::publish`] and
/// answers fix requests with [`ChannelSource::resolve_fix`]; a fix resolved
/// before anyone asks is queued for the next request.
#[derive(Default)]
pub struct ChannelSource {
    inner: Mutex<ChannelInner>,
}

#[derive(Default)]
struct ChannelInner {
    next_id: u64,
    subscribers: HashMap<SubscriptionId, UpdateSender>,
    queued_fixes: VecDeque<Result<GeoSample, LocationError>>,
    waiting_fixes: Vec<FixSender>,
}

impl ChannelSource {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ChannelInner> {
        // A poisoned lock only means a panicking caller; the state is still usable.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Deliver a continuous update to every live subscriber.
    ///
    /// Returns the number of subscribers reached.
    pub fn publish(&self, sample: GeoSample) -> usize {
        self.broadcast(Ok(sample))
    }

    /// Deliver a continuous-update error to every live subscriber.
    pub fn publish_error(&self, error: LocationError) -> usize {
        self.broadcast(Err(error))
    }

    fn broadcast(&self, update: Result<GeoSample, LocationError>) -> usize {
        let mut inner = self.lock();
        inner
            .subscribers
            .retain(|_, tx| tx.send(update.clone()).is_ok());
        inner.subscribers.len()
    }

    /// Answer pending fix requests, or queue the answer for the next one.
    pub fn resolve_fix(&self, result: Result<GeoSample, LocationError>) {
        let mut inner = self.lock();
        let waiting: Vec<FixSender> = inner.waiting_fixes.drain(..).collect();
        let mut delivered = false;
        for tx in waiting {
            delivered |= tx.send(result.clone()).is_ok();
        }
        if !delivered {
            inner.queued_fixes.push_back(result);
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }
}

impl GeolocationSource for ChannelSource {
    async fn current_fix(&self, options: FixOptions) -> Result<GeoSample, LocationError> {
        let rx = {
            let mut inner = self.lock();
            if let Some(result) = inner.queued_fixes.pop_front() {
                return result;
            }
            let (tx, rx) = oneshot::channel();
            inner.waiting_fixes.push(tx);
            rx
        };

        match tokio::time::timeout(options.timeout, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(LocationError::Unavailable(
                "fix request dropped".to_string(),
            )),
            Err(_) => Err(LocationError::Timeout),
        }
    }

    fn subscribe(&self) -> Result<Subscription, LocationError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.lock();
        inner.next_id += 1;
        let id = SubscriptionId(inner.next_id);
        inner.subscribers.insert(id, tx);

        let updates = stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|update| (update, rx))
        })
        .boxed();

        tracing::debug!(subscription = id.0, "Location subscription started");
        Ok(Subscription { id, updates })
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        if self.lock().subscribers.remove(&id).is_some() {
            tracing::debug!(subscription = id.0, "Location subscription stopped");
        }
    }
}
