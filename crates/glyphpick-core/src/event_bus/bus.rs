//! Event Bus implementation.
//!
//! Provides the whitelisted, synchronous EventBus used by selection services
//! to notify their views.

use parking_lot::RwLock;
use std::any::Any;
use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

use super::events::{EventKind, SelectionEvent};
use crate::error::EventBusError;

/// Subscription handle for unsubscribing from events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    /// Create a new unique subscription ID
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", &self.0.to_string()[..8])
    }
}

/// Filter to receive only specific event kinds
#[derive(Debug, Clone, Default)]
pub enum EventFilter {
    /// Receive all events.
    #[default]
    All,
    /// Receive events matching any of these kinds.
    Kinds(Vec<EventKind>),
}

impl EventFilter {
    /// Check if an event matches this filter
    pub fn matches(&self, event: &SelectionEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Kinds(kinds) => kinds.contains(&event.kind()),
        }
    }
}

/// Type alias for event handler functions
type EventHandler = Arc<dyn Fn(&SelectionEvent) + Send + Sync>;

/// Configuration for the event bus
#[derive(Debug, Clone)]
pub struct EventBusConfig {
    /// Whether to keep event history.
    pub enable_history: bool,
    /// Maximum number of events to retain in history.
    pub max_history_size: usize,
    /// How long to retain events in history.
    pub history_retention: Duration,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            enable_history: false,
            max_history_size: 256,
            history_retention: Duration::from_secs(300),
        }
    }
}

/// Outcome of one publish call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PublishReport {
    /// Subscribers that received the event and returned normally.
    pub delivered: usize,
    /// Subscribers that panicked while handling the event.
    pub failed: usize,
}

/// Event with timestamp for history
#[derive(Debug, Clone)]
struct TimestampedEvent {
    event: SelectionEvent,
    timestamp: Instant,
}

struct Subscription {
    id: SubscriptionId,
    filter: EventFilter,
    handler: EventHandler,
}

/// Synchronous publish/subscribe channel restricted to a whitelist of event kinds
///
/// Subscribers run on the publishing thread, in registration order. Each
/// subscriber runs behind its own panic boundary, so one failing view cannot
/// keep the event from the others.
pub struct EventBus {
    /// Kinds this bus accepts
    allowed: Vec<EventKind>,
    /// Registered handlers, in registration order
    handlers: RwLock<Vec<Subscription>>,
    /// Event history (optional)
    history: RwLock<VecDeque<TimestampedEvent>>,
    /// Configuration
    config: EventBusConfig,
}

impl EventBus {
    /// Create a new event bus with default configuration
    pub fn new(allowed: impl IntoIterator<Item = EventKind>) -> Result<Self, EventBusError> {
        Self::with_config(allowed, EventBusConfig::default())
    }

    /// Create a new event bus with custom configuration
    pub fn with_config(
        allowed: impl IntoIterator<Item = EventKind>,
        config: EventBusConfig,
    ) -> Result<Self, EventBusError> {
        let mut kinds: Vec<EventKind> = Vec::new();
        for kind in allowed {
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        if kinds.is_empty() {
            return Err(EventBusError::EmptyWhitelist);
        }
        Ok(Self {
            allowed: kinds,
            handlers: RwLock::new(Vec::new()),
            history: RwLock::new(VecDeque::new()),
            config,
        })
    }

    /// Kinds accepted by this bus
    pub fn allowed_kinds(&self) -> &[EventKind] {
        &self.allowed
    }

    pub fn is_allowed(&self, kind: EventKind) -> bool {
        self.allowed.contains(&kind)
    }

    /// Fails unless `kind` is whitelisted
    ///
    /// Lets wiring code check its needs once, at startup, instead of at the
    /// first publish.
    pub fn ensure_allowed(&self, kind: EventKind) -> Result<(), EventBusError> {
        if self.is_allowed(kind) {
            Ok(())
        } else {
            Err(EventBusError::UnsupportedEventKind {
                kind,
                allowed: self.allowed.clone(),
            })
        }
    }

    /// Publish an event to all matching subscribers
    ///
    /// Returns how many subscribers handled the event and how many panicked.
    pub fn publish(&self, event: SelectionEvent) -> Result<PublishReport, EventBusError> {
        self.ensure_allowed(event.kind())?;

        if self.config.enable_history {
            self.add_to_history(&event);
        }

        // Snapshot so handlers may subscribe or unsubscribe while being notified
        let targets: Vec<(SubscriptionId, EventHandler)> = self
            .handlers
            .read()
            .iter()
            .filter(|s| s.filter.matches(&event))
            .map(|s| (s.id, Arc::clone(&s.handler)))
            .collect();

        let mut report = PublishReport::default();
        for (id, handler) in targets {
            match catch_unwind(AssertUnwindSafe(|| handler(&event))) {
                Ok(()) => report.delivered += 1,
                Err(payload) => {
                    report.failed += 1;
                    tracing::warn!(
                        "Subscription {} failed on {}: {}",
                        id,
                        event.description(),
                        panic_message(payload.as_ref())
                    );
                }
            }
        }

        tracing::trace!(
            "Published {} to {} subscribers ({} failed)",
            event.description(),
            report.delivered,
            report.failed
        );
        Ok(report)
    }

    /// Subscribe to events with a synchronous handler
    ///
    /// The handler will be called on the publishing thread, so it should
    /// return quickly to avoid blocking event dispatch.
    pub fn subscribe<F>(&self, filter: EventFilter, handler: F) -> SubscriptionId
    where
        F: Fn(&SelectionEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId::new();
        self.handlers.write().push(Subscription {
            id,
            filter,
            handler: Arc::new(handler),
        });
        tracing::debug!("Subscription {} added", id);
        id
    }

    /// Unsubscribe from events
    ///
    /// Returns true if the subscription was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.write();
        let before = handlers.len();
        handlers.retain(|s| s.id != id);
        let removed = handlers.len() != before;
        if removed {
            tracing::debug!("Subscription {} removed", id);
        }
        removed
    }

    /// Get the number of active subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.handlers.read().len()
    }

    /// Get recent event history (if enabled)
    ///
    /// Returns events since the given instant, or all history if None.
    pub fn history(&self, since: Option<Instant>) -> Vec<SelectionEvent> {
        if !self.config.enable_history {
            return Vec::new();
        }

        let history = self.history.read();
        match since {
            Some(since) => history
                .iter()
                .filter(|e| e.timestamp >= since)
                .map(|e| e.event.clone())
                .collect(),
            None => history.iter().map(|e| e.event.clone()).collect(),
        }
    }

    /// Clear event history
    pub fn clear_history(&self) {
        self.history.write().clear();
    }

    /// Get the current configuration
    pub fn config(&self) -> &EventBusConfig {
        &self.config
    }

    /// Add an event to history, maintaining size and age limits
    fn add_to_history(&self, event: &SelectionEvent) {
        let mut history = self.history.write();
        let now = Instant::now();

        history.push_back(TimestampedEvent {
            event: event.clone(),
            timestamp: now,
        });

        let retention = self.config.history_retention;
        while history
            .front()
            .is_some_and(|e| now.duration_since(e.timestamp) > retention)
        {
            history.pop_front();
        }

        while history.len() > self.config.max_history_size {
            history.pop_front();
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("allowed", &self.allowed)
            .field("subscribers", &self.subscriber_count())
            .field("config", &self.config)
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
