//! # Event Bus Module
//!
//! Synchronous publish/subscribe channel between selection services and the
//! views that display their results.
//!
//! ## Overview
//!
//! - Each bus is built with a whitelist of event kinds; anything else is refused
//! - Subscribers are called on the publishing thread, in registration order
//! - A panicking subscriber is logged and skipped, the others still get the event
//!
//! ## Usage
//!
//! ```rust,ignore
//! use glyphpick_core::event_bus::{EventBus, EventFilter, EventKind, SelectionEvent};
//!
//! let bus = EventBus::new([EventKind::Id, EventKind::EntityList])?;
//!
//! let subscription = bus.subscribe(
//!     EventFilter::Kinds(vec![EventKind::EntityList]),
//!     |event| {
//!         if let SelectionEvent::EntityList(list) = event {
//!             println!("selection: {:?}", list.ids());
//!         }
//!     },
//! );
//!
//! bus.unsubscribe(subscription);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
