//! # Shared Bus - Event Bus for Guard Events
//!
//! Carries the observable side effects of the delay queue and the recovery
//! module (slot appended, executed, expired, module enabled, recovery queued,
//! ...) to any number of subscribers.
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │ Delay Guard  │                    │  Telemetry   │
//! │ Swap Module  │    publish()       │  Operators   │
//! │              │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │  Event Bus   │          │
//!                  │              │ ─────────┘
//!                  └──────────────┘  subscribe()
//! ```
//!
//! Publishing never suspends: the guard core is synchronous and emits from
//! inside its critical sections. Subscribers receive asynchronously.

#![allow(clippy::missing_const_for_fn)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{EventFilter, EventTopic, GuardEvent};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, EventSubscriber, Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before lagging subscribers drop events.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
