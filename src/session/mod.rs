//! Session controller and its scene machine.
//!
//! - `scene`: scenes, events, notices and the acceptance table
//! - `timers`: cancellable one-shot and repeating deferred actions
//! - `controller`: the event dispatcher that ties them to a `MatchState`
//!
//! ## Example
//!
//! ```
//! use std::time::{Duration, Instant};
//! use tone_match::core::SessionSettings;
//! use tone_match::session::{Scene, SessionController, SessionEvent};
//!
//! let mut controller = SessionController::new(SessionSettings::new().with_seed(7));
//! let t0 = Instant::now();
//!
//! controller.handle(SessionEvent::StartSession, t0);
//! assert!(controller.scene().is_playing());
//!
//! controller.handle(SessionEvent::Flip(0), t0);
//! controller.handle(SessionEvent::Flip(1), t0);
//!
//! // The pair resolves after the reveal delay.
//! controller.advance(t0 + Duration::from_millis(500));
//! assert_eq!(controller.scene(), &Scene::Playing { turn_locked: false, paused: false });
//! ```

mod controller;
mod scene;
mod timers;

pub use controller::SessionController;
pub use scene::{Dispatch, EndReason, Notice, Scene, SessionEvent, SessionSummary, StatusView};
pub use timers::{FiredTimer, TimerId, TimerKind, TimerQueue};
