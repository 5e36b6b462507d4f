//! Reveal Animation System
//!
//! Time-based tweens driven by a frame scheduler.
//!
//! # Features
//!
//! - **Easing**: named easing curves (`easeOutQuart` and friends)
//! - **Tweens**: several numeric properties interpolated together with a
//!   delay, a per-frame update callback and a completion callback
//! - **Stagger**: per-index start delays for groups of targets
//! - **Scheduler**: owns running tweens and steps them each frame; components
//!   hold a weak [`SchedulerHandle`] so a missing engine degrades gracefully

pub mod easing;
pub mod scheduler;
pub mod stagger;
pub mod tween;
pub mod values;

pub use easing::{Easing, UnknownEasing};
pub use scheduler::{AnimationScheduler, SchedulerHandle, TweenId};
pub use stagger::Stagger;
pub use tween::{CompleteCallback, Tween, TweenFrame, TweenProperty, UpdateCallback};
pub use values::Interpolate;
