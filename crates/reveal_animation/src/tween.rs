//! Tweens
//!
//! A [`Tween`] interpolates one or more named numeric properties from a start
//! to an end value over a fixed duration, after an optional delay. It does not
//! know what it animates: every frame it hands a [`TweenFrame`] to its update
//! callback, which writes the values wherever they belong.
//!
//! ```rust
//! use reveal_animation::{Easing, Tween};
//! use std::sync::{Arc, Mutex};
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//!
//! let mut tween = Tween::new(600)
//!     .property("opacity", 0.0, 1.0)
//!     .property("translateY", 30.0, 0.0)
//!     .easing(Easing::EaseOutQuart)
//!     .on_update(move |frame| sink.lock().unwrap().push(frame.get("opacity")));
//!
//! tween.step(600.0);
//! assert!(tween.is_finished());
//! assert_eq!(seen.lock().unwrap().last(), Some(&Some(1.0)));
//! ```

use std::fmt;

use smallvec::SmallVec;

use crate::easing::Easing;
use crate::values::Interpolate;

/// Per-frame callback
pub type UpdateCallback = Box<dyn FnMut(&TweenFrame) + Send>;

/// Called once when the tween reaches its end
pub type CompleteCallback = Box<dyn FnOnce() + Send>;

/// One animated property
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TweenProperty {
    pub name: &'static str,
    pub from: f32,
    pub to: f32,
}

/// Property values at one point of a tween
#[derive(Clone, Debug, PartialEq)]
pub struct TweenFrame {
    values: SmallVec<[(&'static str, f32); 4]>,
    /// Linear progress (0.0 to 1.0)
    pub progress: f32,
    /// Eased progress
    pub eased: f32,
}

impl TweenFrame {
    /// Current value of a property
    pub fn get(&self, name: &str) -> Option<f32> {
        self.values
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, value)| *value)
    }

    pub fn values(&self) -> impl Iterator<Item = (&'static str, f32)> + '_ {
        self.values.iter().copied()
    }

    pub fn is_final(&self) -> bool {
        self.progress >= 1.0
    }
}

/// A timed, eased interpolation of named properties
pub struct Tween {
    properties: SmallVec<[TweenProperty; 4]>,
    duration_ms: u32,
    delay_ms: u32,
    easing: Easing,
    elapsed_ms: f32,
    finished: bool,
    on_update: Option<UpdateCallback>,
    on_complete: Option<CompleteCallback>,
}

impl fmt::Debug for Tween {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tween")
            .field("properties", &self.properties)
            .field("duration_ms", &self.duration_ms)
            .field("delay_ms", &self.delay_ms)
            .field("easing", &self.easing)
            .field("elapsed_ms", &self.elapsed_ms)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

impl Tween {
    /// Create a tween with no properties and the default ease-out-quart curve
    pub fn new(duration_ms: u32) -> Self {
        Self {
            properties: SmallVec::new(),
            duration_ms,
            delay_ms: 0,
            easing: Easing::default(),
            elapsed_ms: 0.0,
            finished: false,
            on_update: None,
            on_complete: None,
        }
    }

    /// Animate `name` from `from` to `to`
    pub fn property(mut self, name: &'static str, from: f32, to: f32) -> Self {
        self.properties.push(TweenProperty { name, from, to });
        self
    }

    /// Wait before the first animated frame
    pub fn delay(mut self, delay_ms: u32) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn on_update<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&TweenFrame) + Send + 'static,
    {
        self.on_update = Some(Box::new(callback));
        self
    }

    pub fn on_complete<F>(mut self, callback: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        self.on_complete = Some(Box::new(callback));
        self
    }

    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    pub fn properties(&self) -> &[TweenProperty] {
        &self.properties
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Linear progress through the animated part (0.0 during the delay)
    pub fn progress(&self) -> f32 {
        if self.finished {
            return 1.0;
        }
        let active = self.elapsed_ms - self.delay_ms as f32;
        if active < 0.0 {
            0.0
        } else if self.duration_ms == 0 {
            1.0
        } else {
            (active / self.duration_ms as f32).min(1.0)
        }
    }

    /// Property values at the current progress
    pub fn frame(&self) -> TweenFrame {
        let progress = self.progress();
        let eased = self.easing.apply(progress);
        let values = self
            .properties
            .iter()
            .map(|p| {
                let value = if progress >= 1.0 {
                    p.to
                } else {
                    p.from.lerp(&p.to, eased)
                };
                (p.name, value)
            })
            .collect();
        TweenFrame {
            values,
            progress,
            eased,
        }
    }

    /// Emit the starting frame without advancing time
    ///
    /// Called when the tween is handed to a scheduler so targets jump to their
    /// start values immediately, even while a delay is pending.
    pub fn emit_initial(&mut self) {
        if self.finished {
            return;
        }
        let frame = self.frame();
        if let Some(update) = self.on_update.as_mut() {
            update(&frame);
        }
    }

    /// Advance by `dt_ms`, emitting a frame if past the delay
    ///
    /// Returns true while the tween still has frames to play.
    pub fn step(&mut self, dt_ms: f32) -> bool {
        if self.finished {
            return false;
        }
        self.elapsed_ms += dt_ms.max(0.0);
        if self.elapsed_ms < self.delay_ms as f32 {
            return true;
        }

        let frame = self.frame();
        if let Some(update) = self.on_update.as_mut() {
            update(&frame);
        }
        if frame.is_final() {
            self.complete();
        }
        !self.finished
    }

    /// Jump straight to the end: emit the final frame and complete
    pub fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.elapsed_ms = self.delay_ms as f32 + self.duration_ms as f32;
        let frame = self.frame();
        if let Some(update) = self.on_update.as_mut() {
            update(&frame);
        }
        self.complete();
    }

    fn complete(&mut self) {
        self.finished = true;
        if let Some(done) = self.on_complete.take() {
            done();
        }
    }
}
