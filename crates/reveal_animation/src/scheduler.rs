//! Animation scheduler
//!
//! Owns every running [`Tween`] and steps them once per frame. Components
//! never hold the scheduler itself: they receive a [`SchedulerHandle`], a weak
//! reference that turns every operation into a no-op (and `animate` into
//! `None`) once the scheduler is gone. Callers use that `None` to fall back
//! to applying end states directly.
//!
//! ```rust
//! use reveal_animation::{AnimationScheduler, Tween};
//!
//! let scheduler = AnimationScheduler::new();
//! let handle = scheduler.handle();
//!
//! let id = handle.animate(Tween::new(600).property("opacity", 0.0, 1.0)).unwrap();
//! assert!(handle.is_running(id));
//!
//! scheduler.advance(600.0);
//! assert!(!handle.is_running(id));
//! assert_eq!(scheduler.tween_count(), 0);
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use slotmap::{new_key_type, SlotMap};

use crate::tween::Tween;

new_key_type! {
    /// Handle to a running tween
    pub struct TweenId;
}

/// Internal state of the animation scheduler
///
/// A slot holds `None` while its tween is being stepped outside the lock, so
/// callbacks can start or cancel animations without deadlocking.
struct SchedulerInner {
    tweens: SlotMap<TweenId, Option<Tween>>,
}

fn lock(inner: &Mutex<SchedulerInner>) -> MutexGuard<'_, SchedulerInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The animation scheduler that steps all running tweens
///
/// Held by the page (or whatever drives frames) and shared via [`SchedulerHandle`].
pub struct AnimationScheduler {
    inner: Arc<Mutex<SchedulerInner>>,
}

impl std::fmt::Debug for AnimationScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationScheduler")
            .field("tweens", &self.tween_count())
            .finish()
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(SchedulerInner {
                tweens: SlotMap::with_key(),
            })),
        }
    }

    /// Get a handle to this scheduler for passing to components
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Step all tweens by a fixed amount of time
    ///
    /// Returns true if any tweens are still running.
    pub fn advance(&self, dt_ms: f32) -> bool {
        let ids: Vec<TweenId> = lock(&self.inner).tweens.keys().collect();

        for id in ids {
            let taken = lock(&self.inner).tweens.get_mut(id).and_then(Option::take);
            let Some(mut tween) = taken else {
                continue;
            };

            let running = tween.step(dt_ms);

            let mut inner = lock(&self.inner);
            if running {
                // The slot is gone if a callback cancelled this tween
                if let Some(slot) = inner.tweens.get_mut(id) {
                    *slot = Some(tween);
                }
            } else {
                inner.tweens.remove(id);
            }
        }

        self.has_active_animations()
    }

    /// Check if any tweens are still running
    pub fn has_active_animations(&self) -> bool {
        !lock(&self.inner).tweens.is_empty()
    }

    /// Number of running tweens
    pub fn tween_count(&self) -> usize {
        lock(&self.inner).tweens.len()
    }
}

/// A weak handle to the animation scheduler
///
/// This is passed to components that need to start animations.
/// It won't prevent the scheduler from being dropped.
#[derive(Clone, Debug)]
pub struct SchedulerHandle {
    inner: Weak<Mutex<SchedulerInner>>,
}

impl SchedulerHandle {
    /// A handle that was never attached to a scheduler
    pub fn detached() -> Self {
        Self { inner: Weak::new() }
    }

    /// Start a tween
    ///
    /// The tween's starting frame is emitted immediately. Returns `None`
    /// (without emitting anything) when the scheduler no longer exists.
    pub fn animate(&self, tween: Tween) -> Option<TweenId> {
        self.try_animate(tween).ok()
    }

    /// Start a tween, handing it back untouched if the scheduler is gone
    pub fn try_animate(&self, mut tween: Tween) -> Result<TweenId, Tween> {
        let Some(inner) = self.inner.upgrade() else {
            tracing::trace!("SchedulerHandle: scheduler dropped, tween not started");
            return Err(tween);
        };
        tween.emit_initial();

        let id = lock(&inner).tweens.insert(Some(tween));
        Ok(id)
    }

    /// Stop a tween without completing it
    pub fn cancel(&self, id: TweenId) {
        if let Some(inner) = self.inner.upgrade() {
            lock(&inner).tweens.remove(id);
        }
    }

    pub fn is_running(&self, id: TweenId) -> bool {
        match self.inner.upgrade() {
            Some(inner) => {
                let guard = lock(&inner);
                guard.tweens.contains_key(id)
            }
            None => false,
        }
    }

    /// Check if the scheduler is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}
