//! Host capabilities
//!
//! Whether an animation engine and a visibility watcher are available is
//! decided once, when the controller is built. Transitions consult the
//! result instead of probing the host each time.

use reveal_animation::{SchedulerHandle, Tween, TweenId};

/// What the host provides to the reveal controller
#[derive(Clone, Debug)]
pub struct Capabilities {
    animation: Option<SchedulerHandle>,
    watch: bool,
}

impl Capabilities {
    /// Resolve capabilities from what the host offers
    ///
    /// A handle whose scheduler is already gone counts as no animation engine.
    pub fn resolve(animation: Option<SchedulerHandle>, watch: bool) -> Self {
        let animation = animation.filter(SchedulerHandle::is_alive);
        if animation.is_none() {
            tracing::warn!(
                "Animation engine unavailable: reveal transitions will snap to their end state"
            );
        }
        if !watch {
            tracing::warn!(
                "Visibility watcher unavailable: revealed content will be shown immediately"
            );
        }
        Self { animation, watch }
    }

    /// Animation engine and visibility watcher both present
    pub fn full(animation: SchedulerHandle) -> Self {
        Self::resolve(Some(animation), true)
    }

    /// Visibility watcher only; every transition snaps
    pub fn without_animation() -> Self {
        Self::resolve(None, true)
    }

    pub fn has_animation(&self) -> bool {
        self.animation.is_some()
    }

    pub fn has_watch(&self) -> bool {
        self.watch
    }

    /// Run a tween on the engine, or jump it to its end
    ///
    /// Without an engine (or once it went away since construction) the
    /// tween is finished on the spot: its final frame and completion
    /// callback run before this returns, and the result is `None`.
    pub fn play(&self, tween: Tween) -> Option<TweenId> {
        let mut tween = match &self.animation {
            Some(handle) => match handle.try_animate(tween) {
                Ok(id) => return Some(id),
                Err(tween) => {
                    tracing::debug!("Animation engine went away; snapping transition");
                    tween
                }
            },
            None => tween,
        };
        tween.finish();
        None
    }

    /// Stop a running tween without completing it
    pub fn cancel(&self, id: TweenId) {
        if let Some(handle) = &self.animation {
            handle.cancel(id);
        }
    }
}
