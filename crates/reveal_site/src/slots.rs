use reveal_animation::{Tween, TweenId};
use reveal_controller::Capabilities;
use reveal_core::NodeId;
use rustc_hash::FxHashMap;

/// The latest tween started for each element
///
/// Starting a tween for an element cancels the one it replaces, so an
/// interrupted transition never completes on top of its successor.
#[derive(Debug, Default)]
pub struct TweenSlots {
    running: FxHashMap<NodeId, TweenId>,
}

impl TweenSlots {
    pub fn play(&mut self, capabilities: &Capabilities, node: NodeId, tween: Tween) {
        if let Some(previous) = self.running.remove(&node) {
            capabilities.cancel(previous);
        }
        if let Some(id) = capabilities.play(tween) {
            self.running.insert(node, id);
        }
    }
}
