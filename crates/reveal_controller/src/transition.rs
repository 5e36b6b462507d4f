//! Style transitions
//!
//! Glue between tweens and element styles. Property names follow the CSS
//! transform vocabulary so a tween reads like the transition it replaces.

use std::sync::Arc;

use reveal_animation::{Tween, TweenFrame};
use reveal_core::{document, ElementStyle, NodeId, SharedDocument};

pub const OPACITY: &str = "opacity";
pub const TRANSLATE_X: &str = "translateX";
pub const TRANSLATE_Y: &str = "translateY";
pub const SCALE: &str = "scale";

/// Write the style properties of `frame` into `style`
///
/// Properties that are not style properties are ignored.
pub fn apply_frame(style: &mut ElementStyle, frame: &TweenFrame) {
    for (name, value) in frame.values() {
        match name {
            OPACITY => style.opacity = value,
            TRANSLATE_X => style.translate_x = value,
            TRANSLATE_Y => style.translate_y = value,
            SCALE => style.scale = value,
            _ => {}
        }
    }
}

/// Make every frame of `tween` land in `node`'s style
pub fn style_tween(doc: &SharedDocument, node: NodeId, tween: Tween) -> Tween {
    let doc = Arc::clone(doc);
    tween.on_update(move |frame| {
        document::write(&doc).update_style(node, |style| apply_frame(style, frame));
    })
}
