//! Scripted scrolling session over a page

use reveal_core::{document, NodeId};
use reveal_site::{Page, PageSnapshot};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// How a session scrolls and ticks
#[derive(Clone, Copy, Debug)]
pub struct SimulationOptions {
    /// Pixels scrolled per step
    pub scroll_step: f32,
    /// Frame length in milliseconds
    pub frame_ms: u32,
    /// Frames run after each scroll step
    pub frames_per_step: u32,
    /// Scroll back to the top once the bottom is reached
    pub return_to_top: bool,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            scroll_step: 200.0,
            frame_ms: 16,
            frames_per_step: 10,
            return_to_top: true,
        }
    }
}

/// One reveal as it happened
#[derive(Clone, Debug, Serialize)]
pub struct RevealEvent {
    pub node: usize,
    pub id: Option<String>,
    pub time_ms: u64,
    pub scroll_y: f32,
}

#[derive(Clone, Debug, Serialize)]
pub struct SimulationReport {
    pub reveals: Vec<RevealEvent>,
    /// Reveal targets never brought into view
    pub pending: usize,
    /// Text writes per element id, counting frames included
    pub text_updates: BTreeMap<String, usize>,
    pub snapshot: PageSnapshot,
}

/// Lowest edge of any laid-out element
pub fn document_height(page: &Page) -> f32 {
    let doc = document::read(page.document());
    doc.subtree(doc.body())
        .into_iter()
        .filter_map(|node| doc.bounds(node))
        .map(|bounds| bounds.bottom())
        .fold(0.0, f32::max)
}

/// Load the page, scroll through it and let everything settle
pub fn run(page: &mut Page, options: SimulationOptions) -> SimulationReport {
    let mut reveals = Vec::new();
    document::write(page.document()).record_text_changes();
    let revealed = page.load();
    record(page, &revealed, &mut reveals);

    let max_scroll = (document_height(page) - page.viewport().height).max(0.0);
    let step = options.scroll_step.max(1.0);
    debug!("Scrolling to {}px in steps of {}px", max_scroll, step);

    let mut scroll_y = 0.0;
    while scroll_y < max_scroll {
        scroll_y = (scroll_y + step).min(max_scroll);
        let revealed = page.scroll_to(scroll_y);
        record(page, &revealed, &mut reveals);
        for _ in 0..options.frames_per_step {
            let revealed = page.frame(options.frame_ms);
            record(page, &revealed, &mut reveals);
        }
    }

    if options.return_to_top {
        let revealed = page.scroll_to(0.0);
        record(page, &revealed, &mut reveals);
    }

    let revealed = page.settle(options.frame_ms, 60_000);
    record(page, &revealed, &mut reveals);

    SimulationReport {
        reveals,
        pending: page.controller().pending_count(),
        text_updates: text_updates(page),
        snapshot: page.snapshot(),
    }
}

fn text_updates(page: &Page) -> BTreeMap<String, usize> {
    let mut doc = document::write(page.document());
    let changes = doc.take_text_changes();
    let mut updates = BTreeMap::new();
    for change in changes {
        let key = doc
            .attribute(change.node, "id")
            .map_or_else(|| format!("#{}", change.node.index()), str::to_string);
        *updates.entry(key).or_insert(0) += 1;
    }
    updates
}

fn record(page: &Page, revealed: &[NodeId], reveals: &mut Vec<RevealEvent>) {
    if revealed.is_empty() {
        return;
    }
    let doc = document::read(page.document());
    let scroll_y = page.viewport().scroll_y;
    for &node in revealed {
        let id = doc.attribute(node, "id").map(str::to_string);
        info!(
            "Revealed {} at {}ms (scroll {}px)",
            id.as_deref().unwrap_or("<anonymous>"),
            page.now_ms(),
            scroll_y
        );
        reveals.push(RevealEvent {
            node: node.index(),
            id,
            time_ms: page.now_ms(),
            scroll_y,
        });
    }
}
