//! Stagger helper
//!
//! Spreads the start of a group of animations over time, one step per index.
//!
//! ```rust
//! use reveal_animation::Stagger;
//!
//! let stagger = Stagger::new(100);
//! assert_eq!(stagger.delay_for(0), 0);
//! assert_eq!(stagger.delay_for(2), 200);
//! ```

/// Per-index start delays
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Stagger {
    /// Delay between consecutive items (ms)
    pub step_ms: u32,
}

impl Stagger {
    pub fn new(step_ms: u32) -> Self {
        Self { step_ms }
    }

    /// Start delay for the item at `index`
    pub fn delay_for(&self, index: usize) -> u32 {
        let steps = u32::try_from(index).unwrap_or(u32::MAX);
        self.step_ms.saturating_mul(steps)
    }
}
