//! Easing curves
//!
//! Maps linear progress `t` in `[0, 1]` to eased progress. Every curve
//! satisfies `apply(0) == 0` and `apply(1) == 1`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unrecognised easing name
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown easing {0:?}")]
pub struct UnknownEasing(pub String);

/// Named easing curve
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Easing {
    Linear,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseInQuart,
    /// Decelerating quartic, `1 - (1 - t)^4`
    #[default]
    EaseOutQuart,
    EaseInOutQuart,
}

impl Easing {
    /// Eased progress for linear progress `t` (clamped to `[0, 1]`)
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => 1.0 - (1.0 - t).powi(2),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::EaseInCubic => t.powi(3),
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t.powi(3)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::EaseInQuart => t.powi(4),
            Easing::EaseOutQuart => 1.0 - (1.0 - t).powi(4),
            Easing::EaseInOutQuart => {
                if t < 0.5 {
                    8.0 * t.powi(4)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(4) / 2.0
                }
            }
        }
    }

    /// Canonical camel-case name, e.g. `easeOutQuart`
    pub fn name(self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseInQuad => "easeInQuad",
            Easing::EaseOutQuad => "easeOutQuad",
            Easing::EaseInOutQuad => "easeInOutQuad",
            Easing::EaseInCubic => "easeInCubic",
            Easing::EaseOutCubic => "easeOutCubic",
            Easing::EaseInOutCubic => "easeInOutCubic",
            Easing::EaseInQuart => "easeInQuart",
            Easing::EaseOutQuart => "easeOutQuart",
            Easing::EaseInOutQuart => "easeInOutQuart",
        }
    }

    const ALL: [Easing; 10] = [
        Easing::Linear,
        Easing::EaseInQuad,
        Easing::EaseOutQuad,
        Easing::EaseInOutQuad,
        Easing::EaseInCubic,
        Easing::EaseOutCubic,
        Easing::EaseInOutCubic,
        Easing::EaseInQuart,
        Easing::EaseOutQuart,
        Easing::EaseInOutQuart,
    ];
}

impl FromStr for Easing {
    type Err = UnknownEasing;

    /// Accepts camel case (`easeOutQuart`), kebab case (`ease-out-quart`) and snake case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        Self::ALL
            .into_iter()
            .find(|easing| easing.name().to_ascii_lowercase() == normalized)
            .ok_or_else(|| UnknownEasing(s.to_string()))
    }
}

impl TryFrom<String> for Easing {
    type Error = UnknownEasing;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Easing> for String {
    fn from(easing: Easing) -> Self {
        easing.name().to_string()
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        for easing in Easing::ALL {
            assert_eq!(easing.apply(0.0), 0.0, "{easing} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6, "{easing} at 1");
        }
    }

    #[test]
    fn test_ease_out_quart_decelerates() {
        let e = Easing::EaseOutQuart;
        assert!((e.apply(0.5) - 0.9375).abs() < 1e-6);
        // Front-loaded: first half covers more than the second
        assert!(e.apply(0.25) > 0.25);
        assert!(e.apply(0.75) - e.apply(0.5) < e.apply(0.25));
    }

    #[test]
    fn test_clamps_out_of_range() {
        assert_eq!(Easing::EaseOutQuart.apply(-1.0), 0.0);
        assert_eq!(Easing::EaseOutQuart.apply(2.0), 1.0);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("easeOutQuart".parse(), Ok(Easing::EaseOutQuart));
        assert_eq!("ease-out-quart".parse(), Ok(Easing::EaseOutQuart));
        assert_eq!("ease_in_out_cubic".parse(), Ok(Easing::EaseInOutCubic));
        assert_eq!("linear".parse(), Ok(Easing::Linear));
        assert_eq!(
            "bouncy".parse::<Easing>(),
            Err(UnknownEasing("bouncy".into()))
        );
    }
}
