use serde::{Deserialize, Serialize};

use super::BoxRect;

/// Extra shrink applied once the fitted box is narrower than `below`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub below: f64,
    pub factor: f64,
}

/// How the global note scale follows the board size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScalePolicy {
    /// Box size at which notes render at scale 1.
    pub reference_width: f64,
    pub reference_height: f64,
    /// Cumulative: every breakpoint the width is under applies.
    pub breakpoints: Vec<Breakpoint>,
    pub min_scale: f64,
    pub max_scale: f64,
}

impl Default for ScalePolicy {
    fn default() -> Self {
        Self {
            reference_width: 1920.0,
            reference_height: 1080.0,
            breakpoints: vec![
                Breakpoint {
                    below: 900.0,
                    factor: 0.92,
                },
                Breakpoint {
                    below: 700.0,
                    factor: 0.86,
                },
                Breakpoint {
                    below: 520.0,
                    factor: 0.82,
                },
            ],
            min_scale: 0.28,
            max_scale: 1.0,
        }
    }
}

impl ScalePolicy {
    /// Visual scale for notes on a board of `rect`'s size. `None` when the
    /// box is degenerate.
    pub fn note_scale(&self, rect: &BoxRect) -> Option<f64> {
        if rect.is_degenerate() {
            return None;
        }

        let mut scale = (rect.width / self.reference_width).min(rect.height / self.reference_height);
        for breakpoint in &self.breakpoints {
            if rect.width < breakpoint.below {
                scale *= breakpoint.factor;
            }
        }
        Some(scale.max(self.min_scale).min(self.max_scale))
    }
}
