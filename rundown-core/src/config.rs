//! View configuration passed explicitly into the engine

use crate::playback::TimerType;

/// Default number of timeline lanes before placements fall back to lane 0
pub const DEFAULT_MAX_LANE_DEPTH: usize = 5;

/// Width reserved for an event when checking lane collisions
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case", tag = "kind"))]
pub enum LabelReserve {
    /// Reserve only the time-proportional bar
    Bar,
    /// Reserve room for the title text when it renders wider than the bar
    Estimated {
        /// Approximate rendered width of one title character
        px_per_char: f64,
    },
}

impl LabelReserve {
    /// Returns the width to reserve for a bar of `bar_width` carrying `title`
    pub fn reserved_width(self, bar_width: f64, title: &str) -> f64 {
        match self {
            LabelReserve::Bar => bar_width,
            LabelReserve::Estimated { px_per_char } => {
                let label_width = title.chars().count() as f64 * px_per_char;
                bar_width.max(label_width)
            }
        }
    }
}

/// Presentation toggles chosen by the caller
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct ViewConfig {
    /// Adjust countdowns by the running offset
    pub show_projected: bool,
    /// Leave finished events out of the view
    pub hide_past: bool,
    /// Timeline width in pixels
    pub container_width: f64,
    /// Number of lanes before falling back to lane 0
    pub max_lane_depth: usize,
    /// Collision width used by the lane packer
    pub label_reserve: LabelReserve,
    /// How live timers are projected
    pub timer_type: TimerType,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            show_projected: false,
            hide_past: false,
            container_width: 1000.0,
            max_lane_depth: DEFAULT_MAX_LANE_DEPTH,
            label_reserve: LabelReserve::Bar,
            timer_type: TimerType::CountDown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_width() {
        assert_eq!(LabelReserve::Bar.reserved_width(12.0, "Opening"), 12.0);

        let estimated = LabelReserve::Estimated { px_per_char: 8.0 };
        assert_eq!(estimated.reserved_width(12.0, "Opening"), 56.0);
        assert_eq!(estimated.reserved_width(100.0, "Opening"), 100.0);
    }
}
