//! Split layout sizing and persisted layout preferences
//!
//! The sizing math is pure: given a requested split percentage and a
//! viewport width it produces pane sizes that never shrink either pane
//! below its usable minimum, regardless of drag input or viewport
//! extremes.

use serde::{Deserialize, Serialize};

use crate::PreferenceStore;

/// Preference store key for the persisted layout preferences blob
pub const LAYOUT_PREFS_KEY: &str = "layout.preferences";

/// Viewport width below which the layout switches to a single column
pub const LAYOUT_BREAKPOINT_PX: f64 = 768.0;

/// Minimum usable width of the left (schema browser) pane
pub const MIN_LEFT_PANE_PX: f64 = 200.0;

/// Minimum usable width of the right (editor/results) pane
pub const MIN_RIGHT_PANE_PX: f64 = 400.0;

const DEFAULT_HORIZONTAL_SPLIT: f64 = 30.0;
const DEFAULT_VERTICAL_SPLIT: f64 = 60.0;

/// Responsive presentation mode for the workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    /// Below the breakpoint: single-column presentation
    Mobile,
    /// Above the breakpoint but too narrow for both pane minimums:
    /// single pane with the secondary pane as an overlay
    Constrained,
    /// Full two-pane split
    Desktop,
}

/// Fixed sizing constraints for the two-pane split
#[derive(Debug, Clone, Copy)]
pub struct LayoutConfig {
    pub breakpoint_px: f64,
    pub min_left_px: f64,
    pub min_right_px: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            breakpoint_px: LAYOUT_BREAKPOINT_PX,
            min_left_px: MIN_LEFT_PANE_PX,
            min_right_px: MIN_RIGHT_PANE_PX,
        }
    }
}

/// Pane percentages guaranteed to respect both minimum widths
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SafeSizes {
    pub left_percent: f64,
    pub right_percent: f64,
}

impl LayoutConfig {
    /// Determine the responsive mode for a viewport width
    pub fn determine_layout_mode(&self, viewport_width: f64) -> LayoutMode {
        if viewport_width < self.breakpoint_px {
            LayoutMode::Mobile
        } else if viewport_width < self.min_left_px + self.min_right_px {
            LayoutMode::Constrained
        } else {
            LayoutMode::Desktop
        }
    }

    /// Clamp a requested left-pane percentage into the range where both
    /// panes meet their minimum pixel widths.
    ///
    /// Non-finite requests are treated as the default split. When the
    /// viewport cannot satisfy both minimums at once, the space is
    /// divided proportionally to the minimums; the UI falls back to a
    /// single-pane presentation in that mode anyway.
    pub fn compute_safe_sizes(&self, requested_left_percent: f64, viewport_width: f64) -> SafeSizes {
        let requested = if requested_left_percent.is_finite() {
            requested_left_percent
        } else {
            DEFAULT_HORIZONTAL_SPLIT
        };

        let combined_min = self.min_left_px + self.min_right_px;
        if !(viewport_width.is_finite() && viewport_width >= combined_min) {
            let left = self.min_left_px / combined_min * 100.0;
            return SafeSizes {
                left_percent: left,
                right_percent: 100.0 - left,
            };
        }

        let min_left = self.min_left_px / viewport_width * 100.0;
        let max_left = 100.0 - self.min_right_px / viewport_width * 100.0;
        let left = requested.clamp(min_left, max_left);

        SafeSizes {
            left_percent: left,
            right_percent: 100.0 - left,
        }
    }
}

/// Persisted split ratios and panel state
///
/// Reloaded at startup through [`load_layout_preferences`], which
/// replaces out-of-range or non-numeric stored values with defaults
/// rather than failing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutPreferences {
    /// Left-pane share of the horizontal split, in percent
    #[serde(default = "default_horizontal_split")]
    pub horizontal_split_percent: f64,
    /// Editor share of the vertical editor/results split, in percent
    #[serde(default = "default_vertical_split")]
    pub vertical_split_percent: f64,
    /// Whether the schema metadata panel is collapsed
    #[serde(default)]
    pub metadata_panel_collapsed: bool,
}

fn default_horizontal_split() -> f64 {
    DEFAULT_HORIZONTAL_SPLIT
}

fn default_vertical_split() -> f64 {
    DEFAULT_VERTICAL_SPLIT
}

impl Default for LayoutPreferences {
    fn default() -> Self {
        Self {
            horizontal_split_percent: DEFAULT_HORIZONTAL_SPLIT,
            vertical_split_percent: DEFAULT_VERTICAL_SPLIT,
            metadata_panel_collapsed: false,
        }
    }
}

impl LayoutPreferences {
    /// Replace out-of-range or non-numeric fields with their defaults
    pub fn sanitized(self) -> Self {
        Self {
            horizontal_split_percent: sanitize_percent(
                self.horizontal_split_percent,
                DEFAULT_HORIZONTAL_SPLIT,
            ),
            vertical_split_percent: sanitize_percent(
                self.vertical_split_percent,
                DEFAULT_VERTICAL_SPLIT,
            ),
            metadata_panel_collapsed: self.metadata_panel_collapsed,
        }
    }
}

fn sanitize_percent(value: f64, default: f64) -> f64 {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        value
    } else {
        default
    }
}

/// Load layout preferences from a durable store
///
/// Never fails: missing entries, unreadable stores, and malformed or
/// out-of-range blobs all degrade to defaults with a logged warning.
pub fn load_layout_preferences(store: &dyn PreferenceStore) -> LayoutPreferences {
    match store.get(LAYOUT_PREFS_KEY) {
        Ok(Some(blob)) => match serde_json::from_str::<LayoutPreferences>(&blob) {
            Ok(prefs) => prefs.sanitized(),
            Err(e) => {
                tracing::warn!(error = %e, "malformed stored layout preferences, using defaults");
                LayoutPreferences::default()
            }
        },
        Ok(None) => LayoutPreferences::default(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read layout preferences, using defaults");
            LayoutPreferences::default()
        }
    }
}

/// Save layout preferences to a durable store
///
/// Store failures are logged and ignored; layout persistence is never
/// allowed to disturb the workspace.
pub fn save_layout_preferences(store: &dyn PreferenceStore, prefs: &LayoutPreferences) {
    let blob = match serde_json::to_string(prefs) {
        Ok(blob) => blob,
        Err(e) => {
            tracing::warn!(error = %e, "failed to serialize layout preferences");
            return;
        }
    };
    if let Err(e) = store.set(LAYOUT_PREFS_KEY, &blob) {
        tracing::warn!(error = %e, "failed to save layout preferences");
    }
}
