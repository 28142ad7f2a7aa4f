//! Panel model shared by the synthesis and illustration contexts.

use serde::{Deserialize, Serialize};

/// Number of panels a story is split into.
pub const PANEL_COUNT: usize = 8;

/// Prompt text substituted when a panel arrives without one.
pub const PLACEHOLDER_PROMPT: &str = "(placeholder)";

/// Highest panel number a `[PROMPT n]` header can carry.
pub const MAX_PANEL_NUMBER: i64 = 99;

/// One numbered illustration unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Panel {
    /// Panel number as declared by its source. Not guaranteed contiguous.
    pub n: i64,
    /// Display title.
    pub title: String,
    /// Illustration prompt text.
    pub prompt: String,
}

impl Panel {
    /// Creates a panel, substituting the default title when `title` is blank.
    #[must_use]
    pub fn new(n: i64, title: &str, prompt: impl Into<String>) -> Self {
        let title = title.trim();
        let title = if title.is_empty() {
            default_title(n)
        } else {
            title.to_owned()
        };
        Self {
            n,
            title,
            prompt: prompt.into(),
        }
    }
}

/// Title used for a panel that does not declare one.
#[must_use]
pub fn default_title(n: i64) -> String {
    format!("Panel {n}")
}

/// Background text plus the ordered panels that share it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelSet {
    /// Shared style and context applied to every panel.
    pub background: String,
    /// Panels in source order.
    pub panels: Vec<Panel>,
}

impl PanelSet {
    /// Creates a panel set.
    #[must_use]
    pub fn new(background: impl Into<String>, panels: Vec<Panel>) -> Self {
        Self {
            background: background.into(),
            panels,
        }
    }

    /// Returns the panels stably sorted ascending by number.
    ///
    /// Panels sharing a number keep their relative source order.
    #[must_use]
    pub fn sorted_panels(&self) -> Vec<&Panel> {
        let mut sorted: Vec<&Panel> = self.panels.iter().collect();
        sorted.sort_by_key(|panel| panel.n);
        sorted
    }
}
