use serde::{Deserialize, Serialize};

/// Display settings for CLI output
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct DisplaySettings {
    /// Colorize log prefixes and listings.
    /// Default: true
    pub colors: Option<bool>,

    /// Mark the highest-priority remote in `remote list`.
    /// Default: false
    pub mark_default: Option<bool>,
}

impl DisplaySettings {
    pub fn colors(&self) -> bool {
        self.colors.unwrap_or(true)
    }

    pub fn mark_default(&self) -> bool {
        self.mark_default.unwrap_or(false)
    }
}
