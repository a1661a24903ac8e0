//! Hourly-rate text field model

use serde::{Deserialize, Serialize};

use super::earnings::{compute_earnings, normalize_rate_on_blur, parse_rate, sanitize_rate_input};

pub const DEFAULT_RATE: &str = "25.00";

/// Raw hourly-rate text as the user sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateInput {
    text: String,
}

impl RateInput {
    /// Create a field holding `initial`, sanitized like a keystroke
    pub fn new(initial: &str) -> Self {
        Self {
            text: sanitize_rate_input(initial),
        }
    }

    /// Apply a keystroke edit
    pub fn on_change(&mut self, raw: &str) -> &str {
        self.text = sanitize_rate_input(raw);
        &self.text
    }

    /// Apply focus-loss normalization
    pub fn on_blur(&mut self) -> &str {
        self.text = normalize_rate_on_blur(&self.text);
        &self.text
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Numeric rate; unparseable text counts as zero
    pub fn value(&self) -> f64 {
        parse_rate(&self.text).unwrap_or(0.0)
    }

    /// Earnings for `seconds` at the current rate
    pub fn earnings_for(&self, seconds: u64) -> String {
        compute_earnings(seconds, self.value())
    }
}

impl Default for RateInput {
    fn default() -> Self {
        Self::new(DEFAULT_RATE)
    }
}
