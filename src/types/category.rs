//! Risk category classification for scored records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Three-level delay risk bucket derived from a probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskCategory {
    HighRisk,
    MediumRisk,
    LowRisk,
}

impl RiskCategory {
    /// Map a probability to a category.
    ///
    /// Boundary values fall to the lower category: with the default
    /// thresholds, `p == 0.8` is Medium and `p == 0.5` is Low.
    pub fn from_probability(p: f64, thresholds: &CategoryThresholds) -> Self {
        if p > thresholds.high {
            RiskCategory::HighRisk
        } else if p > thresholds.medium {
            RiskCategory::MediumRisk
        } else {
            RiskCategory::LowRisk
        }
    }

    /// The exact label written to the enriched table.
    pub fn label(&self) -> &'static str {
        match self {
            RiskCategory::HighRisk => "High Risk",
            RiskCategory::MediumRisk => "Medium Risk",
            RiskCategory::LowRisk => "Low Risk",
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Probability cutoffs between categories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryThresholds {
    /// Strictly above this is High Risk.
    pub high: f64,
    /// Strictly above this (and at most `high`) is Medium Risk.
    pub medium: f64,
}

impl Default for CategoryThresholds {
    fn default() -> Self {
        Self {
            high: 0.8,
            medium: 0.5,
        }
    }
}
