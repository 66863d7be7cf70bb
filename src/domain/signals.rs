//! Signal weights for domain confidence
//!
//! Confidence for a candidate domain is the weighted sum of the signal flags
//! that voted for it. The default ordering reflects how reliable each signal
//! has been in practice: usage patterns first, naming last.

use crate::models::DomainSignals;
use serde::{Deserialize, Serialize};

/// Weight applied to each kind of domain signal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalWeights {
    /// Files frequently imported together with this one (default: 0.35)
    #[serde(default = "default_co_usage_weight")]
    pub co_usage: f64,

    /// Types shared with exports of known domain (default: 0.30)
    #[serde(default = "default_type_reference_weight")]
    pub type_reference: f64,

    /// Keyword in the export's identifier (default: 0.15)
    #[serde(default = "default_export_name_weight")]
    pub export_name: f64,

    /// Keyword in one of the file's import paths (default: 0.10)
    #[serde(default = "default_import_path_weight")]
    pub import_path: f64,

    /// Keyword in the file's directory (default: 0.10)
    #[serde(default = "default_folder_structure_weight")]
    pub folder_structure: f64,
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self {
            co_usage: default_co_usage_weight(),
            type_reference: default_type_reference_weight(),
            export_name: default_export_name_weight(),
            import_path: default_import_path_weight(),
            folder_structure: default_folder_structure_weight(),
        }
    }
}

fn default_co_usage_weight() -> f64 {
    0.35
}

fn default_type_reference_weight() -> f64 {
    0.30
}

fn default_export_name_weight() -> f64 {
    0.15
}

fn default_import_path_weight() -> f64 {
    0.10
}

fn default_folder_structure_weight() -> f64 {
    0.10
}

impl SignalWeights {
    fn total(&self) -> f64 {
        self.co_usage + self.type_reference + self.export_name + self.import_path + self.folder_structure
    }

    /// Weights are finite, non-negative and sum to 1.0
    pub fn is_valid(&self) -> bool {
        let all_non_negative = [
            self.co_usage,
            self.type_reference,
            self.export_name,
            self.import_path,
            self.folder_structure,
        ]
        .iter()
        .all(|w| w.is_finite() && *w >= 0.0);
        all_non_negative && (self.total() - 1.0).abs() < 0.001
    }

    /// Rescale so the weights sum to 1.0. Negative and non-finite weights are
    /// clamped to 0; all-zero weights fall back to the defaults.
    pub fn normalize(&mut self) {
        for w in [
            &mut self.co_usage,
            &mut self.type_reference,
            &mut self.export_name,
            &mut self.import_path,
            &mut self.folder_structure,
        ] {
            *w = if w.is_finite() { w.max(0.0) } else { 0.0 };
        }

        let total = self.total();
        if total <= 0.0 {
            *self = Self::default();
            return;
        }
        self.co_usage /= total;
        self.type_reference /= total;
        self.export_name /= total;
        self.import_path /= total;
        self.folder_structure /= total;
    }

    /// Weighted sum of the set flags
    pub fn confidence(&self, signals: &DomainSignals) -> f64 {
        let mut confidence = 0.0;
        if signals.co_usage {
            confidence += self.co_usage;
        }
        if signals.type_reference {
            confidence += self.type_reference;
        }
        if signals.export_name {
            confidence += self.export_name;
        }
        if signals.import_path {
            confidence += self.import_path;
        }
        if signals.folder_structure {
            confidence += self.folder_structure;
        }
        confidence.min(1.0)
    }
}
