use crate::constants::*;
use crate::error::{HighlightError, Result};
use crate::merge::MergeParams;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Which index kind wins when one selection resolves both words and lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precedence {
    #[default]
    LineFirst,
    WordFirst,
    Union,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub page_margin: f32,
    pub scroll_lead_in: f32,
    pub decay_ms: u64,
    pub line_alignment_ratio: f32,
    pub merge_gap_ratio: f32,
    pub precedence: Precedence,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            page_margin: PAGE_MARGIN,
            scroll_lead_in: SCROLL_LEAD_IN,
            decay_ms: ACTIVE_DECAY_MS,
            line_alignment_ratio: LINE_ALIGNMENT_RATIO,
            merge_gap_ratio: MERGE_GAP_RATIO,
            precedence: Precedence::default(),
        }
    }
}

impl HighlightConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: HighlightConfig = serde_json::from_str(json)
            .map_err(|e| HighlightError::SerializationError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let non_negative = [
            ("page_margin", self.page_margin),
            ("scroll_lead_in", self.scroll_lead_in),
            ("line_alignment_ratio", self.line_alignment_ratio),
            ("merge_gap_ratio", self.merge_gap_ratio),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(HighlightError::InvalidConfig(format!(
                    "{} must be a non-negative number",
                    name
                )));
            }
        }

        if self.decay_ms == 0 {
            return Err(HighlightError::InvalidConfig(
                "decay_ms must be positive".into(),
            ));
        }

        Ok(())
    }

    pub fn decay(&self) -> Duration {
        Duration::from_millis(self.decay_ms)
    }

    pub fn merge_params(&self) -> MergeParams {
        MergeParams {
            line_alignment_ratio: self.line_alignment_ratio,
            gap_ratio: self.merge_gap_ratio,
        }
    }
}

pub fn load_config(path: &Path) -> Result<HighlightConfig> {
    let json =
        fs::read_to_string(path).map_err(|e| HighlightError::FileReadError(e.to_string()))?;
    HighlightConfig::from_json_str(&json)
}

pub fn save_config(config: &HighlightConfig, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(config)
        .map_err(|e| HighlightError::SerializationError(e.to_string()))?;
    fs::write(path, json).map_err(|e| HighlightError::FileWriteError(e.to_string()))
}
