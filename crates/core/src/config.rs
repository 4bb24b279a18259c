use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One visual section of the story.
///
/// A section with no sub-steps takes one logical index. A section with
/// `K` sub-steps is pinned: it takes `K` logical indices that all render
/// at the same offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionConfig {
    pub label: String,
    #[serde(default)]
    pub sub_steps: Vec<String>,
}

impl SectionConfig {
    pub fn page(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            sub_steps: Vec::new(),
        }
    }

    pub fn pinned<I, S>(label: impl Into<String>, sub_steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            label: label.into(),
            sub_steps: sub_steps.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_pinned(&self) -> bool {
        !self.sub_steps.is_empty()
    }

    /// Number of logical indices this section occupies.
    pub fn span(&self) -> usize {
        self.sub_steps.len().max(1)
    }
}

/// Sequencer constants. Fixed for the lifetime of a mount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequencerConfig {
    pub sections: Vec<SectionConfig>,
    /// Height of one page in `vh`.
    pub page_size_vh: f64,
    /// Latch window after an accepted gesture.
    pub cooldown_ms: u64,
    /// Duration hosts should animate the offset over.
    pub transition_ms: u64,
    /// Wheel events with `|deltaY|` below this are noise.
    pub wheel_threshold: f64,
    /// Viewports narrower than this are mobile.
    pub mobile_breakpoint_px: f64,
    /// Sections must be at least this visible to win an intersection batch.
    pub min_visibility_ratio: f64,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            sections: vec![
                SectionConfig::page("Hero"),
                SectionConfig::page("Challenge"),
                SectionConfig::page("Promise"),
                SectionConfig::page("Services"),
                SectionConfig::page("Approach"),
                SectionConfig::pinned("Process", ["Discover", "Design", "Deliver"]),
                SectionConfig::page("Results"),
                SectionConfig::page("Clients"),
                SectionConfig::page("Team"),
                SectionConfig::page("FAQ"),
                SectionConfig::page("Contact"),
            ],
            page_size_vh: 100.0,
            cooldown_ms: 800,
            transition_ms: 700,
            wheel_threshold: 30.0,
            mobile_breakpoint_px: 768.0,
            min_visibility_ratio: 0.3,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("at least one section is required")]
    NoSections,
    #[error("section {0} has an empty label")]
    EmptyLabel(usize),
    #[error("sections {first} and {second} are both pinned; only one pinned range is supported")]
    MultiplePinned { first: usize, second: usize },
    #[error("page size must be positive, got {0}")]
    PageSize(f64),
    #[error("cooldown must be at least 1ms")]
    ZeroCooldown,
    #[error("wheel threshold must be non-negative, got {0}")]
    WheelThreshold(f64),
    #[error("visibility ratio must be within 0..=1, got {0}")]
    VisibilityRatio(f64),
    #[error("invalid config JSON: {0}")]
    Json(String),
}

impl SequencerConfig {
    /// Parse a (possibly partial) JSON document. Missing fields take defaults.
    pub fn from_json(data: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(data).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sections.is_empty() {
            return Err(ConfigError::NoSections);
        }
        let mut pinned: Option<usize> = None;
        for (i, section) in self.sections.iter().enumerate() {
            if section.label.trim().is_empty() {
                return Err(ConfigError::EmptyLabel(i));
            }
            if section.is_pinned() {
                if let Some(first) = pinned {
                    return Err(ConfigError::MultiplePinned { first, second: i });
                }
                pinned = Some(i);
            }
        }
        if self.page_size_vh.is_nan() || self.page_size_vh <= 0.0 {
            return Err(ConfigError::PageSize(self.page_size_vh));
        }
        if self.cooldown_ms == 0 {
            return Err(ConfigError::ZeroCooldown);
        }
        if self.wheel_threshold.is_nan() || self.wheel_threshold < 0.0 {
            return Err(ConfigError::WheelThreshold(self.wheel_threshold));
        }
        if !(0.0..=1.0).contains(&self.min_visibility_ratio) {
            return Err(ConfigError::VisibilityRatio(self.min_visibility_ratio));
        }
        Ok(())
    }

    /// Total number of logical indices.
    pub fn total_steps(&self) -> usize {
        self.sections.iter().map(SectionConfig::span).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_story_has_thirteen_steps() {
        let config = SequencerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sections.len(), 11);
        assert_eq!(config.total_steps(), 13);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = SequencerConfig::from_json(r#"{ "cooldown_ms": 1200 }"#).unwrap();
        assert_eq!(config.cooldown_ms, 1200);
        assert_eq!(config.total_steps(), 13);
        assert!((config.wheel_threshold - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn json_sections_without_sub_steps() {
        let config = SequencerConfig::from_json(
            r#"{ "sections": [ { "label": "A" }, { "label": "B", "sub_steps": ["x", "y"] } ] }"#,
        )
        .unwrap();
        assert_eq!(config.total_steps(), 3);
    }

    #[test]
    fn rejects_second_pinned_section() {
        let config = SequencerConfig {
            sections: vec![
                SectionConfig::pinned("One", ["a", "b"]),
                SectionConfig::page("Gap"),
                SectionConfig::pinned("Two", ["c"]),
            ],
            ..SequencerConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::MultiplePinned {
                first: 0,
                second: 2
            })
        );
    }

    #[test]
    fn rejects_bad_constants() {
        let base = SequencerConfig::default();
        let cases = [
            SequencerConfig {
                sections: vec![],
                ..base.clone()
            },
            SequencerConfig {
                page_size_vh: 0.0,
                ..base.clone()
            },
            SequencerConfig {
                cooldown_ms: 0,
                ..base.clone()
            },
            SequencerConfig {
                wheel_threshold: -1.0,
                ..base.clone()
            },
            SequencerConfig {
                min_visibility_ratio: 1.5,
                ..base.clone()
            },
            SequencerConfig {
                sections: vec![SectionConfig::page("  ")],
                ..base.clone()
            },
        ];
        for config in cases {
            assert!(config.validate().is_err(), "{config:?} should be rejected");
        }
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(
            SequencerConfig::from_json("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }
}
