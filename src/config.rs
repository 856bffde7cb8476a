//! Analyzer configuration.
//!
//! The built-in configuration is [`AnalyzerConfig::standard`]. Alternates are
//! written in RON; any section left out falls back to its standard value.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{CatalogError, ClassifierRules, RiskCatalog, ScoringConfig};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub catalog: RiskCatalog,
    pub classifier: ClassifierRules,
    pub scoring: ScoringConfig,
}

impl AnalyzerConfig {
    pub fn standard() -> Self {
        Self {
            catalog: RiskCatalog::standard(),
            classifier: ClassifierRules::standard(),
            scoring: ScoringConfig::standard(),
        }
    }

    pub fn from_ron_str(source: &str) -> Result<Self, CatalogError> {
        ron::from_str(source).map_err(|e| CatalogError::Parse(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|e| CatalogError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_ron_str(&source)
    }

    pub fn to_ron_string(&self) -> Result<String, CatalogError> {
        let pretty = ron::ser::PrettyConfig::new().struct_names(true);
        ron::ser::to_string_pretty(self, pretty).map_err(|e| CatalogError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Severity;

    #[test]
    fn standard_config_round_trips_through_ron() {
        let config = AnalyzerConfig::standard();
        let text = config.to_ron_string().unwrap();
        assert_eq!(AnalyzerConfig::from_ron_str(&text).unwrap(), config);
    }

    #[test]
    fn missing_sections_use_standard_values() {
        let config = AnalyzerConfig::from_ron_str("(scoring: (high_points: 20.0, medium_points: 5.0, low_points: 2.0, dilution: 10.0, saturation: 25.0, unknown_discount: 0.5, adjustments: []))").unwrap();
        assert_eq!(config.catalog, RiskCatalog::standard());
        assert_eq!(config.scoring.high_points, 20.0);
        assert!(config.scoring.adjustments.is_empty());
    }

    #[test]
    fn load_reports_path_and_parse_errors() {
        let err = AnalyzerConfig::load("/no/such/config.ron").unwrap_err();
        assert!(matches!(err, CatalogError::Read { .. }));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.ron");
        fs::write(&path, "(catalog: 12)").unwrap();
        assert!(matches!(
            AnalyzerConfig::load(&path).unwrap_err(),
            CatalogError::Parse(_)
        ));
    }

    #[test]
    fn severities_are_plain_identifiers() {
        let text = AnalyzerConfig::standard().to_ron_string().unwrap();
        assert!(text.contains("base_severity: High"));
        assert!(Severity::Medium.to_string() == "Medium");
    }
}
