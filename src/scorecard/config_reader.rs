use crate::scorecard::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;
use snafu::prelude::*;
use std::fs;
use survey_scoring::{Dimension, ScoringConfig};

/// One dimension of the questionnaire, as declared in the configuration file.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct DimensionSource {
    pub name: String,
    pub items: Vec<String>,
}

/// The scorecard description read from a JSON configuration file.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ScorecardConfig {
    #[serde(rename = "scorecardName")]
    pub scorecard_name: Option<String>,
    #[serde(rename = "dimensions")]
    pub dimensions: Vec<DimensionSource>,
    #[serde(rename = "profileAttributes")]
    pub profile_attributes: Vec<String>,
}

pub fn to_scoring_config(cfg: &ScorecardConfig) -> ScoringConfig {
    ScoringConfig {
        dimensions: cfg
            .dimensions
            .iter()
            .map(|d| Dimension {
                name: d.name.clone(),
                items: d.items.clone(),
            })
            .collect(),
        profile_attributes: cfg.profile_attributes.clone(),
    }
}

pub fn read_config(path: String) -> ScResult<ScoringConfig> {
    let contents = fs::read_to_string(path.clone()).context(OpeningJsonSnafu { path })?;
    let cfg: ScorecardConfig = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(to_scoring_config(&cfg))
}

pub fn read_summary(path: String) -> ScResult<JSValue> {
    let contents = fs::read_to_string(path.clone()).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_file_round_trips_into_scoring_config() {
        let raw = r#"{
            "scorecardName": "Escala Remota ScoreCard",
            "dimensions": [
                {"name": "Ferramentas Tecnológicas", "items": ["ft1", "ft2", "ft3"]},
                {"name": "Tomada de Decisão", "items": ["td1"]}
            ],
            "profileAttributes": ["Sexo", "cargo"]
        }"#;
        let cfg: ScorecardConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(cfg.scorecard_name.as_deref(), Some("Escala Remota ScoreCard"));
        let sc = to_scoring_config(&cfg);
        assert_eq!(sc.dimensions.len(), 2);
        assert_eq!(sc.dimensions[0].items.len(), 3);
        assert_eq!(sc.profile_attributes, vec!["Sexo", "cargo"]);
        assert!(sc.validate().is_ok());
    }

    #[test]
    fn remota_is_the_original_questionnaire() {
        let sc = ScoringConfig::remota();
        assert_eq!(sc.dimensions.len(), 6);
        let ft = sc.dimension("Ferramentas Tecnológicas").unwrap();
        assert_eq!(ft.items.len(), 6);
        assert_eq!(ft.items[0], "ft1");
        assert_eq!(sc.profile_attributes.len(), 4);
        // Theoretical bounds used by the overall classification: the medians
        // over [7, 8, 9, 15, 6, 8] and [35, 40, 45, 75, 30, 40].
        let mins: Vec<usize> = sc.dimensions.iter().map(|d| d.items.len()).collect();
        assert_eq!(mins, vec![7, 8, 9, 15, 6, 8]);
    }
}
