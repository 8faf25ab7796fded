pub use crate::config::*;
use crate::{item_distributions, run_scoring_stats, ScoringResult};

/// A builder for assembling a dataset of respondents.
///
/// It is the simplest way to feed survey answers to the scoring pass when
/// the data does not come from a spreadsheet.
///
/// ```
/// pub use survey_scoring::builder::Builder;
/// pub use survey_scoring::{Dimension, ScoringConfig};
/// # use survey_scoring::ScoringErrors;
///
/// let config = ScoringConfig {
///     dimensions: vec![Dimension {
///         name: "Ferramentas Tecnológicas".to_string(),
///         items: vec!["ft1".to_string(), "ft2".to_string()],
///     }],
///     profile_attributes: vec!["Sexo".to_string()],
/// };
/// let mut builder = Builder::new(&config)?;
/// builder.add_respondent(&[("ft1", 5), ("ft2", 4)], &[("Sexo", "F")])?;
/// let result = builder.run()?;
///
/// # Ok::<(), ScoringErrors>(())
/// ```
pub struct Builder {
    pub(crate) _config: ScoringConfig,
    pub(crate) _policy: MissingValuePolicy,
    pub(crate) _respondents: Vec<Respondent>,
}

impl Builder {
    /// Creates a builder over a validated configuration.
    pub fn new(config: &ScoringConfig) -> Result<Builder, ScoringErrors> {
        config.validate()?;
        Ok(Builder {
            _config: config.clone(),
            _policy: MissingValuePolicy::default(),
            _respondents: Vec::new(),
        })
    }

    pub fn missing_value_policy(self, policy: MissingValuePolicy) -> Builder {
        Builder {
            _policy: policy,
            ..self
        }
    }

    /// Adds one respondent from `(item, score)` and `(attribute, value)`
    /// pairs. Items that belong to no configured dimension are accepted and
    /// ignored by the aggregation, like extra spreadsheet columns.
    pub fn add_respondent(
        &mut self,
        item_scores: &[(&str, u8)],
        profile: &[(&str, &str)],
    ) -> Result<(), ScoringErrors> {
        let mut r = Respondent::default();
        for (item, score) in item_scores {
            r.items.insert(item.to_string(), Some(*score));
        }
        for (attribute, value) in profile {
            r.profile.insert(attribute.to_string(), value.to_string());
        }
        self.add_respondent_record(&r)
    }

    pub fn add_respondent_record(&mut self, r: &Respondent) -> Result<(), ScoringErrors> {
        self._respondents.push(r.clone());
        Ok(())
    }

    pub fn respondents(&self) -> &[Respondent] {
        &self._respondents
    }

    /// Runs the full scoring pass over the respondents added so far.
    pub fn run(&self) -> Result<ScoringResult, ScoringErrors> {
        run_scoring_stats(&self._respondents, &self._config, self._policy)
    }

    /// The item-level tier distributions for a selection of items of one
    /// dimension. An empty selection yields an empty vector.
    pub fn item_distributions(
        &self,
        dimension: &str,
        items: &[String],
    ) -> Result<Vec<ItemDistribution>, ScoringErrors> {
        item_distributions(&self._respondents, &self._config, dimension, items, self._policy)
    }
}
