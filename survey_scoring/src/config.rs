// ********* Input data structures ***********

use std::collections::HashMap;
use std::error::Error;
use std::fmt::Display;

/// The ordinal quality tier assigned to a score.
///
/// Tiers are totally ordered: `Bronze < Prata < Ouro`.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum Tier {
    Bronze,
    Prata,
    Ouro,
}

impl Tier {
    /// All the tiers, in their display order. Tabular outputs always carry
    /// these three columns in this order, even when a column is empty.
    pub const ALL: [Tier; 3] = [Tier::Bronze, Tier::Prata, Tier::Ouro];

    pub fn label(&self) -> &'static str {
        match self {
            Tier::Bronze => "Bronze",
            Tier::Prata => "Prata",
            Tier::Ouro => "Ouro",
        }
    }

    /// The chart color conventionally associated with this tier.
    pub fn color(&self) -> &'static str {
        match self {
            Tier::Bronze => "red",
            Tier::Prata => "orange",
            Tier::Ouro => "green",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tier::Bronze => 0,
            Tier::Prata => 1,
            Tier::Ouro => 2,
        }
    }
}

impl Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The quartile band a score falls into, relative to the theoretical range
/// of its dimension. Used as the annotation on chart bars.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum QuartileBand {
    Low,
    Mid,
    High,
}

impl Display for QuartileBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            QuartileBand::Low => "≤25%",
            QuartileBand::Mid => "25%-75%",
            QuartileBand::High => ">75%",
        };
        write!(f, "{}", s)
    }
}

/// A named thematic group of survey items.
///
/// The item list is ordered and fixed for the duration of an analysis.
/// A dimension with no items is rejected before any score is computed.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Dimension {
    pub name: String,
    pub items: Vec<String>,
}

impl Dimension {
    /// The theoretical bounds of the dimension sum on a 1-5 scale.
    pub fn score_range(&self) -> (f64, f64) {
        let n = self.items.len() as f64;
        (n, n * 5.0)
    }
}

/// The full scoring configuration: the dimension-to-items mapping and the
/// profile attributes used for segmentation. Immutable during an analysis.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ScoringConfig {
    pub dimensions: Vec<Dimension>,
    pub profile_attributes: Vec<String>,
}

fn numbered_items(prefix: &str, count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("{}{}", prefix, i)).collect()
}

impl ScoringConfig {
    /// The built-in REMOTA scorecard: six dimensions covering institutional,
    /// managerial and technological support in remote/hybrid work, plus the
    /// four segmentation attributes of the original questionnaire.
    pub fn remota() -> ScoringConfig {
        let dims = [
            ("Política Institucional", "pi", 7),
            ("Gestão de Desempenho", "gd", 8),
            ("Suporte Gestor Projeto", "sg", 9),
            ("Suporte Saúde Mental/Física", "sm", 15),
            ("Ferramentas Tecnológicas", "ft", 6),
            ("Tomada de Decisão", "td", 8),
        ];
        ScoringConfig {
            dimensions: dims
                .iter()
                .map(|(name, prefix, count)| Dimension {
                    name: name.to_string(),
                    items: numbered_items(prefix, *count),
                })
                .collect(),
            profile_attributes: vec![
                "Faixa_idade".to_string(),
                "Faixa_renda".to_string(),
                "Sexo".to_string(),
                "cargo".to_string(),
            ],
        }
    }

    /// Checks that the configuration can produce well-defined classifications.
    pub fn validate(&self) -> Result<(), ScoringErrors> {
        if self.dimensions.is_empty() {
            return Err(ScoringErrors::EmptyConfiguration);
        }
        for d in self.dimensions.iter() {
            if d.items.is_empty() {
                return Err(ScoringErrors::EmptyDimension(d.name.clone()));
            }
        }
        Ok(())
    }

    pub fn dimension(&self, name: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|d| d.name == name)
    }
}

/// One survey answer sheet: the item scores (1-5 scale) and the categorical
/// profile attributes of a single respondent.
///
/// An item key mapped to `None` models a cell that is present in the source
/// table but left blank. An absent key means the column itself is missing,
/// which is always a fatal error during aggregation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Respondent {
    pub items: HashMap<String, Option<u8>>,
    pub profile: HashMap<String, String>,
}

/// What to do with a present-but-blank item score during summation.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub enum MissingValuePolicy {
    /// A blank cell contributes 0 to the dimension sum. This reproduces the
    /// numeric summation semantics of the reference implementation.
    #[default]
    CountAsZero,
    /// A blank cell stops the analysis for this dataset.
    FailFast,
}

// ******** Output data structures *********

/// The per-dataset summary of one dimension.
#[derive(PartialEq, Debug, Clone)]
pub struct DimensionSummary {
    pub name: String,
    pub item_count: usize,
    /// Median of the per-respondent dimension sums.
    pub median: f64,
    pub tier: Tier,
    pub band: QuartileBand,
}

/// The population-level classification, computed once per dataset.
///
/// The median of the per-dimension medians, classified against quartiles
/// derived from the medians of the theoretical minima and maxima. This is
/// not a per-respondent value.
#[derive(PartialEq, Debug, Clone)]
pub struct OverallSummary {
    pub median: f64,
    pub tier: Tier,
    pub band: QuartileBand,
    pub theoretical_min: f64,
    pub theoretical_max: f64,
}

/// One bar of the classification chart.
#[derive(PartialEq, Debug, Clone)]
pub struct ChartBar {
    pub label: String,
    pub value: f64,
    pub tier: Tier,
    /// Value and quartile band, as printed above the bar.
    pub annotation: String,
}

/// Percentage distribution of respondents over the three tiers for a single
/// item, under the fixed item-level rule.
#[derive(PartialEq, Debug, Clone)]
pub struct ItemDistribution {
    pub item: String,
    /// Percentages in `Tier::ALL` order, summing to 100 within rounding.
    pub percentages: [f64; 3],
}

/// One row of a cross-tabulation: a profile attribute value and the
/// percentage of its respondents in each tier, in `Tier::ALL` order.
#[derive(PartialEq, Debug, Clone)]
pub struct CrosstabRow {
    pub value: String,
    pub percentages: [f64; 3],
}

/// A row-normalized contingency table of tier assignment within the groups
/// of one profile attribute, for one dimension.
#[derive(PartialEq, Debug, Clone)]
pub struct CrosstabTable {
    pub dimension: String,
    pub attribute: String,
    pub rows: Vec<CrosstabRow>,
}

/// The outcome of a full scoring pass over one dataset.
#[derive(PartialEq, Debug, Clone)]
pub struct ScoringResult {
    pub dimensions: Vec<DimensionSummary>,
    pub overall: OverallSummary,
    pub chart: Vec<ChartBar>,
    pub crosstabs: Vec<CrosstabTable>,
}

// ******** Report structures *********

/// One line of the classification section of the report.
#[derive(PartialEq, Debug, Clone)]
pub struct ReportSummaryLine {
    pub dimension: String,
    pub median: f64,
    pub tier: Tier,
}

/// One cross-tabulation subsection of the report: a heading and a fully
/// formatted table (header row plus one row per attribute value).
#[derive(PartialEq, Debug, Clone)]
pub struct ReportSection {
    pub heading: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// A structured report document, ready to be rendered by a document writer.
#[derive(PartialEq, Debug, Clone)]
pub struct Report {
    pub title: String,
    pub generated_on: String,
    pub introduction: String,
    pub summary: Vec<ReportSummaryLine>,
    pub overall_tier: Tier,
    pub crosstab_sections: Vec<ReportSection>,
}

/// Errors that prevent the scoring pass from completing successfully.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ScoringErrors {
    /// No respondent records were provided.
    EmptyDataset,
    /// The configuration declares no dimensions.
    EmptyConfiguration,
    /// The named dimension has no items; its quartiles are undefined.
    EmptyDimension(String),
    /// A classification was requested over a zero-item range.
    ZeroItems,
    /// The named dimension is not part of the configuration.
    UnknownDimension(String),
    /// The item is not part of the selected dimension.
    UnknownItem { dimension: String, item: String },
    /// A respondent record has no column for a configured item.
    MissingItem { respondent: usize, item: String },
    /// A respondent record has no value for a configured profile attribute.
    MissingProfileValue { respondent: usize, attribute: String },
    /// A blank item value was found under the fail-fast policy.
    BlankItemValue { respondent: usize, item: String },
}

impl Error for ScoringErrors {}

impl Display for ScoringErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoringErrors::EmptyDataset => write!(f, "the dataset has no respondents"),
            ScoringErrors::EmptyConfiguration => {
                write!(f, "the configuration declares no dimensions")
            }
            ScoringErrors::EmptyDimension(name) => {
                write!(f, "dimension {} has no items", name)
            }
            ScoringErrors::ZeroItems => {
                write!(f, "cannot classify a score over a zero-item range")
            }
            ScoringErrors::UnknownDimension(name) => {
                write!(f, "unknown dimension: {}", name)
            }
            ScoringErrors::UnknownItem { dimension, item } => {
                write!(f, "item {} is not part of dimension {}", item, dimension)
            }
            ScoringErrors::MissingItem { respondent, item } => {
                write!(f, "respondent {}: missing item {}", respondent, item)
            }
            ScoringErrors::MissingProfileValue {
                respondent,
                attribute,
            } => {
                write!(
                    f,
                    "respondent {}: missing profile attribute {}",
                    respondent, attribute
                )
            }
            ScoringErrors::BlankItemValue { respondent, item } => {
                write!(f, "respondent {}: blank value for item {}", respondent, item)
            }
        }
    }
}
