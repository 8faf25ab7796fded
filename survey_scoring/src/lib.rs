mod config;
pub mod builder;
pub mod quick_start;

use log::{debug, info};

use std::collections::BTreeMap;
use std::ops::{Add, AddAssign};

pub use crate::config::*;

/// Title of the generated report.
pub const REPORT_TITLE: &str = "Relatório Geral - Escala Remota ScoreCard";

/// Introduction paragraph of the generated report.
pub const REPORT_INTRODUCTION: &str = "A Escala Remota ScoreCard avalia a qualidade do \
suporte institucional, gerencial e tecnológico em ambientes de trabalho remoto e híbrido.";

// **** Private structures ****

// The sum of the item scores of one respondent within one dimension.
// Item scores are integers on the 1-5 scale, so sums stay integral; medians
// over them may be half-integral.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
struct ScoreSum(u32);

impl ScoreSum {
    const ZERO: ScoreSum = ScoreSum(0);
}

impl std::iter::Sum for ScoreSum {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        ScoreSum(iter.map(|s| s.0).sum())
    }
}

impl AddAssign for ScoreSum {
    fn add_assign(&mut self, rhs: ScoreSum) {
        self.0 += rhs.0;
    }
}

impl Add for ScoreSum {
    type Output = ScoreSum;
    fn add(self: ScoreSum, rhs: ScoreSum) -> ScoreSum {
        ScoreSum(self.0 + rhs.0)
    }
}

// The dimension sums of all respondents, in dataset order.
#[derive(Debug, Clone)]
struct DimensionScores {
    name: String,
    item_count: usize,
    sums: Vec<ScoreSum>,
}

impl DimensionScores {
    fn median(&self) -> f64 {
        let mut values: Vec<u32> = self.sums.iter().map(|s| s.0).collect();
        values.sort_unstable();
        median_of_sorted(&values)
    }
}

// Median with interpolation: mean of the two central values for even counts.
// The caller guarantees a non-empty, sorted slice.
fn median_of_sorted(values: &[u32]) -> f64 {
    let n = values.len();
    if n % 2 == 1 {
        values[n / 2] as f64
    } else {
        (values[n / 2 - 1] as f64 + values[n / 2] as f64) / 2.0
    }
}

fn median_f64(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

// **** Classification ****

// The quartile rule over an explicit theoretical range.
// Ties at q1 resolve to Bronze and ties at q3 resolve to Prata. The
// asymmetry is intentional and affects scores sitting exactly on a boundary.
fn classify_in_range(score: f64, min: f64, max: f64) -> Tier {
    let interval = max - min;
    let q1 = min + 0.25 * interval;
    let q3 = min + 0.75 * interval;
    if score <= q1 {
        Tier::Bronze
    } else if score <= q3 {
        Tier::Prata
    } else {
        Tier::Ouro
    }
}

fn band_in_range(score: f64, min: f64, max: f64) -> QuartileBand {
    match classify_in_range(score, min, max) {
        Tier::Bronze => QuartileBand::Low,
        Tier::Prata => QuartileBand::Mid,
        Tier::Ouro => QuartileBand::High,
    }
}

/// Classifies a dimension-level score against the quartiles of the
/// theoretical range `[item_count * 1, item_count * 5]`.
///
/// A zero item count has no defined quartiles and fails closed.
pub fn classify_dimension_score(score: f64, item_count: usize) -> Result<Tier, ScoringErrors> {
    if item_count == 0 {
        return Err(ScoringErrors::ZeroItems);
    }
    let min = item_count as f64;
    let max = item_count as f64 * 5.0;
    Ok(classify_in_range(score, min, max))
}

/// Classifies a single item score with the fixed thresholds of the original
/// questionnaire: `<= 2` Bronze, `<= 4` Prata, above Ouro.
///
/// This rule is independent of the item count of the enclosing dimension and
/// is deliberately distinct from [`classify_dimension_score`]. The two rules
/// are kept as separately named functions and are never unified.
pub fn classify_item_score(score: u8) -> Tier {
    if score <= 2 {
        Tier::Bronze
    } else if score <= 4 {
        Tier::Prata
    } else {
        Tier::Ouro
    }
}

// **** Aggregation ****

// Sums the item scores of every respondent for one dimension. The original
// item values are left untouched; the sums are a new derived column.
fn dimension_sums(
    respondents: &[Respondent],
    dimension: &Dimension,
    policy: MissingValuePolicy,
) -> Result<DimensionScores, ScoringErrors> {
    let mut sums: Vec<ScoreSum> = Vec::with_capacity(respondents.len());
    for (idx, r) in respondents.iter().enumerate() {
        let mut sum = ScoreSum::ZERO;
        for item in dimension.items.iter() {
            match r.items.get(item) {
                None => {
                    return Err(ScoringErrors::MissingItem {
                        respondent: idx,
                        item: item.clone(),
                    });
                }
                Some(None) => match policy {
                    MissingValuePolicy::CountAsZero => {}
                    MissingValuePolicy::FailFast => {
                        return Err(ScoringErrors::BlankItemValue {
                            respondent: idx,
                            item: item.clone(),
                        });
                    }
                },
                Some(Some(v)) => sum += ScoreSum(*v as u32),
            }
        }
        sums.push(sum);
    }
    Ok(DimensionScores {
        name: dimension.name.clone(),
        item_count: dimension.items.len(),
        sums,
    })
}

// **** Cross-tabulation ****

// Row-normalized percentages of tier assignment within the groups of one
// profile attribute. Rows are ordered by attribute value; the three tier
// columns are always present, zero-filled where a combination never occurs.
fn crosstab(
    tiers: &[Tier],
    attribute: &str,
    respondents: &[Respondent],
    dimension: &str,
) -> Result<CrosstabTable, ScoringErrors> {
    let mut counts: BTreeMap<String, [u32; 3]> = BTreeMap::new();
    for (idx, (tier, r)) in tiers.iter().zip(respondents.iter()).enumerate() {
        let value = r.profile.get(attribute).ok_or_else(|| {
            ScoringErrors::MissingProfileValue {
                respondent: idx,
                attribute: attribute.to_string(),
            }
        })?;
        let entry = counts.entry(value.clone()).or_insert([0u32; 3]);
        entry[tier.index()] += 1;
    }

    let rows: Vec<CrosstabRow> = counts
        .iter()
        .map(|(value, cs)| {
            let total: u32 = cs.iter().sum();
            let percentages = if total == 0 {
                [0.0; 3]
            } else {
                [
                    100.0 * cs[0] as f64 / total as f64,
                    100.0 * cs[1] as f64 / total as f64,
                    100.0 * cs[2] as f64 / total as f64,
                ]
            };
            CrosstabRow {
                value: value.clone(),
                percentages,
            }
        })
        .collect();

    Ok(CrosstabTable {
        dimension: dimension.to_string(),
        attribute: attribute.to_string(),
        rows,
    })
}

// **** Entry points ****

/// Runs the full scoring pass over one dataset: aggregation, dimension and
/// overall classification, chart data and all cross-tabulations.
///
/// Arguments:
/// * `respondents` the respondent records of the dataset
/// * `config` the dimension map and profile attributes
/// * `policy` how to treat present-but-blank item values
///
/// The pass is deterministic and recomputed in full on every call; nothing
/// is cached and the inputs are never mutated.
pub fn run_scoring_stats(
    respondents: &[Respondent],
    config: &ScoringConfig,
    policy: MissingValuePolicy,
) -> Result<ScoringResult, ScoringErrors> {
    config.validate()?;
    if respondents.is_empty() {
        return Err(ScoringErrors::EmptyDataset);
    }
    info!(
        "run_scoring_stats: processing {} respondents over {} dimensions",
        respondents.len(),
        config.dimensions.len()
    );

    // Per-dimension sums and medians.
    let mut scores: Vec<DimensionScores> = Vec::new();
    for d in config.dimensions.iter() {
        let ds = dimension_sums(respondents, d, policy)?;
        debug!("run_scoring_stats: {} sums: {:?}", d.name, ds.sums);
        scores.push(ds);
    }

    let mut summaries: Vec<DimensionSummary> = Vec::new();
    for ds in scores.iter() {
        let med = ds.median();
        let tier = classify_dimension_score(med, ds.item_count)?;
        let (min, max) = (ds.item_count as f64, ds.item_count as f64 * 5.0);
        summaries.push(DimensionSummary {
            name: ds.name.clone(),
            item_count: ds.item_count,
            median: med,
            tier,
            band: band_in_range(med, min, max),
        });
        info!("Dimension {}: median {} tier {}", ds.name, med, tier);
    }

    // Population-level classification. The quartiles come from the medians
    // of the theoretical bounds across dimensions, not from any respondent.
    let mins: Vec<f64> = config
        .dimensions
        .iter()
        .map(|d| d.items.len() as f64)
        .collect();
    let maxs: Vec<f64> = config
        .dimensions
        .iter()
        .map(|d| d.items.len() as f64 * 5.0)
        .collect();
    let overall_min = median_f64(&mins);
    let overall_max = median_f64(&maxs);
    let dim_medians: Vec<f64> = summaries.iter().map(|s| s.median).collect();
    let overall_median = median_f64(&dim_medians);
    let overall = OverallSummary {
        median: overall_median,
        tier: classify_in_range(overall_median, overall_min, overall_max),
        band: band_in_range(overall_median, overall_min, overall_max),
        theoretical_min: overall_min,
        theoretical_max: overall_max,
    };
    info!(
        "Overall: median {} over range [{}, {}] tier {}",
        overall.median, overall_min, overall_max, overall.tier
    );

    // Chart data: one bar per dimension plus the overall bar.
    let mut chart: Vec<ChartBar> = summaries
        .iter()
        .map(|s| ChartBar {
            label: s.name.clone(),
            value: s.median,
            tier: s.tier,
            annotation: format!("{:.1} ({})", s.median, s.band),
        })
        .collect();
    chart.push(ChartBar {
        label: "Selo Geral".to_string(),
        value: overall.median,
        tier: overall.tier,
        annotation: format!("{:.1} ({})", overall.median, overall.band),
    });

    // Per-respondent tiers feed the cross-tabulations. Respondents are
    // classified on their own sums here, not on the dataset medians.
    let mut crosstabs: Vec<CrosstabTable> = Vec::new();
    for ds in scores.iter() {
        let mut tiers: Vec<Tier> = Vec::with_capacity(ds.sums.len());
        for s in ds.sums.iter() {
            tiers.push(classify_dimension_score(s.0 as f64, ds.item_count)?);
        }
        for attribute in config.profile_attributes.iter() {
            crosstabs.push(crosstab(&tiers, attribute, respondents, &ds.name)?);
        }
    }

    Ok(ScoringResult {
        dimensions: summaries,
        overall,
        chart,
        crosstabs,
    })
}

/// Percentage distribution of respondents over the tiers for each selected
/// item of one dimension, under the fixed item-level rule.
///
/// An empty selection is a benign no-op and yields an empty vector. Blank
/// values count as 0 (Bronze) under `CountAsZero` and stop the computation
/// under `FailFast`.
pub fn item_distributions(
    respondents: &[Respondent],
    config: &ScoringConfig,
    dimension_name: &str,
    selected_items: &[String],
    policy: MissingValuePolicy,
) -> Result<Vec<ItemDistribution>, ScoringErrors> {
    let dimension = config
        .dimension(dimension_name)
        .ok_or_else(|| ScoringErrors::UnknownDimension(dimension_name.to_string()))?;
    if respondents.is_empty() {
        return Err(ScoringErrors::EmptyDataset);
    }

    let mut res: Vec<ItemDistribution> = Vec::new();
    for item in selected_items.iter() {
        if !dimension.items.contains(item) {
            return Err(ScoringErrors::UnknownItem {
                dimension: dimension.name.clone(),
                item: item.clone(),
            });
        }
        let mut counts = [0u32; 3];
        for (idx, r) in respondents.iter().enumerate() {
            let value = match r.items.get(item) {
                None => {
                    return Err(ScoringErrors::MissingItem {
                        respondent: idx,
                        item: item.clone(),
                    });
                }
                Some(None) => match policy {
                    MissingValuePolicy::CountAsZero => 0,
                    MissingValuePolicy::FailFast => {
                        return Err(ScoringErrors::BlankItemValue {
                            respondent: idx,
                            item: item.clone(),
                        });
                    }
                },
                Some(Some(v)) => *v,
            };
            counts[classify_item_score(value).index()] += 1;
        }
        let total = respondents.len() as f64;
        res.push(ItemDistribution {
            item: item.clone(),
            percentages: [
                100.0 * counts[0] as f64 / total,
                100.0 * counts[1] as f64 / total,
                100.0 * counts[2] as f64 / total,
            ],
        });
    }
    Ok(res)
}

/// Assembles the structured report document from a scoring result.
///
/// The document carries the title block with the generation date, the
/// introduction, one classification line per dimension plus the overall
/// tier, and one cross-tabulation subsection per (dimension, attribute)
/// pair. The scoring result itself is not modified.
pub fn build_report(result: &ScoringResult, generated_on: &str) -> Report {
    let summary: Vec<ReportSummaryLine> = result
        .dimensions
        .iter()
        .map(|s| ReportSummaryLine {
            dimension: s.name.clone(),
            median: s.median,
            tier: s.tier,
        })
        .collect();

    let crosstab_sections: Vec<ReportSection> = result
        .crosstabs
        .iter()
        .map(|t| {
            let mut header: Vec<String> = vec![t.attribute.clone()];
            header.extend(Tier::ALL.iter().map(|tier| tier.label().to_string()));
            let rows: Vec<Vec<String>> = t
                .rows
                .iter()
                .map(|row| {
                    let mut cells: Vec<String> = vec![row.value.clone()];
                    cells.extend(row.percentages.iter().map(|p| format!("{:.1}%", p)));
                    cells
                })
                .collect();
            ReportSection {
                heading: format!("{} x {}", t.dimension, t.attribute),
                header,
                rows,
            }
        })
        .collect();

    Report {
        title: REPORT_TITLE.to_string(),
        generated_on: generated_on.to_string(),
        introduction: REPORT_INTRODUCTION.to_string(),
        summary,
        overall_tier: result.overall.tier,
        crosstab_sections,
    }
}
