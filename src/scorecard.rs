use log::{info, warn};

use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::PathBuf;

use serde_json::json;
use serde_json::Value as JSValue;
use survey_scoring::*;
use text_diff::print_diff;

use crate::args::Args;

pub mod config_reader;
pub mod io_xlsx;
pub mod report_docx;

#[derive(Debug, Snafu)]
pub enum ScorecardError {
    #[snafu(display("Error opening the workbook {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The workbook has no readable worksheet"))]
    EmptyExcel {},
    #[snafu(display("No worksheet named {name} in the workbook"))]
    MissingWorksheet { name: String },
    #[snafu(display("missing column: {name}"))]
    MissingColumn { name: String },
    #[snafu(display("Row {lineno}: the cell for column {column} is not a usable value: {content}"))]
    ExcelWrongCellType {
        lineno: usize,
        column: String,
        content: String,
    },
    #[snafu(display("Row {lineno}: score {value} for item {item} is outside the 1-5 scale"))]
    ScoreOutOfRange {
        lineno: usize,
        item: String,
        value: i64,
    },
    #[snafu(display("Row {lineno}: no value for profile attribute {attribute}"))]
    EmptyProfileCell { lineno: usize, attribute: String },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error writing {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error packing the report document"))]
    RenderingDocx { source: docx_rs::DocxError },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type ScResult<T> = Result<T, ScorecardError>;

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

// The machine-readable summary of an analysis. Percentages are rounded to
// one decimal, the display precision of the tables.
fn build_summary_js(result: &ScoringResult, distributions: &[ItemDistribution]) -> JSValue {
    let dimensions: Vec<JSValue> = result
        .dimensions
        .iter()
        .map(|s| {
            json!({
                "name": s.name,
                "items": s.item_count,
                "median": s.median,
                "tier": s.tier.label(),
                "band": s.band.to_string(),
            })
        })
        .collect();

    let chart: Vec<JSValue> = result
        .chart
        .iter()
        .map(|b| {
            json!({
                "label": b.label,
                "value": b.value,
                "tier": b.tier.label(),
                "color": b.tier.color(),
                "annotation": b.annotation,
            })
        })
        .collect();

    let crosstabs: Vec<JSValue> = result
        .crosstabs
        .iter()
        .map(|t| {
            let rows: Vec<JSValue> = t
                .rows
                .iter()
                .map(|r| {
                    json!({
                        "value": r.value,
                        "Bronze": round1(r.percentages[0]),
                        "Prata": round1(r.percentages[1]),
                        "Ouro": round1(r.percentages[2]),
                    })
                })
                .collect();
            json!({
                "dimension": t.dimension,
                "attribute": t.attribute,
                "rows": rows,
            })
        })
        .collect();

    let item_distributions: Vec<JSValue> = distributions
        .iter()
        .map(|d| {
            json!({
                "item": d.item,
                "Bronze": round1(d.percentages[0]),
                "Prata": round1(d.percentages[1]),
                "Ouro": round1(d.percentages[2]),
            })
        })
        .collect();

    json!({
        "dimensions": dimensions,
        "overall": {
            "median": result.overall.median,
            "tier": result.overall.tier.label(),
            "band": result.overall.band.to_string(),
            "theoreticalMin": result.overall.theoretical_min,
            "theoreticalMax": result.overall.theoretical_max,
        },
        "chart": chart,
        "crosstabs": crosstabs,
        "itemDistributions": item_distributions,
    })
}

/// The full pipeline: load the spreadsheet, run the scoring pass, then write
/// the requested outputs. Each step is a one-shot transformation; the first
/// failure stops the analysis for this dataset.
pub fn run_analysis(args: &Args) -> ScResult<()> {
    let config = match &args.config {
        Some(path) => config_reader::read_config(path.clone())?,
        None => ScoringConfig::remota(),
    };
    info!(
        "config: {} dimensions, profile attributes {:?}",
        config.dimensions.len(),
        config.profile_attributes
    );

    let respondents = io_xlsx::read_survey(args.input.clone(), &args.excel_worksheet_name, &config)?;
    info!("Read {} respondents from {}", respondents.len(), args.input);

    let policy = if args.fail_on_blank {
        MissingValuePolicy::FailFast
    } else {
        MissingValuePolicy::CountAsZero
    };

    let result = match run_scoring_stats(&respondents, &config, policy) {
        Result::Ok(x) => x,
        Result::Err(e) => {
            whatever!("Scoring error: {}", e)
        }
    };

    let distributions = match &args.dimension {
        Some(dim) => {
            let selection: Vec<String> = match &args.items {
                Some(items) => items.clone(),
                None => config
                    .dimension(dim)
                    .map(|d| d.items.clone())
                    .unwrap_or_default(),
            };
            match item_distributions(&respondents, &config, dim, &selection, policy) {
                Result::Ok(x) => x,
                Result::Err(e) => {
                    whatever!("Scoring error: {}", e)
                }
            }
        }
        None => Vec::new(),
    };

    let summary_js = build_summary_js(&result, &distributions);
    let pretty_js_summary = serde_json::to_string_pretty(&summary_js).context(ParsingJsonSnafu {})?;

    match &args.out {
        Some(out) if out == "stdout" => {
            println!("{}", pretty_js_summary);
        }
        Some(out) => {
            fs::write(out, &pretty_js_summary).context(WritingOutputSnafu { path: out.clone() })?;
            info!("Wrote summary to {}", out);
        }
        None => {}
    }

    if let Some(dir) = &args.report_dir {
        let generated_on = chrono::Local::now().format("%Y-%m-%d").to_string();
        let report = build_report(&result, &generated_on);
        let artifact = report_docx::render(&report)?;
        let p: PathBuf = [dir.as_str(), artifact.filename.as_str()].iter().collect();
        let p2 = p.as_path().display().to_string();
        fs::write(&p, &artifact.bytes).context(WritingOutputSnafu { path: p2.clone() })?;
        info!("Wrote report {} ({})", p2, artifact.mime);
    }

    // The reference summary, if provided for comparison
    if let Some(summary_p) = &args.reference {
        let summary_ref = config_reader::read_summary(summary_p.clone())?;
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_summary {
            warn!("Found differences with the reference summary");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_summary.as_ref(),
                "\n",
            );
            whatever!("Difference detected between calculated summary and reference summary")
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use survey_scoring::builder::Builder;

    fn small_result() -> ScoringResult {
        let config = ScoringConfig {
            dimensions: vec![Dimension {
                name: "Ferramentas Tecnológicas".to_string(),
                items: vec!["ft1".to_string(), "ft2".to_string()],
            }],
            profile_attributes: vec!["Sexo".to_string()],
        };
        let mut b = Builder::new(&config).unwrap();
        b.add_respondent(&[("ft1", 5), ("ft2", 5)], &[("Sexo", "F")])
            .unwrap();
        b.add_respondent(&[("ft1", 1), ("ft2", 1)], &[("Sexo", "F")])
            .unwrap();
        b.add_respondent(&[("ft1", 3), ("ft2", 3)], &[("Sexo", "F")])
            .unwrap();
        b.run().unwrap()
    }

    #[test]
    fn summary_percentages_are_rounded() {
        let result = small_result();
        let js = build_summary_js(&result, &[]);
        let rows = js["crosstabs"][0]["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 1);
        // One respondent per tier: 33.3% each after rounding.
        assert_eq!(rows[0]["value"], "F");
        assert_eq!(rows[0]["Bronze"], 33.3);
        assert_eq!(rows[0]["Prata"], 33.3);
        assert_eq!(rows[0]["Ouro"], 33.3);
    }

    #[test]
    fn summary_carries_all_sections() {
        let result = small_result();
        let js = build_summary_js(&result, &[]);
        assert_eq!(js["dimensions"].as_array().unwrap().len(), 1);
        assert_eq!(js["chart"].as_array().unwrap().len(), 2);
        assert_eq!(js["overall"]["tier"], "Prata");
        assert_eq!(js["itemDistributions"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn summary_is_stable_across_runs() {
        let result = small_result();
        let a = serde_json::to_string_pretty(&build_summary_js(&result, &[])).unwrap();
        let b = serde_json::to_string_pretty(&build_summary_js(&result, &[])).unwrap();
        assert_eq!(a, b);
    }
}
