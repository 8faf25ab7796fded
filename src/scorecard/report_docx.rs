// Renders the structured report into a Word document.

use docx_rs::{
    AlignmentType, BreakType, Docx, Paragraph, Run, Table, TableCell, TableRow,
};
use snafu::prelude::*;
use std::io::Cursor;
use survey_scoring::Report;

use crate::scorecard::*;

pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// A rendered report, ready to be written to disk or served.
pub struct ReportArtifact {
    pub filename: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

pub fn report_filename(generated_on: &str) -> String {
    format!("Relatorio_Geral_ScoreCard_{}.docx", generated_on)
}

// Font sizes are in half-points: 48 is a 24pt title, 24 is 12pt body text.
fn title_paragraph(text: &str) -> Paragraph {
    Paragraph::new()
        .add_run(Run::new().add_text(text).bold().size(48))
        .align(AlignmentType::Center)
}

fn heading_paragraph(text: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(text).bold().size(28))
}

fn body_paragraph(text: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(text).size(24))
}

fn cell(text: &str) -> TableCell {
    TableCell::new().add_paragraph(body_paragraph(text))
}

fn section_table(header: &[String], rows: &[Vec<String>]) -> Table {
    let mut table_rows: Vec<TableRow> = Vec::new();
    table_rows.push(TableRow::new(
        header
            .iter()
            .map(|h| {
                TableCell::new().add_paragraph(
                    Paragraph::new().add_run(Run::new().add_text(h.as_str()).bold().size(24)),
                )
            })
            .collect(),
    ));
    for row in rows.iter() {
        table_rows.push(TableRow::new(row.iter().map(|c| cell(c.as_str())).collect()));
    }
    Table::new(table_rows)
}

/// Renders the report sections in document order: title block, introduction,
/// the per-dimension classification, then one table per crosstab section.
pub fn render(report: &Report) -> ScResult<ReportArtifact> {
    let mut doc = Docx::new()
        .add_paragraph(title_paragraph(report.title.as_str()))
        .add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text(format!("Gerado em: {}", report.generated_on)).size(24))
                .align(AlignmentType::Center),
        )
        .add_paragraph(Paragraph::new())
        .add_paragraph(heading_paragraph("1. Introdução"))
        .add_paragraph(body_paragraph(report.introduction.as_str()))
        .add_paragraph(Paragraph::new())
        .add_paragraph(heading_paragraph("2. Classificação Geral"));

    for line in report.summary.iter() {
        doc = doc.add_paragraph(body_paragraph(
            format!(
                "- {}: Mediana = {:.1} / Selo = {}",
                line.dimension,
                line.median,
                line.tier.label()
            )
            .as_str(),
        ));
    }
    doc = doc.add_paragraph(
        Paragraph::new().add_run(
            Run::new()
                .add_text(format!("Classificação Geral: {}", report.overall_tier.label()))
                .bold()
                .size(24),
        ),
    );

    doc = doc
        .add_paragraph(Paragraph::new().add_run(Run::new().add_break(BreakType::Page)))
        .add_paragraph(heading_paragraph("3. Tabelas de Cruzamento Perfil x Selo"));
    for section in report.crosstab_sections.iter() {
        doc = doc
            .add_paragraph(body_paragraph(section.heading.as_str()))
            .add_table(section_table(&section.header, &section.rows))
            .add_paragraph(Paragraph::new());
    }

    let mut cur = Cursor::new(Vec::new());
    doc.build()
        .pack(&mut cur)
        .map_err(docx_rs::DocxError::from)
        .context(RenderingDocxSnafu {})?;
    Ok(ReportArtifact {
        filename: report_filename(report.generated_on.as_str()),
        mime: DOCX_MIME.to_string(),
        bytes: cur.into_inner(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use survey_scoring::{ReportSection, ReportSummaryLine, Tier, REPORT_INTRODUCTION, REPORT_TITLE};

    fn small_report() -> Report {
        Report {
            title: REPORT_TITLE.to_string(),
            generated_on: "2024-05-01".to_string(),
            introduction: REPORT_INTRODUCTION.to_string(),
            summary: vec![ReportSummaryLine {
                dimension: "Ferramentas Tecnológicas".to_string(),
                median: 18.0,
                tier: Tier::Prata,
            }],
            overall_tier: Tier::Prata,
            crosstab_sections: vec![ReportSection {
                heading: "Ferramentas Tecnológicas x Sexo".to_string(),
                header: vec![
                    "Sexo".to_string(),
                    "Bronze".to_string(),
                    "Prata".to_string(),
                    "Ouro".to_string(),
                ],
                rows: vec![vec![
                    "F".to_string(),
                    "33.3%".to_string(),
                    "33.3%".to_string(),
                    "33.3%".to_string(),
                ]],
            }],
        }
    }

    #[test]
    fn artifact_is_a_zip_archive() {
        let artifact = render(&small_report()).unwrap();
        // A .docx file is a zip container.
        assert_eq!(&artifact.bytes[0..2], b"PK");
        assert_eq!(artifact.mime, DOCX_MIME);
    }

    #[test]
    fn filename_carries_the_generation_date() {
        assert_eq!(
            report_filename("2024-05-01"),
            "Relatorio_Geral_ScoreCard_2024-05-01.docx"
        );
        let artifact = render(&small_report()).unwrap();
        assert_eq!(artifact.filename, "Relatorio_Geral_ScoreCard_2024-05-01.docx");
    }
}
