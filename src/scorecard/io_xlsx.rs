// Primitives for reading the survey workbook.

use calamine::{open_workbook, Reader, Xlsx};
use log::debug;
use snafu::prelude::*;
use std::collections::HashMap;
use survey_scoring::{Respondent, ScoringConfig};

use crate::scorecard::*;

/// Reads one worksheet into respondent records.
///
/// Columns are located by name in the header row. Every configured item and
/// profile attribute must have a column; anything else in the sheet is
/// carried along untouched and ignored by the scoring pass.
pub fn read_survey(
    path: String,
    worksheet: &Option<String>,
    config: &ScoringConfig,
) -> ScResult<Vec<Respondent>> {
    let mut workbook: Xlsx<_> =
        open_workbook(path.clone()).context(OpeningExcelSnafu { path: path.clone() })?;
    let wrange = match worksheet {
        Some(name) => workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { name: name.clone() })?
            .context(OpeningExcelSnafu { path })?,
        None => workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu {})?
            .context(OpeningExcelSnafu { path })?,
    };

    let header = wrange.rows().next().context(EmptyExcelSnafu {})?;
    debug!("read_survey: header: {:?}", header);
    let col_index = header_index(header);

    // Every required column must be present before any row is read.
    let mut item_cols: Vec<(String, usize)> = Vec::new();
    for d in config.dimensions.iter() {
        for item in d.items.iter() {
            let idx = required_column(&col_index, item)?;
            item_cols.push((item.clone(), idx));
        }
    }
    let mut profile_cols: Vec<(String, usize)> = Vec::new();
    for attribute in config.profile_attributes.iter() {
        let idx = required_column(&col_index, attribute)?;
        profile_cols.push((attribute.clone(), idx));
    }

    let mut iter = wrange.rows();
    iter.next();
    let mut res: Vec<Respondent> = Vec::new();
    for (idx, row) in iter.enumerate() {
        // Rows are numbered as in the spreadsheet: 1-based, after the header.
        let lineno = idx + 2;
        debug!("read_survey: lineno: {:?} row: {:?}", lineno, row);
        let mut r = Respondent::default();
        for (item, col) in item_cols.iter() {
            let value = read_item_cell(row.get(*col), lineno, item)?;
            r.items.insert(item.clone(), value);
        }
        for (attribute, col) in profile_cols.iter() {
            let value = read_profile_cell(row.get(*col), lineno, attribute)?;
            r.profile.insert(attribute.clone(), value);
        }
        res.push(r);
    }
    Ok(res)
}

fn header_index(header: &[calamine::DataType]) -> HashMap<String, usize> {
    header
        .iter()
        .enumerate()
        .filter_map(|(idx, cell)| match cell {
            calamine::DataType::String(s) => Some((s.trim().to_string(), idx)),
            _ => None,
        })
        .collect()
}

fn required_column(col_index: &HashMap<String, usize>, name: &str) -> ScResult<usize> {
    col_index
        .get(name)
        .cloned()
        .context(MissingColumnSnafu { name })
}

// An item cell holds an integer on the 1-5 scale or is blank. The blank
// policy is applied later, during aggregation.
fn read_item_cell(
    cell: Option<&calamine::DataType>,
    lineno: usize,
    item: &str,
) -> ScResult<Option<u8>> {
    let checked = |v: i64| -> ScResult<Option<u8>> {
        if (1..=5).contains(&v) {
            Ok(Some(v as u8))
        } else {
            ScoreOutOfRangeSnafu {
                lineno,
                item,
                value: v,
            }
            .fail()
        }
    };
    match cell {
        None | Some(calamine::DataType::Empty) => Ok(None),
        Some(calamine::DataType::Int(i)) => checked(*i),
        Some(calamine::DataType::Float(f)) if f.fract() == 0.0 => checked(*f as i64),
        Some(calamine::DataType::String(s)) if s.trim().is_empty() => Ok(None),
        Some(calamine::DataType::String(s)) => match s.trim().parse::<i64>() {
            Result::Ok(v) => checked(v),
            Result::Err(_) => ExcelWrongCellTypeSnafu {
                lineno,
                column: item,
                content: s.clone(),
            }
            .fail(),
        },
        Some(other) => ExcelWrongCellTypeSnafu {
            lineno,
            column: item,
            content: format!("{:?}", other),
        }
        .fail(),
    }
}

// A profile cell holds a category label. Numeric labels are accepted and
// carried as text.
fn read_profile_cell(
    cell: Option<&calamine::DataType>,
    lineno: usize,
    attribute: &str,
) -> ScResult<String> {
    match cell {
        Some(calamine::DataType::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Some(calamine::DataType::Int(i)) => Ok(i.to_string()),
        Some(calamine::DataType::Float(f)) => Ok(format!("{}", f)),
        None | Some(calamine::DataType::Empty) => {
            EmptyProfileCellSnafu { lineno, attribute }.fail()
        }
        Some(calamine::DataType::String(_)) => EmptyProfileCellSnafu { lineno, attribute }.fail(),
        Some(other) => ExcelWrongCellTypeSnafu {
            lineno,
            column: attribute,
            content: format!("{:?}", other),
        }
        .fail(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::DataType;

    #[test]
    fn header_lookup_is_by_name() {
        let header = vec![
            DataType::String("id".to_string()),
            DataType::String("ft1".to_string()),
            DataType::String(" Sexo ".to_string()),
            DataType::Empty,
        ];
        let index = header_index(&header);
        assert_eq!(index.get("ft1"), Some(&1));
        assert_eq!(index.get("Sexo"), Some(&2));
        assert!(required_column(&index, "ft2").is_err());
    }

    #[test]
    fn item_cells_follow_the_scale() {
        assert_eq!(read_item_cell(Some(&DataType::Int(3)), 2, "ft1").unwrap(), Some(3));
        assert_eq!(
            read_item_cell(Some(&DataType::Float(5.0)), 2, "ft1").unwrap(),
            Some(5)
        );
        assert_eq!(
            read_item_cell(Some(&DataType::String("4".to_string())), 2, "ft1").unwrap(),
            Some(4)
        );
        assert_eq!(read_item_cell(Some(&DataType::Empty), 2, "ft1").unwrap(), None);
        assert_eq!(read_item_cell(None, 2, "ft1").unwrap(), None);
        assert!(read_item_cell(Some(&DataType::Int(6)), 2, "ft1").is_err());
        assert!(read_item_cell(Some(&DataType::Int(0)), 2, "ft1").is_err());
        assert!(read_item_cell(Some(&DataType::Float(3.5)), 2, "ft1").is_err());
        assert!(read_item_cell(Some(&DataType::String("abc".to_string())), 2, "ft1").is_err());
    }

    #[test]
    fn profile_cells_are_labels() {
        assert_eq!(
            read_profile_cell(Some(&DataType::String("gestor".to_string())), 2, "cargo").unwrap(),
            "gestor"
        );
        assert_eq!(
            read_profile_cell(Some(&DataType::Int(35)), 2, "Faixa_idade").unwrap(),
            "35"
        );
        assert!(read_profile_cell(Some(&DataType::Empty), 2, "Sexo").is_err());
        assert!(read_profile_cell(None, 2, "Sexo").is_err());
    }
}
