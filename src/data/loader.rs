//! Iris CSV loading and one-hot label encoding.
//!
//! Accepted format:
//! - UTF-8, comma-separated, double-quoted fields may contain commas
//! - optional header row (detected when all four feature cells are
//!   non-numeric, e.g. `sepal_length,sepal_width,...,class`)
//! - blank lines are ignored
//! - columns: four numeric features then the class name; extra trailing
//!   columns are ignored

use std::path::Path;

use tracing::{debug, info};

use crate::data::record::{Dataset, EncodedRecord, Record, FEATURE_COUNT};
use crate::error::{IrisError, Result};

/// Reads and parses the dataset at `path`.
pub fn load_dataset<P: AsRef<Path>>(path: P, categories: &[String]) -> Result<Dataset> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let dataset = parse_dataset(&text, categories)?;
    info!(path = %path.display(), rows = dataset.len(), "loaded dataset");
    Ok(dataset)
}

/// Parses CSV text into an encoded dataset.
pub fn parse_dataset(text: &str, categories: &[String]) -> Result<Dataset> {
    if categories.is_empty() {
        return Err(IrisError::Config("category list must not be empty".into()));
    }

    let mut records = Vec::new();
    let mut first_row = true;

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let cells = parse_csv_row(line);
        if first_row {
            first_row = false;
            if is_header(&cells) {
                debug!(line = line_no, "skipping header row");
                continue;
            }
        }

        let record = parse_record(&cells, line_no)?;
        let label = one_hot(categories, &record.class)?;
        records.push(EncodedRecord { features: record.features(), label });
    }

    if records.is_empty() {
        return Err(IrisError::Parse {
            line: 0,
            message: "no data rows".into(),
        });
    }

    Ok(Dataset::new(records, categories.to_vec()))
}

/// One-hot encodes `label` against the ordered category list.
///
/// Returns a vector of `categories.len()` zeros with a single 1.0 at the
/// label's position, or `IrisError::Encoding` if the label is not listed.
pub fn one_hot(categories: &[String], label: &str) -> Result<Vec<f64>> {
    let index = categories
        .iter()
        .position(|c| c == label)
        .ok_or_else(|| IrisError::Encoding {
            label: label.to_owned(),
            categories: categories.to_vec(),
        })?;
    let mut encoded = vec![0.0; categories.len()];
    encoded[index] = 1.0;
    Ok(encoded)
}

/// Converts one row of cells into a `Record`.
fn parse_record(cells: &[String], line_no: usize) -> Result<Record> {
    if cells.len() < FEATURE_COUNT + 1 {
        return Err(IrisError::Parse {
            line: line_no,
            message: format!(
                "expected {} columns (4 features + class), got {}",
                FEATURE_COUNT + 1,
                cells.len()
            ),
        });
    }

    let mut features = [0.0; FEATURE_COUNT];
    for (slot, cell) in features.iter_mut().zip(cells.iter()) {
        *slot = parse_float(cell, line_no)?;
    }
    let [sepal_length, sepal_width, petal_length, petal_width] = features;

    Ok(Record {
        sepal_length,
        sepal_width,
        petal_length,
        petal_width,
        class: cells[FEATURE_COUNT].trim().to_owned(),
    })
}

fn parse_float(cell: &str, line_no: usize) -> Result<f64> {
    let t = cell.trim();
    match t.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(IrisError::Parse {
            line: line_no,
            message: format!("'{}' is not a valid number", t),
        }),
    }
}

/// A row is a header only if every feature cell is non-empty and non-numeric;
/// a partly numeric first row is data and goes through `parse_record`.
fn is_header(cells: &[String]) -> bool {
    cells.len() >= FEATURE_COUNT
        && cells.iter().take(FEATURE_COUNT).all(|c| {
            let t = c.trim();
            !t.is_empty() && t.parse::<f64>().is_err()
        })
}

/// Splits a single CSV row, honouring double-quoted fields and `""` escapes.
fn parse_csv_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    fields.push(current);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> Vec<String> {
        vec!["A".into(), "B".into(), "C".into()]
    }

    #[test]
    fn one_hot_marks_exactly_one_index() {
        let cats = abc();
        for (i, c) in cats.iter().enumerate() {
            let v = one_hot(&cats, c).unwrap();
            assert_eq!(v.len(), cats.len());
            assert_eq!(v.iter().filter(|&&x| x == 1.0).count(), 1);
            assert_eq!(v[i], 1.0);
            assert_eq!(v.iter().sum::<f64>(), 1.0);
        }
    }

    #[test]
    fn one_hot_rejects_unknown_label() {
        let err = one_hot(&abc(), "D").unwrap_err();
        match err {
            IrisError::Encoding { label, categories } => {
                assert_eq!(label, "D");
                assert_eq!(categories, abc());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parses_three_rows() {
        let text = "5.1,3.5,1.4,0.2,A\n7.0,3.2,4.7,1.4,B\n6.3,3.3,6.0,2.5,C\n";
        let ds = parse_dataset(text, &abc()).unwrap();
        let labels: Vec<_> = ds.records().iter().map(|r| r.label.clone()).collect();
        assert_eq!(
            labels,
            vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0], vec![0.0, 0.0, 1.0]]
        );
        assert_eq!(ds.records()[1].features, [7.0, 3.2, 4.7, 1.4]);
    }

    #[test]
    fn skips_header_and_blank_lines() {
        let text = "sepal_length,sepal_width,petal_length,petal_width,class\n\n5.1,3.5,1.4,0.2,A\n\n";
        let ds = parse_dataset(text, &abc()).unwrap();
        assert_eq!(ds.len(), 1);
    }

    #[test]
    fn malformed_first_row_is_a_parse_error() {
        let text = "5.1,x,1.4,0.2,A\n7.0,3.2,4.7,1.4,B\n";
        match parse_dataset(text, &abc()) {
            Err(IrisError::Parse { line, message }) => {
                assert_eq!(line, 1);
                assert!(message.contains("'x'"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn quoted_class_is_unwrapped() {
        let ds = parse_dataset("5.1,3.5,1.4,0.2,\"B\"", &abc()).unwrap();
        assert_eq!(ds.records()[0].label, vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn malformed_number_reports_line() {
        let text = "5.1,3.5,1.4,0.2,A\n7.0,x,4.7,1.4,B\n";
        match parse_dataset(text, &abc()) {
            Err(IrisError::Parse { line, message }) => {
                assert_eq!(line, 2);
                assert!(message.contains("'x'"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn short_row_is_a_parse_error() {
        assert!(matches!(
            parse_dataset("5.1,3.5,1.4,A", &abc()),
            Err(IrisError::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn unknown_class_in_file_is_an_encoding_error() {
        assert!(matches!(
            parse_dataset("5.1,3.5,1.4,0.2,Z", &abc()),
            Err(IrisError::Encoding { .. })
        ));
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(parse_dataset("\n\n", &abc()), Err(IrisError::Parse { .. })));
        assert!(matches!(parse_dataset("1,2,3,4,A", &[]), Err(IrisError::Config(_))));
    }
}
