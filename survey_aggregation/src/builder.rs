pub use crate::model::*;

/// A builder for assembling a dataset row by row.
///
/// The builder checks that every record has exactly one cell per column, so
/// downstream code can index rows without guessing.
///
/// ```
/// pub use survey_aggregation::builder::DatasetBuilder;
/// # use survey_aggregation::AggregationErrors;
///
/// let mut builder = DatasetBuilder::new(&["teamwork".to_string(), "adaptability".to_string()]);
///
/// builder.push_text_row(&["4".to_string(), "5".to_string()])?;
/// builder.push_text_row(&["".to_string(), "3".to_string()])?;
/// let dataset = builder.build();
/// assert_eq!(dataset.num_rows(), 2);
///
/// # Ok::<(), AggregationErrors>(())
/// ```
pub struct DatasetBuilder {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl DatasetBuilder {
    pub fn new(columns: &[String]) -> DatasetBuilder {
        DatasetBuilder {
            columns: columns.to_vec(),
            rows: Vec::new(),
        }
    }

    /// Adds one record. The number of cells must match the column set.
    pub fn push_row(&mut self, cells: Vec<CellValue>) -> Result<(), AggregationErrors> {
        if cells.len() != self.columns.len() {
            return Err(AggregationErrors::MalformedRow {
                expected: self.columns.len(),
                actual: cells.len(),
            });
        }
        self.rows.push(cells);
        Ok(())
    }

    /// Adds one record of raw text cells, as read from a CSV export.
    ///
    /// Empty (or whitespace-only) cells are recorded as missing; everything
    /// else is kept as text for the coercion step to interpret.
    pub fn push_text_row(&mut self, cells: &[String]) -> Result<(), AggregationErrors> {
        let row: Vec<CellValue> = cells
            .iter()
            .map(|s| {
                if s.trim().is_empty() {
                    CellValue::Missing
                } else {
                    CellValue::Text(s.clone())
                }
            })
            .collect();
        self.push_row(row)
    }

    pub fn build(self) -> Dataset {
        Dataset {
            columns: self.columns,
            rows: self.rows,
        }
    }
}
