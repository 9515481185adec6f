// Primitives for reading CSV survey exports.

use log::debug;
use snafu::ResultExt;

use survey_aggregation::builder::DatasetBuilder;
use survey_aggregation::Dataset;

use crate::survey::{AggregationSnafu, CsvLineParseSnafu, CsvOpenSnafu, SurveyResult};

/// Reads a whole CSV export into a dataset. The first row holds the column
/// names; empty cells turn into missing values.
pub fn read_csv_dataset(path: &str) -> SurveyResult<Dataset> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .context(CsvOpenSnafu {})?;
    let columns: Vec<String> = rdr
        .headers()
        .context(CsvOpenSnafu {})?
        .iter()
        .map(|s| s.trim().to_string())
        .collect();
    debug!("read_csv_dataset: columns: {:?}", columns);

    let mut builder = DatasetBuilder::new(&columns);
    for (idx, line_r) in rdr.records().enumerate() {
        let line = line_r.context(CsvLineParseSnafu {})?;
        // The header is row 1 in spreadsheet conventions.
        debug!("read_csv_dataset: row {}: {:?}", idx + 2, line);
        let cells: Vec<String> = line.iter().map(|s| s.to_string()).collect();
        builder.push_text_row(&cells).context(AggregationSnafu {})?;
    }
    Ok(builder.build())
}
