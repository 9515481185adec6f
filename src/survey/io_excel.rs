// Reader for Excel (.xlsx) survey exports, as downloaded from Microsoft
// Forms or Google Forms.

use calamine::{open_workbook, Reader, Xlsx};
use log::debug;
use snafu::{OptionExt, ResultExt};

use survey_aggregation::builder::DatasetBuilder;
use survey_aggregation::{CellValue, Dataset};

use crate::survey::{AggregationSnafu, EmptyExcelSnafu, OpeningExcelSnafu, SurveyResult};

pub fn read_excel_dataset(path: String, worksheet: Option<String>) -> SurveyResult<Dataset> {
    let p = path.clone();
    let mut workbook: Xlsx<_> =
        open_workbook(p).context(OpeningExcelSnafu { path: path.clone() })?;
    let wrange = match worksheet {
        Some(name) => workbook
            .worksheet_range(name.as_str())
            .context(EmptyExcelSnafu {})?
            .context(OpeningExcelSnafu { path })?,
        None => workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu {})?
            .context(OpeningExcelSnafu { path })?,
    };

    let mut rows = wrange.rows();
    let header = rows.next().context(EmptyExcelSnafu {})?;
    let columns: Vec<String> = header.iter().map(header_cell).collect();
    debug!("read_excel_dataset: columns: {:?}", columns);

    let mut builder = DatasetBuilder::new(&columns);
    for row in rows {
        let cells: Vec<CellValue> = row.iter().map(read_cell).collect();
        builder.push_row(cells).context(AggregationSnafu {})?;
    }
    Ok(builder.build())
}

fn header_cell(cell: &calamine::DataType) -> String {
    match cell {
        calamine::DataType::String(s) => s.trim().to_string(),
        calamine::DataType::Float(f) => format!("{}", f),
        calamine::DataType::Int(i) => format!("{}", i),
        _ => String::new(),
    }
}

fn read_cell(cell: &calamine::DataType) -> CellValue {
    match cell {
        calamine::DataType::String(s) if s.trim().is_empty() => CellValue::Missing,
        calamine::DataType::String(s) => CellValue::Text(s.clone()),
        calamine::DataType::Float(f) => CellValue::Number(*f),
        calamine::DataType::Int(i) => CellValue::Number(*i as f64),
        // Booleans, formula errors and dates do not map to survey responses.
        _ => CellValue::Missing,
    }
}
