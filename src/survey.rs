use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};
use survey_aggregation::*;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::survey::cache::{CachedLoader, DatasetLoader};
use crate::survey::config_reader::*;

pub mod cache;
pub mod io_csv;
pub mod io_excel;

#[derive(Debug, Snafu)]
pub enum SurveyError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display(""))]
    EmptyExcel {},
    #[snafu(display(""))]
    OpeningJson { source: std::io::Error },
    #[snafu(display(""))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error opening CSV file"))]
    CsvOpen { source: csv::Error },
    #[snafu(display("Error reading CSV record"))]
    CsvLineParse { source: csv::Error },
    #[snafu(display(""))]
    MissingParentDir {},
    #[snafu(display("Error writing summary to {path}"))]
    WritingSummary {
        source: std::io::Error,
        path: String,
    },

    #[snafu(display("Analysis could not proceed: {source}"))]
    Aggregation { source: AggregationErrors },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type SurveyResult<T> = Result<T, SurveyError>;

/// The input formats understood by the loaders.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum InputType {
    Csv,
    Xlsx,
}

fn parse_input_type(provider: &str) -> SurveyResult<InputType> {
    match provider {
        "csv" => Ok(InputType::Csv),
        "xlsx" | "excel" => Ok(InputType::Xlsx),
        x => whatever!("Input type not implemented {:?}", x),
    }
}

/// A file-backed dataset loader, dispatching on the input type.
pub struct FileLoader {
    pub path: String,
    pub input_type: InputType,
    pub worksheet: Option<String>,
}

impl DatasetLoader for FileLoader {
    fn load(&mut self) -> SurveyResult<Dataset> {
        info!("Attempting to read survey file {:?}", self.path);
        match self.input_type {
            InputType::Csv => io_csv::read_csv_dataset(&self.path),
            InputType::Xlsx => {
                io_excel::read_excel_dataset(self.path.clone(), self.worksheet.clone())
            }
        }
    }
}

pub mod config_reader {
    use crate::survey::*;

    /// Where the survey export lives and how to read it.
    #[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
    pub struct SourceSettings {
        pub provider: String,
        #[serde(rename = "filePath")]
        pub file_path: String,
        #[serde(rename = "worksheetName")]
        pub worksheet_name: Option<String>,
    }

    /// One survey analysis: the source, the attribute columns to aggregate
    /// and the optional demographic breakdowns.
    #[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
    pub struct AnalysisConfig {
        #[serde(rename = "surveyName")]
        pub survey_name: String,
        pub source: SourceSettings,
        pub attributes: Option<Vec<String>>,
        #[serde(rename = "demographicColumns")]
        pub demographic_columns: Option<Vec<String>>,
        #[serde(rename = "groupColumn")]
        pub group_column: Option<String>,
        #[serde(rename = "cacheSeconds")]
        pub cache_seconds: Option<u64>,
    }

    pub fn read_config(path: String) -> SurveyResult<AnalysisConfig> {
        let contents = fs::read_to_string(path).context(OpeningJsonSnafu {})?;
        let config: AnalysisConfig =
            serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
        debug!("read_config: {:?}", config);
        Ok(config)
    }

    pub fn read_summary(path: String) -> SurveyResult<JSValue> {
        let contents = fs::read_to_string(path).context(OpeningJsonSnafu {})?;
        let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
        Ok(js)
    }
}

// Rounded to 6 decimals so that summaries are byte-stable across runs and
// can be diffed against a stored reference. Adding 0.0 turns a negative
// zero into a plain 0.0 before serialization.
fn js_num(x: f64) -> JSValue {
    json!((x * 1e6).round() / 1e6 + 0.0)
}

fn stats_to_json(result: &AggregateResult) -> Vec<JSValue> {
    result
        .stats
        .iter()
        .map(|s| {
            json!({
                "attribute": s.attribute,
                "meanScore": js_num(s.mean_score),
                "agreement": js_num(s.agreement),
            })
        })
        .collect()
}

fn sentiment_to_json(result: &AggregateResult) -> Vec<JSValue> {
    result
        .sentiment
        .iter()
        .map(|s| {
            json!({
                "attribute": s.attribute,
                "disagree": js_num(s.disagree_pct),
                "neutral": js_num(s.neutral_pct),
                "agree": js_num(s.agree_pct),
            })
        })
        .collect()
}

fn correlations_to_json(matrix: &CorrelationMatrix) -> JSValue {
    let coefficients: Vec<JSValue> = matrix
        .coefficients
        .iter()
        .map(|row| JSValue::Array(row.iter().map(|&x| js_num(x)).collect()))
        .collect();
    json!({
        "attributes": matrix.attributes,
        "coefficients": coefficients,
    })
}

fn top_pairs_to_json(result: &AggregateResult) -> Vec<JSValue> {
    result
        .top_pairs
        .iter()
        .map(|p| {
            json!({
                "first": p.first,
                "second": p.second,
                "coefficient": js_num(p.coefficient),
            })
        })
        .collect()
}

fn build_summary_js(
    survey_name: &Option<String>,
    result: &AggregateResult,
    demographics: &[(String, Vec<CategoryCount>)],
    groups: &Option<(String, Vec<GroupProfile>)>,
) -> JSValue {
    let mut demo_map: JSMap<String, JSValue> = JSMap::new();
    for (column, counts) in demographics {
        let entries: Vec<JSValue> = counts
            .iter()
            .map(|c| json!({"value": c.value, "count": c.count}))
            .collect();
        demo_map.insert(column.clone(), JSValue::Array(entries));
    }

    let group_js = match groups {
        Some((column, profiles)) => {
            let entries: Vec<JSValue> = profiles
                .iter()
                .map(|p| {
                    let mut means: JSMap<String, JSValue> = JSMap::new();
                    for (attribute, mean) in p.mean_scores.iter() {
                        means.insert(attribute.clone(), js_num(*mean));
                    }
                    json!({"group": p.group, "meanScores": means})
                })
                .collect();
            json!({"column": column, "groups": entries})
        }
        None => JSValue::Null,
    };

    json!({
        "survey": survey_name,
        "attributes": result.available,
        "overallAgreement": js_num(result.overall_agreement),
        "coreStrength": result.core_strength,
        "growthArea": result.growth_area,
        "stats": stats_to_json(result),
        "correlations": correlations_to_json(&result.correlations),
        "topPairs": top_pairs_to_json(result),
        "sentiment": sentiment_to_json(result),
        "ranking": result.ranking,
        "demographics": demo_map,
        "groupComparison": group_js,
    })
}

pub fn run_analysis(args: &Args) -> SurveyResult<()> {
    let config: Option<AnalysisConfig> = match &args.config {
        Some(p) => Some(read_config(p.clone())?),
        None => None,
    };
    info!("config: {:?}", config);

    // The input path on the command line wins; a path from the config file
    // is resolved relative to the config file itself.
    let input_path: PathBuf = match (&args.input, &args.config, &config) {
        (Some(p), _, _) => PathBuf::from(p),
        (None, Some(config_p), Some(c)) => {
            let root_p = Path::new(config_p.as_str())
                .parent()
                .context(MissingParentDirSnafu {})?;
            root_p.join(&c.source.file_path)
        }
        _ => whatever!("No input file specified. Use --input or --config."),
    };
    let input_path = input_path.as_path().display().to_string();

    let provider = args
        .input_type
        .clone()
        .or_else(|| config.as_ref().map(|c| c.source.provider.clone()))
        .unwrap_or_else(|| {
            if input_path.ends_with(".xlsx") {
                "xlsx".to_string()
            } else {
                "csv".to_string()
            }
        });
    let input_type = parse_input_type(provider.as_str())?;
    debug!("run_analysis: input {:?} as {:?}", input_path, input_type);

    let worksheet = args
        .excel_worksheet_name
        .clone()
        .or_else(|| config.as_ref().and_then(|c| c.source.worksheet_name.clone()));

    let attributes: Vec<String> = args
        .attributes
        .clone()
        .or_else(|| config.as_ref().and_then(|c| c.attributes.clone()))
        .unwrap_or_else(|| DEFAULT_ATTRIBUTES.iter().map(|s| s.to_string()).collect());

    let ttl = Duration::from_secs(config.as_ref().and_then(|c| c.cache_seconds).unwrap_or(0));
    let loader = FileLoader {
        path: input_path,
        input_type,
        worksheet,
    };
    let mut cached = CachedLoader::new(loader, ttl);
    let dataset = cached.load()?;
    info!(
        "dataset: {} rows, {} columns",
        dataset.num_rows(),
        dataset.columns.len()
    );

    let result = run_aggregation(&dataset, &attributes).context(AggregationSnafu {})?;

    // Demographic breakdowns are best-effort: a column that is not in this
    // export is skipped, not an error.
    let demo_columns: Vec<String> = config
        .as_ref()
        .and_then(|c| c.demographic_columns.clone())
        .unwrap_or_else(|| DEMOGRAPHIC_COLUMNS.iter().map(|s| s.to_string()).collect());
    let mut demographics: Vec<(String, Vec<CategoryCount>)> = Vec::new();
    for column in demo_columns {
        if dataset.column_index(&column).is_none() {
            info!("run_analysis: demographic column {:?} not available", column);
            continue;
        }
        let counts = category_counts(&dataset, &column).context(AggregationSnafu {})?;
        demographics.push((column, counts));
    }

    let group_column = config
        .as_ref()
        .and_then(|c| c.group_column.clone())
        .unwrap_or_else(|| "gender".to_string());
    let groups = if dataset.column_index(&group_column).is_some() {
        let profiles =
            group_profiles(&dataset, &group_column, &attributes).context(AggregationSnafu {})?;
        Some((group_column, profiles))
    } else {
        info!(
            "run_analysis: group column {:?} not available for group comparison",
            group_column
        );
        None
    };

    let survey_name = config.as_ref().map(|c| c.survey_name.clone());
    let result_js = build_summary_js(&survey_name, &result, &demographics, &groups);

    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;
    match args.out.as_deref() {
        Some("stdout") | None => println!("summary:{}", pretty_js_stats),
        Some(path) => fs::write(path, &pretty_js_stats).context(WritingSummarySnafu { path })?,
    }

    // The reference summary, if provided for comparison
    if let Some(summary_p) = args.reference.clone() {
        let summary_ref = read_summary(summary_p)?;
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference string");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            whatever!("Difference detected between calculated summary and reference summary")
        }
    }

    Ok(())
}
