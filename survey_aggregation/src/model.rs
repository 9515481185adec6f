// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// A single cell of a survey dataset, as delivered by a loader.
///
/// Loaders are not expected to understand the response scale: any cell that
/// cannot be interpreted as a number on the scale is handled by the coercion
/// step of the aggregation.
#[derive(PartialEq, Debug, Clone)]
pub enum CellValue {
    /// Raw text, typically from a CSV export. May or may not parse as a number.
    Text(String),
    /// A numeric cell, typically from a spreadsheet export.
    Number(f64),
    /// A cell with no usable content.
    Missing,
}

/// An ordered collection of survey responses: named columns and rows of cells.
///
/// Rows are expected to have exactly one cell per column; short rows are read
/// as missing on the trailing columns. Use [crate::builder::DatasetBuilder] to
/// get the row widths checked at construction time.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Dataset {
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// The position of a column in this dataset, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

// ******** Output data structures *********

/// Mean score and agreement proportion for one attribute column.
#[derive(PartialEq, Debug, Clone)]
pub struct AttributeStats {
    pub attribute: String,
    /// Arithmetic mean of the post-imputation scores.
    pub mean_score: f64,
    /// Fraction of responses at the agreement levels (4 or 5).
    pub agreement: f64,
}

/// Three-way sentiment split for one attribute, in percent.
///
/// The disagreement share carries a negative sign so that a consumer can feed
/// the triple directly into a diverging bar chart. For every attribute,
/// `disagree_pct.abs() + neutral_pct + agree_pct == 100` (up to float
/// tolerance).
#[derive(PartialEq, Debug, Clone)]
pub struct SentimentSplit {
    pub attribute: String,
    pub disagree_pct: f64,
    pub neutral_pct: f64,
    pub agree_pct: f64,
}

/// Symmetric Pearson correlation matrix over the available attributes.
#[derive(PartialEq, Debug, Clone)]
pub struct CorrelationMatrix {
    /// Attribute names indexing both dimensions, in available-columns order.
    pub attributes: Vec<String>,
    /// `coefficients[i][j]` is the correlation between attributes i and j.
    pub coefficients: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// The coefficient for a pair of attributes, if both are present.
    pub fn get(&self, first: &str, second: &str) -> Option<f64> {
        let i = self.attributes.iter().position(|a| a == first)?;
        let j = self.attributes.iter().position(|a| a == second)?;
        Some(self.coefficients[i][j])
    }
}

/// One unordered pair of attributes and its correlation coefficient.
#[derive(PartialEq, Debug, Clone)]
pub struct CorrelatedPair {
    pub first: String,
    pub second: String,
    pub coefficient: f64,
}

/// Frequency of one value of a categorical (demographic) column.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CategoryCount {
    pub value: String,
    pub count: u64,
}

/// Per-attribute mean scores for one group of respondents.
#[derive(PartialEq, Debug, Clone)]
pub struct GroupProfile {
    pub group: String,
    /// (attribute, mean score), in available-columns order.
    pub mean_scores: Vec<(String, f64)>,
}

/// The full derived output of one aggregation call.
///
/// Recomputed from scratch on every call; holds no reference to the input.
#[derive(PartialEq, Debug, Clone)]
pub struct AggregateResult {
    /// The expected attributes found in the dataset, in expected order.
    pub available: Vec<String>,
    pub stats: Vec<AttributeStats>,
    /// Mean of the per-attribute agreement proportions.
    pub overall_agreement: f64,
    /// Attribute with the highest agreement proportion.
    pub core_strength: String,
    /// Attribute with the lowest agreement proportion.
    pub growth_area: String,
    pub correlations: CorrelationMatrix,
    /// The most correlated attribute pairs, descending, at most three.
    pub top_pairs: Vec<CorrelatedPair>,
    pub sentiment: Vec<SentimentSplit>,
    /// Attributes sorted descending by mean score.
    pub ranking: Vec<String>,
}

/// Errors that prevent the aggregation from completing successfully.
///
/// All of these describe a precondition failure on the input; none of them
/// is a programming error. They are meant to be surfaced to the user as an
/// explanation of why a given chart cannot be drawn.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum AggregationErrors {
    /// Fewer than two of the expected attribute columns are present.
    MissingColumns {
        expected: Vec<String>,
        available: Vec<String>,
    },
    /// An attribute column has no usable response after coercion, so the
    /// imputation median is undefined.
    EmptyColumn { column: String },
    /// Correlation was requested while at least one attribute is constant.
    DegenerateVariance { columns: Vec<String> },
    /// A record does not have one cell per declared column.
    MalformedRow { expected: usize, actual: usize },
}

impl Error for AggregationErrors {}

impl Display for AggregationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AggregationErrors::MissingColumns {
                expected,
                available,
            } => write!(
                f,
                "fewer than 2 of the expected attribute columns {:?} are present (found {:?})",
                expected, available
            ),
            AggregationErrors::EmptyColumn { column } => write!(
                f,
                "column {:?} has no usable response after numeric coercion",
                column
            ),
            AggregationErrors::DegenerateVariance { columns } => write!(
                f,
                "correlation is undefined: columns {:?} are constant",
                columns
            ),
            AggregationErrors::MalformedRow { expected, actual } => write!(
                f,
                "record has {} cells but the dataset declares {} columns",
                actual, expected
            ),
        }
    }
}
