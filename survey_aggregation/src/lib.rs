pub mod builder;
pub mod manual;
mod model;

use log::{debug, info};

pub use crate::model::*;

/// The emotional-resilience attribute columns tabulated by default, in
/// presentation order.
pub const DEFAULT_ATTRIBUTES: [&str; 6] = [
    "calm_under_pressure",
    "emotional_control",
    "adaptability",
    "self_motivation",
    "task_persistence",
    "teamwork",
];

/// The demographic columns understood by the breakdown helpers.
pub const DEMOGRAPHIC_COLUMNS: [&str; 4] = ["gender", "age", "location", "education_level"];

// The Likert response scale: 1 (strongly disagree) to 5 (strongly agree).
const SCALE_MIN: f64 = 1.0;
const SCALE_MAX: f64 = 5.0;
// Levels 4 and 5 count as agreement, 1 and 2 as disagreement. Imputation may
// introduce half-scale values; those fall into the band they sit in.
const AGREE_MIN: f64 = 4.0;
const DISAGREE_MAX: f64 = 2.0;
const TOP_PAIRS: usize = 3;

// **** Private structures ****

// A fully coerced and imputed attribute column.
// Invariant: values is non-empty and every value lies within the scale.
#[derive(PartialEq, Debug, Clone)]
struct NumericColumn {
    name: String,
    values: Vec<f64>,
}

impl NumericColumn {
    fn mean(&self) -> f64 {
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    fn agreement(&self) -> f64 {
        let agreeing = self.values.iter().filter(|&&v| v >= AGREE_MIN).count();
        agreeing as f64 / self.values.len() as f64
    }

    fn is_constant(&self) -> bool {
        self.values.iter().all(|&v| v == self.values[0])
    }
}

// **** Column resolution ****

/// Returns the expected attribute columns that are actually present in the
/// dataset, preserving the expected order.
pub fn available_columns(dataset: &Dataset, expected: &[String]) -> Vec<String> {
    expected
        .iter()
        .filter(|name| dataset.column_index(name).is_some())
        .cloned()
        .collect()
}

// Correlation and profile comparisons need at least two attributes; anything
// less makes the whole analysis infeasible.
fn resolve_columns(
    dataset: &Dataset,
    expected: &[String],
) -> Result<Vec<String>, AggregationErrors> {
    let available = available_columns(dataset, expected);
    if available.len() < 2 {
        return Err(AggregationErrors::MissingColumns {
            expected: expected.to_vec(),
            available,
        });
    }
    Ok(available)
}

// **** Coercion and imputation ****

// A cell is usable if it holds a finite number within the scale. Everything
// else (text that does not parse, out-of-scale values, blanks) is missing.
fn coerce_cell(cell: &CellValue) -> Option<f64> {
    let x = match cell {
        CellValue::Number(x) => Some(*x),
        CellValue::Text(s) => s.trim().parse::<f64>().ok(),
        CellValue::Missing => None,
    }?;
    if x.is_finite() && (SCALE_MIN..=SCALE_MAX).contains(&x) {
        Some(x)
    } else {
        None
    }
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

// Coerces one attribute column and imputes missing values with the column
// median. A column with no usable value at all is an error, never a default.
fn impute_column(dataset: &Dataset, name: &str) -> Result<NumericColumn, AggregationErrors> {
    let idx = dataset
        .column_index(name)
        .ok_or_else(|| AggregationErrors::MissingColumns {
            expected: vec![name.to_string()],
            available: vec![],
        })?;
    let raw: Vec<Option<f64>> = dataset
        .rows
        .iter()
        .map(|row| row.get(idx).and_then(coerce_cell))
        .collect();
    let known: Vec<f64> = raw.iter().filter_map(|x| *x).collect();
    if known.is_empty() {
        return Err(AggregationErrors::EmptyColumn {
            column: name.to_string(),
        });
    }
    let med = median(&known);
    debug!(
        "impute_column: {}: {} missing of {} imputed with median {}",
        name,
        raw.len() - known.len(),
        raw.len(),
        med
    );
    Ok(NumericColumn {
        name: name.to_string(),
        values: raw.iter().map(|x| x.unwrap_or(med)).collect(),
    })
}

fn prepare(
    dataset: &Dataset,
    attributes: &[String],
) -> Result<Vec<NumericColumn>, AggregationErrors> {
    attributes
        .iter()
        .map(|name| impute_column(dataset, name))
        .collect()
}

// **** Descriptive statistics ****

fn column_stats(col: &NumericColumn) -> AttributeStats {
    AttributeStats {
        attribute: col.name.clone(),
        mean_score: col.mean(),
        agreement: col.agreement(),
    }
}

// Extremes by agreement proportion. Strict comparisons so that the first
// occurrence in available-columns order wins ties.
fn agreement_extremes(stats: &[AttributeStats]) -> (String, String) {
    let mut strongest = &stats[0];
    let mut weakest = &stats[0];
    for s in &stats[1..] {
        if s.agreement > strongest.agreement {
            strongest = s;
        }
        if s.agreement < weakest.agreement {
            weakest = s;
        }
    }
    (strongest.attribute.clone(), weakest.attribute.clone())
}

// **** Correlation ****

// Pearson coefficient. The caller has already ruled out constant columns.
fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let ma = a.iter().sum::<f64>() / a.len() as f64;
    let mb = b.iter().sum::<f64>() / b.len() as f64;
    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        let dx = x - ma;
        let dy = y - mb;
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }
    cov / (var_a.sqrt() * var_b.sqrt())
}

fn correlations_of(cols: &[NumericColumn]) -> Result<CorrelationMatrix, AggregationErrors> {
    let constant: Vec<String> = cols
        .iter()
        .filter(|c| c.is_constant())
        .map(|c| c.name.clone())
        .collect();
    if !constant.is_empty() {
        return Err(AggregationErrors::DegenerateVariance { columns: constant });
    }
    let n = cols.len();
    let mut coefficients = vec![vec![0.0; n]; n];
    for i in 0..n {
        coefficients[i][i] = 1.0;
        for j in (i + 1)..n {
            let r = pearson(&cols[i].values, &cols[j].values);
            coefficients[i][j] = r;
            coefficients[j][i] = r;
        }
    }
    Ok(CorrelationMatrix {
        attributes: cols.iter().map(|c| c.name.clone()).collect(),
        coefficients,
    })
}

// Enumerates the unordered off-diagonal pairs once each, so symmetric
// duplicates never show up in the output.
fn top_pairs_of(matrix: &CorrelationMatrix) -> Vec<CorrelatedPair> {
    let n = matrix.attributes.len();
    let mut pairs: Vec<CorrelatedPair> = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            pairs.push(CorrelatedPair {
                first: matrix.attributes[i].clone(),
                second: matrix.attributes[j].clone(),
                coefficient: matrix.coefficients[i][j],
            });
        }
    }
    pairs.sort_by(|a, b| b.coefficient.total_cmp(&a.coefficient));
    pairs.truncate(TOP_PAIRS);
    pairs
}

// **** Sentiment decomposition ****

// The three bands cover the whole scale, so the split always sums to 100.
// Scale levels absent from the data simply contribute zero to their band.
fn sentiment_of(col: &NumericColumn) -> SentimentSplit {
    let n = col.values.len();
    let disagreeing = col.values.iter().filter(|&&v| v <= DISAGREE_MAX).count();
    let agreeing = col.values.iter().filter(|&&v| v >= AGREE_MIN).count();
    let neutral = n - disagreeing - agreeing;
    let pct = |c: usize| 100.0 * c as f64 / n as f64;
    SentimentSplit {
        attribute: col.name.clone(),
        disagree_pct: -pct(disagreeing),
        neutral_pct: pct(neutral),
        agree_pct: pct(agreeing),
    }
}

// **** Ranking ****

// Stable sort, so attributes with equal means keep available-columns order.
fn ranking_of(stats: &[AttributeStats]) -> Vec<String> {
    let mut ranked: Vec<&AttributeStats> = stats.iter().collect();
    ranked.sort_by(|a, b| b.mean_score.total_cmp(&a.mean_score));
    ranked.iter().map(|s| s.attribute.clone()).collect()
}

// **** Entry points ****

/// Runs the full aggregation pipeline over the attribute columns of a
/// dataset.
///
/// Arguments:
/// * `dataset` the survey responses to process
/// * `expected` the ordered attribute columns to look for; only the ones
///   present in the dataset are aggregated
///
/// The call is a pure transform: it holds no state across calls and never
/// mutates the input. On failure nothing partial is returned; the piecewise
/// functions ([descriptive_stats], [sentiment_split], [correlation_matrix])
/// let a caller compute the parts that do not depend on a failing column.
pub fn run_aggregation(
    dataset: &Dataset,
    expected: &[String],
) -> Result<AggregateResult, AggregationErrors> {
    info!(
        "run_aggregation: processing {} rows, expected attributes: {:?}",
        dataset.num_rows(),
        expected
    );
    let available = resolve_columns(dataset, expected)?;
    debug!("run_aggregation: available attributes: {:?}", available);
    let table = prepare(dataset, &available)?;

    let stats: Vec<AttributeStats> = table.iter().map(column_stats).collect();
    let overall_agreement = stats.iter().map(|s| s.agreement).sum::<f64>() / stats.len() as f64;
    let (core_strength, growth_area) = agreement_extremes(&stats);
    let correlations = correlations_of(&table)?;
    let top_pairs = top_pairs_of(&correlations);
    let sentiment: Vec<SentimentSplit> = table.iter().map(sentiment_of).collect();
    let ranking = ranking_of(&stats);

    info!(
        "run_aggregation: overall agreement {:.3}, core strength {}, growth area {}",
        overall_agreement, core_strength, growth_area
    );
    Ok(AggregateResult {
        available,
        stats,
        overall_agreement,
        core_strength,
        growth_area,
        correlations,
        top_pairs,
        sentiment,
        ranking,
    })
}

/// Per-attribute mean and agreement proportion, after coercion and
/// imputation.
pub fn descriptive_stats(
    dataset: &Dataset,
    expected: &[String],
) -> Result<Vec<AttributeStats>, AggregationErrors> {
    let available = resolve_columns(dataset, expected)?;
    let table = prepare(dataset, &available)?;
    Ok(table.iter().map(column_stats).collect())
}

/// The pairwise Pearson correlation matrix over the available attributes.
pub fn correlation_matrix(
    dataset: &Dataset,
    expected: &[String],
) -> Result<CorrelationMatrix, AggregationErrors> {
    let available = resolve_columns(dataset, expected)?;
    let table = prepare(dataset, &available)?;
    correlations_of(&table)
}

/// The per-attribute sentiment triples.
pub fn sentiment_split(
    dataset: &Dataset,
    expected: &[String],
) -> Result<Vec<SentimentSplit>, AggregationErrors> {
    let available = resolve_columns(dataset, expected)?;
    let table = prepare(dataset, &available)?;
    Ok(table.iter().map(sentiment_of).collect())
}

// Display label for a categorical cell. Integral numbers drop the decimal
// point so that numeric groups such as ages read naturally.
fn category_label(cell: Option<&CellValue>) -> Option<String> {
    match cell {
        Some(CellValue::Text(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(CellValue::Number(x)) if x.fract() == 0.0 => Some(format!("{}", *x as i64)),
        Some(CellValue::Number(x)) => Some(format!("{}", x)),
        _ => None,
    }
}

/// Frequency table of a categorical column, descending by count. Ties keep
/// the order of first occurrence; missing cells are skipped.
pub fn category_counts(
    dataset: &Dataset,
    column: &str,
) -> Result<Vec<CategoryCount>, AggregationErrors> {
    let idx = dataset
        .column_index(column)
        .ok_or_else(|| AggregationErrors::MissingColumns {
            expected: vec![column.to_string()],
            available: vec![],
        })?;
    let mut counts: Vec<CategoryCount> = Vec::new();
    for row in dataset.rows.iter() {
        let label = match category_label(row.get(idx)) {
            Some(label) => label,
            None => continue,
        };
        match counts.iter_mut().find(|c| c.value == label) {
            Some(c) => c.count += 1,
            None => counts.push(CategoryCount {
                value: label,
                count: 1,
            }),
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    Ok(counts)
}

/// Per-group mean scores of the available attributes, grouped by a
/// categorical column. Imputation happens over the whole column before
/// grouping, so group means line up with the ungrouped statistics. Groups
/// come out in lexicographic order.
pub fn group_profiles(
    dataset: &Dataset,
    group_column: &str,
    expected: &[String],
) -> Result<Vec<GroupProfile>, AggregationErrors> {
    let group_idx =
        dataset
            .column_index(group_column)
            .ok_or_else(|| AggregationErrors::MissingColumns {
                expected: vec![group_column.to_string()],
                available: vec![],
            })?;
    let available = resolve_columns(dataset, expected)?;
    let table = prepare(dataset, &available)?;

    let mut group_rows: std::collections::BTreeMap<String, Vec<usize>> =
        std::collections::BTreeMap::new();
    for (row_idx, row) in dataset.rows.iter().enumerate() {
        if let Some(key) = category_label(row.get(group_idx)) {
            group_rows.entry(key).or_default().push(row_idx);
        }
    }

    let mut profiles: Vec<GroupProfile> = Vec::new();
    for (group, row_idxs) in group_rows.iter() {
        let mean_scores: Vec<(String, f64)> = table
            .iter()
            .map(|col| {
                let sum: f64 = row_idxs.iter().map(|&i| col.values[i]).sum();
                (col.name.clone(), sum / row_idxs.len() as f64)
            })
            .collect();
        profiles.push(GroupProfile {
            group: group.clone(),
            mean_scores,
        });
    }
    debug!(
        "group_profiles: {} groups by {:?}",
        profiles.len(),
        group_column
    );
    Ok(profiles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::DatasetBuilder;

    const TOL: f64 = 1e-9;

    fn names(cols: &[&str]) -> Vec<String> {
        cols.iter().map(|s| s.to_string()).collect()
    }

    // Builds a dataset from integer scores, None marking a missing cell.
    fn dataset_of(columns: &[&str], rows: &[&[Option<i64>]]) -> Dataset {
        let mut builder = DatasetBuilder::new(&names(columns));
        for row in rows {
            let cells: Vec<CellValue> = row
                .iter()
                .map(|c| match c {
                    Some(x) => CellValue::Number(*x as f64),
                    None => CellValue::Missing,
                })
                .collect();
            builder.push_row(cells).unwrap();
        }
        builder.build()
    }

    #[test]
    fn available_columns_preserve_expected_order() {
        let ds = dataset_of(&["teamwork", "gender", "adaptability"], &[]);
        let expected = names(&["adaptability", "self_motivation", "teamwork"]);
        assert_eq!(
            available_columns(&ds, &expected),
            names(&["adaptability", "teamwork"])
        );
    }

    #[test]
    fn fewer_than_two_columns_is_infeasible() {
        let ds = dataset_of(&["teamwork", "gender"], &[&[Some(4), Some(1)]]);
        let res = run_aggregation(&ds, &names(&["teamwork", "adaptability"]));
        assert_eq!(
            res,
            Err(AggregationErrors::MissingColumns {
                expected: names(&["teamwork", "adaptability"]),
                available: names(&["teamwork"]),
            })
        );
    }

    #[test]
    fn teamwork_imputation_scenario() {
        // [5, 4, 1, missing, 3]: median of {5, 4, 1, 3} is 3.5, so the
        // imputed column is [5, 4, 1, 3.5, 3].
        let ds = dataset_of(
            &["teamwork", "adaptability"],
            &[
                &[Some(5), Some(3)],
                &[Some(4), Some(2)],
                &[Some(1), Some(5)],
                &[None, Some(1)],
                &[Some(3), Some(4)],
            ],
        );
        let stats = descriptive_stats(&ds, &names(&["teamwork", "adaptability"])).unwrap();
        let teamwork = &stats[0];
        assert_eq!(teamwork.attribute, "teamwork");
        assert!((teamwork.mean_score - 3.3).abs() < TOL);
        // The imputed 3.5 is below the agreement band.
        assert!((teamwork.agreement - 0.4).abs() < TOL);
    }

    #[test]
    fn imputation_is_idempotent() {
        // Writing the median in place of the missing cell up front gives the
        // same statistics as letting the imputation do it.
        let with_missing = dataset_of(
            &["a", "b"],
            &[
                &[Some(5), Some(2)],
                &[Some(1), Some(4)],
                &[None, Some(3)],
                &[Some(3), Some(5)],
            ],
        );
        let mut builder = DatasetBuilder::new(&names(&["a", "b"]));
        for row in [[5.0, 2.0], [1.0, 4.0], [3.0, 3.0], [3.0, 5.0]] {
            builder
                .push_row(row.iter().map(|x| CellValue::Number(*x)).collect())
                .unwrap();
        }
        let pre_imputed = builder.build();

        let expected = names(&["a", "b"]);
        assert_eq!(
            run_aggregation(&with_missing, &expected).unwrap(),
            run_aggregation(&pre_imputed, &expected).unwrap()
        );
    }

    #[test]
    fn fully_missing_column_is_reported() {
        let ds = dataset_of(
            &["a", "b"],
            &[&[None, Some(4)], &[None, Some(2)], &[None, Some(3)]],
        );
        let res = run_aggregation(&ds, &names(&["a", "b"]));
        assert_eq!(
            res,
            Err(AggregationErrors::EmptyColumn {
                column: "a".to_string()
            })
        );
    }

    #[test]
    fn out_of_scale_values_are_coerced_to_missing() {
        // 7 and "n/a" fail coercion; the medians come from the valid cells.
        let mut builder = DatasetBuilder::new(&names(&["a", "b"]));
        builder.push_text_row(&names(&["7", "2"])).unwrap();
        builder.push_text_row(&names(&["4", "n/a"])).unwrap();
        builder.push_text_row(&names(&["2", "4"])).unwrap();
        let ds = builder.build();
        let stats = descriptive_stats(&ds, &names(&["a", "b"])).unwrap();
        // Column a: [7 -> median 3, 4, 2].
        assert!((stats[0].mean_score - 3.0).abs() < TOL);
        // Column b: [2, n/a -> median 3, 4].
        assert!((stats[1].mean_score - 3.0).abs() < TOL);
    }

    #[test]
    fn strongest_and_weakest_by_agreement() {
        // Hand-computed agreement proportions: a = 0.8, b = 0.3, c = 0.5.
        let rows: Vec<Vec<Option<i64>>> = vec![
            vec![Some(5), Some(1), Some(4)],
            vec![Some(4), Some(2), Some(1)],
            vec![Some(5), Some(4), Some(5)],
            vec![Some(4), Some(3), Some(2)],
            vec![Some(4), Some(5), Some(3)],
            vec![Some(5), Some(1), Some(4)],
            vec![Some(4), Some(4), Some(2)],
            vec![Some(4), Some(2), Some(5)],
            vec![Some(1), Some(3), Some(4)],
            vec![Some(2), Some(1), Some(1)],
        ];
        let row_slices: Vec<&[Option<i64>]> = rows.iter().map(|r| r.as_slice()).collect();
        let ds = dataset_of(&["a", "b", "c"], &row_slices);
        let res = run_aggregation(&ds, &names(&["a", "b", "c"])).unwrap();
        assert!((res.stats[0].agreement - 0.8).abs() < TOL);
        assert!((res.stats[1].agreement - 0.3).abs() < TOL);
        assert!((res.stats[2].agreement - 0.5).abs() < TOL);
        assert_eq!(res.core_strength, "a");
        assert_eq!(res.growth_area, "b");
        let overall = (0.8 + 0.3 + 0.5) / 3.0;
        assert!((res.overall_agreement - overall).abs() < TOL);
    }

    #[test]
    fn extreme_ties_keep_first_occurrence() {
        let ds = dataset_of(
            &["a", "b", "c"],
            &[
                &[Some(4), Some(4), Some(4)],
                &[Some(2), Some(2), Some(2)],
                &[Some(5), Some(1), Some(3)],
            ],
        );
        let stats = descriptive_stats(&ds, &names(&["a", "b", "c"])).unwrap();
        let (strongest, weakest) = agreement_extremes(&stats);
        // b and c tie at 1/3 agreement: the earlier column wins the tie.
        assert_eq!(strongest, "a");
        assert_eq!(weakest, "b");
    }

    #[test]
    fn sentiment_sums_to_one_hundred() {
        let ds = dataset_of(
            &["a", "b", "c"],
            &[
                &[Some(1), Some(3), Some(5)],
                &[Some(2), Some(3), None],
                &[Some(5), Some(4), Some(4)],
                &[None, Some(2), Some(1)],
                &[Some(3), Some(5), Some(2)],
                &[Some(4), Some(1), Some(3)],
            ],
        );
        let splits = sentiment_split(&ds, &names(&["a", "b", "c"])).unwrap();
        assert_eq!(splits.len(), 3);
        for s in splits.iter() {
            assert!(s.disagree_pct <= 0.0);
            let total = s.disagree_pct.abs() + s.neutral_pct + s.agree_pct;
            assert!((total - 100.0).abs() < TOL, "{:?}", s);
        }
    }

    #[test]
    fn sentiment_with_absent_levels() {
        // No neutral response in column a: that band is exactly zero.
        let ds = dataset_of(
            &["a", "b"],
            &[
                &[Some(1), Some(5)],
                &[Some(2), Some(4)],
                &[Some(5), Some(4)],
                &[Some(4), Some(1)],
            ],
        );
        let splits = sentiment_split(&ds, &names(&["a", "b"])).unwrap();
        assert!((splits[0].disagree_pct + 50.0).abs() < TOL);
        assert!(splits[0].neutral_pct.abs() < TOL);
        assert!((splits[0].agree_pct - 50.0).abs() < TOL);
        assert!((splits[1].disagree_pct + 25.0).abs() < TOL);
        assert!((splits[1].agree_pct - 75.0).abs() < TOL);
    }

    #[test]
    fn correlation_matrix_is_symmetric_with_unit_diagonal() {
        let ds = dataset_of(
            &["a", "b", "c"],
            &[
                &[Some(1), Some(2), Some(5)],
                &[Some(2), Some(4), Some(4)],
                &[Some(3), Some(3), Some(3)],
                &[Some(4), Some(5), Some(1)],
                &[Some(5), Some(4), Some(2)],
            ],
        );
        let m = correlation_matrix(&ds, &names(&["a", "b", "c"])).unwrap();
        let n = m.attributes.len();
        for i in 0..n {
            assert_eq!(m.coefficients[i][i], 1.0);
            for j in 0..n {
                assert!((m.coefficients[i][j] - m.coefficients[j][i]).abs() < TOL);
                assert!(m.coefficients[i][j].abs() <= 1.0 + TOL);
            }
        }
        // a and c move in opposite directions.
        assert!(m.get("a", "c").unwrap() < 0.0);
    }

    #[test]
    fn identical_varying_columns_correlate_fully() {
        let ds = dataset_of(
            &["a", "b"],
            &[
                &[Some(1), Some(1)],
                &[Some(4), Some(4)],
                &[Some(2), Some(2)],
                &[Some(5), Some(5)],
            ],
        );
        let m = correlation_matrix(&ds, &names(&["a", "b"])).unwrap();
        assert!((m.get("a", "b").unwrap() - 1.0).abs() < TOL);
    }

    #[test]
    fn constant_column_is_degenerate() {
        let ds = dataset_of(
            &["a", "b"],
            &[&[Some(3), Some(1)], &[Some(3), Some(4)], &[Some(3), Some(2)]],
        );
        let res = correlation_matrix(&ds, &names(&["a", "b"]));
        assert_eq!(
            res,
            Err(AggregationErrors::DegenerateVariance {
                columns: names(&["a"])
            })
        );
        // The parts that do not depend on variance still compute.
        assert!(descriptive_stats(&ds, &names(&["a", "b"])).is_ok());
        assert!(sentiment_split(&ds, &names(&["a", "b"])).is_ok());
    }

    #[test]
    fn top_pairs_are_deduplicated_and_sorted() {
        let ds = dataset_of(
            &["a", "b", "c"],
            &[
                &[Some(1), Some(1), Some(5)],
                &[Some(2), Some(2), Some(4)],
                &[Some(4), Some(5), Some(2)],
                &[Some(5), Some(4), Some(1)],
            ],
        );
        let res = run_aggregation(&ds, &names(&["a", "b", "c"])).unwrap();
        // Three attributes make exactly three unordered pairs.
        assert_eq!(res.top_pairs.len(), 3);
        for w in res.top_pairs.windows(2) {
            assert!(w[0].coefficient >= w[1].coefficient);
        }
        for p in res.top_pairs.iter() {
            assert_ne!(p.first, p.second);
        }
        // The strongest pair is the near-identical a/b.
        assert_eq!(res.top_pairs[0].first, "a");
        assert_eq!(res.top_pairs[0].second, "b");
    }

    #[test]
    fn ranking_is_descending_and_stable() {
        // a and c share the same mean; a comes first in the attribute order.
        let ds = dataset_of(
            &["a", "b", "c"],
            &[
                &[Some(5), Some(1), Some(5)],
                &[Some(3), Some(2), Some(4)],
                &[Some(4), Some(3), Some(3)],
            ],
        );
        let res = run_aggregation(&ds, &names(&["a", "b", "c"])).unwrap();
        assert_eq!(res.ranking, names(&["a", "c", "b"]));
    }

    #[test]
    fn category_counts_descending_with_stable_ties() {
        let mut builder = DatasetBuilder::new(&names(&["gender"]));
        for g in ["female", "male", "female", "other", "male", "female", ""] {
            builder.push_text_row(&[g.to_string()]).unwrap();
        }
        let ds = builder.build();
        let counts = category_counts(&ds, "gender").unwrap();
        assert_eq!(
            counts,
            vec![
                CategoryCount {
                    value: "female".to_string(),
                    count: 3
                },
                CategoryCount {
                    value: "male".to_string(),
                    count: 2
                },
                CategoryCount {
                    value: "other".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn category_counts_on_absent_column() {
        let ds = dataset_of(&["a"], &[&[Some(1)]]);
        assert!(matches!(
            category_counts(&ds, "gender"),
            Err(AggregationErrors::MissingColumns { .. })
        ));
    }

    #[test]
    fn group_profiles_split_means_by_group() {
        let mut builder = DatasetBuilder::new(&names(&["gender", "a", "b"]));
        let rows = [
            ("m", 4.0, 2.0),
            ("f", 5.0, 3.0),
            ("m", 2.0, 4.0),
            ("f", 3.0, 5.0),
        ];
        for (g, a, b) in rows {
            builder
                .push_row(vec![
                    CellValue::Text(g.to_string()),
                    CellValue::Number(a),
                    CellValue::Number(b),
                ])
                .unwrap();
        }
        let ds = builder.build();
        let profiles = group_profiles(&ds, "gender", &names(&["a", "b"])).unwrap();
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].group, "f");
        assert!((profiles[0].mean_scores[0].1 - 4.0).abs() < TOL);
        assert!((profiles[0].mean_scores[1].1 - 4.0).abs() < TOL);
        assert_eq!(profiles[1].group, "m");
        assert!((profiles[1].mean_scores[0].1 - 3.0).abs() < TOL);
        assert!((profiles[1].mean_scores[1].1 - 3.0).abs() < TOL);
    }

    #[test]
    fn median_of_even_count_is_the_midpoint() {
        assert_eq!(median(&[5.0, 4.0, 1.0, 3.0]), 3.5);
        assert_eq!(median(&[1.0, 2.0, 3.0]), 2.0);
        assert_eq!(median(&[4.0]), 4.0);
    }
}
