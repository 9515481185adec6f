/*!

This is the long-form manual for `survey_aggregation` and `surveystat`.

## Input formats

The following formats are supported:
* `csv` Comma Separated Values exports (Google Sheets, Qualtrics, most survey tools)
* `xlsx` Excel workbooks (Microsoft Forms, Google Forms downloads)

### `csv`

The first row holds the column names; every following row is one respondent.
Attribute columns hold responses on the Likert scale 1 (strongly disagree) to
5 (strongly agree). Empty cells and cells that do not parse as a number on
the scale are treated as missing and imputed with the column median.

```text
gender,calm_under_pressure,emotional_control,adaptability,self_motivation,task_persistence,teamwork
female,4,3,5,4,4,5
male,2,,3,4,5,4
```

### `xlsx`

Same layout as `csv`, read from the first worksheet of the workbook by
default. Use `--excel-worksheet-name` to pick a different worksheet.

## Configuration

`surveystat` runs with sensible defaults (the emotional-resilience attribute
set, demographic columns `gender`, `age`, `location`, `education_level`).
An analysis can also be described in a JSON file passed with `--config`:

```text
{
  "surveyName": "Emotional Resilience and Personal Development",
  "source": {
    "provider": "csv",
    "filePath": "responses.csv"
  },
  "attributes": ["calm_under_pressure", "emotional_control", "adaptability",
                 "self_motivation", "task_persistence", "teamwork"],
  "demographicColumns": ["gender", "age"],
  "groupColumn": "gender",
  "cacheSeconds": 15
}
```

- `attributes` (optional): the ordered attribute columns to aggregate. Only
  the columns present in the dataset are used; fewer than two present makes
  the analysis infeasible and is reported as such.
- `demographicColumns` (optional): categorical columns to tabulate as
  frequency tables. Columns absent from the dataset are skipped.
- `groupColumn` (optional): a categorical column for per-group attribute
  means (for example mean scores by gender).
- `cacheSeconds` (optional, default 0): how long a loaded dataset may be
  reused before the source file is read again. Relevant for long-running
  embedders of the loader; a value of 0 reloads on every call.

## Summary output

The summary is a single JSON document with the per-attribute statistics, the
correlation matrix, the top correlated pairs, the sentiment triples, the
mean-score ranking and the optional demographic sections. Floating point
values are rounded to 6 decimal places so that summaries are stable across
runs and can be checked against a stored reference with `--reference`.

*/
