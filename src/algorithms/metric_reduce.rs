// Copyright 2025 Chisomo Makombo Sakala
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
use super::column_index;
use crate::algorithm::AutoAlgorithm;
use crate::algorithm::Progress;
use crate::error::AlgorithmError;
use crate::params::AlgorithmParameters;
use crate::params::ParamValue;
use std::str::FromStr;

const METRIC: i32 = 1;
const OPERATION: i32 = 2;
const RESULT: i32 = 3;
const COLUMN_OPT: i32 = 4;
const COLUMN: i32 = 1;
const ROI_OPT: i32 = 5;
const ROI_METRIC: i32 = 1;
const MATCH_OPT: i32 = 2;
const MATCH_VALUE: i32 = 1;
const FINITE_OPT: i32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reduction {
  Mean,
  Sum,
  Min,
  Max,
  Count,
}

impl FromStr for Reduction {
  type Err = AlgorithmError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_uppercase().as_str() {
      "MEAN" => Ok(Reduction::Mean),
      "SUM" => Ok(Reduction::Sum),
      "MIN" => Ok(Reduction::Min),
      "MAX" => Ok(Reduction::Max),
      "COUNT" => Ok(Reduction::Count),
      _ => Err(AlgorithmError::InvalidInput(format!(
        "unrecognized reduction operation '{s}', expected one of MEAN, SUM, MIN, MAX, COUNT"
      ))),
    }
  }
}

impl Reduction {
  fn apply(self, values: &[f32]) -> Result<f64, AlgorithmError> {
    let values = values.iter().map(|&v| f64::from(v));
    let empty = || AlgorithmError::InvalidInput("no vertices were selected".to_string());

    match self {
      Reduction::Sum => Ok(values.sum()),
      Reduction::Count => Ok(values.count() as f64),
      Reduction::Mean => {
        let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
        if n == 0 { Err(empty()) } else { Ok(sum / n as f64) }
      }
      Reduction::Min => values.reduce(f64::min).ok_or_else(empty),
      Reduction::Max => values.reduce(f64::max).ok_or_else(empty),
    }
  }
}

pub struct MetricReduce;

impl AutoAlgorithm for MetricReduce {
  fn command_switch() -> &'static str {
    "-metric-reduce"
  }

  fn short_description() -> &'static str {
    "REDUCE A METRIC COLUMN TO A SINGLE NUMBER"
  }

  fn parameters() -> AlgorithmParameters {
    let mut params = AlgorithmParameters::new();
    params.inputs.add_metric_parameter(METRIC, "metric", "the input metric");
    params
      .inputs
      .add_string_parameter(OPERATION, "operation", "the reduction operation");
    params.add_double_output(RESULT, "result", "the reduced value");

    let column = params
      .inputs
      .add_option(COLUMN_OPT, "-column", "column", "reduce a column other than the first");
    column.add_integer_parameter(COLUMN, "column", "the column number, starting from 1");

    let roi = params
      .inputs
      .add_option(ROI_OPT, "-roi", "roi", "only consider vertices inside a region");
    roi.add_metric_parameter(ROI_METRIC, "roi-metric", "the region, as positive values");
    let matching = roi.add_option(
      MATCH_OPT,
      "-match",
      "match",
      "select vertices equal to a value instead of positive ones",
    );
    matching.add_integer_parameter(MATCH_VALUE, "value", "the value to match");

    params.inputs.add_option(
      FINITE_OPT,
      "-only-finite",
      "only finite",
      "skip NaN and infinite values",
    );

    params.set_help_text(
      "Reduces one column of a metric to a single number and prints it. \
       The operation must be one of MEAN, SUM, MIN, MAX or COUNT.",
    );
    params
  }

  fn use_parameters(
    params: &mut AlgorithmParameters,
    _progress: Option<&mut Progress>,
  ) -> Result<(), AlgorithmError> {
    let inputs = &params.inputs;
    let metric = inputs.metric(METRIC)?;
    let reduction: Reduction = inputs.string(OPERATION)?.parse()?;

    let index = match inputs.present_option(COLUMN_OPT)? {
      Some(column) => column_index(metric, column.integer(COLUMN)?)?,
      None => column_index(metric, 1)?,
    };
    let data = &metric.columns[index];

    let selected: Vec<bool> = match inputs.present_option(ROI_OPT)? {
      Some(roi) => {
        let roi_metric = roi.metric(ROI_METRIC)?;
        if roi_metric.num_nodes() != metric.num_nodes() {
          return Err(AlgorithmError::InvalidInput(format!(
            "roi metric has {} vertices, input metric has {}",
            roi_metric.num_nodes(),
            metric.num_nodes()
          )));
        }
        let roi_values = roi_metric.columns.first().map(Vec::as_slice).unwrap_or(&[]);
        match roi.present_option(MATCH_OPT)? {
          Some(matching) => {
            let value = matching.integer(MATCH_VALUE)? as f32;
            roi_values.iter().map(|&v| v == value).collect()
          }
          None => roi_values.iter().map(|&v| v > 0.0).collect(),
        }
      }
      None => vec![true; data.len()],
    };
    let only_finite = inputs.option(FINITE_OPT)?.present;

    let values: Vec<f32> = data
      .iter()
      .zip(&selected)
      .filter(|&(v, &keep)| keep && (!only_finite || v.is_finite()))
      .map(|(&v, _)| v)
      .collect();
    tracing::debug!(selected = values.len(), total = data.len(), ?reduction, "Reducing metric column");

    let result = reduction.apply(&values)?;
    params.set_output(RESULT, ParamValue::Double(result))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::resource::MetricFile;

  fn metric(values: &[f32]) -> MetricFile {
    MetricFile {
      column_names: vec![],
      columns: vec![values.to_vec()],
    }
  }

  fn setup(data: &[f32], operation: &str) -> AlgorithmParameters {
    let mut params = MetricReduce::parameters();
    params.inputs.params[0].value = ParamValue::Metric(Some(metric(data)));
    params.inputs.params[1].value = ParamValue::String(operation.to_string());
    params
  }

  fn run(params: &mut AlgorithmParameters) -> Result<f64, AlgorithmError> {
    MetricReduce::use_parameters(params, None)?;
    match params.output(RESULT)?.value {
      ParamValue::Double(v) => Ok(v),
      _ => unreachable!(),
    }
  }

  #[test]
  fn test_operations() {
    let data = [1.0, 2.0, 6.0];
    assert_eq!(run(&mut setup(&data, "mean")), Ok(3.0));
    assert_eq!(run(&mut setup(&data, "SUM")), Ok(9.0));
    assert_eq!(run(&mut setup(&data, "Min")), Ok(1.0));
    assert_eq!(run(&mut setup(&data, "max")), Ok(6.0));
    assert_eq!(run(&mut setup(&data, "count")), Ok(3.0));
    assert!(matches!(
      run(&mut setup(&data, "median")),
      Err(AlgorithmError::InvalidInput(_))
    ));
  }

  #[test]
  fn test_roi_with_nested_match() {
    let mut params = setup(&[10.0, 20.0, 30.0], "SUM");
    let roi = &mut params.inputs.options[1];
    roi.present = true;
    roi.group.params[0].value = ParamValue::Metric(Some(metric(&[1.0, 2.0, 2.0])));
    assert_eq!(run(&mut params), Ok(60.0));

    let matching = &mut params.inputs.options[1].group.options[0];
    matching.present = true;
    matching.group.params[0].value = ParamValue::Integer(2);
    assert_eq!(run(&mut params), Ok(50.0));
  }

  #[test]
  fn test_roi_size_mismatch() {
    let mut params = setup(&[10.0, 20.0, 30.0], "SUM");
    let roi = &mut params.inputs.options[1];
    roi.present = true;
    roi.group.params[0].value = ParamValue::Metric(Some(metric(&[1.0])));
    assert!(matches!(run(&mut params), Err(AlgorithmError::InvalidInput(_))));
  }

  #[test]
  fn test_only_finite() {
    let mut params = setup(&[1.0, f32::NAN, 3.0], "MEAN");
    assert!(run(&mut params).unwrap().is_nan());

    params.inputs.options[2].present = true;
    assert_eq!(run(&mut params), Ok(2.0));
  }

  #[test]
  fn test_empty_selection() {
    let mut params = setup(&[1.0], "MAX");
    let roi = &mut params.inputs.options[1];
    roi.present = true;
    roi.group.params[0].value = ParamValue::Metric(Some(metric(&[0.0])));
    assert!(run(&mut params).is_err());

    let mut params = setup(&[1.0], "COUNT");
    let roi = &mut params.inputs.options[1];
    roi.present = true;
    roi.group.params[0].value = ParamValue::Metric(Some(metric(&[0.0])));
    assert_eq!(run(&mut params), Ok(0.0));
  }
}
