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
use crate::resource::MetricFile;

const METRIC_IN: i32 = 1;
const FACTOR: i32 = 2;
const METRIC_OUT: i32 = 3;
const COLUMN_OPT: i32 = 4;
const COLUMN: i32 = 1;
const CLAMP_OPT: i32 = 5;
const CLAMP_MIN: i32 = 1;
const CLAMP_MAX: i32 = 2;

pub struct MetricScale;

impl AutoAlgorithm for MetricScale {
  fn command_switch() -> &'static str {
    "-metric-scale"
  }

  fn short_description() -> &'static str {
    "MULTIPLY A METRIC BY A CONSTANT"
  }

  fn parameters() -> AlgorithmParameters {
    let mut params = AlgorithmParameters::new();
    params
      .inputs
      .add_metric_parameter(METRIC_IN, "metric-in", "the metric to scale");
    params
      .inputs
      .add_double_parameter(FACTOR, "factor", "the value to multiply by");
    params.add_metric_output(METRIC_OUT, "metric-out", "the output metric");

    let column = params
      .inputs
      .add_option(COLUMN_OPT, "-column", "column", "select a single column to scale");
    column.add_integer_parameter(COLUMN, "column", "the column number, starting from 1");

    let clamp = params
      .inputs
      .add_option(CLAMP_OPT, "-clamp", "clamp", "clamp the scaled values to a range");
    clamp.add_double_parameter(CLAMP_MIN, "min", "the lowest allowed value");
    clamp.add_double_parameter(CLAMP_MAX, "max", "the highest allowed value");

    params.set_help_text(
      "Multiplies every value of the input metric by the given factor. \
       When -column is given, only that column is scaled and written out. \
       When -clamp is given, scaled values are limited to the range [min, max].",
    );
    params
  }

  fn use_parameters(
    params: &mut AlgorithmParameters,
    mut progress: Option<&mut Progress>,
  ) -> Result<(), AlgorithmError> {
    let inputs = &params.inputs;
    let metric = inputs.metric(METRIC_IN)?;
    let factor = inputs.double(FACTOR)? as f32;

    let columns: Vec<usize> = match inputs.present_option(COLUMN_OPT)? {
      Some(column) => vec![column_index(metric, column.integer(COLUMN)?)?],
      None => (0..metric.num_columns()).collect(),
    };

    let range = match inputs.present_option(CLAMP_OPT)? {
      Some(clamp) => {
        let (min, max) = (clamp.double(CLAMP_MIN)?, clamp.double(CLAMP_MAX)?);
        if min > max {
          return Err(AlgorithmError::InvalidInput(format!(
            "clamp minimum {min} is larger than maximum {max}"
          )));
        }
        Some((min as f32, max as f32))
      }
      None => None,
    };

    let mut out = MetricFile::default();
    for (done, &index) in columns.iter().enumerate() {
      let scaled = metric.columns[index].iter().map(|v| {
        let v = v * factor;
        match range {
          Some((min, max)) => v.clamp(min, max),
          None => v,
        }
      });
      out.columns.push(scaled.collect());
      if let Some(name) = metric.column_names.get(index) {
        out.column_names.push(name.clone());
      }
      if let Some(progress) = progress.as_deref_mut() {
        progress.report(done + 1, columns.len());
      }
    }

    params.set_output(METRIC_OUT, ParamValue::Metric(Some(out)))
  }
}
