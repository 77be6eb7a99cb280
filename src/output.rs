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
use crate::error::OutputError;
use crate::error::OutputFailure;
use crate::params::AlgorithmParameters;
use crate::params::ParamValue;
use crate::params::ParameterKind;
use crate::resource::ResourceFile;
use std::io::Write;
use std::path::Path;

/// Binds one declared output to the token the user gave for it.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputAssoc {
  pub key: i32,
  pub kind: ParameterKind,
  /// A file path for resource outputs; unused for primitive outputs.
  pub destination: String,
}

/// Writes every bound output after a successful run.
///
/// Resource outputs are written to their destination. Primitive outputs are
/// reported as a line on `report`. A failure does not stop the remaining
/// outputs from being attempted, but the call still fails at the end.
pub fn write_outputs(
  params: &AlgorithmParameters,
  bindings: &[OutputAssoc],
  report: &mut dyn Write,
) -> Result<(), OutputError> {
  let mut failures = Vec::new();

  for binding in bindings {
    tracing::debug!(key = binding.key, kind = %binding.kind, destination = %binding.destination, "Writing output");

    if let Err(failure) = write_output(params, binding, report) {
      tracing::error!(destination = %binding.destination, error = %failure, "Failed to write output");
      failures.push(failure);
    }
  }

  if failures.is_empty() {
    Ok(())
  } else {
    Err(OutputError {
      total: bindings.len(),
      failures,
    })
  }
}

fn write_output(
  params: &AlgorithmParameters,
  binding: &OutputAssoc,
  report: &mut dyn Write,
) -> Result<(), OutputFailure> {
  let output = params
    .output(binding.key)
    .map_err(|_| OutputFailure::UnknownKey { key: binding.key })?;
  let path = Path::new(&binding.destination);
  let name = &output.name;

  let line = match &output.value {
    ParamValue::Surface(Some(surface)) => return surface.write_file(path).map_err(Into::into),
    ParamValue::Volume(Some(volume)) => return volume.write_file(path).map_err(Into::into),
    ParamValue::Metric(Some(metric)) => return metric.write_file(path).map_err(Into::into),
    ParamValue::Label(Some(label)) => return label.write_file(path).map_err(Into::into),
    ParamValue::Cifti(Some(cifti)) => return cifti.write_file(path).map_err(Into::into),
    ParamValue::Surface(None)
    | ParamValue::Volume(None)
    | ParamValue::Metric(None)
    | ParamValue::Label(None)
    | ParamValue::Cifti(None) => return Err(OutputFailure::Unset { name: name.clone() }),
    ParamValue::Boolean(v) => format!("Output Boolean \"{name}\" value is {v}"),
    ParamValue::Double(v) => format!("Output Floating Point \"{name}\" value is {v}"),
    ParamValue::Integer(v) => format!("Output Integer \"{name}\" value is {v}"),
    ParamValue::String(v) => format!("Output String \"{name}\" value is {v}"),
  };

  tracing::info!(output = %name, "{}", line);
  writeln!(report, "{line}").map_err(|source| OutputFailure::Report {
    name: name.clone(),
    source,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::resource::MetricFile;
  use tempfile::tempdir;

  fn bind(params: &AlgorithmParameters, key: i32, destination: &str) -> OutputAssoc {
    OutputAssoc {
      key,
      kind: params.output(key).unwrap().kind(),
      destination: destination.to_string(),
    }
  }

  #[test]
  fn test_integer_output_is_reported_not_written() {
    let temp = tempdir().unwrap();
    let destination = temp.path().join("count.txt");

    let mut params = AlgorithmParameters::new();
    params.add_integer_output(1, "count", "");
    params.set_output(1, ParamValue::Integer(12)).unwrap();

    let mut report = Vec::new();
    let bindings = [bind(&params, 1, destination.to_str().unwrap())];
    write_outputs(&params, &bindings, &mut report).unwrap();

    assert_eq!(
      String::from_utf8(report).unwrap(),
      "Output Integer \"count\" value is 12\n"
    );
    assert!(!destination.exists());
  }

  #[test]
  fn test_every_primitive_kind_reports() {
    let mut params = AlgorithmParameters::new();
    params.add_boolean_output(1, "flag", "");
    params.add_double_output(2, "mean", "");
    params.add_string_output(3, "word", "");
    params.set_output(1, ParamValue::Boolean(true)).unwrap();
    params.set_output(2, ParamValue::Double(0.5)).unwrap();
    params
      .set_output(3, ParamValue::String("hi".into()))
      .unwrap();

    let mut report = Vec::new();
    let bindings: Vec<_> = (1..=3).map(|k| bind(&params, k, "-")).collect();
    write_outputs(&params, &bindings, &mut report).unwrap();

    let text = String::from_utf8(report).unwrap();
    assert!(text.contains("Output Boolean \"flag\" value is true"));
    assert!(text.contains("Output Floating Point \"mean\" value is 0.5"));
    assert!(text.contains("Output String \"word\" value is hi"));
  }

  #[test]
  fn test_failed_output_does_not_stop_the_rest() {
    let temp = tempdir().unwrap();
    let good = temp.path().join("good.json");
    let bad = temp.path().join("missing-dir").join("bad.json");

    let mut params = AlgorithmParameters::new();
    params.add_metric_output(1, "first", "");
    params.add_metric_output(2, "second", "");
    params.add_metric_output(3, "never-set", "");
    let metric = MetricFile {
      column_names: vec![],
      columns: vec![vec![1.0]],
    };
    params
      .set_output(1, ParamValue::Metric(Some(metric.clone())))
      .unwrap();
    params
      .set_output(2, ParamValue::Metric(Some(metric.clone())))
      .unwrap();

    let bindings = [
      bind(&params, 1, bad.to_str().unwrap()),
      bind(&params, 2, good.to_str().unwrap()),
      bind(&params, 3, "unused.json"),
    ];
    let err = write_outputs(&params, &bindings, &mut Vec::new()).unwrap_err();

    assert_eq!(err.total, 3);
    assert_eq!(err.failures.len(), 2);
    assert!(matches!(err.failures[0], OutputFailure::File(_)));
    assert!(matches!(err.failures[1], OutputFailure::Unset { .. }));
    assert_eq!(MetricFile::read_file(&good).unwrap(), metric);
  }
}
