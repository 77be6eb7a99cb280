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

//! The parameter contract an algorithm declares.
//!
//! An [`AlgorithmParameters`] is built fresh for every invocation. It is pure
//! metadata until the parser fills in the value slots; the same declaration
//! drives help generation and command-line parsing.

use crate::error::AlgorithmError;
use crate::resource::CiftiFile;
use crate::resource::LabelFile;
use crate::resource::MetricFile;
use crate::resource::SurfaceFile;
use crate::resource::VolumeFile;
use crate::tokens::SWITCH_MARKER;
use std::collections::HashSet;
use std::fmt;

/// The nine kinds a parameter can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKind {
  Surface,
  Volume,
  Metric,
  Label,
  Cifti,
  Double,
  Integer,
  String,
  Boolean,
}

impl ParameterKind {
  /// Resource kinds are loaded from a path and owned by the parameter set.
  pub fn is_resource(self) -> bool {
    matches!(
      self,
      ParameterKind::Surface
        | ParameterKind::Volume
        | ParameterKind::Metric
        | ParameterKind::Label
        | ParameterKind::Cifti
    )
  }

  pub fn name(self) -> &'static str {
    match self {
      ParameterKind::Surface => "surface",
      ParameterKind::Volume => "volume",
      ParameterKind::Metric => "metric",
      ParameterKind::Label => "label",
      ParameterKind::Cifti => "cifti",
      ParameterKind::Double => "floating point",
      ParameterKind::Integer => "integer",
      ParameterKind::String => "string",
      ParameterKind::Boolean => "boolean",
    }
  }
}

impl fmt::Display for ParameterKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// The value slot of a parameter. Resource slots start out empty, primitive
/// slots start at their zero value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
  Surface(Option<SurfaceFile>),
  Volume(Option<VolumeFile>),
  Metric(Option<MetricFile>),
  Label(Option<LabelFile>),
  Cifti(Option<CiftiFile>),
  Double(f64),
  Integer(i64),
  String(String),
  Boolean(bool),
}

impl ParamValue {
  pub fn empty(kind: ParameterKind) -> Self {
    match kind {
      ParameterKind::Surface => ParamValue::Surface(None),
      ParameterKind::Volume => ParamValue::Volume(None),
      ParameterKind::Metric => ParamValue::Metric(None),
      ParameterKind::Label => ParamValue::Label(None),
      ParameterKind::Cifti => ParamValue::Cifti(None),
      ParameterKind::Double => ParamValue::Double(0.0),
      ParameterKind::Integer => ParamValue::Integer(0),
      ParameterKind::String => ParamValue::String(String::new()),
      ParameterKind::Boolean => ParamValue::Boolean(false),
    }
  }

  pub fn kind(&self) -> ParameterKind {
    match self {
      ParamValue::Surface(_) => ParameterKind::Surface,
      ParamValue::Volume(_) => ParameterKind::Volume,
      ParamValue::Metric(_) => ParameterKind::Metric,
      ParamValue::Label(_) => ParameterKind::Label,
      ParamValue::Cifti(_) => ParameterKind::Cifti,
      ParamValue::Double(_) => ParameterKind::Double,
      ParamValue::Integer(_) => ParameterKind::Integer,
      ParamValue::String(_) => ParameterKind::String,
      ParamValue::Boolean(_) => ParameterKind::Boolean,
    }
  }
}

/// One declared parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
  /// Identifies the parameter within its list, used for retrieval.
  pub key: i32,
  /// Shown in help text and in "next expected argument" messages.
  pub name: String,
  pub description: String,
  pub value: ParamValue,
}

impl ParameterDescriptor {
  pub fn new(
    key: i32,
    name: impl Into<String>,
    description: impl Into<String>,
    kind: ParameterKind,
  ) -> Self {
    Self {
      key,
      name: name.into(),
      description: description.into(),
      value: ParamValue::empty(kind),
    }
  }

  pub fn kind(&self) -> ParameterKind {
    self.value.kind()
  }
}

/// Mandatory parameters in positional order, plus the options that may
/// appear among them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterGroup {
  pub params: Vec<ParameterDescriptor>,
  pub options: Vec<OptionalGroup>,
}

/// A switch-activated sub-contract.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionalGroup {
  pub key: i32,
  /// The exact token that activates this option, e.g. `-column`.
  pub switch: String,
  pub name: String,
  pub description: String,
  /// Set by the parser when the switch was matched.
  pub present: bool,
  pub group: ParameterGroup,
}

impl OptionalGroup {
  pub fn new(
    key: i32,
    switch: impl Into<String>,
    name: impl Into<String>,
    description: impl Into<String>,
  ) -> Self {
    Self {
      key,
      switch: switch.into(),
      name: name.into(),
      description: description.into(),
      present: false,
      group: ParameterGroup::default(),
    }
  }
}

impl ParameterGroup {
  pub fn add_parameter(
    &mut self,
    key: i32,
    name: impl Into<String>,
    description: impl Into<String>,
    kind: ParameterKind,
  ) {
    self
      .params
      .push(ParameterDescriptor::new(key, name, description, kind));
  }

  pub fn add_surface_parameter(&mut self, key: i32, name: &str, description: &str) {
    self.add_parameter(key, name, description, ParameterKind::Surface);
  }

  pub fn add_volume_parameter(&mut self, key: i32, name: &str, description: &str) {
    self.add_parameter(key, name, description, ParameterKind::Volume);
  }

  pub fn add_metric_parameter(&mut self, key: i32, name: &str, description: &str) {
    self.add_parameter(key, name, description, ParameterKind::Metric);
  }

  pub fn add_label_parameter(&mut self, key: i32, name: &str, description: &str) {
    self.add_parameter(key, name, description, ParameterKind::Label);
  }

  pub fn add_cifti_parameter(&mut self, key: i32, name: &str, description: &str) {
    self.add_parameter(key, name, description, ParameterKind::Cifti);
  }

  pub fn add_double_parameter(&mut self, key: i32, name: &str, description: &str) {
    self.add_parameter(key, name, description, ParameterKind::Double);
  }

  pub fn add_integer_parameter(&mut self, key: i32, name: &str, description: &str) {
    self.add_parameter(key, name, description, ParameterKind::Integer);
  }

  pub fn add_string_parameter(&mut self, key: i32, name: &str, description: &str) {
    self.add_parameter(key, name, description, ParameterKind::String);
  }

  pub fn add_boolean_parameter(&mut self, key: i32, name: &str, description: &str) {
    self.add_parameter(key, name, description, ParameterKind::Boolean);
  }

  /// Adds an option and hands it back so its own contents can be declared.
  pub fn add_option(
    &mut self,
    key: i32,
    switch: &str,
    name: &str,
    description: &str,
  ) -> &mut ParameterGroup {
    let index = self.options.len();
    self
      .options
      .push(OptionalGroup::new(key, switch, name, description));
    &mut self.options[index].group
  }

  /// Returns every value to its declared default and every nested option
  /// to absent, dropping any loaded resources.
  pub fn reset(&mut self) {
    for param in &mut self.params {
      param.value = ParamValue::empty(param.kind());
    }
    for option in &mut self.options {
      option.present = false;
      option.group.reset();
    }
  }

  pub fn parameter(&self, key: i32) -> Result<&ParameterDescriptor, AlgorithmError> {
    self
      .params
      .iter()
      .find(|p| p.key == key)
      .ok_or_else(|| AlgorithmError::Internal(format!("no parameter with key {key}")))
  }

  pub fn option(&self, key: i32) -> Result<&OptionalGroup, AlgorithmError> {
    self
      .options
      .iter()
      .find(|o| o.key == key)
      .ok_or_else(|| AlgorithmError::Internal(format!("no option with key {key}")))
  }

  /// Convenience for options: the option's group when it was given.
  pub fn present_option(&self, key: i32) -> Result<Option<&ParameterGroup>, AlgorithmError> {
    let option = self.option(key)?;
    Ok(option.present.then_some(&option.group))
  }

  fn value(&self, key: i32, kind: ParameterKind) -> Result<&ParamValue, AlgorithmError> {
    value_of(self.parameter(key)?, kind)
  }

  pub fn surface(&self, key: i32) -> Result<&SurfaceFile, AlgorithmError> {
    match self.value(key, ParameterKind::Surface)? {
      ParamValue::Surface(Some(surface)) => Ok(surface),
      _ => Err(not_loaded(key)),
    }
  }

  pub fn volume(&self, key: i32) -> Result<&VolumeFile, AlgorithmError> {
    match self.value(key, ParameterKind::Volume)? {
      ParamValue::Volume(Some(volume)) => Ok(volume),
      _ => Err(not_loaded(key)),
    }
  }

  pub fn metric(&self, key: i32) -> Result<&MetricFile, AlgorithmError> {
    match self.value(key, ParameterKind::Metric)? {
      ParamValue::Metric(Some(metric)) => Ok(metric),
      _ => Err(not_loaded(key)),
    }
  }

  pub fn label(&self, key: i32) -> Result<&LabelFile, AlgorithmError> {
    match self.value(key, ParameterKind::Label)? {
      ParamValue::Label(Some(label)) => Ok(label),
      _ => Err(not_loaded(key)),
    }
  }

  pub fn cifti(&self, key: i32) -> Result<&CiftiFile, AlgorithmError> {
    match self.value(key, ParameterKind::Cifti)? {
      ParamValue::Cifti(Some(cifti)) => Ok(cifti),
      _ => Err(not_loaded(key)),
    }
  }

  pub fn double(&self, key: i32) -> Result<f64, AlgorithmError> {
    match self.value(key, ParameterKind::Double)? {
      ParamValue::Double(v) => Ok(*v),
      _ => Err(not_loaded(key)),
    }
  }

  pub fn integer(&self, key: i32) -> Result<i64, AlgorithmError> {
    match self.value(key, ParameterKind::Integer)? {
      ParamValue::Integer(v) => Ok(*v),
      _ => Err(not_loaded(key)),
    }
  }

  pub fn string(&self, key: i32) -> Result<&str, AlgorithmError> {
    match self.value(key, ParameterKind::String)? {
      ParamValue::String(v) => Ok(v),
      _ => Err(not_loaded(key)),
    }
  }

  pub fn boolean(&self, key: i32) -> Result<bool, AlgorithmError> {
    match self.value(key, ParameterKind::Boolean)? {
      ParamValue::Boolean(v) => Ok(*v),
      _ => Err(not_loaded(key)),
    }
  }

  /// Checks key and switch uniqueness for this group and every nested option.
  pub fn validate(&self) -> Result<(), String> {
    check_unique_keys(self.params.iter().map(|p| (p.key, p.name.as_str())), "parameter")?;
    check_unique_keys(self.options.iter().map(|o| (o.key, o.name.as_str())), "option")?;

    let mut switches = HashSet::new();
    for option in &self.options {
      if !option.switch.starts_with(SWITCH_MARKER) || option.switch.len() < 2 {
        return Err(format!(
          "option <{}> has switch \"{}\", which does not start with '{SWITCH_MARKER}'",
          option.name, option.switch
        ));
      }
      if !switches.insert(option.switch.as_str()) {
        return Err(format!("switch \"{}\" is declared twice", option.switch));
      }
      option
        .group
        .validate()
        .map_err(|reason| format!("in option {}: {reason}", option.switch))?;
    }
    Ok(())
  }
}

/// The root of a parameter contract.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlgorithmParameters {
  pub inputs: ParameterGroup,
  pub outputs: Vec<ParameterDescriptor>,
  help_text: String,
}

impl AlgorithmParameters {
  pub fn new() -> Self {
    Self::default()
  }

  /// Describe only what the algorithm does; the parameter list is generated.
  pub fn set_help_text(&mut self, text: impl Into<String>) {
    self.help_text = text.into();
  }

  pub fn help_text(&self) -> &str {
    &self.help_text
  }

  pub fn add_output(
    &mut self,
    key: i32,
    name: impl Into<String>,
    description: impl Into<String>,
    kind: ParameterKind,
  ) {
    self
      .outputs
      .push(ParameterDescriptor::new(key, name, description, kind));
  }

  pub fn add_surface_output(&mut self, key: i32, name: &str, description: &str) {
    self.add_output(key, name, description, ParameterKind::Surface);
  }

  pub fn add_volume_output(&mut self, key: i32, name: &str, description: &str) {
    self.add_output(key, name, description, ParameterKind::Volume);
  }

  pub fn add_metric_output(&mut self, key: i32, name: &str, description: &str) {
    self.add_output(key, name, description, ParameterKind::Metric);
  }

  pub fn add_label_output(&mut self, key: i32, name: &str, description: &str) {
    self.add_output(key, name, description, ParameterKind::Label);
  }

  pub fn add_cifti_output(&mut self, key: i32, name: &str, description: &str) {
    self.add_output(key, name, description, ParameterKind::Cifti);
  }

  pub fn add_double_output(&mut self, key: i32, name: &str, description: &str) {
    self.add_output(key, name, description, ParameterKind::Double);
  }

  pub fn add_integer_output(&mut self, key: i32, name: &str, description: &str) {
    self.add_output(key, name, description, ParameterKind::Integer);
  }

  pub fn add_string_output(&mut self, key: i32, name: &str, description: &str) {
    self.add_output(key, name, description, ParameterKind::String);
  }

  pub fn add_boolean_output(&mut self, key: i32, name: &str, description: &str) {
    self.add_output(key, name, description, ParameterKind::Boolean);
  }

  pub fn output(&self, key: i32) -> Result<&ParameterDescriptor, AlgorithmError> {
    self
      .outputs
      .iter()
      .find(|p| p.key == key)
      .ok_or_else(|| AlgorithmError::Internal(format!("no output with key {key}")))
  }

  /// Stores an algorithm result. The value must match the declared kind.
  pub fn set_output(&mut self, key: i32, value: ParamValue) -> Result<(), AlgorithmError> {
    let output = self
      .outputs
      .iter_mut()
      .find(|p| p.key == key)
      .ok_or_else(|| AlgorithmError::Internal(format!("no output with key {key}")))?;

    if output.kind() != value.kind() {
      return Err(AlgorithmError::Internal(format!(
        "output <{}> is declared as {}, but was given a {} value",
        output.name,
        output.kind(),
        value.kind()
      )));
    }
    output.value = value;
    Ok(())
  }

  pub fn validate(&self) -> Result<(), String> {
    self.inputs.validate()?;
    check_unique_keys(self.outputs.iter().map(|p| (p.key, p.name.as_str())), "output")
  }
}

fn value_of(param: &ParameterDescriptor, kind: ParameterKind) -> Result<&ParamValue, AlgorithmError> {
  if param.kind() != kind {
    return Err(AlgorithmError::Internal(format!(
      "parameter <{}> is declared as {}, but was requested as {kind}",
      param.name,
      param.kind()
    )));
  }
  Ok(&param.value)
}

fn not_loaded(key: i32) -> AlgorithmError {
  AlgorithmError::Internal(format!("parameter with key {key} was never loaded"))
}

fn check_unique_keys<'a>(
  items: impl Iterator<Item = (i32, &'a str)>,
  what: &str,
) -> Result<(), String> {
  let mut seen = HashSet::new();
  for (key, name) in items {
    if !seen.insert(key) {
      return Err(format!("{what} <{name}> reuses key {key}"));
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn contract() -> AlgorithmParameters {
    let mut params = AlgorithmParameters::new();
    params.inputs.add_string_parameter(1, "input", "the input");
    let scale = params.inputs.add_option(2, "-scale", "scale", "scale it");
    scale.add_double_parameter(1, "factor", "the factor");
    params.add_double_output(3, "result", "the result");
    params
  }

  #[test]
  fn test_declared_slots_start_empty() {
    let params = contract();
    assert_eq!(params.inputs.string(1).unwrap(), "");
    assert!(!params.inputs.option(2).unwrap().present);
    assert_eq!(params.inputs.present_option(2).unwrap(), None);
    assert_eq!(params.output(3).unwrap().value, ParamValue::Double(0.0));
    assert!(params.validate().is_ok());
  }

  #[test]
  fn test_reset_matches_a_fresh_declaration() {
    let mut params = contract();
    params.inputs.params[0].value = ParamValue::String("foo".into());
    params.inputs.options[0].present = true;
    params.inputs.options[0].group.params[0].value = ParamValue::Double(2.5);

    params.inputs.reset();
    assert_eq!(params, contract());
  }

  #[test]
  fn test_keys_are_scoped_per_list() {
    // Key 1 is used by both the root and the option; that is allowed.
    let params = contract();
    assert!(params.validate().is_ok());

    let mut dup = contract();
    dup.inputs.add_integer_parameter(1, "again", "");
    let reason = dup.validate().unwrap_err();
    assert!(reason.contains("reuses key 1"), "{reason}");
  }

  #[test]
  fn test_bad_switches_are_rejected() {
    let mut params = contract();
    params.inputs.add_option(9, "noprefix", "x", "");
    assert!(params.validate().is_err());

    let mut params = contract();
    params.inputs.add_option(9, "-scale", "again", "");
    assert!(params.validate().unwrap_err().contains("declared twice"));
  }

  #[test]
  fn test_nested_option_errors_name_their_scope() {
    let mut params = contract();
    let outer = params.inputs.add_option(10, "-outer", "outer", "");
    outer.add_option(1, "-inner", "inner", "");
    outer.add_option(1, "-other", "other", "");
    assert!(params.validate().unwrap_err().starts_with("in option -outer"));
  }

  #[test]
  fn test_wrong_kind_retrieval_is_internal_error() {
    let params = contract();
    assert!(matches!(params.inputs.integer(1), Err(AlgorithmError::Internal(_))));
    assert!(matches!(params.inputs.metric(1), Err(AlgorithmError::Internal(_))));
    assert!(matches!(params.inputs.string(42), Err(AlgorithmError::Internal(_))));
  }

  #[test]
  fn test_unloaded_resource_is_internal_error() {
    let mut params = AlgorithmParameters::new();
    params.inputs.add_surface_parameter(1, "surface", "");
    assert!(matches!(params.inputs.surface(1), Err(AlgorithmError::Internal(_))));
  }

  #[test]
  fn test_set_output_checks_kind() {
    let mut params = contract();
    assert!(params.set_output(3, ParamValue::Integer(2)).is_err());
    params.set_output(3, ParamValue::Double(2.5)).unwrap();
    assert_eq!(params.output(3).unwrap().value, ParamValue::Double(2.5));
  }

  #[test]
  fn test_empty_value_matches_kind() {
    for kind in [
      ParameterKind::Surface,
      ParameterKind::Volume,
      ParameterKind::Metric,
      ParameterKind::Label,
      ParameterKind::Cifti,
      ParameterKind::Double,
      ParameterKind::Integer,
      ParameterKind::String,
      ParameterKind::Boolean,
    ] {
      assert_eq!(ParamValue::empty(kind).kind(), kind);
    }
  }
}
