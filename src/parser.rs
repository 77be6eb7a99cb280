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

//! Recursive-descent parsing of a token stream against a parameter contract.
//!
//! The token stream for a command is laid out as
//!
//! ```text
//! <mandatory inputs, options anywhere among them> <outputs> <trailing options>
//! ```
//!
//! Options are matched against the group currently being parsed. When a
//! group has all its mandatory parameters and the next switch is not one of
//! its own options, the switch is pushed back for the enclosing group.

use crate::algorithm::Operation;
use crate::algorithm::Progress;
use crate::error::CommandError;
use crate::error::ParseError;
use crate::output::OutputAssoc;
use crate::output::write_outputs;
use crate::params::AlgorithmParameters;
use crate::params::ParamValue;
use crate::params::ParameterDescriptor;
use crate::params::ParameterGroup;
use crate::params::ParameterKind;
use crate::resource::CiftiFile;
use crate::resource::LabelFile;
use crate::resource::MetricFile;
use crate::resource::ResourceFile;
use crate::resource::SurfaceFile;
use crate::resource::VolumeFile;
use crate::tokens::TokenSource;
use crate::tokens::is_switch;
use std::io::Write;
use std::path::Path;

/// What a switch-like token means at a given point of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchResolution {
  /// One of the group's options, by index.
  Matched(usize),
  /// The group is complete; the token belongs to an enclosing scope.
  Deferred,
  /// A negative number for the pending numeric parameter.
  Value,
  /// Unknown switch while a mandatory parameter is still pending.
  Misplaced,
}

/// Decides how a switch-like `token` is handled by `group`.
///
/// `pending` is the next unfilled mandatory parameter, or `None` once the
/// group is complete. A matching option always wins.
pub fn resolve_switch(
  group: &ParameterGroup,
  token: &str,
  pending: Option<&ParameterDescriptor>,
) -> SwitchResolution {
  if let Some(index) = group.options.iter().position(|o| o.switch == token) {
    return SwitchResolution::Matched(index);
  }

  match pending {
    None => SwitchResolution::Deferred,
    Some(param) if is_number_for(param.kind(), token) => SwitchResolution::Value,
    Some(_) => SwitchResolution::Misplaced,
  }
}

fn is_number_for(kind: ParameterKind, token: &str) -> bool {
  match kind {
    ParameterKind::Double => token.parse::<f64>().is_ok(),
    ParameterKind::Integer => token.parse::<i64>().is_ok(),
    _ => false,
  }
}

/// Fills the mandatory parameters of `group`, entering options as their
/// switches are found.
pub fn parse_group(group: &mut ParameterGroup, tokens: &mut TokenSource) -> Result<(), CommandError> {
  let mut i = 0;
  loop {
    if i == group.params.len() {
      // Options may also follow the last mandatory parameter.
      if !tokens.has_next() {
        return Ok(());
      }
      let next = tokens.next_string("option")?;
      if is_switch(&next) {
        if let SwitchResolution::Matched(index) = resolve_switch(group, &next, None) {
          parse_option(group, index, tokens)?;
          continue;
        }
      }
      tracing::debug!(token = %next, "Handing token back to the enclosing scope");
      tokens.backup()?;
      return Ok(());
    }

    let next = tokens.next_string(&group.params[i].name)?;
    if is_switch(&next) {
      match resolve_switch(group, &next, Some(&group.params[i])) {
        SwitchResolution::Matched(index) => {
          parse_option(group, index, tokens)?;
          continue;
        }
        SwitchResolution::Value => {}
        SwitchResolution::Deferred | SwitchResolution::Misplaced => {
          return Err(
            ParseError::MisplacedOption {
              switch: next,
              expected: group.params[i].name.clone(),
            }
            .into(),
          );
        }
      }
    }

    let value = consume_value(&group.params[i], next, tokens)?;
    group.params[i].value = value;
    i += 1;
  }
}

fn parse_option(
  group: &mut ParameterGroup,
  index: usize,
  tokens: &mut TokenSource,
) -> Result<(), CommandError> {
  let option = &mut group.options[index];
  tracing::debug!(switch = %option.switch, "Matched option");

  if option.present {
    tracing::debug!(switch = %option.switch, "Option given again, discarding earlier values");
    option.group.reset();
  }
  option.present = true;
  parse_group(&mut option.group, tokens)
}

/// Converts an already-read token into a value of the parameter's kind.
/// Resource kinds are loaded from the token as a path right away.
fn consume_value(
  param: &ParameterDescriptor,
  token: String,
  tokens: &mut TokenSource,
) -> Result<ParamValue, CommandError> {
  let name = param.name.as_str();
  let path = Path::new(&token);

  let value = match param.kind() {
    ParameterKind::Boolean => {
      tokens.backup()?;
      ParamValue::Boolean(tokens.next_bool(name)?)
    }
    ParameterKind::Double => {
      tokens.backup()?;
      ParamValue::Double(tokens.next_double(name)?)
    }
    ParameterKind::Integer => {
      tokens.backup()?;
      ParamValue::Integer(tokens.next_int(name)?)
    }
    ParameterKind::String => ParamValue::String(token.clone()),
    ParameterKind::Surface => ParamValue::Surface(Some(SurfaceFile::read_file(path)?)),
    ParameterKind::Volume => ParamValue::Volume(Some(VolumeFile::read_file(path)?)),
    ParameterKind::Metric => ParamValue::Metric(Some(MetricFile::read_file(path)?)),
    ParameterKind::Label => ParamValue::Label(Some(LabelFile::read_file(path)?)),
    ParameterKind::Cifti => ParamValue::Cifti(Some(CiftiFile::read_file(path)?)),
  };

  tracing::debug!(
    argument = name,
    token = %token,
    loaded = param.kind().is_resource(),
    "Bound argument"
  );
  Ok(value)
}

/// Binds each declared output to the next token. Options of the root group
/// may still appear here; an unknown switch is fatal since there is no
/// enclosing scope left.
pub fn parse_output_assoc(
  params: &mut AlgorithmParameters,
  tokens: &mut TokenSource,
) -> Result<Vec<OutputAssoc>, CommandError> {
  let mut bindings = Vec::with_capacity(params.outputs.len());

  while bindings.len() < params.outputs.len() {
    let output = &params.outputs[bindings.len()];
    let next = tokens.next_string(&output.name)?;

    if is_switch(&next) {
      match resolve_switch(&params.inputs, &next, None) {
        SwitchResolution::Matched(index) => {
          parse_option(&mut params.inputs, index, tokens)?;
          continue;
        }
        _ => return Err(ParseError::UnknownOption { switch: next }.into()),
      }
    }

    tracing::debug!(output = %output.name, destination = %next, "Bound output");
    bindings.push(OutputAssoc {
      key: output.key,
      kind: output.kind(),
      destination: next,
    });
  }

  Ok(bindings)
}

/// Consumes whatever is left; only root-level option switches are allowed.
pub fn parse_remaining_options(
  group: &mut ParameterGroup,
  tokens: &mut TokenSource,
) -> Result<(), CommandError> {
  while tokens.has_next() {
    let next = tokens.next_string("option")?;
    if !is_switch(&next) {
      return Err(ParseError::UnexpectedArgument { token: next }.into());
    }

    match resolve_switch(group, &next, None) {
      SwitchResolution::Matched(index) => parse_option(group, index, tokens)?,
      _ => return Err(ParseError::UnknownOption { switch: next }.into()),
    }
  }
  Ok(())
}

/// Parses the whole token stream into `params`, returning the output bindings.
pub fn parse_arguments(
  params: &mut AlgorithmParameters,
  tokens: &mut TokenSource,
) -> Result<Vec<OutputAssoc>, CommandError> {
  parse_group(&mut params.inputs, tokens)?;
  let bindings = parse_output_assoc(params, tokens)?;
  parse_remaining_options(&mut params.inputs, tokens)?;
  Ok(bindings)
}

/// Drives one operation from tokens to written outputs.
pub struct CommandParser<'a> {
  operation: &'a dyn Operation,
}

impl<'a> CommandParser<'a> {
  pub fn new(operation: &'a dyn Operation) -> Self {
    Self { operation }
  }

  /// Builds a fresh contract and fills it from `tokens`.
  pub fn parse(
    &self,
    tokens: &mut TokenSource,
  ) -> Result<(AlgorithmParameters, Vec<OutputAssoc>), CommandError> {
    let mut params = self.operation.parameters();
    params.validate().map_err(|reason| {
      tracing::error!(command = self.operation.command_switch(), %reason, "Inconsistent parameter contract");
      CommandError::Internal {
        command: self.operation.command_switch().to_string(),
        reason,
      }
    })?;

    let bindings = parse_arguments(&mut params, tokens)?;
    Ok((params, bindings))
  }

  /// Parses, runs the algorithm, then writes its outputs. Nothing runs if
  /// parsing fails; everything loaded is released when the set is dropped.
  pub fn execute_operation(
    &self,
    tokens: &mut TokenSource,
    progress: Option<&mut Progress>,
    report: &mut dyn Write,
  ) -> Result<(), CommandError> {
    let (mut params, bindings) = self.parse(tokens)?;

    tracing::debug!(command = self.operation.command_switch(), "Running algorithm");
    self.operation.use_parameters(&mut params, progress)?;

    write_outputs(&params, &bindings, report)?;
    Ok(())
  }
}
