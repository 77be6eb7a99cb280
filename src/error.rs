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
use crate::params::ParameterKind;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error enum for one command invocation.
#[derive(Error, Debug)]
pub enum CommandError {
  #[error(transparent)]
  Parse(#[from] ParseError),

  #[error(transparent)]
  File(#[from] FileError),

  #[error(transparent)]
  Algorithm(#[from] AlgorithmError),

  #[error(transparent)]
  Output(#[from] OutputError),

  #[error("Internal error, the parameter contract of '{command}' is inconsistent: {reason}")]
  Internal { command: String, reason: String },
}

/// User-input errors raised while consuming tokens (src/parser.rs, src/tokens.rs).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
  #[error("Missing argument, next expected argument is <{expected}>")]
  MissingArgument { expected: String },

  #[error("Unknown option: {switch}")]
  UnknownOption { switch: String },

  #[error(
    "Invalid option switch \"{switch}\" while next non-option argument is <{expected}>, option switch is either incorrect, or incorrectly placed"
  )]
  MisplacedOption { switch: String, expected: String },

  #[error("Unexpected non-option parameter: \"{token}\"")]
  UnexpectedArgument { token: String },

  #[error("Invalid {kind} value \"{token}\" for argument <{expected}>")]
  InvalidScalar {
    token: String,
    expected: String,
    kind: ParameterKind,
  },

  #[error("Internal error: no token available to push back")]
  NothingToBackUp,
}

/// Errors loading or writing a resource file (src/resource.rs).
#[derive(Error, Debug)]
pub enum FileError {
  #[error("Failed to open {kind} file: {path}")]
  Open {
    kind: ParameterKind,
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Failed to decode {kind} file: {path}")]
  Decode {
    kind: ParameterKind,
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("Invalid {kind} file {path}: {reason}")]
  Invalid {
    kind: ParameterKind,
    path: PathBuf,
    reason: String,
  },

  #[error("Failed to create {kind} file: {path}")]
  Create {
    kind: ParameterKind,
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Failed to write {kind} file: {path}")]
  Write {
    kind: ParameterKind,
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Failed to encode {kind} file: {path}")]
  Encode {
    kind: ParameterKind,
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },
}

/// Errors raised by an algorithm while it runs (src/algorithm.rs).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AlgorithmError {
  /// The inputs were readable but not usable together, e.g. mismatched sizes.
  #[error("{0}")]
  InvalidInput(String),

  /// The algorithm and its declared contract disagree.
  #[error("Internal algorithm error, please report this: {0}")]
  Internal(String),
}

/// Raised by the output binder after every output has been attempted.
#[derive(Error, Debug)]
#[error("Failed to write {} of {total} outputs: {}", .failures.len(), describe(.failures))]
pub struct OutputError {
  pub total: usize,
  pub failures: Vec<OutputFailure>,
}

/// One output that could not be written or reported.
#[derive(Error, Debug)]
pub enum OutputFailure {
  #[error(transparent)]
  File(#[from] FileError),

  #[error("output <{name}> was never set by the algorithm")]
  Unset { name: String },

  #[error("no output is declared with key {key}")]
  UnknownKey { key: i32 },

  #[error("Failed to report output <{name}>")]
  Report {
    name: String,
    #[source]
    source: std::io::Error,
  },
}

fn describe(failures: &[OutputFailure]) -> String {
  failures
    .iter()
    .map(|f| f.to_string())
    .collect::<Vec<_>>()
    .join("; ")
}
