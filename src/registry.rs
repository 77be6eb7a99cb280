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
use crate::algorithm::AutoAlgorithm;
use crate::algorithm::AutoOperation;
use crate::algorithm::Operation;
use crate::algorithms::MetricReduce;
use crate::algorithms::MetricScale;
use crate::algorithms::SurfaceInfo;
use crate::tokens::SWITCH_MARKER;

/// Every command the binary can run, keyed by command switch.
#[derive(Default)]
pub struct CommandRegistry {
  operations: Vec<Box<dyn Operation>>,
}

impl CommandRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// A registry holding the algorithms shipped with this crate.
  pub fn with_builtins() -> Self {
    let mut registry = Self::new();
    registry.register::<MetricReduce>();
    registry.register::<MetricScale>();
    registry.register::<SurfaceInfo>();
    registry
  }

  /// Registers `A`, replacing any earlier command with the same switch.
  pub fn register<A: AutoAlgorithm + 'static>(&mut self) -> &mut Self {
    let switch = A::command_switch();
    if let Some(index) = self.position(switch) {
      tracing::warn!(command = switch, "Replacing already registered command");
      self.operations.remove(index);
    }

    self.operations.push(Box::new(AutoOperation::<A>::new()));
    self
      .operations
      .sort_by(|a, b| a.command_switch().cmp(b.command_switch()));
    self
  }

  /// Looks up a command; the leading `-` of its switch is optional.
  pub fn find(&self, name: &str) -> Option<&dyn Operation> {
    self.position(name).map(|i| self.operations[i].as_ref())
  }

  /// Registered commands, sorted by switch.
  pub fn operations(&self) -> impl Iterator<Item = &dyn Operation> {
    self.operations.iter().map(|op| op.as_ref())
  }

  fn position(&self, name: &str) -> Option<usize> {
    let name = name.trim_start_matches(SWITCH_MARKER);
    self
      .operations
      .iter()
      .position(|op| op.command_switch().trim_start_matches(SWITCH_MARKER) == name)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::parser::CommandParser;
  use crate::tokens::TokenSource;

  #[test]
  fn test_find_with_or_without_dash() {
    let registry = CommandRegistry::with_builtins();
    assert_eq!(
      registry.find("-metric-scale").map(|op| op.command_switch()),
      Some("-metric-scale")
    );
    assert_eq!(
      registry.find("metric-scale").map(|op| op.command_switch()),
      Some("-metric-scale")
    );
    assert!(registry.find("metric-frobnicate").is_none());
  }

  #[test]
  fn test_builtins_are_sorted_and_unique() {
    let registry = CommandRegistry::with_builtins();
    let switches: Vec<_> = registry.operations().map(|op| op.command_switch()).collect();
    assert_eq!(switches, ["-metric-reduce", "-metric-scale", "-surface-info"]);
  }

  #[test]
  fn test_register_replaces_duplicates() {
    let mut registry = CommandRegistry::with_builtins();
    registry.register::<MetricScale>();
    assert_eq!(registry.operations().count(), 3);
  }

  #[test]
  fn test_builtin_contracts_are_consistent() {
    let registry = CommandRegistry::with_builtins();
    for op in registry.operations() {
      assert_eq!(op.parameters().validate(), Ok(()), "{}", op.command_switch());
      // Declaring the contract twice gives the same thing.
      assert_eq!(op.parameters(), op.parameters());
    }
  }

  #[test]
  fn test_builtin_runs_through_parser() {
    let registry = CommandRegistry::with_builtins();
    let op = registry.find("metric-scale").unwrap();
    let mut tokens = TokenSource::new(["-column", "1"]);
    let err = CommandParser::new(op)
      .execute_operation(&mut tokens, None, &mut Vec::new())
      .unwrap_err();
    assert!(err.to_string().contains("<metric-in>"), "{err}");
  }
}
