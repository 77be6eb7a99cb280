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
use crate::error::AlgorithmError;
use crate::params::AlgorithmParameters;
use std::marker::PhantomData;

/// The static contract an algorithm implements.
///
/// `parameters` must not depend on user input: it is called once for help
/// text and once per invocation, and both must describe the same contract.
pub trait AutoAlgorithm {
  /// The command name, conventionally with a leading dash (`-metric-scale`).
  fn command_switch() -> &'static str;

  fn short_description() -> &'static str;

  fn parameters() -> AlgorithmParameters;

  /// Runs the algorithm against a parsed set and stores every declared output.
  fn use_parameters(
    params: &mut AlgorithmParameters,
    progress: Option<&mut Progress>,
  ) -> Result<(), AlgorithmError>;
}

/// Object-safe view of an [`AutoAlgorithm`], stored by the registry and
/// driven by the parser.
pub trait Operation {
  fn command_switch(&self) -> &'static str;

  fn short_description(&self) -> &'static str;

  fn parameters(&self) -> AlgorithmParameters;

  fn use_parameters(
    &self,
    params: &mut AlgorithmParameters,
    progress: Option<&mut Progress>,
  ) -> Result<(), AlgorithmError>;
}

/// Adapts an [`AutoAlgorithm`] to [`Operation`].
pub struct AutoOperation<A>(PhantomData<fn() -> A>);

impl<A> AutoOperation<A> {
  pub fn new() -> Self {
    Self(PhantomData)
  }
}

impl<A> Default for AutoOperation<A> {
  fn default() -> Self {
    Self::new()
  }
}

impl<A: AutoAlgorithm> Operation for AutoOperation<A> {
  fn command_switch(&self) -> &'static str {
    A::command_switch()
  }

  fn short_description(&self) -> &'static str {
    A::short_description()
  }

  fn parameters(&self) -> AlgorithmParameters {
    A::parameters()
  }

  fn use_parameters(
    &self,
    params: &mut AlgorithmParameters,
    progress: Option<&mut Progress>,
  ) -> Result<(), AlgorithmError> {
    A::use_parameters(params, progress)
  }
}

/// Passive progress sink handed to a running algorithm.
#[derive(Debug, Clone)]
pub struct Progress {
  task: String,
  fraction: f32,
}

impl Progress {
  pub fn new(task: impl Into<String>) -> Self {
    Self {
      task: task.into(),
      fraction: 0.0,
    }
  }

  pub fn fraction(&self) -> f32 {
    self.fraction
  }

  /// Records `done` of `total` units of work.
  pub fn report(&mut self, done: usize, total: usize) {
    let fraction = if total == 0 {
      1.0
    } else {
      (done as f32 / total as f32).clamp(0.0, 1.0)
    };
    self.fraction = fraction;
    tracing::debug!(task = %self.task, progress = %format!("{:.0}%", fraction * 100.0), "Progress");
  }

  pub fn finish(&mut self) {
    self.report(1, 1);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  struct Nothing;

  impl AutoAlgorithm for Nothing {
    fn command_switch() -> &'static str {
      "-nothing"
    }

    fn short_description() -> &'static str {
      "DO NOTHING"
    }

    fn parameters() -> AlgorithmParameters {
      let mut params = AlgorithmParameters::new();
      params.add_integer_output(1, "count", "always 7");
      params
    }

    fn use_parameters(
      params: &mut AlgorithmParameters,
      progress: Option<&mut Progress>,
    ) -> Result<(), AlgorithmError> {
      if let Some(progress) = progress {
        progress.finish();
      }
      params.set_output(1, crate::params::ParamValue::Integer(7))
    }
  }

  #[test]
  fn test_auto_operation_forwards() {
    let op: Box<dyn Operation> = Box::new(AutoOperation::<Nothing>::new());
    assert_eq!(op.command_switch(), "-nothing");
    assert_eq!(op.short_description(), "DO NOTHING");

    let mut params = op.parameters();
    let mut progress = Progress::new("nothing");
    op.use_parameters(&mut params, Some(&mut progress)).unwrap();

    assert_eq!(progress.fraction(), 1.0);
    assert_eq!(
      params.output(1).unwrap().value,
      crate::params::ParamValue::Integer(7)
    );
  }

  #[test]
  fn test_progress_clamps() {
    let mut progress = Progress::new("t");
    progress.report(5, 2);
    assert_eq!(progress.fraction(), 1.0);
    progress.report(1, 4);
    assert_eq!(progress.fraction(), 0.25);
    progress.report(3, 0);
    assert_eq!(progress.fraction(), 1.0);
  }
}
