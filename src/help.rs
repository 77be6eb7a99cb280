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
use crate::algorithm::Operation;
use crate::params::AlgorithmParameters;
use crate::params::ParameterDescriptor;
use crate::params::ParameterGroup;

const INDENT: usize = 3;

/// Generates the full help text of an operation from its declared contract.
///
/// ```text
/// METRIC-SCALE
///    MULTIPLY A METRIC BY A CONSTANT
///
///    algparse run -metric-scale <metric-in> <metric-out> [-column <column>]
///       <metric-in> - the metric to scale
///       <metric-out> - output - the output metric
///
///       [-column] - select a single column
///          <column> - the column number
///
///    Help text, wrapped...
/// ```
pub fn usage(operation: &dyn Operation, width: usize) -> String {
  let params = operation.parameters();
  let switch = operation.command_switch();

  let mut lines = vec![switch.trim_start_matches('-').to_uppercase()];
  lines.extend(wrap(operation.short_description(), INDENT, width));
  lines.push(String::new());
  lines.extend(wrap(
    &format!("{} run {switch} {}", env!("CARGO_PKG_NAME"), synopsis(&params)),
    INDENT,
    width,
  ));
  describe_contract(&params, 2, width, &mut lines);

  if !params.help_text().is_empty() {
    lines.push(String::new());
    for (i, paragraph) in params.help_text().split("\n\n").enumerate() {
      if i > 0 {
        lines.push(String::new());
      }
      lines.extend(wrap(paragraph, INDENT, width));
    }
  }

  let mut text = lines.join("\n");
  text.push('\n');
  text
}

fn describe_contract(params: &AlgorithmParameters, depth: usize, width: usize, lines: &mut Vec<String>) {
  for param in &params.inputs.params {
    lines.extend(describe_parameter(param, None, depth, width));
  }
  for output in &params.outputs {
    lines.extend(describe_parameter(output, Some("output"), depth, width));
  }
  describe_options(&params.inputs, depth, width, lines);
}

fn describe_group(group: &ParameterGroup, depth: usize, width: usize, lines: &mut Vec<String>) {
  for param in &group.params {
    lines.extend(describe_parameter(param, None, depth, width));
  }
  describe_options(group, depth, width, lines);
}

fn describe_options(group: &ParameterGroup, depth: usize, width: usize, lines: &mut Vec<String>) {
  for option in &group.options {
    lines.push(String::new());
    lines.extend(wrap(
      &format!("[{}] - {}", option.switch, option.description),
      depth * INDENT,
      width,
    ));
    describe_group(&option.group, depth + 1, width, lines);
  }
}

fn describe_parameter(
  param: &ParameterDescriptor,
  tag: Option<&str>,
  depth: usize,
  width: usize,
) -> Vec<String> {
  let text = match tag {
    Some(tag) => format!("<{}> - {tag} - {}", param.name, param.description),
    None => format!("<{}> - {}", param.name, param.description),
  };
  wrap(&text, depth * INDENT, width)
}

/// One-line synopsis, e.g. `<input> <result> [-scale <factor>]`.
pub fn synopsis(params: &AlgorithmParameters) -> String {
  let mut words: Vec<String> = params
    .inputs
    .params
    .iter()
    .chain(&params.outputs)
    .map(|p| format!("<{}>", p.name))
    .collect();
  words.extend(params.inputs.options.iter().map(|o| option_synopsis(o.switch.as_str(), &o.group)));
  words.join(" ")
}

fn option_synopsis(switch: &str, group: &ParameterGroup) -> String {
  let mut words = vec![switch.to_string()];
  words.extend(group.params.iter().map(|p| format!("<{}>", p.name)));
  words.extend(group.options.iter().map(|o| option_synopsis(&o.switch, &o.group)));
  format!("[{}]", words.join(" "))
}

/// Greedy word wrap. Words longer than the line are left unbroken; continued
/// lines get one extra indent level.
fn wrap(text: &str, indent: usize, width: usize) -> Vec<String> {
  let mut lines = Vec::new();
  let mut line = " ".repeat(indent);
  let mut line_has_words = false;

  for word in text.split_whitespace() {
    if line_has_words && line.len() + 1 + word.len() > width {
      lines.push(std::mem::replace(&mut line, " ".repeat(indent + INDENT)));
      line_has_words = false;
    }
    if line_has_words {
      line.push(' ');
    }
    line.push_str(word);
    line_has_words = true;
  }

  if line_has_words || lines.is_empty() {
    lines.push(line.trim_end().to_string());
  }
  lines
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::algorithm::Progress;
  use crate::error::AlgorithmError;

  struct Scale;

  impl Operation for Scale {
    fn command_switch(&self) -> &'static str {
      "-scale-thing"
    }

    fn short_description(&self) -> &'static str {
      "SCALE A THING"
    }

    fn parameters(&self) -> AlgorithmParameters {
      let mut params = AlgorithmParameters::new();
      params.inputs.add_string_parameter(1, "input", "the input file");
      let scale = params.inputs.add_option(2, "-scale", "scale", "multiply first");
      scale.add_double_parameter(1, "factor", "the factor");
      let nested = scale.add_option(2, "-twice", "twice", "do it twice");
      nested.add_integer_parameter(1, "times", "how many extra times");
      params.add_double_output(3, "result", "the result");
      params.set_help_text("Scales a thing.\n\nSecond paragraph.");
      params
    }

    fn use_parameters(
      &self,
      _params: &mut AlgorithmParameters,
      _progress: Option<&mut Progress>,
    ) -> Result<(), AlgorithmError> {
      Ok(())
    }
  }

  #[test]
  fn test_usage_lists_everything_in_order() {
    let text = usage(&Scale, 100);
    let expected = format!(
      "SCALE-THING
   SCALE A THING

   {} run -scale-thing <input> <result> [-scale <factor> [-twice <times>]]
      <input> - the input file
      <result> - output - the result

      [-scale] - multiply first
         <factor> - the factor

         [-twice] - do it twice
            <times> - how many extra times

   Scales a thing.

   Second paragraph.
",
      env!("CARGO_PKG_NAME")
    );
    assert_eq!(text, expected);
  }

  #[test]
  fn test_synopsis_nests_options() {
    assert_eq!(
      synopsis(&Scale.parameters()),
      "<input> <result> [-scale <factor> [-twice <times>]]"
    );
  }

  #[test]
  fn test_wrap_respects_width() {
    let lines = wrap("aaa bbb ccc ddd", 2, 10);
    assert_eq!(lines, ["  aaa bbb", "     ccc", "     ddd"]);
    assert!(lines.iter().all(|l| l.len() <= 10));
  }

  #[test]
  fn test_wrap_keeps_long_words() {
    assert_eq!(wrap("abcdefghijkl", 0, 4), ["abcdefghijkl"]);
    assert_eq!(wrap("", 3, 10), [""]);
  }
}
