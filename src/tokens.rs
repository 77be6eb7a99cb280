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
use crate::error::ParseError;
use crate::params::ParameterKind;

/// Leading character that marks a token as a candidate option switch.
pub const SWITCH_MARKER: char = '-';

pub fn is_switch(token: &str) -> bool {
  token.starts_with(SWITCH_MARKER)
}

/// A flat list of argument tokens with a cursor and one token of pushback.
///
/// Every `next_*` method takes the display name of the argument the caller
/// expects, so running out of tokens or failing a conversion reports it.
#[derive(Debug, Clone)]
pub struct TokenSource {
  tokens: Vec<String>,
  cursor: usize,
  can_back_up: bool,
}

impl TokenSource {
  pub fn new<I, S>(tokens: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      tokens: tokens.into_iter().map(Into::into).collect(),
      cursor: 0,
      can_back_up: false,
    }
  }

  pub fn has_next(&self) -> bool {
    self.cursor < self.tokens.len()
  }

  /// Tokens not yet consumed.
  pub fn remaining(&self) -> &[String] {
    &self.tokens[self.cursor..]
  }

  pub fn next_string(&mut self, expected: &str) -> Result<String, ParseError> {
    let Some(token) = self.tokens.get(self.cursor) else {
      return Err(ParseError::MissingArgument {
        expected: expected.to_string(),
      });
    };
    self.cursor += 1;
    self.can_back_up = true;
    Ok(token.clone())
  }

  /// Accepts `true`/`false` in any case, and `1`/`0`.
  pub fn next_bool(&mut self, expected: &str) -> Result<bool, ParseError> {
    let token = self.next_string(expected)?;
    match token.to_ascii_lowercase().as_str() {
      "true" | "1" => Ok(true),
      "false" | "0" => Ok(false),
      _ => Err(invalid(token, expected, ParameterKind::Boolean)),
    }
  }

  pub fn next_double(&mut self, expected: &str) -> Result<f64, ParseError> {
    let token = self.next_string(expected)?;
    token
      .parse()
      .map_err(|_| invalid(token, expected, ParameterKind::Double))
  }

  pub fn next_int(&mut self, expected: &str) -> Result<i64, ParseError> {
    let token = self.next_string(expected)?;
    token
      .parse()
      .map_err(|_| invalid(token, expected, ParameterKind::Integer))
  }

  /// Un-consumes the most recently read token. Only one level is kept.
  pub fn backup(&mut self) -> Result<(), ParseError> {
    if !self.can_back_up {
      return Err(ParseError::NothingToBackUp);
    }
    self.cursor -= 1;
    self.can_back_up = false;
    Ok(())
  }
}

fn invalid(token: String, expected: &str, kind: ParameterKind) -> ParseError {
  ParseError::InvalidScalar {
    token,
    expected: expected.to_string(),
    kind,
  }
}
