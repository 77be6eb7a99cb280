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
use anyhow::Result;
use std::env;
use std::env::VarError;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_FILE_VAR: &str = "ALGPARSE_LOG_FILE";

/// Installs the global subscriber.
///
/// Diagnostics go to stderr, or to the file named by `ALGPARSE_LOG_FILE`
/// when that is set. Stdout stays reserved for command output reports.
/// `RUST_LOG` selects the level and defaults to `info`.
///
/// Hold the returned guard until exit; dropping it flushes the file writer.
pub fn setup_tracing() -> Result<Option<WorkerGuard>> {
  let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

  match log_file(env::var(LOG_FILE_VAR)) {
    Some(log_file) => {
      let appender = tracing_appender::rolling::never(".", log_file);
      let (writer, guard) = tracing_appender::non_blocking(appender);
      tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init()?;
      Ok(Some(guard))
    }
    None => {
      tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()?;
      Ok(None)
    }
  }
}

/// An empty or unset variable means stderr.
fn log_file(var: Result<String, VarError>) -> Option<String> {
  var.ok().filter(|path| !path.trim().is_empty())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_log_file_selection() {
    assert_eq!(log_file(Ok("run.log".into())), Some("run.log".into()));
    assert_eq!(log_file(Ok("  ".into())), None);
    assert_eq!(log_file(Err(VarError::NotPresent)), None);
  }
}
