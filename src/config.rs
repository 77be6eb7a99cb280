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
use crate::cli::Cli;
use anyhow::Context;
use anyhow::Result;
use figment::Figment;
use figment::providers::Env;
use figment::providers::Format;
use figment::providers::Json;
use figment::providers::Serialized;
use figment::providers::Toml;
use serde::Deserialize;
use serde::Serialize;
use std::path::Path;

/// Config file merged from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "algparse.toml";

/// Prefix of environment variables that override configuration keys.
pub const ENV_PREFIX: &str = "ALGPARSE_";

/// Runtime configuration, layered as defaults, config file, then environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
  /// Column at which generated help text is wrapped.
  pub help_width: usize,
  /// Hand running algorithms a progress sink that logs at `debug`.
  pub progress: bool,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      help_width: 80,
      progress: false,
    }
  }
}

impl Config {
  /// The layered provider, before extraction.
  pub fn figment(config_file: Option<&Path>) -> Figment {
    let figment = Figment::from(Serialized::defaults(Config::default()));

    let figment = match config_file {
      Some(path) if path.extension().is_some_and(|ext| ext == "json") => {
        figment.merge(Json::file(path))
      }
      Some(path) => figment.merge(Toml::file(path)),
      None => figment.merge(Toml::file(DEFAULT_CONFIG_FILE)),
    };

    figment.merge(Env::prefixed(ENV_PREFIX))
  }

  pub fn load(config_file: Option<&Path>) -> Result<Self> {
    if let Some(path) = config_file {
      if !path.exists() {
        anyhow::bail!("Config file not found: {}", path.display());
      }
    }

    let config: Config = Self::figment(config_file)
      .extract()
      .context("Failed to load configuration")?;

    if config.help_width < 20 {
      anyhow::bail!(
        "help_width must be at least 20, got {}",
        config.help_width
      );
    }
    tracing::debug!(?config, "Configuration loaded");
    Ok(config)
  }
}

impl TryFrom<&Cli> for Config {
  type Error = anyhow::Error;

  fn try_from(cli: &Cli) -> Result<Self, Self::Error> {
    Config::load(cli.config.as_deref())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use figment::Jail;

  #[test]
  fn test_defaults() {
    Jail::expect_with(|_jail| {
      assert_eq!(Config::load(None).unwrap(), Config::default());
      Ok(())
    });
  }

  #[test]
  fn test_toml_file_then_env() {
    Jail::expect_with(|jail| {
      jail.create_file(DEFAULT_CONFIG_FILE, "help_width = 100\nprogress = true")?;
      let config = Config::load(None).unwrap();
      assert_eq!(config.help_width, 100);
      assert!(config.progress);

      jail.set_env("ALGPARSE_HELP_WIDTH", "60");
      assert_eq!(Config::load(None).unwrap().help_width, 60);
      Ok(())
    });
  }

  #[test]
  fn test_explicit_json_file() {
    Jail::expect_with(|jail| {
      jail.create_file("custom.json", r#"{"help_width": 120}"#)?;
      let config = Config::load(Some(Path::new("custom.json"))).unwrap();
      assert_eq!(config.help_width, 120);
      assert!(!config.progress);
      Ok(())
    });
  }

  #[test]
  fn test_missing_explicit_file_is_an_error() {
    Jail::expect_with(|_jail| {
      assert!(Config::load(Some(Path::new("nope.toml"))).is_err());
      Ok(())
    });
  }

  #[test]
  fn test_narrow_help_width_rejected() {
    Jail::expect_with(|jail| {
      jail.set_env("ALGPARSE_HELP_WIDTH", "5");
      assert!(Config::load(None).is_err());
      Ok(())
    });
  }
}
