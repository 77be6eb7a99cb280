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
use clap::Parser;
use clap::Subcommand;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
  version,
  about = "Run algorithms through their declared parameter contracts",
  disable_help_subcommand = true
)]
pub struct Cli {
  /// Path to a TOML or JSON configuration file.
  /// Defaults to ./algparse.toml when present.
  #[arg(long, global = true, env = "ALGPARSE_CONFIG")]
  pub config: Option<PathBuf>,

  #[command(subcommand)]
  pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
  /// List every available command with its short description.
  List,

  /// Print the generated usage text of a command.
  Help {
    /// The command, e.g. metric-scale or -metric-scale.
    #[arg(allow_hyphen_values = true)]
    command: String,
  },

  /// Parse the remaining arguments against a command's contract and run it.
  Run {
    /// The command, e.g. metric-scale or -metric-scale.
    #[arg(allow_hyphen_values = true)]
    command: String,

    /// Inputs, outputs and option switches, in the order the command declares.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
  },
}
