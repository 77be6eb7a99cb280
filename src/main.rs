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
use Commands::Help;
use Commands::List;
use Commands::Run;
use algparse::algorithm::Progress;
use algparse::cli::Cli;
use algparse::cli::Commands;
use algparse::config::Config;
use algparse::help::usage;
use algparse::logging::setup_tracing;
use algparse::parser::CommandParser;
use algparse::registry::CommandRegistry;
use algparse::tokens::TokenSource;
use anyhow::Context;
use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
  let _guard = setup_tracing()?;

  let cli = Cli::parse();
  let config = Config::try_from(&cli)?;
  let registry = CommandRegistry::with_builtins();

  let main_span = tracing::info_span!("algparse");
  let _enter = main_span.enter();

  match cli.command {
    List => {
      for op in registry.operations() {
        println!("{:<24}{}", op.command_switch(), op.short_description());
      }
    }
    Help { command } => {
      let op = registry
        .find(&command)
        .with_context(|| format!("Unknown command: {command}"))?;
      print!("{}", usage(op, config.help_width));
    }
    Run { command, args } => {
      let op = registry
        .find(&command)
        .with_context(|| format!("Unknown command: {command}"))?;
      tracing::info!(command = op.command_switch(), "Running command");

      let mut tokens = TokenSource::new(args);
      let mut progress = config.progress.then(|| Progress::new(op.command_switch()));
      let stdout = std::io::stdout();
      let mut report = stdout.lock();

      CommandParser::new(op)
        .execute_operation(&mut tokens, progress.as_mut(), &mut report)
        .with_context(|| format!("Command {} failed", op.command_switch()))?;

      tracing::info!("Command complete");
    }
  }

  Ok(())
}
