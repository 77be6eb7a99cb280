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

//! # Algparse
//!
//! `algparse` lets an algorithm declare its parameter contract once (mandatory
//! inputs in positional order, switch-activated optional groups nested to any
//! depth, and outputs) and exposes it as a command-line operation with
//! generated help text.
//!
//! This crate contains the library behind the `algparse` CLI; the parser can
//! also be driven directly with any [`algorithm::Operation`].
//!
//! ## Core Modules
//!
//! * [`params`]: The parameter declaration model: kinds, value slots, groups,
//!   options and the root `AlgorithmParameters`.
//! * [`tokens`]: The `TokenSource` cursor with one token of pushback.
//! * [`parser`]: Recursive-descent parsing of tokens against a contract, and
//!   the `CommandParser` that drives parse, execute and output.
//! * [`output`]: Binds outputs to their tokens and writes or reports them.
//! * [`algorithm`]: The `AutoAlgorithm`/`Operation` traits and `Progress`.
//! * [`registry`]: Command lookup by switch.
//! * [`help`]: Usage text generated from a contract.
//! * [`resource`]: The file-backed resource types parameters can own.
//! * [`algorithms`]: Built-in algorithms.
//! * [`cli`]: Defines the `clap`-based command-line interface.
//! * [`config`]: Layered `figment` configuration.
//! * [`error`]: Defines the custom error types for the library.
//! * [`logging`]: Provides the `setup_tracing` utility.

pub mod algorithm;
pub mod algorithms;
pub mod cli;
pub mod config;
pub mod error;
pub mod help;
pub mod logging;
pub mod output;
pub mod params;
pub mod parser;
pub mod registry;
pub mod resource;
pub mod tokens;
