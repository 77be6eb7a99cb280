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

//! Algorithms shipped with the `algparse` binary.

pub mod metric_reduce;
pub mod metric_scale;
pub mod surface_info;

pub use metric_reduce::MetricReduce;
pub use metric_scale::MetricScale;
pub use surface_info::SurfaceInfo;

use crate::error::AlgorithmError;
use crate::resource::MetricFile;

/// Converts a 1-based column number from the command line to an index.
fn column_index(metric: &MetricFile, column: i64) -> Result<usize, AlgorithmError> {
  let count = metric.num_columns();
  match usize::try_from(column) {
    Ok(n) if (1..=count).contains(&n) => Ok(n - 1),
    _ => Err(AlgorithmError::InvalidInput(format!(
      "column {column} is out of range, the metric has {count} column(s)"
    ))),
  }
}
