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
use crate::algorithm::Progress;
use crate::error::AlgorithmError;
use crate::params::AlgorithmParameters;
use crate::params::ParamValue;

const SURFACE: i32 = 1;
const NUM_VERTICES: i32 = 2;
const NUM_TRIANGLES: i32 = 3;

pub struct SurfaceInfo;

impl AutoAlgorithm for SurfaceInfo {
  fn command_switch() -> &'static str {
    "-surface-info"
  }

  fn short_description() -> &'static str {
    "REPORT THE SIZE OF A SURFACE"
  }

  fn parameters() -> AlgorithmParameters {
    let mut params = AlgorithmParameters::new();
    params
      .inputs
      .add_surface_parameter(SURFACE, "surface", "the surface to inspect");
    params.add_integer_output(NUM_VERTICES, "num-vertices", "the number of vertices");
    params.add_integer_output(NUM_TRIANGLES, "num-triangles", "the number of triangles");
    params.set_help_text(
      "Prints the number of vertices and triangles of a surface. \
       The output names are placeholders, nothing is written to them.",
    );
    params
  }

  fn use_parameters(
    params: &mut AlgorithmParameters,
    _progress: Option<&mut Progress>,
  ) -> Result<(), AlgorithmError> {
    let surface = params.inputs.surface(SURFACE)?;
    let vertices = surface.num_vertices() as i64;
    let triangles = surface.triangles.len() as i64;

    params.set_output(NUM_VERTICES, ParamValue::Integer(vertices))?;
    params.set_output(NUM_TRIANGLES, ParamValue::Integer(triangles))
  }
}
