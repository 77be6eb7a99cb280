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

//! File-backed resources a parameter can own.
//!
//! Each resource is stored as a JSON document. The parser only needs "load
//! from path" and the output binder only needs "write to path", both provided
//! by [`ResourceFile`].

use crate::error::FileError;
use crate::params::ParameterKind;
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;

/// Load/write contract shared by every resource kind.
pub trait ResourceFile: Serialize + DeserializeOwned + Sized {
  const KIND: ParameterKind;

  /// Structural checks run after decoding.
  fn check(&self) -> Result<(), String> {
    Ok(())
  }

  fn read_file(path: &Path) -> Result<Self, FileError> {
    tracing::debug!(kind = %Self::KIND, path = %path.display(), "Reading resource");

    let file = File::open(path).map_err(|source| FileError::Open {
      kind: Self::KIND,
      path: path.to_path_buf(),
      source,
    })?;
    let resource: Self =
      serde_json::from_reader(BufReader::new(file)).map_err(|source| FileError::Decode {
        kind: Self::KIND,
        path: path.to_path_buf(),
        source,
      })?;

    resource.check().map_err(|reason| FileError::Invalid {
      kind: Self::KIND,
      path: path.to_path_buf(),
      reason,
    })?;
    Ok(resource)
  }

  fn write_file(&self, path: &Path) -> Result<(), FileError> {
    tracing::debug!(kind = %Self::KIND, path = %path.display(), "Writing resource");

    let file = File::create(path).map_err(|source| FileError::Create {
      kind: Self::KIND,
      path: path.to_path_buf(),
      source,
    })?;
    let written = encode(self, Self::KIND, path, BufWriter::new(file));

    if written.is_err() {
      // A half-written file must not look like a valid result.
      let _ = std::fs::remove_file(path);
    }
    written
  }
}

/// Serializes `resource` into `writer` and flushes it. `path` is only used
/// in errors.
fn encode<T: Serialize, W: Write>(
  resource: &T,
  kind: ParameterKind,
  path: &Path,
  mut writer: W,
) -> Result<(), FileError> {
  serde_json::to_writer_pretty(&mut writer, resource).map_err(|source| FileError::Encode {
    kind,
    path: path.to_path_buf(),
    source,
  })?;
  writer.flush().map_err(|source| FileError::Write {
    kind,
    path: path.to_path_buf(),
    source,
  })
}

/// A triangulated mesh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceFile {
  pub coordinates: Vec<[f32; 3]>,
  #[serde(default)]
  pub triangles: Vec<[u32; 3]>,
}

impl SurfaceFile {
  pub fn num_vertices(&self) -> usize {
    self.coordinates.len()
  }
}

impl ResourceFile for SurfaceFile {
  const KIND: ParameterKind = ParameterKind::Surface;

  fn check(&self) -> Result<(), String> {
    let n = self.coordinates.len();
    match self.triangles.iter().flatten().find(|&&v| v as usize >= n) {
      Some(v) => Err(format!("triangle references vertex {v}, but only {n} exist")),
      None => Ok(()),
    }
  }
}

/// A voxel grid with one or more frames.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VolumeFile {
  pub dimensions: [usize; 3],
  pub frames: Vec<Vec<f32>>,
}

impl ResourceFile for VolumeFile {
  const KIND: ParameterKind = ParameterKind::Volume;

  fn check(&self) -> Result<(), String> {
    let voxels: usize = self.dimensions.iter().product();
    match self.frames.iter().position(|f| f.len() != voxels) {
      Some(i) => Err(format!(
        "frame {} has {} voxels, expected {voxels}",
        i + 1,
        self.frames[i].len()
      )),
      None => Ok(()),
    }
  }
}

/// Per-vertex float data, one column per map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricFile {
  #[serde(default)]
  pub column_names: Vec<String>,
  pub columns: Vec<Vec<f32>>,
}

impl MetricFile {
  pub fn num_nodes(&self) -> usize {
    self.columns.first().map_or(0, Vec::len)
  }

  pub fn num_columns(&self) -> usize {
    self.columns.len()
  }
}

impl ResourceFile for MetricFile {
  const KIND: ParameterKind = ParameterKind::Metric;

  fn check(&self) -> Result<(), String> {
    check_columns(&self.columns, &self.column_names)
  }
}

/// Per-vertex integer keys plus the label table naming them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelFile {
  #[serde(default)]
  pub column_names: Vec<String>,
  pub columns: Vec<Vec<i32>>,
  #[serde(default)]
  pub table: BTreeMap<i32, String>,
}

impl ResourceFile for LabelFile {
  const KIND: ParameterKind = ParameterKind::Label;

  fn check(&self) -> Result<(), String> {
    check_columns(&self.columns, &self.column_names)
  }
}

/// A dense row-major matrix.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CiftiFile {
  pub rows: usize,
  pub columns: usize,
  pub data: Vec<f32>,
}

impl ResourceFile for CiftiFile {
  const KIND: ParameterKind = ParameterKind::Cifti;

  fn check(&self) -> Result<(), String> {
    if self.data.len() != self.rows * self.columns {
      return Err(format!(
        "{} values do not fill a {}x{} matrix",
        self.data.len(),
        self.rows,
        self.columns
      ));
    }
    Ok(())
  }
}

fn check_columns<T>(columns: &[Vec<T>], names: &[String]) -> Result<(), String> {
  let nodes = columns.first().map_or(0, Vec::len);
  if let Some(i) = columns.iter().position(|c| c.len() != nodes) {
    return Err(format!(
      "column {} has {} nodes, expected {nodes}",
      i + 1,
      columns[i].len()
    ));
  }
  if !names.is_empty() && names.len() != columns.len() {
    return Err(format!(
      "{} column names given for {} columns",
      names.len(),
      columns.len()
    ));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  /// Accepts every byte but fails when flushed, like a full disk.
  struct FullDisk;

  impl Write for FullDisk {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
      Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
      Err(std::io::Error::other("no space left on device"))
    }
  }

  #[test]
  fn test_flush_failure_is_a_write_error() {
    let metric = MetricFile::default();
    let err = encode(&metric, ParameterKind::Metric, Path::new("out.json"), FullDisk).unwrap_err();

    assert!(matches!(err, FileError::Write { kind: ParameterKind::Metric, .. }));
    assert_eq!(err.to_string(), "Failed to write metric file: out.json");
  }

  #[test]
  fn test_metric_write_then_read() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("m.json");
    let metric = MetricFile {
      column_names: vec!["thickness".into()],
      columns: vec![vec![1.0, 2.5, -3.0]],
    };

    metric.write_file(&path).unwrap();
    let read = MetricFile::read_file(&path).unwrap();

    assert_eq!(read, metric);
    assert_eq!(read.num_nodes(), 3);
  }

  #[test]
  fn test_missing_file_reports_path() {
    let err = VolumeFile::read_file(Path::new("does/not/exist.json")).unwrap_err();
    assert!(matches!(err, FileError::Open { kind: ParameterKind::Volume, .. }));
    assert!(err.to_string().contains("does/not/exist.json"));
  }

  #[test]
  fn test_surface_rejects_out_of_range_triangle() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("s.json");
    std::fs::write(
      &path,
      r#"{"coordinates": [[0,0,0],[1,0,0],[0,1,0]], "triangles": [[0,1,3]]}"#,
    )
    .unwrap();

    let err = SurfaceFile::read_file(&path).unwrap_err();
    assert!(matches!(err, FileError::Invalid { .. }));
  }

  #[test]
  fn test_ragged_label_columns_rejected() {
    let label = LabelFile {
      column_names: vec![],
      columns: vec![vec![1, 2], vec![1]],
      table: BTreeMap::new(),
    };
    assert!(label.check().is_err());
  }

  #[test]
  fn test_garbage_is_decode_error() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("c.json");
    std::fs::write(&path, "not json").unwrap();

    let err = CiftiFile::read_file(&path).unwrap_err();
    assert!(matches!(err, FileError::Decode { kind: ParameterKind::Cifti, .. }));
  }
}
