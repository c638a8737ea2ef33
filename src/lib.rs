//! Point cloud extraction from PLY files.
//!
//! [`parse_point_cloud_core`] takes the whole file as bytes and returns flat
//! position and colour buffers, filtered to a coordinate threshold and
//! normalized into an origin-centered cube. Structural problems (header,
//! missing x/y/z, undecodable binary layout) fail the parse; noisy
//! individual records are skipped and counted.

pub mod bounds;
pub mod color;
pub mod error;
pub mod options;
pub mod ply_ascii;
pub mod ply_binary;
pub mod ply_fields;
pub mod ply_header;
pub mod ply_points_core;
pub mod vertex_batch;

#[cfg(target_arch = "wasm32")]
mod ply_points_wasm;

pub use bounds::{filter_and_normalize, NormalizeTransform, NormalizedPoints};
pub use color::{normalize_color, DEFAULT_COLOR};
pub use error::{PlyError, Result};
pub use options::ParseOptions;
pub use ply_ascii::decode_ascii;
pub use ply_binary::decode_binary;
pub use ply_fields::{resolve_fields, FieldRoles};
pub use ply_header::{parse_header, FieldDecl, PlyFormat, PlyHeader, PlyScalarType};
pub use ply_points_core::{
    parse_point_cloud_core, parse_point_cloud_core_with_opts, ParseStats, PointCloudBuffersCore,
};
pub use vertex_batch::{RawVertexBatch, Rejection};

#[cfg(target_arch = "wasm32")]
pub use ply_points_wasm::{parse_point_cloud, parse_point_cloud_with_opts, PointCloudBuffers};
