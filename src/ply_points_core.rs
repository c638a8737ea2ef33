use serde::Serialize;

use crate::bounds::{filter_and_normalize, NormalizeTransform};
use crate::error::{PlyError, Result};
use crate::options::ParseOptions;
use crate::ply_ascii::decode_ascii;
use crate::ply_binary::decode_binary;
use crate::ply_fields::resolve_fields;
use crate::ply_header::{parse_header, PlyFormat};

/// Where the declared vertices went.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ParseStats {
    pub declared: usize,
    pub decoded: usize,
    pub rejected: usize,
    pub colors_defaulted: usize,
    pub filtered: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PointCloudBuffersCore {
    pub count: u32,
    pub format: PlyFormat,
    pub positions: Box<[f32]>, // 3N
    pub colors: Box<[f32]>,    // 3N, each in [0, 1]
    pub bbox_min: [f32; 3],
    pub bbox_max: [f32; 3],
    pub transform: NormalizeTransform,
    pub stats: ParseStats,
}

impl PointCloudBuffersCore {
    pub fn position(&self, i: usize) -> [f32; 3] {
        let v3 = i * 3;
        [self.positions[v3], self.positions[v3 + 1], self.positions[v3 + 2]]
    }

    pub fn color(&self, i: usize) -> [f32; 3] {
        let v3 = i * 3;
        [self.colors[v3], self.colors[v3 + 1], self.colors[v3 + 2]]
    }
}

fn output_count(n: usize) -> Result<u32> {
    u32::try_from(n).map_err(|_| PlyError::TooManyVertices(n))
}

pub fn parse_point_cloud_core(bytes: &[u8]) -> Result<PointCloudBuffersCore> {
    parse_point_cloud_core_with_opts(bytes, &ParseOptions::default())
}

pub fn parse_point_cloud_core_with_opts(
    bytes: &[u8],
    opts: &ParseOptions,
) -> Result<PointCloudBuffersCore> {
    opts.validate()?;

    let header = parse_header(bytes)?;
    let roles = resolve_fields(&header.fields)?;
    let body = header.body(bytes);

    let batch = match header.format {
        PlyFormat::Ascii => decode_ascii(body, header.vertex_count, &header.fields, &roles)?,
        PlyFormat::BinaryLittleEndian | PlyFormat::BinaryBigEndian => {
            let little = header.format == PlyFormat::BinaryLittleEndian;
            decode_binary(body, header.vertex_count, &header.fields, &roles, little)?
        }
    };

    let points = filter_and_normalize(&batch, opts)?;
    let stats = ParseStats {
        declared: header.vertex_count,
        decoded: batch.len(),
        rejected: batch.rejected,
        colors_defaulted: batch.colors_defaulted,
        filtered: points.filtered,
    };
    log::debug!("PLY: parsed {} vertices ({:?})", points.len(), stats);

    Ok(PointCloudBuffersCore {
        count: output_count(points.len())?,
        format: header.format,
        positions: points.positions.into_boxed_slice(),
        colors: points.colors.into_boxed_slice(),
        bbox_min: points.bbox_min,
        bbox_max: points.bbox_max,
        transform: points.transform,
        stats,
    })
}
