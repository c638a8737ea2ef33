use crate::error::{PlyError, Result};
use crate::ply_fields::FieldRoles;
use crate::ply_header::{FieldDecl, PlyScalarType};
use crate::vertex_batch::{assemble_vertex, RawVertexBatch};

/// Byte layout of one fixed-width vertex record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordLayout {
    pub offsets: Vec<usize>,
    pub types: Vec<PlyScalarType>,
    pub stride: usize,
}

impl RecordLayout {
    /// Fails on the first property whose type has no known width.
    pub fn new(fields: &[FieldDecl]) -> Result<Self> {
        let mut offsets: Vec<usize> = Vec::with_capacity(fields.len());
        let mut types: Vec<PlyScalarType> = Vec::with_capacity(fields.len());
        let mut stride: usize = 0;
        for f in fields {
            let ty = f.ty.ok_or_else(|| PlyError::UnsupportedFieldType {
                name: f.name.clone(),
                type_name: f.type_name.clone(),
            })?;
            offsets.push(stride);
            types.push(ty);
            stride += ty.size_bytes();
        }
        Ok(Self {
            offsets,
            types,
            stride,
        })
    }
}

/// Decodes one scalar. `record` must hold at least `offset + ty.size_bytes()`
/// bytes.
pub fn read_scalar(record: &[u8], offset: usize, ty: PlyScalarType, little: bool) -> f64 {
    let b = &record[offset..offset + ty.size_bytes()];
    match ty {
        PlyScalarType::Char => i8::from_ne_bytes([b[0]]) as f64,
        PlyScalarType::UChar => b[0] as f64,
        PlyScalarType::Short => {
            let arr = [b[0], b[1]];
            let n = if little { i16::from_le_bytes(arr) } else { i16::from_be_bytes(arr) };
            n as f64
        }
        PlyScalarType::UShort => {
            let arr = [b[0], b[1]];
            let n = if little { u16::from_le_bytes(arr) } else { u16::from_be_bytes(arr) };
            n as f64
        }
        PlyScalarType::Int => {
            let arr = [b[0], b[1], b[2], b[3]];
            let n = if little { i32::from_le_bytes(arr) } else { i32::from_be_bytes(arr) };
            n as f64
        }
        PlyScalarType::UInt => {
            let arr = [b[0], b[1], b[2], b[3]];
            let n = if little { u32::from_le_bytes(arr) } else { u32::from_be_bytes(arr) };
            n as f64
        }
        PlyScalarType::Float => {
            let arr = [b[0], b[1], b[2], b[3]];
            let n = if little { f32::from_le_bytes(arr) } else { f32::from_be_bytes(arr) };
            n as f64
        }
        PlyScalarType::Double => {
            let arr = [b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]];
            if little { f64::from_le_bytes(arr) } else { f64::from_be_bytes(arr) }
        }
    }
}

/// Decodes fixed-width vertex records. A body shorter than
/// `vertex_count * stride` yields only the complete records it holds.
pub fn decode_binary(
    body: &[u8],
    vertex_count: usize,
    fields: &[FieldDecl],
    roles: &FieldRoles,
    little: bool,
) -> Result<RawVertexBatch> {
    let layout = RecordLayout::new(fields)?;
    let available = if layout.stride == 0 { 0 } else { body.len() / layout.stride };
    let n = vertex_count.min(available);
    if n < vertex_count {
        log::warn!(
            "PLY: binary body holds {} of {} declared vertices ({} bytes, stride {})",
            n,
            vertex_count,
            body.len(),
            layout.stride
        );
    }

    let mut batch = RawVertexBatch::with_capacity(n);
    for record in body.chunks_exact(layout.stride.max(1)).take(n) {
        batch.push(assemble_vertex(roles, |idx| {
            Ok(read_scalar(record, layout.offsets[idx], layout.types[idx], little))
        }));
    }

    batch.finish(vertex_count)
}
