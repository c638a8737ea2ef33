use crate::error::Result;
use crate::ply_fields::FieldRoles;
use crate::ply_header::FieldDecl;
use crate::vertex_batch::{assemble_vertex, DecodedVertex, RawVertexBatch, Rejection};

/// Decodes whitespace-delimited vertex lines.
///
/// Reads at most `vertex_count` lines; blank lines use up a slot. Short or
/// unparseable lines are skipped. Invalid UTF-8 in the body only spoils the
/// records it lands in.
pub fn decode_ascii(
    body: &[u8],
    vertex_count: usize,
    fields: &[FieldDecl],
    roles: &FieldRoles,
) -> Result<RawVertexBatch> {
    let text = String::from_utf8_lossy(body);
    // The declared count is untrusted; a record needs at least one byte.
    let mut batch = RawVertexBatch::with_capacity(vertex_count.min(body.len()));

    for line in text.split('\n').take(vertex_count) {
        batch.push(decode_line(line, fields.len(), roles));
    }

    batch.finish(vertex_count)
}

fn decode_line(
    line: &str,
    field_count: usize,
    roles: &FieldRoles,
) -> std::result::Result<DecodedVertex, Rejection> {
    let line = line.trim();
    if line.is_empty() {
        return Err(Rejection::Blank);
    }
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < field_count {
        return Err(Rejection::ShortRecord);
    }
    assemble_vertex(roles, |idx| {
        parts[idx].parse::<f64>().map_err(|_| Rejection::BadNumber)
    })
}
