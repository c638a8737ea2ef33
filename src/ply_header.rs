use std::borrow::Cow;

use serde::Serialize;

use crate::error::{PlyError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlyFormat {
    Ascii,
    BinaryLittleEndian,
    BinaryBigEndian,
}

impl PlyFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlyFormat::Ascii => "ascii",
            PlyFormat::BinaryLittleEndian => "binary_little_endian",
            PlyFormat::BinaryBigEndian => "binary_big_endian",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "ascii" => Some(PlyFormat::Ascii),
            "binary_little_endian" => Some(PlyFormat::BinaryLittleEndian),
            "binary_big_endian" => Some(PlyFormat::BinaryBigEndian),
            _ => None,
        }
    }
}

/// Scalar property types a vertex record may carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlyScalarType {
    Char,
    UChar,
    Short,
    UShort,
    Int,
    UInt,
    Float,
    Double,
}

impl PlyScalarType {
    /// Accepts both the classic names (`uchar`, `float`) and the sized
    /// aliases (`uint8`, `float32`).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "char" | "int8" => Some(Self::Char),
            "uchar" | "uint8" => Some(Self::UChar),
            "short" | "int16" => Some(Self::Short),
            "ushort" | "uint16" => Some(Self::UShort),
            "int" | "int32" => Some(Self::Int),
            "uint" | "uint32" => Some(Self::UInt),
            "float" | "float32" => Some(Self::Float),
            "double" | "float64" => Some(Self::Double),
            _ => None,
        }
    }

    pub fn size_bytes(&self) -> usize {
        match self {
            PlyScalarType::Char | PlyScalarType::UChar => 1,
            PlyScalarType::Short | PlyScalarType::UShort => 2,
            PlyScalarType::Int | PlyScalarType::UInt | PlyScalarType::Float => 4,
            PlyScalarType::Double => 8,
        }
    }
}

/// One `property <type> <name>` line of the vertex element.
///
/// `ty` is `None` when the type name is outside the known vocabulary. The
/// ascii decoder never looks at types, so such a file can still be read as
/// text; the binary decoder refuses it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: String,
    pub type_name: String,
    pub ty: Option<PlyScalarType>,
}

#[derive(Clone, Debug)]
pub struct PlyHeader {
    pub format: PlyFormat,
    pub vertex_count: usize,
    pub fields: Vec<FieldDecl>,
    /// Byte offset of the first body byte, just past `end_header`.
    pub data_offset: usize,
}

impl PlyHeader {
    pub fn body<'a>(&self, bytes: &'a [u8]) -> &'a [u8] {
        &bytes[self.data_offset.min(bytes.len())..]
    }
}

fn find_header_end(bytes: &[u8]) -> Result<usize> {
    const PAT: &[u8] = b"end_header";
    if bytes.len() < PAT.len() {
        return Err(PlyError::header("can't find end_header"));
    }
    for i in 0..=(bytes.len() - PAT.len()) {
        if &bytes[i..i + PAT.len()] != PAT {
            continue;
        }
        // Only a line consisting of the keyword ends the header.
        if i > 0 && bytes[i - 1] != b'\n' {
            continue;
        }
        let k = i + PAT.len();
        if k < bytes.len() && bytes[k] == b'\n' {
            return Ok(k + 1);
        }
        if k + 1 < bytes.len() && bytes[k] == b'\r' && bytes[k + 1] == b'\n' {
            return Ok(k + 2);
        }
    }
    Err(PlyError::header("can't find end_header"))
}

/// Strict UTF-8 first, then Latin-1 so every header byte maps to a char.
fn decode_header_text(bytes: &[u8]) -> Cow<'_, str> {
    match core::str::from_utf8(bytes) {
        Ok(s) => Cow::Borrowed(s),
        Err(_) => Cow::Owned(bytes.iter().map(|&b| b as char).collect()),
    }
}

pub fn parse_header(bytes: &[u8]) -> Result<PlyHeader> {
    let header_end = find_header_end(bytes)?;
    let header_text = decode_header_text(&bytes[..header_end]);

    let mut format: Option<PlyFormat> = None;
    let mut vertex_count: Option<usize> = None;
    let mut fields: Vec<FieldDecl> = Vec::new();
    let mut in_vertex = false;
    let mut records_before_vertex = false;

    for line in header_text.split('\n').map(str::trim) {
        if line.is_empty() || line == "end_header" {
            continue;
        }
        let mut it = line.split_whitespace();
        let tag = it.next().unwrap_or("");

        match tag {
            "format" => {
                let fmt = it.next().unwrap_or("");
                let f = PlyFormat::parse(fmt)
                    .ok_or_else(|| PlyError::header(format!("unsupported format {fmt:?}")))?;
                format = Some(f);
            }
            "element" => {
                let name = it.next().ok_or_else(|| PlyError::header("bad element line"))?;
                let count_str = it
                    .next()
                    .ok_or_else(|| PlyError::header(format!("element {name:?} has no count")))?;
                let count: usize = count_str.parse().map_err(|_| {
                    PlyError::header(format!("bad count {count_str:?} for element {name:?}"))
                })?;

                if name == "vertex" {
                    if vertex_count.is_some() {
                        return Err(PlyError::header("duplicate vertex element"));
                    }
                    if records_before_vertex {
                        return Err(PlyError::header(
                            "vertex element must precede every non-empty element",
                        ));
                    }
                    vertex_count = Some(count);
                    in_vertex = true;
                } else {
                    if vertex_count.is_none() && count > 0 {
                        records_before_vertex = true;
                    }
                    in_vertex = false;
                }
            }
            "property" if in_vertex => {
                let t1 = it.next().ok_or_else(|| PlyError::header("bad property line"))?;
                if t1 == "list" {
                    return Err(PlyError::header(
                        "list properties on the vertex element are not supported",
                    ));
                }
                let name = it
                    .next()
                    .ok_or_else(|| PlyError::header(format!("property of type {t1:?} has no name")))?;
                fields.push(FieldDecl {
                    name: name.to_string(),
                    type_name: t1.to_string(),
                    ty: PlyScalarType::parse(t1),
                });
            }
            // "ply", comments, obj_info, properties of other elements and
            // unknown directives carry nothing we need.
            _ => {}
        }
    }

    let vertex_count = vertex_count.unwrap_or(0);
    if vertex_count == 0 {
        return Err(PlyError::header("no vertices declared"));
    }
    if fields.is_empty() {
        return Err(PlyError::header("vertex element declares no properties"));
    }

    let format = format.unwrap_or(PlyFormat::Ascii);
    log::debug!(
        "PLY header: format={}, vertices={}, properties={:?}",
        format.as_str(),
        vertex_count,
        fields.iter().map(|f| f.name.as_str()).collect::<Vec<_>>()
    );

    Ok(PlyHeader {
        format,
        vertex_count,
        fields,
        data_offset: header_end,
    })
}
