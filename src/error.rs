use thiserror::Error;

/// Fatal parse failures. Per-record problems never surface here; they are
/// counted in [`crate::ParseStats`] instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlyError {
    #[error("PLY: malformed header: {0}")]
    MalformedHeader(String),

    #[error("PLY: vertex element must contain x, y, z (missing: {})", .0.join(", "))]
    MissingGeometryFields(Vec<&'static str>),

    #[error("PLY: unsupported property type {type_name:?} for property {name:?}")]
    UnsupportedFieldType { name: String, type_name: String },

    #[error("PLY: no valid vertices found")]
    NoValidVertices,

    #[error("PLY: all {dropped} vertices lie outside +/-{max_coord}")]
    AllVerticesFiltered { dropped: usize, max_coord: f64 },

    #[error("PLY: {0} vertices exceed the u32 output count")]
    TooManyVertices(usize),

    #[error("PLY: invalid options: {0}")]
    InvalidOptions(String),
}

impl PlyError {
    pub(crate) fn header(msg: impl Into<String>) -> Self {
        PlyError::MalformedHeader(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, PlyError>;
