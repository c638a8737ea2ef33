use crate::color::{checked_color, DEFAULT_COLOR};
use crate::error::{PlyError, Result};
use crate::ply_fields::FieldRoles;

/// Why a single record produced no vertex. Never fatal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// Empty ascii line.
    Blank,
    /// Fewer values than declared properties.
    ShortRecord,
    /// A value needed for a role is not a number.
    BadNumber,
    /// x, y or z is NaN or infinite.
    NonFinitePosition,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecodedVertex {
    pub position: [f64; 3],
    pub color: [f32; 3],
    /// The record had colour fields but a non-finite value in them.
    pub color_defaulted: bool,
}

/// Pulls the role values of one record through `value` and validates them.
pub(crate) fn assemble_vertex<F>(roles: &FieldRoles, mut value: F) -> std::result::Result<DecodedVertex, Rejection>
where
    F: FnMut(usize) -> std::result::Result<f64, Rejection>,
{
    let position = [value(roles.x)?, value(roles.y)?, value(roles.z)?];
    if !position.iter().all(|c| c.is_finite()) {
        return Err(Rejection::NonFinitePosition);
    }

    let Some([ir, ig, ib]) = roles.color else {
        return Ok(DecodedVertex {
            position,
            color: DEFAULT_COLOR,
            color_defaulted: false,
        });
    };
    let rgb = [value(ir)?, value(ig)?, value(ib)?];
    let (color, color_defaulted) = match checked_color(rgb) {
        Some(c) => (c, false),
        None => (DEFAULT_COLOR, true),
    };
    Ok(DecodedVertex {
        position,
        color,
        color_defaulted,
    })
}

/// Parallel positions and colours produced by one decoder, plus the tally of
/// what it had to drop.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawVertexBatch {
    pub positions: Vec<[f64; 3]>,
    pub colors: Vec<[f32; 3]>,
    pub rejected: usize,
    pub colors_defaulted: usize,
}

impl RawVertexBatch {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            positions: Vec::with_capacity(n),
            colors: Vec::with_capacity(n),
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn push(&mut self, record: std::result::Result<DecodedVertex, Rejection>) {
        match record {
            Ok(v) => {
                self.positions.push(v.position);
                self.colors.push(v.color);
                if v.color_defaulted {
                    self.colors_defaulted += 1;
                }
            }
            Err(reason) => {
                log::trace!("PLY: record rejected: {reason:?}");
                self.rejected += 1;
            }
        }
    }

    /// Fails with `NoValidVertices` if nothing survived.
    pub(crate) fn finish(self, declared: usize) -> Result<Self> {
        if self.rejected > 0 || self.colors_defaulted > 0 {
            log::warn!(
                "PLY: {} of {} declared vertices rejected, {} colours replaced by default",
                self.rejected,
                declared,
                self.colors_defaulted
            );
        }
        if self.is_empty() {
            return Err(PlyError::NoValidVertices);
        }
        Ok(self)
    }
}
