use crate::error::{PlyError, Result};
use crate::ply_header::FieldDecl;

/// Column indices of the semantic roles within a vertex record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldRoles {
    pub x: usize,
    pub y: usize,
    pub z: usize,
    /// `[red, green, blue]`, present only if all three resolved.
    pub color: Option<[usize; 3]>,
}

impl FieldRoles {
    pub fn position(&self) -> [usize; 3] {
        [self.x, self.y, self.z]
    }

    pub fn has_colors(&self) -> bool {
        self.color.is_some()
    }
}

/// Single pass over the declarations; a later duplicate name wins.
pub fn resolve_fields(fields: &[FieldDecl]) -> Result<FieldRoles> {
    let mut x = None;
    let mut y = None;
    let mut z = None;
    let mut r = None;
    let mut g = None;
    let mut b = None;

    for (i, f) in fields.iter().enumerate() {
        match f.name.as_str() {
            "x" => x = Some(i),
            "y" => y = Some(i),
            "z" => z = Some(i),
            "red" | "r" => r = Some(i),
            "green" | "g" => g = Some(i),
            "blue" | "b" => b = Some(i),
            _ => {}
        }
    }

    let (x, y, z) = match (x, y, z) {
        (Some(x), Some(y), Some(z)) => (x, y, z),
        _ => {
            let missing = [("x", x), ("y", y), ("z", z)]
                .into_iter()
                .filter(|(_, idx)| idx.is_none())
                .map(|(name, _)| name)
                .collect();
            return Err(PlyError::MissingGeometryFields(missing));
        }
    };

    let color = match (r, g, b) {
        (Some(r), Some(g), Some(b)) => Some([r, g, b]),
        _ => None,
    };

    log::debug!(
        "PLY property indices: x={x}, y={y}, z={z}, color={color:?} ({} properties)",
        fields.len()
    );

    Ok(FieldRoles { x, y, z, color })
}
