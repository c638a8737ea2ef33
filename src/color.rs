/// Light blue used when a file carries no colour, or a record's colour is not
/// finite.
pub const DEFAULT_COLOR: [f32; 3] = [0.7, 0.8, 1.0];

/// Maps a colour triple into `[0, 1]`.
///
/// The 0-255 rescale is decided per triple: if any component exceeds 1.0 all
/// three are divided by 255. Files that mix conventions across records are
/// therefore normalized record by record. NaN components map to 0.
pub fn normalize_color(rgb: [f64; 3]) -> [f32; 3] {
    let divisor = if rgb.iter().any(|&c| c > 1.0) { 255.0 } else { 1.0 };
    rgb.map(|c| {
        let v = c / divisor;
        if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) as f32 }
    })
}

/// Normalized colour, or `None` when any component is not finite.
pub(crate) fn checked_color(rgb: [f64; 3]) -> Option<[f32; 3]> {
    if rgb.iter().all(|c| c.is_finite()) {
        Some(normalize_color(rgb))
    } else {
        None
    }
}
