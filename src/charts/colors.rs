//! Color scales shared by the interactive and static charts.

/// Line colors, cycled per category.
pub const PALETTE: [(u8, u8, u8); 10] = [
    (52, 152, 219),  // Blue
    (231, 76, 60),   // Red
    (46, 204, 113),  // Green
    (155, 89, 182),  // Purple
    (243, 156, 18),  // Orange
    (26, 188, 156),  // Teal
    (233, 30, 99),   // Pink
    (0, 188, 212),   // Cyan
    (121, 85, 72),   // Brown
    (96, 125, 139),  // Blue Grey
];

// Viridis control points, evenly spaced over [0, 1]
const VIRIDIS: [(u8, u8, u8); 9] = [
    (68, 1, 84),
    (71, 44, 122),
    (59, 81, 139),
    (44, 113, 142),
    (33, 144, 141),
    (39, 173, 129),
    (92, 200, 99),
    (170, 220, 50),
    (253, 231, 37),
];

pub fn series_color(index: usize) -> (u8, u8, u8) {
    PALETTE[index % PALETTE.len()]
}

/// Viridis color for `t` in [0, 1]; values outside are clamped.
pub fn viridis(t: f64) -> (u8, u8, u8) {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let scaled = t * (VIRIDIS.len() - 1) as f64;
    let idx = (scaled.floor() as usize).min(VIRIDIS.len() - 2);
    let frac = scaled - idx as f64;

    let (r0, g0, b0) = VIRIDIS[idx];
    let (r1, g1, b1) = VIRIDIS[idx + 1];
    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
    (lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
}

/// Position of `value` within `[min, max]`, 1.0 when the range is empty.
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    if max > min {
        (value - min) / (max - min)
    } else {
        1.0
    }
}

/// Marker radius growing with the square root of volume, so area tracks volume.
pub fn bubble_radius(value: f64, max: f64, min_radius: f32, max_radius: f32) -> f32 {
    if max <= 0.0 || value <= 0.0 {
        return min_radius;
    }
    let share = (value / max).sqrt().min(1.0) as f32;
    min_radius + (max_radius - min_radius) * share
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viridis_endpoints() {
        assert_eq!(viridis(0.0), (68, 1, 84));
        assert_eq!(viridis(1.0), (253, 231, 37));
        assert_eq!(viridis(-3.0), viridis(0.0));
        assert_eq!(viridis(7.0), viridis(1.0));
    }

    #[test]
    fn normalize_handles_flat_range() {
        assert_eq!(normalize(5.0, 0.0, 10.0), 0.5);
        assert_eq!(normalize(5.0, 5.0, 5.0), 1.0);
    }

    #[test]
    fn bubble_radius_is_bounded() {
        assert_eq!(bubble_radius(0.0, 100.0, 4.0, 25.0), 4.0);
        assert_eq!(bubble_radius(100.0, 100.0, 4.0, 25.0), 25.0);
        let quarter = bubble_radius(25.0, 100.0, 4.0, 25.0);
        assert!((quarter - 14.5).abs() < 1e-4);
    }
}
