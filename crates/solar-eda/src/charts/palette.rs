//! Colors and continuous color scales used by the renderers.

use plotters::style::RGBColor;

/// Categorical cycle for one-line-per-group charts.
pub const TAB10: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

pub const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);
pub const STEEL_BLUE: RGBColor = RGBColor(70, 130, 180);
pub const LIGHT_BLUE: RGBColor = RGBColor(173, 216, 230);
pub const LIGHT_CORAL: RGBColor = RGBColor(240, 128, 128);
pub const LIGHT_GREEN: RGBColor = RGBColor(144, 238, 144);
pub const PURE_BLUE: RGBColor = RGBColor(0, 0, 255);
pub const PURE_RED: RGBColor = RGBColor(255, 0, 0);
pub const DARK_GREEN: RGBColor = RGBColor(0, 128, 0);
pub const GRID_GRAY: RGBColor = RGBColor(200, 200, 200);
pub const MISSING_GRAY: RGBColor = RGBColor(230, 230, 230);

/// Color `i` of the categorical cycle, wrapping around.
pub fn categorical(i: usize) -> RGBColor {
    TAB10[i % TAB10.len()]
}

const VIRIDIS_STOPS: [(u8, u8, u8); 5] = [
    (68, 1, 84),
    (59, 82, 139),
    (33, 145, 140),
    (94, 201, 98),
    (253, 231, 37),
];

const COOLWARM_STOPS: [(u8, u8, u8); 3] = [(59, 76, 192), (221, 221, 221), (180, 4, 38)];

/// Sequential scale, `t` in `[0, 1]`.
pub fn viridis(t: f64) -> RGBColor {
    interpolate(&VIRIDIS_STOPS, t)
}

/// Diverging scale, `t` in `[0, 1]` with 0.5 neutral.
pub fn coolwarm(t: f64) -> RGBColor {
    interpolate(&COOLWARM_STOPS, t)
}

/// Map `value` from `[lo, hi]` onto `[0, 1]`. A flat range maps to 0.5.
pub fn normalize(value: f64, lo: f64, hi: f64) -> f64 {
    if hi > lo {
        ((value - lo) / (hi - lo)).clamp(0.0, 1.0)
    } else {
        0.5
    }
}

fn interpolate(stops: &[(u8, u8, u8)], t: f64) -> RGBColor {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.5 };
    let segments = (stops.len() - 1) as f64;
    let pos = t * segments;
    let i = (pos.floor() as usize).min(stops.len() - 2);
    let w = pos - i as f64;
    let (a, b) = (stops[i], stops[i + 1]);
    let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * w).round() as u8;
    RGBColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_endpoints() {
        assert_eq!(viridis(0.0), RGBColor(68, 1, 84));
        assert_eq!(viridis(1.0), RGBColor(253, 231, 37));
        assert_eq!(coolwarm(0.5), RGBColor(221, 221, 221));
        assert_eq!(coolwarm(-3.0), RGBColor(59, 76, 192));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(5.0, 0.0, 10.0), 0.5);
        assert_eq!(normalize(20.0, 0.0, 10.0), 1.0);
        assert_eq!(normalize(3.0, 3.0, 3.0), 0.5);
    }

    #[test]
    fn test_categorical_wraps() {
        assert_eq!(categorical(0), categorical(10));
    }
}
