/// ColorBrewer "Set2" qualitative palette, used for chart series.
pub const SET2: [&str; 8] = [
    "#66c2a5", "#fc8d62", "#8da0cb", "#e78ac3", "#a6d854", "#ffd92f", "#e5c494", "#b3b3b3",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLUE: Rgb = Rgb(0, 0, 255);
    pub const RED: Rgb = Rgb(255, 0, 0);

    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Linear RGB interpolation; `t` is clamped to [0, 1].
pub fn interpolate(from: Rgb, to: Rgb, t: f64) -> Rgb {
    let t = if t.is_nan() { 0.5 } else { t.clamp(0.0, 1.0) };
    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    Rgb(lerp(from.0, to.0), lerp(from.1, to.1), lerp(from.2, to.2))
}

/// Colour for a parameter value: -1 maps to blue, +1 to red, 0 to the
/// midpoint. Values outside [-1, 1] saturate.
pub fn parameter_colour(value: f64) -> String {
    interpolate(Rgb::BLUE, Rgb::RED, (value + 1.0) / 2.0).hex()
}

/// Colour for a bias: the raw value interpolates blue (0) to red (1), so
/// zero biases draw blue and negative ones saturate.
pub fn bias_colour(value: f64) -> String {
    interpolate(Rgb::BLUE, Rgb::RED, value).hex()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_and_midpoint() {
        assert_eq!(parameter_colour(-1.0), "#0000ff");
        assert_eq!(parameter_colour(1.0), "#ff0000");
        assert_eq!(parameter_colour(0.0), "#800080");
    }

    #[test]
    fn bias_colour_uses_the_raw_value() {
        assert_eq!(bias_colour(0.0), "#0000ff");
        assert_eq!(bias_colour(0.5), "#800080");
        assert_eq!(bias_colour(1.0), "#ff0000");
        assert_eq!(bias_colour(-0.4), "#0000ff");
    }

    #[test]
    fn saturates_out_of_range() {
        assert_eq!(parameter_colour(-7.0), "#0000ff");
        assert_eq!(parameter_colour(3.5), "#ff0000");
    }
}
