use crate::{
    color::Color,
    error::{Error, Result},
};
use log::debug;
use std::{fmt, str::FromStr};

const ANALOGOUS_HUE_STEP: f64 = 0.05;
const COMPLEMENTARY_HUE_STEP: f64 = 0.02;

/// The color-wheel relationship a palette is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum PaletteType {
    /// The base hue with varying saturation and value.
    Monochromatic,
    /// Hues adjacent to the base hue.
    Analogous,
    /// Variations around the base hue and its opposite.
    Complementary,
    /// Three evenly spaced hues.
    Triadic,
    /// Four evenly spaced hues.
    Tetradic,
}

impl PaletteType {
    pub const ALL: [PaletteType; 5] = [
        PaletteType::Monochromatic,
        PaletteType::Analogous,
        PaletteType::Complementary,
        PaletteType::Triadic,
        PaletteType::Tetradic,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PaletteType::Monochromatic => "monochromatic",
            PaletteType::Analogous => "analogous",
            PaletteType::Complementary => "complementary",
            PaletteType::Triadic => "triadic",
            PaletteType::Tetradic => "tetradic",
        }
    }

    /// Derive `num_colors` colors from `base`. Every color is computed from the base alone, never from a previous
    /// output.
    pub fn generate(self, base: Color, num_colors: usize) -> Vec<Color> {
        let hsv = base.hsv();

        (0..num_colors)
            .map(|index| {
                let (h, s, v) = self.derive_hsv(hsv, index, num_colors);
                Color::from_hsv(h, s, v)
            })
            .collect()
    }

    fn derive_hsv(self, hsv: (f64, f64, f64), index: usize, num_colors: usize) -> (f64, f64, f64) {
        match self {
            PaletteType::Monochromatic => monochromatic(hsv, index, num_colors),
            PaletteType::Analogous => analogous(hsv, index, num_colors),
            PaletteType::Complementary => complementary(hsv, index, num_colors),
            PaletteType::Triadic => evenly_spaced(hsv, index, 3),
            PaletteType::Tetradic => evenly_spaced(hsv, index, 4),
        }
    }
}

impl FromStr for PaletteType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        PaletteType::ALL
            .into_iter()
            .find(|palette_type| palette_type.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownPaletteType(s.to_string()))
    }
}

impl fmt::Display for PaletteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Generate a palette of `num_colors` colors of the given type. The first color in `colors` is the base.
pub fn generate_palette(colors: &[Color], palette_type: PaletteType, num_colors: usize) -> Result<Vec<Color>> {
    let base = colors.first().copied().ok_or(Error::NoColors)?;
    debug!("generating {} {} colors from {}", num_colors, palette_type, base);

    Ok(palette_type.generate(base, num_colors))
}

fn monochromatic((h, s, v): (f64, f64, f64), index: usize, num_colors: usize) -> (f64, f64, f64) {
    let factor = 0.5 + index as f64 / num_colors as f64;

    (h, (s * factor).clamp(0.1, 1.0), (v * factor).clamp(0.2, 1.0))
}

fn analogous((h, s, v): (f64, f64, f64), index: usize, num_colors: usize) -> (f64, f64, f64) {
    let offset = index as f64 - (num_colors / 2) as f64;

    ((h + offset * ANALOGOUS_HUE_STEP).rem_euclid(1.0), s, v)
}

fn complementary((h, s, v): (f64, f64, f64), index: usize, num_colors: usize) -> (f64, f64, f64) {
    let half = num_colors / 2;

    // the first half varies the base hue, the second half the opposite one
    let (anchor, step) = if index < half {
        (h, index)
    } else {
        ((h + 0.5).rem_euclid(1.0), index - half)
    };

    let hue = (anchor + step as f64 * COMPLEMENTARY_HUE_STEP).rem_euclid(1.0);
    let frac = step as f64 / (num_colors * 2) as f64;

    (hue, (s * (0.7 + frac)).clamp(0.2, 1.0), (v * (0.8 + frac)).clamp(0.3, 1.0))
}

// shared by triadic (3 hues) and tetradic (4 hues) palettes
fn evenly_spaced((h, s, v): (f64, f64, f64), index: usize, hues: usize) -> (f64, f64, f64) {
    let hue = (h + (index % hues) as f64 / hues as f64).rem_euclid(1.0);
    let round = (index / hues) as f64;

    (
        hue,
        (s * (0.8 + round * 0.1)).clamp(0.3, 1.0),
        (v * (0.9 + round * 0.05)).clamp(0.4, 1.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const EPSILON: f64 = 1e-9;

    fn hues(palette_type: PaletteType, hsv: (f64, f64, f64), num_colors: usize) -> Vec<f64> {
        (0..num_colors)
            .map(|index| palette_type.derive_hsv(hsv, index, num_colors).0)
            .collect()
    }

    fn assert_close(actual: &[f64], expected: &[f64], epsilon: f64) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < epsilon, "{actual:?} != {expected:?}");
        }
    }

    #[test]
    fn empty_color_list_is_rejected() {
        for palette_type in PaletteType::ALL {
            for num_colors in [0, 1, 5] {
                let err = generate_palette(&[], palette_type, num_colors).unwrap_err();
                assert!(matches!(err, Error::NoColors));
                assert!(err.is_invalid_argument());
                assert_eq!(err.to_string(), "no colors provided");
            }
        }
    }

    #[test]
    fn unknown_type_is_rejected_by_name() {
        let err = "bogus_type".parse::<PaletteType>().unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(err.to_string(), "unknown palette type: bogus_type");
    }

    #[test]
    fn names_parse_case_insensitively() {
        for palette_type in PaletteType::ALL {
            assert_eq!(palette_type.to_string().parse::<PaletteType>().unwrap(), palette_type);
            assert_eq!(
                palette_type.name().to_uppercase().parse::<PaletteType>().unwrap(),
                palette_type
            );
        }
    }

    #[test]
    fn palette_has_requested_length() {
        let colors = [Color::new(40, 120, 200), Color::new(0, 0, 0)];
        for palette_type in PaletteType::ALL {
            for num_colors in [0, 1, 2, 5, 9] {
                assert_eq!(generate_palette(&colors, palette_type, num_colors).unwrap().len(), num_colors);
            }
        }
    }

    #[test]
    fn only_the_first_color_matters() {
        let base = Color::new(40, 120, 200);
        let one = generate_palette(&[base], PaletteType::Triadic, 6).unwrap();
        let many = generate_palette(&[base, Color::new(1, 2, 3), Color::new(250, 0, 9)], PaletteType::Triadic, 6).unwrap();

        assert_eq!(one, many);
    }

    #[test]
    fn monochromatic_keeps_hue_and_clamps() {
        let hsv = Color::new(30, 160, 90).hsv();
        let num_colors = 7;

        for index in 0..num_colors {
            let (h, s, v) = PaletteType::Monochromatic.derive_hsv(hsv, index, num_colors);
            assert_eq!(h, hsv.0);
            assert!((0.1..=1.0).contains(&s));
            assert!((0.2..=1.0).contains(&v));
        }
    }

    #[test]
    fn monochromatic_from_pure_red() {
        let palette = PaletteType::Monochromatic.generate(Color::new(255, 0, 0), 5);

        assert_eq!(palette[0], Color::new(127, 63, 63));
        // 0.5 + 4/5 pushes both factors past one, so they clamp back to the base
        assert_eq!(palette[4], Color::new(255, 0, 0));
    }

    #[test]
    fn monochromatic_clamps_dark_grays_up() {
        let (h, s, v) = PaletteType::Monochromatic.derive_hsv((0.0, 0.0, 0.0), 0, 4);

        assert_eq!((h, s, v), (0.0, 0.1, 0.2));
    }

    #[test]
    fn analogous_steps_around_the_base() {
        assert_close(
            &hues(PaletteType::Analogous, (0.5, 0.4, 0.6), 5),
            &[0.4, 0.45, 0.5, 0.55, 0.6],
            EPSILON,
        );
        assert_close(&hues(PaletteType::Analogous, (0.0, 0.4, 0.6), 4), &[0.9, 0.95, 0.0, 0.05], EPSILON);

        let (_, s, v) = PaletteType::Analogous.derive_hsv((0.5, 0.4, 0.6), 3, 5);
        assert_eq!((s, v), (0.4, 0.6));
    }

    #[test]
    fn complementary_halves() {
        let hsv = (0.1, 0.5, 0.5);
        let hues = hues(PaletteType::Complementary, hsv, 6);

        assert_close(&hues[..3], &[0.1, 0.12, 0.14], EPSILON);
        assert_close(&hues[3..], &[0.6, 0.62, 0.64], EPSILON);
        assert!((hues[3] - 0.6).abs() < 0.02);
    }

    #[test]
    fn complementary_wraps_and_adjusts() {
        let hsv = (0.8, 0.5, 0.5);
        let (h, s, v) = PaletteType::Complementary.derive_hsv(hsv, 4, 6);

        assert!((h - 0.32).abs() < EPSILON);
        // step 1 of 6: frac = 1/12
        assert!((s - 0.5 * (0.7 + 1.0 / 12.0)).abs() < EPSILON);
        assert!((v - 0.5 * (0.8 + 1.0 / 12.0)).abs() < EPSILON);

        let (_, s, v) = PaletteType::Complementary.derive_hsv((0.0, 0.1, 0.1), 0, 6);
        assert_eq!((s, v), (0.2, 0.3));
    }

    #[test]
    fn triadic_cycles_three_hues() {
        assert_close(
            &hues(PaletteType::Triadic, (0.0, 1.0, 1.0), 6),
            &[0.0, 1.0 / 3.0, 2.0 / 3.0, 0.0, 1.0 / 3.0, 2.0 / 3.0],
            1e-6,
        );

        let (_, s0, v0) = PaletteType::Triadic.derive_hsv((0.0, 0.5, 0.5), 0, 6);
        let (_, s1, v1) = PaletteType::Triadic.derive_hsv((0.0, 0.5, 0.5), 3, 6);
        assert!((s0 - 0.4).abs() < EPSILON && (v0 - 0.45).abs() < EPSILON);
        assert!((s1 - 0.45).abs() < EPSILON && (v1 - 0.475).abs() < EPSILON);
    }

    #[test]
    fn triadic_colors_from_pure_red() {
        let palette = PaletteType::Triadic.generate(Color::new(255, 0, 0), 3);

        for (color, expected_hue) in palette.iter().zip([0.0, 1.0 / 3.0, 2.0 / 3.0]) {
            let (h, _, _) = color.hsv();
            assert!((h - expected_hue).abs() < 0.01, "{color} has hue {h}");
        }
    }

    #[test]
    fn tetradic_cycles_four_hues() {
        assert_close(
            &hues(PaletteType::Tetradic, (0.6, 1.0, 1.0), 8),
            &[0.6, 0.85, 0.1, 0.35, 0.6, 0.85, 0.1, 0.35],
            EPSILON,
        );

        let (_, s, v) = PaletteType::Tetradic.derive_hsv((0.0, 0.2, 0.2), 4, 8);
        assert_eq!((s, v), (0.3, 0.4));
    }

    #[test]
    fn index_zero_stays_in_the_base_hue_family() {
        let base = Color::new(200, 80, 20);
        let (h, _, _) = base.hsv();

        for palette_type in PaletteType::ALL {
            if palette_type == PaletteType::Analogous {
                continue;
            }
            let (derived, _, _) = palette_type.derive_hsv(base.hsv(), 0, 5);
            assert!((derived - h).abs() < EPSILON, "{palette_type}");
        }
    }
}
