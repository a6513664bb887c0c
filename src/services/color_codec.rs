// Color Codec
// Hex <-> HSL conversion for CSS variable storage

use std::sync::OnceLock;

use regex::Regex;

/// Foreground used on dark primaries
pub const LIGHT_FOREGROUND: &str = "0 0% 100%";
/// Foreground used on light primaries
pub const DARK_FOREGROUND: &str = "222.2 84% 4.9%";

const FOREGROUND_LIGHTNESS_THRESHOLD: f64 = 0.55;
const HSL_STRING_PATTERN: &str = r"^(\d+(?:\.\d+)?)\s+(\d+(?:\.\d+)?)%\s+(\d+(?:\.\d+)?)%$";

static HSL_STRING_REGEX: OnceLock<Regex> = OnceLock::new();

/// HSL with every component as a fraction in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

/// Parse `#rrggbb`, `rrggbb`, `#rgb` or `rgb`.
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let trimmed = hex.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let expanded = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect::<String>(),
        6 => digits.to_string(),
        _ => return None,
    };

    let r = u8::from_str_radix(&expanded[0..2], 16).ok()?;
    let g = u8::from_str_radix(&expanded[2..4], 16).ok()?;
    let b = u8::from_str_radix(&expanded[4..6], 16).ok()?;
    Some((r, g, b))
}

pub fn hex_to_hsl(hex: &str) -> Option<Hsl> {
    let (r, g, b) = hex_to_rgb(hex)?;
    Some(rgb_to_hsl(r, g, b))
}

fn rgb_to_hsl(r: u8, g: u8, b: u8) -> Hsl {
    let r = f64::from(r) / 255.0;
    let g = f64::from(g) / 255.0;
    let b = f64::from(b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return Hsl { h: 0.0, s: 0.0, l };
    }

    let d = max - min;
    let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    Hsl { h: h / 6.0, s, l }
}

/// Encode a hex color as `"H S% L%"`.
///
/// Components keep one decimal place; whole numbers print without a fraction.
/// Whole-degree/whole-percent strings would be shorter but cannot decode back
/// to within one step per channel for every color, one decimal can.
pub fn hex_to_hsl_string(hex: &str) -> Option<String> {
    let Hsl { h, s, l } = hex_to_hsl(hex)?;
    let mut hue = round_tenth(h * 360.0);
    if hue >= 360.0 {
        hue -= 360.0;
    }
    Some(format!(
        "{} {}% {}%",
        format_component(hue),
        format_component(round_tenth(s * 100.0)),
        format_component(round_tenth(l * 100.0))
    ))
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn format_component(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value:.1}")
    }
}

/// `h` in degrees, `s` and `l` in percent.
pub fn hsl_to_hex(h: f64, s: f64, l: f64) -> String {
    let s = s / 100.0;
    let l = l / 100.0;
    let k = |n: f64| (n + h / 30.0) % 12.0;
    let a = s * l.min(1.0 - l);
    let f = |n: f64| l - a * (-1.0f64).max((k(n) - 3.0).min((9.0 - k(n)).min(1.0)));
    let to_hex = |x: f64| (x * 255.0).round().clamp(0.0, 255.0) as u8;
    format!("#{:02x}{:02x}{:02x}", to_hex(f(0.0)), to_hex(f(8.0)), to_hex(f(4.0)))
}

/// Parse `"H S% L%"` into degrees and percentages.
pub fn parse_hsl_string(value: &str) -> Option<(f64, f64, f64)> {
    let regex = HSL_STRING_REGEX.get_or_init(|| Regex::new(HSL_STRING_PATTERN).expect("valid HSL pattern"));
    let captures = regex.captures(value.trim())?;
    let h = captures.get(1)?.as_str().parse::<f64>().ok()?;
    let s = captures.get(2)?.as_str().parse::<f64>().ok()?;
    let l = captures.get(3)?.as_str().parse::<f64>().ok()?;
    Some((h, s, l))
}

/// Decode `"H S% L%"` to `#rrggbb`; `None` when the string is malformed.
pub fn hsl_string_to_hex(value: &str) -> Option<String> {
    let (h, s, l) = parse_hsl_string(value)?;
    Some(hsl_to_hex(h, s, l))
}

/// Foreground token for text drawn on a primary of the given lightness (fraction).
pub fn contrast_foreground(lightness: f64) -> &'static str {
    if lightness < FOREGROUND_LIGHTNESS_THRESHOLD {
        LIGHT_FOREGROUND
    } else {
        DARK_FOREGROUND
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel_distance(a: &str, b: &str) -> u8 {
        let (ar, ag, ab) = hex_to_rgb(a).unwrap();
        let (br, bg, bb) = hex_to_rgb(b).unwrap();
        ar.abs_diff(br).max(ag.abs_diff(bg)).max(ab.abs_diff(bb))
    }

    #[test]
    fn test_round_trip_stays_within_one_unit() {
        for r in (0..=255u16).step_by(15) {
            for g in (0..=255u16).step_by(15) {
                for b in (0..=255u16).step_by(15) {
                    let hex = format!("#{:02x}{:02x}{:02x}", r, g, b);
                    let encoded = hex_to_hsl_string(&hex).unwrap();
                    let decoded = hsl_string_to_hex(&encoded).unwrap();
                    assert!(
                        channel_distance(&hex, &decoded) <= 1,
                        "{hex} -> {encoded} -> {decoded}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_brand_colors_round_trip() {
        for hex in ["#00563B", "#E21836", "#4f46e5", "#ffffff", "#000000", "#7f7f7f"] {
            let decoded = hsl_string_to_hex(&hex_to_hsl_string(hex).unwrap()).unwrap();
            assert!(channel_distance(hex, &decoded) <= 1, "{hex} -> {decoded}");
        }
    }

    #[test]
    fn test_shorthand_expands_digits() {
        assert_eq!(hex_to_rgb("#f0a"), Some((0xff, 0x00, 0xaa)));
        assert_eq!(hex_to_rgb("abc"), hex_to_rgb("#aabbcc"));
    }

    #[test]
    fn test_rejects_malformed_hex() {
        assert_eq!(hex_to_rgb(""), None);
        assert_eq!(hex_to_rgb("#12345"), None);
        assert_eq!(hex_to_rgb("#gggggg"), None);
        assert_eq!(hex_to_rgb("#+12345"), None);
        assert_eq!(hex_to_rgb("##fff"), None);
        assert_eq!(hex_to_rgb("#"), None);
        assert!(hex_to_hsl_string("not a color").is_none());
    }

    #[test]
    fn test_known_encodings() {
        assert_eq!(hex_to_hsl_string("#000000").as_deref(), Some("0 0% 0%"));
        assert_eq!(hex_to_hsl_string("#ffffff").as_deref(), Some("0 0% 100%"));
        assert_eq!(hex_to_hsl_string("#ff0000").as_deref(), Some("0 100% 50%"));
        assert_eq!(hex_to_hsl_string("#00ff00").as_deref(), Some("120 100% 50%"));
    }

    #[test]
    fn test_malformed_hsl_fails_soft() {
        assert_eq!(hsl_string_to_hex(""), None);
        assert_eq!(hsl_string_to_hex("red"), None);
        assert_eq!(hsl_string_to_hex("10 20 30"), None);
        assert_eq!(hsl_string_to_hex("10 20% 30% 40%"), None);
    }

    #[test]
    fn test_decimal_hsl_accepted() {
        assert_eq!(
            parse_hsl_string(" 221.2 83.2% 53.3% "),
            Some((221.2, 83.2, 53.3))
        );
        assert_eq!(hsl_string_to_hex("0 0% 100%").as_deref(), Some("#ffffff"));
    }

    #[test]
    fn test_contrast_threshold() {
        assert_eq!(contrast_foreground(0.2), LIGHT_FOREGROUND);
        assert_eq!(contrast_foreground(0.549), LIGHT_FOREGROUND);
        assert_eq!(contrast_foreground(0.55), DARK_FOREGROUND);
        assert_eq!(contrast_foreground(0.9), DARK_FOREGROUND);
    }
}
