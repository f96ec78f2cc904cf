//! RGBA color encoding for print symbolizers.
//!
//! The print service expects `#RRGGBBAA` where the last two characters are not
//! an alpha byte: they are the decimal digits of the alpha fraction followed by
//! a `0`. `0.5` becomes `50`, `0.25` becomes `250`. Consumers rely on this
//! exact rendering, so it must not be "corrected" to a 0-255 byte.

use serde::{Deserialize, Serialize};

/// Color as `[r, g, b, a]` with 0-255 channels and a 0.0-1.0 alpha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba(pub u8, pub u8, pub u8, pub f64);

impl Rgba {
    pub fn to_hex(self) -> String {
        to_hex(self.0, self.1, self.2, self.3)
    }
}

/// Encode a color in the print service's `#RRGGBBAA` convention.
pub fn to_hex(r: u8, g: u8, b: u8, a: f64) -> String {
    format!("#{}{}", hex::encode([r, g, b]), alpha_digits(a))
}

fn alpha_digits(a: f64) -> String {
    let rendered = a.to_string();
    let fraction = rendered.split_once('.').map_or("", |(_, digits)| digits);
    format!("{:0>2}", format!("{fraction}0"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_are_zero_padded_lowercase() {
        assert_eq!(to_hex(0, 10, 255, 0.5), "#000aff50");
        assert_eq!(to_hex(171, 205, 239, 0.7), "#abcdef70");
    }

    #[test]
    fn alpha_keeps_every_fraction_digit() {
        assert_eq!(to_hex(1, 2, 3, 0.25), "#010203250");
    }

    #[test]
    fn alpha_without_fraction_pads_to_two_digits() {
        assert_eq!(to_hex(255, 255, 255, 1.0), "#ffffff00");
        assert_eq!(to_hex(0, 0, 0, 0.0), "#00000000");
    }

    #[test]
    fn single_digit_fractions_match_eight_digit_shape() {
        for r in [0_u8, 7, 16, 128, 255] {
            for tenth in 1..10 {
                let a = f64::from(tenth) / 10.0;
                let encoded = to_hex(r, 255 - r, r / 2, a);
                assert_eq!(encoded.len(), 9, "{encoded}");
                assert!(encoded.starts_with('#'));
                assert!(
                    encoded[1..]
                        .chars()
                        .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)),
                    "{encoded}"
                );
                assert_eq!(&encoded[1..7], hex::encode([r, 255 - r, r / 2]));
            }
        }
    }

    #[test]
    fn rgba_deserializes_from_array() {
        let color: Rgba = serde_json::from_str("[255, 0, 0, 0.4]").expect("color");
        assert_eq!(color.to_hex(), "#ff000040");
    }
}
