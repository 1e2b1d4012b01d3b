//! Typed token value resolution.
//!
//! A token value is interpreted according to its `$type` discriminator and
//! converted to one of two target encodings:
//!
//! - a CSS/SCSS literal ([`css_value`]), where numbers gain a fixed `px`
//!   suffix and colors collapse to `#RRGGBB` or `rgba(...)`;
//! - a normalized [`Rgba`] color object ([`rgba`]) for the variable-sync
//!   direction, each channel in `0..1`.
//!
//! Color values come in two encodings, modeled as an explicit tagged union
//! rather than property probing: a bare hex string, or a structured object
//! carrying `components`/`alpha` and optionally a precomputed `hex`. Exactly
//! one encoding is authoritative per token; both directions accept either.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::token::{Token, TokenType};

/// Errors produced while resolving a token value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    /// A color value carries neither `components` nor `hex`.
    #[error("color value carries neither `components` nor `hex`")]
    UnsupportedValue,
    /// A hex literal is not of the form `#RRGGBB`.
    #[error("invalid hex color literal `{0}`")]
    InvalidHex(String),
    /// The value shape does not match the `$type` discriminator.
    #[error("expected a {expected} value, got `{actual}`")]
    TypeMismatch {
        expected: &'static str,
        actual: String,
    },
}

/// The two color value encodings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorValue {
    /// Bare hex string, e.g. `"#FF0000"`.
    Hex(String),
    /// Structured component form.
    Structured(StructuredColor),
}

/// Structured color form: `components` in `0..1` plus optional alpha/hex.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StructuredColor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_space: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<[f64; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hex: Option<String>,
}

/// Normalized color object for the external variable store, channels in `0..1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    /// Uppercase `#RRGGBB` form. Alpha is not representable in hex.
    pub fn hex(&self) -> String {
        format!(
            "#{:02X}{:02X}{:02X}",
            channel(self.r),
            channel(self.g),
            channel(self.b)
        )
    }
}

/// Parse a color token's value into its tagged encoding.
pub fn color_value(token: &Token) -> Result<ColorValue, ResolveError> {
    serde_json::from_value(token.value.clone()).map_err(|_| ResolveError::TypeMismatch {
        expected: "color",
        actual: token.value.to_string(),
    })
}

/// Resolve a token to its literal without the length-unit suffix.
///
/// Numbers stay unitless here; [`css_value`] appends the suffix.
pub fn raw_value(token: &Token) -> Result<String, ResolveError> {
    match token.kind {
        TokenType::Color => css_color(&color_value(token)?),
        TokenType::Number => match &token.value {
            Value::Number(n) => Ok(n.to_string()),
            other => Err(ResolveError::TypeMismatch {
                expected: "number",
                actual: other.to_string(),
            }),
        },
        TokenType::String => match &token.value {
            Value::String(s) => Ok(s.clone()),
            other => Err(ResolveError::TypeMismatch {
                expected: "string",
                actual: other.to_string(),
            }),
        },
    }
}

/// Resolve a token to a CSS/SCSS literal.
///
/// Numeric tokens gain a fixed `px` suffix; no unit conversion happens
/// anywhere else in the pipeline.
pub fn css_value(token: &Token) -> Result<String, ResolveError> {
    let raw = raw_value(token)?;
    match token.kind {
        TokenType::Number => Ok(format!("{raw}px")),
        _ => Ok(raw),
    }
}

/// Render a color encoding as a CSS literal.
///
/// A precomputed `hex` wins. Otherwise components are scaled to `0..255`
/// and rounded; alpha below 1 forces the `rgba()` form, alpha 1 (or absent)
/// the uppercase zero-padded six-digit hex form.
pub fn css_color(color: &ColorValue) -> Result<String, ResolveError> {
    match color {
        ColorValue::Hex(hex) => Ok(hex.clone()),
        ColorValue::Structured(c) => {
            if let Some(hex) = &c.hex {
                return Ok(hex.clone());
            }
            let Some([r, g, b]) = c.components else {
                return Err(ResolveError::UnsupportedValue);
            };
            let alpha = c.alpha.unwrap_or(1.0);
            let (r, g, b) = (channel(r), channel(g), channel(b));
            if alpha < 1.0 {
                Ok(format!("rgba({r}, {g}, {b}, {alpha})"))
            } else {
                Ok(format!("#{r:02X}{g:02X}{b:02X}"))
            }
        }
    }
}

/// Resolve a color token to the normalized external color object.
///
/// Components are reused directly when present (alpha defaulting to 1);
/// a hex-only token is parsed channel-pair by channel-pair. Hex never
/// carries alpha.
pub fn rgba(token: &Token) -> Result<Rgba, ResolveError> {
    match color_value(token)? {
        ColorValue::Hex(hex) => parse_hex(&hex),
        ColorValue::Structured(c) => {
            if let Some([r, g, b]) = c.components {
                Ok(Rgba {
                    r,
                    g,
                    b,
                    a: c.alpha.unwrap_or(1.0),
                })
            } else if let Some(hex) = &c.hex {
                parse_hex(hex)
            } else {
                Err(ResolveError::UnsupportedValue)
            }
        }
    }
}

/// Parse a `#RRGGBB` literal into channels in `0..1`, alpha fixed at 1.
pub fn parse_hex(hex: &str) -> Result<Rgba, ResolveError> {
    let raw = hex.trim_start_matches('#');
    if raw.len() != 6 || !raw.is_ascii() {
        return Err(ResolveError::InvalidHex(hex.to_string()));
    }
    let pair = |i: usize| {
        u8::from_str_radix(&raw[i..i + 2], 16)
            .map(|v| v as f64 / 255.0)
            .map_err(|_| ResolveError::InvalidHex(hex.to_string()))
    };
    Ok(Rgba {
        r: pair(0)?,
        g: pair(2)?,
        b: pair(4)?,
        a: 1.0,
    })
}

fn channel(c: f64) -> u8 {
    (c * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn token(kind: TokenType, value: Value) -> Token {
        Token {
            kind,
            value,
            extensions: None,
        }
    }

    #[test]
    fn full_alpha_components_resolve_to_uppercase_hex() {
        let t = token(TokenType::Color, json!({ "components": [1.0, 0.0, 0.0], "alpha": 1.0 }));
        assert_eq!(css_value(&t).unwrap(), "#FF0000");
    }

    #[test]
    fn partial_alpha_forces_rgba_form() {
        let t = token(TokenType::Color, json!({ "components": [1.0, 0.0, 0.0], "alpha": 0.5 }));
        assert_eq!(css_value(&t).unwrap(), "rgba(255, 0, 0, 0.5)");
    }

    #[test]
    fn channels_are_zero_padded() {
        let t = token(TokenType::Color, json!({ "components": [0.0, 0.05, 1.0] }));
        assert_eq!(css_value(&t).unwrap(), "#000DFF");
    }

    #[test]
    fn precomputed_hex_wins_over_components() {
        let t = token(
            TokenType::Color,
            json!({ "hex": "#ABCDEF", "components": [1.0, 1.0, 1.0] }),
        );
        assert_eq!(css_value(&t).unwrap(), "#ABCDEF");
    }

    #[test]
    fn bare_hex_string_passes_through() {
        let t = token(TokenType::Color, json!("#FFFFFF"));
        assert_eq!(css_value(&t).unwrap(), "#FFFFFF");
    }

    #[test]
    fn number_gains_px_suffix() {
        let t = token(TokenType::Number, json!(8));
        assert_eq!(css_value(&t).unwrap(), "8px");
        assert_eq!(raw_value(&t).unwrap(), "8");
    }

    #[test]
    fn fractional_number_keeps_json_form() {
        let t = token(TokenType::Number, json!(0.5));
        assert_eq!(css_value(&t).unwrap(), "0.5px");
    }

    #[test]
    fn string_passes_through_unquoted() {
        let t = token(TokenType::String, json!("Inter"));
        assert_eq!(css_value(&t).unwrap(), "Inter");
    }

    #[test]
    fn hex_round_trips_through_rgba() {
        let t = token(TokenType::Color, json!({ "hex": "#00FF00" }));
        let c = rgba(&t).unwrap();
        assert_eq!(c, Rgba { r: 0.0, g: 1.0, b: 0.0, a: 1.0 });
        assert_eq!(c.hex(), "#00FF00");
    }

    #[test]
    fn components_reused_directly_with_default_alpha() {
        let t = token(TokenType::Color, json!({ "components": [0.25, 0.5, 0.75] }));
        let c = rgba(&t).unwrap();
        assert_eq!((c.r, c.g, c.b, c.a), (0.25, 0.5, 0.75, 1.0));
    }

    #[test]
    fn color_without_encoding_is_unsupported() {
        let t = token(TokenType::Color, json!({ "colorSpace": "srgb" }));
        assert_eq!(rgba(&t), Err(ResolveError::UnsupportedValue));
        assert_eq!(
            css_color(&color_value(&t).unwrap()),
            Err(ResolveError::UnsupportedValue)
        );
    }

    #[test]
    fn bad_hex_is_rejected() {
        assert_eq!(parse_hex("#12345"), Err(ResolveError::InvalidHex("#12345".into())));
        assert_eq!(parse_hex("#GGGGGG"), Err(ResolveError::InvalidHex("#GGGGGG".into())));
    }

    #[test]
    fn shape_mismatch_is_reported() {
        let t = token(TokenType::Number, json!("eight"));
        assert!(matches!(
            raw_value(&t),
            Err(ResolveError::TypeMismatch { expected: "number", .. })
        ));
    }
}
