use serde::Deserialize;

use crate::foundation::core::Rgb8;

impl<'de> Deserialize<'de> for Rgb8 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            RgbObj { r: i64, g: i64, b: i64 },
            Arr(Vec<i64>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => parse_hex(&s).map_err(serde::de::Error::custom),
            Repr::RgbObj { r, g, b } => from_channels(&[r, g, b]).map_err(serde::de::Error::custom),
            Repr::Arr(v) => {
                if v.len() != 3 {
                    return Err(serde::de::Error::custom(
                        "rgb array must have len 3 ([r,g,b])",
                    ));
                }
                from_channels(&v).map_err(serde::de::Error::custom)
            }
        }
    }
}

fn from_channels(v: &[i64]) -> Result<Rgb8, String> {
    let ch = |x: i64| -> Result<u8, String> {
        u8::try_from(x).map_err(|_| format!("rgb channel {x} out of range 0..=255"))
    };
    Ok(Rgb8::new(ch(v[0])?, ch(v[1])?, ch(v[2])?))
}

fn parse_hex(s: &str) -> Result<Rgb8, String> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);
    if s.len() != 6 || !s.is_ascii() {
        return Err("hex color must be #RRGGBB (case-insensitive)".to_owned());
    }

    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    Ok(Rgb8::new(
        hex_byte(&s[0..2])?,
        hex_byte(&s[2..4])?,
        hex_byte(&s[4..6])?,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/color.rs"]
mod tests;
