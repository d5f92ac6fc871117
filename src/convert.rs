//! Converters for value types that come up often in command lines: scaled integers (`64k`),
//! sizes (`5kx5k`), dotted device ids (`0.1`) and areas of the complex plane (`-2 -1.5 3 3`)
//!
//! All of them report rejected input as [`ParseError::InvalidValue`], so they can be returned
//! from a [`Value`](crate::Value) converter as they are.

use crate::parser::ParseError;
use std::fmt;
use std::str::FromStr;

/// Parses an integer with an optional binary suffix: `k`/`K` multiplies by 1024, `m`/`M` by
/// 1024². The mantissa may be fractional (`1.5k`); the result is truncated toward zero and
/// saturates at the bounds of `i32`.
pub fn parse_scaled_int(value: &str) -> Result<i32, ParseError> {
    let (number, factor) = match value.chars().last() {
        Some('k' | 'K') => (&value[..value.len() - 1], 1024.0),
        Some('m' | 'M') => (&value[..value.len() - 1], 1024.0 * 1024.0),
        _ => (value, 1.0),
    };

    let number = number
        .trim()
        .parse::<f64>()
        .map_err(|_| ParseError::InvalidValue(format!("'{value}' is not a number")))?;

    Ok((number * factor) as i32)
}

/// Abbreviates `value` with a decimal `k`, `M` or `G` suffix, e.g. `2.5M` for 2 500 000
pub fn format_int(value: i64) -> String {
    let v = value as f64;

    if value >= 1_000_000_000 {
        format!("{}G", two_decimals(v / 1e9))
    } else if value >= 1_000_000 {
        format!("{}M", two_decimals(v / 1e6))
    } else if value >= 1000 {
        format!("{:.0}k", v / 1e3)
    } else {
        value.to_string()
    }
}

fn two_decimals(v: f64) -> String {
    let s = format!("{v:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// A width and height in pixels, written `WxH`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Size { width, height }
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

impl FromStr for Size {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            ParseError::InvalidValue(format!(
                "'{s}' must be in the form 'wxh', where w and h are positive integers"
            ))
        };

        let parts = s.split('x').collect::<Vec<_>>();
        let [w, h] = parts.as_slice() else {
            return Err(invalid());
        };

        let w = parse_scaled_int(w).map_err(|_| invalid())?;
        let h = parse_scaled_int(h).map_err(|_| invalid())?;

        if w <= 0 || h <= 0 {
            return Err(invalid());
        }

        Ok(Size::new(w as u32, h as u32))
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{}",
            format_int(i64::from(self.width)),
            format_int(i64::from(self.height))
        )
    }
}

/// Parses a supersampling factor: either a [`Size`] or a positive square number `n`, which
/// stands for `√n x √n`
pub fn supersampling(value: &str) -> Result<Size, ParseError> {
    if let Ok(size) = value.parse::<Size>() {
        return Ok(size);
    }

    let invalid = || {
        ParseError::InvalidValue(format!("'{value}' is neither a size nor a square number"))
    };

    let n = parse_scaled_int(value).map_err(|_| invalid())?;
    let root = f64::from(n).sqrt() as i32;

    if n <= 0 || root * root != n {
        return Err(invalid());
    }

    Ok(Size::new(root as u32, root as u32))
}

/// Identifies a device as `platform.device`, both zero based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceId {
    pub platform: u32,
    pub device: u32,
}

impl FromStr for DeviceId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            ParseError::InvalidValue(format!(
                "'{s}' must be in the form 'x.y', where x and y are non-negative integers"
            ))
        };

        let (platform, device) = s.split_once('.').ok_or_else(invalid)?;

        Ok(DeviceId {
            platform: platform.parse().map_err(|_| invalid())?,
            device: device.parse().map_err(|_| invalid())?,
        })
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.platform, self.device)
    }
}

/// An axis aligned rectangle written as four space separated numbers: `x y width height`,
/// where `(x, y)` is the lower left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl FromStr for Rectangle {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            ParseError::InvalidValue(format!(
                "'{s}' is not a valid area, expected 'x0 y0 width height'"
            ))
        };

        let numbers = s
            .split(' ')
            .map(|n| n.parse::<f64>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;

        let [x, y, width, height] = numbers.as_slice() else {
            return Err(invalid());
        };

        Ok(Rectangle {
            x: *x,
            y: *y,
            width: *width,
            height: *height,
        })
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.x, self.y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_ints() {
        assert_eq!(parse_scaled_int("120"), Ok(120));
        assert_eq!(parse_scaled_int("8k"), Ok(8192));
        assert_eq!(parse_scaled_int("1.5K"), Ok(1536));
        assert_eq!(parse_scaled_int("64M"), Ok(64 * 1024 * 1024));
        assert_eq!(parse_scaled_int("-3"), Ok(-3));
        assert_eq!(parse_scaled_int("2.9"), Ok(2));
        assert!(parse_scaled_int("k").is_err());
        assert!(parse_scaled_int("twelve").is_err());
        assert!(parse_scaled_int("").is_err());
    }

    #[test]
    fn formatted_ints() {
        assert_eq!(format_int(512), "512");
        assert_eq!(format_int(1234), "1k");
        assert_eq!(format_int(1999), "2k");
        assert_eq!(format_int(2_500_000), "2.5M");
        assert_eq!(format_int(1_234_567), "1.23M");
        assert_eq!(format_int(3_000_000_000), "3G");
    }

    #[test]
    fn sizes() {
        assert_eq!("500x300".parse(), Ok(Size::new(500, 300)));
        assert_eq!("5kx5k".parse(), Ok(Size::new(5120, 5120)));

        for invalid in ["500", "500x", "x300", "0x10", "10x-1", "1x2x3", "axb"] {
            let err = invalid.parse::<Size>().unwrap_err();
            assert!(matches!(err, ParseError::InvalidValue(_)), "{invalid}");
        }

        assert_eq!(Size::new(512, 512).to_string(), "512x512");
        assert_eq!(Size::new(8000, 2_500_000).to_string(), "8kx2.5M");
        assert_eq!(Size::new(3, 4).area(), 12);
    }

    #[test]
    fn supersampling_factors() {
        assert_eq!(supersampling("2x3"), Ok(Size::new(2, 3)));
        assert_eq!(supersampling("16"), Ok(Size::new(4, 4)));
        assert_eq!(supersampling("1"), Ok(Size::new(1, 1)));
        assert!(supersampling("8").is_err());
        assert!(supersampling("0").is_err());
        assert!(supersampling("-4").is_err());
    }

    #[test]
    fn device_ids() {
        assert_eq!("0.1".parse(), Ok(DeviceId { platform: 0, device: 1 }));
        assert_eq!(DeviceId { platform: 2, device: 0 }.to_string(), "2.0");

        for invalid in ["0", "0.", ".1", "-1.0", "1.2.3", "a.b"] {
            assert!(invalid.parse::<DeviceId>().is_err(), "{invalid}");
        }
    }

    #[test]
    fn areas() {
        let area = "-2.1 -1.5 3 3".parse::<Rectangle>().unwrap();
        assert_eq!(
            area,
            Rectangle {
                x: -2.1,
                y: -1.5,
                width: 3.0,
                height: 3.0
            }
        );
        assert_eq!(area.to_string(), "-2.1 -1.5 3 3");

        // only single spaces separate the numbers
        for invalid in ["", "1 2 3", "1 2 3 4 5", "1  2 3 4", "1,2,3,4", "a b c d", " 1 2 3 4"] {
            let err = invalid.parse::<Rectangle>().unwrap_err();
            assert!(matches!(err, ParseError::InvalidValue(_)), "{invalid}");
        }
    }
}
