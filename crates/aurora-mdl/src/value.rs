//! Property values and the token conversions shared by all property kinds.

use crate::aabb::AabbNode;

/// Element type of a scalar, vector or matrix property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    /// Free-form string token.
    String,
    /// Integer. Reads tolerate float syntax (`3.0` parses as 3) because
    /// some producer tools write integers that way.
    Int,
    /// 64-bit float, written at 9 significant digits.
    Float,
    /// Boolean written as `0`/`1`. Reads go through the float parser so
    /// files carrying `0.0` for a flag still parse.
    Bool,
}

/// A typed value held by one node property.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Single string token.
    String(String),
    /// Single integer.
    Int(i64),
    /// Single float.
    Float(f64),
    /// Single boolean.
    Bool(bool),
    /// One row of numbers on the declaration line (positions, orientations,
    /// colors).
    FloatVector(Vec<f64>),
    /// Variable-row list of float rows (vertices, texture coordinates,
    /// animation keys).
    FloatMatrix(Vec<Vec<f64>>),
    /// Variable-row list of integer rows (faces, constraints).
    IntMatrix(Vec<Vec<i64>>),
    /// Variable-row list of uninterpreted rows; skin weights mix bone names
    /// with numbers.
    StringMatrix(Vec<Vec<String>>),
    /// Canonical (symbolic-name) side of an enum property.
    Enum(String),
    /// Root of a bounding-box tree.
    Aabb(AabbNode),
}

impl Value {
    /// Try to get as a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Enum(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as a float (also accepts integer).
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Try to get as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as a float row.
    pub fn as_float_vector(&self) -> Option<&[f64]> {
        match self {
            Value::FloatVector(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as a list of float rows.
    pub fn as_float_matrix(&self) -> Option<&[Vec<f64>]> {
        match self {
            Value::FloatMatrix(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as a list of integer rows.
    pub fn as_int_matrix(&self) -> Option<&[Vec<i64>]> {
        match self {
            Value::IntMatrix(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as a bounding-box tree.
    pub fn as_aabb(&self) -> Option<&AabbNode> {
        match self {
            Value::Aabb(root) => Some(root),
            _ => None,
        }
    }
}

/// Parse a float token.
pub(crate) fn parse_float(token: &str) -> Option<f64> {
    token.parse().ok()
}

/// Parse an integer token, tolerating float syntax (`3.0` parses as 3).
pub(crate) fn parse_int(token: &str) -> Option<i64> {
    if let Ok(v) = token.parse::<i64>() {
        return Some(v);
    }
    token.parse::<f64>().ok().map(|v| v as i64)
}

/// Parse a boolean token: any numeric value, truncated, nonzero is true.
pub(crate) fn parse_bool(token: &str) -> Option<bool> {
    token.parse::<f64>().ok().map(|v| (v as i64) != 0)
}

/// Format a float at 9 significant digits, like C's `%.9g`.
///
/// The reference exporter tidies values this way; matching it exactly keeps
/// rewritten files diff-clean against originals.
pub fn fmt_g9(v: f64) -> String {
    fmt_g(v, 9)
}

fn fmt_g(v: f64, sig: usize) -> String {
    if v == 0.0 {
        return if v.is_sign_negative() { "-0".into() } else { "0".into() };
    }
    if !v.is_finite() {
        return format!("{v}");
    }
    // Round through the exponent form first so the branch below sees the
    // post-rounding exponent (9.9999999999 rounds up to 10).
    let exp_form = format!("{:.*e}", sig - 1, v);
    let epos = exp_form.find('e').expect("exponent form");
    let exp: i32 = exp_form[epos + 1..].parse().expect("exponent digits");
    if exp < -4 || exp >= sig as i32 {
        let mantissa = exp_form[..epos].trim_end_matches('0').trim_end_matches('.');
        let (sign, abs) = if exp < 0 { ('-', -exp) } else { ('+', exp) };
        format!("{mantissa}e{sign}{abs:02}")
    } else {
        let decimals = (sig as i32 - 1 - exp).max(0) as usize;
        let fixed = format!("{:.*}", decimals, v);
        if fixed.contains('.') {
            fixed.trim_end_matches('0').trim_end_matches('.').to_string()
        } else {
            fixed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_g9_integral_values() {
        assert_eq!(fmt_g9(0.0), "0");
        assert_eq!(fmt_g9(1.0), "1");
        assert_eq!(fmt_g9(-1.0), "-1");
        assert_eq!(fmt_g9(120.0), "120");
        assert_eq!(fmt_g9(123456789.0), "123456789");
    }

    #[test]
    fn test_fmt_g9_fractions() {
        assert_eq!(fmt_g9(0.5), "0.5");
        assert_eq!(fmt_g9(-0.25), "-0.25");
        assert_eq!(fmt_g9(1.0 / 3.0), "0.333333333");
        assert_eq!(fmt_g9(0.0001234567891), "0.000123456789");
    }

    #[test]
    fn test_fmt_g9_scientific() {
        assert_eq!(fmt_g9(1234567890.0), "1.23456789e+09");
        assert_eq!(fmt_g9(0.00001), "1e-05");
        assert_eq!(fmt_g9(-1.5e-10), "-1.5e-10");
    }

    #[test]
    fn test_fmt_g9_rounding_carries_into_exponent() {
        assert_eq!(fmt_g9(9.9999999999), "10");
        assert_eq!(fmt_g9(999999999.9), "1e+09");
    }

    #[test]
    fn test_fmt_g9_keeps_nine_digits_of_precision() {
        use approx::assert_relative_eq;
        for v in [
            std::f64::consts::PI,
            1.0 / 3.0,
            123.456789123,
            -0.000321654987,
        ] {
            let reparsed: f64 = fmt_g9(v).parse().unwrap();
            assert_relative_eq!(reparsed, v, max_relative = 1e-8);
        }
    }

    #[test]
    fn test_parse_int_accepts_float_syntax() {
        assert_eq!(parse_int("3"), Some(3));
        assert_eq!(parse_int("3.0"), Some(3));
        assert_eq!(parse_int("-2.7"), Some(-2));
        assert_eq!(parse_int("x"), None);
    }

    #[test]
    fn test_parse_bool_leniency() {
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool("1.0"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("0.0"), Some(false));
        assert_eq!(parse_bool("false"), None);
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(Value::Int(3).as_float(), Some(3.0));
        assert_eq!(Value::Float(0.5).as_int(), None);
        assert_eq!(Value::String("NULL".into()).as_str(), Some("NULL"));
        assert_eq!(Value::FloatVector(vec![1.0, 0.5]).as_float_vector(), Some(&[1.0, 0.5][..]));
    }
}
