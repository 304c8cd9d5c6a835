pub fn quote(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("\"{}\"", text))
}

/// Formats a double in scientific notation with the fewest digits that parse
/// back to the same value, e.g. `1.5E+00`, `1E-01`, `-2.5E+300`.
///
/// The exponent always carries a sign and at least two digits. Non-finite
/// values render as `NaN`, `+Inf` and `-Inf`.
pub fn format_double(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 { "+Inf" } else { "-Inf" }.to_owned();
    }

    // `{:E}` already yields the shortest round-trip mantissa, e.g. `1.5E0`.
    let formatted = format!("{:E}", value);
    let (mantissa, exponent) = match formatted.split_once('E') {
        Some(parts) => parts,
        None => return formatted,
    };
    let exponent: i32 = match exponent.parse() {
        Ok(e) => e,
        Err(_) => return formatted,
    };
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{}E{}{:02}", mantissa, sign, exponent.unsigned_abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_escapes() {
        assert_eq!(quote("id"), "\"id\"");
        assert_eq!(quote("a\"b"), "\"a\\\"b\"");
    }

    #[test]
    fn format_double_scientific() {
        assert_eq!(format_double(1.5), "1.5E+00");
        assert_eq!(format_double(0.0), "0E+00");
        assert_eq!(format_double(-0.0), "-0E+00");
        assert_eq!(format_double(0.1), "1E-01");
        assert_eq!(format_double(100.0), "1E+02");
        assert_eq!(format_double(-2.5e300), "-2.5E+300");
        assert_eq!(format_double(123456.789), "1.23456789E+05");
        assert_eq!(format_double(5e-324), "5E-324");
    }

    #[test]
    fn format_double_non_finite() {
        assert_eq!(format_double(f64::NAN), "NaN");
        assert_eq!(format_double(f64::INFINITY), "+Inf");
        assert_eq!(format_double(f64::NEG_INFINITY), "-Inf");
    }

    #[test]
    fn format_double_round_trips() {
        for value in [1.5, 0.1 + 0.2, std::f64::consts::PI, 1e-7, f64::MAX, f64::MIN_POSITIVE, -42.125] {
            let text = format_double(value);
            assert_eq!(text.parse::<f64>().unwrap(), value, "{}", text);
        }
    }
}
