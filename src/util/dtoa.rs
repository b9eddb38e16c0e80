//! Number <-> string conversion
//!
//! `number_to_string` implements Number::toString(10): shortest round-trip
//! digits, switching to exponent notation outside `[1e-7, 1e21)`.
//! `string_to_number` implements StringToNumber.

use crate::util::unicode::is_whitespace;

/// Convert a number to its JavaScript string form
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n == 0.0 {
        // Both +0 and -0
        return "0".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n < 0.0 {
        return format!("-{}", number_to_string(-n));
    }

    // `{:e}` yields the shortest digits that round-trip, e.g. "1.2345e-7"
    let sci = format!("{:e}", n);
    let (mantissa, exp) = match sci.split_once('e') {
        Some(parts) => parts,
        None => (sci.as_str(), "0"),
    };
    let digits: String = mantissa.chars().filter(|&c| c != '.').collect();
    let k = digits.len() as i32;
    // Position of the decimal point relative to the digit string
    let e = exp.parse::<i32>().unwrap_or(0) + 1;

    if k <= e && e <= 21 {
        let mut out = digits;
        out.extend(std::iter::repeat_n('0', (e - k) as usize));
        out
    } else if 0 < e && e <= 21 {
        let (int_part, frac_part) = digits.split_at(e as usize);
        format!("{}.{}", int_part, frac_part)
    } else if -6 < e && e <= 0 {
        format!("0.{}{}", "0".repeat((-e) as usize), digits)
    } else {
        let exp = e - 1;
        let sign = if exp >= 0 { '+' } else { '-' };
        let (first, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{}e{}{}", first, sign, exp.abs())
        } else {
            format!("{}.{}e{}{}", first, rest, sign, exp.abs())
        }
    }
}

/// Convert a string to a number following StringToNumber
///
/// Returns NaN for anything that is not a StringNumericLiteral.
pub fn string_to_number(s: &str) -> f64 {
    let t = s.trim_matches(|c: char| is_whitespace(c as u32));
    if t.is_empty() {
        return 0.0;
    }

    match t {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    let radix_prefixes = [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)];
    for (prefix, radix) in radix_prefixes {
        if let Some(body) = t.strip_prefix(prefix) {
            return parse_radix_integer(body, radix);
        }
    }

    if is_decimal_literal(t) {
        t.parse::<f64>().unwrap_or(f64::NAN)
    } else {
        f64::NAN
    }
}

/// Parse an unsigned integer literal in the given radix, NaN if malformed
fn parse_radix_integer(body: &str, radix: u32) -> f64 {
    if body.is_empty() {
        return f64::NAN;
    }
    let mut value = 0.0f64;
    for c in body.chars() {
        match c.to_digit(radix) {
            Some(d) => value = value * radix as f64 + d as f64,
            None => return f64::NAN,
        }
    }
    value
}

/// StrDecimalLiteral without the Infinity forms:
/// `[+-]? (digits [. digits?] | . digits) ([eE] [+-]? digits)?`
fn is_decimal_literal(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut mantissa_digits = i - int_start;

    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        mantissa_digits += i - frac_start;
    }

    if mantissa_digits == 0 {
        return false;
    }

    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        i += 1;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }

    i == bytes.len()
}
