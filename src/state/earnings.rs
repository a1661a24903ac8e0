//! Pure display helpers: elapsed time, earnings and hourly-rate text

/// Format seconds as `HH:MM:SS`; hours are not wrapped at 24 or 99
pub fn format_elapsed(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

/// Earnings for `seconds` of work at `hourly_rate`, fixed to 2 decimals
pub fn compute_earnings(seconds: u64, hourly_rate: f64) -> String {
    let hours = seconds as f64 / 3600.0;
    to_fixed_2(hours * hourly_rate)
}

/// Keystroke filter for the hourly-rate field.
///
/// Keeps digits and `.` only, collapses extra decimal points into the first
/// one and keeps at most two fractional digits.
pub fn sanitize_rate_input(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let parts: Vec<&str> = cleaned.split('.').collect();
    match parts.len() {
        1 => cleaned,
        2 => format!("{}.{}", parts[0], truncate(parts[1], 2)),
        _ => {
            let fraction = parts[1..].concat();
            format!("{}.{}", parts[0], truncate(&fraction, 2))
        }
    }
}

/// Normalization applied when the hourly-rate field loses focus
pub fn normalize_rate_on_blur(raw: &str) -> String {
    if raw.is_empty() || raw == "." {
        return "0.00".to_string();
    }

    match parse_rate(raw) {
        Some(value) if value >= 0.0 && value.is_finite() => to_fixed_2(value),
        _ => "0.00".to_string(),
    }
}

/// Lenient float parse: the longest numeric prefix after leading whitespace.
///
/// `"12.5abc"` parses as `12.5`, `"1.2.3"` as `1.2`, `"abc"` as `None`.
pub fn parse_rate(raw: &str) -> Option<f64> {
    let text = raw.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let mut digits = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        digits += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return None;
    }

    // Optional exponent, only taken when it has at least one digit
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    text[..end].parse::<f64>().ok()
}

/// Fixed 2-decimal rendering of the exact binary value. Exact halves round
/// away from zero and zero never renders with a sign.
fn to_fixed_2(value: f64) -> String {
    if !value.is_finite() {
        return "0.00".to_string();
    }

    let rounded = if is_exact_half_cent(value) {
        (value * 100.0).round() / 100.0
    } else {
        value
    };

    if rounded == 0.0 {
        return "0.00".to_string();
    }
    format!("{:.2}", rounded)
}

/// True when the exact expansion of `value` ends in a third decimal 5.
///
/// Such values are odd multiples of 1/8; scaling by a power of two is exact.
fn is_exact_half_cent(value: f64) -> bool {
    (value * 8.0).fract() == 0.0 && (value * 4.0).fract() != 0.0
}

fn truncate(text: &str, max_chars: usize) -> &str {
    // Input is ASCII after sanitization
    &text[..text.len().min(max_chars)]
}
