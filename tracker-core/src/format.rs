//! Number formatting for cards, the country table, popups and the chart.

const UNITS: [(f64, &str); 4] = [(1.0, ""), (1e3, "k"), (1e6, "M"), (1e9, "B")];

/// Sentinel shown for absent or zero counters.
pub const ZERO_STAT: &str = "+0";

fn scale(magnitude: f64, decimals: i32) -> (f64, &'static str) {
    let mut idx = UNITS
        .iter()
        .rposition(|(step, _)| magnitude >= *step)
        .unwrap_or(0);
    let factor = 10f64.powi(decimals);
    // halves round up, 1250 reads 1.3k
    let round_to = |v: f64| (v * factor).round() / factor;
    let mut scaled = round_to(magnitude / UNITS[idx].0);
    // 999_999 must read 1.0M, not 1000.0k
    if scaled >= 1000.0 && idx + 1 < UNITS.len() {
        idx += 1;
        scaled = round_to(magnitude / UNITS[idx].0);
    }
    (scaled, UNITS[idx].1)
}

/// One-decimal engineering abbreviation, `12345 -> "12.3k"`. Negative values
/// keep their `-`; positive values carry no sign.
pub fn abbreviate(value: i64) -> String {
    let sign = if value < 0 { "-" } else { "" };
    let (scaled, suffix) = scale(value.unsigned_abs() as f64, 1);
    format!("{sign}{scaled:.1}{suffix}")
}

/// Signed abbreviation for "today" counters: `None` and zero give `"+0"`,
/// `1500 -> "+1.5k"`, `-200 -> "-200.0"`.
pub fn pretty_print_stat(stat: Option<i64>) -> String {
    match stat {
        None | Some(0) => ZERO_STAT.to_string(),
        Some(value) if value > 0 => format!("+{}", abbreviate(value)),
        Some(value) => abbreviate(value),
    }
}

/// Thousands separators, `1234567 -> "1,234,567"`.
pub fn format_count(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `format_count` with an explicit `+` on non-negative values.
pub fn format_signed_count(value: i64) -> String {
    if value < 0 {
        format_count(value)
    } else {
        format!("+{}", format_count(value))
    }
}

/// Whole-number abbreviation for axis ticks, `12000.0 -> "12k"`.
pub fn format_axis(value: f64) -> String {
    if !value.is_finite() {
        return String::new();
    }
    let sign = if value < 0.0 { "-" } else { "" };
    let (scaled, suffix) = scale(value.abs(), 0);
    format!("{sign}{scaled:.0}{suffix}")
}
