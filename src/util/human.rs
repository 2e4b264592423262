use crate::models::disk::UsageRatio;

/// Format a gigabyte amount with thousands separators: "1,234.57 GB"
pub fn fmt_gb(gb: f64) -> String {
    format!("{} GB", group_thousands(&format!("{:.2}", unsigned_zero(gb, 100.0))))
}

// Anything that rounds to zero at the displayed precision loses its sign,
// so "-0.00" never shows up.
fn unsigned_zero(v: f64, scale: f64) -> f64 {
    if (v * scale).round() == 0.0 { 0.0 } else { v }
}

/// Format a usage ratio as a percentage with two decimals: "84.50%".
/// `Undefined` renders as `placeholder`.
pub fn fmt_ratio(ratio: UsageRatio, placeholder: &str) -> String {
    match ratio {
        UsageRatio::Ratio(r)  => format!("{:.2}%", unsigned_zero(r * 100.0, 100.0)),
        UsageRatio::Undefined => placeholder.to_string(),
    }
}

/// Compact GB label for chart axes: "950", "1.2K"
pub fn fmt_gb_short(gb: f64) -> String {
    let v = gb.abs();
    let sign = if gb < 0.0 { "-" } else { "" };
    if v >= 1_000_000.0 { format!("{}{:.1}P", sign, v / 1_000_000.0) }
    else if v >= 1_000.0 { format!("{}{:.1}T", sign, v / 1_000.0) }
    else { format!("{}{:.0}G", sign, v) }
}

// "-1234567.89" -> "-1,234,567.89"
fn group_thousands(num: &str) -> String {
    let (sign, digits) = match num.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None       => ("", num),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None         => (digits, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None    => format!("{}{}", sign, grouped),
    }
}
