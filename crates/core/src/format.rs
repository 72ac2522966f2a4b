// Display formatting for report values
//
// Every helper takes an Option and renders None as "N/A" so report builders
// never have to branch on missing data themselves.

pub const NA: &str = "N/A";

/// Large money values with a magnitude suffix, two decimals
pub fn format_number(value: Option<f64>) -> String {
    let Some(v) = value else {
        return NA.to_string();
    };
    let abs = v.abs();
    if abs >= 1e12 {
        format!("${:.2}T", v / 1e12)
    } else if abs >= 1e9 {
        format!("${:.2}B", v / 1e9)
    } else if abs >= 1e6 {
        format!("${:.2}M", v / 1e6)
    } else if abs >= 1e3 {
        format!("${:.2}K", v / 1e3)
    } else {
        format!("${:.2}", v)
    }
}

/// Percentage with two decimals.
///
/// Yahoo is inconsistent: most ratios are fractions (0.25 = 25%) but some
/// yields arrive already scaled (0.98 meaning 0.98% is reported as 0.98, a
/// 2.5% yield as 2.5). Values above 1 are treated as already scaled.
pub fn format_percent(value: Option<f64>) -> String {
    match value {
        None => NA.to_string(),
        Some(v) if v > 1.0 => format!("{:.2}%", v),
        Some(v) => format!("{:.2}%", v * 100.0),
    }
}

pub fn format_ratio(value: Option<f64>) -> String {
    match value {
        None => NA.to_string(),
        Some(v) => format!("{:.2}x", v),
    }
}

pub fn format_price(value: Option<f64>) -> String {
    match value {
        None => NA.to_string(),
        Some(v) => format!("${:.2}", v),
    }
}

/// Raw value prefixed with a dollar sign, the way quote tables show prices
pub fn dollar_raw(value: Option<f64>) -> String {
    match value {
        None => format!("${}", NA),
        Some(v) => format!("${}", trim_float(v)),
    }
}

/// Fraction as a one-decimal percentage (0.085 -> "8.5%")
pub fn percent1(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

/// Render a float without a trailing ".0" for whole numbers
pub fn trim_float(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Group the integer part of a number with commas (1234567 -> "1,234,567")
pub fn group_thousands(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if rounded < 0 {
        out.insert(0, '-');
    }
    out
}

/// Formatting styles used by the side-by-side comparison table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompactFormat {
    Number,
    Percent,
    Ratio,
    Price,
    Plain,
}

/// One-decimal formatting for the comparison table
pub fn format_compact(value: Option<f64>, kind: CompactFormat) -> String {
    let Some(v) = value else {
        return NA.to_string();
    };
    match kind {
        CompactFormat::Number => {
            let abs = v.abs();
            if abs >= 1e12 {
                format!("${:.1}T", v / 1e12)
            } else if abs >= 1e9 {
                format!("${:.1}B", v / 1e9)
            } else if abs >= 1e6 {
                format!("${:.1}M", v / 1e6)
            } else {
                format!("${}", group_thousands(v))
            }
        }
        CompactFormat::Percent => format!("{:.1}%", v * 100.0),
        CompactFormat::Ratio => format!("{:.1}x", v),
        CompactFormat::Price => format!("${:.2}", v),
        CompactFormat::Plain => format!("{:.2}", v),
    }
}

/// Truncate to at most `max` characters, appending `suffix` when cut
pub fn truncate_chars(text: &str, max: usize, suffix: &str) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max).collect();
    out.push_str(suffix);
    out
}
