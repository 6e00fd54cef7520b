//! Text measurement, truncation, and number formatting for chart labels.

use num_format::{Locale, ToFormattedString};

/// Heuristic: estimate pixel width of text (Plotters has no built-in text measuring).
pub fn estimate_text_width_px(text: &str, font_px: u32) -> u32 {
    ((text.chars().count() as f32) * (font_px as f32) * 0.60).ceil() as u32
}

/// Truncate to fit `max_px` and add a single ellipsis if needed.
pub fn truncate_to_width(text: &str, font_px: u32, max_px: u32) -> String {
    if estimate_text_width_px(text, font_px) <= max_px {
        return text.to_string();
    }
    let mut out = String::new();
    for ch in text.chars() {
        out.push(ch);
        if estimate_text_width_px(&out, font_px) + estimate_text_width_px("…", font_px) > max_px {
            out.pop();
            break;
        }
    }
    out.push('…');
    out
}

/// Tooltip/in-bar value: whole numbers as-is, otherwise up to two decimals.
pub fn fmt_value(v: f64) -> String {
    if !v.is_finite() {
        return "NA".to_string();
    }
    if v.fract() == 0.0 {
        return format!("{}", v as i64);
    }
    let s = format!("{:.2}", v);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Axis tick label with thousands separators (`10,000`).
pub fn fmt_tick(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        let n = v as i64;
        return n.to_formatted_string(&Locale::en);
    }
    fmt_value(v)
}

/// Plain year label, no grouping (`2017`).
pub fn fmt_year(v: f64) -> String {
    format!("{}", v.round() as i64)
}
