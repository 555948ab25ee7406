use unicode_width::UnicodeWidthStr;

const GB: f64 = 1024.0 * 1024.0 * 1024.0;

pub fn bytes_to_gb(bytes: u64) -> f64 {
    bytes as f64 / GB
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn format_gb(bytes: u64) -> String {
    format!("{:.1} GB", bytes_to_gb(bytes))
}

/// `"Xh Ym"`, or `"Unknown"` when no estimate exists.
pub fn format_time_left(secs_left: Option<u64>) -> String {
    match secs_left {
        Some(secs) => format!("{}h {}m", secs / 3600, (secs % 3600) / 60),
        None => "Unknown".to_string(),
    }
}

/// Right-pad `label` to `width` terminal columns. Emoji count as two.
pub fn pad_label(label: &str, width: usize) -> String {
    let used = label.width();
    let mut padded = String::with_capacity(label.len() + width.saturating_sub(used));
    padded.push_str(label);
    padded.extend(std::iter::repeat_n(' ', width.saturating_sub(used)));
    padded
}
