//! Human-readable size labels.

const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Format a byte count with a 1024 base, e.g. `1.50 KB` or `512.0 B`.
///
/// Values below 10 in KB and larger units get two decimals, everything else
/// one. Zero renders as `0 KB`.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 KB".to_string();
    }

    let mut value = bytes as f64;
    let mut index = 0;
    while value >= 1024.0 && index < UNITS.len() - 1 {
        value /= 1024.0;
        index += 1;
    }

    let decimals = if value < 10.0 && index > 0 { 2 } else { 1 };
    format!("{:.*} {}", decimals, value, UNITS[index])
}

/// Describe a size change: `No size change`, `+1.00 KB increase`, `2.00 MB smaller`.
pub fn delta_label(delta: i64) -> String {
    match delta {
        0 => "No size change".to_string(),
        d if d > 0 => format!("+{} increase", format_bytes(d.unsigned_abs())),
        d => format!("{} smaller", format_bytes(d.unsigned_abs())),
    }
}
