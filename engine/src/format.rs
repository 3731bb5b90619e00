//! Human-readable sizes and durations for log and progress lines.

const KB: f64 = 1024.0;

/// Format a byte count with binary thresholds.
///
/// Below 1 KB the count is printed as an integer, KB and MB get one decimal,
/// anything from 1 GB up gets two.
pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let kb = bytes as f64 / KB;
    if kb < KB {
        return format!("{:.1} KB", kb);
    }
    let mb = kb / KB;
    if mb < KB {
        return format!("{:.1} MB", mb);
    }
    format!("{:.2} GB", mb / KB)
}

/// Format an ETA in whole minutes and seconds, e.g. `2dk 5sn`.
pub fn format_eta(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    format!("{}dk {}sn", total / 60, total % 60)
}
