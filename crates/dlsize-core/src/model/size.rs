/// Size formatting utilities — human-readable byte counts.
///
/// All internal sizes are `u64` bytes. Floating point is only used
/// at the display-formatting boundary, and not at all for the
/// "Total Size" line, which is rounded in integer arithmetic.

/// Bytes per megabyte (binary, 1024 * 1024).
pub const BYTES_PER_MB: u64 = 1_048_576;

/// Format a byte count into a human-readable string with appropriate unit.
///
/// Uses binary units (KiB = 1024) but labels them with common short forms
/// (KB, MB, GB, TB) because that is what users expect in a disk tool.
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;
    const TB: f64 = GB * 1024.0;

    let b = bytes as f64;
    if b < KB {
        format!("{bytes} B")
    } else if b < MB {
        format!("{:.1} KB", b / KB)
    } else if b < GB {
        format!("{:.1} MB", b / MB)
    } else if b < TB {
        format!("{:.2} GB", b / GB)
    } else {
        format!("{:.2} TB", b / TB)
    }
}

/// Format a file count with thousand separators.
pub fn format_count(count: u64) -> String {
    if count < 1_000 {
        return count.to_string();
    }
    let s = count.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Megabytes scaled by 100 and rounded half-up: `round(bytes / 2^20 * 100)`.
///
/// Computed as `(2 * bytes * 100 + 2^20) / (2 * 2^20)` in `u128`, so values
/// that sit exactly on a half hundredth always round up and no precision is
/// lost for large totals.
pub fn megabytes_hundredths(bytes: u64) -> u64 {
    let mb = BYTES_PER_MB as u128;
    let scaled = (bytes as u128 * 200 + mb) / (2 * mb);
    scaled as u64
}

/// Render `bytes` as megabytes rounded to two decimals, in shortest form.
///
/// Trailing zeros of the fraction are dropped, and so is the decimal point
/// when nothing remains: `2`, `1.5`, `1.01`.
pub fn format_megabytes(bytes: u64) -> String {
    let hundredths = megabytes_hundredths(bytes);
    let whole = hundredths / 100;
    let frac = hundredths % 100;
    if frac == 0 {
        whole.to_string()
    } else if frac % 10 == 0 {
        format!("{whole}.{}", frac / 10)
    } else {
        format!("{whole}.{frac:02}")
    }
}

/// The single line printed by the CLI in text mode.
pub fn total_size_line(bytes: u64) -> String {
    format!("Total Size: {} MB", format_megabytes(bytes))
}
