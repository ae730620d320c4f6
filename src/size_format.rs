//! Human-readable byte counts.

const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

/// Formats a byte count with one decimal place, using binary (1024) steps.
///
/// PB is the largest unit; larger values are expressed as many petabytes.
///
/// # Examples
///
/// ```
/// use smart_organizer::size_format::format_size;
///
/// assert_eq!(format_size(0), "0.0 B");
/// assert_eq!(format_size(1536), "1.5 KB");
/// ```
pub fn format_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    const KB: u64 = 1024;
    const PB: u64 = KB * KB * KB * KB * KB;

    #[test]
    fn test_bytes() {
        assert_eq!(format_size(0), "0.0 B");
        assert_eq!(format_size(1), "1.0 B");
        assert_eq!(format_size(1023), "1023.0 B");
    }

    #[test]
    fn test_unit_boundaries() {
        assert_eq!(format_size(KB), "1.0 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(KB * KB), "1.0 MB");
        assert_eq!(format_size(KB * KB * KB), "1.0 GB");
        assert_eq!(format_size(KB * KB * KB * KB), "1.0 TB");
        assert_eq!(format_size(PB), "1.0 PB");
    }

    #[test]
    fn test_just_below_next_unit_rounds_within_unit() {
        // 1_048_575 bytes is 1023.999 KB
        assert_eq!(format_size(1_048_575), "1024.0 KB");
    }

    #[test]
    fn test_caps_at_petabytes() {
        assert_eq!(format_size(PB * 2), "2.0 PB");
        assert_eq!(format_size(PB * 2048), "2048.0 PB");
        assert!(format_size(u64::MAX).ends_with(" PB"));
    }
}
