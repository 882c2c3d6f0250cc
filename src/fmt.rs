/// Format a number with thousands separators and at most three fraction
/// digits, dropping trailing zeros: 1234.5 -> "1,234.5", 2800.0 -> "2,800".
pub fn grouped(val: f64) -> String {
    let rounded = format!("{:.3}", val.abs());
    let (int_part, dec_part) = rounded.split_once('.').unwrap_or((&rounded, ""));
    let dec_part = dec_part.trim_end_matches('0');

    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();

    let body = if dec_part.is_empty() {
        with_commas
    } else {
        format!("{with_commas}.{dec_part}")
    };

    // -0.0001 rounds to "0" and should not carry a sign
    if val < 0.0 && body != "0" {
        format!("-{body}")
    } else {
        body
    }
}

/// Grouped amount followed by a unit suffix: 2500 + "円" -> "2,500円".
pub fn with_suffix(val: f64, suffix: &str) -> String {
    format!("{}{suffix}", grouped(val))
}

pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grouped_formatting() {
        assert_eq!(grouped(2800.0), "2,800");
        assert_eq!(grouped(1234.56), "1,234.56");
        assert_eq!(grouped(-1500.0), "-1,500");
        assert_eq!(grouped(0.0), "0");
        assert_eq!(grouped(1000000.5), "1,000,000.5");
        assert_eq!(grouped(999.0), "999");
        assert_eq!(grouped(0.1234), "0.123");
        assert_eq!(grouped(-0.0001), "0");
    }

    #[test]
    fn test_with_suffix() {
        assert_eq!(with_suffix(2500.0, "円"), "2,500円");
        assert_eq!(with_suffix(300.0, ""), "300");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }
}
