//! Unit conversion utilities
//!
//! Lengths are stored in whole millimetres. Product codes and labels use
//! metres, so these helpers convert and format between the two.

/// Convert millimetres to metres
pub fn mm_to_metres(mm: u32) -> f64 {
    mm as f64 / 1000.0
}

/// Convert metres to whole millimetres
///
/// Negative and non-finite input clamps to zero.
pub fn metres_to_mm(metres: f64) -> u32 {
    if !metres.is_finite() || metres <= 0.0 {
        return 0;
    }
    (metres * 1000.0).round().min(u32::MAX as f64) as u32
}

/// Format a millimetre length as metres the way product codes spell it
///
/// Whole metres print without decimals (`5000` → `"5"`), fractional
/// metres drop trailing zeros (`1500` → `"1.5"`).
pub fn format_metres(mm: u32) -> String {
    if mm % 1000 == 0 {
        return (mm / 1000).to_string();
    }
    let text = format!("{:.3}", mm_to_metres(mm));
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Spreadsheet-style letters for a zero-based index: 0→A, 25→Z, 26→AA
pub fn index_to_letter(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_metres() {
        assert_eq!(format_metres(5000), "5");
        assert_eq!(format_metres(1500), "1.5");
        assert_eq!(format_metres(2750), "2.75");
        assert_eq!(format_metres(0), "0");
    }

    #[test]
    fn test_metres_to_mm_clamps() {
        assert_eq!(metres_to_mm(2.5), 2500);
        assert_eq!(metres_to_mm(-1.0), 0);
        assert_eq!(metres_to_mm(f64::NAN), 0);
    }

    #[test]
    fn test_index_to_letter() {
        assert_eq!(index_to_letter(0), "A");
        assert_eq!(index_to_letter(25), "Z");
        assert_eq!(index_to_letter(26), "AA");
        assert_eq!(index_to_letter(27), "AB");
        assert_eq!(index_to_letter(701), "ZZ");
        assert_eq!(index_to_letter(702), "AAA");
    }
}
