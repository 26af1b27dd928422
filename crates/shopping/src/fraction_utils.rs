use fraction::Fraction;

/// Parse a quantity token into an exact Fraction
///
/// Supports formats:
/// - Whole numbers: "2" → 2/1
/// - Pure fractions: "1/2" → 1/2
/// - Mixed fractions: "1 1/2" → 3/2
/// - Decimals: "0.5" → 1/2
pub fn parse_quantity(quantity_str: &str) -> Result<Fraction, String> {
    let trimmed = quantity_str.trim();

    if trimmed.starts_with('-') {
        return Err("Negative quantities are not allowed".to_string());
    }

    // "1 1/2"
    if let Some((whole, frac)) = trimmed.split_once(char::is_whitespace) {
        let whole: u64 = whole
            .parse()
            .map_err(|_| format!("Invalid whole number: {}", whole))?;
        let (numerator, denominator) = parse_fraction_parts(frac.trim())?;
        let numerator = whole
            .checked_mul(denominator)
            .and_then(|n| n.checked_add(numerator))
            .ok_or_else(|| format!("Quantity too large: {}", trimmed))?;
        return Ok(Fraction::new(numerator, denominator));
    }

    // "1/2"
    if trimmed.contains('/') {
        return parse_simple_fraction(trimmed);
    }

    let value: f64 = trimmed
        .parse()
        .map_err(|_| format!("Invalid number format: {}", quantity_str))?;

    if !value.is_finite() {
        return Err(format!("Invalid number format: {}", quantity_str));
    }
    if value >= u64::MAX as f64 {
        return Err(format!("Quantity too large: {}", quantity_str));
    }

    Ok(Fraction::from(value))
}

fn parse_simple_fraction(s: &str) -> Result<Fraction, String> {
    let (numerator, denominator) = parse_fraction_parts(s)?;
    Ok(Fraction::new(numerator, denominator))
}

fn parse_fraction_parts(s: &str) -> Result<(u64, u64), String> {
    let (numerator, denominator) = s
        .split_once('/')
        .ok_or_else(|| format!("Invalid fraction format: {}", s))?;

    let numerator: u64 = numerator
        .trim()
        .parse()
        .map_err(|_| format!("Invalid numerator: {}", numerator))?;
    let denominator: u64 = denominator
        .trim()
        .parse()
        .map_err(|_| format!("Invalid denominator: {}", denominator))?;

    if denominator == 0 {
        return Err("Denominator cannot be zero".to_string());
    }

    Ok((numerator, denominator))
}

/// Format a Fraction as a human-readable string
///
/// Formats:
/// - Whole numbers: 2/1 → "2"
/// - Mixed fractions: 3/2 → "1 1/2"
/// - Pure fractions: 1/2 → "1/2"
pub fn format_quantity(fraction: Fraction) -> String {
    let (Some(&numer), Some(&denom)) = (fraction.numer(), fraction.denom()) else {
        return fraction.to_string();
    };

    if denom == 1 {
        return numer.to_string();
    }

    let whole = numer / denom;
    let remainder = numer % denom;

    match (whole, remainder) {
        (w, 0) => w.to_string(),
        (0, r) => format!("{}/{}", r, denom),
        (w, r) => format!("{} {}/{}", w, r, denom),
    }
}

/// Lossy conversion used once quantities move into canonical units.
///
/// NaN or infinite fractions convert to 0.
pub fn to_f64(fraction: Fraction) -> f64 {
    match (fraction.numer(), fraction.denom()) {
        (Some(&n), Some(&d)) if d != 0 => n as f64 / d as f64,
        _ => 0.0,
    }
}

/// Closest fraction n/d to `value` with `d <= max_denominator`.
///
/// Ties go to the smaller denominator, so the result is already reduced.
pub fn nearest_fraction(value: f64, max_denominator: u64) -> (u64, u64) {
    let value = value.max(0.0);
    let mut best = (value.round() as u64, 1u64);
    let mut best_error = (value - best.0 as f64).abs();

    for denom in 2..=max_denominator.max(1) {
        let numer = (value * denom as f64).round() as u64;
        let error = (value - numer as f64 / denom as f64).abs();
        if error < best_error {
            best = (numer, denom);
            best_error = error;
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fraction_pure_fraction() {
        let result = parse_quantity("1/2").unwrap();
        assert_eq!(*result.numer().unwrap(), 1u64);
        assert_eq!(*result.denom().unwrap(), 2u64);
    }

    #[test]
    fn test_parse_fraction_mixed_fraction() {
        let result = parse_quantity("1 1/2").unwrap();
        // 1 1/2 = 3/2
        assert_eq!(*result.numer().unwrap(), 3u64);
        assert_eq!(*result.denom().unwrap(), 2u64);
    }

    #[test]
    fn test_parse_fraction_decimal() {
        let result = parse_quantity("1.5").unwrap();
        assert!((to_f64(result) - 1.5).abs() < 0.001);
    }

    #[test]
    fn test_parse_fraction_whole_number() {
        let result = parse_quantity("2").unwrap();
        assert_eq!(*result.numer().unwrap(), 2u64);
        assert_eq!(*result.denom().unwrap(), 1u64);
    }

    #[test]
    fn test_parse_fraction_rejects_negative() {
        for input in ["-2", "-0.5", "-1/2", "-1 1/2"] {
            let result = parse_quantity(input);
            assert!(
                result
                    .unwrap_err()
                    .contains("Negative quantities are not allowed"),
                "input {input}"
            );
        }
    }

    #[test]
    fn test_parse_fraction_rejects_zero_denominator() {
        assert!(parse_quantity("1/0").unwrap_err().contains("zero"));
        assert!(parse_quantity("2 3/0").is_err());
    }

    #[test]
    fn test_parse_fraction_rejects_garbage() {
        assert!(parse_quantity("abc").is_err());
        assert!(parse_quantity("1/2/3").is_err());
        assert!(parse_quantity("").is_err());
    }

    #[test]
    fn test_parse_fraction_rejects_overflow() {
        let max = u64::MAX;
        assert!(parse_quantity(&format!("{max} 1/2")).unwrap_err().contains("too large"));
        assert!(parse_quantity(&format!("{} 1/3", max / 2)).is_err());
        assert!(parse_quantity("1e300").is_err());
        assert!(parse_quantity(&max.to_string()).is_err());
        assert_eq!(
            parse_quantity(&format!("{max} 0/1")).unwrap(),
            Fraction::new(max, 1u64)
        );
    }

    #[test]
    fn test_format_fraction_simplify() {
        assert_eq!(format_quantity(Fraction::new(4u64, 8u64)), "1/2");
    }

    #[test]
    fn test_format_fraction_mixed() {
        assert_eq!(format_quantity(Fraction::new(3u64, 2u64)), "1 1/2");
    }

    #[test]
    fn test_format_fraction_whole() {
        assert_eq!(format_quantity(Fraction::new(4u64, 2u64)), "2");
    }

    #[test]
    fn test_aggregate_fractions_addition() {
        let sum = parse_quantity("1/2").unwrap() + parse_quantity("1/4").unwrap();
        assert_eq!(format_quantity(sum), "3/4");
    }

    #[test]
    fn test_nearest_fraction() {
        assert_eq!(nearest_fraction(0.5, 16), (1, 2));
        assert_eq!(nearest_fraction(0.333, 16), (1, 3));
        assert_eq!(nearest_fraction(1.75, 16), (7, 4));
        assert_eq!(nearest_fraction(0.0625, 16), (1, 16));
        assert_eq!(nearest_fraction(3.0, 16), (3, 1));
    }
}
