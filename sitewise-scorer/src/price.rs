//! Rent cost normalisation.

/// Annual rent treated as fully affordable, in rupiah.
///
/// Rents at or below this value score `1.0`; dearer rents score
/// proportionally less.
pub const REFERENCE_RENT: f64 = 100_000_000.0;

/// Map a rent cost onto a `[0, 1]` price-value score.
///
/// Non-positive costs are treated as a divisor of one, so free sites score
/// `1.0`.
///
/// # Examples
/// ```
/// use sitewise_scorer::normalise_rent;
///
/// assert_eq!(normalise_rent(200_000_000.0), 0.5);
/// assert_eq!(normalise_rent(50_000_000.0), 1.0);
/// assert_eq!(normalise_rent(0.0), 1.0);
/// ```
#[must_use]
#[expect(clippy::float_arithmetic, reason = "cost ratio")]
pub fn normalise_rent(cost: f64) -> f64 {
    let divisor = if cost > 0.0 { cost } else { 1.0 };
    (REFERENCE_RENT / divisor).clamp(0.0, 1.0)
}

#[cfg(test)]
#[expect(
    clippy::float_arithmetic,
    reason = "assertions compare floating-point values"
)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(REFERENCE_RENT, 1.0)]
    #[case(200_000_000.0, 0.5)]
    #[case(400_000_000.0, 0.25)]
    #[case(1.0, 1.0)]
    #[case(0.0, 1.0)]
    #[case(-5_000.0, 1.0)]
    #[case(f64::INFINITY, 0.0)]
    fn scales_against_reference(#[case] cost: f64, #[case] expected: f64) {
        assert!((normalise_rent(cost) - expected).abs() < 1e-12);
    }
}
