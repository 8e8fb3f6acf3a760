use crate::models::{AggregateResult, CourseEntry, Tier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no course has nonzero credits")]
pub struct EmptyCreditsError;

/// Credit-weighted average of grade points over every entry, rounded to two
/// decimals (half away from zero) and bucketed into a tier.
///
/// The division is done on integers so ties round exactly instead of
/// depending on how the quotient happens to land in binary floating point.
pub fn compute(entries: &[CourseEntry]) -> Result<AggregateResult, EmptyCreditsError> {
    let (numerator, denominator) = entries.iter().fold((0u64, 0u64), |(num, den), e| {
        let credits = u64::from(e.credits);
        (num + credits * u64::from(e.grade.points()), den + credits)
    });

    if denominator == 0 {
        return Err(EmptyCreditsError);
    }

    // round(num / den, 2) == floor((200 * num + den) / (2 * den)) / 100 for non-negative values
    let hundredths = (200 * numerator + denominator) / (2 * denominator);
    let value = hundredths as f64 / 100.0;

    Ok(AggregateResult { value, tier: Tier::classify(value) })
}
