use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{EngineError, MoneyCents, money::parse_hundredths};

/// A tax percentage with two fractional digits, stored as hundredths of a
/// percent (`1800` = 18.00%).
///
/// ```rust
/// use engine::TaxRate;
///
/// let gst: TaxRate = "18".parse().unwrap();
/// assert_eq!(gst.hundredths(), 1800);
/// assert_eq!(gst.to_string(), "18.00%");
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TaxRate(i64);

impl TaxRate {
    pub const ZERO: TaxRate = TaxRate(0);

    #[must_use]
    pub const fn from_hundredths(value: i64) -> Self {
        Self(value)
    }

    /// Whole-percent constructor (`TaxRate::percent(18)` = 18.00%).
    #[must_use]
    pub const fn percent(value: i64) -> Self {
        Self(value * 100)
    }

    #[must_use]
    pub const fn hundredths(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Tax due on `base`, rounded half away from zero to the minor unit.
    ///
    /// Returns `None` on overflow.
    #[must_use]
    pub fn apply(self, base: MoneyCents) -> Option<MoneyCents> {
        const SCALE: i128 = 100 * 100;
        let raw = i128::from(base.cents()).checked_mul(i128::from(self.0))?;
        let half = SCALE / 2;
        let rounded = if raw >= 0 {
            (raw + half) / SCALE
        } else {
            (raw - half) / SCALE
        };
        i64::try_from(rounded).ok().map(MoneyCents::new)
    }
}

impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}%", abs / 100, abs % 100)
    }
}

impl FromStr for TaxRate {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let trimmed = trimmed.strip_suffix('%').unwrap_or(trimmed);
        parse_hundredths(trimmed, "tax rate").map(TaxRate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applies_whole_percent() {
        let tax = TaxRate::percent(18).apply(MoneyCents::new(100_00)).unwrap();
        assert_eq!(tax, MoneyCents::new(18_00));
    }

    #[test]
    fn rounds_half_away_from_zero() {
        // 5% of 0.10 = 0.005 -> 0.01
        assert_eq!(
            TaxRate::percent(5).apply(MoneyCents::new(10)).unwrap(),
            MoneyCents::new(1)
        );
        // 5% of 0.09 = 0.0045 -> 0.00
        assert_eq!(
            TaxRate::percent(5).apply(MoneyCents::new(9)).unwrap(),
            MoneyCents::ZERO
        );
        assert_eq!(
            TaxRate::percent(5).apply(MoneyCents::new(-10)).unwrap(),
            MoneyCents::new(-1)
        );
    }

    #[test]
    fn parses_fractional_and_percent_sign() {
        assert_eq!("12.5".parse::<TaxRate>().unwrap().hundredths(), 1250);
        assert_eq!("5%".parse::<TaxRate>().unwrap().hundredths(), 500);
        assert!("1.234".parse::<TaxRate>().is_err());
    }
}
