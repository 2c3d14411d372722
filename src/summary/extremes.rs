//! High/low reduction over a day's temperatures

use crate::models::DailyExtremes;

/// Value reported for both high and low when there is nothing to reduce
pub const EMPTY_SENTINEL: f64 = 0.0;

/// Reduces readings to today's high and low.
///
/// An empty input yields `EMPTY_SENTINEL` for both. Otherwise the fold starts
/// from the first reading, so a day that stays below zero reports its real high.
#[must_use]
pub fn aggregate<I>(temperatures: I) -> DailyExtremes
where
    I: IntoIterator<Item = f64>,
{
    let mut readings = temperatures.into_iter();
    let Some(first) = readings.next() else {
        return DailyExtremes {
            high: EMPTY_SENTINEL,
            low: EMPTY_SENTINEL,
        };
    };

    readings.fold(
        DailyExtremes {
            high: first,
            low: first,
        },
        |extremes, t| DailyExtremes {
            high: extremes.high.max(t),
            low: extremes.low.min(t),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(vec![60.0, 55.0, 70.0, 65.0], 70.0, 55.0)]
    #[case(vec![42.0], 42.0, 42.0)]
    #[case(vec![50.0, 50.0, 50.0], 50.0, 50.0)]
    #[case(vec![-3.0, -12.5, -7.0], -3.0, -12.5)]
    #[case(vec![-2.0, 0.0, 4.5], 4.5, -2.0)]
    fn reduces_to_true_extremes(#[case] temps: Vec<f64>, #[case] high: f64, #[case] low: f64) {
        let extremes = aggregate(temps.iter().copied());
        assert_eq!(extremes, DailyExtremes { high, low });
        for t in temps {
            assert!(extremes.low <= t && t <= extremes.high);
        }
    }

    #[test]
    fn empty_input_is_sentinel() {
        let extremes = aggregate(Vec::new());
        assert_eq!(extremes.high, EMPTY_SENTINEL);
        assert_eq!(extremes.low, EMPTY_SENTINEL);
    }
}
