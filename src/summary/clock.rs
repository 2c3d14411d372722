//! Sunrise/sunset clock rendering at a fixed UTC offset

use chrono::{DateTime, FixedOffset, Timelike};
use serde::{Deserialize, Serialize};

/// How an hour is rolled onto the 12-hour dial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockPolicy {
    /// Wraps across midnight, 0 shows as 12, both fields always two digits.
    #[default]
    TwelveHour,
    /// Subtract the offset from the UTC hour with no day wrap, then take 12 off
    /// anything above 12. Only hours that were not rolled over get padded, so the
    /// output can be `-3:15`, `00:40` or `7:05`.
    Legacy,
}

/// Formats epoch seconds as `HH:MM` at a fixed offset from UTC.
///
/// There is no zone database lookup: the offset never changes for daylight saving.
#[derive(Debug, Clone, Copy)]
pub struct TimeFormatter {
    offset_hours: i32,
    policy: ClockPolicy,
}

impl TimeFormatter {
    #[must_use]
    pub fn new(offset_hours: i32, policy: ClockPolicy) -> Self {
        Self {
            offset_hours,
            policy,
        }
    }

    /// Returns `None` when the timestamp or offset is outside chrono's range.
    #[must_use]
    pub fn format(&self, epoch_seconds: i64) -> Option<String> {
        let utc = DateTime::from_timestamp(epoch_seconds, 0)?;
        match self.policy {
            ClockPolicy::TwelveHour => {
                let offset = FixedOffset::east_opt(self.offset_hours * 3600)?;
                let (_, hour) = utc.with_timezone(&offset).hour12();
                Some(format!("{:02}:{:02}", hour, utc.minute()))
            }
            ClockPolicy::Legacy => {
                let hour = utc.hour() as i32 + self.offset_hours;
                let hours = if hour > 12 {
                    (hour - 12).to_string()
                } else {
                    format!("{hour:02}")
                };
                Some(format!("{}:{:02}", hours, utc.minute()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, "08:00")]
    #[case(11_220, "11:07")]
    #[case(14_400, "12:00")]
    #[case(37_800, "06:30")]
    #[case(50_400, "10:00")]
    #[case(57_900, "12:05")]
    #[case(63_900, "01:45")]
    #[case(86_340, "07:59")]
    fn twelve_hour_wraps_and_pads(#[case] epoch: i64, #[case] expected: &str) {
        let formatter = TimeFormatter::new(-4, ClockPolicy::TwelveHour);
        assert_eq!(formatter.format(epoch).unwrap(), expected);
    }

    #[rstest]
    #[case(0, "-4:00")]
    #[case(11_220, "-1:07")]
    #[case(14_400, "00:00")]
    #[case(37_800, "06:30")]
    #[case(50_400, "10:00")]
    #[case(57_900, "12:05")]
    #[case(63_900, "1:45")]
    #[case(86_340, "7:59")]
    fn legacy_keeps_negative_and_unpadded_hours(#[case] epoch: i64, #[case] expected: &str) {
        let formatter = TimeFormatter::new(-4, ClockPolicy::Legacy);
        assert_eq!(formatter.format(epoch).unwrap(), expected);
    }

    #[test]
    fn twelve_hour_is_always_two_digit_fields() {
        let formatter = TimeFormatter::new(-4, ClockPolicy::TwelveHour);
        // every minute of one day, starting at a real sunrise
        for epoch in (1_718_443_320..1_718_443_320 + 86_400).step_by(60) {
            let text = formatter.format(epoch).unwrap();
            let bytes = text.as_bytes();
            assert_eq!(bytes.len(), 5, "{text}");
            assert_eq!(bytes[2], b':', "{text}");
            let hour: u32 = text[..2].parse().unwrap();
            let minute: u32 = text[3..].parse().unwrap();
            assert!((1..=12).contains(&hour), "{text}");
            assert!(minute < 60, "{text}");
        }
    }

    #[test]
    fn other_offsets() {
        let formatter = TimeFormatter::new(5, ClockPolicy::TwelveHour);
        assert_eq!(formatter.format(0).unwrap(), "05:00");
    }

    #[test]
    fn out_of_range_timestamp() {
        let formatter = TimeFormatter::new(-4, ClockPolicy::TwelveHour);
        assert!(formatter.format(i64::MAX).is_none());
    }
}
