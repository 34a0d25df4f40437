use core::{
    fmt::{Display, Formatter},
    time::Duration,
};
use serde::{Deserialize, Serialize};

/// Largest representable count of tenths, the display maximum of 99:59.9
/// (ten-minutes 9, minutes 9, ten-seconds 5, seconds 9, tenths 9).
pub const MAX_TENTHS: u16 = 59_999;

/// A scoreboard countdown value, stored as a count of tenths of a second.
///
/// The five-digit display form is a pure decomposition of the count, so the
/// two representations can never fall out of sync.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ClockTime {
    tenths: u16,
}

impl ClockTime {
    pub const ZERO: Self = Self { tenths: 0 };

    pub const fn from_tenths(tenths: u16) -> Self {
        let tenths = if tenths > MAX_TENTHS {
            MAX_TENTHS
        } else {
            tenths
        };
        Self { tenths }
    }

    pub const fn from_secs(secs: u16) -> Self {
        Self::from_tenths(secs.saturating_mul(10))
    }

    /// Converts a wall-clock duration, truncating to whole tenths and
    /// clamping to the display maximum.
    pub fn from_duration(duration: Duration) -> Self {
        let tenths = duration.as_millis() / 100;
        if tenths > MAX_TENTHS as u128 {
            Self { tenths: MAX_TENTHS }
        } else {
            Self {
                tenths: tenths as u16,
            }
        }
    }

    pub const fn to_duration(self) -> Duration {
        Duration::from_millis(self.tenths as u64 * 100)
    }

    pub const fn as_tenths(self) -> u16 {
        self.tenths
    }

    pub const fn is_zero(self) -> bool {
        self.tenths == 0
    }

    /// Counts down by exactly one tenth of a second, saturating at zero.
    pub const fn decrement_tenth(self) -> Self {
        Self {
            tenths: self.tenths.saturating_sub(1),
        }
    }

    /// Decomposes into the five displayed digit fields.
    pub const fn digits(self) -> ClockDigits {
        let mut rem = self.tenths;
        let ten_minutes = (rem / 6000) as u8;
        rem %= 6000;
        let minutes = (rem / 600) as u8;
        rem %= 600;
        let ten_seconds = (rem / 100) as u8;
        rem %= 100;
        let seconds = (rem / 10) as u8;
        let tenth_seconds = (rem % 10) as u8;
        ClockDigits {
            ten_minutes,
            minutes,
            ten_seconds,
            seconds,
            tenth_seconds,
        }
    }
}

impl Display for ClockTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        let d = self.digits();
        if self.tenths < 600 {
            write!(
                f,
                "{}.{}",
                d.ten_seconds as u16 * 10 + d.seconds as u16,
                d.tenth_seconds
            )
        } else {
            write!(
                f,
                "{}:{}{}",
                d.ten_minutes as u16 * 10 + d.minutes as u16,
                d.ten_seconds,
                d.seconds
            )
        }
    }
}

/// The five-digit display decomposition of a [`ClockTime`].
///
/// `ten_seconds` is a clock-face digit, 0 through 5, representing 0-50
/// seconds; it is not a plain base-10 tens digit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClockDigits {
    pub ten_minutes: u8,
    pub minutes: u8,
    pub ten_seconds: u8,
    pub seconds: u8,
    pub tenth_seconds: u8,
}

impl ClockDigits {
    /// Recomposes the digit fields into a [`ClockTime`]. Returns `None` if
    /// any field is out of range, notably a ten-seconds digit above 5.
    pub const fn try_compose(self) -> Option<ClockTime> {
        if self.ten_minutes > 9
            || self.minutes > 9
            || self.ten_seconds > 5
            || self.seconds > 9
            || self.tenth_seconds > 9
        {
            return None;
        }
        Some(ClockTime {
            tenths: self.ten_minutes as u16 * 6000
                + self.minutes as u16 * 600
                + self.ten_seconds as u16 * 100
                + self.seconds as u16 * 10
                + self.tenth_seconds as u16,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_decrement_is_idempotent_at_zero() {
        assert_eq!(ClockTime::ZERO.decrement_tenth(), ClockTime::ZERO);
        assert_eq!(
            ClockTime::ZERO.decrement_tenth().decrement_tenth(),
            ClockTime::ZERO
        );
    }

    #[test]
    fn test_decrement_drops_exactly_one_tenth() {
        for tenths in [1u16, 9, 10, 99, 100, 599, 600, 6000, MAX_TENTHS] {
            let time = ClockTime::from_tenths(tenths);
            assert_eq!(time.decrement_tenth().as_tenths(), tenths - 1);
        }
    }

    #[test]
    fn test_borrow_chain_at_minute_boundary() {
        // 1:00.0 counts down to 0:59.9, with the ten-seconds digit
        // borrowing to 5, never 9
        let one_minute = ClockTime::from_secs(60);
        let next = one_minute.decrement_tenth();
        assert_eq!(
            next.digits(),
            ClockDigits {
                ten_minutes: 0,
                minutes: 0,
                ten_seconds: 5,
                seconds: 9,
                tenth_seconds: 9,
            }
        );

        // 10:00.0 counts down to 9:59.9
        let ten_minutes = ClockTime::from_secs(600);
        assert_eq!(
            ten_minutes.decrement_tenth().digits(),
            ClockDigits {
                ten_minutes: 0,
                minutes: 9,
                ten_seconds: 5,
                seconds: 9,
                tenth_seconds: 9,
            }
        );
    }

    #[test]
    fn test_ten_seconds_digit_never_exceeds_five() {
        let mut time = ClockTime::from_secs(125);
        while !time.is_zero() {
            assert!(time.digits().ten_seconds <= 5, "failed at {time:?}");
            time = time.decrement_tenth();
        }
    }

    #[test]
    fn test_digits_round_trip() {
        for tenths in (0..=MAX_TENTHS).step_by(7) {
            let time = ClockTime::from_tenths(tenths);
            assert_eq!(time.digits().try_compose(), Some(time));
        }
    }

    #[test]
    fn test_compose_rejects_invalid_fields() {
        let bad_tens = ClockDigits {
            ten_seconds: 6,
            ..Default::default()
        };
        assert_eq!(bad_tens.try_compose(), None);

        let bad_seconds = ClockDigits {
            seconds: 10,
            ..Default::default()
        };
        assert_eq!(bad_seconds.try_compose(), None);
    }

    #[test]
    fn test_from_duration_truncates() {
        assert_eq!(
            ClockTime::from_duration(Duration::from_millis(199)),
            ClockTime::from_tenths(1)
        );
        assert_eq!(
            ClockTime::from_duration(Duration::from_secs(24)),
            ClockTime::from_secs(24)
        );
        assert_eq!(
            ClockTime::from_duration(Duration::from_secs(7200)),
            ClockTime::from_tenths(MAX_TENTHS)
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(ClockTime::from_secs(600).to_string(), "10:00");
        assert_eq!(ClockTime::from_tenths(4807).to_string(), "8:00");
        assert_eq!(ClockTime::from_tenths(599).to_string(), "59.9");
        assert_eq!(ClockTime::from_tenths(3).to_string(), "0.3");
    }
}
