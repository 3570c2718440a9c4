//! Packed-decimal (BCD) dates as stored in directory entries.
//!
//! The target reads these eight bytes straight into its date structure, so the
//! field order here is the on-disk order.

use std::time::SystemTime;

use chrono::{DateTime, Datelike, Local, NaiveDateTime, TimeZone, Timelike};

/// Encoded size of a [`PackedDate`].
pub const PACKED_DATE_SIZE: usize = 8;

/// Convert a value into one BCD byte: tens in the high nibble, units in the low one.
///
/// Values above 99 are not rejected; only their last two decimal digits survive.
pub fn to_bcd(value: u32) -> u8 {
    ((((value / 10) % 10) << 4) | (value % 10)) as u8
}

/// Inverse of [`to_bcd`] for well-formed bytes.
pub fn from_bcd(byte: u8) -> u32 {
    u32::from(byte >> 4) * 10 + u32::from(byte & 0x0f)
}

/// A modification date in the target's BCD layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PackedDate {
    pub year_high: u8,
    pub year_low: u8,
    pub month: u8,
    pub day: u8,
    /// Day of week, 1..=7 starting on Sunday.
    pub weekday: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl PackedDate {
    /// Encode raw calendar fields. `year` is the full year (e.g. 2024).
    pub fn from_fields(
        year: u32,
        month: u32,
        day: u32,
        weekday: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Self {
        Self {
            year_high: to_bcd(year / 100),
            year_low: to_bcd(year % 100),
            month: to_bcd(month),
            day: to_bcd(day),
            weekday: to_bcd(weekday),
            hour: to_bcd(hour),
            minute: to_bcd(minute),
            second: to_bcd(second),
        }
    }

    pub fn from_naive(dt: &NaiveDateTime) -> Self {
        // chrono's year is signed; pre-epoch years are meaningless on the target anyway
        let year = dt.year().max(0) as u32;
        Self::from_fields(
            year,
            dt.month(),
            dt.day(),
            dt.weekday().number_from_sunday(),
            dt.hour(),
            dt.minute(),
            // leap seconds are reported as 59 + nanos; clamp into range
            dt.second().min(59),
        )
    }

    /// Encode the wall-clock reading of `dt` in its own time zone.
    pub fn from_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> Self {
        Self::from_naive(&dt.naive_local())
    }

    /// Encode a file-system timestamp using the host's local time zone.
    pub fn from_system_time(time: SystemTime) -> Self {
        let local: DateTime<Local> = time.into();
        Self::from_datetime(&local)
    }

    pub fn to_bytes(&self) -> [u8; PACKED_DATE_SIZE] {
        [
            self.year_high,
            self.year_low,
            self.month,
            self.day,
            self.weekday,
            self.hour,
            self.minute,
            self.second,
        ]
    }

    pub fn from_bytes(bytes: &[u8; PACKED_DATE_SIZE]) -> Self {
        Self {
            year_high: bytes[0],
            year_low: bytes[1],
            month: bytes[2],
            day: bytes[3],
            weekday: bytes[4],
            hour: bytes[5],
            minute: bytes[6],
            second: bytes[7],
        }
    }

    /// Full year decoded from the two year bytes.
    pub fn year(&self) -> u32 {
        from_bcd(self.year_high) * 100 + from_bcd(self.year_low)
    }
}

impl std::fmt::Display for PackedDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year(),
            from_bcd(self.month),
            from_bcd(self.day),
            from_bcd(self.hour),
            from_bcd(self.minute),
            from_bcd(self.second)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate};

    #[test]
    fn test_to_bcd_digits() {
        assert_eq!(to_bcd(0), 0x00);
        assert_eq!(to_bcd(7), 0x07);
        assert_eq!(to_bcd(42), 0x42);
        assert_eq!(to_bcd(99), 0x99);
    }

    #[test]
    fn test_to_bcd_out_of_range_keeps_last_two_digits() {
        assert_eq!(to_bcd(123), 0x23);
        assert_eq!(to_bcd(2024), 0x24);
    }

    #[test]
    fn test_known_date_encoding() {
        // 2024-03-07 is a Thursday
        let dt = NaiveDate::from_ymd_opt(2024, 3, 7)
            .and_then(|d| d.and_hms_opt(14, 5, 9))
            .unwrap();
        let packed = PackedDate::from_naive(&dt);
        assert_eq!(packed.to_bytes(), [0x20, 0x24, 0x03, 0x07, 0x05, 0x14, 0x05, 0x09]);
        assert_eq!(packed.to_string(), "2024-03-07 14:05:09");
    }

    #[test]
    fn test_weekday_starts_on_sunday() {
        let sunday = NaiveDate::from_ymd_opt(2024, 3, 3).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let saturday = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap().and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(PackedDate::from_naive(&sunday).weekday, 0x01);
        assert_eq!(PackedDate::from_naive(&saturday).weekday, 0x07);
    }

    #[test]
    fn test_datetime_uses_wall_clock_of_its_zone() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let dt = tz.with_ymd_and_hms(1999, 12, 31, 23, 59, 58).unwrap();
        let packed = PackedDate::from_datetime(&dt);
        assert_eq!(packed.year_high, 0x19);
        assert_eq!(packed.year_low, 0x99);
        assert_eq!(packed.hour, 0x23);
        assert_eq!(packed.second, 0x58);
    }

    #[test]
    fn test_bytes_layout_is_field_order() {
        let packed = PackedDate::from_fields(2001, 2, 3, 4, 5, 6, 7);
        let bytes = packed.to_bytes();
        assert_eq!(bytes, [0x20, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07]);
        assert_eq!(PackedDate::from_bytes(&bytes), packed);
        assert_eq!(packed.year(), 2001);
    }
}
