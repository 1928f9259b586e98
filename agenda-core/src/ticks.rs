//! Conversion between local timestamps and 100-nanosecond ticks.
//!
//! Ticks count 100 ns intervals since 0001-01-01T00:00:00, which is the unit
//! used in the appointment file. Valid values cover 0001-01-01 through the end
//! of 9999-12-31.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::error::{StoreError, StoreResult};

pub const TICKS_PER_SECOND: i64 = 10_000_000;
pub const TICKS_PER_DAY: i64 = TICKS_PER_SECOND * 86_400;

/// Largest representable tick value (9999-12-31T23:59:59.9999999).
pub const MAX_TICKS: i64 = 3_155_378_975_999_999_999;

const NANOS_PER_TICK: u32 = 100;

/// Convert a timestamp to ticks.
pub fn to_ticks(dt: &NaiveDateTime) -> StoreResult<i64> {
    let days = i64::from(dt.date().num_days_from_ce()) - 1;
    let seconds = i64::from(dt.time().num_seconds_from_midnight());
    let sub_ticks = i64::from(dt.time().nanosecond().min(999_999_999) / NANOS_PER_TICK);

    let ticks = days
        .checked_mul(TICKS_PER_DAY)
        .and_then(|t| t.checked_add(seconds * TICKS_PER_SECOND + sub_ticks))
        .filter(|t| (0..=MAX_TICKS).contains(t))
        .ok_or(StoreError::TimestampOutOfRange(*dt))?;

    Ok(ticks)
}

/// Convert ticks back to a timestamp.
pub fn from_ticks(ticks: i64) -> StoreResult<NaiveDateTime> {
    if !(0..=MAX_TICKS).contains(&ticks) {
        return Err(StoreError::InvalidTicks(ticks));
    }

    let days = ticks / TICKS_PER_DAY;
    let rem = ticks % TICKS_PER_DAY;

    let date = i32::try_from(days + 1)
        .ok()
        .and_then(NaiveDate::from_num_days_from_ce_opt)
        .ok_or(StoreError::InvalidTicks(ticks))?;

    let seconds = (rem / TICKS_PER_SECOND) as u32;
    let nanos = (rem % TICKS_PER_SECOND) as u32 * NANOS_PER_TICK;
    let time = NaiveTime::from_num_seconds_from_midnight_opt(seconds, nanos)
        .ok_or(StoreError::InvalidTicks(ticks))?;

    Ok(date.and_time(time))
}

/// Drop precision below one tick so a timestamp survives a save/load cycle unchanged.
pub fn truncate(dt: NaiveDateTime) -> NaiveDateTime {
    let nanos = dt.nanosecond().min(999_999_999);
    dt.with_nanosecond(nanos - nanos % NANOS_PER_TICK).unwrap_or(dt)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn epoch_is_zero() {
        assert_eq!(to_ticks(&at(1, 1, 1, 0, 0, 0)).unwrap(), 0);
        assert_eq!(from_ticks(0).unwrap(), at(1, 1, 1, 0, 0, 0));
    }

    #[test]
    fn known_dotnet_values() {
        // DateTime(2000, 1, 1).Ticks and DateTime(2024, 1, 2, 9, 0, 0).Ticks
        assert_eq!(to_ticks(&at(2000, 1, 1, 0, 0, 0)).unwrap(), 630_822_816_000_000_000);
        assert_eq!(to_ticks(&at(2024, 1, 2, 9, 0, 0)).unwrap(), 638_397_828_000_000_000);
        assert_eq!(from_ticks(630_822_816_000_000_000).unwrap(), at(2000, 1, 1, 0, 0, 0));
    }

    #[test]
    fn max_value_round_trips() {
        let max = from_ticks(MAX_TICKS).unwrap();
        assert_eq!(max.date(), NaiveDate::from_ymd_opt(9999, 12, 31).unwrap());
        assert_eq!(max.nanosecond(), 999_999_900);
        assert_eq!(to_ticks(&max).unwrap(), MAX_TICKS);
    }

    #[test]
    fn sub_second_precision_round_trips() {
        let dt = at(2024, 1, 2, 23, 59, 59).with_nanosecond(999_000_000).unwrap();
        assert_eq!(from_ticks(to_ticks(&dt).unwrap()).unwrap(), dt);
    }

    #[test]
    fn rejects_out_of_range_ticks() {
        assert!(matches!(from_ticks(-1), Err(StoreError::InvalidTicks(-1))));
        assert!(from_ticks(MAX_TICKS + 1).is_err());
    }

    #[test]
    fn rejects_unrepresentable_timestamps() {
        let year_10000 = at(10_000, 1, 1, 0, 0, 0);
        assert!(matches!(
            to_ticks(&year_10000),
            Err(StoreError::TimestampOutOfRange(dt)) if dt == year_10000
        ));

        // Large enough to overflow the tick arithmetic itself
        let far = at(262_000, 1, 1, 0, 0, 0);
        assert!(matches!(to_ticks(&far), Err(StoreError::TimestampOutOfRange(_))));

        let before_epoch = at(0, 12, 31, 23, 59, 59);
        assert!(matches!(to_ticks(&before_epoch), Err(StoreError::TimestampOutOfRange(_))));
    }

    #[test]
    fn truncate_drops_sub_tick_nanos() {
        let dt = at(2024, 1, 2, 9, 0, 0).with_nanosecond(123_456_789).unwrap();
        assert_eq!(truncate(dt).nanosecond(), 123_456_700);
    }
}
