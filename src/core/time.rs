use time::{format_description::well_known::Rfc3339, OffsetDateTime, PrimitiveDateTime, UtcOffset};

pub(crate) fn primitive_now_utc() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_utc();
    PrimitiveDateTime::new(now.date(), now.time())
}

pub(crate) fn to_primitive_utc(value: OffsetDateTime) -> PrimitiveDateTime {
    let utc = value.to_offset(UtcOffset::UTC);
    PrimitiveDateTime::new(utc.date(), utc.time())
}

pub(crate) fn format_primitive(value: PrimitiveDateTime) -> String {
    value.assume_utc().format(&Rfc3339).unwrap_or_else(|_| value.assume_utc().to_string())
}

/// Whole calendar days between two timestamps, ignoring the time of day.
/// Streak bookkeeping cares about dates, not 24-hour windows.
pub(crate) fn calendar_days_between(earlier: PrimitiveDateTime, later: PrimitiveDateTime) -> i64 {
    (later.date() - earlier.date()).whole_days()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{Date, Month, Time};

    fn at(year: i32, month: Month, day: u8, hour: u8) -> PrimitiveDateTime {
        let date = Date::from_calendar_date(year, month, day).unwrap();
        PrimitiveDateTime::new(date, Time::from_hms(hour, 0, 0).unwrap())
    }

    #[test]
    fn format_primitive_outputs_utc_z() {
        let value = at(2025, Month::January, 2, 10);
        assert_eq!(format_primitive(value), "2025-01-02T10:00:00Z");
    }

    #[test]
    fn calendar_days_ignore_time_of_day() {
        let late_evening = at(2025, Month::March, 1, 23);
        let early_morning = at(2025, Month::March, 2, 1);
        assert_eq!(calendar_days_between(late_evening, early_morning), 1);

        let same_day = at(2025, Month::March, 1, 1);
        assert_eq!(calendar_days_between(same_day, late_evening), 0);
    }

    #[test]
    fn to_primitive_utc_normalizes_offsets() {
        let date = Date::from_calendar_date(2025, Month::June, 10).unwrap();
        let utc = PrimitiveDateTime::new(date, Time::from_hms(12, 0, 0).unwrap()).assume_utc();
        let bogota = utc.to_offset(UtcOffset::from_hms(-5, 0, 0).unwrap());
        let expected = PrimitiveDateTime::new(date, Time::from_hms(12, 0, 0).unwrap());
        assert_eq!(to_primitive_utc(bogota), expected);
    }
}
