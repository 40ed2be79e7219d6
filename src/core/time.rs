use time::{format_description::well_known::Rfc3339, OffsetDateTime, PrimitiveDateTime};

pub(crate) fn primitive_now_utc() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_utc();
    PrimitiveDateTime::new(now.date(), now.time())
}

pub(crate) fn format_primitive(value: PrimitiveDateTime) -> String {
    value.assume_utc().format(&Rfc3339).unwrap_or_else(|_| value.assume_utc().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{Date, Time};

    #[test]
    fn format_primitive_renders_rfc3339_utc() {
        let date = Date::from_calendar_date(2026, time::Month::March, 14).unwrap();
        let time = Time::from_hms(9, 5, 0).unwrap();
        let value = PrimitiveDateTime::new(date, time);
        assert_eq!(format_primitive(value), "2026-03-14T09:05:00Z");
    }

    #[test]
    fn primitive_now_is_close_to_wall_clock() {
        let before = OffsetDateTime::now_utc().unix_timestamp();
        let now = primitive_now_utc().assume_utc().unix_timestamp();
        assert!((now - before).abs() <= 1);
    }
}
