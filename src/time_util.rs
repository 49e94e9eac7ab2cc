use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

/// 格式化为天级日期字符串 YYYY-MM-DD
pub fn date_str(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d").to_string()
}

/// 当月第一天
pub fn month_start(dt: &DateTime<Utc>) -> String {
    format!("{:04}-{:02}-01", dt.year(), dt.month())
}

/// 下月第一天
pub fn next_month_start(dt: &DateTime<Utc>) -> String {
    if dt.month() == 12 {
        format!("{:04}-01-01", dt.year() + 1)
    } else {
        format!("{:04}-{:02}-01", dt.year(), dt.month() + 1)
    }
}

/// n天前的日期
pub fn days_ago(dt: &DateTime<Utc>, n: i64) -> String {
    (*dt - Duration::days(n)).format("%Y-%m-%d").to_string()
}

/// 把 YYYY-MM-DD 转成人类可读的月份, 如 "September 2026"
pub fn month_display(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(d) => d.format("%B %Y").to_string(),
        Err(_) => date.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_month_boundaries() {
        let dt = Utc.with_ymd_and_hms(2026, 8, 6, 10, 30, 0).unwrap();
        assert_eq!(month_start(&dt), "2026-08-01");
        assert_eq!(next_month_start(&dt), "2026-09-01");
        assert_eq!(date_str(&dt), "2026-08-06");
        assert_eq!(days_ago(&dt, 7), "2026-07-30");
    }

    #[test]
    fn test_year_rollover() {
        let dt = Utc.with_ymd_and_hms(2026, 12, 25, 9, 0, 0).unwrap();
        assert_eq!(next_month_start(&dt), "2027-01-01");
        assert_eq!(days_ago(&dt, 30), "2026-11-25");
    }

    #[test]
    fn test_month_display() {
        assert_eq!(month_display("2026-09-01"), "September 2026");
    }
}
