use chrono::{Datelike, Days, Months, NaiveDate, Weekday};

/// Lazy iterator over the business days (Mon-Fri) in an inclusive date
/// range. The bounds are plain values, so the sequence is restartable by
/// cloning before iteration.
#[derive(Debug, Clone)]
pub struct BusinessDays {
    cursor: Option<NaiveDate>,
    end: NaiveDate,
}

impl Iterator for BusinessDays {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        loop {
            let day = self.cursor?;
            if day > self.end {
                self.cursor = None;
                return None;
            }
            self.cursor = day.checked_add_days(Days::new(1));
            if !is_weekend(day) {
                return Some(day);
            }
        }
    }
}

pub fn is_weekend(day: NaiveDate) -> bool {
    matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Business days in `[start, end]` inclusive. Empty when `start > end`.
pub fn business_days(start: NaiveDate, end: NaiveDate) -> BusinessDays {
    BusinessDays {
        cursor: Some(start),
        end,
    }
}

pub fn count_business_days(start: NaiveDate, end: NaiveDate) -> u32 {
    business_days(start, end).count() as u32
}

/// First and last calendar day of a month; `None` for an invalid month.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last = first.checked_add_months(Months::new(1))?.pred_opt()?;
    Some((first, last))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn april_2023_has_twenty_weekdays() {
        let (first, last) = month_bounds(2023, 4).unwrap();
        assert_eq!(first, d(2023, 4, 1));
        assert_eq!(last, d(2023, 4, 30));
        assert_eq!(count_business_days(first, last), 20);
    }

    #[test]
    fn full_week_yields_monday_through_friday() {
        // 2023-04-17 is a Monday, 2023-04-23 a Sunday
        let days: Vec<NaiveDate> = business_days(d(2023, 4, 17), d(2023, 4, 23)).collect();
        assert_eq!(
            days,
            vec![
                d(2023, 4, 17),
                d(2023, 4, 18),
                d(2023, 4, 19),
                d(2023, 4, 20),
                d(2023, 4, 21),
            ]
        );
    }

    #[test]
    fn weekend_only_range_is_empty() {
        assert_eq!(count_business_days(d(2023, 4, 22), d(2023, 4, 23)), 0);
    }

    #[test]
    fn inverted_range_is_empty() {
        assert_eq!(count_business_days(d(2023, 4, 10), d(2023, 4, 3)), 0);
    }

    #[test]
    fn single_weekday_counts_itself() {
        assert_eq!(count_business_days(d(2023, 4, 19), d(2023, 4, 19)), 1);
    }

    #[test]
    fn iterator_is_restartable_via_clone() {
        let iter = business_days(d(2023, 4, 17), d(2023, 4, 21));
        let first_pass: Vec<_> = iter.clone().collect();
        let second_pass: Vec<_> = iter.collect();
        assert_eq!(first_pass, second_pass);
    }

    #[test]
    fn month_bounds_rejects_invalid_month() {
        assert_eq!(month_bounds(2023, 13), None);
    }
}
