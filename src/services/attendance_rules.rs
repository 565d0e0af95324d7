use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::database::models::AttendanceStatus;

/// Hour of day the working day starts. Clocking in at or after this hour
/// marks the record late; leave-synced records pin their clock-in here.
pub const COMPANY_START_HOUR: u32 = 9;

pub fn company_start_time() -> NaiveTime {
    NaiveTime::from_hms_opt(COMPANY_START_HOUR, 0, 0).expect("valid start hour")
}

/// Status derived from the wall-clock time of a clock-in.
pub fn status_for_clock_in(time: NaiveTime) -> AttendanceStatus {
    if time >= company_start_time() {
        AttendanceStatus::Late
    } else {
        AttendanceStatus::Present
    }
}

/// Clock-in timestamp for an attendance row created by leave approval.
pub fn leave_day_clock_in(day: NaiveDate) -> NaiveDateTime {
    day.and_time(company_start_time())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn clock_in_before_start_hour_is_present() {
        let t = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
        assert_eq!(status_for_clock_in(t), AttendanceStatus::Present);
    }

    #[test]
    fn clock_in_at_start_hour_is_late() {
        let t = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        assert_eq!(status_for_clock_in(t), AttendanceStatus::Late);
    }

    #[test]
    fn clock_in_after_start_hour_is_late() {
        let t = NaiveTime::from_hms_opt(9, 30, 0).unwrap();
        assert_eq!(status_for_clock_in(t), AttendanceStatus::Late);
    }
}
