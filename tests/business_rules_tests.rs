use chrono::{NaiveDate, NaiveTime, Utc};
use pretty_assertions::assert_eq;
use uuid::Uuid;

use ems_be::database::models::{AttendanceStatus, Leave, LeaveStatus, LeaveType, PayrollStatus};
use ems_be::services::attendance_rules::status_for_clock_in;
use ems_be::services::leave_policy::{
    allocation_days, compute_balance, ensure_deletable, ensure_editable, ensure_undecided,
    ranges_overlap,
};
use ems_be::services::payroll_rules::{compute_monthly_pay, net_salary};
use ems_be::services::workdays::{business_days, count_business_days, month_bounds};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn full_month_payroll_for_a_long_tenured_employee() {
    // April 2023: 20 weekdays, salary 4400, no absences
    let pay = compute_monthly_pay(4400.0, date(2023, 1, 1), 2023, 4, 0).unwrap();

    assert_eq!(pay.base_salary, 4400.0);
    assert_eq!(pay.allowances, 440.0);
    assert_eq!(pay.deductions, 0.0);
    assert_eq!(pay.tax, 726.0);
    assert_eq!(pay.net_salary, 4114.0);
}

#[test]
fn mid_month_joiner_is_prorated() {
    // Joined Monday 2023-04-17: 10 of the 20 weekdays remain
    let pay = compute_monthly_pay(4400.0, date(2023, 4, 17), 2023, 4, 0).unwrap();

    assert_eq!(pay.payable_days, 10);
    assert_eq!(pay.base_salary, 2200.0);
    assert_eq!(pay.net_salary, 2057.0);
}

#[test]
fn net_salary_identity_holds_across_inputs() {
    for (salary, absent) in [(3000.0, 0), (5210.0, 3), (12345.0, 7)] {
        let pay = compute_monthly_pay(salary, date(2022, 6, 1), 2023, 4, absent).unwrap();
        assert_eq!(
            pay.net_salary,
            net_salary(pay.base_salary, pay.allowances, pay.deductions, pay.tax)
        );
    }
}

#[test]
fn clock_in_status_flips_at_the_company_start_hour() {
    let before = NaiveTime::from_hms_opt(8, 59, 59).unwrap();
    let at = NaiveTime::from_hms_opt(9, 0, 0).unwrap();

    assert_eq!(status_for_clock_in(before), AttendanceStatus::Present);
    assert_eq!(status_for_clock_in(at), AttendanceStatus::Late);
}

#[test]
fn leave_approval_covers_exactly_the_weekdays() {
    // Thu 2023-04-13 through Tue 2023-04-18 spans one weekend
    let days: Vec<NaiveDate> = business_days(date(2023, 4, 13), date(2023, 4, 18)).collect();

    assert_eq!(
        days,
        vec![
            date(2023, 4, 13),
            date(2023, 4, 14),
            date(2023, 4, 17),
            date(2023, 4, 18),
        ]
    );
}

#[test]
fn yearly_balance_tracks_approved_weekday_usage() {
    let now = Utc::now();
    let leave = Leave {
        id: Uuid::new_v4(),
        employee_id: Uuid::new_v4(),
        leave_type: LeaveType::Annual,
        start_date: date(2023, 4, 17),
        end_date: date(2023, 4, 21),
        reason: "family trip".to_string(),
        status: LeaveStatus::Approved,
        comments: None,
        created_at: now,
        updated_at: now,
    };

    let balances = compute_balance(&[leave]);
    let annual = balances
        .iter()
        .find(|b| b.leave_type == LeaveType::Annual)
        .unwrap();

    assert_eq!(annual.allocated, allocation_days(LeaveType::Annual));
    assert_eq!(annual.used, 5);
    assert_eq!(annual.remaining, 15);
}

#[test]
fn month_bounds_and_weekday_counts_agree() {
    let (first, last) = month_bounds(2023, 4).unwrap();

    assert_eq!(first, date(2023, 4, 1));
    assert_eq!(last, date(2023, 4, 30));
    assert_eq!(count_business_days(first, last), 20);
}

#[test]
fn second_request_over_an_existing_range_is_an_overlap() {
    // Existing request 2023-05-08..=2023-05-12
    let (start, end) = (date(2023, 5, 8), date(2023, 5, 12));

    assert!(ranges_overlap(start, end, date(2023, 5, 10), date(2023, 5, 16)));
    assert!(ranges_overlap(start, end, date(2023, 5, 12), date(2023, 5, 12)));
    assert!(!ranges_overlap(start, end, date(2023, 5, 15), date(2023, 5, 19)));
}

#[test]
fn decided_leave_requests_reject_further_changes() {
    use ems_be::error::AppError;

    for status in [LeaveStatus::Approved, LeaveStatus::Rejected] {
        assert!(matches!(
            ensure_editable(status),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            ensure_undecided(status),
            Err(AppError::InvalidInput(_))
        ));
    }

    assert!(ensure_deletable(LeaveStatus::Rejected).is_ok());
    assert!(matches!(
        ensure_deletable(LeaveStatus::Approved),
        Err(AppError::InvalidInput(_))
    ));
}

#[test]
fn payroll_lifecycle_only_moves_forward() {
    let order = [
        PayrollStatus::Draft,
        PayrollStatus::Processed,
        PayrollStatus::Paid,
    ];

    for pair in order.windows(2) {
        assert!(pair[0].rank() < pair[1].rank());
    }
}
