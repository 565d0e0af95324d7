use chrono::NaiveDate;

use crate::database::models::{Leave, LeaveStatus, LeaveType, LeaveTypeBalance};
use crate::error::AppError;
use crate::services::workdays::count_business_days;

/// Inclusive date ranges overlap when each starts no later than the other
/// ends. The repository's overlap query runs the same comparison in SQL.
pub fn ranges_overlap(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    a_start <= b_end && a_end >= b_start
}

/// A request may only be edited while it is still pending.
pub fn ensure_editable(status: LeaveStatus) -> Result<(), AppError> {
    if status != LeaveStatus::Pending {
        return Err(AppError::InvalidInput(format!(
            "Only pending requests can be edited, this one is {}",
            status
        )));
    }
    Ok(())
}

/// Approval and rejection happen exactly once.
pub fn ensure_undecided(status: LeaveStatus) -> Result<(), AppError> {
    if status != LeaveStatus::Pending {
        return Err(AppError::InvalidInput(format!(
            "Leave request is already {}",
            status
        )));
    }
    Ok(())
}

/// Approved requests have attendance rows behind them; removing the
/// request would orphan those.
pub fn ensure_deletable(status: LeaveStatus) -> Result<(), AppError> {
    if status == LeaveStatus::Approved {
        return Err(AppError::InvalidInput(
            "Approved leave requests cannot be deleted".to_string(),
        ));
    }
    Ok(())
}

/// Fixed yearly allocation per leave type, in days. Static company policy,
/// not configuration.
pub fn allocation_days(leave_type: LeaveType) -> i64 {
    match leave_type {
        LeaveType::Annual => 20,
        LeaveType::Sick => 10,
        LeaveType::Maternity => 90,
        LeaveType::Paternity => 10,
        LeaveType::Unpaid => 30,
    }
}

/// Weekday-only length of a single leave request.
pub fn leave_days(leave: &Leave) -> i64 {
    count_business_days(leave.start_date, leave.end_date) as i64
}

/// Per-type used/allocated/remaining over a year's approved requests.
/// Remaining may go negative; no clamping.
pub fn compute_balance(approved: &[Leave]) -> Vec<LeaveTypeBalance> {
    LeaveType::ALL
        .iter()
        .map(|&leave_type| {
            let used: i64 = approved
                .iter()
                .filter(|leave| leave.leave_type == leave_type)
                .map(leave_days)
                .sum();
            let allocated = allocation_days(leave_type);
            LeaveTypeBalance {
                leave_type,
                allocated,
                used,
                remaining: allocated - used,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    use super::*;
    use crate::database::models::LeaveStatus;

    fn approved_leave(leave_type: LeaveType, start: (u32, u32), end: (u32, u32)) -> Leave {
        let now = Utc::now();
        Leave {
            id: Uuid::new_v4(),
            employee_id: Uuid::new_v4(),
            leave_type,
            start_date: NaiveDate::from_ymd_opt(2023, start.0, start.1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2023, end.0, end.1).unwrap(),
            reason: "test".to_string(),
            status: LeaveStatus::Approved,
            comments: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn balance_for(balances: &[LeaveTypeBalance], leave_type: LeaveType) -> &LeaveTypeBalance {
        balances
            .iter()
            .find(|b| b.leave_type == leave_type)
            .unwrap()
    }

    #[test]
    fn five_weekday_annual_leave_leaves_fifteen_remaining() {
        // Mon 2023-04-17 through Fri 2023-04-21
        let leaves = vec![approved_leave(LeaveType::Annual, (4, 17), (4, 21))];
        let balances = compute_balance(&leaves);

        let annual = balance_for(&balances, LeaveType::Annual);
        assert_eq!(annual.allocated, 20);
        assert_eq!(annual.used, 5);
        assert_eq!(annual.remaining, 15);
    }

    #[test]
    fn weekends_inside_a_request_do_not_count() {
        // Fri 2023-04-14 through Mon 2023-04-17: two weekdays
        let leaves = vec![approved_leave(LeaveType::Sick, (4, 14), (4, 17))];
        let balances = compute_balance(&leaves);

        assert_eq!(balance_for(&balances, LeaveType::Sick).used, 2);
    }

    #[test]
    fn remaining_goes_negative_without_clamping() {
        // Three full weeks of paternity leave against a 10-day allocation
        let leaves = vec![approved_leave(LeaveType::Paternity, (5, 1), (5, 19))];
        let balances = compute_balance(&leaves);

        let paternity = balance_for(&balances, LeaveType::Paternity);
        assert_eq!(paternity.used, 15);
        assert_eq!(paternity.remaining, -5);
    }

    #[test]
    fn every_type_is_reported_even_when_unused() {
        let balances = compute_balance(&[]);
        assert_eq!(balances.len(), LeaveType::ALL.len());
        assert!(balances.iter().all(|b| b.used == 0 && b.remaining == b.allocated));
    }

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, m, day).unwrap()
    }

    #[test]
    fn overlapping_ranges_are_detected() {
        // Existing 2023-04-10..=2023-04-14, new request starts inside it
        assert!(ranges_overlap(d(4, 10), d(4, 14), d(4, 12), d(4, 18)));
        // Containment counts too
        assert!(ranges_overlap(d(4, 10), d(4, 14), d(4, 11), d(4, 12)));
        // Single shared boundary day still overlaps (ranges are inclusive)
        assert!(ranges_overlap(d(4, 10), d(4, 14), d(4, 14), d(4, 20)));
    }

    #[test]
    fn disjoint_ranges_do_not_overlap() {
        assert!(!ranges_overlap(d(4, 10), d(4, 14), d(4, 15), d(4, 20)));
        assert!(!ranges_overlap(d(4, 15), d(4, 20), d(4, 10), d(4, 14)));
    }

    #[test]
    fn only_pending_requests_can_be_edited() {
        assert!(ensure_editable(LeaveStatus::Pending).is_ok());
        assert!(matches!(
            ensure_editable(LeaveStatus::Approved),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            ensure_editable(LeaveStatus::Rejected),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn requests_are_decided_exactly_once() {
        assert!(ensure_undecided(LeaveStatus::Pending).is_ok());
        assert!(matches!(
            ensure_undecided(LeaveStatus::Approved),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            ensure_undecided(LeaveStatus::Rejected),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn approved_requests_cannot_be_deleted() {
        assert!(ensure_deletable(LeaveStatus::Pending).is_ok());
        assert!(ensure_deletable(LeaveStatus::Rejected).is_ok());
        assert!(matches!(
            ensure_deletable(LeaveStatus::Approved),
            Err(AppError::InvalidInput(_))
        ));
    }
}
