use chrono::NaiveDate;

use crate::services::workdays::{count_business_days, month_bounds};

/// Flat allowance granted on top of the prorated base salary.
pub const ALLOWANCE_RATE: f64 = 0.10;
/// Tax applied to base salary plus allowances.
pub const TAX_RATE: f64 = 0.15;

#[derive(Debug, Clone, PartialEq)]
pub struct PayrollBreakdown {
    pub total_working_days: u32,
    pub payable_days: u32,
    pub base_salary: f64,
    pub allowances: f64,
    pub deductions: f64,
    pub tax: f64,
    pub net_salary: f64,
}

/// Derive one month's pay from the contract salary, the join date and the
/// number of absent days recorded that month.
///
/// Base salary is prorated over the month's working days (Mon-Fri): an
/// employee who joined mid-month is paid from the join date through the end
/// of the month. Each absent day deducts one daily rate. Returns `None`
/// when the employee was not yet employed that month or the month has no
/// working days.
pub fn compute_monthly_pay(
    monthly_salary: f64,
    date_of_joining: NaiveDate,
    year: i32,
    month: u32,
    absent_days: u32,
) -> Option<PayrollBreakdown> {
    let (first_day, last_day) = month_bounds(year, month)?;
    if date_of_joining > last_day {
        return None;
    }

    let total_working_days = count_business_days(first_day, last_day);
    if total_working_days == 0 {
        return None;
    }

    let payable_from = date_of_joining.max(first_day);
    let payable_days = count_business_days(payable_from, last_day);

    let daily_rate = monthly_salary / total_working_days as f64;
    let base_salary = (daily_rate * payable_days as f64).round();
    let allowances = (base_salary * ALLOWANCE_RATE).round();
    let deductions = (daily_rate * absent_days as f64).round();
    let taxable_income = base_salary + allowances;
    let tax = (taxable_income * TAX_RATE).round();

    Some(PayrollBreakdown {
        total_working_days,
        payable_days,
        base_salary,
        allowances,
        deductions,
        tax,
        net_salary: net_salary(base_salary, allowances, deductions, tax),
    })
}

pub fn net_salary(base_salary: f64, allowances: f64, deductions: f64, tax: f64) -> f64 {
    base_salary + allowances - deductions - tax
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
    fn full_month_no_absences() {
        // April 2023 has 20 weekdays; salary 4400 -> daily rate 220
        let pay = compute_monthly_pay(4400.0, d(2023, 1, 1), 2023, 4, 0).unwrap();

        assert_eq!(pay.total_working_days, 20);
        assert_eq!(pay.payable_days, 20);
        assert_eq!(pay.base_salary, 4400.0);
        assert_eq!(pay.allowances, 440.0);
        assert_eq!(pay.deductions, 0.0);
        assert_eq!(pay.tax, 726.0);
        assert_eq!(pay.net_salary, 4114.0);
    }

    #[test]
    fn mid_month_join_prorates_base_salary() {
        // Joined Monday 2023-04-17: 10 of April's 20 weekdays remain
        let pay = compute_monthly_pay(4400.0, d(2023, 4, 17), 2023, 4, 0).unwrap();

        assert_eq!(pay.payable_days, 10);
        assert_eq!(pay.base_salary, 2200.0);
        assert_eq!(pay.allowances, 220.0);
        assert_eq!(pay.tax, 363.0);
        assert_eq!(pay.net_salary, 2057.0);
    }

    #[test]
    fn absences_deduct_the_daily_rate() {
        let pay = compute_monthly_pay(4400.0, d(2023, 1, 1), 2023, 4, 2).unwrap();

        assert_eq!(pay.deductions, 440.0);
        assert_eq!(pay.net_salary, 4400.0 + 440.0 - 440.0 - 726.0);
    }

    #[test]
    fn joined_after_month_end_yields_none() {
        assert_eq!(compute_monthly_pay(4400.0, d(2023, 5, 1), 2023, 4, 0), None);
    }

    #[test]
    fn net_is_base_plus_allowances_minus_deductions_minus_tax() {
        let pay = compute_monthly_pay(5210.0, d(2022, 11, 3), 2023, 4, 1).unwrap();
        assert_eq!(
            pay.net_salary,
            net_salary(pay.base_salary, pay.allowances, pay.deductions, pay.tax)
        );
    }
}
