pub mod attendance_rules;
pub mod auth;
pub mod leave_policy;
pub mod payroll_rules;
pub mod workdays;

pub use auth::{AuthService, Claims};
