pub mod attendance;
pub mod department;
pub mod document;
pub mod employee;
pub mod leave;
pub mod payroll;
pub mod review;
pub mod stats;
pub mod user;

// Re-export all repositories for easy importing
pub use attendance::AttendanceRepository;
pub use department::DepartmentRepository;
pub use document::DocumentRepository;
pub use employee::EmployeeRepository;
pub use leave::LeaveRepository;
pub use payroll::PayrollRepository;
pub use review::ReviewRepository;
pub use stats::StatsRepository;
pub use user::UserRepository;
