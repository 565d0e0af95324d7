pub mod attendance;
pub mod department;
pub mod document;
pub mod employee;
pub mod leave;
pub(crate) mod macros;
pub mod payroll;
pub mod review;
pub mod stats;
pub mod user;

// Re-export all models for easy importing
pub use attendance::*;
pub use department::*;
pub use document::*;
pub use employee::*;
pub use leave::*;
pub use payroll::*;
pub use review::*;
pub use stats::*;
pub use user::*;
