pub mod attendance;
pub mod auth;
pub mod departments;
pub mod documents;
pub mod employees;
pub mod leaves;
pub mod payrolls;
pub mod reviews;
pub mod shared;
pub mod stats;
