pub mod permissions;
pub mod request_id;

pub use permissions::{PermissionGuard, RoutePermission};
pub use request_id::{RequestIdExt, RequestIdMiddleware, RequestIdMiddlewareService};
