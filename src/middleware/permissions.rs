use std::future::{Ready, ready};

use actix_web::{
    Error,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    web::Data,
};
use futures_util::future::LocalBoxFuture;

use crate::config::Config;
use crate::database::models::UserRole;
use crate::error::AppError;
use crate::services::auth::claims_from_request;

/// One row of the static permission table: HTTP method plus an actix-style
/// path pattern (`{...}` segments match anything) and the roles allowed
/// through.
pub struct RoutePermission {
    pub method: &'static str,
    pub pattern: &'static str,
    pub allowed: &'static [UserRole],
}

const HR: &[UserRole] = &[UserRole::Admin, UserRole::Hr];
const PAYROLL: &[UserRole] = &[UserRole::Admin, UserRole::Hr, UserRole::Cfo];
const ANY: &[UserRole] = UserRole::ALL;

/// Endpoints reachable without a bearer token.
pub const PUBLIC_ROUTES: &[(&str, &str)] = &[
    ("POST", "/api/v1/auth/register"),
    ("POST", "/api/v1/auth/login"),
];

/// Role gates per route. First match wins; routes not listed here only
/// require authentication. Record-level scoping (employees seeing only
/// their own rows) stays in the handlers.
pub static ROUTE_PERMISSIONS: &[RoutePermission] = &[
    // Departments: reads are open to any authenticated caller
    RoutePermission { method: "POST", pattern: "/api/v1/departments", allowed: HR },
    RoutePermission { method: "PATCH", pattern: "/api/v1/departments/{id}", allowed: HR },
    RoutePermission { method: "DELETE", pattern: "/api/v1/departments/{id}", allowed: HR },
    // Employees
    RoutePermission { method: "POST", pattern: "/api/v1/employees", allowed: HR },
    RoutePermission { method: "PATCH", pattern: "/api/v1/employees/{id}", allowed: HR },
    RoutePermission { method: "DELETE", pattern: "/api/v1/employees/{id}", allowed: HR },
    // Attendance: clock-in/out is for everyone, direct ledger writes are HR
    RoutePermission { method: "POST", pattern: "/api/v1/attendance/clock-in", allowed: ANY },
    RoutePermission { method: "POST", pattern: "/api/v1/attendance/clock-out/{employee_id}", allowed: ANY },
    RoutePermission { method: "GET", pattern: "/api/v1/attendance/statistics", allowed: HR },
    RoutePermission { method: "POST", pattern: "/api/v1/attendance", allowed: HR },
    RoutePermission { method: "PATCH", pattern: "/api/v1/attendance/{id}", allowed: HR },
    RoutePermission { method: "DELETE", pattern: "/api/v1/attendance/{id}", allowed: HR },
    // Leaves: anyone may file and read (self-scoped); deciding is HR
    RoutePermission { method: "PATCH", pattern: "/api/v1/leaves/{id}/status", allowed: HR },
    RoutePermission { method: "GET", pattern: "/api/v1/leaves/statistics", allowed: HR },
    // Payrolls: CFO joins HR; employees only get their own payslips
    RoutePermission { method: "GET", pattern: "/api/v1/payrolls/my", allowed: ANY },
    RoutePermission { method: "GET", pattern: "/api/v1/payrolls/statistics", allowed: PAYROLL },
    RoutePermission { method: "POST", pattern: "/api/v1/payrolls/generate", allowed: PAYROLL },
    RoutePermission { method: "POST", pattern: "/api/v1/payrolls", allowed: PAYROLL },
    RoutePermission { method: "GET", pattern: "/api/v1/payrolls", allowed: PAYROLL },
    RoutePermission { method: "GET", pattern: "/api/v1/payrolls/{id}", allowed: PAYROLL },
    RoutePermission { method: "PATCH", pattern: "/api/v1/payrolls/{id}/status", allowed: PAYROLL },
    RoutePermission { method: "PATCH", pattern: "/api/v1/payrolls/{id}", allowed: PAYROLL },
    RoutePermission { method: "DELETE", pattern: "/api/v1/payrolls/{id}", allowed: PAYROLL },
    // Documents
    RoutePermission { method: "GET", pattern: "/api/v1/documents/statistics", allowed: HR },
    RoutePermission { method: "POST", pattern: "/api/v1/documents", allowed: HR },
    RoutePermission { method: "DELETE", pattern: "/api/v1/documents/{id}", allowed: HR },
    // Reviews
    RoutePermission { method: "GET", pattern: "/api/v1/reviews/statistics", allowed: HR },
    RoutePermission { method: "POST", pattern: "/api/v1/reviews", allowed: HR },
    RoutePermission { method: "PATCH", pattern: "/api/v1/reviews/{id}", allowed: HR },
    RoutePermission { method: "DELETE", pattern: "/api/v1/reviews/{id}", allowed: HR },
    // Dashboard
    RoutePermission { method: "GET", pattern: "/api/v1/stats/dashboard", allowed: HR },
];

fn pattern_matches(pattern: &str, path: &str) -> bool {
    let path = path.trim_end_matches('/');
    let mut pattern_segments = pattern.split('/');
    let mut path_segments = path.split('/');

    loop {
        match (pattern_segments.next(), path_segments.next()) {
            (None, None) => return true,
            (Some(p), Some(s)) if p.starts_with('{') && p.ends_with('}') => {
                if s.is_empty() {
                    return false;
                }
            }
            (Some(p), Some(s)) if p == s => {}
            _ => return false,
        }
    }
}

pub fn is_public(method: &str, path: &str) -> bool {
    PUBLIC_ROUTES
        .iter()
        .any(|(m, pattern)| *m == method && pattern_matches(pattern, path))
}

/// Roles allowed for a route, or `None` when the route carries no explicit
/// gate (authentication still required).
pub fn required_roles(method: &str, path: &str) -> Option<&'static [UserRole]> {
    ROUTE_PERMISSIONS
        .iter()
        .find(|p| p.method == method && pattern_matches(p.pattern, path))
        .map(|p| p.allowed)
}

/// Bearer-token + role gate over the whole API scope, driven by the static
/// table above.
pub struct PermissionGuard;

impl<S, B> Transform<S, ServiceRequest> for PermissionGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = PermissionGuardService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(PermissionGuardService { service }))
    }
}

pub struct PermissionGuardService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for PermissionGuardService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let method = req.method().as_str().to_string();
        let path = req.path().to_string();

        if is_public(&method, &path) {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        let Some(config) = req.app_data::<Data<Config>>() else {
            return Box::pin(ready(Err(AppError::Unauthorized.into())));
        };

        let Some(claims) = claims_from_request(req.request(), &config.jwt_secret) else {
            return Box::pin(ready(Err(AppError::Unauthorized.into())));
        };

        if let Some(allowed) = required_roles(&method, &path) {
            if !allowed.contains(&claims.role) {
                return Box::pin(ready(Err(AppError::Forbidden(format!(
                    "Role {} may not access {} {}",
                    claims.role, method, path
                ))
                .into())));
            }
        }

        let fut = self.service.call(req);
        Box::pin(fut)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn wildcard_segments_match_any_value() {
        assert!(pattern_matches(
            "/api/v1/leaves/{id}/status",
            "/api/v1/leaves/7a1b/status"
        ));
        assert!(!pattern_matches("/api/v1/leaves/{id}/status", "/api/v1/leaves/status"));
    }

    #[test]
    fn literal_segments_must_match_exactly() {
        assert!(pattern_matches("/api/v1/payrolls", "/api/v1/payrolls"));
        assert!(!pattern_matches("/api/v1/payrolls", "/api/v1/leaves"));
        assert!(!pattern_matches("/api/v1/payrolls", "/api/v1/payrolls/123"));
    }

    #[test]
    fn specific_routes_win_over_wildcards() {
        // "/payrolls/my" is listed before "/payrolls/{id}" so employees keep
        // access to their own payslips
        let roles = required_roles("GET", "/api/v1/payrolls/my").unwrap();
        assert!(roles.contains(&UserRole::Employee));

        let roles = required_roles("GET", "/api/v1/payrolls/7a1b").unwrap();
        assert!(!roles.contains(&UserRole::Employee));
    }

    #[test]
    fn payroll_surface_admits_cfo() {
        let roles = required_roles("POST", "/api/v1/payrolls/generate").unwrap();
        assert!(roles.contains(&UserRole::Cfo));

        let roles = required_roles("PATCH", "/api/v1/leaves/7a1b/status").unwrap();
        assert!(!roles.contains(&UserRole::Cfo));
    }

    #[test]
    fn unlisted_routes_have_no_role_gate() {
        assert_eq!(required_roles("GET", "/api/v1/leaves"), None);
        assert_eq!(required_roles("POST", "/api/v1/leaves"), None);
    }

    #[test]
    fn auth_endpoints_are_public() {
        assert!(is_public("POST", "/api/v1/auth/login"));
        assert!(is_public("POST", "/api/v1/auth/register"));
        assert!(!is_public("GET", "/api/v1/auth/me"));
    }
}
