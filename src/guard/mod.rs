//! Route guard: per-request authentication/authorization before any page
//! handler runs.
//!
//! The guard is split into an externally configurable classification table,
//! a pure decision function, and a thin axum middleware wrapper, so the
//! whole allow/redirect matrix is testable without a network stack.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};

use crate::api::cookies;
use crate::storage::models::Role;
use crate::tokens::session;
use crate::AppState;

/// Protection level of a request path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouteClass {
    AdminLogin,
    AdminProtected,
    Public,
    StudentLogin,
    StudentProtected,
}

/// One classification rule. Login classes match the path exactly; protected
/// classes match by prefix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteRule {
    pub class: RouteClass,
    pub prefix: String,
}

/// The route classification table plus the guard's redirect targets.
/// Loadable from a JSON file (`ROUTE_TABLE`) so deployments can reshape the
/// portal layout without a code change. Rules are evaluated in order; the
/// first match wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteTable {
    #[serde(default = "default_admin_dashboard")]
    pub admin_dashboard: String,
    #[serde(default = "default_admin_login")]
    pub admin_login: String,
    pub rules: Vec<RouteRule>,
    #[serde(default = "default_student_dashboard")]
    pub student_dashboard: String,
    #[serde(default = "default_student_login")]
    pub student_login: String,
}

fn default_admin_dashboard() -> String {
    "/admin/dashboard".to_string()
}

fn default_admin_login() -> String {
    "/admin/login".to_string()
}

fn default_student_dashboard() -> String {
    "/dashboard".to_string()
}

fn default_student_login() -> String {
    "/login".to_string()
}

impl Default for RouteTable {
    fn default() -> Self {
        let mut rules = vec![
            RouteRule {
                class: RouteClass::StudentLogin,
                prefix: "/login".to_string(),
            },
            RouteRule {
                class: RouteClass::AdminLogin,
                prefix: "/admin/login".to_string(),
            },
            RouteRule {
                class: RouteClass::AdminProtected,
                prefix: "/admin".to_string(),
            },
        ];
        for prefix in [
            "/dashboard",
            "/profile",
            "/materials",
            "/exams",
            "/results",
            "/transactions",
        ] {
            rules.push(RouteRule {
                class: RouteClass::StudentProtected,
                prefix: prefix.to_string(),
            });
        }

        Self {
            admin_dashboard: default_admin_dashboard(),
            admin_login: default_admin_login(),
            rules,
            student_dashboard: default_student_dashboard(),
            student_login: default_student_login(),
        }
    }
}

impl RouteTable {
    /// Classify a request path. Unmatched paths are public.
    pub fn classify(&self, path: &str) -> RouteClass {
        for rule in &self.rules {
            let matched = match rule.class {
                RouteClass::AdminLogin | RouteClass::StudentLogin => path == rule.prefix,
                _ => path.starts_with(&rule.prefix),
            };
            if matched {
                return rule.class;
            }
        }
        RouteClass::Public
    }
}

/// Outcome of the guard for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(String),
}

/// The pure guard decision: protection class + authenticated role (if any)
/// -> allow or redirect target.
pub fn decide(table: &RouteTable, class: RouteClass, role: Option<Role>) -> GuardDecision {
    use GuardDecision::{Allow, Redirect};

    match (class, role) {
        (RouteClass::Public, _) => Allow,

        // Unauthenticated: protected routes bounce to the matching login page
        (RouteClass::StudentProtected, None) => Redirect(table.student_login.clone()),
        (RouteClass::AdminProtected, None) => Redirect(table.admin_login.clone()),
        (RouteClass::StudentLogin | RouteClass::AdminLogin, None) => Allow,

        // Authenticated visits to a login page go to that role's dashboard
        (RouteClass::StudentLogin | RouteClass::AdminLogin, Some(Role::Admin)) => {
            Redirect(table.admin_dashboard.clone())
        }
        (RouteClass::StudentLogin | RouteClass::AdminLogin, Some(Role::Student)) => {
            Redirect(table.student_dashboard.clone())
        }

        // Role/route match
        (RouteClass::StudentProtected, Some(Role::Student)) => Allow,
        (RouteClass::AdminProtected, Some(Role::Admin)) => Allow,

        // Role/route mismatch: send the principal to its own dashboard
        (RouteClass::StudentProtected, Some(Role::Admin)) => {
            Redirect(table.admin_dashboard.clone())
        }
        (RouteClass::AdminProtected, Some(Role::Student)) => {
            Redirect(table.student_dashboard.clone())
        }
    }
}

/// Middleware enforcing the guard on every page route.
///
/// Any error from the verification dependency is treated as "unauthenticated"
/// and resolved via redirect; it never surfaces to the browser.
pub async fn route_guard(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let class = state.config.routes.classify(request.uri().path());

    let role = match cookies::session_token(request.headers()) {
        None => None,
        Some(token) => match session::verify(&state.db, &token) {
            Ok(principal) => principal.map(|p| p.role),
            Err(e) => {
                tracing::warn!(error = %e, "Session verification failed in route guard");
                None
            }
        },
    };

    match decide(&state.config.routes, class, role) {
        GuardDecision::Allow => next.run(request).await,
        GuardDecision::Redirect(to) => Redirect::to(&to).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_classification() {
        let table = RouteTable::default();

        assert_eq!(table.classify("/"), RouteClass::Public);
        assert_eq!(table.classify("/login"), RouteClass::StudentLogin);
        assert_eq!(table.classify("/admin/login"), RouteClass::AdminLogin);
        assert_eq!(table.classify("/admin"), RouteClass::AdminProtected);
        assert_eq!(table.classify("/admin/dashboard"), RouteClass::AdminProtected);
        assert_eq!(table.classify("/admin/students"), RouteClass::AdminProtected);
        assert_eq!(table.classify("/dashboard"), RouteClass::StudentProtected);
        assert_eq!(table.classify("/profile"), RouteClass::StudentProtected);
        assert_eq!(table.classify("/materials"), RouteClass::StudentProtected);
        assert_eq!(table.classify("/exams"), RouteClass::StudentProtected);
        assert_eq!(table.classify("/results"), RouteClass::StudentProtected);
        assert_eq!(table.classify("/transactions"), RouteClass::StudentProtected);
        assert_eq!(table.classify("/favicon.ico"), RouteClass::Public);
    }

    #[test]
    fn test_no_session_redirects_to_login() {
        let table = RouteTable::default();

        assert_eq!(
            decide(&table, table.classify("/admin/dashboard"), None),
            GuardDecision::Redirect("/admin/login".to_string())
        );
        assert_eq!(
            decide(&table, table.classify("/dashboard"), None),
            GuardDecision::Redirect("/login".to_string())
        );
        assert_eq!(
            decide(&table, table.classify("/"), None),
            GuardDecision::Allow
        );
    }

    #[test]
    fn test_login_pages_reachable_without_session() {
        let table = RouteTable::default();

        assert_eq!(
            decide(&table, table.classify("/admin/login"), None),
            GuardDecision::Allow
        );
        assert_eq!(
            decide(&table, table.classify("/login"), None),
            GuardDecision::Allow
        );
    }

    #[test]
    fn test_role_mismatch_redirects_to_own_dashboard() {
        let table = RouteTable::default();

        // Admin visiting the student portal
        assert_eq!(
            decide(&table, table.classify("/dashboard"), Some(Role::Admin)),
            GuardDecision::Redirect("/admin/dashboard".to_string())
        );
        // Student visiting the admin portal
        assert_eq!(
            decide(&table, table.classify("/admin/dashboard"), Some(Role::Student)),
            GuardDecision::Redirect("/dashboard".to_string())
        );
    }

    #[test]
    fn test_authenticated_login_page_visit_redirects() {
        let table = RouteTable::default();

        assert_eq!(
            decide(&table, table.classify("/login"), Some(Role::Student)),
            GuardDecision::Redirect("/dashboard".to_string())
        );
        assert_eq!(
            decide(&table, table.classify("/admin/login"), Some(Role::Admin)),
            GuardDecision::Redirect("/admin/dashboard".to_string())
        );
        // Cross-role login page visits also land on the principal's dashboard
        assert_eq!(
            decide(&table, table.classify("/admin/login"), Some(Role::Student)),
            GuardDecision::Redirect("/dashboard".to_string())
        );
    }

    #[test]
    fn test_matching_role_is_allowed() {
        let table = RouteTable::default();

        assert_eq!(
            decide(&table, table.classify("/dashboard"), Some(Role::Student)),
            GuardDecision::Allow
        );
        assert_eq!(
            decide(&table, table.classify("/admin/settings"), Some(Role::Admin)),
            GuardDecision::Allow
        );
    }

    #[test]
    fn test_custom_table_from_json() {
        let table: RouteTable = serde_json::from_str(
            r#"{
                "rules": [
                    {"class": "admin-login", "prefix": "/backoffice/login"},
                    {"class": "admin-protected", "prefix": "/backoffice"},
                    {"class": "student-protected", "prefix": "/portal"}
                ],
                "admin_login": "/backoffice/login",
                "admin_dashboard": "/backoffice/home"
            }"#,
        )
        .unwrap();

        assert_eq!(table.classify("/backoffice/exams"), RouteClass::AdminProtected);
        assert_eq!(table.classify("/portal"), RouteClass::StudentProtected);
        assert_eq!(
            decide(&table, table.classify("/backoffice"), None),
            GuardDecision::Redirect("/backoffice/login".to_string())
        );
        // Unspecified targets keep their defaults
        assert_eq!(table.student_login, "/login");
    }
}
