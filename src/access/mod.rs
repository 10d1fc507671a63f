//! Route authorization for the admin console and member portal
//!
//! The caller passes a [`Session`] explicitly; nothing here reads global state.
//! Each route carries the chain of role guards it sits behind, outermost first,
//! and [`RouteTable::authorize`] walks that chain.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::types::*;

pub const LOGIN_PATH: &str = "/login";
pub const PORTAL_PATH: &str = "/portal";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Roles a signed-in user can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Pastor,
    FinanceAdmin,
    MinistryLeader,
    Member,
}

impl Role {
    /// Roles that use the admin console rather than the member portal
    pub fn is_staff(&self) -> bool {
        !matches!(self, Role::Member)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Pastor => "PASTOR",
            Role::FinanceAdmin => "FINANCE_ADMIN",
            Role::MinistryLeader => "MINISTRY_LEADER",
            Role::Member => "MEMBER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ChurchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "PASTOR" => Ok(Role::Pastor),
            "FINANCE_ADMIN" => Ok(Role::FinanceAdmin),
            "MINISTRY_LEADER" => Ok(Role::MinistryLeader),
            "MEMBER" => Ok(Role::Member),
            other => Err(ChurchError::Validation(format!("Unknown role: '{}'", other))),
        }
    }
}

/// Who is making the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub authenticated: bool,
    pub role: Option<Role>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self {
            authenticated: false,
            role: None,
        }
    }

    pub fn signed_in(role: Role) -> Self {
        Self {
            authenticated: true,
            role: Some(role),
        }
    }

    /// Landing page for this session
    pub fn home(&self) -> &'static str {
        match (self.authenticated, self.role) {
            (false, _) => LOGIN_PATH,
            (true, Some(Role::Member)) => PORTAL_PATH,
            (true, Some(_)) => DASHBOARD_PATH,
            (true, None) => LOGIN_PATH,
        }
    }
}

const STAFF: &[Role] = &[
    Role::Admin,
    Role::Pastor,
    Role::FinanceAdmin,
    Role::MinistryLeader,
];
const ADMIN_PASTOR: &[Role] = &[Role::Admin, Role::Pastor];
const MINISTRY: &[Role] = &[Role::Admin, Role::Pastor, Role::MinistryLeader];
const FINANCE: &[Role] = &[Role::Admin, Role::FinanceAdmin];
const REPORTS: &[Role] = &[Role::Admin, Role::Pastor, Role::FinanceAdmin];
const ADMIN_ONLY: &[Role] = &[Role::Admin];
const PORTAL: &[Role] = &[Role::Member, Role::Admin];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A route pattern with its guard chain
#[derive(Debug, Clone)]
pub struct Route {
    pattern: String,
    segments: Vec<Segment>,
    guards: Vec<&'static [Role]>,
}

impl Route {
    /// Build a route; `:name` segments capture path parameters
    pub fn new(pattern: &str, guards: Vec<&'static [Role]>) -> Self {
        let segments = split_path(pattern)
            .map(|s| match s.strip_prefix(':') {
                Some(name) => Segment::Param(name.to_string()),
                None => Segment::Literal(s.to_string()),
            })
            .collect();
        Self {
            pattern: pattern.to_string(),
            segments,
            guards,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn is_public(&self) -> bool {
        self.guards.is_empty()
    }

    fn match_path(&self, path: &str) -> Option<HashMap<String, String>> {
        let parts: Vec<&str> = split_path(path).collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = HashMap::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(literal) if literal == part => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => {
                    params.insert(name.clone(), part.to_string());
                }
            }
        }
        Some(params)
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// A matched route and its captured parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub pattern: String,
    pub params: HashMap<String, String>,
}

impl RouteMatch {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// Outcome of authorizing a path for a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Allow(RouteMatch),
    Redirect(String),
    /// No such page; `home` is where the escape link should point
    NotFound { home: String },
}

/// The set of known routes
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, route: Route) -> &mut Self {
        self.routes.push(route);
        self
    }

    /// Routes of the admin console and member portal
    pub fn standard() -> Self {
        let mut table = Self::new();
        let dash = |extra: Option<&'static [Role]>| {
            let mut guards = vec![STAFF];
            guards.extend(extra);
            guards
        };

        table
            .add(Route::new("/login", vec![]))
            .add(Route::new("/register", vec![]))
            .add(Route::new("/dashboard", dash(None)))
            // Members
            .add(Route::new("/dashboard/members", dash(None)))
            .add(Route::new("/dashboard/members/add", dash(Some(ADMIN_PASTOR))))
            .add(Route::new("/dashboard/members/view/:memberId", dash(None)))
            .add(Route::new("/dashboard/members/edit/:memberId", dash(Some(ADMIN_PASTOR))))
            // Groups
            .add(Route::new("/dashboard/groups", dash(None)))
            .add(Route::new("/dashboard/groups/add", dash(Some(MINISTRY))))
            .add(Route::new("/dashboard/groups/view/:groupId", dash(None)))
            .add(Route::new("/dashboard/groups/edit/:groupId", dash(None)))
            // Events
            .add(Route::new("/dashboard/events", dash(None)))
            .add(Route::new("/dashboard/events/add", dash(Some(MINISTRY))))
            .add(Route::new("/dashboard/events/view/:eventId", dash(None)))
            .add(Route::new("/dashboard/events/edit/:eventId", dash(None)))
            // Giving
            .add(Route::new("/dashboard/giving", dash(Some(FINANCE))))
            .add(Route::new("/dashboard/giving/add-contribution", dash(Some(FINANCE))))
            .add(Route::new("/dashboard/giving/manage-batches", dash(Some(FINANCE))))
            .add(Route::new("/dashboard/giving/view/:contributionId", dash(Some(FINANCE))))
            .add(Route::new("/dashboard/giving/edit/:contributionId", dash(Some(FINANCE))))
            .add(Route::new("/dashboard/giving/batch/:batchId", dash(Some(FINANCE))))
            // The print view sits outside the console layout
            .add(Route::new("/dashboard/giving/batch/:batchId/print", vec![FINANCE]))
            // Reports
            .add(Route::new("/dashboard/reports", dash(Some(REPORTS))))
            .add(Route::new("/dashboard/reports/membership/directory", dash(Some(ADMIN_PASTOR))))
            .add(Route::new("/dashboard/reports/giving/summary", dash(Some(FINANCE))))
            .add(Route::new("/dashboard/reports/attendance/service", dash(Some(MINISTRY))))
            // Settings
            .add(Route::new("/dashboard/settings", dash(Some(ADMIN_ONLY))))
            .add(Route::new("/dashboard/settings/general/church-info", dash(Some(ADMIN_ONLY))))
            .add(Route::new("/dashboard/settings/users/manage", dash(Some(ADMIN_ONLY))))
            .add(Route::new("/dashboard/settings/financial/funds", dash(Some(FINANCE))));

        for path in [
            "/portal",
            "/portal/profile",
            "/portal/giving",
            "/portal/giving/donate",
            "/portal/giving/history",
            "/portal/events",
            "/portal/events/details/:eventId",
            "/portal/events/register/:eventId",
            "/portal/groups",
            "/portal/groups/details/:groupId",
            "/portal/groups/join/:groupId",
            "/portal/serve",
            "/portal/prayer",
            "/portal/resources",
        ] {
            table.add(Route::new(path, vec![PORTAL]));
        }

        table
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Decide whether `session` may open `path`
    pub fn authorize(&self, path: &str, session: &Session) -> RouteDecision {
        let path = path.split(['?', '#']).next().unwrap_or_default();

        if split_path(path).next().is_none() {
            return RouteDecision::Redirect(session.home().to_string());
        }

        let Some((route, params)) = self
            .routes
            .iter()
            .find_map(|route| route.match_path(path).map(|params| (route, params)))
        else {
            return RouteDecision::NotFound {
                home: session.home().to_string(),
            };
        };

        for guard in &route.guards {
            if !session.authenticated {
                return RouteDecision::Redirect(LOGIN_PATH.to_string());
            }
            let allowed = session.role.is_some_and(|role| guard.contains(&role));
            if !allowed {
                warn!(
                    path,
                    role = session.role.map(|r| r.as_str()).unwrap_or("NONE"),
                    "role not permitted for route"
                );
                return RouteDecision::Redirect(denied_target(session.role, guard).to_string());
            }
        }

        RouteDecision::Allow(RouteMatch {
            pattern: route.pattern.clone(),
            params,
        })
    }
}

/// Where to send a signed-in user a guard turned away
fn denied_target(role: Option<Role>, guard: &[Role]) -> &'static str {
    match role {
        Some(Role::Member) => PORTAL_PATH,
        Some(role) if role.is_staff() && !guard.contains(&Role::Member) => DASHBOARD_PATH,
        _ => LOGIN_PATH,
    }
}

/// Authorize against the standard route table
pub fn authorize(path: &str, session: &Session) -> RouteDecision {
    RouteTable::standard().authorize(path, session)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn redirect(to: &str) -> RouteDecision {
        RouteDecision::Redirect(to.to_string())
    }

    fn allowed(decision: &RouteDecision) -> bool {
        matches!(decision, RouteDecision::Allow(_))
    }

    #[test]
    fn test_root_redirects_by_role() {
        assert_eq!(authorize("/", &Session::anonymous()), redirect("/login"));
        assert_eq!(authorize("/", &Session::signed_in(Role::Member)), redirect("/portal"));
        assert_eq!(
            authorize("/", &Session::signed_in(Role::FinanceAdmin)),
            redirect("/dashboard")
        );
    }

    #[test]
    fn test_unauthenticated_goes_to_login() {
        let session = Session::anonymous();
        assert_eq!(authorize("/dashboard/members", &session), redirect("/login"));
        assert_eq!(authorize("/portal/giving", &session), redirect("/login"));
        assert!(allowed(&authorize("/login", &session)));
        assert!(allowed(&authorize("/register", &session)));
    }

    #[test]
    fn test_member_kept_in_portal() {
        let session = Session::signed_in(Role::Member);
        assert!(allowed(&authorize("/portal/events/details/ev1", &session)));
        assert_eq!(authorize("/dashboard", &session), redirect("/portal"));
        assert_eq!(
            authorize("/dashboard/giving/batch/B004", &session),
            redirect("/portal")
        );
    }

    #[test]
    fn test_staff_redirects() {
        let pastor = Session::signed_in(Role::Pastor);
        assert!(allowed(&authorize("/dashboard/members/add", &pastor)));
        assert_eq!(authorize("/dashboard/giving", &pastor), redirect("/dashboard"));

        let leader = Session::signed_in(Role::MinistryLeader);
        assert!(allowed(&authorize("/dashboard/events/add", &leader)));
        assert_eq!(authorize("/dashboard/settings", &leader), redirect("/dashboard"));
        // The portal admits members, so staff are not bounced to the console
        assert_eq!(authorize("/portal", &leader), redirect("/login"));

        let admin = Session::signed_in(Role::Admin);
        assert!(allowed(&authorize("/portal/prayer", &admin)));
        assert!(allowed(&authorize("/dashboard/settings/users/manage", &admin)));
    }

    #[test]
    fn test_batch_routes_capture_params() {
        let finance = Session::signed_in(Role::FinanceAdmin);
        match authorize("/dashboard/giving/batch/B004/print?copies=2", &finance) {
            RouteDecision::Allow(matched) => {
                assert_eq!(matched.pattern, "/dashboard/giving/batch/:batchId/print");
                assert_eq!(matched.param("batchId"), Some("B004"));
            }
            other => panic!("unexpected decision {:?}", other),
        }

        match authorize("/dashboard/giving/batch/B001/", &finance) {
            RouteDecision::Allow(matched) => assert_eq!(matched.param("batchId"), Some("B001")),
            other => panic!("unexpected decision {:?}", other),
        }
    }

    #[test]
    fn test_unknown_path_is_not_found() {
        assert_eq!(
            authorize("/dashboard/nowhere", &Session::signed_in(Role::Admin)),
            RouteDecision::NotFound {
                home: "/dashboard".to_string()
            }
        );
        assert_eq!(
            authorize("/nowhere", &Session::signed_in(Role::Member)),
            RouteDecision::NotFound {
                home: "/portal".to_string()
            }
        );
        assert_eq!(
            authorize("/nowhere", &Session::anonymous()),
            RouteDecision::NotFound {
                home: "/login".to_string()
            }
        );
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("finance_admin".parse::<Role>().unwrap(), Role::FinanceAdmin);
        assert_eq!(Role::MinistryLeader.to_string(), "MINISTRY_LEADER");
        assert!("DEACON".parse::<Role>().is_err());
    }
}
