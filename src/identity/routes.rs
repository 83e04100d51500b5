//! Role registry: the closed role enumeration, the static role→dashboard
//! table and the fallback routes. Pure lookups; diagnostics only, no errors.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use tracing::warn;

pub const LOGIN_ROUTE: &str = "/login";
pub const ONBOARDING_ROUTE: &str = "/onboarding";
pub const DEFAULT_DASHBOARD: &str = "/dashboard";
pub const THERAPIST_DASHBOARD: &str = "/therapist/dashboard";
pub const BUDDY_DASHBOARD: &str = "/buddy/dashboard";

/// Closed set of platform roles. Any role string outside this set is treated
/// as unknown and routed to onboarding, never silently accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Therapist,
    Buddy,
}

static ROLE_DASHBOARDS: Lazy<HashMap<Role, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (Role::User, DEFAULT_DASHBOARD),
        (Role::Therapist, THERAPIST_DASHBOARD),
        (Role::Buddy, BUDDY_DASHBOARD),
    ])
});

impl Role {
    /// Parse a service-provided role string. Trims and lower-cases before
    /// matching; anything outside the enumeration is `None`.
    pub fn parse(raw: &str) -> Option<Role> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "user" => Some(Role::User),
            "therapist" => Some(Role::Therapist),
            "buddy" => Some(Role::Buddy),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Therapist => "therapist",
            Role::Buddy => "buddy",
        }
    }

    pub fn dashboard_route(&self) -> &'static str {
        ROLE_DASHBOARDS[self]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Therapist => "Therapist",
            Role::Buddy => "Peer Buddy",
        }
    }

    pub fn all() -> [Role; 3] {
        [Role::User, Role::Therapist, Role::Buddy]
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dashboard route for a possibly-absent role string. Absent or blank input
/// falls back to the default dashboard; present-but-unknown roles go to
/// onboarding. Deterministic, never fails.
pub fn resolve_dashboard(role: Option<&str>) -> &'static str {
    let Some(raw) = role.map(str::trim).filter(|r| !r.is_empty()) else {
        warn!(target: "neuronet", "no role provided, falling back to the default dashboard");
        return DEFAULT_DASHBOARD;
    };
    match Role::parse(raw) {
        Some(r) => r.dashboard_route(),
        None => {
            warn!(target: "neuronet", "unknown role '{}', routing to onboarding", raw);
            ONBOARDING_ROUTE
        }
    }
}

/// True iff the input normalizes to a member of the role enumeration.
pub fn is_valid_role(role: Option<&str>) -> bool {
    role.map(Role::parse).flatten().is_some()
}

/// Cosmetic name for a role string; `"Unknown"` for anything unmapped.
pub fn role_display_name(role: &str) -> &'static str {
    match Role::parse(role) {
        Some(r) => r.display_name(),
        None => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_roles_resolve_exact_paths() {
        assert_eq!(resolve_dashboard(Some("user")), "/dashboard");
        assert_eq!(resolve_dashboard(Some("therapist")), "/therapist/dashboard");
        assert_eq!(resolve_dashboard(Some("buddy")), "/buddy/dashboard");
    }

    #[test]
    fn casing_and_whitespace_are_normalized() {
        assert_eq!(resolve_dashboard(Some("  Therapist ")), "/therapist/dashboard");
        assert_eq!(resolve_dashboard(Some("BUDDY")), "/buddy/dashboard");
        assert!(is_valid_role(Some(" User\t")));
    }

    #[test]
    fn unknown_roles_go_to_onboarding() {
        assert_eq!(resolve_dashboard(Some("admin")), "/onboarding");
        assert_eq!(resolve_dashboard(Some("moderator")), "/onboarding");
    }

    #[test]
    fn absent_or_blank_falls_back_to_default() {
        assert_eq!(resolve_dashboard(None), "/dashboard");
        assert_eq!(resolve_dashboard(Some("")), "/dashboard");
        assert_eq!(resolve_dashboard(Some("   ")), "/dashboard");
    }

    #[test]
    fn validity_over_the_enumeration() {
        assert!(!is_valid_role(None));
        assert!(!is_valid_role(Some("")));
        assert!(!is_valid_role(Some("admin")));
        for role in Role::all() {
            assert!(is_valid_role(Some(role.as_str())));
        }
    }

    #[test]
    fn display_names() {
        assert_eq!(role_display_name("user"), "User");
        assert_eq!(role_display_name("therapist"), "Therapist");
        assert_eq!(role_display_name("buddy"), "Peer Buddy");
        assert_eq!(role_display_name("admin"), "Unknown");
    }
}
