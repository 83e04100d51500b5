//! Role guard: gates a protected view on the current session. Misrouted
//! access is corrected by redirect, never blocked with an error page.

use std::collections::HashSet;

use super::navigator::Navigator;
use super::routes::{resolve_dashboard, Role, LOGIN_ROUTE};
use super::session::SessionSnapshot;

/// Outcome of evaluating a guard against a session snapshot. Only
/// `Redirect` carries a side effect, and that side effect is navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session still resolving; render a neutral placeholder, no navigation.
    Loading,
    /// Navigate away; children are never rendered.
    Redirect(&'static str),
    /// Role permitted; render children unmodified.
    Render,
}

/// Allow-list wrapper for a protected view. Re-evaluate whenever session
/// state changes.
#[derive(Debug, Clone)]
pub struct RoleGuard {
    allowed: HashSet<Role>,
}

impl RoleGuard {
    pub fn new<I: IntoIterator<Item = Role>>(allowed: I) -> Self {
        Self { allowed: allowed.into_iter().collect() }
    }

    pub fn allows(&self, role: Role) -> bool {
        self.allowed.contains(&role)
    }

    /// Pure decision over a snapshot. Anonymous sessions go to login; a
    /// permitted role renders; everything else is redirected to the area for
    /// the user's own role (unknown roles land on onboarding).
    pub fn evaluate(&self, snap: &SessionSnapshot) -> GuardDecision {
        if snap.is_loading {
            return GuardDecision::Loading;
        }
        let Some(user) = &snap.user else {
            return GuardDecision::Redirect(LOGIN_ROUTE);
        };
        match Role::parse(&user.role) {
            Some(role) if self.allows(role) => GuardDecision::Render,
            _ => GuardDecision::Redirect(resolve_dashboard(Some(&user.role))),
        }
    }

    /// Evaluate and apply the navigation side effect for `Redirect`.
    pub fn enforce(&self, snap: &SessionSnapshot, navigator: &dyn Navigator) -> GuardDecision {
        let decision = self.evaluate(snap);
        if let GuardDecision::Redirect(path) = decision {
            navigator.push(path);
        }
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::User;

    fn snap(user: Option<User>, loading: bool) -> SessionSnapshot {
        SessionSnapshot { token: user.as_ref().map(|_| "T".to_string()), user, is_loading: loading }
    }

    fn user_with_role(role: &str) -> User {
        User { id: "u-1".into(), email: "a@b.com".into(), role: role.into(), is_active: true }
    }

    #[test]
    fn loading_renders_placeholder_without_navigation() {
        let guard = RoleGuard::new([Role::Therapist]);
        assert_eq!(guard.evaluate(&snap(None, true)), GuardDecision::Loading);
    }

    #[test]
    fn anonymous_goes_to_login() {
        let guard = RoleGuard::new([Role::Therapist]);
        assert_eq!(guard.evaluate(&snap(None, false)), GuardDecision::Redirect("/login"));
    }

    #[test]
    fn wrong_role_redirects_to_own_dashboard() {
        let guard = RoleGuard::new([Role::Therapist]);
        let decision = guard.evaluate(&snap(Some(user_with_role("user")), false));
        assert_eq!(decision, GuardDecision::Redirect("/dashboard"));
    }

    #[test]
    fn unknown_role_redirects_to_onboarding() {
        let guard = RoleGuard::new([Role::User, Role::Therapist, Role::Buddy]);
        let decision = guard.evaluate(&snap(Some(user_with_role("admin")), false));
        assert_eq!(decision, GuardDecision::Redirect("/onboarding"));
    }

    #[test]
    fn permitted_role_renders() {
        let guard = RoleGuard::new([Role::Buddy]);
        assert_eq!(guard.evaluate(&snap(Some(user_with_role("Buddy")), false)), GuardDecision::Render);
    }
}
