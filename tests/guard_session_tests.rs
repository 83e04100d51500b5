//! Role guard against live session state: loading placeholder, login
//! fallback for anonymous sessions, silent redirect to the user's own
//! dashboard on role mismatch, render only for permitted roles.

use std::sync::Arc;

use async_trait::async_trait;

use neuronet::error::{AuthError, AuthResult};
use neuronet::identity::{
    GuardDecision, IdentityService, MemoryNavigator, MemoryTokenStore, ProfileUpdate, Role,
    RoleGuard, SessionStore, TokenResponse, TokenStore, User, UserProfile,
};

// Canned identity service: accepts any credentials and returns one fixed user.
struct StaticService {
    role: String,
}

impl StaticService {
    fn new(role: &str) -> Self {
        Self { role: role.to_string() }
    }

    fn user(&self) -> User {
        User { id: "u-1".into(), email: "a@b.com".into(), role: self.role.clone(), is_active: true }
    }
}

#[async_trait]
impl IdentityService for StaticService {
    async fn register(&self, _email: &str, _password: &str, _role: &str) -> AuthResult<()> {
        Ok(())
    }

    async fn login(&self, _email: &str, _password: &str) -> AuthResult<TokenResponse> {
        Ok(TokenResponse { access_token: "T".into(), token_type: "bearer".into() })
    }

    async fn current_user(&self, token: &str) -> AuthResult<User> {
        if token == "T" {
            Ok(self.user())
        } else {
            Err(AuthError::stale_token("token_rejected".to_string(), "Could not validate credentials".to_string()))
        }
    }

    async fn fetch_profile(&self, _token: &str) -> AuthResult<UserProfile> {
        Err(AuthError::service("unsupported".to_string(), "not in this fixture".to_string()))
    }

    async fn update_profile(&self, _token: &str, _update: &ProfileUpdate) -> AuthResult<UserProfile> {
        Err(AuthError::service("unsupported".to_string(), "not in this fixture".to_string()))
    }

    async fn probe(&self) -> AuthResult<()> {
        Ok(())
    }
}

fn store_with(service: StaticService, seeded_token: Option<&str>) -> (SessionStore, Arc<MemoryNavigator>) {
    let tokens = Arc::new(MemoryTokenStore::new());
    if let Some(t) = seeded_token {
        tokens.save(t);
    }
    let navigator = Arc::new(MemoryNavigator::new());
    let store = SessionStore::new(Arc::new(service), tokens, navigator.clone());
    (store, navigator)
}

#[tokio::test]
async fn therapist_guard_redirects_plain_user_to_their_dashboard() {
    let (store, navigator) = store_with(StaticService::new("user"), Some("T"));
    store.initialize().await;

    let guard = RoleGuard::new([Role::Therapist]);
    let decision = guard.enforce(&store.snapshot(), navigator.as_ref());

    assert_eq!(decision, GuardDecision::Redirect("/dashboard"));
    assert_ne!(decision, GuardDecision::Render, "children must never render on mismatch");
    assert_eq!(navigator.last().as_deref(), Some("/dashboard"));
}

#[tokio::test]
async fn anonymous_session_navigates_to_login() {
    let (store, navigator) = store_with(StaticService::new("user"), None);
    store.initialize().await;
    assert!(!store.is_loading());

    let guard = RoleGuard::new([Role::User, Role::Therapist, Role::Buddy]);
    let decision = guard.enforce(&store.snapshot(), navigator.as_ref());

    assert_eq!(decision, GuardDecision::Redirect("/login"));
    assert_eq!(navigator.history(), vec!["/login".to_string()]);
}

#[tokio::test]
async fn loading_session_renders_placeholder_without_navigation() {
    // Store not initialized yet: still in the loading phase.
    let (store, navigator) = store_with(StaticService::new("user"), Some("T"));

    let guard = RoleGuard::new([Role::Therapist]);
    let decision = guard.enforce(&store.snapshot(), navigator.as_ref());

    assert_eq!(decision, GuardDecision::Loading);
    assert!(navigator.history().is_empty(), "loading must not navigate");
}

#[tokio::test]
async fn unknown_role_session_is_sent_to_onboarding() {
    let (store, navigator) = store_with(StaticService::new("admin"), Some("T"));
    store.initialize().await;
    assert!(store.is_authenticated());

    let guard = RoleGuard::new([Role::User, Role::Therapist, Role::Buddy]);
    let decision = guard.enforce(&store.snapshot(), navigator.as_ref());

    assert_eq!(decision, GuardDecision::Redirect("/onboarding"));
}

#[tokio::test]
async fn permitted_role_renders_children_unmodified() {
    let (store, navigator) = store_with(StaticService::new("Buddy"), Some("T"));
    store.initialize().await;

    let guard = RoleGuard::new([Role::Buddy]);
    let decision = guard.enforce(&store.snapshot(), navigator.as_ref());

    assert_eq!(decision, GuardDecision::Render);
    assert!(navigator.history().is_empty());
}

#[tokio::test]
async fn logout_clears_session_and_navigates_to_login() {
    let (store, navigator) = store_with(StaticService::new("buddy"), Some("T"));
    store.initialize().await;
    assert!(store.is_authenticated());

    store.logout();

    let snap = store.snapshot();
    assert!(!snap.is_authenticated());
    assert_eq!(snap.token, None);
    assert_eq!(navigator.last().as_deref(), Some("/login"));
}

#[tokio::test]
async fn rejected_token_degrades_to_anonymous_without_error() {
    let (store, navigator) = store_with(StaticService::new("buddy"), Some("EXPIRED"));
    store.initialize().await;

    let snap = store.snapshot();
    assert!(!snap.is_authenticated());
    assert!(!snap.is_loading);
    assert_eq!(snap.token, None);
    assert!(navigator.history().is_empty(), "silent recovery must not navigate");
}
