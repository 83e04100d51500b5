//! Auth session store: the single source of truth for the authenticated
//! identity within one dashboard instance. The store is the only writer of
//! session state; everything else observes through [`SessionSnapshot`].
//!
//! Lifecycle: `Uninitialized --(token found)--> Loading --(fetch ok)-->
//! Authenticated`; `Uninitialized --(no token)--> Anonymous`; `Loading
//! --(fetch fails)--> Anonymous`; `Authenticated --(logout)--> Anonymous`.

use parking_lot::RwLock;
use std::sync::Arc;
use tracing::warn;

use crate::error::AuthResult;
use crate::tprintln;

use super::navigator::Navigator;
use super::provider::IdentityService;
use super::routes::{resolve_dashboard, LOGIN_ROUTE};
use super::token_store::TokenStore;
use super::user::{ProfileUpdate, User, UserProfile};

#[derive(Debug, Default)]
struct SessionState {
    token: Option<String>,
    user: Option<User>,
    is_loading: bool,
}

/// Read-only view of the session for guards and pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub token: Option<String>,
    pub user: Option<User>,
    pub is_loading: bool,
}

impl SessionSnapshot {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// Injectable session store. One instance per dashboard tab; callers await
/// each operation before issuing another, as the store performs no internal
/// queuing or cancellation.
pub struct SessionStore {
    store_id: String,
    state: RwLock<SessionState>,
    service: Arc<dyn IdentityService>,
    tokens: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
}

impl SessionStore {
    pub fn new(
        service: Arc<dyn IdentityService>,
        tokens: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            store_id: uuid::Uuid::new_v4().to_string(),
            state: RwLock::new(SessionState { token: None, user: None, is_loading: true }),
            service,
            tokens,
            navigator,
        }
    }

    /// Startup token check. No persisted token means the session settles
    /// anonymous immediately; otherwise the user record is fetched without a
    /// redirect (the guard decides where the user lands).
    pub async fn initialize(&self) {
        match self.tokens.load() {
            Some(token) => self.fetch_user(&token, false).await,
            None => {
                let mut st = self.state.write();
                st.is_loading = false;
                tprintln!("session.init store={} anonymous", self.store_id);
            }
        }
    }

    /// Authenticate against the identity service, persist the bearer token
    /// and load the user record, then navigate to the role-resolved
    /// dashboard. Connectivity and credential failures surface to the caller.
    pub async fn login(&self, email: &str, password: &str) -> AuthResult<()> {
        let token = self.service.login(email, password).await?;
        self.tokens.save(&token.access_token);
        {
            let mut st = self.state.write();
            st.token = Some(token.access_token.clone());
        }
        tprintln!("session.login store={} user={}", self.store_id, email);
        self.fetch_user(&token.access_token, true).await;
        Ok(())
    }

    /// Create the account, then chain into [`SessionStore::login`] with the
    /// same credentials (auto-login).
    pub async fn register(&self, email: &str, password: &str, role: &str) -> AuthResult<()> {
        self.service.register(email, password, role).await?;
        self.login(email, password).await
    }

    /// Load the user record for `token`. Failure is a silent recovery path,
    /// not an error: the persisted token is cleared and the session settles
    /// anonymous. On success with `should_redirect`, navigates to the
    /// role-resolved dashboard.
    pub async fn fetch_user(&self, token: &str, should_redirect: bool) {
        match self.service.current_user(token).await {
            Ok(user) => {
                {
                    let mut st = self.state.write();
                    st.token = Some(token.to_string());
                    st.user = Some(user.clone());
                    st.is_loading = false;
                }
                tprintln!("session.user store={} id={} role={}", self.store_id, user.id, user.role);
                if should_redirect {
                    self.navigator.push(resolve_dashboard(Some(&user.role)));
                }
            }
            Err(err) => {
                warn!(target: "neuronet", "user fetch failed ({}), degrading to anonymous", err);
                self.tokens.clear();
                let mut st = self.state.write();
                st.token = None;
                st.user = None;
                st.is_loading = false;
            }
        }
    }

    /// Clear persisted token and in-memory user, then navigate to the login
    /// page. Always succeeds; no network call.
    pub fn logout(&self) {
        self.tokens.clear();
        {
            let mut st = self.state.write();
            st.token = None;
            st.user = None;
            st.is_loading = false;
        }
        tprintln!("session.logout store={}", self.store_id);
        self.navigator.push(LOGIN_ROUTE);
    }

    /// Fetch the full profile with the session's token. A stale-token
    /// rejection clears the session reactively before the error is returned
    /// (callers can test `is_silent()` to skip surfacing it).
    pub async fn profile(&self) -> AuthResult<UserProfile> {
        let token = self.require_token()?;
        match self.service.fetch_profile(&token).await {
            Ok(p) => Ok(p),
            Err(e) => Err(self.recover_if_stale(e)),
        }
    }

    /// Partial profile update with the session's token; same stale-token
    /// recovery as [`SessionStore::profile`].
    pub async fn update_profile(&self, update: &ProfileUpdate) -> AuthResult<UserProfile> {
        let token = self.require_token()?;
        match self.service.update_profile(&token, update).await {
            Ok(p) => Ok(p),
            Err(e) => Err(self.recover_if_stale(e)),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let st = self.state.read();
        SessionSnapshot { token: st.token.clone(), user: st.user.clone(), is_loading: st.is_loading }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().user.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.state.read().is_loading
    }

    pub fn store_id(&self) -> &str {
        &self.store_id
    }

    fn require_token(&self) -> AuthResult<String> {
        self.state.read().token.clone().ok_or_else(|| {
            crate::error::AuthError::stale_token("no_token".to_string(), "no active session".to_string())
        })
    }

    fn recover_if_stale(&self, err: crate::error::AuthError) -> crate::error::AuthError {
        if err.is_silent() {
            warn!(target: "neuronet", "token rejected mid-session ({}), clearing session", err);
            self.tokens.clear();
            let mut st = self.state.write();
            st.token = None;
            st.user = None;
            st.is_loading = false;
        }
        err
    }
}
