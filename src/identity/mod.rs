//! Central identity and session management for the NeuroNet dashboard.
//! Keep the public surface thin and split implementation across sub-modules.

mod user;
mod routes;
mod token_store;
mod navigator;
mod provider;
mod session;
mod guard;

pub use user::{Profile, ProfileUpdate, TokenResponse, User, UserProfile};
pub use routes::{
    is_valid_role, resolve_dashboard, role_display_name, Role, BUDDY_DASHBOARD, DEFAULT_DASHBOARD,
    LOGIN_ROUTE, ONBOARDING_ROUTE, THERAPIST_DASHBOARD,
};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use navigator::{MemoryNavigator, Navigator};
pub use provider::{HttpIdentityService, IdentityService};
pub use session::{SessionSnapshot, SessionStore};
pub use guard::{GuardDecision, RoleGuard};
