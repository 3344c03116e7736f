//! Session context shared across all pages.
//!
//! Holds who is signed in and what role they have. On startup the saved
//! bearer token is resolved in two steps: the session endpoint identifies
//! the user, then a user lookup supplies the role. A failed role lookup
//! leaves the user signed in with no role, which is treated as non-admin.

use dioxus::prelude::*;

use crate::app::api::UserInfo;

#[cfg(target_arch = "wasm32")]
use crate::app::api::{self, SessionPayload, UserProfile, WhoAmI};
#[cfg(not(target_arch = "wasm32"))]
use crate::app::api::SessionPayload;

/// Admin is an explicit role claim; anything else (including no role at all)
/// is an ordinary member.
pub fn is_admin_role(role: Option<&str>) -> bool {
    role == Some("admin")
}

/// Global session state shared via context
#[derive(Clone, Copy)]
pub struct SessionContext {
    identity: Signal<Option<UserInfo>>,
    role: Signal<Option<String>>,
    /// False until the saved token has been resolved (or found absent)
    ready: Signal<bool>,
}

impl SessionContext {
    pub fn is_ready(&self) -> bool {
        (self.ready)()
    }

    pub fn identity(&self) -> Option<UserInfo> {
        (self.identity)()
    }

    pub fn is_signed_in(&self) -> bool {
        (self.identity)().is_some()
    }

    pub fn is_admin(&self) -> bool {
        is_admin_role((self.role)().as_deref())
    }

    /// Record a fresh login / registration
    pub fn sign_in_complete(&self, payload: SessionPayload) {
        crate::app::api::save_token(&payload.token);
        let mut identity = self.identity;
        let mut role = self.role;
        let mut ready = self.ready;
        identity.set(Some(payload.user));
        role.set(payload.role);
        ready.set(true);
    }

    /// Drop the session locally and revoke the token server-side. The token
    /// is captured before it leaves local storage, so the revocation request
    /// still carries it even though the local sign-out is immediate.
    pub fn sign_out(&self) {
        #[cfg(target_arch = "wasm32")]
        if let Some(token) = api::load_token() {
            spawn(async move {
                let _ = api::post_json_with_token::<_, serde_json::Value>(
                    "/api/auth/logout",
                    &token,
                    &serde_json::json!({}),
                )
                .await;
            });
        }
        crate::app::api::clear_token();
        let mut identity = self.identity;
        let mut role = self.role;
        identity.set(None);
        role.set(None);
    }
}

/// Initialize session context provider - call once at app root
pub fn use_session_provider() {
    let identity = use_signal(|| None::<UserInfo>);
    let role = use_signal(|| None::<String>);
    let ready = use_signal(|| false);

    let ctx = SessionContext {
        identity,
        role,
        ready,
    };

    use_context_provider(|| ctx);

    // Client-side only: resolve the saved token
    #[cfg(target_arch = "wasm32")]
    {
        let mut identity = identity;
        let mut role = role;
        let mut ready = ready;
        use_effect(move || {
            spawn(async move {
                if api::load_token().is_none() {
                    ready.set(true);
                    return;
                }

                match api::fetch_json::<WhoAmI>("/api/auth/session").await {
                    Ok(who) => {
                        let user_id = who.user.id.clone();
                        identity.set(Some(who.user));

                        // Role comes from the user record; a missing record or
                        // failed lookup means no role, not a broken session.
                        let resolved =
                            api::fetch_json::<UserProfile>(&format!("/api/users/{}", user_id))
                                .await
                                .ok()
                                .and_then(|p| p.role);
                        role.set(resolved);
                    }
                    Err(_) => {
                        // Stale token
                        api::clear_token();
                        identity.set(None);
                        role.set(None);
                    }
                }
                ready.set(true);
            });
        });
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        // Server rendering has no token to resolve
        let _ = ctx;
    }
}

/// Get session context - use in any component
pub fn use_session() -> SessionContext {
    use_context::<SessionContext>()
}
