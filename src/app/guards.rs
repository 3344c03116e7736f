//! Route guards.
//!
//! The decision logic is plain functions over session state; the components
//! apply a decision by rendering children, a placeholder, or a replace-style
//! redirect so guarded URLs never enter the history stack.

use dioxus::prelude::*;

use crate::app::session::use_session;
use crate::app::Route;

/// What a guard does with the current navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session still resolving; render nothing yet
    Wait,
    Allow,
    RedirectLogin,
    RedirectHome,
}

/// Signed-in users only
pub fn decide_auth(ready: bool, signed_in: bool) -> GuardDecision {
    if !ready {
        GuardDecision::Wait
    } else if signed_in {
        GuardDecision::Allow
    } else {
        GuardDecision::RedirectLogin
    }
}

/// Admins only. Everyone else, signed in or not, goes to the home view.
pub fn decide_admin(ready: bool, signed_in: bool, is_admin: bool) -> GuardDecision {
    if !ready {
        GuardDecision::Wait
    } else if signed_in && is_admin {
        GuardDecision::Allow
    } else {
        GuardDecision::RedirectHome
    }
}

/// Wrap content that requires a signed-in user
#[component]
pub fn RequireAuth(children: Element) -> Element {
    let session = use_session();
    let decision = decide_auth(session.is_ready(), session.is_signed_in());

    match decision {
        GuardDecision::Wait => rsx! {
            p { "aria-busy": "true", "Loading..." }
        },
        GuardDecision::Allow => rsx! {
            {children}
        },
        _ => {
            navigator().replace(Route::Login {});
            rsx! {}
        }
    }
}

/// Wrap content that requires the admin role
#[component]
pub fn RequireAdmin(children: Element) -> Element {
    let session = use_session();
    let decision = decide_admin(session.is_ready(), session.is_signed_in(), session.is_admin());

    match decision {
        GuardDecision::Wait => rsx! {
            p { "aria-busy": "true", "Loading..." }
        },
        GuardDecision::Allow => rsx! {
            {children}
        },
        GuardDecision::RedirectLogin => {
            navigator().replace(Route::Login {});
            rsx! {}
        }
        GuardDecision::RedirectHome => {
            navigator().replace(Route::Home {});
            rsx! {}
        }
    }
}
