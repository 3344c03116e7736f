//! Navigation component for the web UI.

use dioxus::prelude::*;

use crate::app::session::use_session;
use crate::app::Route;

#[derive(Props, Clone, PartialEq)]
pub struct NavProps {
    /// The currently active page ID (e.g., "home", "profile")
    pub active: String,
}

/// Navigation bar using the Pico CSS nav pattern. Links change with the
/// session: anonymous visitors see Login/Register, members see their pages,
/// admins additionally see the dashboard.
#[component]
pub fn Nav(props: NavProps) -> Element {
    let session = use_session();
    let signed_in = session.is_signed_in();
    let is_admin = session.is_admin();

    let sign_out = move |e: Event<MouseData>| {
        e.prevent_default();
        session.sign_out();
        navigator().replace(Route::Login {});
    };

    rsx! {
        nav {
            ul {
                li {
                    strong { "Sports Buddy" }
                }
            }
            ul {
                li {
                    if props.active == "home" {
                        a { href: "/", "aria-current": "page", strong { "Events" } }
                    } else {
                        a { href: "/", "Events" }
                    }
                }
                if signed_in {
                    li {
                        if props.active == "add-event" {
                            a { href: "/add-event", "aria-current": "page", strong { "Add Event" } }
                        } else {
                            a { href: "/add-event", "Add Event" }
                        }
                    }
                    li {
                        if props.active == "profile" {
                            a { href: "/profile", "aria-current": "page", strong { "Profile" } }
                        } else {
                            a { href: "/profile", "Profile" }
                        }
                    }
                    if is_admin {
                        li {
                            if props.active == "admin" {
                                a { href: "/admin", "aria-current": "page", strong { "Admin" } }
                            } else {
                                a { href: "/admin", "Admin" }
                            }
                        }
                    }
                    li {
                        a { href: "#", onclick: sign_out, "Logout" }
                    }
                } else {
                    li {
                        if props.active == "login" {
                            a { href: "/login", "aria-current": "page", strong { "Login" } }
                        } else {
                            a { href: "/login", "Login" }
                        }
                    }
                    li {
                        if props.active == "register" {
                            a { href: "/register", "aria-current": "page", strong { "Register" } }
                        } else {
                            a { href: "/register", "Register" }
                        }
                    }
                }
            }
        }
    }
}
