//! Dioxus fullstack application entry point.
//!
//! This module provides the main App component that serves as the root
//! of the Dioxus application with client-side hydration.

use dioxus::prelude::*;

pub mod api;
pub mod components;
pub mod guards;
pub mod pages;
pub mod ref_data;
pub mod session;

use pages::{AddEvent, Admin, EditEvent, EventDetails, Home, Login, Profile, Register};
use session::use_session_provider;

/// Root app component with routing
#[component]
pub fn App() -> Element {
    // Initialize session context at app root (token restore + role resolution)
    use_session_provider();

    rsx! {
        Router::<Route> {}
    }
}

/// Application routes
#[derive(Clone, Routable, Debug, PartialEq)]
pub enum Route {
    #[route("/")]
    Home {},
    #[route("/login")]
    Login {},
    #[route("/register")]
    Register {},
    #[route("/event/:event_id")]
    EventDetails { event_id: String },
    #[route("/add-event")]
    AddEvent {},
    #[route("/edit-event/:event_id")]
    EditEvent { event_id: String },
    #[route("/profile")]
    Profile {},
    #[route("/admin")]
    Admin {},
}
