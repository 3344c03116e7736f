//! Sports Buddy - community sports meetup listings.
//!
//! A fullstack Dioxus application:
//! - Reactive client (session context, route guards, dependent dropdowns)
//! - axum JSON API for auth, events, reference data and image uploads
//! - JSON-file persistence under the platform data directory
//!
//! Server-side modules are gated behind the `server` feature; the wasm
//! client build compiles only `app`.

pub mod app;

#[cfg(feature = "server")]
pub mod api;
#[cfg(feature = "server")]
pub mod auth;
#[cfg(feature = "server")]
pub mod config;
#[cfg(feature = "server")]
pub mod storage;
#[cfg(feature = "server")]
pub mod store;
