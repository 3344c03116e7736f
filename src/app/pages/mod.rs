//! Page components for the Dioxus fullstack web UI.

pub mod add_event;
pub mod admin;
pub mod edit_event;
pub mod event_details;
pub mod event_form;
pub mod home;
pub mod login;
pub mod profile;
pub mod register;

pub use add_event::AddEvent;
pub use admin::Admin;
pub use edit_event::EditEvent;
pub use event_details::EventDetails;
pub use home::Home;
pub use login::Login;
pub use profile::Profile;
pub use register::Register;
