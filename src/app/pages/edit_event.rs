//! Edit-event page.
//!
//! Loads the event, checks the visitor actually created it, then hands the
//! record to the shared form. The server enforces ownership again on write.

use dioxus::prelude::*;

use crate::app::api::EventSummary;
use crate::app::components::Layout;
use crate::app::guards::RequireAuth;
use crate::app::pages::event_form::{EventForm, FormMode};
use crate::app::session::use_session;
use crate::app::Route;

/// Edit-event page component.
#[component]
pub fn EditEvent(event_id: String) -> Element {
    let session = use_session();

    let fetch_id = event_id.clone();
    let event = use_resource(move || {
        let fetch_id = fetch_id.clone();
        async move {
            crate::app::api::fetch_json::<EventSummary>(&format!("/api/events/{}", fetch_id))
                .await
                .ok()
        }
    });

    let loaded = event.read().clone();

    let content = match loaded {
        None => rsx! {
            article { aria_busy: "true", "Loading event..." }
        },
        Some(None) => rsx! {
            article { "Event not found." }
        },
        Some(Some(record)) => {
            let mine = session
                .identity()
                .map(|u| u.id == record.created_by)
                .unwrap_or(false);
            if !mine {
                navigator().replace(Route::Home {});
                rsx! {}
            } else {
                rsx! {
                    EventForm {
                        heading: "Edit event",
                        mode: FormMode::Edit { event_id: event_id.clone() },
                        initial: Some(record),
                    }
                }
            }
        }
    };

    rsx! {
        Layout {
            title: "Edit Event".to_string(),
            nav_active: "home".to_string(),

            RequireAuth {
                {content}
            }
        }
    }
}
