//! Event details page.

use dioxus::prelude::*;

use crate::app::api::EventSummary;
use crate::app::components::Layout;
use crate::app::session::use_session;

/// Event details page component.
#[component]
pub fn EventDetails(event_id: String) -> Element {
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
            article {
                "Event not found. "
                a { href: "/", "Back to events" }
            }
        },
        Some(Some(record)) => {
            let mine = session
                .identity()
                .map(|u| u.id == record.created_by)
                .unwrap_or(false);
            rsx! {
                article {
                    header {
                        h1 { "{record.title}" }
                    }
                    if let Some(url) = record.image_url.clone() {
                        img { src: "{url}", alt: "{record.title}" }
                    }
                    p { strong { "Sport: " } "{record.sport}" }
                    p { strong { "Where: " } "{record.area}, {record.city}" }
                    p { strong { "When: " } "{record.date_time}" }
                    p { small { "Posted by {record.creator_email}" } }
                    if mine {
                        footer {
                            a { href: "/edit-event/{record.id}", role: "button", class: "outline", "Edit" }
                        }
                    }
                }
            }
        }
    };

    rsx! {
        Layout {
            title: "Event".to_string(),
            nav_active: "home".to_string(),

            {content}
        }
    }
}
