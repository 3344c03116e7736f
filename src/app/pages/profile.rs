//! Profile page: who you are and the events you created.

use dioxus::prelude::*;

use crate::app::api::EventSummary;
use crate::app::components::{ErrorAlert, Layout};
use crate::app::guards::RequireAuth;
use crate::app::session::use_session;

#[cfg(target_arch = "wasm32")]
fn confirm_delete(title: &str) -> bool {
    web_sys::window()
        .and_then(|w| {
            w.confirm_with_message(&format!("Delete \"{}\"?", title))
                .ok()
        })
        .unwrap_or(false)
}

#[cfg(not(target_arch = "wasm32"))]
fn confirm_delete(_title: &str) -> bool {
    false
}

/// Profile page component.
#[component]
pub fn Profile() -> Element {
    let session = use_session();

    let mut my_events = use_resource(|| async {
        crate::app::api::fetch_json::<Vec<EventSummary>>("/api/my-events")
            .await
            .ok()
    });

    let mut error = use_signal(|| None::<String>);

    let delete_event = move |event: EventSummary| {
        if !confirm_delete(&event.title) {
            return;
        }
        spawn(async move {
            let url = format!("/api/events/{}", event.id);
            match crate::app::api::delete_json::<serde_json::Value>(&url).await {
                Ok(_) => my_events.restart(),
                Err(e) => error.set(Some(format!("Delete failed: {e}"))),
            }
        });
    };

    let email = session.identity().map(|u| u.email).unwrap_or_default();
    let loaded = my_events.read().clone();

    let events_section = match loaded {
        None => rsx! {
            article { aria_busy: "true", "Loading your events..." }
        },
        Some(None) => rsx! {
            article { "Could not load your events." }
        },
        Some(Some(list)) if list.is_empty() => rsx! {
            article {
                "You have not created any events yet. "
                a { href: "/add-event", "Add one" }
            }
        },
        Some(Some(list)) => rsx! {
            for event in list {
                article { key: "{event.id}",
                    header {
                        a { href: "/event/{event.id}",
                            strong { "{event.title}" }
                        }
                    }
                    p { "{event.sport} · {event.area}, {event.city} · {event.date_time}" }
                    footer {
                        a { href: "/edit-event/{event.id}", role: "button", class: "outline", "Edit" }
                        button {
                            class: "outline secondary",
                            onclick: {
                                let event = event.clone();
                                move |_| delete_event(event.clone())
                            },
                            "Delete"
                        }
                    }
                }
            }
        },
    };

    rsx! {
        Layout {
            title: "Profile".to_string(),
            nav_active: "profile".to_string(),

            RequireAuth {
                h1 { "Profile" }
                p { "Signed in as " strong { "{email}" } }

                if let Some(message) = error() {
                    ErrorAlert {
                        message: message,
                        on_dismiss: move |_| error.set(None),
                    }
                }

                h2 { "My events" }
                section { id: "my-events",
                    {events_section}
                }
            }
        }
    }
}
