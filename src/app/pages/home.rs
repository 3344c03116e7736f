//! Event listing page with search and owner actions.

use dioxus::prelude::*;

use crate::app::api::EventSummary;
use crate::app::components::{ErrorAlert, Layout};
use crate::app::session::use_session;

/// Case-insensitive substring match over the fields a visitor would search
/// by. A blank query matches everything.
pub fn filter_events(events: &[EventSummary], query: &str) -> Vec<EventSummary> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return events.to_vec();
    }
    events
        .iter()
        .filter(|e| {
            e.title.to_lowercase().contains(&query)
                || e.sport.to_lowercase().contains(&query)
                || e.city.to_lowercase().contains(&query)
                || e.area.to_lowercase().contains(&query)
        })
        .cloned()
        .collect()
}

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

/// Event listing page component.
#[component]
pub fn Home() -> Element {
    let session = use_session();

    let mut events_resource = use_resource(|| async {
        crate::app::api::fetch_json::<Vec<EventSummary>>("/api/events")
            .await
            .ok()
    });

    // Local working copy so deletes can be applied optimistically
    let mut events = use_signal(Vec::<EventSummary>::new);
    use_effect(move || {
        if let Some(Some(list)) = events_resource.read().clone() {
            events.set(list);
        }
    });

    let mut search = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);

    // Optimistic delete: the card disappears immediately, and comes back if
    // the server rejects the request.
    let delete_event = move |event: EventSummary| {
        if !confirm_delete(&event.title) {
            return;
        }

        let removed = event.clone();
        events.with_mut(|list| list.retain(|e| e.id != event.id));

        spawn(async move {
            let url = format!("/api/events/{}", removed.id);
            if let Err(e) = crate::app::api::delete_json::<serde_json::Value>(&url).await {
                error.set(Some(format!("Delete failed: {e}")));
                events.with_mut(|list| {
                    if !list.iter().any(|x| x.id == removed.id) {
                        list.push(removed.clone());
                    }
                });
                events_resource.restart();
            }
        });
    };

    let is_loading = events_resource.read().is_none();
    let my_id = session.identity().map(|u| u.id);
    let visible = filter_events(&events(), &search());

    let content = if is_loading {
        rsx! {
            article { aria_busy: "true", "Loading events..." }
        }
    } else if visible.is_empty() {
        rsx! {
            article {
                if search().trim().is_empty() {
                    "No events yet. Be the first to add one!"
                } else {
                    "No events match your search."
                }
            }
        }
    } else {
        rsx! {
            for event in visible {
                EventCard {
                    key: "{event.id}",
                    event: event.clone(),
                    is_owner: my_id.as_deref() == Some(event.created_by.as_str()),
                    on_delete: delete_event,
                }
            }
        }
    };

    rsx! {
        Layout {
            title: "Events".to_string(),
            nav_active: "home".to_string(),

            h1 { "Upcoming Events" }

            if let Some(message) = error() {
                ErrorAlert {
                    message: message,
                    on_dismiss: move |_| error.set(None),
                }
            }

            input {
                r#type: "search",
                placeholder: "Search by title, sport, city or area",
                value: "{search}",
                oninput: move |e| search.set(e.value()),
            }

            section { id: "events",
                {content}
            }
        }
    }
}

/// Event card component
#[component]
fn EventCard(event: EventSummary, is_owner: bool, on_delete: EventHandler<EventSummary>) -> Element {
    let event_for_delete = event.clone();

    rsx! {
        article {
            header {
                a { href: "/event/{event.id}",
                    strong { "{event.title}" }
                }
            }
            if let Some(url) = event.image_url.clone() {
                img { src: "{url}", alt: "{event.title}" }
            }
            p { "{event.sport} · {event.area}, {event.city}" }
            p { small { "{event.date_time} · by {event.creator_email}" } }
            if is_owner {
                footer {
                    a { href: "/edit-event/{event.id}", role: "button", class: "outline", "Edit" }
                    button {
                        class: "outline secondary",
                        onclick: move |_| on_delete.call(event_for_delete.clone()),
                        "Delete"
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(title: &str, sport: &str, city: &str, area: &str) -> EventSummary {
        EventSummary {
            id: format!("id-{title}"),
            title: title.to_string(),
            sport: sport.to_string(),
            city: city.to_string(),
            area: area.to_string(),
            ..Default::default()
        }
    }

    fn sample() -> Vec<EventSummary> {
        vec![
            event("Morning Cricket", "Cricket", "Pune", "Kothrud"),
            event("Evening Football", "Football", "Mumbai", "Andheri"),
            event("Weekend Badminton", "Badminton", "Pune", "Baner"),
        ]
    }

    #[test]
    fn blank_query_returns_everything() {
        assert_eq!(filter_events(&sample(), "").len(), 3);
        assert_eq!(filter_events(&sample(), "   ").len(), 3);
    }

    #[test]
    fn matches_are_case_insensitive() {
        let hits = filter_events(&sample(), "CRICKET");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Morning Cricket");
    }

    #[test]
    fn substrings_match_any_field() {
        assert_eq!(filter_events(&sample(), "pune").len(), 2);
        assert_eq!(filter_events(&sample(), "andheri").len(), 1);
        assert_eq!(filter_events(&sample(), "week").len(), 1);
    }

    #[test]
    fn no_match_yields_empty() {
        assert!(filter_events(&sample(), "tennis").is_empty());
    }

    #[test]
    fn order_is_preserved() {
        let hits = filter_events(&sample(), "pune");
        assert_eq!(hits[0].title, "Morning Cricket");
        assert_eq!(hits[1].title, "Weekend Badminton");
    }
}
