//! Shared event form used by the add and edit pages.
//!
//! The form is a two-phase machine: Idle accepts edits and a submit,
//! Submitting ignores further submits until the request settles. When an
//! image is picked it is uploaded first and the returned URL goes into the
//! event payload, so an event never references an image that failed to
//! upload.

use base64::Engine;
use dioxus::prelude::*;

use crate::app::api::{EventPayload, EventSummary, RefOption, UploadPayload, UploadResult};
use crate::app::components::{ErrorAlert, SelectInput, TextInput};
use crate::app::ref_data::AreaCascade;
use crate::app::Route;

/// Form lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormPhase {
    #[default]
    Idle,
    Submitting,
}

/// Start a submission. Returns None while one is already in flight, which
/// is what makes double-clicking the submit button harmless.
pub fn begin_submit(phase: FormPhase) -> Option<FormPhase> {
    match phase {
        FormPhase::Idle => Some(FormPhase::Submitting),
        FormPhase::Submitting => None,
    }
}

/// Assemble the request body, rejecting incomplete forms
pub fn build_payload(
    title: &str,
    sport: &str,
    city: &str,
    area: &str,
    date_time: &str,
    image_url: Option<String>,
) -> Result<EventPayload, String> {
    let title = title.trim();
    if title.is_empty() {
        return Err("Title is required".to_string());
    }
    if sport.is_empty() {
        return Err("Pick a sport".to_string());
    }
    if city.is_empty() {
        return Err("Pick a city".to_string());
    }
    if area.is_empty() {
        return Err("Pick an area".to_string());
    }
    if date_time.is_empty() {
        return Err("Pick a date and time".to_string());
    }

    Ok(EventPayload {
        title: title.to_string(),
        sport: sport.to_string(),
        city: city.to_string(),
        area: area.to_string(),
        date_time: date_time.to_string(),
        image_url,
    })
}

/// What the form writes on submit
#[derive(Debug, Clone, PartialEq)]
pub enum FormMode {
    Create,
    Edit { event_id: String },
}

/// A settled save lands back on the listing, for create and edit alike
pub fn after_save_route(_mode: &FormMode) -> Route {
    Route::Home {}
}

/// Event create/edit form.
#[component]
pub fn EventForm(heading: &'static str, mode: FormMode, initial: Option<EventSummary>) -> Element {
    let initial_for_fields = initial.clone();
    let mut title = use_signal(move || {
        initial_for_fields
            .as_ref()
            .map(|e| e.title.clone())
            .unwrap_or_default()
    });
    let initial_for_sport = initial.clone();
    let mut sport = use_signal(move || {
        initial_for_sport
            .as_ref()
            .map(|e| e.sport.clone())
            .unwrap_or_default()
    });
    let initial_for_date = initial.clone();
    let mut date_time = use_signal(move || {
        initial_for_date
            .as_ref()
            .map(|e| e.date_time.clone())
            .unwrap_or_default()
    });
    let existing_image = initial.as_ref().and_then(|e| e.image_url.clone());

    let mut cascade = use_signal(AreaCascade::new);
    let mut picked_file = use_signal(|| None::<(String, Vec<u8>)>);
    let mut phase = use_signal(FormPhase::default);
    let mut error = use_signal(|| None::<String>);

    // Sport options
    let categories = use_resource(|| async {
        crate::app::api::fetch_json::<Vec<RefOption>>("/api/categories")
            .await
            .unwrap_or_default()
    });
    // City options
    let cities = use_resource(|| async {
        crate::app::api::fetch_json::<Vec<RefOption>>("/api/cities")
            .await
            .unwrap_or_default()
    });

    // Edit forms start with the saved city/area pair and still need the
    // area options for that city.
    let initial_for_cascade = initial.clone();
    use_effect(move || {
        if let Some(event) = initial_for_cascade.clone() {
            let generation = cascade
                .write()
                .restore(event.city.clone(), event.area.clone());
            spawn(async move {
                fetch_areas(cascade, generation, event.city).await;
            });
        }
    });

    let on_city_change = move |city: String| {
        let generation = cascade.write().select_city(city.clone());
        spawn(async move {
            fetch_areas(cascade, generation, city).await;
        });
    };

    let on_file_change = move |e: FormEvent| {
        if let Some(file) = e.files().first().cloned() {
            spawn(async move {
                if let Ok(bytes) = file.read_bytes().await {
                    picked_file.set(Some((file.name(), bytes.to_vec())));
                }
            });
        }
    };

    let mode_for_submit = mode.clone();
    let submit = move |e: FormEvent| {
        e.prevent_default();

        let Some(next) = begin_submit(phase()) else {
            return;
        };

        let state = cascade.read();
        let payload = match build_payload(
            &title(),
            &sport(),
            state.city.as_deref().unwrap_or(""),
            state.area.as_deref().unwrap_or(""),
            &date_time(),
            existing_image.clone(),
        ) {
            Ok(payload) => payload,
            Err(message) => {
                error.set(Some(message));
                return;
            }
        };
        drop(state);

        phase.set(next);
        error.set(None);

        let mode = mode_for_submit.clone();
        spawn(async move {
            let mut payload = payload;

            // Image first, event second
            if let Some((file_name, bytes)) = picked_file() {
                let body = UploadPayload {
                    file_name,
                    data: base64::engine::general_purpose::STANDARD.encode(&bytes),
                };
                match crate::app::api::post_json::<_, UploadResult>("/api/upload", &body).await {
                    Ok(result) => payload.image_url = Some(result.url),
                    Err(e) => {
                        error.set(Some(format!("Image upload failed: {e}")));
                        phase.set(FormPhase::Idle);
                        return;
                    }
                }
            }

            let result = match &mode {
                FormMode::Create => {
                    crate::app::api::post_json::<_, EventSummary>("/api/events", &payload).await
                }
                FormMode::Edit { event_id } => {
                    let url = format!("/api/events/{}", event_id);
                    crate::app::api::put_json::<_, EventSummary>(&url, &payload).await
                }
            };

            match result {
                Ok(_) => {
                    navigator().replace(after_save_route(&mode));
                }
                Err(e) => {
                    error.set(Some(e));
                    phase.set(FormPhase::Idle);
                }
            }
        });
    };

    let sport_options: Vec<String> = categories
        .read()
        .clone()
        .unwrap_or_default()
        .into_iter()
        .map(|c| c.name)
        .collect();
    let city_options: Vec<String> = cities
        .read()
        .clone()
        .unwrap_or_default()
        .into_iter()
        .map(|c| c.name)
        .collect();
    let state = cascade.read().clone();
    let area_options: Vec<String> = state.options.iter().map(|a| a.name.clone()).collect();
    let area_placeholder = if state.loading {
        "Loading areas..."
    } else {
        "Select an area"
    };
    let submitting = phase() == FormPhase::Submitting;

    rsx! {
        h1 { "{heading}" }

        if let Some(message) = error() {
            ErrorAlert {
                message: message,
                on_dismiss: move |_| error.set(None),
            }
        }

        form { onsubmit: submit,
            TextInput {
                label: "Title",
                required: true,
                value: title(),
                on_input: move |v| title.set(v),
            }
            SelectInput {
                label: "Sport",
                value: sport(),
                options: sport_options,
                placeholder: "Select a sport",
                on_change: move |v| sport.set(v),
            }
            SelectInput {
                label: "City",
                value: state.city.clone().unwrap_or_default(),
                options: city_options,
                placeholder: "Select a city",
                on_change: on_city_change,
            }
            SelectInput {
                label: "Area",
                value: state.area.clone().unwrap_or_default(),
                options: area_options,
                placeholder: area_placeholder,
                disabled: state.city.is_none() || state.loading,
                on_change: move |v| cascade.write().select_area(v),
            }
            TextInput {
                label: "Date and time",
                input_type: "datetime-local",
                required: true,
                value: date_time(),
                on_input: move |v| date_time.set(v),
            }
            label {
                "Image"
                input {
                    r#type: "file",
                    accept: "image/*",
                    onchange: on_file_change,
                }
            }
            button {
                r#type: "submit",
                aria_busy: if submitting { "true" } else { "false" },
                disabled: submitting,
                "Save event"
            }
        }
    }
}

async fn fetch_areas(mut cascade: Signal<AreaCascade>, generation: u64, city: String) {
    let url = format!("/api/areas?city={}", urlencoding::encode(&city));
    match crate::app::api::fetch_json::<Vec<RefOption>>(&url).await {
        Ok(options) => {
            cascade.write().apply_options(generation, options);
        }
        Err(_) => {
            cascade.write().apply_error(generation);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_only_starts_from_idle() {
        assert_eq!(begin_submit(FormPhase::Idle), Some(FormPhase::Submitting));
        assert_eq!(begin_submit(FormPhase::Submitting), None);
    }

    #[test]
    fn payload_requires_every_field() {
        assert!(build_payload("", "Cricket", "Pune", "Kothrud", "2025-01-01T18:00", None).is_err());
        assert!(build_payload("Game", "", "Pune", "Kothrud", "2025-01-01T18:00", None).is_err());
        assert!(build_payload("Game", "Cricket", "", "Kothrud", "2025-01-01T18:00", None).is_err());
        assert!(build_payload("Game", "Cricket", "Pune", "", "2025-01-01T18:00", None).is_err());
        assert!(build_payload("Game", "Cricket", "Pune", "Kothrud", "", None).is_err());
    }

    #[test]
    fn payload_trims_the_title() {
        let payload = build_payload(
            "  Sunday Game ",
            "Cricket",
            "Pune",
            "Kothrud",
            "2025-01-01T18:00",
            None,
        )
        .expect("valid payload");
        assert_eq!(payload.title, "Sunday Game");
        assert_eq!(payload.image_url, None);
    }

    #[test]
    fn saving_returns_to_the_listing() {
        assert_eq!(after_save_route(&FormMode::Create), Route::Home {});
        assert_eq!(
            after_save_route(&FormMode::Edit {
                event_id: "e1".to_string()
            }),
            Route::Home {}
        );
    }

    #[test]
    fn payload_keeps_an_existing_image() {
        let payload = build_payload(
            "Game",
            "Cricket",
            "Pune",
            "Kothrud",
            "2025-01-01T18:00",
            Some("/uploads/abc-pitch.jpg".to_string()),
        )
        .expect("valid payload");
        assert_eq!(payload.image_url.as_deref(), Some("/uploads/abc-pitch.jpg"));
    }
}
