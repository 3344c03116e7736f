//! Admin dashboard: manage the reference collections.
//!
//! Each panel is driven by the `AdminSection` enum; endpoints come from the
//! enum, never from concatenated user input.

use dioxus::prelude::*;

use crate::app::api::{RefAddPayload, RefOption};
use crate::app::components::{ErrorAlert, Layout, SelectInput, TextInput};
use crate::app::guards::RequireAdmin;

/// The closed set of collections an admin can manage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminSection {
    Categories,
    Cities,
    Areas,
}

impl AdminSection {
    pub const ALL: [AdminSection; 3] =
        [AdminSection::Categories, AdminSection::Cities, AdminSection::Areas];

    pub fn api_path(self) -> &'static str {
        match self {
            AdminSection::Categories => "/api/categories",
            AdminSection::Cities => "/api/cities",
            AdminSection::Areas => "/api/areas",
        }
    }

    pub fn heading(self) -> &'static str {
        match self {
            AdminSection::Categories => "Sport categories",
            AdminSection::Cities => "Cities",
            AdminSection::Areas => "Areas",
        }
    }

    /// Areas are scoped to a city; the other collections are flat
    pub fn needs_city(self) -> bool {
        self == AdminSection::Areas
    }
}

/// Validate an add-form submission. Blank names and city-less areas never
/// reach the wire.
pub fn build_ref_payload(
    section: AdminSection,
    name: &str,
    city: &str,
) -> Result<RefAddPayload, String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Name is required".to_string());
    }
    if section.needs_city() && city.is_empty() {
        return Err("Pick a city".to_string());
    }
    Ok(RefAddPayload {
        name: name.to_string(),
        city_name: if section.needs_city() {
            Some(city.to_string())
        } else {
            None
        },
    })
}

/// Admin dashboard page component.
#[component]
pub fn Admin() -> Element {
    rsx! {
        Layout {
            title: "Admin".to_string(),
            nav_active: "admin".to_string(),

            RequireAdmin {
                h1 { "Admin dashboard" }
                for section in AdminSection::ALL {
                    RefPanel { section }
                }
            }
        }
    }
}

/// One collection: its items, an add form, and per-item delete.
#[component]
fn RefPanel(section: AdminSection) -> Element {
    let mut items = use_resource(move || async move {
        crate::app::api::fetch_json::<Vec<RefOption>>(section.api_path())
            .await
            .unwrap_or_default()
    });

    // City options for the area add form
    let cities = use_resource(move || async move {
        if section.needs_city() {
            crate::app::api::fetch_json::<Vec<RefOption>>("/api/cities")
                .await
                .unwrap_or_default()
        } else {
            Vec::new()
        }
    });

    let mut name = use_signal(String::new);
    let mut city = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);

    let add = move |e: FormEvent| {
        e.prevent_default();
        let payload = match build_ref_payload(section, &name(), &city()) {
            Ok(payload) => payload,
            Err(message) => {
                error.set(Some(message));
                return;
            }
        };
        spawn(async move {
            match crate::app::api::post_json::<_, RefOption>(section.api_path(), &payload).await {
                Ok(_) => {
                    name.set(String::new());
                    error.set(None);
                    items.restart();
                }
                Err(e) => error.set(Some(e)),
            }
        });
    };

    let delete = move |id: String| {
        spawn(async move {
            let url = format!("{}/{}", section.api_path(), id);
            match crate::app::api::delete_json::<serde_json::Value>(&url).await {
                Ok(_) => items.restart(),
                Err(e) => error.set(Some(e)),
            }
        });
    };

    let list = items.read().clone().unwrap_or_default();
    let city_options: Vec<String> = cities
        .read()
        .clone()
        .unwrap_or_default()
        .into_iter()
        .map(|c| c.name)
        .collect();

    rsx! {
        section {
            h2 { "{section.heading()}" }

            if let Some(message) = error() {
                ErrorAlert {
                    message: message,
                    on_dismiss: move |_| error.set(None),
                }
            }

            form { onsubmit: add,
                TextInput {
                    label: "Name",
                    required: true,
                    value: name(),
                    on_input: move |v| name.set(v),
                }
                if section.needs_city() {
                    SelectInput {
                        label: "City",
                        value: city(),
                        options: city_options,
                        placeholder: "Select a city",
                        on_change: move |v| city.set(v),
                    }
                }
                button { r#type: "submit", "Add" }
            }

            if list.is_empty() {
                p { "Nothing here yet." }
            } else {
                ul {
                    for item in list {
                        li { key: "{item.id}",
                            if let Some(city_name) = item.city_name.clone() {
                                "{item.name} ({city_name}) "
                            } else {
                                "{item.name} "
                            }
                            button {
                                class: "outline secondary",
                                onclick: {
                                    let id = item.id.clone();
                                    move |_| delete(id.clone())
                                },
                                "Delete"
                            }
                        }
                    }
                }
            }
        }
    }
}
