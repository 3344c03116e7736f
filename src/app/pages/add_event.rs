//! Add-event page.

use dioxus::prelude::*;

use crate::app::components::Layout;
use crate::app::guards::RequireAuth;
use crate::app::pages::event_form::{EventForm, FormMode};

/// Add-event page component.
#[component]
pub fn AddEvent() -> Element {
    rsx! {
        Layout {
            title: "Add Event".to_string(),
            nav_active: "add-event".to_string(),

            RequireAuth {
                EventForm {
                    heading: "Add an event",
                    mode: FormMode::Create,
                    initial: None,
                }
            }
        }
    }
}
