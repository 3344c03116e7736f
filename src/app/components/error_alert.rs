//! Dismissable error alert component.

use dioxus::prelude::*;

/// A dismissable error alert that displays an error message with a close button.
#[component]
pub fn ErrorAlert(
    /// The error message to display
    message: String,
    /// Called when the dismiss button is clicked
    on_dismiss: EventHandler<()>,
) -> Element {
    rsx! {
        div { class: "error-alert", role: "alert",
            "{message}"
            button {
                class: "outline secondary",
                onclick: move |_| on_dismiss.call(()),
                "×"
            }
        }
    }
}
