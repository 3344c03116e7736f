//! Reusable form input components.

use dioxus::prelude::*;

/// A labeled text input.
#[component]
pub fn TextInput(
    /// Input label
    label: &'static str,
    /// Current value
    value: String,
    /// HTML input type
    #[props(default = "text")]
    input_type: &'static str,
    /// Mark the field as required
    #[props(default = false)]
    required: bool,
    /// Called with the new value on each keystroke
    on_input: EventHandler<String>,
) -> Element {
    rsx! {
        label {
            "{label}"
            input {
                r#type: input_type,
                value: "{value}",
                required: required,
                oninput: move |e| on_input.call(e.value()),
            }
        }
    }
}

/// A labeled select with a disabled placeholder option.
#[component]
pub fn SelectInput(
    /// Input label
    label: &'static str,
    /// Currently selected value (empty string selects the placeholder)
    value: String,
    /// Option values, shown verbatim
    options: Vec<String>,
    /// Placeholder text for the empty option
    #[props(default = "Select...")]
    placeholder: &'static str,
    /// Disable the whole select
    #[props(default = false)]
    disabled: bool,
    /// Called with the newly selected value
    on_change: EventHandler<String>,
) -> Element {
    rsx! {
        label {
            "{label}"
            select {
                value: "{value}",
                disabled: disabled,
                onchange: move |e| on_change.call(e.value()),
                option { value: "", disabled: true, selected: value.is_empty(), "{placeholder}" }
                for opt in options {
                    option { key: "{opt}", value: "{opt}", selected: opt == value, "{opt}" }
                }
            }
        }
    }
}
