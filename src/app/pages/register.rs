//! Account registration page.

use dioxus::prelude::*;

use crate::app::api::SessionPayload;
use crate::app::components::{ErrorAlert, Layout, TextInput};
use crate::app::session::use_session;
use crate::app::Route;

/// Registration page component.
#[component]
pub fn Register() -> Element {
    let session = use_session();

    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut confirm = use_signal(String::new);
    let mut submitting = use_signal(|| false);
    let mut error = use_signal(|| None::<String>);

    let submit = move |e: FormEvent| {
        e.prevent_default();
        if submitting() {
            return;
        }
        if password() != confirm() {
            error.set(Some("Passwords do not match".to_string()));
            return;
        }
        submitting.set(true);
        error.set(None);

        spawn(async move {
            let body = serde_json::json!({
                "email": email(),
                "password": password(),
            });
            match crate::app::api::post_json::<_, SessionPayload>("/api/auth/register", &body).await
            {
                Ok(payload) => {
                    session.sign_in_complete(payload);
                    navigator().replace(Route::Home {});
                }
                Err(e) => {
                    error.set(Some(e));
                    submitting.set(false);
                }
            }
        });
    };

    rsx! {
        Layout {
            title: "Register".to_string(),
            nav_active: "register".to_string(),

            h1 { "Create an account" }

            if let Some(message) = error() {
                ErrorAlert {
                    message: message,
                    on_dismiss: move |_| error.set(None),
                }
            }

            form { onsubmit: submit,
                TextInput {
                    label: "Email",
                    input_type: "email",
                    required: true,
                    value: email(),
                    on_input: move |v| email.set(v),
                }
                TextInput {
                    label: "Password",
                    input_type: "password",
                    required: true,
                    value: password(),
                    on_input: move |v| password.set(v),
                }
                TextInput {
                    label: "Confirm password",
                    input_type: "password",
                    required: true,
                    value: confirm(),
                    on_input: move |v| confirm.set(v),
                }
                button {
                    r#type: "submit",
                    aria_busy: if submitting() { "true" } else { "false" },
                    disabled: submitting(),
                    "Register"
                }
            }

            p {
                "Already registered? "
                a { href: "/login", "Sign in" }
            }
        }
    }
}
