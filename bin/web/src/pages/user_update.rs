//! User update page: edits the signed-in user's profile.

use super::user_entry::UserFormFields;
use crate::auth::client::use_auth_client;
use crate::types::{FieldError, UserForm, UserInfo};
use crate::user::{UpdateProfile, get_current_user};
use leptos::prelude::*;

/// The user update page component.
#[component]
pub fn UserUpdatePage() -> impl IntoView {
    let user = Resource::new(|| (), |_| get_current_user());
    let login_href = use_auth_client().login_href();

    view! {
        <div class="user-update-page">
            <h1>"Update Profile"</h1>
            <Suspense fallback=move || view! { <p>"Loading..."</p> }>
                {move || {
                    let login_href = login_href.clone();
                    user.get().map(|result| {
                        match result {
                            Ok(Some(user_info)) => view! {
                                <ProfileForm user_info=user_info/>
                            }.into_any(),
                            Ok(None) => view! {
                                <div>
                                    <p>"Please log in to update your profile."</p>
                                    <a href=login_href rel="external">"Log in"</a>
                                </div>
                            }.into_any(),
                            Err(_) => view! {
                                <div>
                                    <p>"Failed to load your profile. Please try again."</p>
                                </div>
                            }.into_any(),
                        }
                    })
                }}
            </Suspense>
        </div>
    }
}

/// Profile form prefilled from the current user (requires authenticated user).
#[component]
fn ProfileForm(user_info: UserInfo) -> impl IntoView {
    let update = ServerAction::<UpdateProfile>::new();
    let name = RwSignal::new(user_info.display_name.clone().unwrap_or_default());
    let email = RwSignal::new(user_info.email.clone().unwrap_or_default());
    let errors = RwSignal::new(Vec::<FieldError>::new());
    let (save_message, set_save_message) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        match UserForm::new(name.get(), email.get()).validate() {
            Ok(form) => {
                errors.set(Vec::new());
                update.dispatch(UpdateProfile { form });
            }
            Err(field_errors) => errors.set(field_errors),
        }
    };

    Effect::new(move || {
        if let Some(result) = update.value().get() {
            match result {
                Ok(updated) => {
                    set_save_message.set(Some(format!("Saved profile for {}.", updated.label())))
                }
                Err(e) => set_save_message.set(Some(format!("Error: {}", e))),
            }
        }
    });

    view! {
        <form class="user-form" on:submit=on_submit>
            <UserFormFields name=name email=email errors=errors/>
            <div class="form-row">
                <button type="submit" class="save-button" disabled=move || update.pending().get()>
                    "Save"
                </button>
                {move || save_message.get().map(|msg| view! { <span class="save-message">{msg}</span> })}
            </div>
        </form>
    }
}
