//! User entry page: collects a name and email for a new user.

use crate::types::{Field, FieldError, UserForm, error_for};
use crate::user::SubmitUserEntry;
use leptos::prelude::*;

/// The user entry page component.
#[component]
pub fn UserEntryPage() -> impl IntoView {
    let submit = ServerAction::<SubmitUserEntry>::new();
    let name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let errors = RwSignal::new(Vec::<FieldError>::new());

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        match UserForm::new(name.get(), email.get()).validate() {
            Ok(form) => {
                errors.set(Vec::new());
                submit.dispatch(SubmitUserEntry { form });
            }
            Err(field_errors) => errors.set(field_errors),
        }
    };

    Effect::new(move || {
        if let Some(Ok(_)) = submit.value().get() {
            name.set(String::new());
            email.set(String::new());
        }
    });

    view! {
        <div class="user-entry-page">
            <h1>"New User"</h1>
            <form class="user-form" on:submit=on_submit>
                <UserFormFields name=name email=email errors=errors/>
                <div class="form-row">
                    <button type="submit" class="save-button" disabled=move || submit.pending().get()>
                        "Submit"
                    </button>
                </div>
            </form>
            {move || submit.value().get().map(|result| match result {
                Ok(receipt) => view! {
                    <p class="save-message">
                        {format!("Saved {} <{}> as entry {}.", receipt.name, receipt.email, receipt.id)}
                    </p>
                }.into_any(),
                Err(e) => view! {
                    <p class="error-message">{format!("Error: {}", e)}</p>
                }.into_any(),
            })}
        </div>
    }
}

/// Name and email inputs with per-field error messages.
#[component]
pub(crate) fn UserFormFields(
    name: RwSignal<String>,
    email: RwSignal<String>,
    errors: RwSignal<Vec<FieldError>>,
) -> impl IntoView {
    let field_error = move |field: Field| {
        move || {
            errors.with(|errs| error_for(errs, field)).map(|msg| {
                view! { <span class="field-error">{msg}</span> }
            })
        }
    };

    view! {
        <div class="form-row">
            <label for="name">"Name"</label>
            <input
                type="text"
                id="name"
                name="name"
                prop:value=move || name.get()
                on:input=move |ev| name.set(event_target_value(&ev))
            />
            {field_error(Field::Name)}
        </div>
        <div class="form-row">
            <label for="email">"Email"</label>
            <input
                type="email"
                id="email"
                name="email"
                prop:value=move || email.get()
                on:input=move |ev| email.set(event_target_value(&ev))
            />
            {field_error(Field::Email)}
        </div>
    }
}
