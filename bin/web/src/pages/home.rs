//! Home page component.

use crate::auth::client::use_auth_client;
use crate::user::get_current_user;
use leptos::prelude::*;

/// The home page component.
#[component]
pub fn HomePage() -> impl IntoView {
    let user = Resource::new(|| (), |_| get_current_user());
    let login_href = use_auth_client().login_href();

    view! {
        <div class="home-page">
            <Suspense fallback=move || view! { <p>"Loading..."</p> }>
                {move || {
                    let login_href = login_href.clone();
                    user.get().map(|result| {
                        match result {
                            Ok(Some(user_info)) => {
                                let greeting = format!("Welcome, {}!", user_info.label());
                                view! {
                                    <div>
                                        <h1>{greeting}</h1>
                                        <p>"Add someone new or keep your own details up to date."</p>
                                        <a href="/userEntry" class="cta-button">"New entry"</a>
                                    </div>
                                }.into_any()
                            },
                            Ok(None) => view! {
                                <div>
                                    <h1>"User Portal"</h1>
                                    <p>"Please log in to manage your profile."</p>
                                    <a href=login_href rel="external" class="cta-button">"Log in"</a>
                                </div>
                            }.into_any(),
                            Err(_) => view! {
                                <div>
                                    <h1>"User Portal"</h1>
                                    <a href=login_href rel="external" class="cta-button">"Log in"</a>
                                </div>
                            }.into_any(),
                        }
                    })
                }}
            </Suspense>
        </div>
    }
}
