//! About page, split from the main bundle and loaded on first visit.

use leptos::prelude::*;
use leptos_router::{LazyRoute, lazy_route};

/// Deferred view for `/about`.
pub struct AboutView;

#[lazy_route]
impl LazyRoute for AboutView {
    fn data() -> Self {
        AboutView
    }

    fn view(_this: Self) -> AnyView {
        view! {
            <div class="about-page">
                <h1>"About"</h1>
                <p>
                    "User Portal lets you register new users and keep your own profile current. "
                    "Sign-in is handled by the organisation's identity provider."
                </p>
                <p>"This page is loaded on demand the first time you open it."</p>
            </div>
        }
        .into_any()
    }
}
