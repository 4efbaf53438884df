//! Main Leptos application component and routing.

use crate::auth::client::use_auth_client;
use crate::pages::{AboutView, HomePage, UserEntryPage, UserUpdatePage};
use crate::routes::{ROUTE_TABLE, RouteName};
use crate::types::UserInfo;
use crate::user::get_current_user;
use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::{
    Lazy, StaticSegment,
    components::{A, Route, Router, Routes},
};

/// The main application component.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="User Portal"/>
        <Router>
            <Header/>
            <main class="container">
                <Routes fallback=|| "Page not found.".into_view()>
                    <Route path=StaticSegment(RouteName::Home.segment()) view=HomePage/>
                    <Route path=StaticSegment(RouteName::UserEntry.segment()) view=UserEntryPage/>
                    <Route path=StaticSegment(RouteName::UserUpdate.segment()) view=UserUpdatePage/>
                    <Route
                        path=StaticSegment(RouteName::About.segment())
                        view={Lazy::<AboutView>::new()}
                    />
                </Routes>
            </main>
        </Router>
    }
}

/// Header component with navigation and user menu.
#[component]
fn Header() -> impl IntoView {
    let user = Resource::new(|| (), |_| get_current_user());
    let login_href = use_auth_client().login_href();

    view! {
        <header class="header">
            <nav class="header-left">
                <a href="/" class="logo">"User Portal"</a>
                {ROUTE_TABLE
                    .iter()
                    .map(|route| view! { <A href=route.path>{route.title}</A> })
                    .collect_view()}
            </nav>
            <div class="header-right">
                <Suspense fallback=move || view! { <span>"Loading..."</span> }>
                    {move || {
                        let login_href = login_href.clone();
                        user.get().map(|result| {
                            match result {
                                Ok(Some(user_info)) => view! {
                                    <UserMenu user_info=user_info/>
                                }.into_any(),
                                Ok(None) | Err(_) => view! {
                                    <a href=login_href rel="external" class="login-button">"Log in"</a>
                                }.into_any(),
                            }
                        })
                    }}
                </Suspense>
            </div>
        </header>
    }
}

/// User menu component.
#[component]
fn UserMenu(user_info: UserInfo) -> impl IntoView {
    let logout_href = use_auth_client().logout_href();

    view! {
        <div class="user-menu">
            <span class="user-name">{user_info.label().to_string()}</span>
            <a href=logout_href rel="external">"Log out"</a>
        </div>
    }
}
