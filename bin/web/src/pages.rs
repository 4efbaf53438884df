//! Page components for the application.
//!
//! Each page is a Leptos component that renders one entry of the
//! [route table](crate::routes::ROUTE_TABLE).

pub mod about;
pub mod home;
pub mod user_entry;
pub mod user_update;

pub use about::AboutView;
pub use home::HomePage;
pub use user_entry::UserEntryPage;
pub use user_update::UserUpdatePage;
