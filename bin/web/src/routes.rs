//! The client-side route table.
//!
//! `ROUTE_TABLE` is the single description of every navigable path. The
//! [`App`](crate::app::App) component registers each route with the router
//! from its [`RouteName::segment`], the header navigation is generated from the
//! table, and the server answers exactly these paths with the application shell.

/// Symbolic route names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteName {
    Home,
    UserEntry,
    UserUpdate,
    About,
}

impl RouteName {
    /// Returns the route's symbolic name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::UserEntry => "userEntry",
            Self::UserUpdate => "userUpdate",
            Self::About => "about",
        }
    }

    /// Returns the path segment the router matches, without the leading slash.
    #[must_use]
    pub const fn segment(&self) -> &'static str {
        match self {
            Self::Home => "",
            Self::UserEntry => "userEntry",
            Self::UserUpdate => "userUpdate",
            Self::About => "about",
        }
    }

    /// Returns the path the route is mounted at.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::UserEntry => "/userEntry",
            Self::UserUpdate => "/userUpdate",
            Self::About => "/about",
        }
    }
}

/// How a route's view code reaches the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewLoading {
    /// Part of the initial bundle.
    Eager,
    /// Split into its own chunk, fetched on first visit.
    Deferred,
}

/// One entry of the route table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteDef {
    pub name: RouteName,
    pub path: &'static str,
    /// Link text in the navigation bar.
    pub title: &'static str,
    pub loading: ViewLoading,
}

const fn route(name: RouteName, title: &'static str, loading: ViewLoading) -> RouteDef {
    RouteDef {
        name,
        path: name.path(),
        title,
        loading,
    }
}

/// Every route, in navigation order.
pub const ROUTE_TABLE: [RouteDef; 4] = [
    route(RouteName::Home, "Home", ViewLoading::Eager),
    route(RouteName::UserEntry, "User Entry", ViewLoading::Eager),
    route(RouteName::UserUpdate, "User Update", ViewLoading::Eager),
    route(RouteName::About, "About", ViewLoading::Deferred),
];

/// Looks up a route by exact path.
#[must_use]
pub fn find_by_path(path: &str) -> Option<&'static RouteDef> {
    ROUTE_TABLE.iter().find(|r| r.path == path)
}

/// Looks up a route by symbolic name.
#[must_use]
pub fn find_by_name(name: &str) -> Option<&'static RouteDef> {
    ROUTE_TABLE.iter().find(|r| r.name.as_str() == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn table_has_the_four_literal_paths() {
        let paths: Vec<&str> = ROUTE_TABLE.iter().map(|r| r.path).collect();
        assert_eq!(paths, vec!["/", "/userEntry", "/userUpdate", "/about"]);
    }

    #[test]
    fn names_and_paths_are_unique() {
        let names: HashSet<&str> = ROUTE_TABLE.iter().map(|r| r.name.as_str()).collect();
        let paths: HashSet<&str> = ROUTE_TABLE.iter().map(|r| r.path).collect();
        assert_eq!(names.len(), ROUTE_TABLE.len());
        assert_eq!(paths.len(), ROUTE_TABLE.len());
    }

    #[test]
    fn only_about_is_deferred() {
        for entry in &ROUTE_TABLE {
            let expected = if entry.name == RouteName::About {
                ViewLoading::Deferred
            } else {
                ViewLoading::Eager
            };
            assert_eq!(entry.loading, expected, "{}", entry.path);
        }
    }

    #[test]
    fn router_segments_match_served_paths() {
        for entry in &ROUTE_TABLE {
            assert_eq!(entry.path, format!("/{}", entry.name.segment()));
        }
    }

    #[test]
    fn names_match_paths() {
        assert_eq!(find_by_name("home").map(|r| r.path), Some("/"));
        assert_eq!(find_by_name("userEntry").map(|r| r.path), Some("/userEntry"));
        assert_eq!(find_by_name("userUpdate").map(|r| r.path), Some("/userUpdate"));
        assert_eq!(find_by_name("about").map(|r| r.path), Some("/about"));
        assert!(find_by_name("settings").is_none());
    }

    #[test]
    fn path_lookup_is_exact() {
        assert_eq!(
            find_by_path("/about").map(|r| r.name),
            Some(RouteName::About)
        );
        assert!(find_by_path("/About").is_none());
        assert!(find_by_path("/about/").is_none());
        assert!(find_by_path("/userEntry?x=1").is_none());
    }
}
