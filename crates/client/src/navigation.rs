//! Navigation seam.
//!
//! The client never renders anything itself; when it needs the user
//! elsewhere (a forced logout sends them to the login view) it asks the
//! embedding frontend through a [`Navigator`].

use std::fmt;

use shopvely_core::OrderId;

/// Destinations the client can ask the frontend to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    Register,
    Products,
    Cart,
    Orders,
    OrderDetail(OrderId),
    Wishlist,
    Account,
}

impl Route {
    /// Browser-style path for the route.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Login => "/login".to_string(),
            Self::Register => "/register".to_string(),
            Self::Products => "/products".to_string(),
            Self::Cart => "/cart".to_string(),
            Self::Orders => "/orders".to_string(),
            Self::OrderDetail(id) => format!("/orders/{id}"),
            Self::Wishlist => "/wishlist".to_string(),
            Self::Account => "/account".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Moves the user to another view.
pub trait Navigator: Send + Sync {
    /// Show `route`.
    fn navigate(&self, route: Route);
}

/// Navigator that only records the request in the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, route: Route) {
        tracing::info!(%route, "Navigation requested");
    }
}

impl<F> Navigator for F
where
    F: Fn(Route) + Send + Sync,
{
    fn navigate(&self, route: Route) {
        self(route);
    }
}
