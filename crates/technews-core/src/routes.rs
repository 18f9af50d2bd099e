//! Application routes and the navigation guard.
//!
//! Each route carries its page title and access rules: `requires_auth`
//! routes send signed-out users to Login (remembering where they were
//! headed), and `guest` routes send signed-in users Home.

/// Site name appended to every page title
const SITE_NAME: &str = "TechNews";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteName {
    Home,
    Login,
    Register,
    Profile,
    ChangePassword,
    MyPosts,
    Posts,
    PostCreate,
    PostNotFound,
    PostDetail,
    PostEdit,
    Categories,
    CategoryPosts,
    MyComments,
    Subscriptions,
    MySubscription,
    SubscriptionHistory,
    Payments,
    PaymentSuccess,
    PaymentCancel,
    About,
    PaymentAnalytics,
    Refunds,
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub name: RouteName,
    /// Path pattern. `:param` matches one segment; `:param(a|b)` matches
    /// only the listed values.
    pub path: &'static str,
    pub title: &'static str,
    pub requires_auth: bool,
    pub guest: bool,
}

const fn route(name: RouteName, path: &'static str, title: &'static str) -> Route {
    Route {
        name,
        path,
        title,
        requires_auth: false,
        guest: false,
    }
}

const fn protected(name: RouteName, path: &'static str, title: &'static str) -> Route {
    Route {
        requires_auth: true,
        ..route(name, path, title)
    }
}

const fn guest_only(name: RouteName, path: &'static str, title: &'static str) -> Route {
    Route {
        guest: true,
        ..route(name, path, title)
    }
}

/// Route table, matched in order.
pub static ROUTES: &[Route] = &[
    route(RouteName::Home, "/", "Home"),
    guest_only(RouteName::Login, "/login", "Login"),
    guest_only(RouteName::Register, "/register", "Register"),
    protected(RouteName::Profile, "/profile", "Profile"),
    protected(RouteName::ChangePassword, "/change-password", "Change Password"),
    protected(RouteName::MyPosts, "/my-posts", "My Posts"),
    route(RouteName::Posts, "/posts", "Posts"),
    protected(RouteName::PostCreate, "/posts/create", "Create Post"),
    route(
        RouteName::PostNotFound,
        "/posts/:slug(popular|recent|pinned|featured)",
        "PostNotFound",
    ),
    route(RouteName::PostDetail, "/posts/:slug", "Post"),
    protected(RouteName::PostEdit, "/posts/:slug/edit", "Edit Post"),
    route(RouteName::Categories, "/categories", "Categories"),
    route(RouteName::CategoryPosts, "/categories/:slug", "Category"),
    protected(RouteName::MyComments, "/my-comments", "My Comments"),
    route(RouteName::Subscriptions, "/subscriptions", "Subscription Plans"),
    protected(RouteName::MySubscription, "/my-subscription", "My Subscription"),
    protected(
        RouteName::SubscriptionHistory,
        "/subscription-history",
        "Subscription History",
    ),
    protected(RouteName::Payments, "/payments", "Payment History"),
    route(RouteName::PaymentSuccess, "/payment/success", "Payment Successful"),
    route(RouteName::PaymentCancel, "/payment/cancel", "Payment Cancelled"),
    route(RouteName::About, "/about", "About"),
    protected(
        RouteName::PaymentAnalytics,
        "/payments/analytics",
        "Payment Analytics",
    ),
    protected(RouteName::Refunds, "/payments/refunds", "Refunds"),
];

static NOT_FOUND: Route = route(RouteName::NotFound, "/:pathMatch(.*)*", "404 Not Found");

/// A route matched against a concrete path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub route: &'static Route,
    pub params: Vec<(&'static str, String)>,
}

impl Resolved {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Outcome of the navigation guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Proceed,
    Redirect {
        to: RouteName,
        /// Where to go after signing in.
        redirect: Option<String>,
    },
}

pub fn route_by_name(name: RouteName) -> &'static Route {
    ROUTES
        .iter()
        .find(|r| r.name == name)
        .unwrap_or(&NOT_FOUND)
}

/// Match a path (query string and trailing slash ignored) to its route.
/// Unmatched paths resolve to `NotFound`.
pub fn resolve(path: &str) -> Resolved {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    ROUTES
        .iter()
        .find_map(|route| {
            match_pattern(route.path, &segments).map(|params| Resolved { route, params })
        })
        .unwrap_or_else(|| Resolved {
            route: &NOT_FOUND,
            params: Vec::new(),
        })
}

fn match_pattern(pattern: &'static str, segments: &[&str]) -> Option<Vec<(&'static str, String)>> {
    let parts: Vec<&'static str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    if parts.len() != segments.len() {
        return None;
    }

    let mut params = Vec::new();
    for (part, segment) in parts.iter().copied().zip(segments.iter().copied()) {
        match part.strip_prefix(':') {
            Some(param) => {
                let (name, allowed) = match param.split_once('(') {
                    Some((name, rest)) => (name, Some(rest.trim_end_matches(')'))),
                    None => (param, None),
                };
                if let Some(allowed) = allowed {
                    if !allowed.split('|').any(|v| v == segment) {
                        return None;
                    }
                }
                params.push((name, segment.to_string()));
            }
            None if part == segment => {}
            None => return None,
        }
    }
    Some(params)
}

/// Decide whether navigation to `route` may proceed.
///
/// `full_path` is the requested path including its query, carried along
/// when redirecting to Login.
pub fn guard(route: &Route, authenticated: bool, full_path: &str) -> Navigation {
    if route.requires_auth && !authenticated {
        Navigation::Redirect {
            to: RouteName::Login,
            redirect: Some(full_path.to_string()),
        }
    } else if route.guest && authenticated {
        Navigation::Redirect {
            to: RouteName::Home,
            redirect: None,
        }
    } else {
        Navigation::Proceed
    }
}

pub fn page_title(route: &Route) -> String {
    if route.title.is_empty() {
        SITE_NAME.to_string()
    } else {
        format!("{} | {}", route.title, SITE_NAME)
    }
}
