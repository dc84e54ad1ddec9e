// Fragment router.
// Maps `#fragment` locations to views, falling back to the posts view.

use tracing::debug;

/// A top-level view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Posts,
    Characters,
    Countries,
    Weather,
}

impl Route {
    pub const ALL: [Route; 4] = [Route::Posts, Route::Characters, Route::Countries, Route::Weather];

    pub fn fragment(&self) -> &'static str {
        match self {
            Route::Posts => "#posts",
            Route::Characters => "#characters",
            Route::Countries => "#countries",
            Route::Weather => "#weather",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Posts => "Posts",
            Route::Characters => "Characters",
            Route::Countries => "Countries",
            Route::Weather => "Weather",
        }
    }

    /// Parse a location. The leading `#` is optional and matching ignores case.
    pub fn from_fragment(fragment: &str) -> Option<Route> {
        let name = fragment.trim();
        let name = name.strip_prefix('#').unwrap_or(name);
        Route::ALL
            .into_iter()
            .find(|route| route.fragment()[1..].eq_ignore_ascii_case(name))
    }

    pub fn index(&self) -> usize {
        Route::ALL.iter().position(|r| r == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        match self {
            Route::Posts => Route::Characters,
            Route::Characters => Route::Countries,
            Route::Countries => Route::Weather,
            Route::Weather => Route::Posts,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Route::Posts => Route::Weather,
            Route::Characters => Route::Posts,
            Route::Countries => Route::Characters,
            Route::Weather => Route::Countries,
        }
    }
}

/// Result of resolving a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigation {
    pub route: Route,
    /// True when the location was unknown and the default route was used.
    pub redirected: bool,
}

#[derive(Debug, Default)]
pub struct Router {
    current: Route,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a location without moving. Empty locations go to the default
    /// route silently; unknown ones are flagged as redirects.
    pub fn resolve(fragment: &str) -> Navigation {
        let trimmed = fragment.trim();
        if trimmed.is_empty() || trimmed == "#" {
            return Navigation {
                route: Route::default(),
                redirected: false,
            };
        }
        match Route::from_fragment(trimmed) {
            Some(route) => Navigation {
                route,
                redirected: false,
            },
            None => Navigation {
                route: Route::default(),
                redirected: true,
            },
        }
    }

    pub fn navigate(&mut self, fragment: &str) -> Navigation {
        let navigation = Self::resolve(fragment);
        debug!(fragment, route = navigation.route.fragment(), "navigate");
        self.current = navigation.route;
        navigation
    }

    pub fn current(&self) -> Route {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_fragments() {
        for route in Route::ALL {
            assert_eq!(Router::resolve(route.fragment()).route, route);
        }
        assert_eq!(Route::from_fragment("Weather"), Some(Route::Weather));
        assert_eq!(Route::from_fragment(" #COUNTRIES "), Some(Route::Countries));
    }

    #[test]
    fn test_unknown_fragment_redirects_to_posts() {
        let mut router = Router::new();
        router.navigate("#weather");
        let navigation = router.navigate("#nope");
        assert_eq!(
            navigation,
            Navigation {
                route: Route::Posts,
                redirected: true
            }
        );
        assert_eq!(router.current(), Route::Posts);
    }

    #[test]
    fn test_empty_fragment_is_default_without_redirect() {
        let navigation = Router::resolve("");
        assert_eq!(navigation.route, Route::Posts);
        assert!(!navigation.redirected);
        assert!(!Router::resolve("#").redirected);
    }

    #[test]
    fn test_route_cycle() {
        let mut route = Route::Posts;
        for _ in 0..Route::ALL.len() {
            assert_eq!(route.next().prev(), route);
            route = route.next();
        }
        assert_eq!(route, Route::Posts);
        assert_eq!(Route::Countries.index(), 2);
    }
}
