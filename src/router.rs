use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use std::fmt;

// Constants
const PATH_SEPARATOR: char = '/';
const PLACEHOLDER_PREFIX: char = ':';
const NAME_SEPARATOR: &str = "_";
const ROOT_PATH: &str = "/";
const PLURAL_SUFFIX: char = 's';
const INDEX_ACTION: &str = "index";
const SHOW_ACTION: &str = "show";
const ACTION_SEPARATOR: char = '#';

/// Characters percent-encoded inside a path segment.
///
/// CONTROLS plus everything that would change the meaning of the path
/// (separator, query/fragment markers) or break out of an HTML attribute.
const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'#')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'%');

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum RouterError {
    UnknownRoute { name: String },
    MissingParam { route: String, param: String },
    DuplicateRoute { name: String },
}

impl fmt::Display for RouterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouterError::UnknownRoute { name } => {
                write!(f, "No route registered under the name '{}'", name)
            }
            RouterError::MissingParam { route, param } => {
                write!(
                    f,
                    "Route '{}' requires a value for ':{}' but none was given",
                    route, param
                )
            }
            RouterError::DuplicateRoute { name } => {
                write!(f, "A route named '{}' is already registered", name)
            }
        }
    }
}

impl std::error::Error for RouterError {}

// ============================================================================
// HTTP METHOD
// ============================================================================

/// HTTP methods a route can be registered against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    /// Returns the upper-case wire form of the method
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

// ============================================================================
// PATH PARAMETERS
// ============================================================================

/// A value that can fill a `:placeholder` in a route pattern.
///
/// Implemented for the integer and string types callers pass directly, and
/// for resource records exposing an identifier, so passing `&post` where an
/// id is expected substitutes the post's id automatically.
pub trait PathParam {
    fn path_value(&self) -> String;
}

impl PathParam for u64 {
    fn path_value(&self) -> String {
        self.to_string()
    }
}

impl PathParam for i64 {
    fn path_value(&self) -> String {
        self.to_string()
    }
}

impl PathParam for u32 {
    fn path_value(&self) -> String {
        self.to_string()
    }
}

impl PathParam for str {
    fn path_value(&self) -> String {
        self.to_string()
    }
}

impl PathParam for String {
    fn path_value(&self) -> String {
        self.clone()
    }
}

impl<T: PathParam + ?Sized> PathParam for &T {
    fn path_value(&self) -> String {
        (**self).path_value()
    }
}

/// Named parameters supplied to reverse lookup
///
/// A small ordered list rather than a map; patterns have at most a handful
/// of placeholders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathParams {
    entries: Vec<(String, String)>,
}

impl PathParams {
    /// Creates an empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a named parameter, converting the value through `PathParam`
    pub fn insert(&mut self, name: &str, value: impl PathParam) {
        self.entries.push((name.to_string(), value.path_value()));
    }

    /// Builder-style variant of `insert`
    pub fn with(mut self, name: &str, value: impl PathParam) -> Self {
        self.insert(name, value);
        self
    }

    /// Looks up a parameter by name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns true if no parameters are present
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// ROUTE DEFINITION
// ============================================================================

/// A single registered route: a verb + pattern bound to a named action
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Unique name used for reverse lookup (e.g. "post")
    pub name: String,
    /// HTTP method the route responds to
    pub method: Method,
    /// Path pattern with `:placeholder` segments (e.g. "/posts/:id")
    pub pattern: String,
    /// Action label the server dispatches on (e.g. "posts#show")
    pub handler: String,
}

/// Result of forward-matching a request path against the table
#[derive(Debug, Clone, PartialEq)]
pub struct RouteMatch {
    /// Name of the matched route
    pub name: String,
    /// Action label of the matched route
    pub handler: String,
    /// Placeholder bindings extracted from the path, percent-decoded
    pub params: PathParams,
}

// ============================================================================
// ROUTER
// ============================================================================

/// Named-route table with reverse lookup ("path helpers")
///
/// Routes are registered against an HTTP verb and a `:placeholder` pattern,
/// each under a unique name. Reverse lookup renders a concrete path from a
/// name plus parameter values; forward lookup matches an incoming request
/// path back to its action.
///
/// ```
/// use waypost::router::{PathParams, Router};
///
/// let mut router = Router::new();
/// router.resource("posts").unwrap();
///
/// let path = router
///     .path_for("post", &PathParams::new().with("id", 42u64))
///     .unwrap();
/// assert_eq!(path, "/posts/42");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    /// Creates an empty route table
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a route under an explicit name
    ///
    /// This is the aliasing mechanism: when a name is given, the conventional
    /// auto-derived name is never registered, so the alias is the only way to
    /// reach the route by name.
    ///
    /// # Arguments
    /// * `method` - HTTP method the route responds to
    /// * `pattern` - Path pattern, `:placeholder` segments allowed
    /// * `handler` - Action label (e.g. "posts#index")
    /// * `name` - Unique route name for reverse lookup
    ///
    /// # Returns
    /// * `Ok(())` - Route registered
    /// * `Err(RouterError::DuplicateRoute)` - If the name is already taken
    pub fn add(
        &mut self,
        method: Method,
        pattern: &str,
        handler: &str,
        name: &str,
    ) -> Result<(), RouterError> {
        if self.routes.iter().any(|route| route.name == name) {
            return Err(RouterError::DuplicateRoute {
                name: name.to_string(),
            });
        }

        self.routes.push(Route {
            name: name.to_string(),
            method,
            pattern: pattern.to_string(),
            handler: handler.to_string(),
        });

        Ok(())
    }

    /// Registers a route under its conventional auto-derived name
    ///
    /// The name is the pattern's static segments joined with underscores
    /// ("/register" → "register", "/posts" → "posts"). Patterns whose static
    /// segments collide with an existing name must use `add` with an alias.
    pub fn route(
        &mut self,
        method: Method,
        pattern: &str,
        handler: &str,
    ) -> Result<(), RouterError> {
        let name = derive_name(pattern);
        self.add(method, pattern, handler, &name)
    }

    /// Registers the conventional list/detail pair for a resource
    ///
    /// For `resource("posts")`:
    /// * `GET /posts` named "posts", handler "posts#index"
    /// * `GET /posts/:id` named "post", handler "posts#show"
    ///
    /// The detail name is the singular form (trailing 's' stripped).
    pub fn resource(&mut self, plural: &str) -> Result<(), RouterError> {
        let singular = plural.strip_suffix(PLURAL_SUFFIX).unwrap_or(plural);

        let index_pattern = format!("/{}", plural);
        let index_handler = format!("{}{}{}", plural, ACTION_SEPARATOR, INDEX_ACTION);
        self.add(Method::Get, &index_pattern, &index_handler, plural)?;

        let show_pattern = format!("/{}/{}id", plural, PLACEHOLDER_PREFIX);
        let show_handler = format!("{}{}{}", plural, ACTION_SEPARATOR, SHOW_ACTION);
        self.add(Method::Get, &show_pattern, &show_handler, singular)?;

        Ok(())
    }

    /// Reverse lookup: renders the named route's pattern into a concrete path
    ///
    /// Each `:placeholder` segment is replaced with the percent-encoded value
    /// of the matching parameter. Parameters that match no placeholder are
    /// ignored. Pure function over the route table and inputs.
    ///
    /// # Arguments
    /// * `name` - Name of a registered route
    /// * `params` - Placeholder values
    ///
    /// # Returns
    /// * `Ok(String)` - The rendered relative path
    /// * `Err(RouterError::UnknownRoute)` - If no route has that name
    /// * `Err(RouterError::MissingParam)` - If a placeholder has no value
    pub fn path_for(&self, name: &str, params: &PathParams) -> Result<String, RouterError> {
        let route = self
            .routes
            .iter()
            .find(|route| route.name == name)
            .ok_or_else(|| RouterError::UnknownRoute {
                name: name.to_string(),
            })?;

        let mut path = String::new();

        for segment in pattern_segments(&route.pattern) {
            path.push(PATH_SEPARATOR);

            if let Some(placeholder) = segment.strip_prefix(PLACEHOLDER_PREFIX) {
                let value = params
                    .get(placeholder)
                    .ok_or_else(|| RouterError::MissingParam {
                        route: route.name.clone(),
                        param: placeholder.to_string(),
                    })?;
                path.extend(utf8_percent_encode(value, PATH_SEGMENT_ENCODE_SET));
            } else {
                path.push_str(segment);
            }
        }

        if path.is_empty() {
            path.push_str(ROOT_PATH);
        }

        Ok(path)
    }

    /// Forward lookup: matches a request against the table
    ///
    /// Compares method and path segment by segment; `:placeholder` segments
    /// bind the corresponding (percent-decoded) path segment. The first
    /// registered route that matches wins.
    ///
    /// # Returns
    /// * `Some(RouteMatch)` - Matched route with bound parameters
    /// * `None` - No registered route matches
    pub fn recognize(&self, method: Method, path: &str) -> Option<RouteMatch> {
        let path_segments: Vec<&str> = pattern_segments(path).collect();

        self.routes
            .iter()
            .filter(|route| route.method == method)
            .find_map(|route| {
                let params = match_segments(&route.pattern, &path_segments)?;
                Some(RouteMatch {
                    name: route.name.clone(),
                    handler: route.handler.clone(),
                    params,
                })
            })
    }

    /// Returns all registered routes in registration order
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

/// Splits a pattern or path into its non-empty segments
fn pattern_segments(pattern: &str) -> impl Iterator<Item = &str> {
    pattern
        .split(PATH_SEPARATOR)
        .filter(|segment| !segment.is_empty())
}

/// Matches a pattern against pre-split path segments, binding placeholders
fn match_segments(pattern: &str, path_segments: &[&str]) -> Option<PathParams> {
    let segments: Vec<&str> = pattern_segments(pattern).collect();

    if segments.len() != path_segments.len() {
        return None;
    }

    let mut params = PathParams::new();

    for (pattern_segment, path_segment) in segments.iter().zip(path_segments) {
        if let Some(placeholder) = pattern_segment.strip_prefix(PLACEHOLDER_PREFIX) {
            let decoded = percent_decode_str(path_segment).decode_utf8_lossy();
            params.insert(placeholder, decoded.as_ref());
        } else if pattern_segment != path_segment {
            return None;
        }
    }

    Some(params)
}

/// Derives the conventional route name from a pattern's static segments
fn derive_name(pattern: &str) -> String {
    let parts: Vec<&str> = pattern_segments(pattern)
        .filter(|segment| !segment.starts_with(PLACEHOLDER_PREFIX))
        .collect();

    parts.join(NAME_SEPARATOR)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn post_router() -> Router {
        let mut router = Router::new();
        router.resource("posts").unwrap();
        router
    }

    #[test]
    fn test_resource_registers_index_and_show() {
        let router = post_router();

        assert_eq!(router.routes().len(), 2);
        assert_eq!(router.routes()[0].name, "posts");
        assert_eq!(router.routes()[0].pattern, "/posts");
        assert_eq!(router.routes()[0].handler, "posts#index");
        assert_eq!(router.routes()[1].name, "post");
        assert_eq!(router.routes()[1].pattern, "/posts/:id");
        assert_eq!(router.routes()[1].handler, "posts#show");
    }

    #[test]
    fn test_path_for_static_pattern() {
        let router = post_router();
        let path = router.path_for("posts", &PathParams::new()).unwrap();
        assert_eq!(path, "/posts");
    }

    #[test]
    fn test_path_for_substitutes_id() {
        let router = post_router();
        let params = PathParams::new().with("id", 42u64);
        let path = router.path_for("post", &params).unwrap();
        assert_eq!(path, "/posts/42");
    }

    #[test]
    fn test_path_for_missing_param() {
        let router = post_router();
        let result = router.path_for("post", &PathParams::new());
        assert_eq!(
            result,
            Err(RouterError::MissingParam {
                route: "post".to_string(),
                param: "id".to_string(),
            })
        );
    }

    #[test]
    fn test_path_for_unknown_route() {
        let router = post_router();
        let result = router.path_for("comments", &PathParams::new());
        assert_eq!(
            result,
            Err(RouterError::UnknownRoute {
                name: "comments".to_string(),
            })
        );
    }

    #[test]
    fn test_path_for_encodes_value() {
        let router = post_router();
        let params = PathParams::new().with("id", "a b/c");
        let path = router.path_for("post", &params).unwrap();
        assert_eq!(path, "/posts/a%20b%2Fc");
    }

    #[test]
    fn test_path_for_ignores_extra_params() {
        let router = post_router();
        let params = PathParams::new().with("id", 7u64).with("page", 3u64);
        let path = router.path_for("post", &params).unwrap();
        assert_eq!(path, "/posts/7");
    }

    #[test]
    fn test_route_derives_name_from_static_segments() {
        let mut router = Router::new();
        router.route(Method::Get, "/register", "users#new").unwrap();

        let path = router.path_for("register", &PathParams::new()).unwrap();
        assert_eq!(path, "/register");
    }

    #[test]
    fn test_alias_replaces_derived_name() {
        let mut router = Router::new();
        router
            .add(Method::Get, "/signup", "users#new", "register")
            .unwrap();

        // The alias resolves; the auto-derived name was never registered.
        assert_eq!(
            router.path_for("register", &PathParams::new()).unwrap(),
            "/signup"
        );
        assert_eq!(
            router.path_for("signup", &PathParams::new()),
            Err(RouterError::UnknownRoute {
                name: "signup".to_string(),
            })
        );
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut router = Router::new();
        router
            .add(Method::Get, "/posts", "posts#index", "posts")
            .unwrap();
        let result = router.add(Method::Get, "/articles", "articles#index", "posts");
        assert_eq!(
            result,
            Err(RouterError::DuplicateRoute {
                name: "posts".to_string(),
            })
        );
    }

    #[test]
    fn test_recognize_index() {
        let router = post_router();
        let matched = router.recognize(Method::Get, "/posts").unwrap();
        assert_eq!(matched.handler, "posts#index");
        assert!(matched.params.is_empty());
    }

    #[test]
    fn test_recognize_show_binds_id() {
        let router = post_router();
        let matched = router.recognize(Method::Get, "/posts/42").unwrap();
        assert_eq!(matched.handler, "posts#show");
        assert_eq!(matched.params.get("id"), Some("42"));
    }

    #[test]
    fn test_recognize_decodes_bound_segment() {
        let router = post_router();
        let matched = router.recognize(Method::Get, "/posts/a%20b").unwrap();
        assert_eq!(matched.params.get("id"), Some("a b"));
    }

    #[test]
    fn test_recognize_wrong_method() {
        let router = post_router();
        assert!(router.recognize(Method::Delete, "/posts/42").is_none());
    }

    #[test]
    fn test_recognize_unknown_path() {
        let router = post_router();
        assert!(router.recognize(Method::Get, "/comments").is_none());
        assert!(router.recognize(Method::Get, "/posts/1/edit").is_none());
    }

    #[test]
    fn test_recognize_first_match_wins() {
        let mut router = Router::new();
        router
            .add(Method::Get, "/posts/new", "posts#new", "new_post")
            .unwrap();
        router.resource("posts").unwrap();

        let matched = router.recognize(Method::Get, "/posts/new").unwrap();
        assert_eq!(matched.handler, "posts#new");
    }

    #[test]
    fn test_path_params_builder() {
        let params = PathParams::new().with("id", 5u64).with("slug", "hello");
        assert_eq!(params.get("id"), Some("5"));
        assert_eq!(params.get("slug"), Some("hello"));
        assert_eq!(params.get("missing"), None);
    }

    #[test]
    fn test_derive_name_skips_placeholders() {
        assert_eq!(derive_name("/posts"), "posts");
        assert_eq!(derive_name("/posts/:id/comments"), "posts_comments");
        assert_eq!(derive_name("/register"), "register");
    }

    #[test]
    fn test_method_as_str() {
        assert_eq!(Method::Get.as_str(), "GET");
        assert_eq!(Method::Delete.as_str(), "DELETE");
    }
}
