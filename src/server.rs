use crate::renderer::{escape_html_text, render_index, render_show};
use crate::router::{Method, Router, RouterError};
use crate::store::PostStore;
use std::fmt;
use tiny_http::{Response, Server as TinyServer};

// HTML document structure constants
const DOCTYPE: &str = "<!DOCTYPE html>";
const HTML_OPEN: &str = "<html>";
const HTML_CLOSE: &str = "</html>";
const HEAD_OPEN: &str = "<head>";
const HEAD_CLOSE: &str = "</head>";
const META_CHARSET: &str = "<meta charset=\"utf-8\">";
const TITLE_OPEN: &str = "<title>";
const TITLE_CLOSE: &str = "</title>";
const BODY_OPEN: &str = "<body>";
const BODY_CLOSE: &str = "</body>";

// HTTP status codes
const HTTP_STATUS_OK: u16 = 200;
const HTTP_STATUS_NOT_FOUND: u16 = 404;
const HTTP_STATUS_INTERNAL_ERROR: u16 = 500;

// Content type header
const CONTENT_TYPE_HTML: &str = "text/html; charset=utf-8";

// Generic error pages
const GENERIC_404_TITLE: &str = "404 Not Found";
const GENERIC_404_BODY: &str =
    "<h1>404 Not Found</h1><p>The requested page could not be found.</p>";
const GENERIC_500_TITLE: &str = "500 Internal Server Error";
const GENERIC_500_BODY: &str =
    "<h1>500 Internal Server Error</h1><p>An error occurred while processing your request.</p>";

// Page titles
const INDEX_TITLE: &str = "Posts";

// Dispatch labels
const POST_RESOURCE: &str = "posts";
const INDEX_HANDLER: &str = "posts#index";
const SHOW_HANDLER: &str = "posts#show";
const ID_PARAM: &str = "id";
const QUERY_MARKER: char = '?';

// Server info
const SERVER_START_MESSAGE: &str = "Server started successfully";
const SERVER_ADDRESS_PREFIX: &str = "Listening on";

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug)]
pub enum ServerError {
    BindError { address: String, source: String },
    RouterError { source: RouterError },
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::BindError { address, source } => {
                write!(f, "Failed to bind to {}: {}", address, source)
            }
            ServerError::RouterError { source } => {
                write!(f, "Router error: {}", source)
            }
        }
    }
}

impl std::error::Error for ServerError {}

impl From<RouterError> for ServerError {
    fn from(err: RouterError) -> Self {
        ServerError::RouterError { source: err }
    }
}

// ============================================================================
// ROUTE TABLE
// ============================================================================

/// Builds the route table for the post resource
///
/// Two conventional routes: `GET /posts` (index) and `GET /posts/:id` (show),
/// reverse-lookupable as "posts" and "post".
pub fn post_routes() -> Result<Router, RouterError> {
    let mut router = Router::new();
    router.resource(POST_RESOURCE)?;
    Ok(router)
}

// ============================================================================
// SERVER CONFIGURATION
// ============================================================================

/// Configuration for the web server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind to (default: "0.0.0.0")
    pub host: String,
    /// Port to listen on (default: 8080)
    pub port: u16,
}

impl ServerConfig {
    /// Creates a configuration with default host (0.0.0.0) and port (8080)
    pub fn new() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }

    /// Sets the host address
    pub fn with_host(mut self, host: String) -> Self {
        self.host = host;
        self
    }

    /// Sets the port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Returns the server address in "host:port" format
    fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// SERVER
// ============================================================================

/// HTTP server for the two-action post resource
///
/// The server:
/// - Recognizes requests against the conventional post route table
/// - Renders the list page with hrefs produced by reverse lookup
/// - Renders the detail page with the post's title and description
/// - Answers unrecognized paths and missing posts with a 404 page
pub struct Server {
    router: Router,
    store: PostStore,
    config: ServerConfig,
}

impl Server {
    /// Creates a new server over the given store
    ///
    /// # Arguments
    /// * `config` - Host and port to bind to
    /// * `store` - Posts to serve; the store is owned by the server
    ///
    /// # Returns
    /// * `Ok(Server)` - Successfully created server
    /// * `Err(ServerError)` - If the route table cannot be built
    pub fn new(config: ServerConfig, store: PostStore) -> Result<Self, ServerError> {
        let router = post_routes()?;

        Ok(Self {
            router,
            store,
            config,
        })
    }

    /// Returns the server's route table
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Starts the HTTP server and begins handling requests
    ///
    /// This is a blocking call that runs until interrupted (Ctrl+C)
    ///
    /// # Returns
    /// * `Ok(())` - Server shut down successfully
    /// * `Err(ServerError)` - If the server fails to bind to its address
    pub fn run(&self) -> Result<(), ServerError> {
        let address = self.config.address();

        let server = TinyServer::http(&address).map_err(|e| ServerError::BindError {
            address: address.clone(),
            source: e.to_string(),
        })?;

        println!("{}", SERVER_START_MESSAGE);
        println!("{} http://{}", SERVER_ADDRESS_PREFIX, address);

        for request in server.incoming_requests() {
            let url_path = request.url().to_string();
            let method = convert_method(request.method());

            let (status, html) = match method {
                Some(method) => match self.handle_request(method, &url_path) {
                    Ok(response) => response,
                    Err(e) => {
                        eprintln!("Error handling request for {}: {}", url_path, e);
                        (
                            HTTP_STATUS_INTERNAL_ERROR,
                            wrap_html_document(GENERIC_500_TITLE, GENERIC_500_BODY),
                        )
                    }
                },
                None => (
                    HTTP_STATUS_NOT_FOUND,
                    wrap_html_document(GENERIC_404_TITLE, GENERIC_404_BODY),
                ),
            };

            let response = Response::from_string(html)
                .with_status_code(status)
                .with_header(
                    tiny_http::Header::from_bytes(
                        &b"Content-Type"[..],
                        &CONTENT_TYPE_HTML.as_bytes()[..],
                    )
                    .unwrap(),
                );

            if let Err(e) = request.respond(response) {
                eprintln!("Error sending response: {}", e);
            }
        }

        Ok(())
    }

    /// Handles a single HTTP request
    ///
    /// # Arguments
    /// * `method` - The request method
    /// * `url_path` - The URL path (query string allowed, ignored)
    ///
    /// # Returns
    /// * `Ok((status_code, html))` - HTTP status and rendered document
    /// * `Err(ServerError)` - If rendering fails
    pub fn handle_request(
        &self,
        method: Method,
        url_path: &str,
    ) -> Result<(u16, String), ServerError> {
        let path = strip_query(url_path);

        let Some(matched) = self.router.recognize(method, path) else {
            return Ok(not_found_page());
        };

        match matched.handler.as_str() {
            INDEX_HANDLER => {
                let body = render_index(self.store.all(), &self.router)?;
                Ok((HTTP_STATUS_OK, wrap_html_document(INDEX_TITLE, &body)))
            }
            SHOW_HANDLER => {
                let post = matched
                    .params
                    .get(ID_PARAM)
                    .and_then(|id| id.parse::<u64>().ok())
                    .and_then(|id| self.store.find(id));

                match post {
                    Some(post) => {
                        let body = render_show(post);
                        let html = wrap_html_document(post.title(), &body);
                        Ok((HTTP_STATUS_OK, html))
                    }
                    None => Ok(not_found_page()),
                }
            }
            // A route registered without a matching action is unreachable
            // through `post_routes`; answer 404 rather than panic.
            _ => Ok(not_found_page()),
        }
    }
}

// ============================================================================
// HTML DOCUMENT GENERATION
// ============================================================================

/// Wraps content in a complete HTML5 document structure
///
/// # Arguments
/// * `title` - Text for the <title> tag
/// * `content` - HTML content for the <body>
///
/// # Returns
/// A complete HTML document string
fn wrap_html_document(title: &str, content: &str) -> String {
    format!(
        "{}{}{}{}{}{}{}{}{}{}{}{}",
        DOCTYPE,
        HTML_OPEN,
        HEAD_OPEN,
        META_CHARSET,
        TITLE_OPEN,
        escape_html_text(title),
        TITLE_CLOSE,
        HEAD_CLOSE,
        BODY_OPEN,
        content,
        BODY_CLOSE,
        HTML_CLOSE
    )
}

/// Builds the generic 404 response
fn not_found_page() -> (u16, String) {
    (
        HTTP_STATUS_NOT_FOUND,
        wrap_html_document(GENERIC_404_TITLE, GENERIC_404_BODY),
    )
}

/// Drops the query string from a request URL, if any
fn strip_query(url_path: &str) -> &str {
    match url_path.split_once(QUERY_MARKER) {
        Some((path, _)) => path,
        None => url_path,
    }
}

/// Maps a tiny_http method onto the route table's method enum
fn convert_method(method: &tiny_http::Method) -> Option<Method> {
    match method {
        tiny_http::Method::Get => Some(Method::Get),
        tiny_http::Method::Post => Some(Method::Post),
        tiny_http::Method::Put => Some(Method::Put),
        tiny_http::Method::Patch => Some(Method::Patch),
        tiny_http::Method::Delete => Some(Method::Delete),
        _ => None,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_server() -> Server {
        let mut store = PostStore::new();
        store.create("First", "the first post");
        store.create("Second", "the second post");
        Server::new(ServerConfig::new(), store).unwrap()
    }

    #[test]
    fn test_server_config_defaults() {
        let config = ServerConfig::new();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_server_config_builder() {
        let config = ServerConfig::new()
            .with_host("127.0.0.1".to_string())
            .with_port(3000);
        assert_eq!(config.address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_post_routes_table() {
        let router = post_routes().unwrap();
        assert_eq!(router.routes().len(), 2);
        assert_eq!(router.routes()[0].pattern, "/posts");
        assert_eq!(router.routes()[1].pattern, "/posts/:id");
    }

    #[test]
    fn test_index_lists_posts() {
        let server = sample_server();
        let (status, html) = server.handle_request(Method::Get, "/posts").unwrap();

        assert_eq!(status, HTTP_STATUS_OK);
        assert!(html.contains("<a href=\"/posts/1\">First</a>"));
        assert!(html.contains("<a href=\"/posts/2\">Second</a>"));
    }

    #[test]
    fn test_show_renders_post() {
        let server = sample_server();
        let (status, html) = server.handle_request(Method::Get, "/posts/2").unwrap();

        assert_eq!(status, HTTP_STATUS_OK);
        assert!(html.contains("<h1>Second</h1>"));
        assert!(html.contains("<p>the second post</p>"));
        assert!(html.contains("<title>Second</title>"));
    }

    #[test]
    fn test_show_missing_post_is_404() {
        let server = sample_server();
        let (status, html) = server.handle_request(Method::Get, "/posts/99").unwrap();

        assert_eq!(status, HTTP_STATUS_NOT_FOUND);
        assert!(html.contains("404 Not Found"));
    }

    #[test]
    fn test_show_unparseable_id_is_404() {
        let server = sample_server();
        let (status, _) = server.handle_request(Method::Get, "/posts/banana").unwrap();
        assert_eq!(status, HTTP_STATUS_NOT_FOUND);
    }

    #[test]
    fn test_unknown_path_is_404() {
        let server = sample_server();
        let (status, _) = server.handle_request(Method::Get, "/comments").unwrap();
        assert_eq!(status, HTTP_STATUS_NOT_FOUND);
    }

    #[test]
    fn test_query_string_ignored() {
        let server = sample_server();
        let (status, _) = server
            .handle_request(Method::Get, "/posts?page=2")
            .unwrap();
        assert_eq!(status, HTTP_STATUS_OK);
    }

    #[test]
    fn test_wrap_html_document() {
        let html = wrap_html_document("Test Title", "<p>Content</p>");
        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains("<title>Test Title</title>"));
        assert!(html.contains("<p>Content</p>"));
        assert!(html.contains("<meta charset=\"utf-8\">"));
    }

    #[test]
    fn test_strip_query() {
        assert_eq!(strip_query("/posts?page=2"), "/posts");
        assert_eq!(strip_query("/posts"), "/posts");
    }
}
