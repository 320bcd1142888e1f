pub mod cli;
pub mod renderer;
pub mod router;
pub mod server;
pub mod store;

// Re-export main types for convenience
pub use router::{Method, PathParam, PathParams, Route, RouteMatch, Router, RouterError};
pub use server::{Server, ServerConfig, ServerError};
pub use store::{Post, PostStore};
