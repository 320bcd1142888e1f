mod cli;
mod renderer;
mod router;
mod server;
mod store;

use clap::Parser;
use cli::{Cli, Commands};
use server::{post_routes, Server, ServerConfig};
use store::PostStore;

// Constants for messages
const STARTING_SERVER: &str = "Starting post resource server...";
const LISTENING_PREFIX: &str = "Listening on:";
const STOP_MESSAGE: &str = "Press Ctrl+C to stop the server";
const HTTP_PREFIX: &str = "http://";

// Sample posts for --sample
const SAMPLE_POSTS: &[(&str, &str)] = &[
    ("My Post", "My post desc"),
    ("Second Post", "Another description"),
    ("Third Post", "One more for the list page"),
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => handle_serve(args),
        Commands::Routes => handle_routes(),
    }
}

/// Handle the 'serve' subcommand
fn handle_serve(args: cli::ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = PostStore::new();

    if args.sample {
        for (title, description) in SAMPLE_POSTS {
            store.create(title, description);
        }
    }

    let config = ServerConfig::new()
        .with_host(args.host.clone())
        .with_port(args.port);

    // Print startup information to stderr
    eprintln!("{}", STARTING_SERVER);
    eprintln!(
        "{} {}{}:{}",
        LISTENING_PREFIX, HTTP_PREFIX, args.host, args.port
    );
    eprintln!();
    eprintln!("{}", STOP_MESSAGE);
    eprintln!();

    let server = Server::new(config, store)?;
    server.run()?;

    Ok(())
}

/// Handle the 'routes' subcommand
///
/// Prints one line per registered route: method, pattern, name, handler.
fn handle_routes() -> Result<(), Box<dyn std::error::Error>> {
    let router = post_routes()?;

    for route in router.routes() {
        println!(
            "{:<7} {:<20} {:<10} {}",
            route.method, route.pattern, route.name, route.handler
        );
    }

    Ok(())
}
