use clap::{Parser, Subcommand};

// Constants for help text
const ABOUT_TEXT: &str = "Named-route reverse-lookup server for a post resource";
const SERVE_ABOUT: &str = "Start the post resource server";
const ROUTES_ABOUT: &str = "Print the registered route table";
const HOST_HELP: &str = "Host address to bind to";
const PORT_HELP: &str = "Port to listen on";
const SAMPLE_HELP: &str = "Seed the store with sample posts";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: &str = "8080";

/// Named-route reverse-lookup server for a post resource
#[derive(Parser, Debug)]
#[command(name = "waypost")]
#[command(about = ABOUT_TEXT, long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the post resource server
    #[command(about = SERVE_ABOUT)]
    Serve(ServeArgs),

    /// Print the registered route table
    #[command(about = ROUTES_ABOUT)]
    Routes,
}

#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Host address to bind to
    #[arg(long, default_value = DEFAULT_HOST, help = HOST_HELP)]
    pub host: String,

    /// Port to listen on
    #[arg(long, short = 'p', default_value = DEFAULT_PORT, help = PORT_HELP)]
    pub port: u16,

    /// Seed the store with sample posts
    #[arg(long, help = SAMPLE_HELP)]
    pub sample: bool,
}
