use waypost::{PostStore, Server, ServerConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Seed a few posts so the list page has something to link to
    let mut store = PostStore::new();
    store.create("My Post", "My post desc");
    store.create("Second Post", "Another description");
    store.create("Third Post", "One more for the list page");

    // Create server configuration
    // Default: serves on 0.0.0.0:8080
    let config = ServerConfig::new();

    // Alternatively, customize host and port:
    // let config = ServerConfig::new()
    //     .with_host("127.0.0.1".to_string())
    //     .with_port(3000);

    let server = Server::new(config, store)?;

    println!("Try visiting:");
    println!("  http://localhost:8080/posts");
    println!("  http://localhost:8080/posts/1");
    println!("  http://localhost:8080/posts/99 (404 page)");
    println!();

    server.run()?;

    Ok(())
}
