//! CRUD session - connect, authenticate, and work with records.
//!
//! This example demonstrates:
//! - Opening a session and signing in as root
//! - Selecting a namespace and database
//! - Creating, reading, merging and deleting records
//!
//! # Running
//!
//! ```sh
//! FATHOM_URL=ws://localhost:8000/rpc cargo run --example crud
//! ```

use fathom_client::Client;
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let url =
        std::env::var("FATHOM_URL").unwrap_or_else(|_| "ws://localhost:8000/rpc".to_string());

    // Open the session
    let mut db = Client::new(&url);
    db.connect().await?;

    // Authenticate and pick a namespace/database
    db.signin(json!({"user": "root", "pass": "root"})).await?;
    db.use_ns("test", "test").await?;

    // Create a couple of records
    let tobie = db
        .create("person", Some(json!({"name": "Tobie", "role": "founder"})))
        .await?;
    println!("created: {tobie}");

    db.create("person", Some(json!({"name": "Jaime", "role": "cofounder"})))
        .await?;

    // Read them back
    let people = db.select("person").await?;
    println!("selected: {people}");

    // Merge new content into every person
    let updated = db.merge("person", Some(json!({"active": true}))).await?;
    println!("merged: {updated}");

    // Clean up
    let deleted = db.delete("person").await?;
    println!("deleted: {deleted}");

    db.close().await;
    Ok(())
}
