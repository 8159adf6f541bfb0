//! Live query - subscribe to changes on a table, then stop.
//!
//! This example demonstrates:
//! - Binding session parameters with `assign`
//! - Starting a live query and receiving its id
//! - Stopping the live query with `kill`
//!
//! # Running
//!
//! ```sh
//! FATHOM_URL=ws://localhost:8000/rpc cargo run --example live
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

    let mut db = Client::new(&url);
    db.connect().await?;
    db.signin(json!({"user": "root", "pass": "root"})).await?;
    db.use_ns("test", "test").await?;

    // Bind a session parameter, usable from queries as $min_age
    db.assign("min_age", json!(18)).await?;
    let adults = db
        .query("SELECT * FROM person WHERE age >= $min_age", None)
        .await?;
    println!("adults: {adults}");

    // Start a live query on the person table
    let live_id = db.live("person").await?;
    println!("live query started: {live_id}");

    // Stop it again
    db.kill(&live_id).await?;
    println!("live query stopped");

    db.close().await;
    Ok(())
}
