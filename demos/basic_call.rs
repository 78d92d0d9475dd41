//! Basic example demonstrating a reusable call against a public JSON API.
//!
//! This example shows how to:
//! - Configure a call with host, path, method and query parameters
//! - Decode a JSON response into a typed target
//! - Send a gzip-compressed JSON body
//! - Handle a raw response yourself
//!
//! Run with: `cargo run --example basic_call`

use fluentcall::{CallContext, Error, HttpCall};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Default, Deserialize)]
#[allow(dead_code)]
struct Post {
    #[serde(rename = "userId")]
    user_id: u32,
    id: u32,
    title: String,
    body: String,
}

#[derive(Debug, Serialize)]
struct NewPost {
    title: String,
    body: String,
    #[serde(rename = "userId")]
    user_id: u32,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter("fluentcall=debug,basic_call=info")
        .init();

    let mut call = HttpCall::with_default_client("https://jsonplaceholder.typicode.com")?;
    let ctx = CallContext::background().with_timeout(Duration::from_secs(10));

    println!("=== GET with decoding ===");
    let mut post = Post::default();
    let response = call
        .method("GET")
        .path("/posts/1")
        .execute_and_decode(&ctx, &mut post)
        .await?;

    println!("Status code: {}", response.status_code);
    println!("Post ID: {}", post.id);
    println!("Title: {}", post.title);
    println!();

    println!("=== POST with a gzip-compressed body ===");
    let new_post = NewPost {
        title: "My New Post".to_string(),
        body: "This is the content of my new post!".to_string(),
        user_id: 1,
    };

    let mut created = Post::default();
    let response = call
        .method("POST")
        .path("/posts")
        .gzip(true)
        .json(&new_post)?
        .execute_and_decode(&ctx, &mut created)
        .await?;

    println!("Status code: {}", response.status_code);
    println!("Created post ID: {}", created.id);
    println!();

    println!("=== Raw GET with query parameters ===");
    let raw = call
        .method("GET")
        .path("/comments")
        .gzip(false)
        .param("postId", "1")
        .execute(&ctx)
        .await?;

    println!("Status code: {}", raw.status());
    println!("Content-Type: {:?}", raw.headers().get("content-type"));
    let text = raw.text().await?;
    println!("Raw response length: {} bytes", text.len());

    Ok(())
}
