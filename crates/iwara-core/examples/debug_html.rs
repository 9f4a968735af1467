//! Debug script to inspect the HTML of an iwara video page
//!
//! Usage: `cargo run --example debug_html -- <video-id>`; set `IWARA_TOKEN`
//! to fetch the page as a logged-in user.

use iwara_core::parser::parse_video_detail;
use iwara_core::url::video_path;
use iwara_core::{Channel, IwaraClient, Session};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let video_id = std::env::args().nth(1).unwrap_or_else(|| "abcdefgh".to_string());
    let session = std::env::var("IWARA_TOKEN")
        .map(Session::new)
        .unwrap_or_default();

    let client = IwaraClient::new()?;
    println!("Fetching video page for '{}'...\n", video_id);

    let html = client
        .get_page(Channel::Standard, &video_path(&video_id), &session)
        .await?;

    // Save HTML to file for inspection
    std::fs::write("debug_video.html", &html)?;
    println!("HTML saved to debug_video.html");

    match parse_video_detail(&html, &video_id, client.base_url()) {
        Ok(outcome) => println!("\n=== Parsed ===\n{}", serde_json::to_string_pretty(&outcome)?),
        Err(e) => println!("\n=== Parse failed: {} ===", e),
    }

    Ok(())
}
