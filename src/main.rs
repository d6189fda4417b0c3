use std::env;

use recipe_extract::config::PipelineConfig;
use recipe_extract::handle_request;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let url = args.get(1).ok_or("Please provide a recipe URL as an argument")?;

    let config = PipelineConfig::load().unwrap_or_default();
    let body = serde_json::json!({ "url": url }).to_string();

    let response = handle_request(&body, &config).await;
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
