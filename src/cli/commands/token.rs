use anyhow::Context;
use serde_json::json;
use uuid::Uuid;

use crate::auth::TokenCodec;
use crate::cli::OutputFormat;
use crate::config::AppConfig;

pub fn handle(
    config: &AppConfig,
    user_id: Uuid,
    name: &str,
    email: &str,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let codec = TokenCodec::new(&config.security).context("cannot sign tokens")?;
    let token = codec.issue(&user_id, name, email)?;

    match output_format {
        OutputFormat::Text => println!("{}", token),
        OutputFormat::Json => println!(
            "{}",
            json!({
                "token": token,
                "expires_in": codec.ttl_seconds(),
            })
        ),
    }
    Ok(())
}
