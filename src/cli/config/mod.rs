//! Config command - resolves model settings without starting the server

use crate::domain::{ModelSettings, ProcessEnv};

/// Print the resolved model settings as JSON, failing when they are invalid
pub fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = ModelSettings::resolve(&ProcessEnv)?;
    println!("{}", serde_json::to_string_pretty(&settings)?);

    Ok(())
}
