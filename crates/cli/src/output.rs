use crate::error::CliError;
use serde::Serialize;

fn to_json<T: Serialize>(value: &T) -> Result<String, CliError> {
    let json = serde_json::to_string_pretty(value)?;
    Ok(json)
}

pub async fn emit<T: Serialize>(value: &T, output: Option<String>) -> Result<(), CliError> {
    let json = to_json(value)?;
    match output {
        Some(path) => tokio::fs::write(path, json).await?,
        None => println!("{json}"),
    }
    Ok(())
}
