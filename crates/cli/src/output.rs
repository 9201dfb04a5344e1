use crate::error::CliError;
use serde::Serialize;
use std::path::Path;

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String, CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.map_err(CliError::JsonSerialize)
}

pub async fn write_json<T: Serialize>(value: &T, path: &Path, pretty: bool) -> Result<(), CliError> {
    let json = to_json(value, pretty)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}

pub fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), CliError> {
    let json = to_json(value, pretty)?;
    println!("{json}");
    Ok(())
}
