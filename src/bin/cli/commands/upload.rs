use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use flashdeck_lib::ingest::register_upload;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, file: &Path, name: Option<&str>, format: &OutputFormat) -> Result<()> {
    let bytes = fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let file_name = match name {
        Some(name) => name.to_string(),
        None => file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .context("Upload path has no file name")?,
    };

    let upload = register_upload(&app.data_dir, &app.config.uploads_dir, &file_name, &bytes)
        .with_context(|| format!("Failed to register {}", file.display()))?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "deckId": upload.deck_id,
                "id": upload.deck.id,
                "name": upload.deck.name,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("{}", upload.deck_id);
        }
    }

    Ok(())
}
