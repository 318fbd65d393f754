// CLI module for nano-banana-editor
// Author: kelexine (https://github.com/kelexine)

use crate::codec::{decode_payload, download_file_name, RawImageFile};
use crate::config::{ApiKey, AppConfig};
use crate::error::{EditorError, Result};
use crate::session::SessionController;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

/// nano-banana-editor - describe a photo edit, let Gemini do it
#[derive(Parser, Debug)]
#[command(name = "nano-banana-editor", version, about, long_about = None)]
pub struct Args {
    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Path to a config file (default: ~/.nano-banana/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the image editing model
    #[arg(long, global = true)]
    pub model: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the HTTP API for a browser front end (default)
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,
    },

    /// Edit a local image; repeated prompts are applied one after another
    Edit {
        /// Image file to edit
        input: PathBuf,

        /// Edit instruction, e.g. "add a hat"
        #[arg(short, long = "prompt", required = true)]
        prompts: Vec<String>,

        /// Where to write the PNG result
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Args {
    /// Apply CLI overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(key) = &self.api_key {
            config.gemini.api_key = Some(ApiKey::new(key.clone()));
        }
        if let Some(model) = &self.model {
            config.gemini.model = model.clone();
        }
        if let Some(Command::Serve { host, port }) = &self.command {
            if let Some(host) = host {
                config.server.host = host.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
        }
    }
}

/// Run one edit session from the command line and write the final result.
///
/// Prompts are chained: each one edits the previous result. Blank prompts are
/// skipped. Stops at the first failure.
pub async fn run_edit(
    controller: &SessionController,
    input: &Path,
    prompts: &[String],
    output: Option<&Path>,
) -> Result<PathBuf> {
    let file = RawImageFile::from_path(input).await?;
    controller.load_image(file).await?;
    info!("Loaded {}", input.display());

    let mut applied = 0;
    for prompt in prompts.iter().map(|p| p.trim()).filter(|p| !p.is_empty()) {
        info!("Applying edit {}: {}", applied + 1, prompt);
        controller.submit(prompt).await?;
        applied += 1;
    }

    if applied == 0 {
        return Err(EditorError::InvalidRequest(
            "At least one non-empty prompt is required".to_string(),
        ));
    }

    let result = controller.result().ok_or(EditorError::NoImage)?;
    let bytes = decode_payload(&result)?;
    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(download_file_name()));

    tokio::fs::write(&path, bytes).await?;
    info!("Wrote {} after {} edit(s)", path.display(), applied);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_edit_command() {
        let args = Args::try_parse_from([
            "nano-banana-editor",
            "edit",
            "photo.jpg",
            "-p",
            "add a hat",
            "--prompt",
            "now make it black and white",
            "-o",
            "out.png",
        ])
        .unwrap();

        match args.command {
            Some(Command::Edit {
                input,
                prompts,
                output,
            }) => {
                assert_eq!(input, PathBuf::from("photo.jpg"));
                assert_eq!(prompts, vec!["add a hat", "now make it black and white"]);
                assert_eq!(output, Some(PathBuf::from("out.png")));
            }
            other => panic!("expected edit command, got {:?}", other),
        }
    }

    #[test]
    fn test_edit_requires_prompt() {
        assert!(Args::try_parse_from(["nano-banana-editor", "edit", "photo.jpg"]).is_err());
    }

    #[test]
    fn test_apply_overrides() {
        let args = Args::try_parse_from([
            "nano-banana-editor",
            "--api-key",
            "AIza-cli",
            "--model",
            "gemini-custom-image",
            "serve",
            "--port",
            "9000",
        ])
        .unwrap();

        let mut config = AppConfig::default();
        args.apply(&mut config);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.gemini.model, "gemini-custom-image");
        assert_eq!(config.gemini.api_key.unwrap().expose(), "AIza-cli");
    }
}
