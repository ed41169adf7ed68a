//! Build script for the status board.
//!
//! Copies the example configuration and template into the user's local data
//! directory, next to the default `config.json` location. Rename them to
//! `config.json` and `template.html` to use them:
//! - Linux: `~/.local/share/statusboard/`
//! - macOS: `~/Library/Application Support/statusboard/`
//! - Windows: `%LOCALAPPDATA%/statusboard/`
//!
//! Existing files are never overwritten and missing templates only produce
//! a cargo warning.

use std::{env, fs, path::PathBuf};

const EXAMPLES: [&str; 2] = ["config.example.json", "template.example.html"];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    for example in EXAMPLES {
        println!("cargo:rerun-if-changed={}", example);
    }

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("statusboard");
    fs::create_dir_all(&out_dir)?;

    for example in EXAMPLES {
        let source = manifest_dir.join(example);
        let target = out_dir.join(example);

        if !source.is_file() {
            println!("cargo:warning={} not found at {}", example, source.display());
            continue;
        }
        if !target.exists() {
            fs::copy(&source, &target)?;
        }
    }

    Ok(())
}
