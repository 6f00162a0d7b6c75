// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Converts a batch of authored scene graphs listed in a TOML manifest.
//!
//! Run with: scenegraft convert <manifest>

mod helpers;
mod manifest;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::{Builder, Env};
use helpers::*;
use manifest::ConversionManifest;
use scenegraft_agents::{BatchReport, ConversionAgent, JsonDirSink};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(version, about = "Scene graph conversion tool")]
struct Cli {
    /// Log at debug level.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Converts every asset listed in a manifest.
    Convert {
        /// Path to the manifest file.
        manifest: PathBuf,

        /// Overrides the manifest's output directory.
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    Builder::from_env(Env::default().default_filter_or(level)).init();

    match cli.command {
        Command::Convert { manifest, out } => convert(&manifest, out),
    }
}

fn convert(manifest_path: &Path, out: Option<PathBuf>) -> Result<()> {
    print_task_start("CONVERTING SCENES", GEAR, CYAN);
    let start = Instant::now();

    let manifest = ConversionManifest::load(manifest_path)?;
    let base = manifest_path.parent().unwrap_or_else(|| Path::new("."));
    let assets = manifest.assets(base)?;
    let resolver = manifest.resolver(&assets);
    let output_dir = out.unwrap_or_else(|| base.join(&manifest.output_dir));

    log::info!(
        "Converting {} asset(s) into {}",
        assets.len(),
        output_dir.display()
    );

    let agent = ConversionAgent::new(Box::new(resolver));
    let mut sink = JsonDirSink::new(&output_dir);
    let report = agent
        .convert_paths(&assets, &mut sink)
        .with_context(|| format!("Conversion of '{}' aborted", manifest_path.display()))?;

    print_report(&report);

    let duration = start.elapsed();
    if !report.failed.is_empty() {
        print_error(&format!(
            "{} asset(s) could not be converted",
            report.failed.len()
        ));
        anyhow::bail!("{} asset(s) failed", report.failed.len());
    }
    print_success(&format!(
        "Converted {} asset(s) in {:.2}s",
        report.converted.len(),
        duration.as_secs_f64()
    ));
    Ok(())
}

fn print_report(report: &BatchReport) {
    for diagnostic in &report.diagnostics {
        print_warning(&diagnostic.to_string());
    }
    for uuid in &report.failed {
        print_error(&format!("Failed: {uuid}"));
    }
    if !report.patched.is_empty() {
        println!(
            "  {}{} asset(s) patched by overrides{}",
            BOLD,
            report.patched.len(),
            RESET
        );
    }
}
