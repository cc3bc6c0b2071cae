/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

// Usage note:
// Run after building the extension, pointing --out at the directory that contains the shared library, so that the
// runtime finds library_documentation.xml next to it when the editor starts.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use gdbind_docgen::{DocgenConfig, StopWatch, generate, write_outputs};
use tracing_subscriber::EnvFilter;

/// Extracts editor documentation from gdbind extension sources.
#[derive(Debug, Parser)]
#[command(name = "gdbind-docgen", version)]
struct Cli {
    /// Extension source directory.
    #[arg(long, env = "GDBIND_DOCGEN_SRC", default_value = "src")]
    src: PathBuf,

    /// Directory for library_documentation.xml.
    #[arg(long, env = "GDBIND_DOCGEN_OUT", default_value = ".")]
    out: PathBuf,

    /// Also write library_documentation.json next to the XML file.
    #[arg(long, env = "GDBIND_DOCGEN_JSON")]
    json: bool,

    /// Also write one class reference XML file per class into this directory.
    #[arg(long, env = "GDBIND_DOCGEN_XML_DIR")]
    xml_dir: Option<PathBuf>,

    /// Write phase timings to this file.
    #[arg(long, env = "GDBIND_DOCGEN_STATS")]
    stats: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = DocgenConfig {
        source_dir: cli.src,
        output_dir: cli.out,
        xml_dir: cli.xml_dir,
        json: cli.json,
    };

    let mut watch = StopWatch::start();

    let docs = match generate(&config, &mut watch) {
        Ok(docs) => docs,
        Err(err) => {
            tracing::error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let written = match write_outputs(&docs, &config) {
        Ok(written) => written,
        Err(err) => {
            tracing::error!("{err}");
            return ExitCode::FAILURE;
        }
    };
    watch.record("write_outputs");

    for path in &written {
        println!("-> {}", path.display());
    }
    tracing::info!(
        classes = docs.classes.len(),
        files = written.len(),
        "documentation generated"
    );

    if let Some(stats) = &cli.stats {
        if let Err(err) = watch.write_stats_to(stats) {
            tracing::error!("failed to write stats to {}: {err}", stats.display());
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}
