// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! TriStrip CLI - batch triangle stripifier.
//!
//! Reads a JSON document of named index buffers, converts each into
//! triangle strips plus a leftover triangle list, and writes the result
//! as JSON.
//!
//! Usage:
//!   tristrip <input.json> [options]
//!
//! Settings come from environment variables (see `config.rs`); command
//! line options override them.

use std::env;
use std::fs;
use std::io::Write;

use anyhow::{bail, Context, Result};
use tristrip_core::StripifyConfig;

mod batch;
mod config;
mod types;

use config::Config;
use types::BatchInput;

/// Parsed command line.
#[derive(Debug, PartialEq)]
struct Args {
    input: String,
    output: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            env::var("RUST_LOG").unwrap_or_else(|_| "info,tristrip_core=debug".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return;
    }

    if let Err(e) = run(&args[1..]) {
        eprintln!("{}", error_message(&e));
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> Result<()> {
    let mut config = Config::from_env();
    let args = parse_args(args, &mut config.stripify)?;

    tracing::info!(
        input = %args.input,
        worker_threads = config.worker_threads,
        min_strip_size = config.stripify.min_strip_size,
        cache_capacity = config.stripify.cache_capacity,
        search = %config.stripify.search,
        "Starting TriStrip"
    );

    rayon::ThreadPoolBuilder::new()
        .num_threads(config.worker_threads)
        .build_global()
        .context("Failed to initialize thread pool")?;

    let content = fs::read_to_string(&args.input)
        .with_context(|| format!("Cannot read '{}'", args.input))?;
    let input: BatchInput = serde_json::from_str(&content)
        .with_context(|| format!("Cannot parse '{}'", args.input))?;

    let output = batch::process_batch(input, &config.stripify)?;
    let json = serde_json::to_string(&output).context("Failed to serialize output")?;

    match &args.output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("Cannot write '{path}'"))?;
            tracing::info!(output = %path, "Wrote output");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

/// One line naming the failure and every context layer behind it.
fn error_message(error: &anyhow::Error) -> String {
    format!("Error: {error:#}")
}

/// Applies option flags to `stripify` and returns the file arguments.
fn parse_args(args: &[String], stripify: &mut StripifyConfig) -> Result<Args> {
    let mut input = None;
    let mut output = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let mut value = |name: &str| {
            iter.next()
                .cloned()
                .with_context(|| format!("Missing value for {name}"))
        };
        match arg.as_str() {
            "--output" | "-o" => output = Some(value(arg)?),
            "--min-strip-size" => {
                stripify.min_strip_size = value(arg)?
                    .parse()
                    .context("Invalid min strip size value")?;
            }
            "--cache-size" => {
                stripify.cache_capacity = value(arg)?.parse().context("Invalid cache size value")?;
            }
            "--search" => stripify.search = value(arg)?.parse()?,
            "--no-cache" => stripify.cache_simulation = false,
            "--no-carry-cache" => stripify.carry_cache = false,
            "--no-backward" => stripify.backward_search = false,
            other if other.starts_with('-') => bail!("Unknown option: {other}"),
            other => {
                if input.is_some() {
                    bail!("Unexpected argument: {other}");
                }
                input = Some(other.to_string());
            }
        }
    }

    let input = input.context("No input file given")?;
    stripify.validate()?;
    Ok(Args { input, output })
}

fn print_usage() {
    println!("TriStrip - convert indexed triangle lists into triangle strips");
    println!();
    println!("Usage: tristrip <input.json> [options]");
    println!();
    println!("Options:");
    println!("  -o, --output <path>        Write JSON here instead of stdout");
    println!("  --min-strip-size <n>       Smallest strip worth emitting (default: 2)");
    println!("  --cache-size <n>           Simulated vertex cache entries (default: 16)");
    println!("  --no-cache                 Rank strips by length only");
    println!("  --no-carry-cache           Score each round against an empty cache");
    println!("  --no-backward              Only extend strips forward");
    println!("  --search <mode>            exhaustive | loneliest (default: exhaustive)");
    println!("                             exhaustive is quadratic in the triangle count;");
    println!("                             use loneliest for meshes above a few thousand");
    println!("                             triangles");
    println!();
    println!("Environment:");
    println!("  TRISTRIP_MIN_STRIP_SIZE, TRISTRIP_CACHE_SIZE, TRISTRIP_CACHE,");
    println!("  TRISTRIP_CARRY_CACHE, TRISTRIP_BACKWARD, TRISTRIP_SEARCH,");
    println!("  WORKER_THREADS, RUST_LOG");
    println!();
    println!("Input:  {{ \"meshes\": [ {{ \"name\": \"...\", \"indices\": [0, 1, 2, ...] }} ] }}");
}
