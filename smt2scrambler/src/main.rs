// Copyright (c) Facebook, Inc. and its affiliates
// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use anyhow::Context;
use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::PathBuf,
};
use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

/// Scrambler for SMT-LIB 2 benchmarks.
#[derive(Debug, StructOpt)]
struct Options {
    /// Output file (default: stdout)
    #[structopt(long, parse(from_os_str))]
    output: Option<PathBuf>,

    #[structopt(flatten)]
    config: smt2scrambler::ScramblerConfig,

    #[structopt(flatten)]
    parser_config: smt2scrambler::ParserConfig,

    /// Input file (default: stdin)
    #[structopt(parse(from_os_str))]
    input: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let options = Options::from_args();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
    tracing::debug!("Current options: {:?}", options);

    let (path_name, input): (Option<String>, Box<dyn BufRead>) = match &options.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open input file {}", path.display()))?;
            (
                Some(path.display().to_string()),
                Box::new(BufReader::new(file)),
            )
        }
        None => (None, Box::new(BufReader::new(std::io::stdin()))),
    };
    let mut output: Box<dyn Write> = match &options.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(std::io::stdout())),
    };

    if options.config.count_asserts {
        let count = smt2scrambler::count_assertions(
            options.config,
            options.parser_config,
            path_name,
            input,
            &mut output,
        )?;
        eprintln!("; Number of assertions: {}", count);
    } else {
        smt2scrambler::scramble_stream(
            options.config,
            options.parser_config,
            path_name,
            input,
            &mut output,
        )?;
    }
    Ok(())
}
