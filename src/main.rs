use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use log::info;

use mutclass::{ClassConfig, ClassSize, Matrix, MatrixLoader, MutationClassLoader, RandomWalkCheck};

fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}

struct Args {
    config: Option<PathBuf>,
    matrices: Vec<String>,
}

fn parse_args() -> Result<Args> {
    let mut args = env::args().skip(1);
    let mut config = None;
    let mut matrices = Vec::new();
    while let Some(arg) = args.next() {
        if arg == "--config" {
            let path = args.next().context("--config requires a path")?;
            config = Some(PathBuf::from(path));
        } else if arg.starts_with("--") {
            anyhow::bail!("Unknown option: {arg}");
        } else {
            matrices.push(arg);
        }
    }
    Ok(Args { config, matrices })
}

fn read_stdin_matrices() -> Result<Vec<String>> {
    let stdin = io::stdin();
    let mut lines = Vec::new();
    for line in stdin.lock().lines() {
        let line = line.context("read matrix from stdin")?;
        if !line.trim().is_empty() {
            lines.push(line);
        }
    }
    Ok(lines)
}

fn main() -> Result<()> {
    init_logging();
    let args = parse_args()?;
    let config = match args.config.as_deref() {
        Some(path) => ClassConfig::from_path(path)?,
        None => ClassConfig::default(),
    };
    let inputs = if args.matrices.is_empty() {
        read_stdin_matrices()?
    } else {
        args.matrices
    };
    if inputs.is_empty() {
        anyhow::bail!("No matrices given on the command line or stdin");
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for input in &inputs {
        let matrix =
            MatrixLoader::parse(input).with_context(|| format!("read matrix {input:?}"))?;
        let size = analyse(&matrix, &config);
        writeln!(out, "{matrix}\t{size}").context("write result")?;
    }
    Ok(())
}

fn analyse(matrix: &Matrix, config: &ClassConfig) -> ClassSize {
    let start = Instant::now();
    if RandomWalkCheck::is_infinite(matrix, &config.walk) {
        info!("{matrix}: infinite-type matrix found by random walks");
        return ClassSize::Infinite;
    }
    let mut loader = MutationClassLoader::with_config(matrix.clone(), config);
    let size = loader.size();
    let checks = loader.checker_stats();
    info!(
        "{matrix}: class size {size} in {:?} ({} mutations, {} equivalence searches)",
        start.elapsed(),
        loader.stats().mutations,
        checks.searches
    );
    size
}
