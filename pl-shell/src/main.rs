//!
//! This is the demo driver of the pl vector runtime.
//!
#![warn(missing_docs)]

use anyhow::Context;
use clap::Parser;
#[cfg(feature = "jemalloc")]
use jemallocator::Jemalloc;
use tracing_subscriber::EnvFilter;

use pl_core::exception::unwrap_or_exit;
use pl_object::{GcParams, Runtime};

mod demo;
mod stress;

#[cfg(feature = "jemalloc")]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

/// Command-line options.
#[derive(Debug, Clone, PartialEq, Parser)]
#[clap(about, author, version)]
struct Options {
    /// What to run (defaults to `demo`).
    #[clap(subcommand)]
    command: Option<Command>,

    /// Limit the bytes tracked objects may occupy.
    #[clap(long, global = true)]
    max_bytes: Option<usize>,

    /// Set the log filter (overrides `RUST_LOG`).
    #[clap(long, global = true)]
    log_level: Option<String>,

    /// Print a heap report after every collection.
    #[clap(short, long, global = true)]
    report: bool,
}

/// The sessions the driver can run.
#[derive(Debug, Clone, PartialEq, clap::Subcommand)]
enum Command {
    /// Replay a scripted session binding, printing and collecting a few vectors.
    Demo,
    /// Pin lists of int vectors as roots, then collect them.
    Stress {
        /// Number of lists to allocate.
        #[clap(long, default_value = "100")]
        count: usize,
    },
}

fn init_logging(level: Option<&str>) -> anyhow::Result<()> {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level)
            .with_context(|| format!("invalid log filter `{}`", level))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let opts: Options = Options::parse();
    init_logging(opts.log_level.as_deref())?;

    let params = GcParams {
        max_bytes: opts.max_bytes,
        ..GcParams::default()
    };
    let mut runtime = Runtime::with_params(params);

    match opts.command.unwrap_or(Command::Demo) {
        Command::Demo => unwrap_or_exit(demo::run(&mut runtime, opts.report)),
        Command::Stress { count } => {
            unwrap_or_exit(stress::run(&mut runtime, count, opts.report))
        }
    }

    let stats = runtime.heap().stats();
    tracing::info!(
        collections = stats.collections_performed,
        allocated = stats.objects_allocated,
        swept = stats.objects_swept,
        elapsed = ?stats.total_time_spent,
        "session finished"
    );
    Ok(())
}
