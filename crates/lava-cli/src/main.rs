mod config;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use lava_classfile::ClassFile;
use lava_vm_compiler::ClassCompiler;
use lava_vm_heap::Heap;
use std::path::PathBuf;
use tracing_subscriber::filter::EnvFilter;

use crate::config::load_config;
use crate::report::Report;

#[derive(Parser)]
#[command(name = "lava", version, about = "Load a Java class into a Lava VM heap")]
struct Cli {
    /// Compiled .class file
    class_file: PathBuf,

    /// Config file (default: lava.toml in this or a parent directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Heap size in words
    #[arg(long)]
    heap_words: Option<usize>,

    /// Print the constant pool
    #[arg(long)]
    dump_pool: bool,

    /// Print the class table
    #[arg(long)]
    dump_heap: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref())?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.output.log_level))
        .with_context(|| format!("invalid log level {:?}", config.output.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(words) = cli.heap_words {
        config.heap.words = words;
    }
    let output = config.output;

    let class = ClassFile::read(&cli.class_file)
        .with_context(|| format!("failed to load {}", cli.class_file.display()))?;

    let mut heap = Heap::new(config.heap);
    let table = ClassCompiler::new(&mut heap).compile(&class);
    if table.is_nil() {
        tracing::warn!(target: "lava::cli", "class table could not be allocated");
    }

    let report = Report::new(
        &class,
        &heap,
        table,
        cli.dump_pool || output.dump_pool,
        cli.dump_heap || output.dump_heap,
    );
    if cli.json || output.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render());
    }

    Ok(())
}
