use std::env;
use std::process;

use anyhow::Context;
use log::info;

use rs_markov_core::config::Config;
use rs_markov_core::io::open_corpus;
use rs_markov_core::stats::pipeline::StatsPipeline;
use rs_markov_core::store::SqliteStore;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let corpus_path = match args.next() {
        Some(path) => path,
        None => {
            eprintln!("usage: rs-markov-train <corpus.txt> [config.json]");
            process::exit(2);
        }
    };

    let config = match args.next() {
        Some(path) => Config::from_file(&path)
            .with_context(|| format!("loading configuration from {path}"))?,
        None => Config::default(),
    };
    config.validate()?;

    // The corpus is checked first: a missing input aborts before any
    // store state exists.
    let corpus = open_corpus(&corpus_path)?;

    info!("opening store at {}", config.store_path.display());
    let mut store = SqliteStore::open(&config.store_path, config.durability)?;

    info!("creating tables");
    store.create_schema(config.max_order)?;

    info!("collecting statistics from {corpus_path}");
    let pipeline = StatsPipeline::new(&config, store);
    let (summary, _store) = pipeline.run(corpus)?;

    info!(
        "{} chars read, {} accepted, {} dropped, {} observations in {} flushes",
        summary.chars_read,
        summary.symbols_accepted,
        summary.symbols_dropped,
        summary.observations,
        summary.flushes
    );
    info!("done");

    Ok(())
}
