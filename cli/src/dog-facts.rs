use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;

use lib_facts::configs::SourceKind;
use lib_facts::loggers::loggerlocal::ALL_LEVELS;
use lib_facts::{
    load_facts_config, DeliveryContext, FactItem, FactListModel, LoadFactsUseCase, LoggerLocal, LoggerLocalOptions,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SourceArg {
    Cache,
    Remote,
}

/// Loads dog facts and prints them, one per line.
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "Loads dog facts through the facts gateway and prints them. Settings come from an optional JSON config file and DOGFACTS_* environment variables; the flags below override both."
)]
struct Args {
    /// Number of facts to load.
    #[arg(short = 'n', long)]
    count: Option<u32>,

    /// Data source to load from.
    #[arg(short, long, value_enum)]
    source: Option<SourceArg>,

    /// Store facts loaded from the remote source in the cache.
    #[arg(short, long)]
    write_through: bool,

    /// Path to a JSON config file.
    #[arg(short, long, env = "DOGFACTS_CONFIG")]
    config: Option<PathBuf>,

    /// Print every log level to the console, not only warnings and errors.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = load_facts_config(args.config.as_deref())
        .with_context(|| format!("Failed to load configuration from {:?}", args.config))?;
    if let Some(count) = args.count {
        config.facts_count = count;
    }
    if let Some(source) = args.source {
        config.source = match source {
            SourceArg::Cache => SourceKind::Cache,
            SourceArg::Remote => SourceKind::Remote,
        };
    }
    config.write_through |= args.write_through;
    log::debug!("{}", config);

    let options = LoggerLocalOptions {
        use_tty: Some(if args.verbose { ALL_LEVELS.to_vec() } else { vec![6, 5, 4] }),
        use_file: config.log_dir.as_ref().map(|_| ALL_LEVELS.to_vec()),
        log_dir: config.log_dir.clone(),
    };
    let logger = Arc::new(LoggerLocal::new(config.app_name.clone(), Some(options)));

    let gateway = config
        .build_gateway(logger.clone())
        .context("Failed to set up the facts gateway")?;
    let use_case = LoadFactsUseCase::new(Arc::new(gateway), logger.clone())
        .with_source(config.gateway_configuration().source);

    let context = DeliveryContext::spawn(logger.clone());
    let model = FactListModel::new(use_case, &context, logger).with_facts_count(config.facts_count);

    let screen = Arc::new(model.screen_title().to_string());
    model.items.subscribe(&screen, |items: Vec<FactItem>| {
        for (i, item) in items.iter().enumerate() {
            println!("{:>3}. {}", i + 1, item.text);
        }
    });
    let error_title = model.error_title();
    model.error_text.subscribe(&screen, move |text: String| {
        if !text.is_empty() {
            eprintln!("{}: {}", error_title, text);
        }
    });
    model.loading.subscribe(&screen, |loading: bool| log::debug!("loading: {}", loading));

    println!("{}", screen);
    model.load_facts().await;
    context.flush().await;

    if !model.error_text.get().is_empty() {
        std::process::exit(1);
    }
    Ok(())
}
