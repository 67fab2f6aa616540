use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use env_logger::Env;
use fakenews_core::config::{DEFAULT_CACHE_PATH, DEFAULT_DATA_DIR};
use fakenews_core::{pipeline, Config, Generator};
use log::info;

/// Generate fake headlines from a Markov chain trained on a text corpus.
#[derive(Parser, Debug)]
#[command(name = "fakenews", author, version, about, long_about = None)]
struct Cli {
	/// Number of headlines to generate
	#[arg(short = 'n', long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
	count: u32,

	/// Chain order: each word is predicted from the previous ORDER-1 words
	#[arg(short, long, default_value_t = 2, value_parser = clap::value_parser!(u32).range(2..))]
	order: u32,

	/// Ignore the model cache and retrain from the corpus
	#[arg(short, long)]
	refresh: bool,

	/// Directory holding the corpus files
	#[arg(long, value_name = "DIR", env = "FAKENEWS_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
	data_dir: PathBuf,

	/// Location of the model cache
	#[arg(long, value_name = "PATH", env = "FAKENEWS_CACHE", default_value = DEFAULT_CACHE_PATH)]
	cache: PathBuf,

	/// Keep quotation marks in corpus words
	#[arg(long)]
	keep_quotes: bool,

	/// Seed for reproducible output
	#[arg(long, value_name = "SEED")]
	seed: Option<u64>,

	/// Increase verbosity (-v, -vv)
	#[arg(short = 'v', long, action = ArgAction::Count)]
	verbose: u8,

	/// Only report errors
	#[arg(short = 'q', long, conflicts_with = "verbose")]
	quiet: bool,
}

impl Cli {
	fn config(&self) -> Result<Config> {
		let mut config = Config::default();
		config.data_dir = self.data_dir.clone();
		config.cache_path = self.cache.clone();
		config.strip_quotes = !self.keep_quotes;
		config.refresh = self.refresh;
		config.set_order(self.order as usize)?;
		Ok(config)
	}

	fn log_level(&self) -> &'static str {
		if self.quiet {
			return "error";
		}
		match self.verbose {
			0 => "warn",
			1 => "info",
			_ => "debug",
		}
	}
}

fn main() -> Result<()> {
	let cli = Cli::parse();
	env_logger::Builder::from_env(Env::default().default_filter_or(cli.log_level())).init();

	let config = cli.config()?;
	let model = pipeline::load_or_train(&config)
		.with_context(|| format!("cannot prepare a model from {}", config.data_dir.display()))?;
	if model.is_empty() {
		anyhow::bail!("no headlines found in {}", config.data_dir.display());
	}

	let mut generator = match cli.seed {
		Some(seed) => Generator::seeded(&model, seed),
		None => Generator::from_entropy(&model),
	};
	info!("generating {} headlines with an order-{} chain", cli.count, model.order());

	let stdout = io::stdout();
	let mut out = stdout.lock();
	for _ in 0..cli.count {
		let line = generator.generate_line().context("generation failed")?;
		writeln!(out, "{}", line)?;
	}

	Ok(())
}
