use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use env_logger::Env;
use log::{LevelFilter, debug};

use markov_core::model::config::ModelConfig;
use markov_core::model::generator::Generator;

/// Generate names resembling a training list with an order-N Markov chain.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Training file, one name per line
    #[arg(short = 't', long, value_name = "FILE")]
    training: PathBuf,

    /// Number of names to generate
    #[arg(short = 'n', long, value_name = "COUNT")]
    names: usize,

    /// Order of the Markov chain (default 3)
    #[arg(short = 'o', long)]
    order: Option<usize>,

    /// Seed of the random stream; derived from the clock if omitted
    #[arg(short = 's', long)]
    seed: Option<u64>,

    /// Use Laplace smoothing
    #[arg(short = 'l', long)]
    laplace: bool,

    /// Base weight of an unseen transition
    #[arg(short = 'b', long = "base", value_name = "WEIGHT")]
    base_weight: Option<u64>,

    /// Weight step added per observed transition
    #[arg(short = 'p', long = "probability", value_name = "WEIGHT")]
    step_weight: Option<u64>,

    /// Longest name accepted, in characters
    #[arg(short = 'm', long, value_name = "CHARS", default_value_t = 64)]
    max_length: usize,

    /// JSON model configuration, overridden by the flags above
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print every learned transition before generating
    #[arg(long)]
    dump: bool,

    /// Increase verbosity (-v, -vv)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Builds the model configuration: JSON file first, then flag overrides.
    fn model_config(&self) -> Result<ModelConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("unable to read {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("invalid configuration in {}", path.display()))?
            }
            None => ModelConfig::default(),
        };

        if let Some(order) = self.order {
            config.set_order(order)?;
        }
        if self.laplace {
            config.set_smoothing(true);
        }
        if let Some(base_weight) = self.base_weight {
            config.set_base_weight(base_weight);
        }
        if let Some(step_weight) = self.step_weight {
            config.set_step_weight(step_weight);
        }
        match self.seed {
            Some(seed) => config.set_seed(seed),
            // A configuration file may pin the seed
            None if self.config.is_none() => config.set_seed(clock_seed()),
            None => (),
        }

        config.validate()?;
        Ok(config)
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("warn"));
    builder.filter_level(level);
    let _ = builder.try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.model_config()?;
    debug!("Model configuration: {:?}", config);

    let mut generator = Generator::from_file(&cli.training, config)
        .with_context(|| format!("unable to train on {}", cli.training.display()))?;

    if cli.dump {
        for (path, weight) in generator.model().leaves() {
            let chain: Vec<String> = path.iter().map(|c| format!("{:?}", c)).collect();
            println!("{}: {}", chain.join("->"), weight);
        }
    }

    for name in generator.generate_unique(cli.names, cli.max_length)? {
        println!("\t{}", name);
    }

    Ok(())
}
