//! Titanic Survival Prediction CLI
//!
//! Train the linear survival model, predict from the command line, or serve
//! predictions over HTTP.

use clap::{Parser, Subcommand};
use titanic::{Config, Result};

#[derive(Parser)]
#[command(name = "titanic")]
#[command(about = "Titanic survival prediction with a linear model", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit the model on labelled passengers and save it
    Train {
        /// Labelled passengers (Kaggle CSV or JSON array), overrides the config
        #[arg(long)]
        data: Option<String>,
        /// Shuffle seed for the hold-out split
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Predict survival for a passenger
    Predict {
        /// Passenger JSON file (one record or an array)
        #[arg(long, conflicts_with_all = ["pclass", "name", "sex"])]
        input: Option<String>,
        /// Ticket class (1-3)
        #[arg(long, required_unless_present = "input")]
        pclass: Option<i64>,
        /// Full name, e.g. "Doe, Mr. John"
        #[arg(long, required_unless_present = "input")]
        name: Option<String>,
        /// male or female
        #[arg(long, required_unless_present = "input")]
        sex: Option<String>,
        #[arg(long)]
        age: Option<f64>,
        /// Siblings and spouses aboard
        #[arg(long, default_value = "0")]
        sibsp: i64,
        /// Parents and children aboard
        #[arg(long, default_value = "0")]
        parch: i64,
        #[arg(long)]
        fare: Option<f64>,
        /// Port code: C, Q or S
        #[arg(long)]
        embarked: Option<String>,
        /// Output format
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },
    /// Serve predictions over HTTP
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Model management commands
    Model {
        #[command(subcommand)]
        action: ModelCommands,
    },
    /// Initialize a new project with default config
    Init,
}

#[derive(Subcommand)]
enum ModelCommands {
    /// Show model coefficients
    Info,
}

#[derive(Clone, Debug)]
enum OutputFormat {
    Table,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use table or json.", s)),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load or create config
    let config = if std::path::Path::new(&cli.config).exists() {
        match Config::load(&cli.config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    // Run command
    let result = match cli.command {
        Commands::Train { data, seed } => commands::train(&config, data, seed),
        Commands::Predict {
            input,
            pclass,
            name,
            sex,
            age,
            sibsp,
            parch,
            fare,
            embarked,
            format,
        } => {
            let records = match input {
                Some(path) => commands::read_passengers(&path),
                None => Ok(vec![titanic::PassengerRecord {
                    pclass: pclass.unwrap_or_default(),
                    name: name.unwrap_or_default(),
                    sex: sex.unwrap_or_default(),
                    age,
                    sibsp,
                    parch,
                    fare: fare.or(Some(0.0)),
                    embarked: embarked.or_else(|| Some(titanic::DEFAULT_EMBARKED.to_string())),
                }]),
            };
            records.and_then(|r| commands::predict(&config, &r, format))
        }
        Commands::Serve { host, port } => commands::serve(config, host, port),
        Commands::Model { action } => match action {
            ModelCommands::Info => commands::model_info(&config),
        },
        Commands::Init => commands::init(&cli.config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

mod commands {
    use super::*;
    use titanic::data::PassengerDataset;
    use titanic::features::{FeatureEncoder, FeatureRow};
    use titanic::model::linear::artifact_file;
    use titanic::model::LinearModel;
    use titanic::predict::inference::{format_prediction, Predictor};
    use titanic::training::Trainer;
    use titanic::PassengerRecord;

    pub fn init(config_path: &str) -> Result<()> {
        let config = Config::default();
        config.save(config_path)?;
        println!("Created default config at {}", config_path);

        std::fs::create_dir_all("data")?;
        std::fs::create_dir_all("model")?;
        println!("Created data/ and model/ directories");

        println!("\nNext steps:");
        println!("  1. Put labelled passengers in {}", config.training.data_path);
        println!("  2. Run 'titanic train' to fit the model");
        println!("  3. Run 'titanic serve' to start the API");

        Ok(())
    }

    pub fn train(config: &Config, data: Option<String>, seed: Option<u64>) -> Result<()> {
        let mut training = config.training.clone();
        if let Some(path) = data {
            training.data_path = path;
        }
        if let Some(seed) = seed {
            training.seed = seed;
        }

        println!("Loading {}...", training.data_path);
        let dataset = PassengerDataset::load(&training.data_path)?;
        println!(
            "  {} passengers, survival rate {:.1}%",
            dataset.len(),
            dataset.survival_rate() * 100.0
        );

        let trainer = Trainer::new(training, FeatureEncoder::from_config(&config.features));
        let (model, report) = trainer.train(&dataset)?;

        println!("\nTraining Results");
        println!("───────────────────────────────");
        println!("  Train:    {}", report.train);
        if report.test.total > 0 {
            println!("  Test:     {}", report.test);
        }
        if let Some(age) = report.median_age {
            println!("  Median age: {:.1}", age);
            if config.features.fallback_age.is_none() {
                println!(
                    "  Set features.fallback_age = {:.1} to use it when a request has no age",
                    age
                );
            }
        }

        model.save(&config.model.path)?;
        println!("\nModel saved to {}", artifact_file(&config.model.path));

        Ok(())
    }

    pub fn read_passengers(path: &str) -> Result<Vec<PassengerRecord>> {
        let content = std::fs::read_to_string(path)?;
        let value: serde_json::Value = serde_json::from_str(&content)?;
        let records = if value.is_array() {
            serde_json::from_value(value)?
        } else {
            vec![serde_json::from_value(value)?]
        };
        Ok(records)
    }

    pub fn predict(config: &Config, records: &[PassengerRecord], format: OutputFormat) -> Result<()> {
        let predictor = Predictor::load(&config.model.path, &config.features)?;

        for record in records {
            let prediction = predictor.predict(record);
            match format {
                OutputFormat::Table => print!("{}", format_prediction(record, &prediction)),
                OutputFormat::Json => println!("{}", serde_json::to_string(&prediction)?),
            }
        }

        Ok(())
    }

    pub fn serve(config: Config, host: Option<String>, port: Option<u16>) -> Result<()> {
        let mut server = config.server.clone();
        if let Some(host) = host {
            server.host = host;
        }
        if let Some(port) = port {
            server.port = port;
        }

        // Fail before binding if the model cannot be loaded
        let predictor = Predictor::load(&config.model.path, &config.features)?;

        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(titanic::api::serve(&server, predictor))
    }

    pub fn model_info(config: &Config) -> Result<()> {
        let model = LinearModel::load(&config.model.path)?;
        let encoder = FeatureEncoder::from_config(&config.features);

        println!("Model Information");
        println!("───────────────────────────────");
        println!("  Path:       {}", artifact_file(&config.model.path));
        for (name, coef) in FeatureRow::from_array(*model.coefficients()).named() {
            println!("  {:<11} {:+.6}", name, coef);
        }
        println!("  {:<11} {:+.6}", "intercept", model.intercept());
        match encoder.fallback_age() {
            Some(age) => println!("  Fallback age: {:.1}", age),
            None => println!("  Fallback age: none (missing age encodes as 0)"),
        }

        Ok(())
    }
}
