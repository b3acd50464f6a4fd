mod commands;
mod link;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use common::config::{LoadStyle, LoaderConfig};
use common::err::LResult;
use common::feed::Feed;
use common::log::tracing_factory::TracingFactory;

#[derive(Parser, Debug)]
#[command(name = "keiba-loader")]
#[command(version = "0.1.0")]
#[command(about = "Race-data feed loader: vendor feed into SQL")]
#[command(long_about = None)]
struct CliArgs {
    /// 設定ファイルのパス
    #[arg(short, long, help = "Path to loaded configuration file", value_name = "FILE")]
    config: Option<PathBuf>,

    /// enable debug info
    #[arg(short, long, help = "enable debug mode", default_value_t = false)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Historical backfill over a date range
    Setup {
        #[arg(long, help = "feed: central | regional")]
        feed: Feed,

        #[arg(long, help = "vendor data spec, e.g. RACE, DIFF, YSCH", default_value = "RACE")]
        spec: String,

        #[arg(long, help = "start date, YYYY-MM-DD or YYYYMMDD")]
        from: String,

        #[arg(long, help = "end date; defaults to today")]
        to: Option<String>,

        #[arg(long, help = "rows per batch flush")]
        batch_size: Option<usize>,

        #[arg(long, help = "days per session chunk; feed default otherwise")]
        chunk_days: Option<u32>,

        #[arg(long, help = "run each chunk in a short-lived worker process")]
        isolate: bool,

        #[arg(long, help = "resume state file", value_name = "FILE")]
        resume: Option<PathBuf>,
    },

    /// Live monitor with the local control surface
    Monitor {
        #[arg(long, help = "feed: central | regional")]
        feed: Feed,

        #[arg(long = "spec", help = "real-time data specs", default_values_t = [String::from("0B12"), String::from("0B30")])]
        specs: Vec<String>,

        #[arg(long, help = "polling cadence in seconds")]
        interval: Option<u64>,
    },

    /// Create every destination table
    InitDb,

    /// Run one chunk as a worker process; prints a single JSON result line
    #[command(hide = true)]
    Child {
        #[arg(long)]
        feed: Feed,

        #[arg(long)]
        spec: String,

        #[arg(long, help = "chunk start, YYYYMMDD")]
        date: String,

        #[arg(long, help = "client-side end date, YYYYMMDD")]
        to: String,

        #[arg(long = "skip-file", help = "files a prior attempt already delivered")]
        skip_files: Vec<String>,
    },
}

fn main() {
    let args = CliArgs::parse();
    TracingFactory::init_log(args.debug);

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {}", err);
            std::process::exit(2);
        }
    };

    let code = match run(args, config) {
        Ok(()) => 0,
        Err(err) => {
            tracing::error!("{}", err);
            if let Some(remedy) = err.remedy() {
                eprintln!("error: {}", err);
                eprintln!("remedy: {}", remedy);
            } else {
                eprintln!("error: {}", err);
            }
            1
        }
    };
    std::process::exit(code);
}

fn load_config(args: &CliArgs) -> LResult<LoaderConfig> {
    let mut config = match &args.config {
        Some(path) => LoaderConfig::load(
            path.to_str().unwrap_or_default(),
            LoadStyle::YAML,
        )?,
        None => LoaderConfig::default(),
    };
    config.debug |= args.debug;
    Ok(config)
}

fn run(args: CliArgs, config: LoaderConfig) -> LResult<()> {
    match args.command {
        Commands::Setup {
            feed,
            spec,
            from,
            to,
            batch_size,
            chunk_days,
            isolate,
            resume,
        } => commands::run_setup(
            &config,
            commands::SetupArgs {
                feed,
                spec,
                from,
                to,
                batch_size,
                chunk_days,
                isolate,
                resume,
                config_path: args.config.clone(),
            },
        ),
        Commands::Monitor {
            feed,
            specs,
            interval,
        } => commands::run_monitor(&config, feed, specs, interval),
        Commands::InitDb => commands::run_init_db(&config),
        Commands::Child {
            feed,
            spec,
            date,
            to,
            skip_files,
        } => commands::run_child_worker(&config, feed, spec, date, to, skip_files),
    }
}
