use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use reel_stitch::{
    cards::ColorScheme,
    config::Config,
    links::extract_links,
    shell::{default_download_folder, MergeParams, Shell, Status},
};

#[derive(Parser)]
#[command(
    name = "reel-stitch",
    version,
    about = "Download short vertical videos and stitch them into one reel",
    long_about = "reel-stitch downloads Instagram reels from a list of links and merges a folder of clips into a single 720x1280 video, with a numbered transition card before every clip and a closing card at the end."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Configuration file (optional)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Also write the log to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Directory holding cookies.txt, ding.wav and the temporary card images
    #[arg(short, long, global = true, default_value = ".")]
    work_dir: PathBuf,
}

#[derive(Subcommand)]
enum Command {
    /// Print the links found in a text or link file
    Extract {
        /// Link file path or raw text
        input: String,
    },

    /// List the videos of a folder in merge order
    List {
        folder: PathBuf,
    },

    /// Download every link found in the input
    Download(DownloadArgs),

    /// Merge the videos of a folder into one reel
    Merge(MergeArgs),

    /// Download, then merge the download folder
    Run {
        #[command(flatten)]
        download: DownloadArgs,

        #[command(flatten)]
        merge: MergeOptions,
    },

    /// Write the default configuration as TOML
    PrintConfig {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct DownloadArgs {
    /// Link file path or raw text
    input: String,

    /// Download folder (defaults to the link file name without extension)
    #[arg(short, long)]
    folder: Option<PathBuf>,

    /// Download in random order
    #[arg(long)]
    shuffle: bool,
}

#[derive(Args)]
struct MergeArgs {
    /// Folder containing the clips
    input_dir: PathBuf,

    #[command(flatten)]
    options: MergeOptions,
}

#[derive(Args)]
struct MergeOptions {
    /// Output file (defaults to <MM-DD>_merged.mp4 in the input folder)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Title shown on the first card
    #[arg(short, long)]
    title: Option<String>,

    /// Author shown as @author under the first card
    #[arg(short, long)]
    author: Option<String>,

    /// Comma separated clip names in the order to merge
    #[arg(long, value_delimiter = ',', conflicts_with = "first")]
    order: Option<Vec<String>>,

    /// Clip that opens the reel; the rest keep name order
    #[arg(long)]
    first: Option<String>,

    /// Card colour scheme
    #[arg(long, value_enum)]
    scheme: Option<ColorScheme>,
}

impl MergeOptions {
    fn into_params(self, input_dir: PathBuf) -> MergeParams {
        MergeParams {
            input_dir,
            order: self.order,
            first: self.first,
            output: self.output,
            title: self.title,
            author: self.author,
            color_scheme: self.scheme,
        }
    }
}

fn init_logging(verbose: bool, log_file: Option<&PathBuf>) -> Result<()> {
    let log_level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();

    let file_layer = match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            Some(fmt::layer().with_ansi(false).with_writer(std::sync::Mutex::new(file)))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(file_layer)
        .init();
    Ok(())
}

fn report(status: Status) -> ExitCode {
    if status.success {
        println!("✅ {}", status);
        ExitCode::SUCCESS
    } else {
        eprintln!("❌ {}", status);
        ExitCode::FAILURE
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_file.as_ref())?;

    info!("Starting reel-stitch v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = match &cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(config_path).map_err(|e| anyhow::anyhow!(e.user_message()))?
        }
        None => Config::default(),
    };

    let shell = Shell::new(config, cli.work_dir.clone());

    let code = match cli.command {
        Command::Extract { input } => {
            let links = extract_links(&input);
            for link in &links {
                println!("{}", link);
            }
            if links.is_empty() {
                eprintln!("No links found");
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Command::List { folder } => match shell.list_videos(&folder) {
            Ok(files) => {
                for (index, file) in files.iter().enumerate() {
                    println!("{:3}. {}", index + 1, file.display());
                }
                ExitCode::SUCCESS
            }
            Err(e) => report(Status::failed(e.user_message())),
        },
        Command::Download(args) => {
            let status = shell
                .download_only(&args.input, args.folder.as_deref(), args.shuffle)
                .await;
            report(status)
        }
        Command::Merge(args) => {
            let params = args.options.into_params(args.input_dir);
            report(shell.merge_only(&params).await)
        }
        Command::Run { download, merge } => {
            let folder = download
                .folder
                .clone()
                .unwrap_or_else(|| default_download_folder(&download.input));
            let params = merge.into_params(folder);
            report(shell.download_and_merge(&download.input, download.shuffle, &params).await)
        }
        Command::PrintConfig { output } => {
            let config = shell.config();
            match output {
                Some(path) => {
                    config.save_to_file(&path).map_err(|e| anyhow::anyhow!(e.user_message()))?;
                    println!("Configuration written to {}", path.display());
                }
                None => print!("{}", config.to_toml().map_err(|e| anyhow::anyhow!(e.user_message()))?),
            }
            ExitCode::SUCCESS
        }
    };

    Ok(code)
}
