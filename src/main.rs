use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};

use cinetime::config::{self, CinetimeConfig};
use cinetime::ingest::FsSource;
use cinetime::output::{self, json as json_out, table, ExportFormat};
use cinetime::session::Session;

#[derive(Parser)]
#[command(name = "cinetime", version, about = "Cutscene timing extractor — parse frame-timed dialogue scripts, summarize and export them")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Path to config file (default: ~/.cinetime/config.toml)
    #[arg(long, global = true, env = "CINETIME_CONFIG")]
    config: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// List record files found under the given paths
    Scan {
        /// Files, directories or glob patterns
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Parse record files and print their statistics
    Analyze {
        /// Files, directories or glob patterns
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Show the timing table of one record file
    Show {
        /// Record file
        file: PathBuf,

        /// Hide pause entries
        #[arg(long)]
        dialogue_only: bool,
    },

    /// Export parsed records
    Export {
        /// Files, directories or glob patterns
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Output format (default: from config, or the output file extension)
        #[arg(long, short, value_enum)]
        format: Option<ExportFormat>,

        /// Write to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Manage the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a default config file if none exists
    Init,
    /// Print the effective configuration
    Show,
    /// Print the config file location
    Path,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let json_output = cli.json;
    let config_file = match cli.config {
        Some(p) => p,
        None => config::config_path()?,
    };

    match cli.command {
        Commands::Scan { paths } => {
            let session = open_session(&config_file)?;
            let files = session.discover(&paths)?;
            if json_output {
                json_out::print_json(&serde_json::json!({
                    "total": files.len(),
                    "files": files,
                }))?;
            } else {
                table::print_file_list(&files);
            }
        }

        Commands::Analyze { paths } => {
            let session = open_session(&config_file)?;
            let batch = session.run(&paths)?;
            if json_output {
                json_out::print_json(&json_out::ExportDocument::new(&batch))?;
            } else {
                for set in batch.record_sets() {
                    table::print_statistics(set, &session.config.patterns);
                }
                table::print_failures(batch.failures());
                table::print_summary(&batch.summary());
            }
            if batch.record_sets().is_empty() {
                bail!("No record files could be processed");
            }
        }

        Commands::Show {
            file,
            dialogue_only,
        } => {
            let session = open_session(&config_file)?;
            let batch = session.process(std::slice::from_ref(&file));
            if let Some(err) = batch.failures().first() {
                bail!("{err}");
            }
            let set = batch
                .record_sets()
                .first()
                .with_context(|| format!("Record file not loaded: {}", file.display()))?;

            if json_output {
                json_out::print_json(&json_out::FileExport::new(set))?;
            } else {
                table::print_entries(set, dialogue_only);
                if !set.errors().is_empty() {
                    eprintln!("{} malformed line(s):", set.errors().len());
                    for e in set.errors() {
                        eprintln!("  {e}");
                    }
                }
            }
        }

        Commands::Export {
            paths,
            format,
            output: out_path,
        } => {
            let session = open_session(&config_file)?;
            let format = format
                .or_else(|| out_path.as_deref().and_then(ExportFormat::detect_from_extension))
                .unwrap_or(session.config.export.format);

            let batch = session.run(&paths)?;
            table::print_failures(batch.failures());
            if batch.record_sets().is_empty() {
                bail!("No record files could be processed");
            }

            match out_path {
                Some(path) => {
                    let file = std::fs::File::create(&path)
                        .with_context(|| format!("Failed to create: {}", path.display()))?;
                    let mut writer = std::io::BufWriter::new(file);
                    output::write_export(format, &batch, &session.config, &mut writer)?;
                    eprintln!(
                        "Exported {} file{} to {}",
                        batch.record_sets().len(),
                        if batch.record_sets().len() == 1 { "" } else { "s" },
                        path.display()
                    );
                }
                None => {
                    let stdout = std::io::stdout();
                    let mut lock = stdout.lock();
                    output::write_export(format, &batch, &session.config, &mut lock)?;
                    lock.flush()?;
                }
            }
        }

        Commands::Config { action } => run_config(&action, &config_file, json_output)?,
    }

    Ok(())
}

fn open_session(config_file: &Path) -> Result<Session> {
    let config = CinetimeConfig::load(Some(config_file))?;
    let source = FsSource::new(&config.discovery.extensions);
    Ok(Session::new(config, Box::new(source)))
}

fn run_config(action: &ConfigAction, path: &Path, json_output: bool) -> Result<()> {
    match action {
        ConfigAction::Init => {
            if config::init_config(path)? {
                println!("Created {}", path.display());
            } else {
                println!("Config already exists: {}", path.display());
            }
        }
        ConfigAction::Show => {
            let cfg = CinetimeConfig::load(Some(path))?;
            if json_output {
                json_out::print_json(&cfg)?;
            } else {
                print!("{}", cfg.to_toml()?);
            }
        }
        ConfigAction::Path => println!("{}", path.display()),
    }
    Ok(())
}
