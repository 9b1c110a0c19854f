//! lang-translator: machine-translate `.lang` resource files into many locales

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use tracing_subscriber::filter::LevelFilter;

use lang_translator::builders::{write_bundle, DirectoryArchive, ZipArchive};
use lang_translator::core::{
    apply_line_ending, check_lang_text, format_output_path, print_error_message,
    print_info_message, read_source, BundleFormat, ToolOptions,
};
use lang_translator::env::{self, core::LogLevel, core::NoColor, EnvVar};
use lang_translator::parsers::LineEnding;
use lang_translator::translation::{
    error::helpers, BatchMode, ConfigManager, LocaleTable, TranslationConfig, TranslationResult,
    TranslationService,
};

#[derive(Parser)]
#[command(name = "lang-translator")]
#[command(version)]
#[command(about = "Machine-translate key=value .lang files into many locales")]
#[command(long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a .lang file into one or more locales
    Translate {
        /// Input .lang file, or '-' for stdin
        #[arg(value_name = "INPUT")]
        input: String,

        /// Target locale (repeat or separate with commas), e.g. de_DE,fr_FR
        #[arg(short, long = "locale", value_name = "LOCALE", value_delimiter = ',')]
        locales: Vec<String>,

        /// Translate into every known locale
        #[arg(short, long)]
        all: bool,

        /// Write a zip archive (supports %name% and %count%)
        #[arg(short, long, value_name = "PATH", conflicts_with = "out_dir")]
        zip: Option<String>,

        /// Write one file per locale into a directory
        #[arg(short, long, value_name = "DIR")]
        out_dir: Option<String>,

        /// File extension for translated files
        #[arg(short, long, value_name = "EXT")]
        ext: Option<String>,

        /// Batch mode: combined or per_item
        #[arg(short, long, value_name = "MODE")]
        mode: Option<BatchMode>,

        /// Configuration file (TOML or JSON)
        #[arg(short, long, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Use CRLF in the output when the input uses CRLF
        #[arg(long)]
        keep_line_endings: bool,

        /// Do not print the preview
        #[arg(short, long)]
        silent: bool,
    },

    /// Parse a .lang file and report what would be translated
    Check {
        /// Input .lang file, or '-' for stdin
        #[arg(value_name = "INPUT")]
        input: String,
    },

    /// List known locales
    Locales {
        /// Configuration file with locale overrides
        #[arg(short, long, value_name = "PATH")]
        config: Option<PathBuf>,
    },

    /// Write an example configuration file
    InitConfig {
        #[arg(value_name = "PATH", default_value = "lang-translator.toml")]
        path: PathBuf,
    },

    /// Print the supported environment variables
    EnvDocs,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Translate {
            input,
            locales,
            all,
            zip,
            out_dir,
            ext,
            mode,
            config,
            keep_line_endings,
            silent,
        } => {
            let output = match (zip, out_dir) {
                (Some(path), _) => BundleFormat::Zip(PathBuf::from(path)),
                (None, Some(dir)) => BundleFormat::Directory(PathBuf::from(dir)),
                (None, None) => BundleFormat::Preview,
            };
            let options = ToolOptions {
                locales,
                all_locales: all,
                output,
                extension: ext,
                keep_line_endings,
                silent,
            };
            run_translate(&input, options, mode, config).await
        }
        Commands::Check { input } => run_check(&input),
        Commands::Locales { config } => run_locales(config),
        Commands::InitConfig { path } => run_init_config(&path),
        Commands::EnvDocs => {
            print!("{}", env::generate_env_docs());
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            helpers::log_error(&e);
            print_error_message(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::from_str(&LogLevel::get_or_default("info".to_string()))
            .unwrap_or(LevelFilter::INFO),
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(!NoColor::get_or_default(false))
        .with_target(false)
        .with_max_level(level)
        .init();
}

fn load_config(path: Option<PathBuf>) -> TranslationResult<TranslationConfig> {
    let manager = match path {
        Some(path) => ConfigManager::from_path(path)?,
        None => ConfigManager::new()?,
    };
    Ok(manager.into_config())
}

async fn run_translate(
    input: &str,
    options: ToolOptions,
    mode: Option<BatchMode>,
    config_path: Option<PathBuf>,
) -> TranslationResult<()> {
    let mut config = load_config(config_path)?;
    if let Some(mode) = mode {
        config.batch_mode = mode;
    }
    if let Some(ext) = &options.extension {
        config.file_extension = ext.clone();
    }

    let source = read_source(input)?;
    let service = TranslationService::create_default(config)?;
    let locales = options.selected_locales(service.locales());

    let mut run = service.translate_locales(&source, &locales).await?;
    if options.keep_line_endings {
        apply_line_ending(&mut run, LineEnding::detect(&source));
    }

    let extension = service.config().extension();
    match &options.output {
        BundleFormat::Preview => {
            if !options.silent {
                print_info_message(&run.preview());
            }
        }
        BundleFormat::Zip(path) => {
            let path = format_output_path(&path.to_string_lossy(), input, run.outputs.len());
            let bytes = write_bundle(&run, ZipArchive::new(), extension, service.locales())?;
            fs::write(&path, bytes)?;
            print_info_message(&format!("Wrote {} locales to {}", run.outputs.len(), path));
        }
        BundleFormat::Directory(dir) => {
            let dir = format_output_path(&dir.to_string_lossy(), input, run.outputs.len());
            let sink = DirectoryArchive::create(&dir)?;
            let written = write_bundle(&run, sink, extension, service.locales())?;
            print_info_message(&format!("Wrote {} files to {}", written.len(), dir));
        }
    }

    tracing::info!("{}", service.get_stats().snapshot());
    Ok(())
}

fn run_check(input: &str) -> TranslationResult<()> {
    let source = read_source(input)?;
    let report = check_lang_text(&source);

    print_info_message(&format!("lines:        {}", report.lines));
    print_info_message(&format!("entries:      {}", report.entries));
    print_info_message(&format!("translatable: {}", report.translatable));
    print_info_message(&format!("raw:          {}", report.raw));
    print_info_message(&format!(
        "line endings: {}",
        match report.line_ending {
            LineEnding::Lf => "LF",
            LineEnding::CrLf => "CRLF",
        }
    ));
    print_info_message(&format!(
        "round trip:   {}",
        if report.round_trip { "exact" } else { "normalized" }
    ));

    if report.entries == 0 {
        return Err(lang_translator::TranslationError::NoEntries);
    }
    Ok(())
}

fn run_init_config(path: &Path) -> TranslationResult<()> {
    if path.exists() {
        return Err(helpers::validation_error(format!(
            "{} already exists",
            path.display()
        )));
    }
    ConfigManager::generate_example_config(path)?;
    print_info_message(&format!("Wrote example configuration to {}", path.display()));
    Ok(())
}

fn run_locales(config_path: Option<PathBuf>) -> TranslationResult<()> {
    let config = match config_path {
        Some(path) => load_config(Some(path))?,
        None => TranslationConfig::default(),
    };
    let table = LocaleTable::with_overrides(&config.locale_overrides);

    for target in table.iter() {
        print_info_message(&format!(
            "{:<8} {:<6} {}",
            target.locale, target.lang_code, target.display_name
        ));
    }
    Ok(())
}
