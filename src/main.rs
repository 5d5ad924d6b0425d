// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(non_snake_case)]

use anyhow::{Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info};
use std::io::Write;
use std::path::{Path, PathBuf};

use phonlabel::app_config::{self, Config};
use phonlabel::app_controller::{ConvertOptions, Controller};
use phonlabel::document::STDOUT_SENTINEL;
use phonlabel::label_format::LabelFormat;

/// CLI Wrapper for LabelFormat to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLabelFormat {
    Praat,
    PraatLong,
    PraatShort,
    Wavesurfer,
    Esps,
}

impl From<CliLabelFormat> for LabelFormat {
    fn from(cli_format: CliLabelFormat) -> Self {
        match cli_format {
            CliLabelFormat::Praat => LabelFormat::Praat,
            CliLabelFormat::PraatLong => LabelFormat::PraatLong,
            CliLabelFormat::PraatShort => LabelFormat::PraatShort,
            CliLabelFormat::Wavesurfer => LabelFormat::Wavesurfer,
            CliLabelFormat::Esps => LabelFormat::Esps,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a label file, or every label file in a folder
    Convert(ConvertArgs),

    /// Summarize the tiers of a label file
    Info {
        /// Label file to inspect
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,

        /// Input format (detected when omitted)
        #[arg(long, value_enum)]
        from: Option<CliLabelFormat>,
    },

    /// Generate shell completions for phonlabel
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// Input label file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Output file, output directory for folder input, or STDOUT
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Input format (detected when omitted)
    #[arg(long, value_enum)]
    from: Option<CliLabelFormat>,

    /// Output format
    #[arg(long, value_enum)]
    to: Option<CliLabelFormat>,

    /// Tier index to write (repeatable)
    #[arg(long = "tier", value_name = "INDEX")]
    tiers: Vec<usize>,

    /// Multiply all times by this factor
    #[arg(long)]
    scale: Option<f64>,

    /// Add this amount to all times
    #[arg(long, allow_hyphen_values = true)]
    shift: Option<f64>,

    /// Keep ESPS labels whole instead of splitting them into tiers
    #[arg(long)]
    no_parse_content: bool,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,
}

/// phonlabel - phonetic label file toolkit
///
/// Reads Praat TextGrid, Wavesurfer and ESPS/Xwaves label files and converts
/// between them.
#[derive(Parser, Debug)]
#[command(name = "phonlabel")]
#[command(version)]
#[command(about = "Phonetic label file converter")]
#[command(long_about = "phonlabel reads and converts time-aligned phonetic annotation files.

EXAMPLES:
    phonlabel convert words.TextGrid --to wavesurfer          # Write tier 1 as words.lab
    phonlabel convert words.TextGrid --to esps -o STDOUT      # Print ESPS labels
    phonlabel convert labels/ --to praat-short -o grids/      # Convert a whole folder
    phonlabel convert a.lab --scale 1000 --to esps            # Seconds to milliseconds
    phonlabel info words.TextGrid                             # List tiers
    phonlabel completions bash > phonlabel.bash               # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Tag and ANSI color for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("ERROR", "1;31"),
            Level::Warn => ("WARN ", "1;33"),
            Level::Info => ("INFO ", "1;32"),
            Level::Debug => ("DEBUG", "1;36"),
            Level::Trace => ("TRACE", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (tag, color) = Self::style_for_level(record.level());
            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "\x1B[{}m{} {} {}\x1B[0m", color, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // The logger accepts everything; the effective level is set through max_level
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Some(level) = &cli.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "phonlabel", &mut std::io::stdout());
            Ok(())
        }
        Commands::Info { input_path, from } => {
            let mut config = load_config(&cli.config_path, cli.log_level.is_some())?;
            if let Some(from) = from {
                config.input_format = Some(from.into());
            }
            let controller = Controller::with_config(config)?;
            let summary = controller.describe(&input_path)?;
            print!("{}", summary);
            Ok(())
        }
        Commands::Convert(args) => {
            let config = load_config(&cli.config_path, cli.log_level.is_some())?;
            run_convert(config, args)
        }
    }
}

/// Load the config and apply its log level unless one was given on the command line
fn load_config(config_path: &str, level_from_cli: bool) -> Result<Config> {
    let config = Config::load_or_create(config_path)?;
    if !level_from_cli {
        log::set_max_level(config.log_level.to_level_filter());
    }
    Ok(config)
}

fn run_convert(mut config: Config, args: ConvertArgs) -> Result<()> {
    // Override config with CLI options if provided
    if let Some(from) = args.from {
        config.input_format = Some(from.into());
    }
    if let Some(to) = args.to {
        config.output_format = to.into();
    }
    if args.no_parse_content {
        config.reader.parse_content = false;
    }

    let controller = Controller::with_config(config)?;
    let options = ConvertOptions {
        tiers: args.tiers,
        scale: args.scale,
        shift: args.shift,
        force_overwrite: args.force_overwrite,
    };

    if args.input_path.is_dir() {
        let converted = controller.convert_folder(&args.input_path, args.output.as_deref(), &options)?;
        info!("{} file(s) written", converted);
        return Ok(());
    }

    if !args.input_path.is_file() {
        return Err(anyhow!("Input path does not exist: {:?}", args.input_path));
    }

    let output = match args.output {
        Some(output) if output.as_os_str() == STDOUT_SENTINEL => output,
        Some(output) if output.is_dir() => output_path_in(&controller, &args.input_path, &output),
        Some(output) => output,
        None => {
            let dir = args.input_path.parent().unwrap_or(Path::new(".")).to_path_buf();
            output_path_in(&controller, &args.input_path, &dir)
        }
    };

    controller.convert_file(&args.input_path, &output, &options)?;
    Ok(())
}

fn output_path_in(controller: &Controller, input: &Path, dir: &Path) -> PathBuf {
    phonlabel::file_utils::FileManager::generate_output_path(input, dir, &controller.config().output_extension())
}
