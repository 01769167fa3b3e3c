use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use advmap_core::{
    ImportReport, ImportedData, ProjectConfig, TilesetSlot, load_config, make_report,
    parse_layout, parse_metatiles, parse_palette,
};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use glob::glob;
use log::LevelFilter;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("ADVMAP_BUILD_COMMIT"),
    " ",
    env!("ADVMAP_BUILD_DATE"),
    ")"
);

const EXAMPLES: &str = "Examples:\n  advmap map route101.map -o route101.json\n  advmap bvd tileset.bvd --secondary --stdout\n  advmap palette 00.pal -o palette.json --pretty";

#[derive(Parser, Debug)]
#[command(name = "advmap")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Importer for legacy Advance Map 1.92 project files (.map, .bvd, palettes).",
    long_about = None,
    after_help = EXAMPLES
)]
struct Cli {
    /// Verbose logging (repeat for trace output)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode a .map layout file.
    #[command(alias = "layout")]
    Map {
        /// Path to a .map file
        input: PathBuf,

        /// Project configuration (defaults to ./advmap.toml when present)
        #[arg(long)]
        config: Option<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Decode a .bvd metatile bank.
    #[command(alias = "metatiles")]
    Bvd {
        /// Path to a .bvd file
        input: PathBuf,

        /// Project configuration (defaults to ./advmap.toml when present)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Decode the secondary half of a two-tileset file
        #[arg(long)]
        secondary: bool,

        /// Pad metatiles to 12 tiles regardless of the configuration
        #[arg(long)]
        triple_layer: bool,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Decode a raw palette file.
    Palette {
        /// Path to a palette file
        input: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Output path (JSON)
    #[arg(short = 'o', long, required_unless_present = "stdout")]
    output: Option<PathBuf>,

    /// Write JSON to stdout
    #[arg(long, conflicts_with = "output")]
    stdout: bool,

    /// Pretty-print JSON output
    #[arg(long, conflicts_with = "compact")]
    pretty: bool,

    /// Compact JSON output (default)
    #[arg(long)]
    compact: bool,

    /// Suppress non-error output
    #[arg(long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, is_quiet(&cli.command));

    let result = match cli.command {
        Commands::Map {
            input,
            config,
            output,
        } => cmd_map(input, config, output),
        Commands::Bvd {
            input,
            config,
            secondary,
            triple_layer,
            output,
        } => cmd_bvd(input, config, secondary, triple_layer, output),
        Commands::Palette { input, output } => cmd_palette(input, output),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn is_quiet(command: &Commands) -> bool {
    match command {
        Commands::Map { output, .. }
        | Commands::Bvd { output, .. }
        | Commands::Palette { output, .. } => output.quiet,
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Warn,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .parse_default_env()
        .init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{:#}", err), None)
    }
}

fn cmd_map(input: PathBuf, config: Option<PathBuf>, output: OutputArgs) -> Result<(), CliError> {
    let input = resolve_input_path(&input)?;
    validate_input_file(&input, Some("map"))?;
    let config = load_project_config(config.as_deref())?;

    let layout = parse_layout(&input, &config.registry()).map_err(|err| {
        CliError::new(
            err.to_string(),
            Some("check that the file was exported by Advance Map 1.92".to_string()),
        )
    })?;
    write_report(&input, ImportedData::Map { layout }, &output, "layout")
}

fn cmd_bvd(
    input: PathBuf,
    config: Option<PathBuf>,
    secondary: bool,
    triple_layer: bool,
    output: OutputArgs,
) -> Result<(), CliError> {
    let input = resolve_input_path(&input)?;
    validate_input_file(&input, Some("bvd"))?;
    let config = load_project_config(config.as_deref())?;

    let slot = if secondary {
        TilesetSlot::Secondary
    } else {
        TilesetSlot::Primary
    };
    let mut options = config.metatile_options(slot);
    if triple_layer {
        options = options.with_triple_layer(true);
    }

    let metatiles = parse_metatiles(&input, options).map_err(|err| {
        let hint = match slot {
            TilesetSlot::Primary => "use --secondary for a secondary tileset bank",
            TilesetSlot::Secondary => "check the metatile limits in advmap.toml",
        };
        CliError::new(err.to_string(), Some(hint.to_string()))
    })?;
    write_report(&input, ImportedData::Metatiles { metatiles }, &output, "metatiles")
}

fn cmd_palette(input: PathBuf, output: OutputArgs) -> Result<(), CliError> {
    let input = resolve_input_path(&input)?;
    validate_input_file(&input, None)?;

    let colors = parse_palette(&input).map_err(|err| {
        CliError::new(
            err.to_string(),
            Some("palette files hold 4 bytes per color".to_string()),
        )
    })?;
    write_report(&input, ImportedData::Palette { colors }, &output, "palette")
}

fn load_project_config(path: Option<&Path>) -> Result<ProjectConfig, CliError> {
    load_config(path).map_err(|err| {
        CliError::new(
            err.to_string(),
            Some("see advmap.toml: [project], [limits] and [tilesets]".to_string()),
        )
    })
}

fn write_report(
    input: &Path,
    data: ImportedData,
    output: &OutputArgs,
    what: &str,
) -> Result<(), CliError> {
    let input_abs = fs::canonicalize(input)
        .with_context(|| format!("Failed to resolve input path: {}", input.display()))?;
    let meta = fs::metadata(input)
        .with_context(|| format!("Failed to read input file: {}", input.display()))?;
    let report = make_report(&input.display().to_string(), meta.len(), data);
    let json = serialize_report(&report, output.pretty, output.compact)?;

    if output.stdout {
        print!("{}", json);
        return Ok(());
    }

    let target = output.output.as_ref().ok_or_else(|| {
        CliError::new(
            "missing output path",
            Some("use -o/--output or --stdout".to_string()),
        )
    })?;
    ensure_distinct_output(target, &input_abs)?;

    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    fs::write(target, json)
        .with_context(|| format!("Failed to write output: {}", target.display()))?;

    if !output.quiet {
        eprintln!("OK: {} written -> {}", what, target.display());
    }
    Ok(())
}

fn ensure_distinct_output(target: &Path, input_abs: &Path) -> Result<(), CliError> {
    let parent = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    // A parent that does not exist yet cannot contain the input.
    let Ok(parent_abs) = fs::canonicalize(parent) else {
        return Ok(());
    };
    let file_name = target
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Invalid output path"))?;
    if parent_abs.join(file_name) == input_abs {
        return Err(CliError::new(
            format!("output path must differ from input: {}", target.display()),
            Some("choose a different output path".to_string()),
        ));
    }
    Ok(())
}

fn serialize_report(rep: &ImportReport, pretty: bool, compact: bool) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    if pretty {
        serde_json::to_string_pretty(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn validate_input_file(input: &Path, extension: Option<&str>) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("check the path to the Advance Map file".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("pass a single Advance Map file".to_string()),
        ));
    }
    let Some(expected) = extension else {
        return Ok(());
    };
    let ext = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != expected {
        return Err(CliError::new(
            format!("unsupported input format '{}'", input.display()),
            Some(format!("expected a .{} file", expected)),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern".to_string()),
        ));
    }
    if matches.len() > 1 {
        let listed = matches
            .iter()
            .take(3)
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let more = if matches.len() > 3 { ", ..." } else { "" };
        return Err(CliError::new(
            format!(
                "multiple files match pattern '{}' ({} matches); matches: {}{}",
                pattern,
                matches.len(),
                listed,
                more
            ),
            Some("pass a single file, or run once per file".to_string()),
        ));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
