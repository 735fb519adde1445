use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use ectools::{
    find_editorconfig, find_settings_file, generate, generate_init_file, load_settings,
    merge_settings, run, serialize, should_use_colors, CliSettings, OutputContext, OutputMode,
    Rules, RunConfig, SettingsToml,
};
use tracing_subscriber::EnvFilter;

const EXIT_PROBLEMS: u8 = 1;
const EXIT_FATAL: u8 = 2;

#[derive(Parser)]
#[command(name = "ectools")]
#[command(
    version,
    about = "Check files against .editorconfig, fix them, or infer a config from them"
)]
struct Cli {
    /// Target files or directories
    #[arg(required_unless_present = "init")]
    paths: Vec<String>,

    /// Rewrite files that do not conform
    #[arg(long, conflicts_with = "generate")]
    fix: bool,

    /// Print an .editorconfig inferred from the given files
    #[arg(long, visible_alias = "infer")]
    generate: bool,

    /// Generate a template ectools.toml settings file
    #[arg(long)]
    init: bool,

    /// Path to the .editorconfig to use (overrides auto-discovery)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Path to ectools.toml (overrides auto-discovery)
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// Show fixes in diff format
    #[arg(short, long)]
    diff: bool,

    /// Output only file names
    #[arg(short, long)]
    quiet: bool,

    /// Also report clean and skipped files, and log debug details
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Force colored output
    #[arg(long)]
    color: bool,

    /// Disable colored output
    #[arg(long, conflicts_with = "color")]
    no_color: bool,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,

    /// Number of worker threads (default: one per CPU)
    #[arg(short, long, value_name = "N")]
    jobs: Option<usize>,

    /// Tab stop used when .editorconfig does not give one
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    tab_width: Option<u32>,

    /// Include hidden files and directories
    #[arg(long)]
    hidden: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    // Handle --init command
    if cli.init {
        return handle_init();
    }

    if let Some(jobs) = cli.jobs {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
        {
            tracing::warn!("could not configure {jobs} worker threads: {e}");
        }
    }

    let toml_settings = match load_configuration(cli.settings.as_deref()) {
        Ok(settings) => settings,
        Err(code) => return code,
    };

    // Merge settings: CLI > TOML > defaults
    let cli_settings = CliSettings {
        tab_width: cli.tab_width,
        hidden: cli.hidden.then_some(true),
    };
    let settings = merge_settings(&cli_settings, toml_settings.as_ref());

    let output_mode = if cli.quiet {
        OutputMode::Quiet
    } else if cli.diff {
        OutputMode::Diff
    } else {
        OutputMode::Normal
    };
    let ctx = OutputContext::new(
        output_mode,
        should_use_colors(cli.color, cli.no_color),
        cli.verbose,
        !cli.no_progress && !cli.quiet,
    );

    if cli.generate {
        let base_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        return match generate(&cli.paths, &base_dir, &settings, &ctx) {
            Ok(config) => {
                print!("{}", serialize(&config));
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {e}");
                ExitCode::from(EXIT_FATAL)
            }
        };
    }

    let rules = match load_rules(cli.config.as_deref()) {
        Ok(rules) => rules,
        Err(code) => return code,
    };

    let config = RunConfig {
        fix: cli.fix,
        show_diff: output_mode == OutputMode::Diff,
        settings,
    };
    let result = match run(&cli.paths, &rules, &config, &ctx) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(EXIT_FATAL);
        }
    };

    if result.has_problems(config.fix) {
        ExitCode::from(EXIT_PROBLEMS)
    } else {
        ExitCode::SUCCESS
    }
}

/// Log to stderr. `RUST_LOG` wins over `-v`/`-q`.
fn init_tracing(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "ectools=debug"
    } else if quiet {
        "ectools=error"
    } else {
        "ectools=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn handle_init() -> ExitCode {
    match generate_init_file() {
        Ok(path) => {
            println!("Created {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(EXIT_PROBLEMS)
        }
    }
}

/// Load ectools.toml. A file named with `--settings` must load; a discovered
/// one that fails is only warned about.
fn load_configuration(explicit_path: Option<&Path>) -> Result<Option<SettingsToml>, ExitCode> {
    if let Some(path) = explicit_path {
        return match load_settings(path) {
            Ok(settings) => Ok(Some(settings)),
            Err(e) => {
                eprintln!("Error: {}: {e}", path.display());
                Err(ExitCode::from(EXIT_FATAL))
            }
        };
    }

    let discovered = std::env::current_dir()
        .ok()
        .and_then(|d| find_settings_file(&d));

    Ok(discovered.and_then(|p| match load_settings(&p) {
        Ok(settings) => {
            tracing::debug!("using settings from {}", p.display());
            Some(settings)
        }
        Err(e) => {
            tracing::warn!("ignoring {}: {e}", p.display());
            None
        }
    }))
}

fn load_rules(explicit_path: Option<&Path>) -> Result<Rules, ExitCode> {
    let path = explicit_path.map(Path::to_path_buf).or_else(|| {
        std::env::current_dir()
            .ok()
            .and_then(|d| find_editorconfig(&d))
    });

    let Some(path) = path else {
        eprintln!("Error: no .editorconfig found (use --config PATH or --generate)");
        return Err(ExitCode::from(EXIT_FATAL));
    };

    match Rules::load(&path) {
        Ok(rules) => {
            tracing::debug!("using rules from {}", path.display());
            Ok(rules)
        }
        Err(e) => {
            eprintln!("Error: {e}");
            Err(ExitCode::from(EXIT_FATAL))
        }
    }
}
