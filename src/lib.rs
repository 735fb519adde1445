pub mod atomic;
pub mod colors;
pub mod diff;
pub mod editorconfig;
pub mod fix;
pub mod infer;
pub mod inspect;
mod output;
pub mod policy;
pub mod progress;
pub mod settings;
pub mod walker;

pub use atomic::{atomic_write, WriteError};
pub use colors::{should_use_colors, Colors};
pub use diff::{diff, Discrepancy};
pub use editorconfig::{
    effective_style, find_editorconfig, load_editorconfig, parse, relative_path, serialize,
    CompiledConfig, EditorConfig, EditorConfigError, Key, Properties,
};
pub use fix::{fix, Fix};
pub use infer::infer;
pub use inspect::{observe, ObservedStyle, Skip};
pub use output::{print_diff, OutputContext, OutputMode, RunResult};
pub use policy::Policy;
pub use progress::ProgressReporter;
pub use settings::{
    find_settings_file, generate_init_file, load_settings, merge_settings, CliSettings, Settings,
    SettingsError, SettingsToml,
};
pub use walker::{walk_paths, WalkError};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use thiserror::Error;

/// An `.editorconfig` together with the directory its globs are relative to.
#[derive(Debug, Clone)]
pub struct Rules {
    pub base_dir: PathBuf,
    sections: CompiledConfig,
}

impl Rules {
    pub fn load(path: &Path) -> Result<Self, EditorConfigError> {
        let config = load_editorconfig(path)?;
        let base_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        Ok(Self {
            base_dir,
            sections: CompiledConfig::new(config),
        })
    }

    pub fn style_for(&self, path: &Path) -> Properties {
        self.sections
            .effective_style(&relative_path(&self.base_dir, path))
    }
}

pub struct RunConfig {
    /// Rewrite non-conforming files instead of only reporting them.
    pub fix: bool,
    /// Keep before/after text of rewritten files for printing a diff.
    pub show_diff: bool,
    pub settings: Settings,
}

#[derive(Debug, Error)]
#[error("failed to read {}: {source}", path.display())]
pub struct ReadError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// What happened to one file during a run.
#[derive(Debug)]
pub enum FileOutcome {
    /// Conforms to its effective style.
    Clean,
    Skipped(Skip),
    /// Check mode: the file does not conform.
    Discrepancies(Vec<Discrepancy>),
    /// Fix mode: the file was rewritten.
    Fixed {
        applied: Vec<Key>,
        /// Discrepancies the rewrite could not remove.
        unfixable: Vec<Discrepancy>,
        /// Only kept when the run shows diffs.
        rewrite: Option<Rewrite>,
    },
    /// Fix mode: nothing could be rewritten, but discrepancies remain.
    Unfixable(Vec<Discrepancy>),
    ReadFailed(ReadError),
    WriteFailed(WriteError),
}

/// Decoded text of a file before and after fixing.
#[derive(Debug)]
pub struct Rewrite {
    pub before: String,
    pub after: String,
}

/// Main entry point: check or fix all files in given paths.
///
/// Files are processed in parallel and reported in walk order. Fails before
/// touching any file when a path argument matches nothing.
pub fn run(
    paths: &[String],
    rules: &Rules,
    config: &RunConfig,
    ctx: &OutputContext,
) -> Result<RunResult, WalkError> {
    let files = walk_paths(paths, config.settings.hidden)?;
    let progress = ProgressReporter::new(files.len() as u64, ctx.show_progress);

    let outcomes: Vec<FileOutcome> = files
        .par_iter()
        .map(|path| {
            let outcome = process_file(path, rules, config);
            progress.tick(path);
            outcome
        })
        .collect();

    progress.finish();

    let mut result = RunResult::default();
    for (path, outcome) in files.iter().zip(&outcomes) {
        output::print_outcome(path, outcome, ctx);
        result.record(outcome);
    }

    output::print_summary(&result, config.fix, ctx);

    Ok(result)
}

/// Check or fix a single file against its effective style.
pub fn process_file(path: &Path, rules: &Rules, config: &RunConfig) -> FileOutcome {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(source) => {
            return FileOutcome::ReadFailed(ReadError {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    if bytes.is_empty() {
        return FileOutcome::Skipped(Skip::Empty);
    }

    let expected = rules.style_for(path);
    let policy = &config.settings.policy;

    if !config.fix {
        return match observe(&bytes, policy) {
            Ok(observed) => {
                let found = diff(&expected, &observed, policy);
                if found.is_empty() {
                    FileOutcome::Clean
                } else {
                    FileOutcome::Discrepancies(found)
                }
            }
            Err(skip) => FileOutcome::Skipped(skip),
        };
    }

    let fixed = match fix(&bytes, &expected, policy) {
        Ok(fixed) => fixed,
        Err(skip) => return FileOutcome::Skipped(skip),
    };

    if !fixed.has_changes() {
        return if fixed.unfixable.is_empty() {
            FileOutcome::Clean
        } else {
            FileOutcome::Unfixable(fixed.unfixable)
        };
    }

    let Fix {
        content,
        applied,
        unfixable,
    } = fixed;
    match atomic_write(path, &content) {
        Ok(()) => {
            tracing::debug!("rewrote {}", path.display());
            let rewrite = config.show_diff.then(|| Rewrite {
                before: output::display_text(&bytes),
                after: output::display_text(&content),
            });
            FileOutcome::Fixed {
                applied,
                unfixable,
                rewrite,
            }
        }
        Err(e) => FileOutcome::WriteFailed(e),
    }
}

/// Observe every file under `paths` and infer a config from them.
///
/// Paths are recorded relative to `base_dir`. Files that cannot be read or
/// inspected are reported and left out.
pub fn generate(
    paths: &[String],
    base_dir: &Path,
    settings: &Settings,
    ctx: &OutputContext,
) -> Result<EditorConfig, WalkError> {
    let files = walk_paths(paths, settings.hidden)?;
    let progress = ProgressReporter::new(files.len() as u64, ctx.show_progress);

    let observed: Vec<Result<ObservedStyle, FileOutcome>> = files
        .par_iter()
        .map(|path| {
            let result = observe_file(path, &settings.policy);
            progress.tick(path);
            result
        })
        .collect();

    progress.finish();

    let mut styles = Vec::with_capacity(files.len());
    for (path, result) in files.iter().zip(observed) {
        match result {
            Ok(style) => styles.push((relative_path(base_dir, path), style)),
            Err(outcome) => output::print_outcome(path, &outcome, ctx),
        }
    }

    tracing::debug!("inferring from {} files", styles.len());
    Ok(infer(&styles, &settings.policy))
}

fn observe_file(path: &Path, policy: &Policy) -> Result<ObservedStyle, FileOutcome> {
    let bytes = fs::read(path).map_err(|source| {
        FileOutcome::ReadFailed(ReadError {
            path: path.to_path_buf(),
            source,
        })
    })?;
    if bytes.is_empty() {
        return Err(FileOutcome::Skipped(Skip::Empty));
    }
    observe(&bytes, policy).map_err(FileOutcome::Skipped)
}
