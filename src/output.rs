use crate::colors::{Colors, Tone};
use crate::diff::Discrepancy;
use crate::inspect::{Document, Skip};
use crate::FileOutcome;
use similar::{ChangeTag, TextDiff};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Normal,
    Quiet,
    Diff,
}

pub struct OutputContext {
    pub mode: OutputMode,
    pub colors: Colors,
    pub verbose: bool,
    pub show_progress: bool,
}

impl OutputContext {
    pub fn new(mode: OutputMode, use_colors: bool, verbose: bool, show_progress: bool) -> Self {
        Self {
            mode,
            colors: Colors::new(use_colors),
            verbose,
            show_progress,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunResult {
    pub files_checked: usize,
    pub files_with_discrepancies: usize,
    pub files_fixed: usize,
    /// Files left with discrepancies that could not be rewritten.
    pub files_unfixable: usize,
    pub files_skipped: usize,
    pub read_failures: usize,
    pub write_failures: usize,
}

impl RunResult {
    pub(crate) fn record(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Clean => self.files_checked += 1,
            FileOutcome::Skipped(_) => self.files_skipped += 1,
            FileOutcome::Discrepancies(_) => {
                self.files_checked += 1;
                self.files_with_discrepancies += 1;
            }
            FileOutcome::Fixed { unfixable, .. } => {
                self.files_checked += 1;
                self.files_fixed += 1;
                if !unfixable.is_empty() {
                    self.files_unfixable += 1;
                }
            }
            FileOutcome::Unfixable(_) => {
                self.files_checked += 1;
                self.files_unfixable += 1;
            }
            FileOutcome::ReadFailed(_) => self.read_failures += 1,
            FileOutcome::WriteFailed(_) => self.write_failures += 1,
        }
    }

    /// Whether the run should exit non-zero: discrepancies when checking,
    /// failed writes when fixing.
    pub fn has_problems(&self, fix: bool) -> bool {
        if fix {
            self.write_failures > 0
        } else {
            self.files_with_discrepancies > 0
        }
    }
}

pub fn print_outcome(path: &Path, outcome: &FileOutcome, ctx: &OutputContext) {
    match outcome {
        FileOutcome::Clean => {
            if ctx.verbose {
                print_checked(path, ctx);
            }
        }
        FileOutcome::Skipped(skip) => {
            if *skip != Skip::Empty || ctx.verbose {
                print_skipped(path, skip, ctx);
            }
        }
        FileOutcome::Discrepancies(found) => print_discrepancies(path, found, ctx),
        FileOutcome::Fixed {
            applied,
            unfixable,
            rewrite,
        } => {
            match (ctx.mode, rewrite) {
                (OutputMode::Quiet, _) => println!("{}", path.display()),
                (OutputMode::Diff, Some(rewrite)) => {
                    print_diff(&path.display().to_string(), &rewrite.before, &rewrite.after)
                }
                _ => {
                    let keys: Vec<&str> = applied.iter().map(|k| k.as_str()).collect();
                    println!(
                        "{} {} ({})",
                        ctx.colors.paint(Tone::Success, "Fixed:"),
                        path.display(),
                        keys.join(", ")
                    );
                }
            }
            print_unfixable(path, unfixable, ctx);
        }
        FileOutcome::Unfixable(found) => print_unfixable(path, found, ctx),
        FileOutcome::ReadFailed(e) => tracing::warn!("{e}"),
        FileOutcome::WriteFailed(e) => {
            eprintln!("{} {e}", ctx.colors.paint(Tone::Error, "Error:"));
        }
    }
}

fn print_discrepancies(path: &Path, found: &[Discrepancy], ctx: &OutputContext) {
    if ctx.mode == OutputMode::Quiet {
        println!("{}", path.display());
        return;
    }

    let label = ctx.colors.paint(Tone::Error, &path.display().to_string());
    for discrepancy in found {
        println!("{label}: {discrepancy}");
    }
}

fn print_unfixable(path: &Path, found: &[Discrepancy], ctx: &OutputContext) {
    if ctx.mode == OutputMode::Quiet {
        return;
    }
    for discrepancy in found {
        println!(
            "{} {}: {discrepancy} (not fixable automatically)",
            ctx.colors.paint(Tone::Warning, "Warning:"),
            path.display()
        );
    }
}

pub fn print_checked(path: &Path, ctx: &OutputContext) {
    if ctx.mode == OutputMode::Quiet {
        return;
    }
    eprintln!(
        "{} {}",
        ctx.colors.paint(Tone::Info, "Checked:"),
        path.display()
    );
}

pub fn print_skipped(path: &Path, reason: &Skip, ctx: &OutputContext) {
    if ctx.mode == OutputMode::Quiet {
        return;
    }
    let label = format!("Skipping {reason}:");
    eprintln!("{} {}", ctx.colors.paint(Tone::Info, &label), path.display());
}

/// Decode file bytes for showing in a diff, falling back to lossy UTF-8.
pub(crate) fn display_text(bytes: &[u8]) -> String {
    Document::decode(bytes)
        .map(|doc| doc.text)
        .unwrap_or_else(|_| String::from_utf8_lossy(bytes).into_owned())
}

pub fn print_diff(label: &str, original: &str, content: &str) {
    let diff = TextDiff::from_lines(original, content);

    println!("--- {label}");
    println!("+++ {label}");

    for (idx, group) in diff.grouped_ops(3).iter().enumerate() {
        if idx > 0 {
            println!();
        }

        for op in group {
            for change in diff.iter_changes(op) {
                let sign = match change.tag() {
                    ChangeTag::Delete => '-',
                    ChangeTag::Insert => '+',
                    ChangeTag::Equal => ' ',
                };
                print!("{sign}{change}");
                if change.missing_newline() {
                    println!();
                }
            }
        }
    }
}

pub fn print_summary(result: &RunResult, fix: bool, ctx: &OutputContext) {
    if ctx.mode == OutputMode::Quiet {
        return;
    }

    if !fix {
        if result.files_with_discrepancies > 0 {
            println!();
            println!(
                "{}",
                ctx.colors.paint(
                    Tone::Error,
                    &format!(
                        "{} of {} files with discrepancies",
                        result.files_with_discrepancies, result.files_checked
                    )
                )
            );
        }
    } else if result.files_fixed > 0 || result.files_unfixable > 0 {
        println!();
        let mut parts = vec![];
        if result.files_fixed > 0 {
            parts.push(ctx.colors.paint(
                Tone::Success,
                &format!("{} files fixed", result.files_fixed),
            ));
        }
        if result.files_unfixable > 0 {
            parts.push(ctx.colors.paint(
                Tone::Warning,
                &format!("{} files need manual fixes", result.files_unfixable),
            ));
        }
        println!("{}", parts.join(", "));
    }
}
