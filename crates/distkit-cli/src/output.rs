use clap::ValueEnum;
use colored::Colorize;
use distkit_core::pipeline::PipelineObserver;
use distkit_core::step::Step;
use distkit_core::DistkitError;
use serde::Serialize;
use std::io::IsTerminal;
use std::time::Duration;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    // Calculate column widths
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.len());
            }
        }
    }

    let header_row: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{:width$}", h, width = widths[i]))
        .collect();
    println!("{}", header_row.join("  "));

    let sep: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    println!("{}", sep.join("  "));

    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let w = widths.get(i).copied().unwrap_or(0);
                format!("{:width$}", cell, width = w)
            })
            .collect();
        println!("{}", cells.join("  ").trim_end());
    }
}

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

/// Apply the color choice globally. `auto` honours `NO_COLOR` and colors
/// only when both stdout and stderr are terminals.
pub fn configure_color(choice: ColorChoice) {
    let enabled = color_enabled(
        choice,
        std::env::var_os("NO_COLOR").is_some(),
        std::io::stdout().is_terminal(),
        std::io::stderr().is_terminal(),
    );
    colored::control::set_override(enabled);
}

fn color_enabled(choice: ColorChoice, no_color: bool, stdout_tty: bool, stderr_tty: bool) -> bool {
    match choice {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => !no_color && stdout_tty && stderr_tty,
    }
}

// ---------------------------------------------------------------------------
// Build console
// ---------------------------------------------------------------------------

pub fn print_task(label: &str) {
    println!("{} {}", "[task]".green().bold(), label.white().bold());
}

pub fn print_success_banner() {
    let rule = "-------------------------------------------------------------";
    for line in [
        rule,
        ">>",
        ">> Build Successfully",
        ">> Remember To Re-install In Our Projects, And Notify Others",
        ">>",
        rule,
    ] {
        println!("{}", line.yellow().bold());
    }
}

/// Prints a `[task]` line as each step starts and the failure details when
/// one stops the build.
pub struct ConsoleReporter {
    quiet: bool,
}

impl ConsoleReporter {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl PipelineObserver for ConsoleReporter {
    fn step_started(&mut self, step: &Step) {
        if !self.quiet {
            print_task(step.kind.label());
        }
    }

    fn step_finished(&mut self, step: &Step, elapsed: Duration) {
        tracing::debug!(step = %step.kind, elapsed_ms = elapsed.as_millis() as u64, "step ok");
    }

    fn step_failed(&mut self, step: &Step, error: &DistkitError) {
        match error {
            DistkitError::StepFailed {
                message,
                command,
                code,
                ..
            } => {
                eprintln!("{}", message.red().bold());
                let code = code.map_or_else(|| "signal".to_string(), |c| c.to_string());
                eprintln!("non-zero exit code returned, code={code}, command={command}");
            }
            other => {
                eprintln!("{}", step.failure_message.red().bold());
                eprintln!("{other}");
            }
        }
    }
}
