mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use distkit_core::pipeline::PipelineFailure;
use distkit_core::DistkitError;
use output::ColorChoice;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "distkit",
    about = "Check, test, lint, compile and stage a library for distribution",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from distkit.yaml, package.json or .git/)
    #[arg(long, global = true, env = "DISTKIT_ROOT")]
    root: Option<PathBuf>,

    /// When to color console output
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,

    /// Defaults to `build`
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline: cleanup, style check, test, lint, compile, distribute
    Build {
        /// Print the run report as JSON instead of task lines
        #[arg(long, short = 'j')]
        json: bool,
    },

    /// List the pipeline steps and the commands they run
    Plan {
        /// Output as JSON
        #[arg(long, short = 'j')]
        json: bool,
    },

    /// Create, show and validate distkit.yaml
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Copy a value to the system clipboard
    Copy {
        value: String,

        /// Don't report what was copied
        #[arg(long, short = 'q')]
        quiet: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    output::configure_color(cli.color);

    let root = root::resolve_root(cli.root.as_deref());

    let command = cli.command.unwrap_or(Commands::Build { json: false });
    let result = match command {
        Commands::Build { json } => cmd::build::run(&root, json),
        Commands::Plan { json } => cmd::plan::run(&root, json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand),
        Commands::Copy { value, quiet } => cmd::copy::run(&value, quiet),
    };

    if let Err(e) = result {
        // Step failures were already reported by the console reporter.
        if let Some(failure) = e.downcast_ref::<PipelineFailure>() {
            std::process::exit(failure.exit_code());
        }
        eprintln!("error: {e:#}");
        let code = e
            .downcast_ref::<DistkitError>()
            .map(DistkitError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}
