use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use distkit_core::config::{Config, WarnLevel};
use distkit_core::{io, paths};
use std::path::Path;

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Write a distkit.yaml holding the default toolchain
    Init {
        /// Overwrite an existing distkit.yaml
        #[arg(long)]
        force: bool,
    },

    /// Print the effective config (defaults merged with distkit.yaml)
    Show {
        /// Output as JSON instead of YAML
        #[arg(long, short = 'j')]
        json: bool,
    },

    /// Validate the config for common mistakes
    Validate {
        /// Output as JSON
        #[arg(long, short = 'j')]
        json: bool,
    },
}

pub fn run(root: &Path, subcmd: ConfigSubcommand) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Init { force } => init(root, force),
        ConfigSubcommand::Show { json } => show(root, json),
        ConfigSubcommand::Validate { json } => validate(root, json),
    }
}

fn init(root: &Path, force: bool) -> anyhow::Result<()> {
    let path = paths::config_path(root);
    let data = default_config_yaml(&Config::default())?;

    let written = if force {
        io::atomic_write(&path, data.as_bytes())?;
        true
    } else {
        io::write_if_missing(&path, data.as_bytes())?
    };

    if written {
        println!("Wrote {}", path.display());
    } else {
        println!("{} already exists (use --force to overwrite)", path.display());
    }
    Ok(())
}

fn default_config_yaml(config: &Config) -> anyhow::Result<String> {
    let mut out = String::from("# distkit build configuration\n");
    out.push_str(&config.to_yaml()?);
    Ok(out)
}

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load distkit.yaml")?;
    if json {
        print_json(&config)?;
    } else {
        print!("{}", config.to_yaml()?);
    }
    Ok(())
}

fn validate(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load distkit.yaml")?;
    let warnings = config.validate();

    if json {
        print_json(&warnings)?;
    } else if warnings.is_empty() {
        println!("Config OK");
    } else {
        for w in &warnings {
            let tag = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("{tag}: {}", w.message);
        }
    }

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("config has errors");
    }
    Ok(())
}
