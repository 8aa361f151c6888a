use crate::output::{print_json, print_success_banner, ConsoleReporter};
use anyhow::Context;
use distkit_core::config::Config;
use distkit_core::pipeline::BuildPipeline;
use distkit_core::process::SystemRunner;
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load distkit.yaml")?;
    let pipeline = BuildPipeline::new(root, &config)?;
    let mut reporter = ConsoleReporter::new(json);

    tracing::info!(root = %root.display(), "starting build");
    match pipeline.build(&SystemRunner, &mut reporter) {
        Ok(report) => {
            if json {
                print_json(&report)?;
            } else {
                print_success_banner();
            }
            Ok(())
        }
        Err(failure) => {
            if json {
                print_json(&failure.report())?;
            }
            Err(failure.into())
        }
    }
}
