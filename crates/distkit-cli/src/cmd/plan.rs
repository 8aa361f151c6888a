use crate::output::{print_json, print_table};
use anyhow::Context;
use distkit_core::config::Config;
use distkit_core::pipeline::BuildPipeline;
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load distkit.yaml")?;
    let pipeline = BuildPipeline::new(root, &config)?;

    if json {
        print_json(&pipeline.plan())?;
        return Ok(());
    }

    let rows: Vec<Vec<String>> = pipeline
        .plan()
        .iter()
        .enumerate()
        .map(|(i, step)| {
            vec![
                (i + 1).to_string(),
                step.kind.to_string(),
                step.describe(),
            ]
        })
        .collect();
    print_table(&["#", "STEP", "COMMAND"], rows);
    Ok(())
}
