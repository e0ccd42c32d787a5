//! Command line front end for the Aurora MDL codec.
//!
//! Thin wrapper over the library: summarize a model file, rewrite it in
//! canonical form, or compare two files field by field.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use aurora_mdl::{read_mdl, write_mdl, Model};

#[derive(Parser)]
#[command(name = "auroramdl")]
#[command(about = "Inspect, rewrite and compare Aurora MDL model files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display information about a model file
    Info {
        /// Path to the .mdl file
        file: PathBuf,
        /// Emit the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Parse a model and write it back in canonical form
    Roundtrip {
        /// Input .mdl file
        input: PathBuf,
        /// Output .mdl file
        output: PathBuf,
    },
    /// Compare two model files field by field
    Compare {
        /// Left .mdl file
        left: PathBuf,
        /// Right .mdl file
        right: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Info { file, json } => info(&file, json),
        Commands::Roundtrip { input, output } => roundtrip(&input, &output),
        Commands::Compare { left, right } => compare(&left, &right),
    }
}

fn read(path: &Path) -> Result<Model> {
    read_mdl(path).with_context(|| format!("reading {}", path.display()))
}

#[derive(Serialize)]
struct ModelSummary {
    name: String,
    supermodel: String,
    classification: &'static str,
    animationscale: Option<f64>,
    nodes: Vec<NodeSummary>,
    animations: Vec<AnimationSummary>,
}

#[derive(Serialize)]
struct NodeSummary {
    kind: String,
    name: String,
    parent: Option<String>,
}

#[derive(Serialize)]
struct AnimationSummary {
    name: String,
    length: f64,
    events: usize,
    nodes: usize,
}

fn summarize(model: &Model) -> ModelSummary {
    ModelSummary {
        name: model.name.clone(),
        supermodel: model.supermodel.clone(),
        classification: model.classification.token(),
        animationscale: model.animationscale,
        nodes: model
            .geometry
            .nodes
            .iter()
            .map(|node| NodeSummary {
                kind: node.kind.token().to_owned(),
                name: node.name.clone(),
                parent: node.parent().map(str::to_owned),
            })
            .collect(),
        animations: model
            .animations
            .iter()
            .map(|anim| AnimationSummary {
                name: anim.name.clone(),
                length: anim.length,
                events: anim.events.len(),
                nodes: anim.nodes.len(),
            })
            .collect(),
    }
}

fn info(path: &Path, json: bool) -> Result<()> {
    let model = read(path)?;
    let summary = summarize(&model);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("model:          {}", summary.name);
    println!("supermodel:     {}", summary.supermodel);
    println!("classification: {}", summary.classification);
    if let Some(scale) = summary.animationscale {
        println!("animationscale: {scale}");
    }
    println!("nodes:          {}", summary.nodes.len());
    for node in &summary.nodes {
        let parent = node.parent.as_deref().unwrap_or("-");
        println!("  {:<12} {:<24} parent {}", node.kind, node.name, parent);
    }
    println!("animations:     {}", summary.animations.len());
    for anim in &summary.animations {
        println!(
            "  {:<24} length {:<8} {} event(s), {} node(s)",
            anim.name, anim.length, anim.events, anim.nodes
        );
    }
    Ok(())
}

fn roundtrip(input: &Path, output: &Path) -> Result<()> {
    let model = read(input)?;
    write_mdl(&model, output).with_context(|| format!("writing {}", output.display()))?;
    println!(
        "wrote {} ({} node(s), {} animation(s))",
        output.display(),
        model.geometry.nodes.len(),
        model.animations.len()
    );
    Ok(())
}

fn compare(left: &Path, right: &Path) -> Result<()> {
    let left_model = read(left)?;
    let right_model = read(right)?;
    let diffs = left_model.diff(&right_model);
    if diffs.is_empty() {
        println!("models are field-for-field equivalent");
        return Ok(());
    }
    for diff in &diffs {
        println!("{diff}");
    }
    bail!("{} difference(s)", diffs.len());
}
