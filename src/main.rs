use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use treediff::{diff_trees, render_dot, trees_from_yaml, Tree};

#[derive(Parser, Debug)]
#[command(name = "treediff", about = "Minimum-cost tree diffing over YAML-described trees")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Diff two trees and print the distance and edit script.
    Diff {
        /// YAML file holding the source tree (and the target tree as a
        /// second document, when no target file is given).
        input: PathBuf,
        /// YAML file holding the target tree.
        target: Option<PathBuf>,
        /// Write the diff as a Graphviz dot graph to this path.
        #[arg(long)]
        dot: Option<PathBuf>,
    },
    /// Print the preorder traversal of every tree in a YAML file.
    Show {
        /// YAML file holding one tree per document.
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Diff { input, target, dot } => run_diff(input, target, dot)?,
        Commands::Show { input } => run_show(input)?,
    }

    Ok(())
}

fn run_diff(input: PathBuf, target: Option<PathBuf>, dot: Option<PathBuf>) -> Result<()> {
    let (source_tree, target_tree) = load_tree_pair(&input, target.as_deref())?;
    info!(
        source_size = source_tree.size(),
        target_size = target_tree.size(),
        "diffing trees"
    );

    let report = diff_trees(&source_tree, &target_tree)?;
    println!("distance: {}", report.distance);
    for operation in &report.operations {
        println!("{operation}");
    }

    if let Some(dot_path) = dot {
        let rendered = render_dot(&source_tree, &target_tree, Some(&report.mapping))?;
        fs::write(&dot_path, rendered)
            .with_context(|| format!("failed to write dot graph to {}", dot_path.display()))?;
        println!("dot graph written to {}", dot_path.display());
    }

    Ok(())
}

fn run_show(input: PathBuf) -> Result<()> {
    let trees = load_trees(&input)?;
    if trees.is_empty() {
        bail!("no trees found in {}", input.display());
    }

    for (index, tree) in trees.iter().enumerate() {
        if index > 0 {
            println!();
        }
        print!("{}", tree.render_preorder());
    }

    Ok(())
}

fn load_tree_pair(input: &Path, target: Option<&Path>) -> Result<(Tree, Tree)> {
    match target {
        Some(target_path) => {
            let source_tree = first_tree(load_trees(input)?, input)?;
            let target_tree = first_tree(load_trees(target_path)?, target_path)?;
            Ok((source_tree, target_tree))
        }
        None => {
            let mut trees = load_trees(input)?;
            if trees.len() < 2 {
                bail!(
                    "{} holds {} tree(s); diffing a single file needs two documents",
                    input.display(),
                    trees.len()
                );
            }
            let target_tree = trees.remove(1);
            let source_tree = trees.remove(0);
            Ok((source_tree, target_tree))
        }
    }
}

fn load_trees(path: &Path) -> Result<Vec<Tree>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read trees from {}", path.display()))?;
    let trees = trees_from_yaml(&text)
        .with_context(|| format!("failed to parse trees from {}", path.display()))?;
    Ok(trees)
}

fn first_tree(mut trees: Vec<Tree>, path: &Path) -> Result<Tree> {
    if trees.is_empty() {
        bail!("no trees found in {}", path.display());
    }
    Ok(trees.remove(0))
}
