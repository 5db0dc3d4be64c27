use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::path::{Path, PathBuf};
use truckfit_core::{
    fit_items_in_truck, render_svg, Catalog, Cell, LoadState, PackerError, Quote, SelectedItem,
    TruckSize,
};

#[derive(Parser)]
#[command(name = "truckfit")]
#[command(about = "Moving truck planner - pack furniture into the smallest truck", long_about = None)]
struct Cli {
    /// Catalog file (YAML or JSON) replacing the built-in furniture
    #[arg(short, long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog items
    Catalog,

    /// Replay a packing plan and pick the truck
    Pack {
        /// Plan file (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the report (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Fit a list of catalog ids into one truck size
    Fit {
        /// List of catalog ids (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Truck size: S, M, L or XL
        #[arg(short, long)]
        size: TruckSize,
    },

    /// Generate SVG visualization from a pack report
    Generate {
        /// Input report file (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output SVG file
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// One change to the working load
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
enum PlanStep {
    Add { item: String },
    Remove { index: usize },
    Reset,
}

/// Input: sequence of load changes, replayed in order
#[derive(Debug, Deserialize)]
struct Plan {
    steps: Vec<PlanStep>,
    #[serde(default)]
    distance_km: Option<u32>,
}

/// Output of `pack`
#[derive(Debug, Serialize, Deserialize)]
struct PackReport {
    load: LoadState,
    /// Catalog ids whose add was rolled back
    #[serde(default)]
    rejected: Vec<String>,
    /// Truck suggested by block count alone
    #[serde(default)]
    block_estimate: Option<TruckSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    quote: Option<Quote>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let catalog = load_catalog(cli.catalog.as_deref())?;

    match cli.command {
        Commands::Catalog => catalog_command(&catalog),
        Commands::Pack { input, output } => {
            pack_command(&catalog, input, output)?;
        }
        Commands::Fit { input, size } => {
            fit_command(&catalog, input, size)?;
        }
        Commands::Generate { input, output } => {
            generate_command(input, output)?;
        }
    }

    Ok(())
}

fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    let Some(path) = path else {
        return Ok(Catalog::furniture());
    };

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read catalog {}", path.display()))?;
    let catalog = if is_yaml(path) {
        Catalog::from_yaml(&content)?
    } else {
        Catalog::from_json(&content)?
    };
    Ok(catalog)
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("yaml") | Some("yml")
    )
}

fn read_input<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read {}", path.display()))?;
    let value = if is_yaml(path) {
        serde_yaml::from_str(&content)?
    } else {
        serde_json::from_str(&content)?
    };
    Ok(value)
}

fn catalog_command(catalog: &Catalog) {
    println!("{}", "📦 Catalog:".bright_yellow().bold());
    for item in catalog.items() {
        println!(
            "  • {:<12} {:<32} {:>3} blocks  {}x{}",
            item.id.bright_white(),
            item.name,
            item.blocks,
            item.shape.width(),
            item.shape.height()
        );
    }
}

fn pack_command(catalog: &Catalog, input: PathBuf, output: Option<PathBuf>) -> Result<()> {
    println!("{}", "🔍 Loading plan...".bright_blue());
    let plan: Plan = read_input(&input)?;
    println!(
        "  {} steps to replay",
        plan.steps.len().to_string().bright_white().bold()
    );
    println!();

    println!("{}", "🚚 Packing...".bright_blue());
    let (load, rejected) = replay(catalog, &plan.steps)?;

    let block_estimate = TruckSize::smallest_for_blocks(load.total_blocks());
    let quote = plan.distance_km.map(|distance| load.quote(distance));

    println!();
    println!("{}", "✅ Packing complete!".bright_green().bold());
    println!();
    println!("{}", "📊 Results:".bright_yellow().bold());
    println!(
        "  Truck: {} ({}x{})",
        load.truck_size.to_string().bright_white().bold(),
        load.truck_size.dimension(),
        load.truck_size.dimension()
    );
    println!("  Items: {}", load.items.len());
    println!("  Blocks: {}", load.total_blocks());
    match block_estimate {
        Some(size) if size != load.truck_size => println!(
            "  Block estimate: {} (shapes need {})",
            size.to_string().bright_cyan(),
            load.truck_size
        ),
        Some(size) => println!("  Block estimate: {}", size.to_string().bright_cyan()),
        None => println!("  Block estimate: {}", "over XL".bright_red()),
    }
    if let Some(quote) = &quote {
        println!(
            "  Price: {} base + {} for {} km = {}",
            quote.base_price,
            quote.distance_price,
            quote.distance_km,
            quote.total_price.to_string().bright_green().bold()
        );
    }
    println!();
    print_floor(&load);
    println!();

    let report = PackReport {
        load,
        rejected,
        block_estimate,
        quote,
    };
    let json = serde_json::to_string_pretty(&report)?;
    if let Some(output_path) = output {
        std::fs::write(&output_path, json)?;
        println!(
            "💾 Saved report to {}",
            output_path.display().to_string().bright_white()
        );
    } else {
        println!("{}", json);
    }

    Ok(())
}

/// Applies `steps` to an empty load. A rejected add is recorded and skipped;
/// any other error stops the replay.
fn replay(catalog: &Catalog, steps: &[PlanStep]) -> Result<(LoadState, Vec<String>)> {
    let mut load = LoadState::new();
    let mut rejected = Vec::new();

    for step in steps {
        match step {
            PlanStep::Add { item } => {
                let catalog_item = catalog.require(item)?;
                match load.add_item(catalog_item) {
                    Ok(next) => {
                        load = next;
                        println!("  + {:<12} → truck {}", item, load.truck_size);
                    }
                    Err(err @ PackerError::CapacityExceeded { .. }) => {
                        println!("  {} {}", "✗".bright_red(), err.to_string().bright_red());
                        rejected.push(item.clone());
                    }
                    Err(err) => return Err(err.into()),
                }
            }
            PlanStep::Remove { index } => {
                load = load.remove_item(*index)?;
                println!("  - #{:<11} → truck {}", index, load.truck_size);
            }
            PlanStep::Reset => {
                load = load.reset();
                println!("  ⟲ reset      → truck {}", load.truck_size);
            }
        }
    }

    Ok((load, rejected))
}

fn fit_command(catalog: &Catalog, input: PathBuf, size: TruckSize) -> Result<()> {
    let ids: Vec<String> = read_input(&input)?;
    let items = ids
        .iter()
        .enumerate()
        .map(|(i, id)| Ok(SelectedItem::new(catalog.require(id)?, i as u32)))
        .collect::<Result<Vec<_>>>()?;

    println!(
        "{} {} items into truck {}",
        "🚚 Fitting".bright_blue(),
        items.len(),
        size
    );
    let result = fit_items_in_truck(&items, size);

    if result.success {
        println!("{}", "✅ Everything fits".bright_green().bold());
        for placed in &result.placements {
            if let Some(position) = placed.position {
                println!(
                    "  • {:<16} at ({}, {})",
                    placed.instance_id.bright_white(),
                    position.x,
                    position.y
                );
            }
        }
    } else {
        println!("{}", "✗ Does not fit".bright_red().bold());
    }

    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}

fn generate_command(input: PathBuf, output: PathBuf) -> Result<()> {
    println!("{}", "🔍 Loading report...".bright_blue());

    let content = std::fs::read_to_string(&input)?;
    let report: PackReport = serde_json::from_str(&content)?;

    println!("{}", "🎨 Generating SVG...".bright_blue());
    let svg = render_svg(&report.load)?;
    std::fs::write(&output, svg)?;

    println!();
    println!(
        "{} Saved SVG to {}",
        "✅".bright_green(),
        output.display().to_string().bright_white()
    );

    Ok(())
}

/// Prints the floor as a character map, one letter per item.
fn print_floor(load: &LoadState) {
    let grid = load.grid();
    let letter = |id: &str| {
        load.items
            .iter()
            .position(|selected| selected.instance_id == id)
            .and_then(|index| char::from_digit((index % 36) as u32, 36))
            .unwrap_or('?')
    };

    for y in 0..grid.dimension() {
        let row: String = (0..grid.dimension())
            .map(|x| match grid.cell(x, y) {
                Some(Cell::Occupied(id)) => letter(id.as_str()),
                _ => '.',
            })
            .collect();
        println!("  {}", row);
    }
}
