//! Forgetool - validate, compile, and simulate structure builds

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use glam::IVec3;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use builder::{
    BuildService, BuildSettings, MemoryWorld, ProgressSink, RequesterId, TaskOutcome,
};
use structure::{
    compile, compute_anchor, detect_entrance_wall, rotate_structure, rotation_count, validate,
    BoundingBox, BuiltinCatalog, Facing, Structure,
};
use voxelforge_llm::GeneratorClient;

#[derive(Parser)]
#[command(name = "forgetool")]
#[command(about = "Validate, compile, and simulate voxel structure builds", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a structure description against the configured limits
    Validate {
        /// Structure description JSON file
        file: PathBuf,
    },
    /// Compile a structure and print placement statistics
    Compile {
        /// Structure description JSON file
        file: PathBuf,

        /// Requester position as "x,y,z"
        #[arg(long, default_value = "0,64,0")]
        position: String,

        /// Requester facing (north/south/east/west)
        #[arg(long, default_value = "north")]
        facing: String,
    },
    /// Simulate a full build against an in-memory world
    Build {
        /// Structure description JSON file
        file: PathBuf,

        /// Requester position as "x,y,z"
        #[arg(long, default_value = "0,64,0")]
        position: String,

        /// Requester facing (north/south/east/west)
        #[arg(long, default_value = "north")]
        facing: String,

        /// Replay the undo snapshot after the build finishes
        #[arg(long)]
        undo: bool,

        /// Placements applied per simulated tick
        #[arg(long)]
        blocks_per_tick: Option<usize>,
    },
    /// Generate a structure description from a text prompt
    Generate {
        /// What to build
        description: String,

        /// Requester facing hint for the entrance
        #[arg(long, default_value = "north")]
        facing: String,

        /// Output file for the structure JSON
        #[arg(short, long, default_value = "structure.json")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { file } => cmd_validate(&file),
        Commands::Compile {
            file,
            position,
            facing,
        } => cmd_compile(&file, &position, &facing),
        Commands::Build {
            file,
            position,
            facing,
            undo,
            blocks_per_tick,
        } => cmd_build(&file, &position, &facing, undo, blocks_per_tick),
        Commands::Generate {
            description,
            facing,
            output,
        } => cmd_generate(&description, &facing, &output).await,
    }
}

fn load_structure(file: &PathBuf) -> Result<Structure> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid structure in {}", file.display()))
}

fn parse_position(s: &str) -> Result<IVec3> {
    let parts: Vec<i32> = s
        .split(',')
        .map(|p| p.trim().parse())
        .collect::<std::result::Result<_, _>>()
        .with_context(|| format!("invalid position '{s}', expected x,y,z"))?;
    if parts.len() != 3 {
        bail!("invalid position '{s}', expected 3 components");
    }
    Ok(IVec3::new(parts[0], parts[1], parts[2]))
}

fn parse_facing(s: &str) -> Result<Facing> {
    match Facing::parse(s) {
        Some(f) if f.is_horizontal() => Ok(f),
        Some(_) => bail!("facing must be horizontal (north/south/east/west)"),
        None => bail!("unknown facing '{s}'"),
    }
}

fn cmd_validate(file: &PathBuf) -> Result<()> {
    let structure = load_structure(file)?;
    let settings = BuildSettings::load();
    let catalog = BuiltinCatalog::default();

    let report = validate(&structure, &settings.limits(), &catalog);
    if report.has_issues() {
        println!("{}", report.report());
        std::process::exit(1);
    }

    let bbox = BoundingBox::of(&structure);
    println!(
        "OK: {} regions, {} overrides, bounds {}x{}x{}",
        structure.regions.len(),
        structure.overrides.len(),
        bbox.width(),
        bbox.max.y - bbox.min.y + 1,
        bbox.depth(),
    );
    Ok(())
}

/// Runs the orientation pipeline and compiles to a placement list.
fn prepare(file: &PathBuf, position: &str, facing: &str) -> Result<Vec<structure::Placement>> {
    let mut structure = load_structure(file)?;
    let requester = parse_position(position)?;
    let requester_facing = parse_facing(facing)?;
    let settings = BuildSettings::load();
    let catalog = BuiltinCatalog::default();

    let report = validate(&structure, &settings.limits(), &catalog);
    if report.has_issues() {
        bail!("structure failed validation:\n{}", report.report());
    }

    if let Some(entrance) = detect_entrance_wall(&structure, &catalog) {
        let times = rotation_count(entrance, requester_facing);
        println!("Entrance wall: {}, rotating {}x90 degrees", entrance.name(), times);
        rotate_structure(&mut structure, times);
    } else {
        println!("No entrance detected, keeping original orientation");
    }

    let bbox = BoundingBox::of(&structure);
    let anchor = compute_anchor(requester, requester_facing, &bbox);
    println!("Anchor: {},{},{}", anchor.x, anchor.y, anchor.z);

    Ok(compile(anchor, &structure, &catalog, &settings.limits()))
}

fn cmd_compile(file: &PathBuf, position: &str, facing: &str) -> Result<()> {
    let placements = prepare(file, position, facing)?;

    let mut bands: BTreeMap<u8, usize> = BTreeMap::new();
    for p in &placements {
        *bands.entry(p.state.class.band()).or_default() += 1;
    }

    println!("Placements: {}", placements.len());
    for (band, count) in bands {
        let label = match band {
            0 => "structural",
            1 => "clearing",
            2 => "multi-part",
            _ => "decoration",
        };
        println!("  band {band} ({label}): {count}");
    }
    Ok(())
}

/// Progress sink rendering an indicatif bar
struct BarSink {
    bar: ProgressBar,
}

impl BarSink {
    fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{bar:40.cyan/blue} {percent}% {pos}/{len} {msg}")
                .unwrap(),
        );
        Self { bar }
    }
}

impl ProgressSink for BarSink {
    fn progress(&mut self, _: &RequesterId, _: u8, cursor: usize, _: usize, is_undo: bool) {
        self.bar.set_position(cursor as u64);
        self.bar
            .set_message(if is_undo { "restoring" } else { "building" });
    }

    fn completed(&mut self, _: &RequesterId, outcome: TaskOutcome) {
        match outcome {
            TaskOutcome::Built {
                placed,
                failed_writes,
            } => {
                self.bar
                    .finish_with_message(format!("built {placed} ({failed_writes} failed)"));
            }
            TaskOutcome::Restored {
                restored,
                failed_writes,
            } => {
                self.bar
                    .finish_with_message(format!("restored {restored} ({failed_writes} failed)"));
            }
        }
    }
}

fn cmd_build(
    file: &PathBuf,
    position: &str,
    facing: &str,
    undo: bool,
    blocks_per_tick: Option<usize>,
) -> Result<()> {
    let placements = prepare(file, position, facing)?;
    let settings = BuildSettings::load();
    let budget = blocks_per_tick.unwrap_or(settings.blocks_per_tick);

    let mut world = MemoryWorld::new();
    let mut service = BuildService::new(&settings);
    let requester = RequesterId::from("forgetool");

    let total = service.start_build(requester.clone(), placements)?;
    println!("Building {total} placements, {budget} per tick");

    let mut sink = BarSink::new(total);
    while service.has_active(&requester) {
        service.tick(&mut world, budget, &mut sink);
    }
    println!("World cells occupied: {}", world.occupied());

    if undo {
        let total = service.start_undo(requester.clone())?;
        let mut sink = BarSink::new(total);
        while service.has_active(&requester) {
            service.tick(&mut world, budget, &mut sink);
        }
        println!("World cells occupied after undo: {}", world.occupied());
    }

    Ok(())
}

async fn cmd_generate(description: &str, facing: &str, output: &PathBuf) -> Result<()> {
    let requester_facing = parse_facing(facing)?;
    let settings = BuildSettings::load();
    if settings.api_key.is_empty() {
        bail!("no API key configured, set api_key in the settings file");
    }

    let client = GeneratorClient::new(&settings.api_key, &settings.model)
        .with_timeout(Duration::from_secs(settings.timeout_seconds))
        .with_max_retries(settings.max_retries);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));

    spinner.set_message("Planning blueprint...");
    let blueprint = client
        .generate_plan(description, requester_facing.name())
        .await?;

    spinner.set_message("Generating structure...");
    let structure = client
        .generate_structure(&blueprint, settings.max_blocks)
        .await?;
    spinner.finish_with_message("Generation complete");

    let json = serde_json::to_string_pretty(&structure)?;
    std::fs::write(output, json)
        .with_context(|| format!("failed to write {}", output.display()))?;
    println!(
        "Wrote {} regions, {} overrides to {}",
        structure.regions.len(),
        structure.overrides.len(),
        output.display(),
    );
    Ok(())
}
