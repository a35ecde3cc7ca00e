//! Main CLI application for the laser maze planner

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use laser_sat_planner::{
    config::{BeamMode, CliOverrides, Settings},
    planning::{find_shortest_plan, PlannerOptions, PlanningProblem, Solution, SolveOutcome},
    sat::EngineVerdict,
    utils::{ColorOutput, PlanFormatter},
    world::{create_example_levels, load_world_from_file, World, WorldView},
};
use std::path::PathBuf;
use std::time::Instant;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "laser_sat_planner")]
#[command(about = "Laser Maze SAT Planner")]
#[command(version = "0.1.0")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a level
    Solve {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Level file (overrides config)
        #[arg(short, long)]
        level: Option<PathBuf>,

        /// Number of time steps (overrides config)
        #[arg(short = 't', long)]
        horizon: Option<usize>,

        /// Search horizons up to this bound and keep the shortest plan
        #[arg(short, long)]
        max_horizon: Option<usize>,

        /// How lasers light the grid (overrides config)
        #[arg(short, long, value_enum)]
        beam_mode: Option<BeamModeArg>,

        /// Output directory (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Show the world at every time step
        #[arg(long)]
        show_steps: bool,

        /// Print every variable of the satisfying assignment
        #[arg(long)]
        explain: bool,
    },

    /// Print a level and the size of its encoding without solving
    Analyze {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Level file
        #[arg(short, long)]
        level: PathBuf,

        /// Number of time steps (overrides config)
        #[arg(short = 't', long)]
        horizon: Option<usize>,
    },

    /// Create example configuration and level files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum BeamModeArg {
    SourceOnly,
    Propagate,
}

impl From<BeamModeArg> for BeamMode {
    fn from(arg: BeamModeArg) -> Self {
        match arg {
            BeamModeArg::SourceOnly => BeamMode::SourceOnly,
            BeamModeArg::Propagate => BeamMode::Propagate,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Commands::Solve {
            config,
            level,
            horizon,
            max_horizon,
            beam_mode,
            output,
            show_steps,
            explain,
        } => {
            let overrides = CliOverrides {
                horizon,
                max_horizon,
                beam_mode: beam_mode.map(BeamMode::from),
                level_file: level,
                output_dir: output,
            };
            solve_command(config, overrides, show_steps, explain)
        }
        Commands::Analyze { config, level, horizon } => analyze_command(config, level, horizon),
        Commands::Setup { directory, force } => setup_command(directory, force),
    }
}

fn init_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to install log subscriber")
}

fn load_settings(config_path: &PathBuf) -> Result<Settings> {
    if config_path.exists() {
        Settings::from_file(config_path).with_context(|| format!("Failed to load config from {}", config_path.display()))
    } else {
        println!(
            "{}",
            ColorOutput::warning(&format!("Config file {} not found, using defaults", config_path.display()))
        );
        Ok(Settings::default())
    }
}

fn solve_command(config_path: PathBuf, overrides: CliOverrides, show_steps: bool, explain: bool) -> Result<()> {
    println!("{}", ColorOutput::info("🔄 Starting Laser Maze SAT Planner"));

    let mut settings = load_settings(&config_path)?;
    settings.merge_with_cli(&overrides);
    settings.validate().context("Configuration validation failed")?;

    let world = load_world_from_file(&settings.input.level_file)
        .with_context(|| format!("Failed to load level from {}", settings.input.level_file.display()))?;
    println!("{}", PlanFormatter::format_world_with_coords(&world));

    let options = PlannerOptions::from(&settings);
    let start_time = Instant::now();

    println!("{}", ColorOutput::info("🧮 Generating SAT constraints and solving..."));
    let outcome = match settings.planning.max_horizon {
        Some(max_horizon) => {
            if explain || settings.output.save_dimacs {
                println!(
                    "{}",
                    ColorOutput::warning("--explain and save_dimacs only apply to a fixed horizon, ignoring them")
                );
            }
            find_shortest_plan(&world, max_horizon, &options).context("Shortest-horizon search failed")?
        }
        None => solve_fixed_horizon(&world, &settings, options, explain)?,
    };
    let total_time = start_time.elapsed();

    let solution = match outcome {
        SolveOutcome::Solved(solution) => solution,
        SolveOutcome::Unsatisfiable => {
            println!("{}", ColorOutput::warning("❌ No plan exists within the horizon"));
            return Ok(());
        }
        SolveOutcome::Unknown => {
            println!("{}", ColorOutput::warning("⏱️  Solver timed out without a verdict"));
            return Ok(());
        }
    };

    println!(
        "{}",
        ColorOutput::success(&format!(
            "✅ Found a plan with horizon {} in {:.3}s",
            solution.horizon,
            total_time.as_secs_f64()
        ))
    );
    println!("{}", PlanFormatter::format_solution(&solution, &world, show_steps));

    save_outputs(&solution, &world, &settings)?;
    Ok(())
}

/// Solve at the configured horizon, keeping the problem around for
/// DIMACS output and model explanation
fn solve_fixed_horizon(world: &World, settings: &Settings, options: PlannerOptions, explain: bool) -> Result<SolveOutcome> {
    let mut problem = PlanningProblem::new(world, settings.planning.horizon, options)
        .context("Failed to create planning problem")?;

    if settings.output.save_dimacs {
        let path = PlanFormatter::save_dimacs(
            &problem.to_dimacs(),
            &settings.output.output_directory,
            settings.planning.horizon,
        )?;
        println!("DIMACS written to {}", path.display());
    }

    let verdict = problem.check().context("SAT engine failed")?;
    if explain {
        if let EngineVerdict::Satisfiable(model) = &verdict {
            println!("\n{}", ColorOutput::info("Satisfying assignment:"));
            for line in problem.explain(model).context("Failed to explain model")? {
                println!("  {}", line);
            }
            println!();
        }
    }

    problem.outcome(verdict).context("Failed to solve planning problem")
}

fn save_outputs(solution: &Solution, world: &World, settings: &Settings) -> Result<()> {
    println!("\n{}", ColorOutput::info("💾 Saving plan..."));
    let path = PlanFormatter::save_solution(
        solution,
        world,
        &settings.output.output_directory,
        settings.output.format,
    )
    .context("Failed to save plan")?;
    println!("{}", ColorOutput::success(&format!("Plan saved to {}", path.display())));
    Ok(())
}

fn analyze_command(config_path: PathBuf, level_path: PathBuf, horizon: Option<usize>) -> Result<()> {
    println!("{}", ColorOutput::info("🔬 Analyzing level..."));

    let settings = load_settings(&config_path)?;
    let horizon = horizon.unwrap_or(settings.planning.horizon);

    let world = load_world_from_file(&level_path)
        .with_context(|| format!("Failed to load level from {}", level_path.display()))?;

    println!("Level ({}x{}):", world.height, world.width);
    println!("{}", PlanFormatter::format_world_with_coords(&world));

    println!("Level Statistics:");
    println!("  Agents: {}", world.agents().len());
    println!("  Lasers: {}", world.lasers().len());
    println!("  Walls: {}", world.walls().len());
    println!("  Exits: {}", world.exits().len());

    let mut problem = PlanningProblem::new(&world, horizon, PlannerOptions::from(&settings))
        .context("Failed to create problem for analysis")?;
    println!("\n{}", problem.statistics());
    println!("{}", problem.pool().statistics());

    Ok(())
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("🛠️  Setting up project structure..."));

    let config_dir = directory.join("config");
    let levels_dir = directory.join("levels");
    let output_dir = directory.join("output/plans");

    for dir in [&config_dir, &levels_dir, &output_dir] {
        std::fs::create_dir_all(dir).with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        Settings::default()
            .to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    create_example_levels(&levels_dir).context("Failed to create example levels")?;
    println!("Created example levels in: {}", levels_dir.display());

    let examples_dir = config_dir.join("examples");
    std::fs::create_dir_all(&examples_dir)?;

    let mut shortest = Settings::default();
    shortest.planning.horizon = 0;
    shortest.planning.max_horizon = Some(12);
    shortest.input.level_file = PathBuf::from("levels/corridor.txt");
    shortest.to_file(&examples_dir.join("shortest.yaml"))?;

    let mut propagate = Settings::default();
    propagate.planning.horizon = 8;
    propagate.encoding.beam_mode = BeamMode::Propagate;
    propagate.solver.timeout_seconds = Some(60);
    propagate.input.level_file = PathBuf::from("levels/laser_detour.txt");
    propagate.output.format = laser_sat_planner::config::OutputFormat::Json;
    propagate.to_file(&examples_dir.join("propagate.yaml"))?;

    println!("Created example configurations in: {}", examples_dir.display());

    println!("\n{}", ColorOutput::success("✅ Setup complete!"));
    println!("\nNext steps:");
    println!("1. Edit configuration files in {}", config_dir.display());
    println!("2. Add your levels to {}", levels_dir.display());
    println!("3. Run: cargo run -- solve --config config/default.yaml");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "laser_sat_planner",
            "solve",
            "--config",
            "test.yaml",
            "--horizon",
            "5",
            "--beam-mode",
            "propagate",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Solve { horizon, beam_mode, .. } => {
                assert_eq!(horizon, Some(5));
                assert!(matches!(beam_mode, Some(BeamModeArg::Propagate)));
            }
            _ => panic!("expected the solve command"),
        }
    }

    #[test]
    fn test_analyze_requires_level() {
        assert!(Cli::try_parse_from(["laser_sat_planner", "analyze"]).is_err());
    }

    #[test]
    fn test_setup_command() {
        let temp_dir = tempdir().unwrap();
        let result = setup_command(temp_dir.path().to_path_buf(), false);

        assert!(result.is_ok());
        assert!(temp_dir.path().join("config/default.yaml").exists());
        assert!(temp_dir.path().join("levels/corridor.txt").exists());
        let shortest = Settings::from_file(&temp_dir.path().join("config/examples/shortest.yaml")).unwrap();
        assert_eq!(shortest.planning.max_horizon, Some(12));
    }

    #[test]
    fn test_analyze_command() {
        let temp_dir = tempdir().unwrap();
        let level = temp_dir.path().join("level.txt");
        std::fs::write(&level, "S0 L1E\n. X\n").unwrap();

        let result = analyze_command(temp_dir.path().join("missing.yaml"), level, Some(2));
        assert!(result.is_ok());
    }
}
