use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use hyperloop_core::display::{self, RunReport};
use hyperloop_core::{scenarios, systems, Assembly, RunConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hyperloop")]
#[command(about = "Evaluate engineering sizing assemblies")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// List available systems
    List,

    /// Show boundary parameters, calculators and execution order
    Describe {
        system: String,
    },

    /// Run a system once and print its boundary outputs
    Run {
        system: String,

        /// JSON run configuration with boundary-input overrides
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override a boundary input (NAME=VALUE), applied after --config
        #[arg(short, long = "set", value_name = "NAME=VALUE")]
        set: Vec<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Print the audit trace of a parameter (boundary name or calc.param)
        #[arg(long, value_name = "NAME")]
        trace: Vec<String>,
    },

    /// Evaluate a system for several values of one boundary input in parallel
    Sweep {
        system: String,

        /// Boundary input to vary
        #[arg(short, long)]
        param: String,

        /// Comma-separated values
        #[arg(long, value_delimiter = ',', required = true)]
        values: Vec<f64>,

        /// Fixed overrides applied to every point (NAME=VALUE)
        #[arg(short, long = "set", value_name = "NAME=VALUE")]
        set: Vec<String>,

        /// Print the results as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn configure(system: &str) -> Result<Assembly> {
    let Some(blueprint) = systems::by_name(system) else {
        bail!("unknown system '{}' (available: {})", system, systems::NAMES.join(", "));
    };
    Assembly::configure(blueprint.as_ref()).with_context(|| format!("failed to configure '{}'", system))
}

fn load_config(system: &str, path: Option<&PathBuf>, set: &[String]) -> Result<RunConfig> {
    let cfg = match path {
        Some(p) => RunConfig::from_file(p)?,
        None => RunConfig::default(),
    };
    cfg.check_system(system)?;
    Ok(cfg.with_assignments(set)?)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::List => {
            for name in systems::NAMES {
                println!("{}", name);
            }
        }

        Commands::Describe { system } => {
            let asm = configure(&system)?;
            print!("{}", display::describe(&asm));
        }

        Commands::Run { system, config, set, json, trace } => {
            let mut asm = configure(&system)?;
            load_config(&system, config.as_ref(), &set)?.apply(&mut asm)?;
            asm.run().with_context(|| format!("run of '{}' failed", system))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&RunReport::from_assembly(&asm))?);
            } else {
                println!("{} outputs:", asm.name());
                print!("{}", display::format_table(&asm.boundary_outputs()));
            }
            for path in &trace {
                let text = asm.trace(path).with_context(|| format!("no parameter '{}' to trace", path))?;
                println!();
                print!("{}", text);
            }
        }

        Commands::Sweep { system, param, values, set, json } => {
            let mut asm = configure(&system)?;
            load_config(&system, None, &set)?.apply(&mut asm)?;
            if asm.input(&param).is_none() {
                bail!("'{}' is not a boundary input of '{}'", param, system);
            }

            let results = scenarios::sweep(&asm, &param, &values);
            if json {
                let rows: Vec<serde_json::Value> = values
                    .iter()
                    .zip(&results)
                    .map(|(v, r)| match r {
                        Ok(outputs) => serde_json::json!({ "value": v, "outputs": outputs }),
                        Err(e) => serde_json::json!({ "value": v, "error": e.to_string() }),
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                for (v, r) in values.iter().zip(results) {
                    match r {
                        Ok(outputs) => {
                            println!("{} = {}", param, v);
                            print!("{}", display::format_table(&outputs));
                        }
                        Err(e) => println!("{} = {}: error: {}", param, v, e),
                    }
                }
            }
        }
    }
    Ok(())
}
