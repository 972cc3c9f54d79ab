use std::{
    fs,
    path::{Path, PathBuf},
    time::Instant,
};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use arcsolve::{
    error::Result,
    generators,
    reader::CspDocument,
    solver::{
        consistency::Propagation,
        engine::{Solver, SolverConfig},
        heuristics::{value::ValueOrdering, variable::VariableOrdering},
        stats::render_stats_table,
    },
};

#[derive(Debug, Parser)]
#[command(name = "arcsolve", about = "A binary CSP solver", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Solve a .csp instance file.
    Solve {
        /// Path to the .csp instance.
        instance: PathBuf,
        /// How many solutions to find; 0 finds all of them.
        #[arg(long, default_value_t = 0)]
        solutions: u64,
        #[arg(long, value_enum, default_value = "maintaining-arc-consistency")]
        propagation: Propagation,
        #[arg(long, value_enum, default_value = "ascending")]
        var_order: VariableOrdering,
        #[arg(long, value_enum, default_value = "ascending")]
        val_order: ValueOrdering,
        /// Emit the report as JSON instead of plain text.
        #[arg(long)]
        json: bool,
        /// Render the solve counters as a table.
        #[arg(long)]
        stats: bool,
    },
    /// Generate a benchmark instance in the .csp format.
    Generate {
        #[command(subcommand)]
        family: Family,
    },
}

#[derive(Debug, Subcommand)]
enum Family {
    /// N-Queens with one variable per row.
    Queens {
        n: usize,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Langford pairings: k sets of the numbers 1..=n.
    Langford {
        k: usize,
        n: usize,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// A blank 9x9 Sudoku grid.
    Sudoku {
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(error) = run(Cli::parse()) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Solve {
            instance,
            solutions,
            propagation,
            var_order,
            val_order,
            json,
            stats,
        } => {
            let config = SolverConfig {
                solutions_to_find: solutions,
                variable_ordering: var_order,
                value_ordering: val_order,
                propagation,
            };
            solve(&instance, config, json, stats)
        }
        Command::Generate { family } => {
            let (document, name) = match family {
                Family::Queens { n, output } => {
                    (generators::queens::n_queens(n), output.unwrap_or_else(|| format!("{n}queens.csp").into()))
                }
                Family::Langford { k, n, output } => (
                    generators::langford::langford(k, n),
                    output.unwrap_or_else(|| format!("langford{k}_{n}.csp").into()),
                ),
                Family::Sudoku { output } => (
                    generators::sudoku::blank_sudoku(),
                    output.unwrap_or_else(|| "blank_sudoku.csp".into()),
                ),
            };
            fs::write(&name, document.to_csp())?;
            println!("Wrote {}", name.display());
            Ok(())
        }
    }
}

fn solve(path: &Path, config: SolverConfig, json: bool, stats: bool) -> Result<()> {
    let instance = CspDocument::from_path(path)?.build()?;
    let start = Instant::now();
    let report = Solver::new(config).solve(instance);
    let elapsed = start.elapsed();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).expect("report serialises")
        );
        return Ok(());
    }

    for solution in &report.solutions {
        let values: Vec<String> = solution.iter().map(i64::to_string).collect();
        println!("{}", values.join(" "));
    }
    if report.solutions.is_empty() {
        println!("Failed to find a solution!");
    } else {
        println!("Found {} solutions!", report.stats.solutions_found);
    }
    println!("Explored {} nodes!", report.stats.nodes_explored);
    println!("Performed {} arc revisions!", report.stats.revisions_done);
    println!("Time taken: {}ms", elapsed.as_millis());

    if stats {
        println!("{}", render_stats_table(&report.stats, elapsed));
    }
    Ok(())
}
