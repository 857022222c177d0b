use std::{
    fs,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use clap::{Parser, ValueEnum};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};
use vestigium::{
    board::Board,
    error::{Error, Result},
    solver::{
        engine::{SearchEngine, SolveOutcome, DEFAULT_BUDGET},
        heuristics::{value::ValueOrder, variable::VariableSelector},
        propagation::ConsistencyCheck,
        stats::{render_report_table, BatchReport, BoardReport},
    },
};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum SelectArg {
    /// First unassigned cell in grid order.
    #[default]
    First,
    /// Smallest remaining domain.
    Mrv,
    /// Smallest remaining domain, most-constrained tie-break.
    Mad,
    /// Tournament extension point (disabled).
    Tourn,
}

impl From<SelectArg> for VariableSelector {
    fn from(arg: SelectArg) -> Self {
        match arg {
            SelectArg::First => VariableSelector::FirstUnassigned,
            SelectArg::Mrv => VariableSelector::MinimumRemainingValues,
            SelectArg::Mad => VariableSelector::MrvDegree,
            SelectArg::Tourn => VariableSelector::Tournament,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OrderArg {
    /// Ascending values.
    #[default]
    Natural,
    /// Least-constraining value first.
    Lcv,
    /// Tournament extension point (disabled).
    Tourn,
}

impl From<OrderArg> for ValueOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Natural => ValueOrder::Natural,
            OrderArg::Lcv => ValueOrder::LeastConstraining,
            OrderArg::Tourn => ValueOrder::Tournament,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum CheckArg {
    /// Scan all constraints, no propagation.
    #[default]
    None,
    /// Forward checking.
    Fc,
    /// Forward checking plus hidden singles.
    Nor,
    /// Tournament extension point (disabled).
    Tourn,
}

impl From<CheckArg> for ConsistencyCheck {
    fn from(arg: CheckArg) -> Self {
        match arg {
            CheckArg::None => ConsistencyCheck::None,
            CheckArg::Fc => ConsistencyCheck::ForwardChecking,
            CheckArg::Nor => ConsistencyCheck::Norvig,
            CheckArg::Tourn => ConsistencyCheck::Tournament,
        }
    }
}

/// A trail-based backtracking solver for generalized Sudoku puzzles.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Board file, or a directory of board files. Omit to generate a random
    /// board and solve that.
    path: Option<PathBuf>,

    /// Variable-selection heuristic.
    #[arg(long, value_enum, default_value_t = SelectArg::First)]
    select: SelectArg,

    /// Value-ordering heuristic.
    #[arg(long, value_enum, default_value_t = OrderArg::Natural)]
    order: OrderArg,

    /// Consistency check run after each assignment.
    #[arg(long, value_enum, default_value_t = CheckArg::None)]
    check: CheckArg,

    /// Per-board time budget in seconds.
    #[arg(long, default_value_t = DEFAULT_BUDGET.as_secs())]
    budget: u64,

    /// Seed for board generation.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of givens on a generated board.
    #[arg(long, default_value_t = 7)]
    givens: usize,

    /// Emit reports as JSON instead of tables.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy)]
struct SolveConfig {
    selector: VariableSelector,
    order: ValueOrder,
    check: ConsistencyCheck,
    budget: Duration,
}

impl SolveConfig {
    fn from_args(args: &Args) -> Self {
        Self {
            selector: args.select.into(),
            order: args.order.into(),
            check: args.check.into(),
            budget: Duration::from_secs(args.budget),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();
    let config = SolveConfig::from_args(&args);

    match &args.path {
        None => solve_generated(&args, config),
        Some(path) if path.is_dir() => solve_directory(path, config, args.json),
        Some(path) => solve_file(path, config, args.json),
    }
}

fn solve_generated(args: &Args, config: SolveConfig) -> Result<()> {
    let mut rng = match args.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let board = Board::generate(3, 3, args.givens, &mut rng)?;

    println!("Generated board ({} givens):", board.given_count());
    println!("{}", board);
    solve_and_print("generated", board, config, args.json)
}

fn solve_file(path: &Path, config: SolveConfig, json: bool) -> Result<()> {
    let board = Board::load(path)?;
    let name = board_name(path);

    println!("Solving {}:", name);
    println!("{}", board);
    solve_and_print(&name, board, config, json)
}

fn solve_directory(dir: &Path, config: SolveConfig, json: bool) -> Result<()> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|source| Error::Io {
            path: dir.to_path_buf(),
            source,
        })?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect();
    entries.sort();

    let mut batch = BatchReport::new();
    for path in entries {
        if !path.is_file() || is_hidden(&path) {
            continue;
        }
        let board = match Board::load(&path) {
            Ok(board) => board,
            Err(error) => {
                warn!(%error, "skipping {}", path.display());
                continue;
            }
        };

        let (_, report) = solve_board(&board_name(&path), board, config);
        println!(
            "{}: {} in {:.3}s ({} pushes, {} backtracks)",
            report.name,
            report.outcome_label(),
            report.elapsed_secs,
            report.pushes,
            report.backtracks,
        );
        batch.record(report);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&batch)?);
        return Ok(());
    }

    println!();
    println!("{}", render_report_table(&batch));
    println!("Number of Boards: {}", batch.board_count());
    println!("Solutions Found: {}", batch.solved_count());
    println!("Timed Out: {}", batch.timed_out_count());
    println!("Trail Pushes: {}", batch.total_pushes());
    println!("Backtracks: {}", batch.total_backtracks());
    println!("Total time: {:.3}s", batch.total_time_secs());
    if let Some(average) = batch.average_time_secs() {
        println!("Average time: {:.3}s", average);
    }
    if let Some(stddev) = batch.stddev_time_secs() {
        println!("Stddev: {:.3}s", stddev);
    }
    Ok(())
}

/// Runs one board through a fresh engine and reports the outcome.
fn solve_board(name: &str, board: Board, config: SolveConfig) -> (SearchEngine, BoardReport) {
    let mut engine = SearchEngine::new(board, config.selector, config.order, config.check);

    // Settle the givens' pending propagation before searching; the verdict
    // is informational only.
    if config.check != ConsistencyCheck::None {
        let consistent = engine.check_consistency();
        debug!(name, consistent, "pre-search propagation");
    }

    let started = Instant::now();
    let outcome = engine.solve(config.budget);
    let elapsed = started.elapsed();

    let report = BoardReport {
        name: name.to_string(),
        solved: engine.has_solution(),
        timed_out: outcome == SolveOutcome::TimedOut,
        elapsed_secs: elapsed.as_secs_f64(),
        pushes: engine.trail().push_count(),
        backtracks: engine.trail().undo_count(),
    };
    (engine, report)
}

fn solve_and_print(name: &str, board: Board, config: SolveConfig, json: bool) -> Result<()> {
    let (engine, report) = solve_board(name, board, config);

    if engine.has_solution() {
        println!("Solution found:");
        println!("{}", engine.solution());
    } else if report.timed_out {
        println!("Timed out after {:.3}s.", report.elapsed_secs);
    } else {
        println!("Failed to find a solution.");
    }
    println!("Trail Pushes: {}", report.pushes);
    println!("Backtracks: {}", report.backtracks);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}

fn board_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}
