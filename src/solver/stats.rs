//! Per-board and per-batch solve reports.

use prettytable::{Cell, Row, Table};
use serde::Serialize;

/// Outcome and trail counters for one attempted board.
#[derive(Debug, Clone, Serialize)]
pub struct BoardReport {
    /// Source name, usually the board's file name.
    pub name: String,
    /// Whether the search committed a full solution.
    pub solved: bool,
    /// Whether the search hit the budget floor instead of finishing.
    pub timed_out: bool,
    /// Wall-clock seconds spent solving.
    pub elapsed_secs: f64,
    /// Trail pushes over the whole search.
    pub pushes: u64,
    /// Checkpoints undone over the whole search.
    pub backtracks: u64,
}

impl BoardReport {
    /// Outcome word used by the table and per-board log lines.
    pub fn outcome_label(&self) -> &'static str {
        if self.timed_out {
            "timed out"
        } else if self.solved {
            "solved"
        } else {
            "no solution"
        }
    }
}

/// Aggregate view over a batch run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub boards: Vec<BoardReport>,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, report: BoardReport) {
        self.boards.push(report);
    }

    pub fn board_count(&self) -> usize {
        self.boards.len()
    }

    pub fn solved_count(&self) -> usize {
        self.boards.iter().filter(|b| b.solved).count()
    }

    pub fn timed_out_count(&self) -> usize {
        self.boards.iter().filter(|b| b.timed_out).count()
    }

    pub fn total_pushes(&self) -> u64 {
        self.boards.iter().map(|b| b.pushes).sum()
    }

    pub fn total_backtracks(&self) -> u64 {
        self.boards.iter().map(|b| b.backtracks).sum()
    }

    /// Summed time of the boards that finished within budget. Timed-out
    /// boards are excluded here and from the derived mean and deviation.
    pub fn total_time_secs(&self) -> f64 {
        self.finished_times().sum()
    }

    /// Mean solve time of the finished boards, if any finished.
    pub fn average_time_secs(&self) -> Option<f64> {
        let finished = self.boards.iter().filter(|b| !b.timed_out).count();
        if finished == 0 {
            return None;
        }
        Some(self.total_time_secs() / finished as f64)
    }

    /// Population standard deviation of the finished boards' solve times.
    pub fn stddev_time_secs(&self) -> Option<f64> {
        let average = self.average_time_secs()?;
        let times: Vec<f64> = self.finished_times().collect();
        let variance = times
            .iter()
            .map(|&t| {
                let diff = t - average;
                diff * diff
            })
            .sum::<f64>()
            / times.len() as f64;
        Some(variance.sqrt())
    }

    fn finished_times(&self) -> impl Iterator<Item = f64> + '_ {
        self.boards
            .iter()
            .filter(|b| !b.timed_out)
            .map(|b| b.elapsed_secs)
    }
}

/// Renders one row per board plus a header, in the solver's tabular form.
pub fn render_report_table(report: &BatchReport) -> String {
    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("Board"),
        Cell::new("Outcome"),
        Cell::new("Time (s)"),
        Cell::new("Trail Pushes"),
        Cell::new("Backtracks"),
    ]));

    for board in &report.boards {
        table.add_row(Row::new(vec![
            Cell::new(&board.name),
            Cell::new(board.outcome_label()),
            Cell::new(&format!("{:.3}", board.elapsed_secs)),
            Cell::new(&board.pushes.to_string()),
            Cell::new(&board.backtracks.to_string()),
        ]));
    }

    table.to_string()
}
