//! The backtracking search engine and its time-budget handling.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::{
    board::Board,
    solver::{
        domain::Value,
        heuristics::{self, value::ValueOrder, variable::VariableSelector},
        network::ConstraintNetwork,
        propagation::{self, ConsistencyCheck},
        trail::Trail,
        variable::VariableId,
    },
};

/// Remaining-budget floor. A search frame entered with this much time or
/// less does not expand; the whole search unwinds as a timeout.
pub const SEARCH_TIME_FLOOR: Duration = Duration::from_secs(60);

/// Per-board time budget the command-line driver applies unless overridden.
pub const DEFAULT_BUDGET: Duration = Duration::from_secs(600);

/// How a [`SearchEngine::solve`] call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveOutcome {
    /// The search ran to completion within its budget. Whether it found a
    /// solution is a separate question; ask [`SearchEngine::has_solution`].
    Completed,
    /// The remaining budget fell to [`SEARCH_TIME_FLOOR`] or below and the
    /// search aborted where it stood.
    TimedOut,
}

/// Verdict a search frame reports upward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchStatus {
    /// The frame finished its work; the solution flag says whether a full
    /// assignment was reached somewhere below.
    Exhausted,
    /// The budget floor was hit; unwind immediately, skipping all cleanup.
    Timeout,
}

/// The recursive backtracking engine for solving a [`Board`].
///
/// The `SearchEngine` owns everything the search touches: the constraint
/// network built from the puzzle, the trail recording domain and assignment
/// snapshots, and the heuristic configuration. State survives the
/// [`solve`](SearchEngine::solve) call, so a caller can read the trail
/// counters or materialize the solved grid afterwards.
pub struct SearchEngine {
    board: Board,
    network: ConstraintNetwork,
    trail: Trail,
    selector: VariableSelector,
    value_order: ValueOrder,
    check: ConsistencyCheck,
    has_solution: bool,
}

impl SearchEngine {
    /// Builds an engine for `board` with the given heuristic configuration.
    pub fn new(
        board: Board,
        selector: VariableSelector,
        value_order: ValueOrder,
        check: ConsistencyCheck,
    ) -> Self {
        let network = ConstraintNetwork::from_board(&board);
        Self {
            board,
            network,
            trail: Trail::new(),
            selector,
            value_order,
            check,
            has_solution: false,
        }
    }

    /// Builds an engine with every heuristic at its default.
    pub fn with_defaults(board: Board) -> Self {
        Self::new(
            board,
            VariableSelector::default(),
            ValueOrder::default(),
            ConsistencyCheck::default(),
        )
    }

    /// Runs the backtracking search under a wall-clock budget.
    ///
    /// # Arguments
    ///
    /// * `budget`: The time the search may spend. Budgets at or below
    ///   [`SEARCH_TIME_FLOOR`] time out before any work happens.
    ///
    /// # Returns
    ///
    /// * [`SolveOutcome::Completed`] if the search space was explored within
    ///   budget; [`has_solution`](Self::has_solution) tells success apart
    ///   from exhaustion.
    /// * [`SolveOutcome::TimedOut`] if the budget ran out mid-search. The
    ///   trail and network are left exactly where the abort happened.
    pub fn solve(&mut self, budget: Duration) -> SolveOutcome {
        let outcome = match self.search(budget) {
            SearchStatus::Timeout => SolveOutcome::TimedOut,
            SearchStatus::Exhausted => SolveOutcome::Completed,
        };
        debug!(
            ?outcome,
            solution = self.has_solution,
            pushes = self.trail.push_count(),
            backtracks = self.trail.undo_count(),
            "search finished"
        );
        outcome
    }

    fn search(&mut self, budget: Duration) -> SearchStatus {
        if budget <= SEARCH_TIME_FLOOR {
            return SearchStatus::Timeout;
        }
        if self.has_solution {
            return SearchStatus::Exhausted;
        }
        let frame_started = Instant::now();

        // Variable selection: a disabled selector reports nothing while
        // cells remain, so an empty answer alone does not mean solved.
        let Some(variable) = self.select_next_variable() else {
            if self.network.variables().iter().any(|v| !v.is_assigned()) {
                return SearchStatus::Exhausted;
            }
            self.has_solution = true;
            return SearchStatus::Exhausted;
        };

        // Value iteration: each branch gets a checkpoint, an assignment, and
        // a consistency check before the search descends.
        for value in self.order_values(variable) {
            self.trail.place_marker();
            self.trail.push(self.network.variable(variable));
            self.network.assign(variable, value);

            if self.check_consistency() {
                let remaining = budget.saturating_sub(frame_started.elapsed());
                if self.search(remaining) == SearchStatus::Timeout {
                    // A timeout unwinds without undo; the trail keeps the
                    // abandoned checkpoints.
                    return SearchStatus::Timeout;
                }
            }

            if self.has_solution {
                // The winning branch stays committed.
                return SearchStatus::Exhausted;
            }

            self.trail.undo(&mut self.network);
        }

        SearchStatus::Exhausted
    }

    /// Runs the configured consistency check once against the current
    /// network state.
    ///
    /// The driver also calls this before searching, so that the givens'
    /// pending propagation settles and obviously dead boards are caught
    /// early.
    pub fn check_consistency(&mut self) -> bool {
        match self.check {
            ConsistencyCheck::None => propagation::assignments_check(&self.network),
            ConsistencyCheck::ForwardChecking => {
                propagation::forward_checking(&mut self.network, &mut self.trail).1
            }
            ConsistencyCheck::Norvig => {
                propagation::norvig_check(&mut self.network, &mut self.trail).1
            }
            ConsistencyCheck::Tournament => {
                propagation::tournament_check(&mut self.network, &mut self.trail)
            }
        }
    }

    fn select_next_variable(&self) -> Option<VariableId> {
        match self.selector {
            VariableSelector::FirstUnassigned => {
                heuristics::variable::first_unassigned(&self.network)
            }
            VariableSelector::MinimumRemainingValues => {
                heuristics::variable::minimum_remaining_values(&self.network)
            }
            VariableSelector::MrvDegree => {
                heuristics::variable::mrv_with_degree(&self.network).first().copied()
            }
            VariableSelector::Tournament => heuristics::variable::tournament(&self.network),
        }
    }

    fn order_values(&self, variable: VariableId) -> Vec<Value> {
        match self.value_order {
            ValueOrder::Natural => heuristics::value::natural_order(&self.network, variable),
            ValueOrder::LeastConstraining => {
                heuristics::value::least_constraining_order(&self.network, variable)
            }
            ValueOrder::Tournament => {
                heuristics::value::tournament_order(&self.network, variable)
            }
        }
    }

    /// `true` once the search has committed a full, consistent assignment.
    pub fn has_solution(&self) -> bool {
        self.has_solution
    }

    /// Materializes the current assignments as a board.
    ///
    /// Assigned variables contribute their values; any still-unassigned cell
    /// comes out blank. Only meaningful once
    /// [`has_solution`](Self::has_solution) reports `true`.
    pub fn solution(&self) -> Board {
        let mut board = self.board.clone();
        for variable in self.network.variables() {
            let value = match variable.assignment() {
                Some(value) => value,
                None => 0,
            };
            board.set(variable.row(), variable.col(), value);
        }
        board
    }

    /// The puzzle this engine was built from.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The trail, for its push and backtrack counters.
    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    /// The constraint network in its current search state.
    pub fn network(&self) -> &ConstraintNetwork {
        &self.network
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const CLASSIC: &str = "3 3
        5 3 0 0 7 0 0 0 0
        6 0 0 1 9 5 0 0 0
        0 9 8 0 0 0 0 6 0
        8 0 0 0 6 0 0 0 3
        4 0 0 8 0 3 0 0 1
        7 0 0 0 2 0 0 0 6
        0 6 0 0 0 0 2 8 0
        0 0 0 4 1 9 0 0 5
        0 0 0 0 8 0 0 7 9";

    fn four_by_four() -> Board {
        "2 2\n1 0 0 0\n0 0 3 0\n0 2 0 0\n0 0 0 4".parse().unwrap()
    }

    /// Consistent givens, yet the top-left cell has no candidate left.
    fn dead_four_by_four() -> Board {
        "2 2\n0 2 3 4\n0 0 0 0\n1 0 0 0\n0 0 0 0".parse().unwrap()
    }

    fn assigned_count(network: &ConstraintNetwork) -> usize {
        network.variables().iter().filter(|v| v.is_assigned()).count()
    }

    #[test]
    fn budgets_at_or_below_the_floor_time_out_untouched() {
        let mut engine = SearchEngine::with_defaults(four_by_four());

        assert_eq!(engine.solve(Duration::from_secs(59)), SolveOutcome::TimedOut);
        assert!(!engine.has_solution());
        assert_eq!(engine.trail().push_count(), 0);
        assert!(engine.trail().is_empty());
        // Only the givens are assigned.
        assert_eq!(assigned_count(engine.network()), 4);

        // Exactly on the floor still counts as out of time.
        assert_eq!(engine.solve(SEARCH_TIME_FLOOR), SolveOutcome::TimedOut);
    }

    #[test]
    fn solves_a_small_board_with_every_selector() {
        for selector in [
            VariableSelector::FirstUnassigned,
            VariableSelector::MinimumRemainingValues,
            VariableSelector::MrvDegree,
        ] {
            let mut engine = SearchEngine::new(
                four_by_four(),
                selector,
                ValueOrder::Natural,
                ConsistencyCheck::ForwardChecking,
            );
            assert_eq!(engine.solve(DEFAULT_BUDGET), SolveOutcome::Completed);
            assert!(engine.has_solution(), "selector {:?}", selector);

            let solution = engine.solution();
            assert!(solution.is_solved());
            assert!(solution.extends(engine.board()));
        }
    }

    #[test]
    fn solves_without_propagation() {
        let mut engine = SearchEngine::new(
            four_by_four(),
            VariableSelector::FirstUnassigned,
            ValueOrder::LeastConstraining,
            ConsistencyCheck::None,
        );
        assert_eq!(engine.solve(DEFAULT_BUDGET), SolveOutcome::Completed);
        assert!(engine.has_solution());
        assert!(engine.solution().is_solved());
    }

    #[test]
    fn solves_the_classic_nine_by_nine() {
        let puzzle: Board = CLASSIC.parse().unwrap();
        let mut engine = SearchEngine::new(
            puzzle.clone(),
            VariableSelector::MinimumRemainingValues,
            ValueOrder::Natural,
            ConsistencyCheck::ForwardChecking,
        );

        assert_eq!(engine.solve(DEFAULT_BUDGET), SolveOutcome::Completed);
        assert!(engine.has_solution());

        let solution = engine.solution();
        assert!(solution.is_solved());
        assert!(solution.extends(&puzzle));
        // Two cells of the unique solution.
        assert_eq!(solution.value(0, 2), 4);
        assert_eq!(solution.value(2, 3), 3);
    }

    #[test]
    fn norvig_configuration_solves_the_classic_too() {
        let puzzle: Board = CLASSIC.parse().unwrap();
        let mut engine = SearchEngine::new(
            puzzle.clone(),
            VariableSelector::MrvDegree,
            ValueOrder::LeastConstraining,
            ConsistencyCheck::Norvig,
        );

        assert_eq!(engine.solve(DEFAULT_BUDGET), SolveOutcome::Completed);
        assert!(engine.has_solution());
        assert!(engine.solution().is_solved());
        assert!(engine.solution().extends(&puzzle));
    }

    #[test]
    fn a_dead_board_exhausts_without_a_solution() {
        for check in [
            ConsistencyCheck::None,
            ConsistencyCheck::ForwardChecking,
            ConsistencyCheck::Norvig,
        ] {
            let mut engine = SearchEngine::new(
                dead_four_by_four(),
                VariableSelector::FirstUnassigned,
                ValueOrder::Natural,
                check,
            );
            assert_eq!(engine.solve(DEFAULT_BUDGET), SolveOutcome::Completed);
            assert!(!engine.has_solution(), "check {:?}", check);
            // Every branch was rolled back.
            assert!(engine.trail().is_empty());
            assert!(engine.trail().undo_count() > 0);
        }
    }

    #[test]
    fn timing_out_mid_search_leaves_the_trail_unrolled() {
        let mut engine = SearchEngine::new(
            four_by_four(),
            VariableSelector::FirstUnassigned,
            ValueOrder::Natural,
            ConsistencyCheck::ForwardChecking,
        );

        // Enough to enter the root frame, never enough for a child.
        let budget = SEARCH_TIME_FLOOR + Duration::from_nanos(1);
        assert_eq!(engine.solve(budget), SolveOutcome::TimedOut);
        assert!(!engine.has_solution());
        assert!(engine.trail().checkpoint_depth() > 0);
        assert!(!engine.trail().is_empty());
        // The branch variable keeps its abandoned assignment.
        assert!(engine.network().variable(1).is_assigned());
    }

    #[test]
    fn success_leaves_the_winning_checkpoints_committed() {
        let mut engine = SearchEngine::new(
            four_by_four(),
            VariableSelector::FirstUnassigned,
            ValueOrder::Natural,
            ConsistencyCheck::ForwardChecking,
        );
        assert_eq!(engine.solve(DEFAULT_BUDGET), SolveOutcome::Completed);
        assert!(engine.has_solution());
        assert!(engine.trail().checkpoint_depth() > 0);
        assert_eq!(assigned_count(engine.network()), 16);

        // Solving again is a no-op.
        let pushes = engine.trail().push_count();
        assert_eq!(engine.solve(DEFAULT_BUDGET), SolveOutcome::Completed);
        assert_eq!(engine.trail().push_count(), pushes);
    }

    #[test]
    fn disabled_tournament_selector_terminates_empty_handed() {
        let mut engine = SearchEngine::new(
            four_by_four(),
            VariableSelector::Tournament,
            ValueOrder::Natural,
            ConsistencyCheck::None,
        );
        assert_eq!(engine.solve(DEFAULT_BUDGET), SolveOutcome::Completed);
        assert!(!engine.has_solution());
        assert_eq!(engine.trail().push_count(), 0);
    }

    #[test]
    fn disabled_tournament_order_offers_no_branches() {
        let mut engine = SearchEngine::new(
            four_by_four(),
            VariableSelector::FirstUnassigned,
            ValueOrder::Tournament,
            ConsistencyCheck::None,
        );
        assert_eq!(engine.solve(DEFAULT_BUDGET), SolveOutcome::Completed);
        assert!(!engine.has_solution());
        assert_eq!(engine.trail().push_count(), 0);
    }

    #[test]
    fn disabled_tournament_check_rejects_every_branch() {
        let mut engine = SearchEngine::new(
            four_by_four(),
            VariableSelector::FirstUnassigned,
            ValueOrder::Natural,
            ConsistencyCheck::Tournament,
        );
        assert_eq!(engine.solve(DEFAULT_BUDGET), SolveOutcome::Completed);
        assert!(!engine.has_solution());
        assert!(engine.trail().is_empty());
        // One failed branch per candidate value of the first blank cell.
        assert_eq!(engine.trail().push_count(), 4);
        assert_eq!(engine.trail().undo_count(), 4);
    }

    #[test]
    fn fills_an_empty_board_from_nothing() {
        let board = Board::empty(2, 2).unwrap();
        let mut engine = SearchEngine::new(
            board,
            VariableSelector::MinimumRemainingValues,
            ValueOrder::Natural,
            ConsistencyCheck::ForwardChecking,
        );
        assert_eq!(engine.solve(DEFAULT_BUDGET), SolveOutcome::Completed);
        assert!(engine.has_solution());
        assert!(engine.solution().is_solved());
    }

    #[test]
    fn non_square_boxes_flow_through_the_whole_search() {
        let board = Board::empty(2, 3).unwrap();
        let mut engine = SearchEngine::new(
            board,
            VariableSelector::MinimumRemainingValues,
            ValueOrder::LeastConstraining,
            ConsistencyCheck::Norvig,
        );
        assert_eq!(engine.solve(DEFAULT_BUDGET), SolveOutcome::Completed);
        assert!(engine.has_solution());

        let solution = engine.solution();
        assert!(solution.is_solved());
        assert_eq!(solution.n(), 6);
    }

    mod prop_tests {
        use proptest::{
            prelude::*,
            strategy::{Just, NewTree, Strategy},
            test_runner::TestRunner,
        };
        use sudoku::Sudoku;

        use crate::{
            board::Board,
            solver::{
                domain::Value,
                engine::{SearchEngine, SolveOutcome, DEFAULT_BUDGET},
                heuristics::{value::ValueOrder, variable::VariableSelector},
                propagation::ConsistencyCheck,
            },
        };

        /// Converts the `sudoku` crate's flat `[u8; 81]` form into a board.
        fn board_from_bytes(bytes: &[u8; 81]) -> Board {
            let grid: Vec<Vec<Value>> = (0..9)
                .map(|row| (0..9).map(|col| Value::from(bytes[row * 9 + col])).collect())
                .collect();
            Board::from_grid(3, 3, grid).unwrap()
        }

        #[derive(Debug, Clone)]
        struct PuzzleStrategy;

        impl Strategy for PuzzleStrategy {
            type Tree = <Just<(Board, Board)> as Strategy>::Tree;
            type Value = (Board, Board);

            fn new_tree(&self, runner: &mut TestRunner) -> NewTree<Self> {
                let solved = Sudoku::generate_solved_with_rng(runner.rng());

                let all_symmetries = [
                    sudoku::Symmetry::VerticalMirror,
                    sudoku::Symmetry::HorizontalMirror,
                    sudoku::Symmetry::VerticalAndHorizontalMirror,
                    sudoku::Symmetry::DiagonalMirror,
                    sudoku::Symmetry::AntidiagonalMirror,
                    sudoku::Symmetry::BidiagonalMirror,
                    sudoku::Symmetry::QuarterRotation,
                    sudoku::Symmetry::HalfRotation,
                    sudoku::Symmetry::Dihedral,
                    sudoku::Symmetry::None,
                ];
                let symmetry_index =
                    (runner.rng().next_u64() % all_symmetries.len() as u64) as usize;
                let puzzle = Sudoku::generate_with_symmetry_and_rng_from(
                    solved,
                    all_symmetries[symmetry_index],
                    runner.rng(),
                );

                Just((
                    board_from_bytes(&puzzle.to_bytes()),
                    board_from_bytes(&solved.to_bytes()),
                ))
                .new_tree(runner)
            }
        }

        fn generated_puzzle() -> PuzzleStrategy {
            PuzzleStrategy
        }

        proptest! {
            #[ignore]
            #[test]
            fn can_solve_generated_puzzles((puzzle, key) in generated_puzzle()) {
                let mut engine = SearchEngine::new(
                    puzzle.clone(),
                    VariableSelector::MinimumRemainingValues,
                    ValueOrder::Natural,
                    ConsistencyCheck::ForwardChecking,
                );
                prop_assert_eq!(engine.solve(DEFAULT_BUDGET), SolveOutcome::Completed);
                prop_assert!(engine.has_solution(), "no solution found");

                let solution = engine.solution();
                prop_assert!(solution.is_solved());
                prop_assert!(solution.extends(&puzzle));
                // Generated puzzles are proper, so the key is the only
                // completion.
                prop_assert_eq!(solution, key);
            }
        }
    }
}
