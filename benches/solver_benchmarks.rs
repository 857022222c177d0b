use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use vestigium::{
    board::Board,
    solver::{
        engine::{SearchEngine, SolveOutcome, DEFAULT_BUDGET},
        heuristics::{value::ValueOrder, variable::VariableSelector},
        propagation::ConsistencyCheck,
    },
};

// The classic 9x9 shared with the engine tests.
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

fn solve_once(
    board: &Board,
    selector: VariableSelector,
    order: ValueOrder,
    check: ConsistencyCheck,
) {
    let mut engine = SearchEngine::new(black_box(board.clone()), selector, order, check);
    let outcome = engine.solve(DEFAULT_BUDGET);
    assert_eq!(outcome, SolveOutcome::Completed);
    assert!(engine.has_solution());
}

fn heuristic_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("Classic 9x9 Heuristics");
    let board: Board = CLASSIC.parse().unwrap();

    group.bench_function("SelectFirst + forward checking", |b| {
        b.iter(|| {
            solve_once(
                &board,
                VariableSelector::FirstUnassigned,
                ValueOrder::Natural,
                ConsistencyCheck::ForwardChecking,
            )
        })
    });

    group.bench_function("MRV + forward checking", |b| {
        b.iter(|| {
            solve_once(
                &board,
                VariableSelector::MinimumRemainingValues,
                ValueOrder::Natural,
                ConsistencyCheck::ForwardChecking,
            )
        })
    });

    group.bench_function("MRV-degree + hidden singles", |b| {
        b.iter(|| {
            solve_once(
                &board,
                VariableSelector::MrvDegree,
                ValueOrder::LeastConstraining,
                ConsistencyCheck::Norvig,
            )
        })
    });

    group.finish();
}

fn board_size_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Empty Board Fill");

    for (p, q) in [(2, 2), (2, 3), (3, 3)] {
        let board = Board::empty(p, q).unwrap();
        let n = board.n();
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{n}x{n}")),
            &board,
            |b, board| {
                b.iter(|| {
                    solve_once(
                        board,
                        VariableSelector::MinimumRemainingValues,
                        ValueOrder::Natural,
                        ConsistencyCheck::ForwardChecking,
                    )
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, board_size_benchmark, heuristic_benchmarks);
criterion_main!(benches);
