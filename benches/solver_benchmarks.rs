use arcsolve::{
    generators,
    solver::{
        consistency::Propagation,
        engine::{Solver, SolverConfig},
        heuristics::{value::ValueOrdering, variable::VariableOrdering},
    },
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn bench_n_queens(c: &mut Criterion) {
    let mut group = c.benchmark_group("n_queens_first_solution");

    for n in [6, 8] {
        let doc = generators::queens::n_queens(n);
        for (label, propagation) in [
            ("fc", Propagation::ForwardChecking),
            ("mac", Propagation::MaintainingArcConsistency),
        ] {
            let instance = doc.build().unwrap();
            group.bench_with_input(
                BenchmarkId::new(label, n),
                &instance,
                |b, instance| {
                    let solver = Solver::new(SolverConfig {
                        solutions_to_find: 1,
                        variable_ordering: VariableOrdering::SmallestDomain,
                        value_ordering: ValueOrdering::Ascending,
                        propagation,
                    });
                    b.iter(|| black_box(solver.solve(instance.clone())));
                },
            );
        }
    }

    group.finish();
}

fn bench_langford(c: &mut Criterion) {
    let doc = generators::langford::langford(2, 4);
    let instance = doc.build().unwrap();
    c.bench_function("langford_2_4_all_solutions", |b| {
        let solver = Solver::new(SolverConfig::default());
        b.iter(|| black_box(solver.solve(instance.clone())));
    });
}

criterion_group!(benches, bench_n_queens, bench_langford);
criterion_main!(benches);
