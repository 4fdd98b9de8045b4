use criterion::{black_box, criterion_group, criterion_main, Criterion};

use kgls_core::config::Config;
use kgls_core::evaluator::CostEvaluator;
use kgls_core::models::{Node, RouteSpec, VrpSolution};
use kgls_core::operators::search_cross_exchanges;

/// A ring of `num_routes` depots, each serving a small cluster of customers
/// placed on a circle around it. Gives the cross-exchange search plenty of
/// cross-route neighborhood candidates without needing a parsed instance.
fn synthetic_instance(num_routes: usize, customers_per_route: usize) -> (Vec<Node>, Vec<RouteSpec>) {
    let mut nodes = Vec::new();
    let mut specs = Vec::new();
    let mut next_id = 0;

    for r in 0..num_routes {
        let depot_angle = (r as f64) / (num_routes as f64) * std::f64::consts::TAU;
        let depot_x = 100.0 * depot_angle.cos();
        let depot_y = 100.0 * depot_angle.sin();
        let depot_id = next_id;
        nodes.push(Node::new(depot_id, depot_x, depot_y, 0, true));
        next_id += 1;

        let mut customers = Vec::with_capacity(customers_per_route);
        for c in 0..customers_per_route {
            let angle = (c as f64) / (customers_per_route as f64) * std::f64::consts::TAU;
            let x = depot_x + 10.0 * angle.cos();
            let y = depot_y + 10.0 * angle.sin();
            nodes.push(Node::new(next_id, x, y, 1, false));
            customers.push(next_id);
            next_id += 1;
        }

        specs.push(RouteSpec {
            depot: depot_id,
            customers,
        });
    }

    (nodes, specs)
}

fn run_search_round(config: &Config) {
    let (nodes, specs) = synthetic_instance(8, 12);
    let capacity = 20;
    let solution = VrpSolution::new(nodes, specs);
    let mut evaluator = CostEvaluator::new(&solution.nodes, capacity, config);

    let route_ids: Vec<usize> = (0..solution.routes.len()).collect();
    evaluator.determine_edge_badness(&solution, &route_ids);

    let seeds: Vec<usize> = solution
        .nodes
        .iter()
        .filter(|n| !n.is_depot)
        .map(|n| n.id)
        .collect();

    let moves = search_cross_exchanges(&evaluator, &solution, &seeds).expect("search should not fail");
    black_box(moves);
}

pub fn bench(c: &mut Criterion) {
    let config = Config::default();
    c.bench_function("determine_edge_badness_and_cross_exchange_search", |b| {
        b.iter(|| run_search_round(black_box(&config)))
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(30);
    targets = bench
}
criterion_main!(benches);
