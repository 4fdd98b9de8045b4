use std::collections::HashMap;

use ahash::RandomState;

use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::evaluator::EdgeHeap;
use crate::models::{Edge, IntType, Matrix, Node, VrpSolution};

type FastMap<K, V> = HashMap<K, V, RandomState>;

/// The element of `[width, length, width_length]` currently used to score
/// edge badness. Advances once per `determine_edge_badness` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PenalizationCriterion {
    Width,
    Length,
    WidthLength,
}

impl PenalizationCriterion {
    fn next(self) -> Self {
        match self {
            PenalizationCriterion::Width => PenalizationCriterion::Length,
            PenalizationCriterion::Length => PenalizationCriterion::WidthLength,
            PenalizationCriterion::WidthLength => PenalizationCriterion::Width,
        }
    }
}

fn round_distance(dx: f64, dy: f64) -> IntType {
    (dx * dx + dy * dy).sqrt().round() as IntType
}

/// Owns the distance matrices, the penalty/ranking state, and the
/// incremental move-cost caches used by the cross-exchange operator.
///
/// Distance matrices and the neighborhood index are fixed at construction;
/// only `penalized_costs`, `edge_penalties`, `edge_ranking`, the incremental
/// caches, the criterion cursor, and the dirty set mutate during search.
pub struct CostEvaluator {
    capacity: IntType,
    dim: usize,
    penalty_scaling: f64,

    x: Vec<f64>,
    y: Vec<f64>,
    is_depot: Vec<bool>,

    costs: Matrix<IntType>,
    penalized_costs: Matrix<IntType>,
    edge_penalties: FastMap<(usize, usize), u32>,

    neighborhood: Vec<Vec<usize>>,
    in_neighborhood_of: Vec<Vec<usize>>,

    baseline_cost: IntType,

    pub ejection_costs: FastMap<usize, IntType>,
    pub insertion_costs: FastMap<(usize, usize), IntType>,
    pub insertion_after: FastMap<(usize, usize), usize>,

    edge_ranking: EdgeHeap,

    penalization_enabled: bool,
    penalization_criterion: PenalizationCriterion,

    // Dirty nodes awaiting an `update_relocation_costs` refresh. Appended to
    // without de-duplication, mirroring the Python original
    // (kgls/datastructure/cost_evaluator.py): callers tolerate the
    // occasional repeated refresh rather than paying for a set on every push.
    nodes_to_update_for_relocation_chain: Vec<usize>,
}

impl CostEvaluator {
    pub fn new(nodes: &[Node], capacity: IntType, config: &Config) -> Self {
        let dim = nodes.len();
        let x: Vec<f64> = nodes.iter().map(|n| n.x).collect();
        let y: Vec<f64> = nodes.iter().map(|n| n.y).collect();
        let is_depot: Vec<bool> = nodes.iter().map(|n| n.is_depot).collect();

        let mut costs = Matrix::new(dim, dim);
        for i in 0..dim {
            for j in 0..dim {
                costs.set(i, j, round_distance(x[i] - x[j], y[i] - y[j]));
            }
        }

        let mut penalized_costs = Matrix::new(dim, dim);
        for i in 0..dim {
            for j in 0..dim {
                penalized_costs.set(i, j, costs.get(i, j));
            }
        }

        let k = config.neighborhood_size;
        let mut neighborhood: Vec<Vec<usize>> = vec![Vec::new(); dim];
        for n in 0..dim {
            if is_depot[n] {
                continue;
            }
            let mut candidates: Vec<(usize, IntType)> = (0..dim)
                .filter(|&m| m != n && !is_depot[m])
                .map(|m| (m, costs.get(n, m)))
                .collect();
            candidates.sort_by_key(|&(_, d)| d);
            candidates.truncate(k);
            neighborhood[n] = candidates.into_iter().map(|(m, _)| m).collect();
        }

        let mut in_neighborhood_of: Vec<Vec<usize>> = vec![Vec::new(); dim];
        for n in 0..dim {
            if is_depot[n] {
                continue;
            }
            for m in 0..dim {
                if is_depot[m] {
                    continue;
                }
                if neighborhood[m].contains(&n) {
                    in_neighborhood_of[n].push(m);
                }
            }
        }

        let mut baseline_sum: i128 = 0;
        for n in 0..dim {
            if is_depot[n] {
                continue;
            }
            for &m in neighborhood[n].iter() {
                baseline_sum += costs.get(n, m) as i128;
            }
        }
        let baseline_cost = if k == 0 || dim == 0 {
            0
        } else {
            (baseline_sum / (k as i128 * dim as i128)) as IntType
        };

        log::info!(
            "CostEvaluator built over {} nodes, baseline_cost={}",
            dim,
            baseline_cost
        );

        let dirty: Vec<usize> = (0..dim).filter(|&n| !is_depot[n]).collect();

        Self {
            capacity,
            dim,
            penalty_scaling: config.penalty_scaling,
            x,
            y,
            is_depot,
            costs,
            penalized_costs,
            edge_penalties: FastMap::default(),
            neighborhood,
            in_neighborhood_of,
            baseline_cost,
            ejection_costs: FastMap::default(),
            insertion_costs: FastMap::default(),
            insertion_after: FastMap::default(),
            edge_ranking: EdgeHeap::new(),
            penalization_enabled: false,
            penalization_criterion: PenalizationCriterion::Width,
            nodes_to_update_for_relocation_chain: dirty,
        }
    }

    pub fn capacity(&self) -> IntType {
        self.capacity
    }

    pub fn baseline_cost(&self) -> IntType {
        self.baseline_cost
    }

    pub fn penalization_criterion(&self) -> PenalizationCriterion {
        self.penalization_criterion
    }

    fn check_node(&self, node: usize) -> CoreResult<()> {
        if node >= self.dim {
            Err(CoreError::UnknownNode(node))
        } else {
            Ok(())
        }
    }

    /// Distance oracle: `costs` when penalization is disabled,
    /// `penalized_costs` otherwise. Never fails.
    #[inline]
    pub fn get_distance(&self, a: usize, b: usize) -> IntType {
        if self.penalization_enabled {
            self.penalized_costs.get(a, b)
        } else {
            self.costs.get(a, b)
        }
    }

    #[inline]
    pub fn raw_distance(&self, a: usize, b: usize) -> IntType {
        self.costs.get(a, b)
    }

    pub fn is_feasible(&self, load: IntType) -> bool {
        load <= self.capacity
    }

    pub fn get_neighborhood(&self, node: usize) -> CoreResult<&[usize]> {
        self.check_node(node)?;
        if self.is_depot[node] {
            return Err(CoreError::EmptyNeighborhood(node));
        }
        Ok(&self.neighborhood[node])
    }

    fn in_neighborhood_of(&self, node: usize) -> &[usize] {
        &self.in_neighborhood_of[node]
    }

    /// Ejection cost for a non-depot node given its current `prev`/`next`.
    pub fn ejection_cost_of(&self, node: usize, prev: usize, next: usize) -> IntType {
        self.get_distance(node, prev) + self.get_distance(node, next) - self.get_distance(prev, next)
    }

    /// Insertion cost/anchor for inserting `node` next to `anchor`.
    /// Returns `(cost, insert_after)`, ties resolved to "before" (`<=`).
    pub fn insertion_cost_of(
        &self,
        node: usize,
        anchor: usize,
        anchor_prev: usize,
        anchor_next: usize,
    ) -> (IntType, usize) {
        let cost_before = self.get_distance(node, anchor_prev) + self.get_distance(node, anchor)
            - self.get_distance(anchor_prev, anchor);
        let cost_after = self.get_distance(node, anchor_next) + self.get_distance(node, anchor)
            - self.get_distance(anchor, anchor_next);

        if cost_before <= cost_after {
            (cost_before, anchor_prev)
        } else {
            (cost_after, anchor)
        }
    }

    /// Refreshes `ejection_costs[node]` from the node's current position in
    /// `solution`.
    pub fn update_ejection_costs(&mut self, solution: &VrpSolution, node: usize) -> CoreResult<()> {
        self.check_node(node)?;
        let prev = solution.nodes[node].prev;
        let next = solution.nodes[node].next;
        self.ejection_costs.insert(node, self.ejection_cost_of(node, prev, next));
        Ok(())
    }

    fn update_insertion_costs(&mut self, solution: &VrpSolution, node: usize, anchor: usize) {
        let anchor_prev = solution.nodes[anchor].prev;
        let anchor_next = solution.nodes[anchor].next;
        let (cost, after) = self.insertion_cost_of(node, anchor, anchor_prev, anchor_next);
        self.insertion_costs.insert((node, anchor), cost);
        self.insertion_after.insert((node, anchor), after);
    }

    /// Refresh the ejection/insertion caches for every dirty node, then
    /// clear the dirty set.
    pub fn update_relocation_costs(&mut self, solution: &VrpSolution) -> CoreResult<()> {
        let dirty = std::mem::take(&mut self.nodes_to_update_for_relocation_chain);

        for &node in dirty.iter() {
            if self.is_depot[node] {
                continue;
            }
            self.update_ejection_costs(solution, node)?;

            let neighbours: Vec<usize> = self.in_neighborhood_of(node).to_vec();
            for anchor in neighbours {
                self.update_insertion_costs(solution, node, anchor);
                self.update_insertion_costs(solution, anchor, node);
            }
        }

        Ok(())
    }

    fn mark_dirty(&mut self, node: usize) {
        if !self.is_depot[node] {
            self.nodes_to_update_for_relocation_chain.push(node);
        }
    }

    /// `enable_penalization` / `disable_penalization`: both seed the dirty
    /// set with every non-depot node, so every incremental cache gets
    /// refreshed against the newly-active (or newly-inactive) penalties on
    /// the next `update_relocation_costs` call.
    pub fn enable_penalization(&mut self) {
        self.penalization_enabled = true;
        self.nodes_to_update_for_relocation_chain =
            (0..self.dim).filter(|&n| !self.is_depot[n]).collect();
    }

    pub fn disable_penalization(&mut self) {
        self.penalization_enabled = false;
        self.nodes_to_update_for_relocation_chain =
            (0..self.dim).filter(|&n| !self.is_depot[n]).collect();
    }

    fn compute_route_center(&self, customers: &[usize]) -> (f64, f64) {
        let n = customers.len() as f64;
        let mean_x = customers.iter().map(|&c| self.x[c]).sum::<f64>() / n;
        let mean_y = customers.iter().map(|&c| self.y[c]).sum::<f64>() / n;
        (mean_x, mean_y)
    }

    fn compute_edge_width(&self, a: usize, b: usize, center: (f64, f64), depot: usize) -> f64 {
        let (center_x, center_y) = center;
        let depot_x = self.x[depot];
        let depot_y = self.y[depot];

        let distance_depot_center =
            ((depot_x - center_x).powi(2) + (depot_y - center_y).powi(2)).sqrt();

        let line_value = |node: usize| -> f64 {
            let raw = (center_y - depot_y) * self.x[node] - (center_x - depot_x) * self.y[node]
                + center_x * depot_y
                - center_y * depot_x;
            if distance_depot_center == 0.0 {
                0.0
            } else {
                raw / distance_depot_center
            }
        };

        (line_value(a) - line_value(b)).abs()
    }

    fn compute_edge_value(&self, a: usize, b: usize, center: (f64, f64), depot: usize) -> f64 {
        match self.penalization_criterion {
            PenalizationCriterion::Length => self.costs.get(a, b) as f64,
            PenalizationCriterion::Width => self.compute_edge_width(a, b, center, depot),
            PenalizationCriterion::WidthLength => {
                self.compute_edge_width(a, b, center, depot) + self.costs.get(a, b) as f64
            }
        }
    }

    /// Rescore every edge of `routes` and rebuild `edge_ranking`, then
    /// advance the criterion cursor.
    pub fn determine_edge_badness(&mut self, solution: &VrpSolution, routes: &[usize]) {
        let mut edges = Vec::new();

        for &route_id in routes {
            let route = &solution.routes[route_id];
            let customers = solution.route_customers(route_id);
            let center = if customers.is_empty() {
                (self.x[route.depot], self.y[route.depot])
            } else {
                self.compute_route_center(&customers)
            };

            for (a, b) in solution.route_edges(route_id) {
                let penalty = *self.edge_penalties.get(&Edge::new(a, b).key()).unwrap_or(&0);
                let mut edge = Edge::new(a, b);
                edge.value = self.compute_edge_value(a, b, center, route.depot) / (1.0 + penalty as f64);
                edges.push(edge);
            }
        }

        self.edge_ranking = EdgeHeap::from_edges(edges);
        self.penalization_criterion = self.penalization_criterion.next();
    }

    /// Pop the worst edge, bump its penalty, widen `penalized_costs`
    /// symmetrically, and reinsert the edge with a reduced value so it does
    /// not immediately re-emerge.
    pub fn get_and_penalize_worst_edge(&mut self) -> CoreResult<Edge> {
        let worst = self.edge_ranking.peek_and_pop_max().ok_or_else(|| {
            CoreError::InvariantViolation(
                "get_and_penalize_worst_edge called with an empty edge_ranking".to_owned(),
            )
        })?;

        let (i, j) = worst.nodes();
        let penalty = {
            let counter = self.edge_penalties.entry((i, j)).or_insert(0);
            *counter += 1;
            *counter
        };

        let raw = self.costs.get(i, j);
        let penalized = (raw as f64 + self.penalty_scaling * self.baseline_cost as f64 * penalty as f64)
            .round() as IntType;
        self.penalized_costs.set(i, j, penalized);
        self.penalized_costs.set(j, i, penalized);

        let mut reinserted = Edge::new(i, j);
        reinserted.value = raw as f64 / (1.0 + penalty as f64);
        self.edge_ranking.insert(reinserted.clone());

        self.mark_dirty(i);
        self.mark_dirty(j);

        log::info!(
            "Penalized edge ({}, {}): penalty={}, penalized_cost={}",
            i,
            j,
            penalty,
            penalized
        );

        Ok(reinserted)
    }

    /// Direct penalty increment with no distance-matrix update, for
    /// operators that keep their own accounting.
    pub fn penalize(&mut self, edge: &Edge) {
        *self.edge_penalties.entry(edge.key()).or_insert(0) += 1;
    }

    /// Total route distance across every non-empty route, optionally
    /// ignoring accumulated penalties.
    pub fn get_solution_costs(&self, solution: &VrpSolution, ignore_penalties: bool) -> IntType {
        let mut total = 0;
        for (route_id, route) in solution.routes.iter().enumerate() {
            if route.size == 0 {
                continue;
            }
            for (a, b) in solution.route_edges(route_id) {
                total += if ignore_penalties {
                    self.raw_distance(a, b)
                } else {
                    self.get_distance(a, b)
                };
            }
        }
        total
    }
}
