use std::cmp::Ordering;

use crate::error::{CoreError, CoreResult};
use crate::evaluator::CostEvaluator;
use crate::models::{FloatType, IntType, VrpSolution};

/// `0` extends towards `next`, `1` extends towards `prev`, matching the
/// direction convention of `Node::neighbour`.
const DIRECTIONS: [usize; 2] = [0, 1];

/// A candidate cross-exchange move: swap `segment1` (from `start_node`'s
/// route) with `segment2` (from a neighborhood route), reinserting each
/// segment at the other's vacated anchor.
///
/// Segments are stored in the order they are inserted, not necessarily the
/// order they were visited along the route — see
/// `search_cross_exchanges_from` for how the two are reconciled per
/// direction combination.
#[derive(Clone, Debug)]
pub struct CrossExchange {
    pub segment1: Vec<usize>,
    pub segment2: Vec<usize>,
    pub segment1_insert_after: usize,
    pub segment2_insert_after: usize,
    pub improvement: FloatType,
    pub start_node: usize,
}

impl CrossExchange {
    /// Remove both segments, then reinsert each at the other's anchor.
    ///
    /// `capacity` guards against a move that was generated against a stale
    /// evaluator state and would overload one of the two touched routes;
    /// every candidate returned by `search_cross_exchanges_from` already
    /// passes this check during generation, so this only fires if a caller
    /// executes a move against a solution it wasn't searched on.
    pub fn execute(&self, solution: &mut VrpSolution, capacity: IntType) -> CoreResult<()> {
        log::debug!(
            "Executing cross-exchange with segments of sizes {} and {}, improvement {:.1}",
            self.segment1.len(),
            self.segment2.len(),
            self.improvement
        );

        solution.remove_nodes(&self.segment1)?;
        solution.remove_nodes(&self.segment2)?;

        solution.insert_nodes_after(&self.segment1, self.segment1_insert_after)?;
        solution.insert_nodes_after(&self.segment2, self.segment2_insert_after)?;

        for &route_id in self.get_routes(solution).iter() {
            let route = &solution.routes[route_id];
            if route.volume > capacity {
                return Err(CoreError::CapacityOverflow {
                    route: route_id,
                    load: route.volume,
                    capacity,
                });
            }
        }

        Ok(())
    }

    /// The one or two routes this move touches, as currently recorded by
    /// `solution`.
    pub fn get_routes(&self, solution: &VrpSolution) -> Vec<usize> {
        let route1 = solution.nodes[self.segment1[0]].route;
        let route2 = solution.nodes[self.segment2[0]].route;
        if route1 == route2 {
            vec![route1]
        } else {
            vec![route1, route2]
        }
    }

    /// Two moves are disjoint if they share no route, so both can be applied
    /// in the same improvement round.
    pub fn is_disjoint(&self, other: &CrossExchange, solution: &VrpSolution) -> bool {
        let mine = self.get_routes(solution);
        let theirs = other.get_routes(solution);
        !mine.iter().any(|r| theirs.contains(r))
    }
}

fn sorted_by_improvement(mut moves: Vec<CrossExchange>) -> Vec<CrossExchange> {
    moves.sort_by(|a, b| {
        b.improvement
            .partial_cmp(&a.improvement)
            .unwrap_or(Ordering::Equal)
    });
    moves
}

/// Search every cross-exchange move anchored at `start_node`, across all
/// four direction combinations for the two segments.
pub fn search_cross_exchanges_from(
    cost_evaluator: &CostEvaluator,
    solution: &VrpSolution,
    start_node: usize,
) -> CoreResult<Vec<CrossExchange>> {
    let route1 = solution.nodes[start_node].route;
    let mut candidates = Vec::new();

    for &segment1_direction in DIRECTIONS.iter() {
        for &segment2_direction in DIRECTIONS.iter() {
            let route1_segment_connection_start = solution.nodes[start_node].neighbour(segment1_direction);

            for &route2_segment_connection_start in cost_evaluator.get_neighborhood(start_node)? {
                if solution.nodes[route2_segment_connection_start].route == route1 {
                    continue;
                }

                let segment2_start =
                    solution.nodes[route2_segment_connection_start].neighbour(segment2_direction);
                if solution.nodes[segment2_start].is_depot {
                    continue;
                }

                let improvement_first_cross = cost_evaluator.get_distance(start_node, route1_segment_connection_start)
                    + cost_evaluator.get_distance(segment2_start, route2_segment_connection_start)
                    - cost_evaluator.get_distance(start_node, route2_segment_connection_start)
                    - cost_evaluator.get_distance(segment2_start, route1_segment_connection_start);

                if improvement_first_cross <= 0 {
                    continue;
                }

                let route2 = solution.nodes[route2_segment_connection_start].route;

                let mut segment1_end = start_node;
                let mut segment1_list = vec![segment1_end];
                let mut segment1_volume = solution.nodes[segment1_end].demand;

                while !solution.nodes[segment1_end].is_depot {
                    let mut segment2_end = segment2_start;
                    let mut segment2_list = vec![segment2_end];
                    let mut segment2_volume = solution.nodes[segment2_end].demand;

                    while !solution.nodes[segment2_end].is_depot
                        && cost_evaluator.is_feasible(
                            solution.routes[route1].volume - segment1_volume + segment2_volume,
                        )
                    {
                        if cost_evaluator.is_feasible(
                            solution.routes[route2].volume - segment2_volume + segment1_volume,
                        ) {
                            let route1_segment_connection_end =
                                solution.nodes[segment1_end].neighbour(segment1_direction);
                            let route2_segment_connection_end =
                                solution.nodes[segment2_end].neighbour(segment2_direction);

                            let improvement_second_cross = cost_evaluator
                                .get_distance(segment1_end, route1_segment_connection_end)
                                + cost_evaluator.get_distance(segment2_end, route2_segment_connection_end)
                                - cost_evaluator.get_distance(segment1_end, route2_segment_connection_end)
                                - cost_evaluator.get_distance(segment2_end, route1_segment_connection_end);

                            let improvement = improvement_first_cross + improvement_second_cross;

                            if improvement > 0 {
                                let segment1_insert_after = if segment2_direction == 1 {
                                    route2_segment_connection_start
                                } else {
                                    route2_segment_connection_end
                                };
                                let segment2_insert_after = if segment1_direction == 1 {
                                    route1_segment_connection_start
                                } else {
                                    route1_segment_connection_end
                                };

                                candidates.push(CrossExchange {
                                    segment1: segment1_list.clone(),
                                    segment2: segment2_list.clone(),
                                    segment1_insert_after,
                                    segment2_insert_after,
                                    improvement: improvement as FloatType,
                                    start_node,
                                });
                            }
                        }

                        segment2_end = solution.nodes[segment2_end].neighbour(segment2_direction);
                        if (segment2_direction == 1 && segment1_direction == 0)
                            || (segment1_direction + segment2_direction == 0)
                        {
                            segment2_list.insert(0, segment2_end);
                        } else {
                            segment2_list.push(segment2_end);
                        }
                        segment2_volume += solution.nodes[segment2_end].demand;
                    }

                    segment1_end = solution.nodes[segment1_end].neighbour(segment1_direction);
                    if (segment1_direction == 1 && segment2_direction == 0)
                        || (segment1_direction + segment2_direction == 0)
                    {
                        segment1_list.insert(0, segment1_end);
                    } else {
                        segment1_list.push(segment1_end);
                    }
                    segment1_volume += solution.nodes[segment1_end].demand;
                }
            }
        }
    }

    Ok(candidates)
}

/// Search cross-exchange moves anchored at every node in `start_nodes`,
/// returning all candidates sorted by improvement, most improving first.
pub fn search_cross_exchanges(
    cost_evaluator: &CostEvaluator,
    solution: &VrpSolution,
    start_nodes: &[usize],
) -> CoreResult<Vec<CrossExchange>> {
    let mut candidates = Vec::new();
    for &start_node in start_nodes {
        candidates.extend(search_cross_exchanges_from(cost_evaluator, solution, start_node)?);
    }
    Ok(sorted_by_improvement(candidates))
}
