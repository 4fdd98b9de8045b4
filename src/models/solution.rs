use crate::error::{CoreError, CoreResult};
use crate::models::{Node, Route};

/// Specification of a single route used to build an initial `VrpSolution`:
/// the id of the route's depot sentinel node, and the customer node ids in
/// visiting order.
#[derive(Clone, Debug)]
pub struct RouteSpec {
    pub depot: usize,
    pub customers: Vec<usize>,
}

/// The ordered collection of routes plus the node arena they link through.
#[derive(Clone, Debug)]
pub struct VrpSolution {
    pub nodes: Vec<Node>,
    pub routes: Vec<Route>,
}

impl VrpSolution {
    /// Build a solution from a flat node arena and a list of route
    /// specifications. Links every route into a cycle through its depot and
    /// computes `volume`/`size` for each route.
    pub fn new(mut nodes: Vec<Node>, route_specs: Vec<RouteSpec>) -> Self {
        let mut routes = Vec::with_capacity(route_specs.len());

        for (route_id, spec) in route_specs.into_iter().enumerate() {
            let depot = spec.depot;
            let mut route = Route::new(route_id, depot);

            let mut prev = depot;
            for &customer in spec.customers.iter() {
                nodes[prev].next = customer;
                nodes[customer].prev = prev;
                nodes[customer].route = route_id;
                route.volume += nodes[customer].demand;
                route.size += 1;
                prev = customer;
            }
            nodes[prev].next = depot;
            nodes[depot].prev = prev;
            nodes[depot].route = route_id;

            routes.push(route);
        }

        Self { nodes, routes }
    }

    /// Customer node ids of `route_id`, in visiting order (depot excluded).
    pub fn route_customers(&self, route_id: usize) -> Vec<usize> {
        let route = &self.routes[route_id];
        let mut customers = Vec::with_capacity(route.size);
        let mut cur = self.nodes[route.depot].next;
        while cur != route.depot {
            customers.push(cur);
            cur = self.nodes[cur].next;
        }
        customers
    }

    /// Consecutive node-id pairs along `route_id`'s cycle, including the two
    /// depot-adjacent edges.
    pub fn route_edges(&self, route_id: usize) -> Vec<(usize, usize)> {
        let route = &self.routes[route_id];
        let mut edges = Vec::with_capacity(route.size + 1);
        let mut cur = route.depot;
        loop {
            let next = self.nodes[cur].next;
            edges.push((cur, next));
            cur = next;
            if cur == route.depot {
                break;
            }
        }
        edges
    }

    /// Remove a contiguous, single-route segment of non-depot nodes from the
    /// solution. The segment's own internal links are left untouched (a
    /// subsequent `insert_nodes_after` rebuilds them), but the boundary
    /// nodes around the segment are spliced together and the owning route's
    /// `volume`/`size` are updated.
    pub fn remove_nodes(&mut self, segment: &[usize]) -> CoreResult<()> {
        if segment.is_empty() {
            return Ok(());
        }

        let first = segment[0];
        let last = *segment.last().unwrap();
        let route_id = self.nodes[first].route;

        if self.nodes[last].route != route_id {
            return Err(CoreError::InvariantViolation(format!(
                "segment endpoints {} and {} belong to different routes",
                first, last
            )));
        }

        let before = self.nodes[first].prev;
        let after = self.nodes[last].next;
        self.nodes[before].next = after;
        self.nodes[after].prev = before;

        let mut removed_volume = 0;
        let mut removed_size = 0;
        for &id in segment {
            let node = &self.nodes[id];
            if node.is_depot {
                return Err(CoreError::InvariantViolation(format!(
                    "cannot remove depot node {} as part of a segment",
                    id
                )));
            }
            removed_volume += node.demand;
            removed_size += 1;
        }

        let route = &mut self.routes[route_id];
        route.volume -= removed_volume;
        route.size -= removed_size;

        Ok(())
    }

    /// Insert `segment` (in the given order) immediately after `anchor`,
    /// re-linking the segment internally, updating the owning route's
    /// `volume`/`size`, and setting `route`/`prev`/`next` on every inserted
    /// node.
    pub fn insert_nodes_after(&mut self, segment: &[usize], anchor: usize) -> CoreResult<()> {
        if segment.is_empty() {
            return Ok(());
        }

        let route_id = self.nodes[anchor].route;
        let after_anchor = self.nodes[anchor].next;

        let mut prev = anchor;
        let mut inserted_volume = 0;
        for &id in segment {
            self.nodes[prev].next = id;
            self.nodes[id].prev = prev;
            self.nodes[id].route = route_id;
            inserted_volume += self.nodes[id].demand;
            prev = id;
        }
        self.nodes[prev].next = after_anchor;
        self.nodes[after_anchor].prev = prev;

        let route = &mut self.routes[route_id];
        route.volume += inserted_volume;
        route.size += segment.len();

        Ok(())
    }

    /// Validate that every route's aggregates match a full traversal and
    /// that no node appears in more than one route.
    pub fn verify_invariants(&self) -> CoreResult<()> {
        let mut seen = vec![false; self.nodes.len()];

        for route in self.routes.iter() {
            let mut volume = 0;
            let mut size = 0;
            let mut steps = 0;
            let mut cur = self.nodes[route.depot].next;

            while cur != route.depot {
                if seen[cur] {
                    return Err(CoreError::InvariantViolation(format!(
                        "node {} appears in more than one route",
                        cur
                    )));
                }
                seen[cur] = true;
                volume += self.nodes[cur].demand;
                size += 1;
                steps += 1;
                if steps > self.nodes.len() {
                    return Err(CoreError::InvariantViolation(format!(
                        "route {} cycle does not return to its depot",
                        route.id
                    )));
                }
                cur = self.nodes[cur].next;
            }

            if volume != route.volume {
                return Err(CoreError::InvariantViolation(format!(
                    "route {} volume {} does not match traversal sum {}",
                    route.id, route.volume, volume
                )));
            }
            if size != route.size {
                return Err(CoreError::InvariantViolation(format!(
                    "route {} size {} does not match traversal count {}",
                    route.id, route.size, size
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Node;

    fn make_node(id: usize, x: f64, y: f64, demand: i64, is_depot: bool) -> Node {
        Node::new(id, x, y, demand, is_depot)
    }

    fn simple_solution() -> VrpSolution {
        // depot=0, route: 0 -> 1 -> 2 -> 0
        let nodes = vec![
            make_node(0, 0.0, 0.0, 0, true),
            make_node(1, 1.0, 0.0, 1, false),
            make_node(2, 2.0, 0.0, 1, false),
        ];
        VrpSolution::new(
            nodes,
            vec![RouteSpec {
                depot: 0,
                customers: vec![1, 2],
            }],
        )
    }

    #[test]
    fn construction_links_cycle_and_aggregates() {
        let sol = simple_solution();
        assert_eq!(sol.routes[0].volume, 2);
        assert_eq!(sol.routes[0].size, 2);
        assert_eq!(sol.route_customers(0), vec![1, 2]);
        sol.verify_invariants().unwrap();
    }

    #[test]
    fn remove_then_insert_round_trips() {
        let mut sol = simple_solution();
        sol.remove_nodes(&[1]).unwrap();
        assert_eq!(sol.routes[0].volume, 1);
        assert_eq!(sol.routes[0].size, 1);
        assert_eq!(sol.route_customers(0), vec![2]);

        sol.insert_nodes_after(&[1], 0).unwrap();
        assert_eq!(sol.routes[0].volume, 2);
        assert_eq!(sol.routes[0].size, 2);
        assert_eq!(sol.route_customers(0), vec![1, 2]);
        sol.verify_invariants().unwrap();
    }

    #[test]
    fn route_edges_include_depot_adjacent_pairs() {
        let sol = simple_solution();
        assert_eq!(sol.route_edges(0), vec![(0, 1), (1, 2), (2, 0)]);
    }
}
