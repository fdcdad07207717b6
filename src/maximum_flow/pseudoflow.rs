use crate::maximum_flow::forest::SpanningForest;
use crate::maximum_flow::graph::Graph;
use crate::maximum_flow::status::Status;
use num_traits::NumAssign;
use serde::{Deserialize, Serialize};
use std::ops::Neg;
use std::time::{Duration, Instant};
use tracing::debug;

/// Runtime switches for a solve; all three default to off (highest-label,
/// LIFO buckets, flow output).
#[derive(Default, Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub lowest_label: bool,
    pub fifo_buckets: bool,
    pub display_cut: bool,
}

#[derive(Default, Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub pushes: u64,
    pub mergers: u64,
    pub relabels: u64,
    pub gaps: u64,
    pub arc_scans: u64,
}

#[derive(Default, Clone, Copy, Debug)]
pub struct PhaseTimes {
    pub initialize: Duration,
    pub flow: Duration,
    pub recover: Duration,
    pub total: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Violation<Flow> {
    Capacity { from: usize, to: usize, flow: Flow, capacity: Flow },
    Balance { node: usize, excess: Flow },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Verification<Flow> {
    pub mincut: Flow,
    pub feasible: bool,
    pub optimal: bool,
    pub violations: Vec<Violation<Flow>>,
}

/// Hochbaum's pseudoflow algorithm.
///
/// Keeps a forest of normal trees whose roots carry excess, repeatedly merges
/// weak trees under strong roots until no strong root remains, then recovers
/// a feasible arc flow by path/cycle decomposition. The minimum cut falls out
/// of the final labels.
#[derive(Default)]
pub struct Pseudoflow<Flow> {
    config: Config,
    forest: SpanningForest<Flow>,

    lowest_strong_label: usize,
    highest_strong_label: usize,

    stats: Statistics,
    times: PhaseTimes,
}

impl<Flow> Pseudoflow<Flow>
where
    Flow: NumAssign + Neg<Output = Flow> + Ord + Copy + Default,
{
    pub fn new(config: Config) -> Self {
        Pseudoflow { config, ..Default::default() }
    }

    #[inline]
    pub fn config(&self) -> Config {
        self.config
    }

    #[inline]
    pub fn stats(&self) -> Statistics {
        self.stats
    }

    #[inline]
    pub fn times(&self) -> PhaseTimes {
        self.times
    }

    pub fn solve(&mut self, source: usize, sink: usize, graph: &mut Graph<Flow>) -> Status {
        if source >= graph.num_nodes() || sink >= graph.num_nodes() || source == sink {
            return Status::BadInput;
        }

        self.stats = Statistics::default();
        self.times = PhaseTimes::default();
        (self.lowest_strong_label, self.highest_strong_label) =
            if self.config.lowest_label { (1, 0) } else { (0, 1) };

        let start = Instant::now();
        self.forest.build(graph, source, sink);
        self.simple_initialization();
        self.times.initialize = start.elapsed();
        debug_assert!(self.forest.validate_label_counts());

        let phase = Instant::now();
        self.flow_phase_one();
        self.times.flow = phase.elapsed();
        debug_assert!(self.forest.validate_label_counts());
        debug!(
            pushes = self.stats.pushes,
            mergers = self.stats.mergers,
            relabels = self.stats.relabels,
            gaps = self.stats.gaps,
            arc_scans = self.stats.arc_scans,
            "phase one complete"
        );

        let phase = Instant::now();
        self.recover_flow();
        self.times.recover = phase.elapsed();
        self.times.total = start.elapsed();
        debug!(recover = ?self.times.recover, total = ?self.times.total, "flow recovered");

        self.forest.set_flow(graph);
        Status::Optimal
    }

    fn simple_initialization(&mut self) {
        let (source, sink) = (self.forest.source, self.forest.sink);

        for i in 0..self.forest.nodes[source].number_out_of_tree {
            let arc = self.forest.nodes[source].out_of_tree[i];
            let capacity = self.forest.arcs[arc].capacity;
            self.forest.arcs[arc].flow = capacity;
            let to = self.forest.arcs[arc].to;
            self.forest.nodes[to].excess += capacity;
        }

        for i in 0..self.forest.nodes[sink].number_out_of_tree {
            let arc = self.forest.nodes[sink].out_of_tree[i];
            let capacity = self.forest.arcs[arc].capacity;
            self.forest.arcs[arc].flow = capacity;
            let from = self.forest.arcs[arc].from;
            self.forest.nodes[from].excess -= capacity;
        }

        self.forest.nodes[source].excess = Flow::zero();
        self.forest.nodes[sink].excess = Flow::zero();

        for u in 0..self.forest.num_nodes {
            if self.forest.nodes[u].excess > Flow::zero() {
                self.forest.nodes[u].label = 1;
                self.forest.label_count[1] += 1;
                self.forest.add_to_strong_bucket(u, self.config.fifo_buckets);
            }
        }

        self.forest.nodes[source].label = self.forest.num_nodes;
        self.forest.nodes[sink].label = 0;
        self.forest.label_count[0] = (self.forest.num_nodes - 2) - self.forest.label_count[1];
    }

    fn flow_phase_one(&mut self) {
        if self.config.lowest_label {
            while let Some(root) = self.get_lowest_strong_root() {
                self.process_root(root);
            }
        } else {
            while let Some(root) = self.get_highest_strong_root() {
                self.process_root(root);
            }
        }
    }

    fn get_highest_strong_root(&mut self) -> Option<usize> {
        let mut i = self.highest_strong_label;
        while i > 0 {
            if !self.forest.roots[i].is_empty() {
                self.highest_strong_label = i;
                if self.forest.label_count[i - 1] > 0 {
                    return self.forest.pop_strong_root(i);
                }

                // a gap: nothing below can absorb these roots, retire them
                while let Some(root) = self.forest.pop_strong_root(i) {
                    self.stats.gaps += 1;
                    self.forest.lift_all(root);
                }
            }
            i -= 1;
        }

        if self.forest.roots[0].is_empty() {
            return None;
        }

        while let Some(root) = self.forest.pop_strong_root(0) {
            self.forest.nodes[root].label = 1;
            self.forest.label_count[0] -= 1;
            self.forest.label_count[1] += 1;
            self.stats.relabels += 1;
            self.forest.add_to_strong_bucket(root, self.config.fifo_buckets);
        }

        self.highest_strong_label = 1;
        self.forest.pop_strong_root(1)
    }

    fn get_lowest_strong_root(&mut self) -> Option<usize> {
        if self.lowest_strong_label == 0 {
            while let Some(root) = self.forest.pop_strong_root(0) {
                self.forest.nodes[root].label = 1;
                self.forest.label_count[0] -= 1;
                self.forest.label_count[1] += 1;
                self.stats.relabels += 1;
                self.forest.add_to_strong_bucket(root, self.config.fifo_buckets);
            }
            self.lowest_strong_label = 1;
        }

        for i in self.lowest_strong_label..self.forest.num_nodes {
            if !self.forest.roots[i].is_empty() {
                self.lowest_strong_label = i;
                if self.forest.label_count[i - 1] == 0 {
                    self.stats.gaps += 1;
                    return None;
                }
                return self.forest.pop_strong_root(i);
            }
        }

        self.lowest_strong_label = self.forest.num_nodes;
        None
    }

    fn process_root(&mut self, root: usize) {
        let mut strong_node = root;
        self.forest.nodes[root].next_scan = self.forest.nodes[root].child_list;

        if let Some((arc, weak_node)) = self.find_weak_node(root) {
            self.merge(weak_node, root, arc);
            self.push_excess(root);
            return;
        }
        self.check_children(root);

        loop {
            while self.forest.nodes[strong_node].next_scan != usize::MAX {
                let temp = self.forest.nodes[strong_node].next_scan;
                self.forest.nodes[strong_node].next_scan = self.forest.nodes[temp].next;
                strong_node = temp;
                self.forest.nodes[strong_node].next_scan = self.forest.nodes[strong_node].child_list;

                if let Some((arc, weak_node)) = self.find_weak_node(strong_node) {
                    self.merge(weak_node, strong_node, arc);
                    self.push_excess(root);
                    return;
                }
                self.check_children(strong_node);
            }

            match self.forest.nodes[strong_node].parent {
                usize::MAX => break,
                parent => {
                    strong_node = parent;
                    self.check_children(strong_node);
                }
            }
        }

        self.forest.add_to_strong_bucket(root, self.config.fifo_buckets);
        if !self.config.lowest_label {
            self.highest_strong_label += 1;
        }
    }

    fn merge(&mut self, parent: usize, child: usize, new_arc: usize) {
        self.stats.mergers += 1;
        self.forest.merge(parent, child, new_arc);
    }

    // scan the out-of-tree pool from next_arc for an endpoint one label below
    // the strong target; on a hit the arc is swap-removed from the pool
    fn find_weak_node(&mut self, u: usize) -> Option<(usize, usize)> {
        let strong_label =
            if self.config.lowest_label { self.lowest_strong_label } else { self.highest_strong_label };
        let target = strong_label - 1;

        let size = self.forest.nodes[u].number_out_of_tree;
        let mut i = self.forest.nodes[u].next_arc;
        while i < size {
            self.stats.arc_scans += 1;
            let arc = self.forest.nodes[u].out_of_tree[i];
            let (from, to) = (self.forest.arcs[arc].from, self.forest.arcs[arc].to);

            if self.forest.nodes[to].label == target {
                self.forest.nodes[u].next_arc = i;
                self.forest.remove_out_of_tree_arc(u, i);
                return Some((arc, to));
            }
            if self.forest.nodes[from].label == target {
                self.forest.nodes[u].next_arc = i;
                self.forest.remove_out_of_tree_arc(u, i);
                return Some((arc, from));
            }
            i += 1;
        }

        self.forest.nodes[u].next_arc = self.forest.nodes[u].number_out_of_tree;
        None
    }

    // advance next_scan looking for a child on the node's own label; if none
    // remains the node is relabelled one step up and its arc cursor reset
    fn check_children(&mut self, u: usize) {
        while self.forest.nodes[u].next_scan != usize::MAX {
            let scan = self.forest.nodes[u].next_scan;
            if self.forest.nodes[scan].label == self.forest.nodes[u].label {
                return;
            }
            self.forest.nodes[u].next_scan = self.forest.nodes[scan].next;
        }

        let label = self.forest.nodes[u].label;
        self.forest.label_count[label] -= 1;
        self.forest.nodes[u].label = label + 1;
        self.forest.label_count[label + 1] += 1;
        self.stats.relabels += 1;

        self.forest.nodes[u].next_arc = 0;
    }

    fn push_excess(&mut self, root: usize) {
        let mut current = root;
        let mut prev_excess = Flow::one();

        while self.forest.nodes[current].excess != Flow::zero()
            && self.forest.nodes[current].parent != usize::MAX
            && self.forest.nodes[current].arc_to_parent != usize::MAX
        {
            let parent = self.forest.nodes[current].parent;
            prev_excess = self.forest.nodes[parent].excess;

            let arc = self.forest.nodes[current].arc_to_parent;
            if self.forest.arcs[arc].direction {
                let residual = self.forest.arcs[arc].capacity - self.forest.arcs[arc].flow;
                self.push_upward(arc, current, parent, residual);
            } else {
                let flow = self.forest.arcs[arc].flow;
                self.push_downward(arc, current, parent, flow);
            }
            current = parent;
        }

        if self.forest.nodes[current].excess > Flow::zero() && prev_excess <= Flow::zero() {
            if self.config.lowest_label {
                self.lowest_strong_label = self.forest.nodes[current].label;
            }
            self.forest.add_to_strong_bucket(current, self.config.fifo_buckets);
        }
    }

    fn push_upward(&mut self, arc: usize, child: usize, parent: usize, residual: Flow) {
        self.stats.pushes += 1;

        let excess = self.forest.nodes[child].excess;
        if residual >= excess {
            self.forest.nodes[parent].excess += excess;
            self.forest.arcs[arc].flow += excess;
            self.forest.nodes[child].excess = Flow::zero();
            return;
        }

        // the arc saturates: the child is cut loose and becomes a strong root
        self.forest.arcs[arc].direction = false;
        self.forest.nodes[parent].excess += residual;
        self.forest.nodes[child].excess -= residual;
        let capacity = self.forest.arcs[arc].capacity;
        self.forest.arcs[arc].flow = capacity;
        self.forest.add_out_of_tree_arc(parent, arc);
        self.forest.break_relationship(parent, child);
        if self.config.lowest_label {
            self.lowest_strong_label = self.forest.nodes[child].label;
        }
        self.forest.add_to_strong_bucket(child, self.config.fifo_buckets);
    }

    fn push_downward(&mut self, arc: usize, child: usize, parent: usize, flow: Flow) {
        self.stats.pushes += 1;

        let excess = self.forest.nodes[child].excess;
        if flow >= excess {
            self.forest.nodes[parent].excess += excess;
            self.forest.arcs[arc].flow -= excess;
            self.forest.nodes[child].excess = Flow::zero();
            return;
        }

        self.forest.arcs[arc].direction = true;
        self.forest.nodes[child].excess -= flow;
        self.forest.nodes[parent].excess += flow;
        self.forest.arcs[arc].flow = Flow::zero();
        self.forest.add_out_of_tree_arc(parent, arc);
        self.forest.break_relationship(parent, child);
        if self.config.lowest_label {
            self.lowest_strong_label = self.forest.nodes[child].label;
        }
        self.forest.add_to_strong_bucket(child, self.config.fifo_buckets);
    }

    #[inline]
    fn gap(&self) -> usize {
        if self.config.lowest_label {
            self.lowest_strong_label
        } else {
            self.forest.num_nodes
        }
    }

    fn recover_flow(&mut self) {
        let gap = self.gap();
        let (source, sink) = (self.forest.source, self.forest.sink);
        let mut iteration: usize = 1;

        // cancel leftover negative excess against the pre-saturated sink arcs
        for i in 0..self.forest.nodes[sink].number_out_of_tree {
            let arc = self.forest.nodes[sink].out_of_tree[i];
            let from = self.forest.arcs[arc].from;
            if self.forest.nodes[from].excess < Flow::zero() {
                let excess = self.forest.nodes[from].excess;
                let flow = self.forest.arcs[arc].flow;
                if excess + flow < Flow::zero() {
                    self.forest.nodes[from].excess += flow;
                    self.forest.arcs[arc].flow = Flow::zero();
                } else {
                    self.forest.arcs[arc].flow = excess + flow;
                    self.forest.nodes[from].excess = Flow::zero();
                }
            }
        }

        // the source arcs take part in the decomposition from their head node
        for i in 0..self.forest.nodes[source].number_out_of_tree {
            let arc = self.forest.nodes[source].out_of_tree[i];
            let to = self.forest.arcs[arc].to;
            self.forest.add_out_of_tree_arc(to, arc);
        }

        self.forest.nodes[source].excess = Flow::zero();
        self.forest.nodes[sink].excess = Flow::zero();

        for u in 0..self.forest.num_nodes {
            if u == source || u == sink {
                continue;
            }

            if self.forest.nodes[u].label >= gap {
                self.forest.nodes[u].next_arc = 0;
                if self.forest.nodes[u].parent != usize::MAX {
                    let arc = self.forest.nodes[u].arc_to_parent;
                    if self.forest.arcs[arc].flow != Flow::zero() {
                        let to = self.forest.arcs[arc].to;
                        self.forest.add_out_of_tree_arc(to, arc);
                    }
                }

                let mut j = 0;
                while j < self.forest.nodes[u].number_out_of_tree {
                    let arc = self.forest.nodes[u].out_of_tree[j];
                    if self.forest.arcs[arc].flow == Flow::zero() {
                        self.forest.remove_out_of_tree_arc(u, j);
                    } else {
                        j += 1;
                    }
                }

                self.forest.sort_out_of_tree(u);
            }
        }

        for u in 0..self.forest.num_nodes {
            while self.forest.nodes[u].excess > Flow::zero() {
                iteration += 1;
                self.decompose(u, &mut iteration);
            }
        }
    }

    // trace the excess back along flow-carrying arcs until the source or a
    // cycle closes; cancel the bottleneck along whatever was found
    fn decompose(&mut self, excess_node: usize, iteration: &mut usize) {
        let source = self.forest.source;
        let mut current = excess_node;
        let mut bottleneck = self.forest.nodes[excess_node].excess;

        while current != source && self.forest.nodes[current].visited < *iteration {
            self.forest.nodes[current].visited = *iteration;
            let arc = self.forest.nodes[current].out_of_tree[self.forest.nodes[current].next_arc];
            if self.forest.arcs[arc].flow < bottleneck {
                bottleneck = self.forest.arcs[arc].flow;
            }
            current = self.forest.arcs[arc].from;
        }

        if current == source {
            self.forest.nodes[excess_node].excess -= bottleneck;

            let mut current = excess_node;
            while current != source {
                let arc = self.forest.nodes[current].out_of_tree[self.forest.nodes[current].next_arc];
                self.forest.arcs[arc].flow -= bottleneck;
                if self.forest.arcs[arc].flow != Flow::zero() {
                    self.forest.minisort(current);
                } else {
                    self.forest.nodes[current].next_arc += 1;
                }
                current = self.forest.arcs[arc].from;
            }
            return;
        }

        // the walk closed a cycle at `current`: find its bottleneck, cancel it
        *iteration += 1;

        bottleneck = self.forest.arcs[self.forest.nodes[current].out_of_tree[self.forest.nodes[current].next_arc]].flow;
        while self.forest.nodes[current].visited < *iteration {
            self.forest.nodes[current].visited = *iteration;
            let arc = self.forest.nodes[current].out_of_tree[self.forest.nodes[current].next_arc];
            if self.forest.arcs[arc].flow < bottleneck {
                bottleneck = self.forest.arcs[arc].flow;
            }
            current = self.forest.arcs[arc].from;
        }

        *iteration += 1;

        while self.forest.nodes[current].visited < *iteration {
            self.forest.nodes[current].visited = *iteration;
            let arc = self.forest.nodes[current].out_of_tree[self.forest.nodes[current].next_arc];
            self.forest.arcs[arc].flow -= bottleneck;
            if self.forest.arcs[arc].flow != Flow::zero() {
                self.forest.minisort(current);
            } else {
                self.forest.nodes[current].next_arc += 1;
            }
            current = self.forest.arcs[arc].from;
        }
    }

    /// Check the recovered flow against capacity, balance and the labelled
    /// cut. Discrepancies are reported, never raised as errors.
    pub fn check_optimality(&self) -> Verification<Flow> {
        let gap = self.gap();
        let mut mincut = Flow::zero();
        let mut excess = vec![Flow::zero(); self.forest.num_nodes];
        let mut violations = Vec::new();

        for arc in self.forest.arcs.iter() {
            if self.forest.nodes[arc.from].label >= gap && self.forest.nodes[arc.to].label < gap {
                mincut += arc.capacity;
            }
            if arc.flow > arc.capacity || arc.flow < Flow::zero() {
                violations.push(Violation::Capacity {
                    from: arc.from,
                    to: arc.to,
                    flow: arc.flow,
                    capacity: arc.capacity,
                });
            }
            excess[arc.from] -= arc.flow;
            excess[arc.to] += arc.flow;
        }

        for u in 0..self.forest.num_nodes {
            if u != self.forest.source && u != self.forest.sink && excess[u] != Flow::zero() {
                violations.push(Violation::Balance { node: u, excess: excess[u] });
            }
        }

        let feasible = violations.is_empty();
        let optimal = excess[self.forest.sink] == mincut;
        Verification { mincut, feasible, optimal, violations }
    }

    /// Nodes on the source side of the minimum s-t cut.
    pub fn source_set(&self) -> Vec<usize> {
        let gap = self.gap();
        (0..self.forest.num_nodes).filter(|&u| self.forest.nodes[u].label >= gap).collect()
    }

    /// Per-arc flows in arc storage order.
    pub fn arc_flows(&self) -> impl Iterator<Item = (usize, usize, Flow)> + '_ {
        self.forest.arcs.iter().map(|arc| (arc.from, arc.to, arc.flow))
    }

    pub fn stats_json(&self) -> String {
        serde_json::to_string(&self.stats).unwrap_or_default()
    }

    pub fn config_json(&self) -> String {
        serde_json::to_string(&self.config).unwrap_or_default()
    }

    pub fn times_json(&self) -> String {
        serde_json::json!({
            "simpleInitialization": format!("{:?}", self.times.initialize),
            "flowPhaseOne": format!("{:?}", self.times.flow),
            "recoverFlow": format!("{:?}", self.times.recover),
            "total": format!("{:?}", self.times.total),
        })
        .to_string()
    }
}

#[cfg(test)]
mod test {
    use crate::maximum_flow::graph::Graph;
    use crate::maximum_flow::pseudoflow::{Config, Pseudoflow};
    use crate::maximum_flow::status::Status;
    use rstest::rstest;

    fn build_graph(num_nodes: usize, arcs: &[(usize, usize, i64)]) -> Graph<i64> {
        let mut graph = Graph::default();
        graph.add_nodes(num_nodes);
        for &(from, to, capacity) in arcs {
            graph.add_directed_edge(from, to, capacity).unwrap();
        }
        graph
    }

    fn solve_with(
        config: Config,
        num_nodes: usize,
        arcs: &[(usize, usize, i64)],
        source: usize,
        sink: usize,
    ) -> (Graph<i64>, Pseudoflow<i64>) {
        let mut graph = build_graph(num_nodes, arcs);
        let mut solver = Pseudoflow::new(config);
        assert_eq!(solver.solve(source, sink, &mut graph), Status::Optimal);
        (graph, solver)
    }

    const CANONICAL: [(usize, usize, i64); 8] = [
        (0, 1, 5),
        (0, 2, 15),
        (1, 3, 5),
        (1, 4, 5),
        (2, 3, 5),
        (2, 4, 5),
        (3, 5, 15),
        (4, 5, 5),
    ];

    #[rstest]
    #[case(false, false)]
    #[case(false, true)]
    #[case(true, false)]
    #[case(true, true)]
    fn canonical_network_all_policies(#[case] lowest_label: bool, #[case] fifo_buckets: bool) {
        let config = Config { lowest_label, fifo_buckets, display_cut: false };
        let (graph, solver) = solve_with(config, 6, &CANONICAL, 0, 5);

        let check = solver.check_optimality();
        assert!(check.feasible, "violations: {:?}", check.violations);
        assert!(check.optimal);
        assert_eq!(check.mincut, 15);
        assert_eq!(graph.maximum_flow(0), 15);
    }

    #[test]
    fn canonical_network_reference_flows() {
        let (graph, solver) = solve_with(Config::default(), 6, &CANONICAL, 0, 5);

        // per-edge flows of the reference run (highest label, LIFO)
        let flows: Vec<i64> = (0..graph.num_edges()).map(|e| graph.get_edge(e).unwrap().flow).collect();
        assert_eq!(flows, vec![5, 10, 5, 0, 5, 5, 10, 5]);

        assert_eq!(solver.source_set(), vec![0, 2]);
    }

    #[rstest]
    #[case(false, false)]
    #[case(false, true)]
    #[case(true, false)]
    #[case(true, true)]
    fn chain_bottleneck(#[case] lowest_label: bool, #[case] fifo_buckets: bool) {
        let config = Config { lowest_label, fifo_buckets, display_cut: false };
        let (graph, solver) = solve_with(config, 4, &[(0, 1, 7), (1, 2, 3), (2, 3, 9)], 0, 3);
        assert_eq!(solver.check_optimality().mincut, 3);
        assert_eq!(graph.maximum_flow(0), 3);
    }

    #[rstest]
    #[case(false, false)]
    #[case(false, true)]
    #[case(true, false)]
    #[case(true, true)]
    fn parallel_arcs_feed_one_bottleneck(#[case] lowest_label: bool, #[case] fifo_buckets: bool) {
        let config = Config { lowest_label, fifo_buckets, display_cut: false };
        let (graph, solver) = solve_with(config, 3, &[(0, 1, 5), (0, 1, 5), (1, 2, 5)], 0, 2);
        assert_eq!(solver.check_optimality().mincut, 5);
        assert_eq!(graph.maximum_flow(0), 5);
    }

    #[rstest]
    #[case(false, false)]
    #[case(false, true)]
    #[case(true, false)]
    #[case(true, true)]
    fn bipartite_two_by_two(#[case] lowest_label: bool, #[case] fifo_buckets: bool) {
        let config = Config { lowest_label, fifo_buckets, display_cut: false };
        let arcs = [(0, 1, 10), (0, 2, 10), (1, 3, 10), (2, 3, 10)];
        let (graph, solver) = solve_with(config, 4, &arcs, 0, 3);
        assert_eq!(solver.check_optimality().mincut, 20);
        assert_eq!(graph.maximum_flow(0), 20);
    }

    #[rstest]
    #[case(false, false)]
    #[case(false, true)]
    #[case(true, false)]
    #[case(true, true)]
    fn disconnected_sink(#[case] lowest_label: bool, #[case] fifo_buckets: bool) {
        let config = Config { lowest_label, fifo_buckets, display_cut: false };
        let (graph, solver) = solve_with(config, 4, &[(0, 1, 3), (1, 2, 3)], 0, 3);

        let check = solver.check_optimality();
        assert!(check.feasible && check.optimal);
        assert_eq!(check.mincut, 0);
        for e in 0..graph.num_edges() {
            assert_eq!(graph.get_edge(e).unwrap().flow, 0);
        }
    }

    #[test]
    fn direct_source_to_sink_arc() {
        let (graph, solver) = solve_with(Config::default(), 2, &[(0, 1, 42)], 0, 1);
        assert_eq!(solver.check_optimality().mincut, 42);
        assert_eq!(graph.get_edge(0).unwrap().flow, 42);
    }

    #[test]
    fn degenerate_arcs_are_ignored() {
        // self loop, arc into the source, arc out of the sink
        let arcs = [(0, 1, 4), (1, 1, 9), (1, 0, 9), (2, 1, 9), (1, 2, 4)];
        let (graph, solver) = solve_with(Config::default(), 3, &arcs, 0, 2);
        let check = solver.check_optimality();
        assert!(check.feasible && check.optimal);
        assert_eq!(check.mincut, 4);
        assert_eq!(graph.maximum_flow(0), 4);
    }

    #[test]
    fn bad_input_is_rejected() {
        let mut graph = build_graph(3, &[(0, 1, 1)]);
        let mut solver = Pseudoflow::new(Config::default());
        assert_eq!(solver.solve(0, 0, &mut graph), Status::BadInput);
        assert_eq!(solver.solve(0, 3, &mut graph), Status::BadInput);
        assert_eq!(solver.solve(3, 0, &mut graph), Status::BadInput);
    }

    #[test]
    fn stats_start_at_zero_and_accumulate() {
        let solver = Pseudoflow::<i64>::new(Config::default());
        let stats = solver.stats();
        assert_eq!((stats.pushes, stats.mergers, stats.relabels, stats.gaps, stats.arc_scans), (0, 0, 0, 0, 0));

        let (_, solver) = solve_with(Config::default(), 6, &CANONICAL, 0, 5);
        let stats = solver.stats();
        assert!(stats.pushes > 0);
        assert!(stats.mergers > 0);
        assert!(stats.arc_scans > 0);
    }

    #[test]
    fn solver_can_be_reused() {
        let mut solver = Pseudoflow::new(Config::default());

        let mut graph = build_graph(6, &CANONICAL);
        assert_eq!(solver.solve(0, 5, &mut graph), Status::Optimal);
        assert_eq!(solver.check_optimality().mincut, 15);

        let mut graph = build_graph(4, &[(0, 1, 7), (1, 2, 3), (2, 3, 9)]);
        assert_eq!(solver.solve(0, 3, &mut graph), Status::Optimal);
        assert_eq!(solver.check_optimality().mincut, 3);
    }

    #[test]
    fn stats_json_uses_reference_field_names() {
        let solver = Pseudoflow::<i64>::new(Config::default());
        assert_eq!(
            solver.stats_json(),
            r#"{"pushes":0,"mergers":0,"relabels":0,"gaps":0,"arcScans":0}"#
        );
    }

    #[test]
    fn config_json_round_trips() {
        let config = Config { lowest_label: true, fifo_buckets: false, display_cut: true };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"lowestLabel":true,"fifoBuckets":false,"displayCut":true}"#);
        assert_eq!(serde_json::from_str::<Config>(&json).unwrap(), config);
    }
}
