use crate::maximum_flow::bucket::Root;
use crate::maximum_flow::graph::Graph;
use num_traits::NumAssign;
use std::ops::Neg;

#[derive(Debug)]
pub(crate) struct Node<Flow> {
    pub(crate) label: usize,
    pub(crate) excess: Flow,
    pub(crate) num_adjacent: usize,

    // tree linkage; usize::MAX means none
    pub(crate) parent: usize,
    pub(crate) child_list: usize,
    pub(crate) next: usize, // sibling in the parent's child list, or bucket link, never both
    pub(crate) next_scan: usize,
    pub(crate) arc_to_parent: usize,

    // out-of-tree arc pool; the first number_out_of_tree entries are live
    pub(crate) out_of_tree: Vec<usize>,
    pub(crate) number_out_of_tree: usize,
    pub(crate) next_arc: usize,

    pub(crate) visited: usize,
}

impl<Flow> Node<Flow>
where
    Flow: NumAssign + Copy,
{
    fn new() -> Self {
        Node {
            label: 0,
            excess: Flow::zero(),
            num_adjacent: 0,
            parent: usize::MAX,
            child_list: usize::MAX,
            next: usize::MAX,
            next_scan: usize::MAX,
            arc_to_parent: usize::MAX,
            out_of_tree: Vec::new(),
            number_out_of_tree: 0,
            next_arc: 0,
            visited: 0,
        }
    }
}

#[derive(Debug)]
pub(crate) struct Arc<Flow> {
    pub(crate) from: usize,
    pub(crate) to: usize,
    pub(crate) flow: Flow,
    pub(crate) capacity: Flow,
    // true: the arc agrees with the tree edge from child to parent
    pub(crate) direction: bool,
}

#[derive(Default)]
pub(crate) struct SpanningForest<Flow> {
    pub(crate) num_nodes: usize,
    pub(crate) num_arcs: usize,
    pub(crate) source: usize,
    pub(crate) sink: usize,

    pub(crate) nodes: Vec<Node<Flow>>,
    pub(crate) arcs: Vec<Arc<Flow>>,
    pub(crate) roots: Vec<Root>,
    pub(crate) label_count: Vec<usize>,
    pub(crate) edge_to_arc: Vec<usize>,
}

impl<Flow> SpanningForest<Flow>
where
    Flow: NumAssign + Neg<Output = Flow> + Ord + Copy,
{
    pub(crate) fn build(&mut self, graph: &Graph<Flow>, source: usize, sink: usize) {
        (self.num_nodes, self.num_arcs) = (graph.num_nodes(), graph.num_edges());
        (self.source, self.sink) = (source, sink);

        self.nodes = (0..self.num_nodes).map(|_| Node::new()).collect();
        self.arcs = (0..self.num_arcs)
            .map(|_| Arc { from: 0, to: 0, flow: Flow::zero(), capacity: Flow::zero(), direction: true })
            .collect();
        self.roots = vec![Root::new(); self.num_nodes];
        self.label_count = vec![0; self.num_nodes];
        self.edge_to_arc = vec![usize::MAX; self.num_arcs];

        // odd endpoint sums fill the arc array from the front, even sums from
        // the back; the storage order decides the output order
        let mut first = 0;
        let mut last = self.num_arcs.wrapping_sub(1);
        for (edge_id, edge) in graph.edges.iter().enumerate() {
            let slot = if (edge.from + edge.to) % 2 != 0 {
                first += 1;
                first - 1
            } else {
                let slot = last;
                last = last.wrapping_sub(1);
                slot
            };
            self.arcs[slot] = Arc { from: edge.from, to: edge.to, flow: Flow::zero(), capacity: edge.capacity, direction: true };
            self.edge_to_arc[edge_id] = slot;
            self.nodes[edge.from].num_adjacent += 1;
            self.nodes[edge.to].num_adjacent += 1;
        }

        for node in self.nodes.iter_mut() {
            node.out_of_tree = vec![usize::MAX; node.num_adjacent];
        }

        // route every arc to the pool that scans it; the case order matters
        for i in 0..self.num_arcs {
            let (from, to) = (self.arcs[i].from, self.arcs[i].to);
            if source == to || sink == from || from == to {
                continue;
            }
            if from == source && to == sink {
                self.arcs[i].flow = self.arcs[i].capacity;
            } else if from == source || to != sink {
                self.add_out_of_tree_arc(from, i);
            } else if to == sink {
                self.add_out_of_tree_arc(to, i);
            } else {
                self.add_out_of_tree_arc(from, i);
            }
        }
    }

    pub(crate) fn set_flow(&self, graph: &mut Graph<Flow>) {
        for edge_id in 0..graph.num_edges() {
            let i = self.edge_to_arc[edge_id];
            graph.edges[edge_id].flow = self.arcs[i].flow;
        }
    }

    #[inline]
    pub(crate) fn add_out_of_tree_arc(&mut self, u: usize, arc: usize) {
        let node = &mut self.nodes[u];
        debug_assert!(node.number_out_of_tree < node.num_adjacent);
        node.out_of_tree[node.number_out_of_tree] = arc;
        node.number_out_of_tree += 1;
    }

    // O(1) delete by swapping in the tail entry
    #[inline]
    pub(crate) fn remove_out_of_tree_arc(&mut self, u: usize, i: usize) {
        let node = &mut self.nodes[u];
        node.number_out_of_tree -= 1;
        node.out_of_tree[i] = node.out_of_tree[node.number_out_of_tree];
    }

    pub(crate) fn add_relationship(&mut self, parent: usize, child: usize) {
        self.nodes[child].parent = parent;
        self.nodes[child].next = self.nodes[parent].child_list;
        self.nodes[parent].child_list = child;
    }

    pub(crate) fn break_relationship(&mut self, parent: usize, child: usize) {
        self.nodes[child].parent = usize::MAX;

        if self.nodes[parent].child_list == child {
            self.nodes[parent].child_list = self.nodes[child].next;
            self.nodes[child].next = usize::MAX;
            return;
        }

        let mut current = self.nodes[parent].child_list;
        while self.nodes[current].next != child {
            current = self.nodes[current].next;
        }
        self.nodes[current].next = self.nodes[child].next;
        self.nodes[child].next = usize::MAX;
    }

    // re-point each ancestor of child in turn so that child hangs under parent
    // via new_arc; every rotated tree arc reverses its direction
    pub(crate) fn merge(&mut self, parent: usize, child: usize, new_arc: usize) {
        let mut current = child;
        let mut new_parent = parent;
        let mut new_arc = new_arc;

        while self.nodes[current].parent != usize::MAX {
            let old_arc = self.nodes[current].arc_to_parent;
            self.nodes[current].arc_to_parent = new_arc;
            let old_parent = self.nodes[current].parent;
            self.break_relationship(old_parent, current);
            self.add_relationship(new_parent, current);

            new_parent = current;
            current = old_parent;
            new_arc = old_arc;
            self.arcs[new_arc].direction = !self.arcs[new_arc].direction;
        }

        self.nodes[current].arc_to_parent = new_arc;
        self.add_relationship(new_parent, current);
    }

    // retire the whole subtree: every node is raised to label num_nodes
    pub(crate) fn lift_all(&mut self, root: usize) {
        let mut current = root;
        self.nodes[current].next_scan = self.nodes[current].child_list;
        self.label_count[self.nodes[current].label] -= 1;
        self.nodes[current].label = self.num_nodes;

        loop {
            while self.nodes[current].next_scan != usize::MAX {
                let temp = self.nodes[current].next_scan;
                self.nodes[current].next_scan = self.nodes[temp].next;
                current = temp;
                self.nodes[current].next_scan = self.nodes[current].child_list;

                self.label_count[self.nodes[current].label] -= 1;
                self.nodes[current].label = self.num_nodes;
            }

            match self.nodes[current].parent {
                usize::MAX => break,
                parent => current = parent,
            }
        }
    }

    pub(crate) fn validate_label_counts(&self) -> bool {
        let mut count = vec![0; self.num_nodes];
        for u in 0..self.num_nodes {
            if u == self.source || u == self.sink {
                continue;
            }
            let label = self.nodes[u].label;
            if label < self.num_nodes {
                count[label] += 1;
            }
        }
        count == self.label_count
    }

    pub(crate) fn sort_out_of_tree(&mut self, u: usize) {
        let size = self.nodes[u].number_out_of_tree;
        if size > 1 {
            Self::quick_sort(&self.arcs, &mut self.nodes[u].out_of_tree, 0, size - 1);
        }
    }

    // re-insert the head entry into its position in the descending-flow order
    pub(crate) fn minisort(&mut self, u: usize) {
        let arcs = &self.arcs;
        let node = &mut self.nodes[u];

        let temp = node.out_of_tree[node.next_arc];
        let temp_flow = arcs[temp].flow;
        let size = node.number_out_of_tree;

        let mut i = node.next_arc + 1;
        while i < size && temp_flow < arcs[node.out_of_tree[i]].flow {
            node.out_of_tree[i - 1] = node.out_of_tree[i];
            i += 1;
        }
        node.out_of_tree[i - 1] = temp;
    }

    // descending by flow; median-of-three pivot, one bubble pass on small
    // ranges, exactly as the recovered flow assignment expects
    fn quick_sort(arcs: &[Arc<Flow>], arr: &mut [usize], first: usize, last: usize) {
        let (mut left, mut right) = (first, last);

        if right - left <= 5 {
            let mut i = right;
            while i > left {
                let mut swapped = false;
                for j in left..i {
                    if arcs[arr[j]].flow < arcs[arr[j + 1]].flow {
                        arr.swap(j, j + 1);
                        swapped = true;
                    }
                }
                if swapped {
                    return;
                }
                i -= 1;
            }
            return;
        }

        let mut pivot = (first + last) / 2;
        let x1 = arcs[arr[first]].flow;
        let x2 = arcs[arr[pivot]].flow;
        let x3 = arcs[arr[last]].flow;

        if x1 <= x2 {
            if x2 > x3 {
                pivot = left;
                if x1 <= x3 {
                    pivot = right;
                }
            }
        } else if x2 <= x3 {
            pivot = right;
            if x1 <= x3 {
                pivot = left;
            }
        }

        let pivot_flow = arcs[arr[pivot]].flow;
        arr.swap(first, pivot);

        left = first + 1;
        while left < right {
            if arcs[arr[left]].flow < pivot_flow {
                arr.swap(left, right);
                right -= 1;
            } else {
                left += 1;
            }
        }

        arr.swap(first, left);

        if first < left - 1 {
            Self::quick_sort(arcs, arr, first, left - 1);
        }
        if left + 1 < last {
            Self::quick_sort(arcs, arr, left + 1, last);
        }
    }
}
