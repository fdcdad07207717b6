use crate::maximum_flow::forest::SpanningForest;
use num_traits::NumAssign;
use std::ops::Neg;

// intrusive list of strong roots sharing one label, linked through node.next
#[derive(Debug, Clone, Copy)]
pub(crate) struct Root {
    pub(crate) start: usize,
    pub(crate) end: usize,
}

impl Root {
    pub(crate) fn new() -> Self {
        Root { start: usize::MAX, end: usize::MAX }
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.start == usize::MAX
    }
}

impl<Flow> SpanningForest<Flow>
where
    Flow: NumAssign + Neg<Output = Flow> + Ord + Copy,
{
    // a node lives on its parent's child list or in one bucket, never both
    pub(crate) fn add_to_strong_bucket(&mut self, u: usize, fifo: bool) {
        let label = self.nodes[u].label;
        if fifo {
            if self.roots[label].is_empty() {
                self.roots[label].start = u;
                self.roots[label].end = u;
            } else {
                let end = self.roots[label].end;
                self.nodes[end].next = u;
                self.roots[label].end = u;
            }
            self.nodes[u].next = usize::MAX;
        } else {
            self.nodes[u].next = self.roots[label].start;
            self.roots[label].start = u;
        }
    }

    pub(crate) fn pop_strong_root(&mut self, label: usize) -> Option<usize> {
        let u = self.roots[label].start;
        if u == usize::MAX {
            return None;
        }
        self.roots[label].start = self.nodes[u].next;
        self.nodes[u].next = usize::MAX;
        Some(u)
    }
}
