//! Maximum s-t flow / minimum cut via Hochbaum's pseudoflow algorithm.
//!
//! The solver maintains a forest of normal trees over a directed capacitated
//! graph and merges excess-carrying trees into weak ones until no strong root
//! remains, then recovers a feasible arc flow by decomposition. Highest- or
//! lowest-label root selection and LIFO or FIFO bucket order are runtime
//! switches; all four combinations produce the same mincut value.
//!
//! ```
//! use pseudoflow::{Config, Graph, Pseudoflow, Status};
//!
//! let mut graph = Graph::default();
//! graph.add_nodes(4);
//! graph.add_directed_edge(0, 1, 7).unwrap();
//! graph.add_directed_edge(1, 2, 3).unwrap();
//! graph.add_directed_edge(2, 3, 9).unwrap();
//!
//! let mut solver = Pseudoflow::new(Config::default());
//! assert_eq!(solver.solve(0, 3, &mut graph), Status::Optimal);
//! assert_eq!(graph.maximum_flow(0), 3);
//! ```
//!
//! [`dimacs`] reads the DIMACS max-flow text format and writes results in the
//! reference output format, line for line.

pub mod dimacs;
pub mod maximum_flow;

pub use maximum_flow::graph::{Edge, Graph};
pub use maximum_flow::pseudoflow::{Config, PhaseTimes, Pseudoflow, Statistics, Verification, Violation};
pub use maximum_flow::status::Status;
