//! DIMACS max-flow text format: reader, result writer, and the read-write
//! entry point gluing them to the solver.

use crate::maximum_flow::graph::Graph;
use crate::maximum_flow::pseudoflow::{Config, Pseudoflow, Violation};
use crate::maximum_flow::status::Status;
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DimacsError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("line {line}: '{record}' entry wants {want} values, has {found}")]
    FieldCount { line: usize, record: char, want: usize, found: usize },

    #[error("line {line}: {source}")]
    ParseInt {
        line: usize,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("line {line}: unknown problem type '{got}', want 'max'")]
    ProblemType { line: usize, got: String },

    #[error("line {line}: multiple 'p' lines")]
    DuplicateHeader { line: usize },

    #[error("line {line}: '{record}' entry before the 'p' header")]
    RecordBeforeHeader { line: usize, record: char },

    #[error("line {line}: multiple '{designation}' n lines")]
    DuplicateTerminal { line: usize, designation: char },

    #[error("line {line}: unrecognized node designation '{got}'")]
    UnknownDesignation { line: usize, got: String },

    #[error("line {line}: node id {id} out of range 1..={max}")]
    NodeOutOfRange { line: usize, id: usize, max: usize },

    #[error("line {line}: negative capacity {capacity}")]
    NegativeCapacity { line: usize, capacity: i64 },

    #[error("line {line}: unknown data: {got}")]
    UnknownRecord { line: usize, got: String },

    #[error("missing 'p' header line")]
    MissingHeader,

    #[error("no source - 'n <id> s' - line")]
    MissingSource,

    #[error("no sink - 'n <id> t' - line")]
    MissingSink,

    #[error("want {want} 'a' records, have {found}")]
    ArcCount { want: usize, found: usize },

    #[error("source and sink are the same node ({0})")]
    SourceIsSink(usize),
}

/// A parsed and validated problem; node ids are 1-based as in the format.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    pub num_nodes: usize,
    pub num_arcs: usize,
    pub source: usize,
    pub sink: usize,
    pub arcs: Vec<(usize, usize, i64)>,
}

impl Instance {
    pub fn parse<R: BufRead>(reader: R) -> Result<Instance, DimacsError> {
        let mut header: Option<(usize, usize)> = None;
        let mut source: Option<usize> = None;
        let mut sink: Option<usize> = None;
        let mut arcs: Vec<(usize, usize, i64)> = Vec::new();

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            let number = i + 1;
            if line.is_empty() {
                continue;
            }

            let record = line.as_bytes()[0] as char;
            match record {
                'c' => continue,
                'p' => {
                    if header.is_some() {
                        return Err(DimacsError::DuplicateHeader { line: number });
                    }
                    let fields = Self::fields(line, number, 'p', 3)?;
                    if fields[1] != "max" {
                        return Err(DimacsError::ProblemType { line: number, got: fields[1].to_string() });
                    }
                    let num_nodes = Self::integer(fields[2], number)?;
                    let num_arcs = Self::integer(fields[3], number)?;
                    header = Some((num_nodes, num_arcs));
                    arcs.reserve(num_arcs);
                }
                'n' => {
                    let (num_nodes, _) =
                        header.ok_or(DimacsError::RecordBeforeHeader { line: number, record: 'n' })?;
                    let fields = Self::fields(line, number, 'n', 2)?;
                    let id = Self::node_id(fields[1], number, num_nodes)?;
                    match fields[2] {
                        "s" => {
                            if source.is_some() {
                                return Err(DimacsError::DuplicateTerminal { line: number, designation: 's' });
                            }
                            source = Some(id);
                        }
                        "t" => {
                            if sink.is_some() {
                                return Err(DimacsError::DuplicateTerminal { line: number, designation: 't' });
                            }
                            sink = Some(id);
                        }
                        got => {
                            return Err(DimacsError::UnknownDesignation { line: number, got: got.to_string() })
                        }
                    }
                }
                'a' => {
                    let (num_nodes, _) =
                        header.ok_or(DimacsError::RecordBeforeHeader { line: number, record: 'a' })?;
                    let fields = Self::fields(line, number, 'a', 3)?;
                    let from = Self::node_id(fields[1], number, num_nodes)?;
                    let to = Self::node_id(fields[2], number, num_nodes)?;
                    let capacity: i64 =
                        fields[3].parse().map_err(|source| DimacsError::ParseInt { line: number, source })?;
                    if capacity < 0 {
                        return Err(DimacsError::NegativeCapacity { line: number, capacity });
                    }
                    arcs.push((from, to, capacity));
                }
                _ => return Err(DimacsError::UnknownRecord { line: number, got: line.to_string() }),
            }
        }

        let (num_nodes, num_arcs) = header.ok_or(DimacsError::MissingHeader)?;
        let source = source.ok_or(DimacsError::MissingSource)?;
        let sink = sink.ok_or(DimacsError::MissingSink)?;
        if arcs.len() != num_arcs {
            return Err(DimacsError::ArcCount { want: num_arcs, found: arcs.len() });
        }
        if source == sink {
            return Err(DimacsError::SourceIsSink(source));
        }

        Ok(Instance { num_nodes, num_arcs, source, sink, arcs })
    }

    /// Batched load into the solver's graph; returns 0-based source and sink.
    pub fn to_graph(&self) -> (Graph<i64>, usize, usize) {
        let mut graph = Graph::default();
        graph.add_nodes(self.num_nodes);
        for &(from, to, capacity) in self.arcs.iter() {
            graph.add_directed_edge(from - 1, to - 1, capacity).unwrap();
        }
        (graph, self.source - 1, self.sink - 1)
    }

    fn fields<'a>(line: &'a str, number: usize, record: char, want: usize) -> Result<Vec<&'a str>, DimacsError> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != want + 1 {
            return Err(DimacsError::FieldCount { line: number, record, want, found: fields.len() - 1 });
        }
        Ok(fields)
    }

    fn integer(field: &str, number: usize) -> Result<usize, DimacsError> {
        field.parse().map_err(|source| DimacsError::ParseInt { line: number, source })
    }

    fn node_id(field: &str, number: usize, max: usize) -> Result<usize, DimacsError> {
        let id = Self::integer(field, number)?;
        if id < 1 || id > max {
            return Err(DimacsError::NodeOutOfRange { line: number, id, max });
        }
        Ok(id)
    }
}

/// Write the solve result in the reference output format. Node ids go back
/// out 1-based.
pub fn write_result<W: Write>(w: &mut W, solver: &Pseudoflow<i64>, header: Option<&str>) -> io::Result<()> {
    if let Some(header) = header {
        writeln!(w, "c {header}")?;
        writeln!(w, "c ")?;
    }
    writeln!(w, "c Dimacs-format maximum flow result generated by pseudo.go")?;
    writeln!(w, "c ")?;
    writeln!(w, "c Optimal flow using  Hochbaum's PseudoFlow algorithm")?;
    writeln!(w, "c ")?;
    writeln!(w, "c Runtime Configuration -")?;

    let config = solver.config();
    if config.lowest_label {
        writeln!(w, "c Lowest label pseudoflow algorithm")?;
    } else {
        writeln!(w, "c Highest label pseudoflow algorithm")?;
    }
    if config.fifo_buckets {
        writeln!(w, "c Using FIFO buckets")?;
    } else {
        writeln!(w, "c Using LIFO buckets")?;
    }

    let check = solver.check_optimality();
    for violation in check.violations.iter() {
        match *violation {
            Violation::Capacity { from, to, flow, capacity } => writeln!(
                w,
                "c Capacity constraint violated on arc ({}, {}). Flow = {}, capacity = {}",
                from + 1,
                to + 1,
                flow,
                capacity
            )?,
            Violation::Balance { node, excess } => {
                writeln!(w, "c Flow balance constraint violated in node {}. Excess = {}", node + 1, excess)?
            }
        }
    }
    if check.feasible {
        writeln!(w, "c ")?;
        writeln!(w, "c Solution checks as feasible")?;
    }
    if check.optimal {
        writeln!(w, "c ")?;
        writeln!(w, "c Solution checks as optimal")?;
    } else {
        writeln!(w, "c ")?;
        writeln!(w, "c Flow is not optimal - max flow does not equal min cut")?;
    }
    writeln!(w, "c ")?;
    writeln!(w, "c Solution")?;
    writeln!(w, "s {}", check.mincut)?;

    writeln!(w, "c ")?;
    if config.display_cut {
        writeln!(w, "c Nodes in source set of min s-t cut:")?;
        for u in solver.source_set() {
            writeln!(w, "n {}", u + 1)?;
        }
    } else {
        writeln!(w, "c SRC DST FLOW")?;
        for (from, to, flow) in solver.arc_flows() {
            writeln!(w, "f {} {} {}", from + 1, to + 1, flow)?;
        }
    }

    Ok(())
}

/// Parse a problem, solve it, and write the result; the solver is handed
/// back so callers can pick up stats and timings.
pub fn run<R: BufRead, W: Write>(
    reader: R,
    writer: &mut W,
    config: Config,
    header: Option<&str>,
) -> Result<Pseudoflow<i64>, DimacsError> {
    let instance = Instance::parse(reader)?;
    let (mut graph, source, sink) = instance.to_graph();

    let mut solver = Pseudoflow::new(config);
    let status = solver.solve(source, sink, &mut graph);
    debug_assert_eq!(status, Status::Optimal);

    write_result(writer, &solver, header)?;
    Ok(solver)
}

#[cfg(test)]
mod test {
    use crate::dimacs::{run, DimacsError, Instance};
    use crate::maximum_flow::pseudoflow::Config;

    const CANONICAL: &str = "\
c canonical 6-node maximum flow problem
p max 6 8
n 1 s
n 6 t
a 1 2 5
a 1 3 15
a 2 4 5
a 2 5 5
a 3 4 5
a 3 5 5
a 4 6 15
a 5 6 5
";

    const GOLDEN: &str = concat!(
        "c Dimacs-format maximum flow result generated by pseudo.go\n",
        "c \n",
        "c Optimal flow using  Hochbaum's PseudoFlow algorithm\n",
        "c \n",
        "c Runtime Configuration -\n",
        "c Highest label pseudoflow algorithm\n",
        "c Using LIFO buckets\n",
        "c \n",
        "c Solution checks as feasible\n",
        "c \n",
        "c Solution checks as optimal\n",
        "c \n",
        "c Solution\n",
        "s 15\n",
        "c \n",
        "c SRC DST FLOW\n",
        "f 1 2 5\n",
        "f 2 5 0\n",
        "f 3 4 5\n",
        "f 5 6 5\n",
        "f 4 6 10\n",
        "f 3 5 5\n",
        "f 2 4 5\n",
        "f 1 3 10\n",
    );

    #[test]
    fn parse_canonical() {
        let instance = Instance::parse(CANONICAL.as_bytes()).unwrap();
        assert_eq!(instance.num_nodes, 6);
        assert_eq!(instance.num_arcs, 8);
        assert_eq!(instance.source, 1);
        assert_eq!(instance.sink, 6);
        assert_eq!(instance.arcs[0], (1, 2, 5));
        assert_eq!(instance.arcs[7], (5, 6, 5));
    }

    #[test]
    fn parse_tolerates_blank_lines_and_whitespace() {
        let input = "\n  c comment\n\np max 2 1\n  n 1 s \nn 2 t\na 1 2 3\n\n";
        let instance = Instance::parse(input.as_bytes()).unwrap();
        assert_eq!((instance.num_nodes, instance.num_arcs), (2, 1));
    }

    #[test]
    fn parse_rejects_malformed_records() {
        let err = Instance::parse("p max 6\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DimacsError::FieldCount { record: 'p', want: 3, found: 2, .. }));

        let err = Instance::parse("p max 2 1\na 1 2\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DimacsError::FieldCount { record: 'a', want: 3, found: 2, .. }));

        let err = Instance::parse("p min 2 1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DimacsError::ProblemType { .. }));

        let err = Instance::parse("p max 2 1\np max 2 1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DimacsError::DuplicateHeader { line: 2 }));

        let err = Instance::parse("a 1 2 3\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DimacsError::RecordBeforeHeader { record: 'a', .. }));

        let err = Instance::parse("p max 2 1\nn 1 s\nn 2 s\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DimacsError::DuplicateTerminal { designation: 's', .. }));

        let err = Instance::parse("p max 2 1\nn 1 x\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DimacsError::UnknownDesignation { .. }));

        let err = Instance::parse("p max 2 1\nn 3 s\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DimacsError::NodeOutOfRange { id: 3, max: 2, .. }));

        let err = Instance::parse("p max 2 1\na 1 2 -4\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DimacsError::NegativeCapacity { capacity: -4, .. }));

        let err = Instance::parse("p max 2 1\nx 1 2\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DimacsError::UnknownRecord { .. }));

        let err = Instance::parse("p max 2 1\na 1 x 3\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DimacsError::ParseInt { .. }));
    }

    #[test]
    fn parse_rejects_inconsistent_problems() {
        let err = Instance::parse("".as_bytes()).unwrap_err();
        assert!(matches!(err, DimacsError::MissingHeader));

        let err = Instance::parse("p max 2 1\nn 2 t\na 1 2 3\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DimacsError::MissingSource));

        let err = Instance::parse("p max 2 1\nn 1 s\na 1 2 3\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DimacsError::MissingSink));

        let err = Instance::parse("p max 2 2\nn 1 s\nn 2 t\na 1 2 3\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DimacsError::ArcCount { want: 2, found: 1 }));

        let err = Instance::parse("p max 2 1\nn 1 s\nn 1 t\na 1 2 3\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DimacsError::SourceIsSink(1)));
    }

    #[test]
    fn error_messages_name_the_offense() {
        let err = Instance::parse("p max 6\n".as_bytes()).unwrap_err();
        assert_eq!(err.to_string(), "line 1: 'p' entry wants 3 values, has 2");

        let err = Instance::parse("p max 2 2\nn 1 s\nn 2 t\na 1 2 3\n".as_bytes()).unwrap_err();
        assert_eq!(err.to_string(), "want 2 'a' records, have 1");
    }

    #[test]
    fn reference_output_matches_byte_for_byte() {
        let mut out = Vec::new();
        let solver = run(CANONICAL.as_bytes(), &mut out, Config::default(), None).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), GOLDEN);
        assert!(solver.stats().pushes > 0);
    }

    #[test]
    fn header_comment_leads_the_output() {
        let mut out = Vec::new();
        run(CANONICAL.as_bytes(), &mut out, Config::default(), Some("Data: dimacsMaxf.txt")).unwrap();
        let out = String::from_utf8(out).unwrap();
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("c Data: dimacsMaxf.txt"));
        assert_eq!(lines.next(), Some("c "));
        assert_eq!(lines.next(), Some("c Dimacs-format maximum flow result generated by pseudo.go"));
    }

    #[test]
    fn cut_mode_lists_the_source_set() {
        let config = Config { display_cut: true, ..Config::default() };
        let mut out = Vec::new();
        run(CANONICAL.as_bytes(), &mut out, config, None).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.contains("s 15\n"));
        assert!(!out.contains("c SRC DST FLOW"));
        let tail: Vec<&str> = out.lines().rev().take(3).collect();
        assert_eq!(tail, vec!["n 3", "n 1", "c Nodes in source set of min s-t cut:"]);
    }

    #[test]
    fn all_policies_agree_on_the_mincut() {
        for lowest_label in [false, true] {
            for fifo_buckets in [false, true] {
                let config = Config { lowest_label, fifo_buckets, display_cut: false };
                let mut out = Vec::new();
                run(CANONICAL.as_bytes(), &mut out, config, None).unwrap();
                let out = String::from_utf8(out).unwrap();
                assert!(out.contains("\ns 15\n"), "config {config:?} disagreed:\n{out}");
            }
        }
    }
}
