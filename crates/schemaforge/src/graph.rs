//! Cross-model dependency graph and cycle detection.
//!
//! Built only after every model is composed, since resolving a reference
//! needs the full symbol universe. Cycles are reported, never rejected:
//! relation references render as deferred expressions, which tolerate
//! mutual recursion.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;

use serde::Serialize;

use schemaforge_mapper::ModelSchemaComposition;

/// A reference to a schema symbol that no generated model exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingDependency {
    /// Model holding the reference.
    pub model: String,
    /// Referenced schema symbol.
    pub symbol: String,
}

impl fmt::Display for MissingDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "model `{}` references `{}`, which is not generated",
            self.model, self.symbol
        )
    }
}

/// Result of [`build_graph`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphReport {
    /// Model name to the names of the models it references.
    pub edges: BTreeMap<String, BTreeSet<String>>,
    pub errors: Vec<MissingDependency>,
    /// Each cycle runs from its first node through the repeated node.
    pub cycles: Vec<Vec<String>>,
}

impl GraphReport {
    /// No missing dependencies and no cycles.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.cycles.is_empty()
    }

    /// Models referenced by `model`.
    pub fn dependencies_of(&self, model: &str) -> impl Iterator<Item = &str> {
        self.edges
            .get(model)
            .into_iter()
            .flat_map(|deps| deps.iter().map(String::as_str))
    }
}

/// Build the dependency graph over a set of compositions.
///
/// A model's references are its imported symbols minus its own symbol, the
/// library identifiers and enum symbols.
pub fn build_graph<'a, I>(compositions: I) -> GraphReport
where
    I: IntoIterator<Item = &'a ModelSchemaComposition>,
{
    let compositions: Vec<&ModelSchemaComposition> = compositions.into_iter().collect();
    let by_symbol: BTreeMap<&str, &str> = compositions
        .iter()
        .map(|c| (c.schema_symbol(), c.model_name.as_str()))
        .collect();

    let mut report = GraphReport::default();
    for composition in &compositions {
        let own = composition.schema_symbol();
        let deps = report
            .edges
            .entry(composition.model_name.clone())
            .or_default();

        for symbol in composition.imports.iter().filter_map(|i| i.model_symbol()) {
            if symbol == own {
                continue;
            }
            match by_symbol.get(symbol) {
                Some(target) => {
                    deps.insert((*target).to_string());
                }
                None => {
                    tracing::warn!(
                        target: "schemaforge::graph",
                        model = %composition.model_name,
                        symbol = %symbol,
                        "Reference to a model that is not generated"
                    );
                    report.errors.push(MissingDependency {
                        model: composition.model_name.clone(),
                        symbol: symbol.to_string(),
                    });
                }
            }
        }
    }

    report.cycles = find_cycles(&report.edges);
    for cycle in &report.cycles {
        tracing::warn!(
            target: "schemaforge::graph",
            cycle = %cycle.join(" -> "),
            "Circular model dependency"
        );
    }

    tracing::debug!(
        target: "schemaforge::graph",
        models = report.edges.len(),
        missing = report.errors.len(),
        cycles = report.cycles.len(),
        "Built dependency graph"
    );
    report
}

/// Depth-first search reporting one cycle per back edge.
pub fn find_cycles(edges: &BTreeMap<String, BTreeSet<String>>) -> Vec<Vec<String>> {
    struct Walk<'a> {
        edges: &'a BTreeMap<String, BTreeSet<String>>,
        visited: HashSet<&'a str>,
        stack: Vec<&'a str>,
        cycles: Vec<Vec<String>>,
    }

    impl<'a> Walk<'a> {
        fn visit(&mut self, node: &'a str) {
            if let Some(pos) = self.stack.iter().position(|n| *n == node) {
                let mut cycle: Vec<String> = self.stack[pos..]
                    .iter()
                    .map(|n| (*n).to_string())
                    .collect();
                cycle.push(node.to_string());
                self.cycles.push(cycle);
                return;
            }
            if !self.visited.insert(node) {
                return;
            }

            self.stack.push(node);
            let edges = self.edges;
            if let Some(next) = edges.get(node) {
                for dep in next {
                    self.visit(dep);
                }
            }
            self.stack.pop();
        }
    }

    let mut walk = Walk {
        edges,
        visited: HashSet::new(),
        stack: Vec::new(),
        cycles: Vec::new(),
    };
    for node in edges.keys() {
        walk.visit(node);
    }
    walk.cycles
}
