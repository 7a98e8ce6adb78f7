use std::collections::HashMap;

use itertools::Itertools;

use super::pin::{PinId, PinOwner};
use super::Circuit;
use crate::common::ItemId;

pub struct GraphvizBuilder<'a> {
    circuit: &'a Circuit,
    labels: HashMap<ItemId, String>,
}

impl<'a> GraphvizBuilder<'a> {
    pub fn new(circuit: &'a Circuit) -> Self {
        Self {
            circuit,
            labels: HashMap::new(),
        }
    }

    pub fn with_labels(&mut self, labels: impl IntoIterator<Item = (ItemId, String)>) -> &mut Self {
        self.labels.extend(labels);
        self
    }

    pub fn build(&self, graph_name: &str) -> String {
        format!(
            r#"
digraph {graph_name} {{
    rankdir=LR
    graph [label="Sorting line circuit", splines=line, nodesep=0.8]
    node [shape=record]
{}
{}
}}
        "#,
            self.print_nodes(),
            self.print_edges(),
        )
    }

    fn node_name(owner: PinOwner) -> String {
        match owner {
            PinOwner::Gate(id) => format!("gate{}", id.0),
            PinOwner::Item(id) => format!("item{}", id.0),
        }
    }

    fn print_nodes(&self) -> String {
        let gates = self.circuit.gates().map(|gate| {
            format!(
                "    gate{} [label=\"{} | {}\"]",
                gate.id().0,
                gate.kind(),
                gate.output_pins()
                    .iter()
                    .map(|&pin| self.circuit.pin(pin).state().name())
                    .join(" ")
            )
        });

        let items = self
            .circuit
            .pins()
            .iter()
            .filter_map(|pin| match pin.owner() {
                PinOwner::Item(id) => Some(id),
                PinOwner::Gate(_) => None,
            })
            .unique()
            .map(|id| {
                let label = self
                    .labels
                    .get(&id)
                    .cloned()
                    .unwrap_or_else(|| format!("Item {}", id.0));
                format!("    item{} [label=\"{label}\", shape=box]", id.0)
            });

        gates.chain(items).collect_vec().join("\n")
    }

    fn print_edges(&self) -> String {
        self.circuit
            .pins()
            .iter()
            .filter(|pin| pin.is_output())
            .flat_map(|pin| {
                pin.dependents()
                    .map(|input: PinId| (pin.owner(), self.circuit.pin(input).owner()))
                    .collect_vec()
            })
            .map(|(from, to)| {
                format!("    {}->{}", Self::node_name(from), Self::node_name(to))
            })
            .collect_vec()
            .join("\n")
    }
}

pub trait ToGraphviz {
    fn to_graphviz(&self) -> String;

    fn to_graphviz_with_labels(&self, labels: Vec<(ItemId, String)>) -> String;
}

impl ToGraphviz for Circuit {
    fn to_graphviz(&self) -> String {
        GraphvizBuilder::new(self).build("Circuit")
    }

    fn to_graphviz_with_labels(&self, labels: Vec<(ItemId, String)>) -> String {
        GraphvizBuilder::new(self)
            .with_labels(labels)
            .build("Circuit")
    }
}
