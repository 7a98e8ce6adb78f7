use super::gate::GateId;
use super::Circuit;

// 평가 순서, 앞쪽 게이트가 먼저 평가됨
#[derive(Debug, Default, Clone, PartialEq, Eq, derive_more::Deref)]
pub struct EvaluationOrder(Vec<GateId>);

impl EvaluationOrder {
    pub fn position(&self, gate: GateId) -> Option<usize> {
        self.0.iter().position(|&id| id == gate)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

struct Frame {
    gate: GateId,
    successors: Vec<GateId>,
    cursor: usize,
}

// 반복 DFS 기반 위상 정렬, 피드백 루프는 역방향 간선을 무시하여 끊어냄
pub struct TopologicalSorter<'a> {
    circuit: &'a Circuit,
    marks: Vec<Mark>,
    completion: Vec<GateId>,
}

impl<'a> TopologicalSorter<'a> {
    pub fn new(circuit: &'a Circuit) -> Self {
        Self {
            circuit,
            marks: vec![Mark::Unvisited; circuit.gate_capacity()],
            completion: Vec::new(),
        }
    }

    pub fn sort(circuit: &'a Circuit) -> EvaluationOrder {
        let mut sorter = Self::new(circuit);
        for gate in circuit.gates() {
            sorter.visit(gate.id());
        }
        sorter.finalize_sorting()
    }

    pub fn visit(&mut self, entry: GateId) {
        if self.marks[entry.0] != Mark::Unvisited {
            return;
        }

        let mut stack = vec![self.enter(entry)];

        while let Some(frame) = stack.last_mut() {
            let Some(&next) = frame.successors.get(frame.cursor) else {
                let gate = frame.gate;
                stack.pop();

                self.marks[gate.0] = Mark::Done;
                self.completion.push(gate);
                continue;
            };
            frame.cursor += 1;

            match self.marks[next.0] {
                Mark::Unvisited => stack.push(self.enter(next)),
                Mark::InProgress => {
                    tracing::trace!("feedback edge into gate {} ignored", next.0);
                }
                Mark::Done => {}
            }
        }
    }

    fn enter(&mut self, gate: GateId) -> Frame {
        self.marks[gate.0] = Mark::InProgress;

        Frame {
            gate,
            successors: self.circuit.gate_successors(gate),
            cursor: 0,
        }
    }

    // 완료 스택을 뒤집어 producer가 consumer보다 앞에 오도록 함
    pub fn finalize_sorting(self) -> EvaluationOrder {
        let mut order = self.completion;
        order.reverse();
        EvaluationOrder(order)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use itertools::Itertools;
    use petgraph::visit::EdgeRef;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::TopologicalSorter;
    use crate::circuit::gate::{GateId, GateKind};
    use crate::circuit::Circuit;
    use crate::common::Point;

    fn wire(circuit: &mut Circuit, from: GateId, output: usize, to: GateId, input: usize) {
        let output = circuit.gate(from).unwrap().output_pins()[output];
        let input = circuit.gate(to).unwrap().input_pins()[input];
        let drop = circuit.pin(input).position();
        assert!(circuit.connect(output, input, drop));
    }

    #[test]
    fn unittest_sort_chain_orders_producers_first() {
        let mut circuit = Circuit::new();
        let c = circuit.add_gate(GateKind::Not, Point(500.0, 100.0));
        let a = circuit.add_gate(GateKind::Not, Point(100.0, 100.0));
        let b = circuit.add_gate(GateKind::And, Point(300.0, 100.0));

        wire(&mut circuit, a, 0, b, 0);
        wire(&mut circuit, b, 0, c, 0);

        let order = TopologicalSorter::sort(&circuit);
        assert_eq!(order.len(), 3);
        assert!(order.position(a) < order.position(b));
        assert!(order.position(b) < order.position(c));
    }

    #[test]
    fn unittest_sort_tolerates_feedback() {
        // cross-coupled SR latch plus a self loop
        let mut circuit = Circuit::new();
        let s = circuit.add_gate(GateKind::SrFlipFlop, Point(100.0, 100.0));
        let r = circuit.add_gate(GateKind::SrFlipFlop, Point(300.0, 100.0));
        let n = circuit.add_gate(GateKind::Or, Point(500.0, 100.0));

        wire(&mut circuit, s, 0, r, 0);
        wire(&mut circuit, r, 0, s, 1);
        wire(&mut circuit, n, 0, n, 0);
        wire(&mut circuit, r, 1, n, 1);

        let order = TopologicalSorter::sort(&circuit);
        assert_eq!(order.iter().sorted().collect_vec(), vec![&s, &r, &n]);
        assert!(order.position(r) < order.position(n));
        assert!(circuit.has_feedback());
    }

    #[test]
    fn unittest_sort_random_dag_matches_petgraph() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..20 {
            let mut circuit = Circuit::new();
            let count = rng.gen_range(2..30);
            let gates = (0..count)
                .map(|index| circuit.add_gate(GateKind::Or, Point(index as f64 * 100.0, 0.0)))
                .collect_vec();

            // 낮은 번호 -> 높은 번호로만 연결하여 DAG를 만듦
            for to in 1..count {
                for input in 0..2 {
                    if rng.gen_bool(0.6) {
                        let from = rng.gen_range(0..to);
                        wire(&mut circuit, gates[from], 0, gates[to], input);
                    }
                }
            }

            let order = TopologicalSorter::sort(&circuit);
            assert_eq!(order.len(), count);
            assert!(!circuit.has_feedback());

            let graph = circuit.to_petgraph();
            let rank: HashMap<_, _> = order
                .iter()
                .enumerate()
                .map(|(index, gate)| (*gate, index))
                .collect();
            for edge in graph.edge_references() {
                let from = graph[edge.source()];
                let to = graph[edge.target()];
                assert!(rank[&from] < rank[&to], "{from:?} -> {to:?}");
            }
            assert!(petgraph::algo::toposort(&graph, None).is_ok());
        }
    }

    #[test]
    fn unittest_sort_empty_circuit() {
        let circuit = Circuit::new();
        assert!(TopologicalSorter::sort(&circuit).is_empty());
    }
}
