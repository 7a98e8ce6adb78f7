use std::collections::HashMap;

use itertools::Itertools;

use self::gate::{Gate, GateId, GateKind};
use self::pin::{Pin, PinArena, PinDirection, PinId, PinOwner};
use self::sort::{EvaluationOrder, TopologicalSorter};
use crate::common::{ItemId, Point, Signal};
use crate::constants::DEFAULT_GATE_POSITION;
use crate::utils::Verify;

pub mod builder;
pub mod gate;
pub mod graphviz;
pub mod pin;
pub mod sort;

// 드래그로 잡을 수 있는 대상
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Grab {
    Gate(GateId),
    Wire(PinId),
}

// 핀, 게이트 저장소
#[derive(Debug, Default, Clone)]
pub struct Circuit {
    pins: PinArena,
    // 삭제된 게이트 자리는 None으로 남겨 id를 유지함
    gates: Vec<Option<Gate>>,
}

impl Circuit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_pin(&mut self, direction: PinDirection, owner: ItemId, position: Point) -> PinId {
        self.pins.push(direction, PinOwner::Item(owner), position)
    }

    pub fn add_gate(&mut self, kind: GateKind, position: Point) -> GateId {
        let id = GateId(self.gates.len());
        let gate = Gate::new(id, kind, position, &mut self.pins);
        tracing::debug!("add gate {} ({kind})", id.0);

        self.gates.push(Some(gate));
        id
    }

    // 좌상단 기본 위치에 게이트를 추가함
    pub fn add_gate_at_default(&mut self, kind: GateKind) -> GateId {
        let (x, y) = DEFAULT_GATE_POSITION;
        let size = kind.size();
        self.add_gate(kind, Point(x + size.0 / 2.0, y + size.1 / 2.0))
    }

    pub fn remove_gate(&mut self, id: GateId) -> bool {
        let Some(gate) = self.gates.get_mut(id.0).and_then(|gate| gate.take()) else {
            return false;
        };

        for &input in gate.input_pins() {
            self.pins.unlink(input);
        }

        for &output in gate.output_pins() {
            for dependent in self.pins[output].dependents().collect_vec() {
                self.pins.unlink(dependent);
            }
            self.pins[output].set_unknown();
        }

        tracing::debug!("remove gate {}", id.0);
        true
    }

    pub fn pin(&self, id: PinId) -> &Pin {
        &self.pins[id]
    }

    pub fn pin_mut(&mut self, id: PinId) -> &mut Pin {
        &mut self.pins[id]
    }

    pub fn pins(&self) -> &PinArena {
        &self.pins
    }

    pub fn gate(&self, id: GateId) -> Option<&Gate> {
        self.gates.get(id.0).and_then(|gate| gate.as_ref())
    }

    pub fn gates(&self) -> impl DoubleEndedIterator<Item = &Gate> {
        self.gates.iter().flatten()
    }

    pub fn gate_count(&self) -> usize {
        self.gates().count()
    }

    pub(crate) fn gate_capacity(&self) -> usize {
        self.gates.len()
    }

    pub fn set_gate_location(&mut self, id: GateId, x: f64, y: f64) {
        if let Some(gate) = self.gates.get_mut(id.0).and_then(|gate| gate.as_mut()) {
            gate.set_location(x, y, &mut self.pins);
        }
    }

    // drop 위치가 input 핀 위에 있을 때에만 output -> input 연결
    pub fn connect(&mut self, output: PinId, input: PinId, drop: Point) -> bool {
        let (Some(from), Some(to)) = (self.pins.get(output), self.pins.get(input)) else {
            return false;
        };

        if !from.is_output() || !to.is_input() || !to.hit_test(drop.0, drop.1) {
            return false;
        }

        self.pins.link(output, input);
        tracing::debug!("connect pin {} -> pin {}", output.0, input.0);
        true
    }

    pub fn disconnect(&mut self, input: PinId) {
        if self.pins.get(input).is_some_and(|pin| pin.is_input()) {
            self.pins.unlink(input);
        }
    }

    pub fn dependents(&self, output: PinId) -> impl Iterator<Item = PinId> + '_ {
        self.pins[output].dependents()
    }

    // 선 끝에 있는 input 핀을 찾아 연결 시도, extra는 게이트 외 input 핀
    pub fn try_to_connect(&mut self, output: PinId, line_end: Point, extra: &[PinId]) -> bool {
        let candidates = self
            .gates()
            .flat_map(|gate| gate.input_pins().iter().copied())
            .chain(extra.iter().copied())
            .collect_vec();

        candidates
            .into_iter()
            .any(|input| self.connect(output, input, line_end))
    }

    // 뒤에 추가된 게이트가 위에 그려지므로 역순으로 검사함
    pub fn hit_draggable(&self, x: f64, y: f64) -> Option<Grab> {
        for gate in self.gates().rev() {
            if let Some(pin) = gate.hit_draggable(x, y, &self.pins) {
                return Some(Grab::Wire(pin));
            }

            if gate.hit_test(x, y) {
                return Some(Grab::Gate(gate.id()));
            }
        }

        None
    }

    pub(crate) fn gate_successors(&self, id: GateId) -> Vec<GateId> {
        let Some(gate) = self.gate(id) else {
            return Vec::new();
        };

        gate.output_pins()
            .iter()
            .flat_map(|&output| self.pins[output].dependents())
            .filter_map(|input| match self.pins[input].owner() {
                PinOwner::Gate(successor) if self.gate(successor).is_some() => Some(successor),
                _ => None,
            })
            .unique()
            .collect()
    }

    pub fn topological_sort(&self) -> EvaluationOrder {
        TopologicalSorter::sort(self)
    }

    // input 핀을 upstream 상태로 갱신, 연결 없으면 Unknown
    fn pull(&mut self, input: PinId) {
        let state = self.pins[input]
            .upstream()
            .map(|upstream| self.pins[upstream].state())
            .unwrap_or(Signal::Unknown);
        self.pins[input].set_state(state);
    }

    // 한 프레임의 회로 평가
    pub fn evaluate(&mut self) -> EvaluationOrder {
        let order = self.topological_sort();

        for &id in order.iter() {
            let Some(mut gate) = self.gates[id.0].take() else {
                continue;
            };

            for &input in gate.input_pins() {
                self.pull(input);
            }
            gate.update_output_pin(&mut self.pins);

            self.gates[id.0] = Some(gate);
        }

        // 게이트가 아닌 소유자의 input 핀 (Sparty)
        let sinks = self
            .pins
            .iter()
            .filter(|pin| pin.is_input() && matches!(pin.owner(), PinOwner::Item(_)))
            .map(|pin| pin.id())
            .collect_vec();
        for input in sinks {
            self.pull(input);
        }

        order
    }

    pub fn to_petgraph(&self) -> petgraph::Graph<GateId, ()> {
        let mut graph = petgraph::Graph::new();
        let nodes: HashMap<GateId, _> = self
            .gates()
            .map(|gate| (gate.id(), graph.add_node(gate.id())))
            .collect();

        for gate in self.gates() {
            for successor in self.gate_successors(gate.id()) {
                graph.add_edge(nodes[&gate.id()], nodes[&successor], ());
            }
        }

        graph
    }

    pub fn has_feedback(&self) -> bool {
        petgraph::algo::is_cyclic_directed(&self.to_petgraph())
    }

    pub fn set_show_control_points(&mut self, show: bool) {
        for pin in self
            .pins
            .iter_mut()
            .filter(|pin| pin.is_output() && matches!(pin.owner(), PinOwner::Gate(_)))
        {
            pin.set_show_control_points(show);
        }
    }
}

impl Verify for Circuit {
    fn verify(&self) -> eyre::Result<()> {
        for pin in self.pins.iter() {
            if let Some(upstream) = pin.upstream() {
                let source = &self.pins[upstream];
                eyre::ensure!(
                    pin.is_input() && source.is_output(),
                    "Pin {} is connected from non-output pin {}",
                    pin.id().0,
                    upstream.0
                );
                eyre::ensure!(
                    source.dependents().any(|id| id == pin.id()),
                    "Pin {} is missing from dependents of pin {}",
                    pin.id().0,
                    upstream.0
                );
            }

            for dependent in pin.dependents() {
                eyre::ensure!(
                    self.pins[dependent].upstream() == Some(pin.id()),
                    "Dependent pin {} does not point back to pin {}",
                    dependent.0,
                    pin.id().0
                );
            }
        }

        Ok(())
    }
}
