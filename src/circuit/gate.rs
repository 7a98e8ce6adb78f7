use itertools::Itertools;
use strum_macros::{Display, EnumIter, EnumString};

use super::pin::{PinArena, PinDirection, PinId, PinOwner};
use crate::common::{Point, Signal, Size};
use crate::constants::{DEFAULT_LINE_LENGTH, PIN_SIZE};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct GateId(pub usize);

// 게이트의 종류
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Display, EnumIter, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum GateKind {
    And,
    Or,
    Not,
    #[strum(serialize = "SR")]
    SrFlipFlop,
    #[strum(serialize = "D")]
    DFlipFlop,
}

impl GateKind {
    pub fn size(&self) -> Size {
        match self {
            GateKind::And | GateKind::Or => Size(75.0, 50.0),
            GateKind::Not => Size(50.0, 50.0),
            GateKind::SrFlipFlop | GateKind::DFlipFlop => Size(50.0, 75.0),
        }
    }

    pub fn is_sequential(&self) -> bool {
        matches!(self, GateKind::SrFlipFlop | GateKind::DFlipFlop)
    }

    // 게이트 중심 기준 input 핀 위치
    fn input_offsets(&self) -> Vec<(f64, f64)> {
        let Size(w, h) = self.size();
        let line = DEFAULT_LINE_LENGTH;

        match self {
            GateKind::And => vec![
                (-w / 2.0 - 2.0 * line, h / 4.0),
                (-w / 2.0 - 2.0 * line, -h / 4.0),
            ],
            GateKind::Or => vec![
                (-w / 2.0 - line + 10.0, PIN_SIZE),
                (-w / 2.0 - line + 10.0, -PIN_SIZE),
            ],
            GateKind::Not => vec![(-w / 2.0 - line, 0.0)],
            // (S, R), (D, Clock)
            GateKind::SrFlipFlop | GateKind::DFlipFlop => {
                vec![(-w / 2.0 - line, -h / 4.0), (-w / 2.0 - line, h / 4.0)]
            }
        }
    }

    // 게이트 중심 기준 output 핀 위치
    fn output_offsets(&self) -> Vec<(f64, f64)> {
        let Size(w, h) = self.size();
        let line = DEFAULT_LINE_LENGTH;

        match self {
            GateKind::And => vec![(w / 2.0 + line / 2.0, 0.0)],
            GateKind::Or | GateKind::Not => vec![(w / 2.0 + line, 0.0)],
            // (Q, Q')
            GateKind::SrFlipFlop | GateKind::DFlipFlop => {
                vec![(w / 2.0 + line, -h / 4.0), (w / 2.0 + line, h / 4.0)]
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Gate {
    id: GateId,
    kind: GateKind,
    // 게이트 중심
    position: Point,
    inputs: Vec<PinId>,
    outputs: Vec<PinId>,
    // D flip-flop의 이전 clock
    previous_clock: bool,
}

impl Gate {
    // 핀을 pins에 만들고 게이트를 반환함
    pub fn new(id: GateId, kind: GateKind, position: Point, pins: &mut PinArena) -> Self {
        let owner = PinOwner::Gate(id);

        let inputs = kind
            .input_offsets()
            .into_iter()
            .map(|(dx, dy)| pins.push(PinDirection::Input, owner, position.offset(dx, dy)))
            .collect_vec();
        let outputs = kind
            .output_offsets()
            .into_iter()
            .map(|(dx, dy)| pins.push(PinDirection::Output, owner, position.offset(dx, dy)))
            .collect_vec();

        if kind.is_sequential() {
            pins[outputs[0]].set_zero();
            pins[outputs[1]].set_one();
        }

        Self {
            id,
            kind,
            position,
            inputs,
            outputs,
            previous_clock: false,
        }
    }

    pub fn id(&self) -> GateId {
        self.id
    }

    pub fn kind(&self) -> GateKind {
        self.kind
    }

    pub fn size(&self) -> Size {
        self.kind.size()
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn input_pins(&self) -> &[PinId] {
        &self.inputs
    }

    pub fn output_pins(&self) -> &[PinId] {
        &self.outputs
    }

    pub fn pins(&self) -> impl Iterator<Item = PinId> + '_ {
        self.inputs.iter().chain(self.outputs.iter()).copied()
    }

    pub fn set_location(&mut self, x: f64, y: f64, pins: &mut PinArena) {
        self.position = Point(x, y);
        self.update_pin_positions(pins);
    }

    pub fn update_pin_positions(&self, pins: &mut PinArena) {
        for (&id, (dx, dy)) in self.inputs.iter().zip(self.kind.input_offsets()) {
            pins[id].set_position(self.position.offset(dx, dy));
        }

        for (&id, (dx, dy)) in self.outputs.iter().zip(self.kind.output_offsets()) {
            pins[id].set_position(self.position.offset(dx, dy));
        }
    }

    // 경계 포함
    pub fn hit_test(&self, x: f64, y: f64) -> bool {
        let Size(w, h) = self.size();
        let Point(cx, cy) = self.position;

        x >= cx - w / 2.0 && x <= cx + w / 2.0 && y >= cy - h / 2.0 && y <= cy + h / 2.0
    }

    pub fn hit_draggable(&self, x: f64, y: f64, pins: &PinArena) -> Option<PinId> {
        self.outputs
            .iter()
            .copied()
            .find(|&id| pins[id].hit_test(x, y))
    }

    // 현재 input 상태로 output 핀을 갱신함
    pub fn update_output_pin(&mut self, pins: &mut PinArena) {
        let inputs = self.inputs.iter().map(|&id| pins[id].state()).collect_vec();

        let Some(next) = self.next_outputs(&inputs) else {
            return;
        };

        for (&id, state) in self.outputs.iter().zip(next) {
            pins[id].set_state(state);
        }
    }

    // None이면 출력 유지
    fn next_outputs(&mut self, inputs: &[Signal]) -> Option<[Signal; 2]> {
        match self.kind {
            GateKind::And => Some([inputs[0].and(inputs[1]), Signal::Unknown]),
            GateKind::Or => Some([inputs[0].or(inputs[1]), Signal::Unknown]),
            GateKind::Not => Some([!inputs[0], Signal::Unknown]),
            GateKind::SrFlipFlop => match (inputs[0], inputs[1]) {
                (Signal::One, Signal::One) => Some([Signal::Unknown, Signal::Unknown]),
                (Signal::One, _) => Some([Signal::One, Signal::Zero]),
                (_, Signal::One) => Some([Signal::Zero, Signal::One]),
                (Signal::Zero, Signal::Zero) => None,
                _ => Some([Signal::Unknown, Signal::Unknown]),
            },
            GateKind::DFlipFlop => {
                let (data, clock) = (inputs[0], inputs[1]);

                if data.is_unknown() && clock.is_unknown() {
                    self.previous_clock = false;
                    return Some([Signal::Unknown, Signal::Unknown]);
                }

                let rising = clock.is_one() && !self.previous_clock;
                self.previous_clock = clock.is_one();

                rising.then_some([data, !data])
            }
        }
    }
}
