use std::collections::BTreeSet;
use std::ops::{Index, IndexMut};

use super::gate::GateId;
use crate::common::{ItemId, Point, Signal};
use crate::constants::PIN_SIZE;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct PinId(pub usize);

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PinDirection {
    Input,
    Output,
}

// 핀을 소유한 객체
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PinOwner {
    Gate(GateId),
    Item(ItemId),
}

#[derive(Debug, Clone)]
pub struct Pin {
    id: PinId,
    direction: PinDirection,
    owner: PinOwner,
    position: Point,
    state: Signal,
    // input 핀일 경우 연결된 output 핀
    upstream: Option<PinId>,
    // output 핀일 경우 연결된 input 핀들
    dependents: BTreeSet<PinId>,
    // 선을 끌고 있을 때 선의 끝
    line_end: Option<Point>,
    show_control_points: bool,
}

impl Pin {
    pub fn new(id: PinId, direction: PinDirection, owner: PinOwner, position: Point) -> Self {
        Self {
            id,
            direction,
            owner,
            position,
            state: Signal::Unknown,
            upstream: None,
            dependents: BTreeSet::new(),
            line_end: None,
            show_control_points: false,
        }
    }

    pub fn id(&self) -> PinId {
        self.id
    }

    pub fn direction(&self) -> PinDirection {
        self.direction
    }

    pub fn is_input(&self) -> bool {
        self.direction == PinDirection::Input
    }

    pub fn is_output(&self) -> bool {
        self.direction == PinDirection::Output
    }

    pub fn owner(&self) -> PinOwner {
        self.owner
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub fn state(&self) -> Signal {
        self.state
    }

    pub fn set_state(&mut self, state: Signal) {
        self.state = state;
    }

    pub fn set_one(&mut self) {
        self.state = Signal::One;
    }

    pub fn set_zero(&mut self) {
        self.state = Signal::Zero;
    }

    pub fn set_unknown(&mut self) {
        self.state = Signal::Unknown;
    }

    pub fn is_one(&self) -> bool {
        self.state.is_one()
    }

    pub fn is_zero(&self) -> bool {
        self.state.is_zero()
    }

    pub fn is_unknown(&self) -> bool {
        self.state.is_unknown()
    }

    pub fn upstream(&self) -> Option<PinId> {
        self.upstream
    }

    pub fn dependents(&self) -> impl Iterator<Item = PinId> + '_ {
        self.dependents.iter().copied()
    }

    pub fn line_end(&self) -> Option<Point> {
        self.line_end
    }

    pub fn set_line_end(&mut self, line_end: Option<Point>) {
        self.line_end = line_end;
    }

    pub fn show_control_points(&self) -> bool {
        self.show_control_points
    }

    pub fn set_show_control_points(&mut self, show: bool) {
        self.show_control_points = show;
    }

    pub fn hit_test(&self, x: f64, y: f64) -> bool {
        self.position.distance(&Point(x, y)) <= PIN_SIZE
    }
}

// PinId로 접근하는 핀 저장소
#[derive(Debug, Default, Clone, derive_more::Deref)]
pub struct PinArena(Vec<Pin>);

impl PinArena {
    pub fn push(&mut self, direction: PinDirection, owner: PinOwner, position: Point) -> PinId {
        let id = PinId(self.0.len());
        self.0.push(Pin::new(id, direction, owner, position));
        id
    }

    pub fn get(&self, id: PinId) -> Option<&Pin> {
        self.0.get(id.0)
    }

    pub fn get_mut(&mut self, id: PinId) -> Option<&mut Pin> {
        self.0.get_mut(id.0)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Pin> {
        self.0.iter_mut()
    }

    // output -> input 연결, 이전 연결은 끊어짐
    pub(super) fn link(&mut self, output: PinId, input: PinId) {
        if let Some(previous) = self[input].upstream.take() {
            self[previous].dependents.remove(&input);
        }

        self[input].upstream = Some(output);
        self[output].dependents.insert(input);
    }

    pub(super) fn unlink(&mut self, input: PinId) {
        if let Some(previous) = self[input].upstream.take() {
            self[previous].dependents.remove(&input);
        }

        self[input].set_unknown();
    }
}

impl Index<PinId> for PinArena {
    type Output = Pin;

    fn index(&self, index: PinId) -> &Self::Output {
        &self.0[index.0]
    }
}

impl IndexMut<PinId> for PinArena {
    fn index_mut(&mut self, index: PinId) -> &mut Self::Output {
        &mut self.0[index.0]
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::{PinArena, PinDirection, PinOwner};
    use crate::common::{ItemId, Point};

    #[test]
    fn unittest_pin_link_replaces_upstream() {
        let mut pins = PinArena::default();
        let owner = PinOwner::Item(ItemId(0));

        let a = pins.push(PinDirection::Output, owner, Point(0.0, 0.0));
        let b = pins.push(PinDirection::Output, owner, Point(0.0, 50.0));
        let input = pins.push(PinDirection::Input, owner, Point(100.0, 0.0));

        pins.link(a, input);
        assert_eq!(pins[input].upstream(), Some(a));
        assert_eq!(pins[a].dependents().collect_vec(), vec![input]);

        pins.link(b, input);
        assert_eq!(pins[input].upstream(), Some(b));
        assert_eq!(pins[a].dependents().count(), 0);
        assert_eq!(pins[b].dependents().collect_vec(), vec![input]);

        pins[input].set_one();
        pins.unlink(input);
        assert_eq!(pins[input].upstream(), None);
        assert_eq!(pins[b].dependents().count(), 0);
        assert!(pins[input].is_unknown());
    }

    #[test]
    fn unittest_pin_hit_test() {
        let mut pins = PinArena::default();
        let pin = pins.push(
            PinDirection::Input,
            PinOwner::Item(ItemId(0)),
            Point(100.0, 100.0),
        );

        assert!(pins[pin].hit_test(100.0, 100.0));
        assert!(pins[pin].hit_test(106.0, 108.0));
        assert!(!pins[pin].hit_test(108.0, 108.0));
    }
}
