use crate::circuit::pin::PinId;
use crate::circuit::Circuit;
use crate::common::Point;

// 빛이 가로지르는 y 위치에서 물건을 감지함
#[derive(Debug, Clone)]
pub struct Beam {
    position: Point,
    // 송신부 x 오프셋
    sender: f64,
    output: PinId,
    broken: bool,
}

impl Beam {
    pub fn new(position: Point, sender: f64, output: PinId) -> Self {
        Self {
            position,
            sender,
            output,
            broken: false,
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn sender(&self) -> f64 {
        self.sender
    }

    pub fn output_pin(&self) -> PinId {
        self.output
    }

    pub fn is_broken(&self) -> bool {
        self.broken
    }

    // 경계 포함
    pub fn detect_product(&self, (top, bottom): (f64, f64)) -> bool {
        top <= self.position.1 && self.position.1 <= bottom
    }

    pub fn set_output(&mut self, broken: bool, circuit: &mut Circuit) {
        self.broken = broken;
        circuit.pin_mut(self.output).set_state(broken.into());
    }
}

#[cfg(test)]
mod tests {
    use super::Beam;
    use crate::circuit::pin::PinDirection;
    use crate::circuit::Circuit;
    use crate::common::{ItemId, Point};

    #[test]
    fn unittest_beam_detect_product() {
        let mut circuit = Circuit::new();
        let pin = circuit.add_pin(PinDirection::Output, ItemId(0), Point(0.0, 437.0));
        let beam = Beam::new(Point(100.0, 437.0), -100.0, pin);

        assert!(beam.detect_product((337.0, 437.0)));
        assert!(beam.detect_product((437.0, 550.0)));
        assert!(beam.detect_product((400.0, 480.0)));
        assert!(!beam.detect_product((500.0, 600.0)));
        assert!(!beam.detect_product((300.0, 436.9)));
    }

    #[test]
    fn unittest_beam_set_output() {
        let mut circuit = Circuit::new();
        let pin = circuit.add_pin(PinDirection::Output, ItemId(0), Point(0.0, 437.0));
        let mut beam = Beam::new(Point(100.0, 437.0), -100.0, pin);

        beam.set_output(true, &mut circuit);
        assert!(beam.is_broken());
        assert!(circuit.pin(pin).is_one());

        beam.set_output(false, &mut circuit);
        assert!(circuit.pin(pin).is_zero());
    }
}
