use itertools::Itertools;

use crate::circuit::pin::{PinDirection, PinId};
use crate::circuit::Circuit;
use crate::common::{ItemId, Point, Property};
use crate::constants::{
    DEFAULT_LINE_LENGTH, SENSOR_CABLE_WIDTH, SENSOR_PANEL_OFFSET_Y, SENSOR_PROPERTY_SIZE,
    SENSOR_RANGE,
};

// 센서 아래에 붙은 속성 패널, 속성마다 output 핀 하나
#[derive(Debug, Clone)]
pub struct SensorOutput {
    property: Property,
    // 패널 좌상단
    position: Point,
    pin: PinId,
}

impl SensorOutput {
    pub fn property(&self) -> Property {
        self.property
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn pin(&self) -> PinId {
        self.pin
    }

    // 물건의 속성이 패널과 같으면 One
    pub fn set_output(&self, property: Property, circuit: &mut Circuit) {
        if property != Property::None && property == self.property {
            circuit.pin_mut(self.pin).set_one();
        }
    }

    pub fn reset_output(&self, circuit: &mut Circuit) {
        circuit.pin_mut(self.pin).set_zero();
    }
}

#[derive(Debug, Clone)]
pub struct Sensor {
    position: Point,
    outputs: Vec<SensorOutput>,
}

impl Sensor {
    pub fn new(id: ItemId, position: Point, properties: &[Property], circuit: &mut Circuit) -> Self {
        let (width, height) = SENSOR_PROPERTY_SIZE;

        let outputs = properties
            .iter()
            .enumerate()
            .map(|(index, &property)| {
                let panel = Point(
                    position.0 + SENSOR_CABLE_WIDTH / 2.0,
                    position.1 + SENSOR_PANEL_OFFSET_Y + index as f64 * height,
                );
                let pin = circuit.add_pin(
                    PinDirection::Output,
                    id,
                    panel.offset(width + DEFAULT_LINE_LENGTH, height / 2.0),
                );

                SensorOutput {
                    property,
                    position: panel,
                    pin,
                }
            })
            .collect_vec();

        Self { position, outputs }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn outputs(&self) -> &[SensorOutput] {
        &self.outputs
    }

    pub fn outputs_mut(&mut self) -> &mut [SensorOutput] {
        &mut self.outputs
    }

    pub fn range(&self) -> (f64, f64) {
        (
            self.position.1 + SENSOR_RANGE.0,
            self.position.1 + SENSOR_RANGE.1,
        )
    }

    // 물건의 위, 아래, 중심 중 하나라도 감지 범위에 있으면 감지
    pub fn detect_product(&self, (top, bottom): (f64, f64)) -> bool {
        let (min, max) = self.range();
        let center = (top + bottom) / 2.0;

        [top, bottom, center]
            .into_iter()
            .any(|y| min <= y && y <= max)
    }

    pub fn set_outputs(&self, properties: [Property; 3], circuit: &mut Circuit) {
        for output in &self.outputs {
            for property in properties {
                output.set_output(property, circuit);
            }
        }
    }

    pub fn reset_outputs(&self, circuit: &mut Circuit) {
        for output in &self.outputs {
            output.reset_output(circuit);
        }
    }
}
