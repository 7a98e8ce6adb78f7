use crate::circuit::pin::PinId;
use crate::circuit::Circuit;
use crate::common::ItemId;
use crate::line::beam::Beam;
use crate::line::conveyor::Conveyor;
use crate::line::product::Product;
use crate::line::scoreboard::Scoreboard;
use crate::line::sensor::{Sensor, SensorOutput};
use crate::line::sparty::Sparty;
use crate::line::Item;

// 아이템 종류별로 필요한 것만 구현함
pub trait ItemVisitor {
    fn visit_conveyor(&mut self, _id: ItemId, _conveyor: &mut Conveyor) {}

    fn visit_beam(&mut self, _id: ItemId, _beam: &mut Beam) {}

    fn visit_sensor(&mut self, _id: ItemId, _sensor: &mut Sensor) {}

    fn visit_sensor_output(&mut self, _id: ItemId, _output: &mut SensorOutput) {}

    fn visit_sparty(&mut self, _id: ItemId, _sparty: &mut Sparty) {}

    fn visit_scoreboard(&mut self, _id: ItemId, _scoreboard: &mut Scoreboard) {}

    fn visit_product(&mut self, _product: &mut Product) {}
}

// 아이템을 먼저, 그 다음 물건을 벨트 순서로 방문함
pub fn accept_items<V: ItemVisitor + ?Sized>(
    items: &mut [Item],
    products: &mut [Product],
    visitor: &mut V,
) {
    for (index, item) in items.iter_mut().enumerate() {
        item.accept(ItemId(index), visitor);
    }

    for product in products.iter_mut() {
        visitor.visit_product(product);
    }
}

// 마지막 물건이 빔을 지났는지, 물건이 없으면 true
pub struct LastProductVisitor {
    reached: bool,
}

impl Default for LastProductVisitor {
    fn default() -> Self {
        Self { reached: true }
    }
}

impl LastProductVisitor {
    pub fn is_last_product_reached(&self) -> bool {
        self.reached
    }
}

impl ItemVisitor for LastProductVisitor {
    fn visit_product(&mut self, product: &mut Product) {
        self.reached = product.passed_beam();
    }
}

pub struct OutputResetter<'a> {
    circuit: &'a mut Circuit,
}

impl<'a> OutputResetter<'a> {
    pub fn new(circuit: &'a mut Circuit) -> Self {
        Self { circuit }
    }
}

impl<'a> ItemVisitor for OutputResetter<'a> {
    fn visit_sensor_output(&mut self, _id: ItemId, output: &mut SensorOutput) {
        output.reset_output(self.circuit);
    }
}

// 빔, 센서 output 핀의 control point 표시 여부
pub struct ControlPointToggler<'a> {
    circuit: &'a mut Circuit,
    show: bool,
}

impl<'a> ControlPointToggler<'a> {
    pub fn new(circuit: &'a mut Circuit, show: bool) -> Self {
        Self { circuit, show }
    }
}

impl<'a> ItemVisitor for ControlPointToggler<'a> {
    fn visit_beam(&mut self, _id: ItemId, beam: &mut Beam) {
        self.circuit
            .pin_mut(beam.output_pin())
            .set_show_control_points(self.show);
    }

    fn visit_sensor_output(&mut self, _id: ItemId, output: &mut SensorOutput) {
        self.circuit
            .pin_mut(output.pin())
            .set_show_control_points(self.show);
    }
}

#[derive(Debug, Default)]
pub struct ScoreboardVisitor {
    level_score: Option<i32>,
    score_added: bool,
}

impl ScoreboardVisitor {
    pub fn level_score(&self) -> Option<i32> {
        self.level_score
    }

    pub fn is_score_added(&self) -> bool {
        self.score_added
    }
}

impl ItemVisitor for ScoreboardVisitor {
    fn visit_scoreboard(&mut self, _id: ItemId, scoreboard: &mut Scoreboard) {
        self.level_score = Some(scoreboard.level_score());
        self.score_added = scoreboard.is_score_added();
    }
}

// 수식에서 쓸 이름 -> output 핀, 그리고 Sparty input 핀
#[derive(Debug, Default)]
pub struct PinCollector {
    sources: Vec<(String, PinId)>,
    sinks: Vec<PinId>,
    labels: Vec<(ItemId, String)>,
}

impl PinCollector {
    pub fn sources(&self) -> &[(String, PinId)] {
        &self.sources
    }

    pub fn sinks(&self) -> &[PinId] {
        &self.sinks
    }

    pub fn into_labels(self) -> Vec<(ItemId, String)> {
        self.labels
    }
}

impl ItemVisitor for PinCollector {
    fn visit_beam(&mut self, id: ItemId, beam: &mut Beam) {
        if !self.sources.iter().any(|(name, _)| name == "beam") {
            self.sources.push(("beam".to_string(), beam.output_pin()));
        }
        self.labels.push((id, format!("Beam {}", id.0)));
    }

    fn visit_sensor(&mut self, id: ItemId, sensor: &mut Sensor) {
        let names = sensor
            .outputs()
            .iter()
            .map(|output| output.property().name())
            .collect::<Vec<_>>()
            .join(" | ");
        self.labels.push((id, format!("Sensor {} | {names}", id.0)));
    }

    fn visit_sensor_output(&mut self, _id: ItemId, output: &mut SensorOutput) {
        let name = output.property().name();
        if !self.sources.iter().any(|(source, _)| source == name) {
            self.sources.push((name.to_string(), output.pin()));
        }
    }

    fn visit_sparty(&mut self, id: ItemId, sparty: &mut Sparty) {
        self.sinks.push(sparty.input_pin());
        self.labels.push((id, format!("Sparty {}", id.0)));
    }
}
