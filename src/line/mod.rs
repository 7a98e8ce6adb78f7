use self::beam::Beam;
use self::conveyor::Conveyor;
use self::scoreboard::Scoreboard;
use self::sensor::Sensor;
use self::sparty::Sparty;
use crate::common::{ItemId, Point};
use crate::visitor::ItemVisitor;

pub mod beam;
pub mod conveyor;
pub mod detector;
pub mod product;
pub mod scoreboard;
pub mod sensor;
pub mod sparty;

// 레벨에 놓이는 아이템
#[derive(Debug, Clone)]
pub enum Item {
    Conveyor(Conveyor),
    Beam(Beam),
    Sensor(Sensor),
    Sparty(Sparty),
    Scoreboard(Scoreboard),
}

impl Item {
    pub fn name(&self) -> &'static str {
        match self {
            Item::Conveyor(_) => "Conveyor",
            Item::Beam(_) => "Beam",
            Item::Sensor(_) => "Sensor",
            Item::Sparty(_) => "Sparty",
            Item::Scoreboard(_) => "Scoreboard",
        }
    }

    pub fn position(&self) -> Point {
        match self {
            Item::Conveyor(conveyor) => conveyor.position(),
            Item::Beam(beam) => beam.position(),
            Item::Sensor(sensor) => sensor.position(),
            Item::Sparty(sparty) => sparty.position(),
            Item::Scoreboard(scoreboard) => scoreboard.position(),
        }
    }

    pub fn accept<V: ItemVisitor + ?Sized>(&mut self, id: ItemId, visitor: &mut V) {
        match self {
            Item::Conveyor(conveyor) => visitor.visit_conveyor(id, conveyor),
            Item::Beam(beam) => visitor.visit_beam(id, beam),
            Item::Sensor(sensor) => {
                visitor.visit_sensor(id, sensor);
                for output in sensor.outputs_mut() {
                    visitor.visit_sensor_output(id, output);
                }
            }
            Item::Sparty(sparty) => visitor.visit_sparty(id, sparty),
            Item::Scoreboard(scoreboard) => visitor.visit_scoreboard(id, scoreboard),
        }
    }

    pub fn as_conveyor_mut(&mut self) -> Option<&mut Conveyor> {
        match self {
            Item::Conveyor(conveyor) => Some(conveyor),
            _ => None,
        }
    }

    pub fn as_sparty(&self) -> Option<&Sparty> {
        match self {
            Item::Sparty(sparty) => Some(sparty),
            _ => None,
        }
    }
}
