use itertools::Itertools;

use super::def::{ConveyorDef, ItemDef, LevelDef, Placement, ProductDef, SpartyDef};
use super::Level;
use crate::circuit::pin::PinDirection;
use crate::circuit::Circuit;
use crate::common::{ItemId, Point, Property, PropertyType};
use crate::constants::{
    DEFAULT_BAD_SCORE, DEFAULT_GOOD_SCORE, DEFAULT_KICK_DURATION, DEFAULT_KICK_SPEED,
    DEFAULT_SPARTY_HEIGHT,
};
use crate::line::beam::Beam;
use crate::line::conveyor::Conveyor;
use crate::line::product::Product;
use crate::line::scoreboard::Scoreboard;
use crate::line::sensor::Sensor;
use crate::line::sparty::Sparty;
use crate::line::Item;

// 빔 output 핀의 위치 (빔 기준)
const BEAM_PIN_OFFSET: (f64, f64) = (40.0, 0.0);

#[derive(Debug)]
pub struct LoadedLevel {
    pub level: Level,
    pub circuit: Circuit,
    pub items: Vec<Item>,
    pub products: Vec<Product>,
}

// LevelDef로부터 아이템, 물건, 핀을 만듦
pub struct LevelLoader<'a> {
    def: &'a LevelDef,
    circuit: Circuit,
    items: Vec<Item>,
    products: Vec<Product>,
}

impl<'a> LevelLoader<'a> {
    pub fn new(def: &'a LevelDef) -> Self {
        Self {
            def,
            circuit: Circuit::new(),
            items: Vec::new(),
            products: Vec::new(),
        }
    }

    pub fn load(mut self, number: usize) -> eyre::Result<LoadedLevel> {
        let def = self.def;
        let level = Level::new(def.number.unwrap_or(number), def.size()?, def.timed);

        for def in &def.items {
            let id = ItemId(self.items.len());
            let item = self.create_item(id, def)?;
            self.items.push(item);
        }

        tracing::info!(
            "level {} loaded: {} items, {} products",
            level.number(),
            self.items.len(),
            self.products.len()
        );

        Ok(LoadedLevel {
            level,
            circuit: self.circuit,
            items: self.items,
            products: self.products,
        })
    }

    fn create_item(&mut self, id: ItemId, def: &ItemDef) -> eyre::Result<Item> {
        let item = match def {
            ItemDef::Conveyor(def) => Item::Conveyor(self.create_conveyor(id, def)?),
            ItemDef::Beam(def) => {
                let position = Point(def.x, def.y);
                let pin = self.circuit.add_pin(
                    PinDirection::Output,
                    id,
                    position.offset(BEAM_PIN_OFFSET.0, BEAM_PIN_OFFSET.1),
                );
                Item::Beam(Beam::new(position, def.sender.unwrap_or(0.0), pin))
            }
            ItemDef::Sensor(def) => {
                let properties = def
                    .outputs
                    .iter()
                    .map(|name| Property::parse(name))
                    .collect::<eyre::Result<Vec<_>>>()?;
                Item::Sensor(Sensor::new(
                    id,
                    Point(def.x, def.y),
                    &properties,
                    &mut self.circuit,
                ))
            }
            ItemDef::Sparty(def) => Item::Sparty(self.create_sparty(id, def)?),
            ItemDef::Scoreboard(def) => Item::Scoreboard(Scoreboard::new(
                Point(def.x, def.y),
                def.good.unwrap_or(DEFAULT_GOOD_SCORE),
                def.bad.unwrap_or(DEFAULT_BAD_SCORE),
                def.instructions.iter().join("\n"),
                def.perfect,
            )),
        };

        tracing::debug!("create item {} ({})", id.0, item.name());
        Ok(item)
    }

    fn create_conveyor(&mut self, id: ItemId, def: &ConveyorDef) -> eyre::Result<Conveyor> {
        let panel = match &def.panel {
            Some(panel) => panel.parse()?,
            None => Point(0.0, 0.0),
        };
        let conveyor = Conveyor::new(
            Point(def.x, def.y),
            def.speed.unwrap_or(0.0),
            def.height.unwrap_or(0.0),
            panel,
        );

        let start = self.products.len();
        let mut previous = 0.0;
        for product in &def.products {
            let placement = match &product.placement {
                Some(placement) => Placement::try_from(placement)?.resolve(previous),
                None => 0.0,
            };
            previous = placement;

            self.products.push(Product::new(
                id,
                placement,
                Point(def.x, conveyor.product_y(placement)),
                Self::product_properties(product)?,
                Self::should_kick(product)?,
            ));
        }

        // 벨트 앞쪽(placement가 작은 쪽)부터
        self.products[start..].sort_by(|a, b| a.placement().total_cmp(&b.placement()));

        Ok(conveyor)
    }

    fn create_sparty(&mut self, id: ItemId, def: &SpartyDef) -> eyre::Result<Sparty> {
        let pin = match &def.pin {
            Some(pin) => pin.parse()?,
            None => {
                tracing::warn!("sparty {} has no pin, placed at origin", id.0);
                Point(0.0, 0.0)
            }
        };
        let input = self.circuit.add_pin(PinDirection::Input, id, pin);

        Ok(Sparty::new(
            Point(def.x, def.y),
            def.height.unwrap_or(DEFAULT_SPARTY_HEIGHT),
            def.kick_duration.unwrap_or(DEFAULT_KICK_DURATION),
            def.kick_speed.unwrap_or(DEFAULT_KICK_SPEED),
            input,
        ))
    }

    // 각 칸에는 그 종류의 속성만 올 수 있음
    fn product_properties(def: &ProductDef) -> eyre::Result<[Property; 3]> {
        let parse = |name: &Option<String>, expected: PropertyType| -> eyre::Result<Property> {
            let Some(name) = name else {
                return Ok(Property::None);
            };

            let property = Property::parse(name)?;
            eyre::ensure!(
                property.property_type() == Some(expected),
                "Product property `{name}` is not a {expected}"
            );
            Ok(property)
        };

        Ok([
            parse(&def.color, PropertyType::Color)?,
            parse(&def.shape, PropertyType::Shape)?,
            parse(&def.content, PropertyType::Content)?,
        ])
    }

    fn should_kick(def: &ProductDef) -> eyre::Result<bool> {
        match def.kick.as_deref().map(str::trim) {
            None | Some("no") => Ok(false),
            Some("yes") => Ok(true),
            Some(kick) => eyre::bail!("Kick must be `yes` or `no`, found `{kick}`"),
        }
    }
}
