use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;

use eyre::WrapErr;
use serde::Deserialize;

use crate::common::{Point, Size};

// 레벨 파일 (JSON)
#[derive(Deserialize, Debug, Clone)]
pub struct LevelDef {
    #[serde(default)]
    pub number: Option<usize>,
    // "width,height"
    pub size: String,
    // 완료 보너스가 시간에 따라 줄어드는지 여부
    #[serde(default)]
    pub timed: bool,
    pub items: Vec<ItemDef>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ItemDef {
    Conveyor(ConveyorDef),
    Beam(BeamDef),
    Sensor(SensorDef),
    Sparty(SpartyDef),
    Scoreboard(ScoreboardDef),
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct ConveyorDef {
    pub x: f64,
    pub y: f64,
    pub speed: Option<f64>,
    pub height: Option<f64>,
    pub panel: Option<String>,
    #[serde(default)]
    pub products: Vec<ProductDef>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "kebab-case")]
pub struct ProductDef {
    pub placement: Option<Attribute>,
    pub color: Option<String>,
    pub shape: Option<String>,
    pub content: Option<String>,
    // "yes" | "no"
    pub kick: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct BeamDef {
    pub x: f64,
    pub y: f64,
    pub sender: Option<f64>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct SensorDef {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub outputs: Vec<String>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct SpartyDef {
    pub x: f64,
    pub y: f64,
    pub height: Option<f64>,
    pub kick_duration: Option<f64>,
    pub kick_speed: Option<f64>,
    // input 핀 위치 "x,y"
    pub pin: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct ScoreboardDef {
    pub x: f64,
    pub y: f64,
    pub good: Option<i32>,
    pub bad: Option<i32>,
    pub perfect: Option<i32>,
    #[serde(default)]
    pub instructions: Vec<String>,
}

// 숫자나 문자열 모두 허용하는 속성값
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Attribute {
    Number(f64),
    Text(String),
}

// 물건 위치, "+" 로 시작하면 이전 물건 기준
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Placement {
    Absolute(f64),
    Relative(f64),
}

impl Placement {
    pub fn resolve(&self, previous: f64) -> f64 {
        match self {
            Placement::Absolute(value) => *value,
            Placement::Relative(delta) => previous + delta,
        }
    }
}

impl FromStr for Placement {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        let placement = match s.strip_prefix('+') {
            Some(delta) => Placement::Relative(
                delta
                    .parse::<f64>()
                    .wrap_err_with(|| format!("Invalid relative placement `{s}`"))?,
            ),
            None => Placement::Absolute(
                s.parse::<f64>()
                    .wrap_err_with(|| format!("Invalid placement `{s}`"))?,
            ),
        };

        Ok(placement)
    }
}

impl TryFrom<&Attribute> for Placement {
    type Error = eyre::Report;

    fn try_from(value: &Attribute) -> Result<Self, Self::Error> {
        match value {
            Attribute::Number(value) => Ok(Placement::Absolute(*value)),
            Attribute::Text(text) => text.parse(),
        }
    }
}

impl LevelDef {
    pub fn from_file(path: impl AsRef<Path>) -> eyre::Result<LevelDef> {
        let path = path.as_ref();
        let file = File::open(path).wrap_err_with(|| format!("Cannot open {}", path.display()))?;

        serde_json::from_reader(BufReader::new(file))
            .wrap_err_with(|| format!("Cannot parse level {}", path.display()))
    }

    pub fn size(&self) -> eyre::Result<Size> {
        let Point(width, height) = self.size.parse()?;
        Ok(Size(width, height))
    }
}

impl FromStr for LevelDef {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(serde_json::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::{Attribute, ItemDef, LevelDef, Placement};
    use crate::common::Size;

    #[test]
    fn unittest_placement_parse() -> eyre::Result<()> {
        assert_eq!("100".parse::<Placement>()?, Placement::Absolute(100.0));
        assert_eq!("+150".parse::<Placement>()?, Placement::Relative(150.0));
        assert_eq!(" +20 ".parse::<Placement>()?, Placement::Relative(20.0));
        assert!("+".parse::<Placement>().is_err());
        assert!("far".parse::<Placement>().is_err());

        assert_eq!(Placement::Relative(150.0).resolve(100.0), 250.0);
        assert_eq!(Placement::Absolute(150.0).resolve(100.0), 150.0);
        assert_eq!(
            Placement::try_from(&Attribute::Number(30.0))?,
            Placement::Absolute(30.0)
        );

        Ok(())
    }

    #[test]
    fn unittest_level_def_parse() -> eyre::Result<()> {
        let level: LevelDef = r#"{
            "size": "1150,800",
            "timed": true,
            "items": [
                {
                    "type": "conveyor", "x": 150, "y": 400, "speed": 100, "height": 800,
                    "panel": "-300,-200",
                    "products": [
                        { "placement": 100, "color": "red", "kick": "yes" },
                        { "placement": "+200", "shape": "circle" }
                    ]
                },
                { "type": "beam", "x": 125, "y": 437, "sender": -100 },
                { "type": "sensor", "x": 200, "y": 300, "outputs": ["red", "circle"] },
                { "type": "sparty", "x": 345, "y": 340, "kick-speed": 800, "pin": "300,350" },
                { "type": "scoreboard", "x": 700, "y": 40, "good": 10, "instructions": ["Kick red"] }
            ]
        }"#
        .parse()?;

        assert_eq!(level.size()?, Size(1150.0, 800.0));
        assert!(level.timed);
        assert_eq!(level.items.len(), 5);

        let ItemDef::Conveyor(conveyor) = &level.items[0] else {
            eyre::bail!("first item must be a conveyor");
        };
        assert_eq!(conveyor.products.len(), 2);
        assert_eq!(
            conveyor.products[1].placement,
            Some(Attribute::Text("+200".to_string()))
        );

        let ItemDef::Sparty(sparty) = &level.items[3] else {
            eyre::bail!("fourth item must be a sparty");
        };
        assert_eq!(sparty.kick_speed, Some(800.0));
        assert_eq!(sparty.kick_duration, None);

        Ok(())
    }

    #[test]
    fn unittest_level_def_rejects_unknown_item() {
        let level = r#"{ "size": "100,100", "items": [ { "type": "robot", "x": 0, "y": 0 } ] }"#
            .parse::<LevelDef>();
        assert!(level.is_err());
    }
}
