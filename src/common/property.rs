use std::str::FromStr;

use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

// 물건의 속성
#[derive(
    Debug, Default, Copy, Clone, Eq, PartialEq, Hash, Display, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum Property {
    #[default]
    None,
    Red,
    Green,
    Blue,
    White,
    Square,
    Circle,
    Diamond,
    Izzo,
    Smith,
    Football,
    Basketball,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Display)]
pub enum PropertyType {
    Color,
    Shape,
    Content,
}

impl Property {
    pub fn parse(name: &str) -> eyre::Result<Property> {
        Property::from_str(name.trim())
            .map_err(|_| eyre::eyre!("Unknown product property `{name}`"))
    }

    pub fn property_type(&self) -> Option<PropertyType> {
        match self {
            Property::None => None,
            Property::Red | Property::Green | Property::Blue | Property::White => {
                Some(PropertyType::Color)
            }
            Property::Square | Property::Circle | Property::Diamond => Some(PropertyType::Shape),
            Property::Izzo | Property::Smith | Property::Football | Property::Basketball => {
                Some(PropertyType::Content)
            }
        }
    }

    pub fn name(&self) -> &'static str {
        (*self).into()
    }
}
