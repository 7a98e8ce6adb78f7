use std::str::FromStr;

use eyre::ContextCompat;

pub mod property;
pub mod signal;

pub use property::{Property, PropertyType};
pub use signal::Signal;

// 위치 (x, y), 화면 좌표계 기준
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Point(pub f64, pub f64);

impl Point {
    pub fn offset(&self, dx: f64, dy: f64) -> Point {
        Point(self.0 + dx, self.1 + dy)
    }

    pub fn distance(&self, other: &Point) -> f64 {
        ((self.0 - other.0).powi(2) + (self.1 - other.1).powi(2)).sqrt()
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Self::Output {
        Point(self.0 + rhs.0, self.1 + rhs.1)
    }
}

// "x,y" 형식
impl FromStr for Point {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s
            .split_once(',')
            .with_context(|| format!("Point `{s}` must be formatted as `x,y`"))?;

        Ok(Point(x.trim().parse()?, y.trim().parse()?))
    }
}

// 사이즈 (width, height)
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Size(pub f64, pub f64);

// 좌상단 기준 사각형
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn offset(&self, origin: Point) -> Rect {
        Rect {
            x: self.x + origin.0,
            y: self.y + origin.1,
            ..*self
        }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub usize);
