use super::product::Product;
use crate::common::{Point, Rect};

// 패널 기준 버튼 위치
const START_BUTTON: Rect = Rect::new(35.0, 29.0, 95.0, 36.0);
const STOP_BUTTON: Rect = Rect::new(35.0, 87.0, 95.0, 36.0);

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PanelButton {
    Start,
    Stop,
}

#[derive(Debug, Clone)]
pub struct Conveyor {
    position: Point,
    speed: f64,
    height: f64,
    // 컨베이어 위치 기준 패널 위치
    panel: Point,
    // 벨트 텍스처 오프셋
    belt_position: f64,
    running: bool,
}

impl Conveyor {
    pub fn new(position: Point, speed: f64, height: f64, panel: Point) -> Self {
        Self {
            position,
            speed,
            height,
            panel,
            belt_position: 0.0,
            running: false,
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn belt_position(&self) -> f64 {
        self.belt_position
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn panel_position(&self) -> Point {
        self.position + self.panel
    }

    // 물건의 시작 y 좌표
    pub fn product_y(&self, placement: f64) -> f64 {
        self.position.1 - placement
    }

    pub fn start<'p>(&mut self, products: impl IntoIterator<Item = &'p mut Product>) {
        for product in products {
            product.reset();
        }

        self.belt_position = 0.0;
        self.running = true;
        tracing::info!("conveyor started");
    }

    pub fn stop(&mut self) {
        self.running = false;
        tracing::info!("conveyor stopped");
    }

    pub fn update<'p>(&mut self, elapsed: f64, products: impl IntoIterator<Item = &'p mut Product>) {
        if !self.running {
            return;
        }

        self.belt_position += self.speed * elapsed;
        if self.height > 0.0 {
            self.belt_position %= self.height;
        }

        for product in products {
            product.advance(self.speed, elapsed);
        }
    }

    pub fn hit_panel(&self, x: f64, y: f64) -> Option<PanelButton> {
        let panel = self.panel_position();

        if START_BUTTON.offset(panel).contains(x, y) {
            Some(PanelButton::Start)
        } else if STOP_BUTTON.offset(panel).contains(x, y) {
            Some(PanelButton::Stop)
        } else {
            None
        }
    }
}
