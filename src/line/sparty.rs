use std::f64::consts::PI;

use crate::circuit::pin::PinId;
use crate::circuit::Circuit;
use crate::common::{Point, Signal};
use crate::constants::{BOOT_MAX_ROTATION, BOOT_PERCENTAGE};

// 물건을 차서 라인 밖으로 밀어내는 kicker
#[derive(Debug, Clone)]
pub struct Sparty {
    position: Point,
    height: f64,
    kick_duration: f64,
    kick_speed: f64,
    input: PinId,
    // 남은 kick 시간
    kick_time: f64,
    kicking: bool,
    previous_pin_state: bool,
    boot_rotation: f64,
}

impl Sparty {
    pub fn new(position: Point, height: f64, kick_duration: f64, kick_speed: f64, input: PinId) -> Self {
        Self {
            position,
            height,
            kick_duration,
            kick_speed,
            input,
            kick_time: 0.0,
            kicking: false,
            previous_pin_state: false,
            boot_rotation: 0.0,
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn kick_duration(&self) -> f64 {
        self.kick_duration
    }

    pub fn kick_speed(&self) -> f64 {
        self.kick_speed
    }

    pub fn input_pin(&self) -> PinId {
        self.input
    }

    pub fn is_kicking(&self) -> bool {
        self.kicking
    }

    pub fn boot_rotation(&self) -> f64 {
        self.boot_rotation
    }

    pub fn is_connected(&self, circuit: &Circuit) -> bool {
        !circuit.pin(self.input).is_unknown()
    }

    // 발이 닿는 y 위치
    pub fn strike_y(&self) -> f64 {
        self.position.1 - self.height / 2.0 + (self.height * BOOT_PERCENTAGE).floor()
    }

    pub fn detect_product(&self, (top, bottom): (f64, f64)) -> bool {
        let strike = self.strike_y();
        top <= strike && strike <= bottom
    }

    // 한 프레임 진행, 이번 프레임에 물건을 찰 수 있으면 true
    pub fn update(&mut self, elapsed: f64, pin_state: Signal) -> bool {
        if pin_state.is_one() && !self.previous_pin_state {
            self.kicking = true;
            self.kick_time = self.kick_duration;
            tracing::info!("sparty kick started");
        }
        self.previous_pin_state = pin_state.is_one();

        if !self.kicking {
            return false;
        }

        self.kicking(elapsed);
        true
    }

    fn kicking(&mut self, elapsed: f64) {
        self.kick_time -= elapsed;

        if self.kick_time < 0.0 {
            self.kick_time = 0.0;
            self.kicking = false;
            self.boot_rotation = 0.0;
            return;
        }

        let progress = if self.kick_duration > 0.0 {
            (self.kick_duration - self.kick_time) / self.kick_duration
        } else {
            1.0
        };
        self.boot_rotation = (progress * PI).sin() * BOOT_MAX_ROTATION;
    }
}
