use crate::common::Size;
use crate::constants::{
    BONUS_DECREMENT_INTERVAL, BONUS_DECREMENT_START, MAX_COMPLETION_BONUS, MESSAGE_DURATION,
};

pub mod def;
pub mod loader;

pub use def::LevelDef;
pub use loader::{LevelLoader, LoadedLevel};

// 레벨 진행 시간과 완료 보너스
#[derive(Debug, Clone)]
pub struct Level {
    number: usize,
    size: Size,
    timed: bool,
    level_time: f64,
    completion_bonus: i32,
    bonus_decrement: i32,
    last_bonus_decrement: i32,
}

impl Level {
    pub fn new(number: usize, size: Size, timed: bool) -> Self {
        Self {
            number,
            size,
            timed,
            level_time: 0.0,
            completion_bonus: MAX_COMPLETION_BONUS,
            bonus_decrement: BONUS_DECREMENT_START,
            last_bonus_decrement: 0,
        }
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn is_timed(&self) -> bool {
        self.timed
    }

    pub fn level_time(&self) -> f64 {
        self.level_time
    }

    pub fn completion_bonus(&self) -> i32 {
        self.completion_bonus
    }

    // 시작 배너가 보이는 동안
    pub fn show_begin_banner(&self) -> bool {
        self.level_time < MESSAGE_DURATION
    }

    // 시작 배너 이후 흐른 시간 (초)
    pub fn display_time(&self) -> i32 {
        (self.level_time - MESSAGE_DURATION).max(0.0).floor() as i32
    }

    pub fn update(&mut self, elapsed: f64) {
        self.level_time += elapsed;
    }

    pub fn update_completion_bonus(&mut self) {
        if !self.timed || self.show_begin_banner() {
            return;
        }

        let display_time = self.display_time();
        if display_time - self.last_bonus_decrement >= BONUS_DECREMENT_INTERVAL {
            self.completion_bonus = self
                .completion_bonus
                .saturating_sub(self.bonus_decrement)
                .max(0);
            self.last_bonus_decrement = display_time;
            self.bonus_decrement = self.bonus_decrement.saturating_mul(2);

            tracing::debug!("completion bonus dropped to {}", self.completion_bonus);
        }
    }
}
