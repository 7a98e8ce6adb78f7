// 핀 관련
pub const PIN_SIZE: f64 = 10.0;
pub const DEFAULT_LINE_LENGTH: f64 = 20.0;

// 새 게이트가 놓이는 좌상단 위치
pub const DEFAULT_GATE_POSITION: (f64, f64) = (550.0, 350.0);

// 물건의 세로 크기
pub const PRODUCT_SIZE: f64 = 80.0;

// 센서 감지 범위 (센서 y 기준)
pub const SENSOR_RANGE: (f64, f64) = (-40.0, 15.0);
pub const SENSOR_CABLE_WIDTH: f64 = 100.0;
pub const SENSOR_PANEL_OFFSET_Y: f64 = 87.0;
pub const SENSOR_PROPERTY_SIZE: (f64, f64) = (100.0, 40.0);

// Sparty
pub const DEFAULT_KICK_DURATION: f64 = 0.25;
pub const DEFAULT_KICK_SPEED: f64 = 1000.0;
pub const DEFAULT_SPARTY_HEIGHT: f64 = 300.0;
pub const BOOT_PERCENTAGE: f64 = 0.8;
pub const BOOT_MAX_ROTATION: f64 = 0.8;

// 점수
pub const DEFAULT_GOOD_SCORE: i32 = 10;
pub const DEFAULT_BAD_SCORE: i32 = 0;

// 레벨 진행
pub const DELAY_TIME: f64 = 5.0;
pub const MESSAGE_DURATION: f64 = 2.0;
pub const MAX_COMPLETION_BONUS: i32 = 75;
pub const BONUS_DECREMENT_START: i32 = 5;
pub const BONUS_DECREMENT_INTERVAL: i32 = 30;
