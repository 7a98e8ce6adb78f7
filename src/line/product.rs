use crate::common::{ItemId, Point, Property};
use crate::constants::PRODUCT_SIZE;

// 컨베이어 위를 움직이는 물건
#[derive(Debug, Clone)]
pub struct Product {
    // 물건이 놓인 컨베이어
    pub conveyor: ItemId,
    placement: f64,
    initial: Point,
    position: Point,
    color: Property,
    shape: Property,
    content: Property,
    should_kick: bool,
    kicked: bool,
    kick_speed: f64,
    detected: bool,
    was_detected: bool,
    passed_beam: bool,
    scored: bool,
}

impl Product {
    pub fn new(
        conveyor: ItemId,
        placement: f64,
        initial: Point,
        properties: [Property; 3],
        should_kick: bool,
    ) -> Self {
        let [color, shape, content] = properties;

        Self {
            conveyor,
            placement,
            initial,
            position: initial,
            color,
            shape,
            content,
            should_kick,
            kicked: false,
            kick_speed: 0.0,
            detected: false,
            was_detected: false,
            passed_beam: false,
            scored: false,
        }
    }

    pub fn placement(&self) -> f64 {
        self.placement
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn color(&self) -> Property {
        self.color
    }

    pub fn shape(&self) -> Property {
        self.shape
    }

    pub fn content(&self) -> Property {
        self.content
    }

    pub fn properties(&self) -> [Property; 3] {
        [self.color, self.shape, self.content]
    }

    pub fn has_property(&self, property: Property) -> bool {
        property != Property::None && self.properties().contains(&property)
    }

    pub fn should_kick(&self) -> bool {
        self.should_kick
    }

    pub fn is_kicked(&self) -> bool {
        self.kicked
    }

    pub fn is_detected(&self) -> bool {
        self.detected
    }

    pub fn passed_beam(&self) -> bool {
        self.passed_beam
    }

    pub fn is_scored(&self) -> bool {
        self.scored
    }

    pub fn set_scored(&mut self) {
        self.scored = true;
    }

    // (top, bottom)
    pub fn y_range(&self) -> (f64, f64) {
        (
            self.position.1 - PRODUCT_SIZE / 2.0,
            self.position.1 + PRODUCT_SIZE / 2.0,
        )
    }

    pub fn set_detected(&mut self, detected: bool) {
        self.was_detected = self.detected;
        self.detected = detected;

        if self.was_detected && !self.detected {
            self.passed_beam = true;
        }
    }

    pub fn kick(&mut self, speed: f64) {
        self.kicked = true;
        self.kick_speed = speed;
    }

    // 벨트 속도로 내려가고, 차였다면 옆으로도 이동함
    pub fn advance(&mut self, belt_speed: f64, elapsed: f64) {
        self.position.1 += belt_speed * elapsed;

        if self.kicked {
            self.position.0 -= self.kick_speed * elapsed;
        }
    }

    pub fn reset(&mut self) {
        self.position = self.initial;
        self.kicked = false;
        self.kick_speed = 0.0;
        self.detected = false;
        self.was_detected = false;
        self.passed_beam = false;
        self.scored = false;
    }
}

#[cfg(test)]
mod tests {
    use super::Product;
    use crate::common::{ItemId, Point, Property};

    fn product() -> Product {
        Product::new(
            ItemId(0),
            100.0,
            Point(150.0, 300.0),
            [Property::Red, Property::Circle, Property::None],
            true,
        )
    }

    #[test]
    fn unittest_product_passed_beam_on_falling_detection() {
        let mut product = product();

        product.set_detected(false);
        assert!(!product.passed_beam());

        product.set_detected(true);
        product.set_detected(true);
        assert!(!product.passed_beam());

        product.set_detected(false);
        assert!(product.passed_beam());
    }

    #[test]
    fn unittest_product_kick_and_reset() {
        let mut product = product();

        product.advance(100.0, 0.5);
        assert_eq!(product.position(), Point(150.0, 350.0));

        product.kick(1000.0);
        product.advance(100.0, 0.1);
        assert_eq!(product.position(), Point(50.0, 360.0));
        assert_eq!(product.y_range(), (320.0, 400.0));

        product.set_detected(true);
        product.set_detected(false);
        product.set_scored();
        product.reset();

        assert_eq!(product.position(), Point(150.0, 300.0));
        assert!(!product.is_kicked());
        assert!(!product.is_detected());
        assert!(!product.passed_beam());
        assert!(!product.is_scored());
    }

    #[test]
    fn unittest_product_has_property() {
        let product = product();

        assert!(product.has_property(Property::Red));
        assert!(product.has_property(Property::Circle));
        assert!(!product.has_property(Property::Green));
        assert!(!product.has_property(Property::None));
    }
}
