use super::beam::Beam;
use super::product::Product;
use super::scoreboard::Scoreboard;
use super::sensor::Sensor;
use super::sparty::Sparty;
use crate::circuit::Circuit;

// 감지 영역과 물건들을 비교함, 물건은 벨트 순서(앞쪽부터)로 주어짐
pub struct ProductDetector<'a> {
    products: &'a mut [Product],
}

impl<'a> ProductDetector<'a> {
    pub fn new(products: &'a mut [Product]) -> Self {
        Self { products }
    }

    // 감지된 물건의 index를 반환함
    pub fn update_beam(&mut self, beam: &mut Beam, circuit: &mut Circuit) -> Option<usize> {
        let detected = self
            .products
            .iter()
            .position(|product| !product.is_kicked() && beam.detect_product(product.y_range()));

        for (index, product) in self.products.iter_mut().enumerate() {
            product.set_detected(Some(index) == detected);
        }

        beam.set_output(detected.is_some(), circuit);
        detected
    }

    // 센서 출력은 미리 Zero로 초기화되어 있어야 함
    pub fn update_sensor(&mut self, sensor: &Sensor, circuit: &mut Circuit) -> Option<usize> {
        let detected = self
            .products
            .iter()
            .position(|product| !product.is_kicked() && sensor.detect_product(product.y_range()))?;

        sensor.set_outputs(self.products[detected].properties(), circuit);
        Some(detected)
    }

    pub fn update_sparty(&mut self, sparty: &Sparty) -> Option<usize> {
        let detected = self
            .products
            .iter()
            .position(|product| !product.is_kicked() && sparty.detect_product(product.y_range()))?;

        self.products[detected].kick(sparty.kick_speed());
        tracing::info!("product {detected} kicked");
        Some(detected)
    }

    pub fn update_scoreboard(&mut self, scoreboard: &mut Scoreboard) -> usize {
        self.products
            .iter_mut()
            .map(|product| scoreboard.score_product(product))
            .filter(|&scored| scored)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::ProductDetector;
    use crate::circuit::pin::PinDirection;
    use crate::circuit::Circuit;
    use crate::common::{ItemId, Point, Property};
    use crate::line::beam::Beam;
    use crate::line::product::Product;
    use crate::line::scoreboard::Scoreboard;
    use crate::line::sensor::Sensor;
    use crate::line::sparty::Sparty;

    fn products(ys: &[f64]) -> Vec<Product> {
        ys.iter()
            .map(|&y| {
                Product::new(
                    ItemId(0),
                    0.0,
                    Point(150.0, y),
                    [Property::Green, Property::Circle, Property::None],
                    false,
                )
            })
            .collect()
    }

    #[test]
    fn unittest_detector_beam_first_product_wins() {
        let mut circuit = Circuit::new();
        let pin = circuit.add_pin(PinDirection::Output, ItemId(1), Point(0.0, 437.0));
        let mut beam = Beam::new(Point(100.0, 437.0), -100.0, pin);

        // 두 물건 모두 빔 위에 걸침
        let mut products = products(&[420.0, 460.0, 100.0]);
        let mut detector = ProductDetector::new(&mut products);

        assert_eq!(detector.update_beam(&mut beam, &mut circuit), Some(0));
        assert!(circuit.pin(pin).is_one());
        assert!(products[0].is_detected());
        assert!(!products[1].is_detected());
        assert!(!products[2].is_detected());

        // 차인 물건은 감지하지 않고, 빔을 지난 것으로 처리함
        products[0].kick(1000.0);
        let mut detector = ProductDetector::new(&mut products);
        assert_eq!(detector.update_beam(&mut beam, &mut circuit), Some(1));
        assert!(products[0].passed_beam());

        products[1].kick(1000.0);
        let mut detector = ProductDetector::new(&mut products);
        assert_eq!(detector.update_beam(&mut beam, &mut circuit), None);
        assert!(circuit.pin(pin).is_zero());
        assert!(products[1].passed_beam());
        assert!(!products[2].passed_beam());
    }

    #[test]
    fn unittest_detector_sensor_sets_matching_outputs() {
        let mut circuit = Circuit::new();
        let sensor = Sensor::new(
            ItemId(1),
            Point(200.0, 400.0),
            &[Property::Red, Property::Green, Property::Circle],
            &mut circuit,
        );
        let pins = sensor.outputs().iter().map(|o| o.pin()).collect::<Vec<_>>();

        let mut line = products(&[100.0, 390.0]);
        sensor.reset_outputs(&mut circuit);
        let mut detector = ProductDetector::new(&mut line);
        assert_eq!(detector.update_sensor(&sensor, &mut circuit), Some(1));

        assert!(circuit.pin(pins[0]).is_zero());
        assert!(circuit.pin(pins[1]).is_one());
        assert!(circuit.pin(pins[2]).is_one());

        let mut empty = products(&[100.0]);
        sensor.reset_outputs(&mut circuit);
        assert_eq!(
            ProductDetector::new(&mut empty).update_sensor(&sensor, &mut circuit),
            None
        );
        assert!(pins.iter().all(|&pin| circuit.pin(pin).is_zero()));
    }

    #[test]
    fn unittest_detector_sparty_kicks_first_candidate() {
        let mut circuit = Circuit::new();
        let pin = circuit.add_pin(PinDirection::Input, ItemId(1), Point(300.0, 350.0));
        let sparty = Sparty::new(Point(345.0, 340.0), 300.0, 0.25, 1000.0, pin);

        let mut products = products(&[430.0, 440.0]);
        products[0].kick(500.0);

        let mut detector = ProductDetector::new(&mut products);
        assert_eq!(detector.update_sparty(&sparty), Some(1));
        assert!(products[1].is_kicked());
    }

    #[test]
    fn unittest_detector_scoreboard() {
        let mut scoreboard = Scoreboard::new(Point(0.0, 0.0), 10, 0, String::new(), None);
        let mut products = products(&[100.0, 200.0, 300.0]);
        for product in products.iter_mut().take(2) {
            product.set_detected(true);
            product.set_detected(false);
        }

        let mut detector = ProductDetector::new(&mut products);
        assert_eq!(detector.update_scoreboard(&mut scoreboard), 2);
        assert_eq!(detector.update_scoreboard(&mut scoreboard), 0);
        assert_eq!(scoreboard.level_score(), 20);
    }
}
