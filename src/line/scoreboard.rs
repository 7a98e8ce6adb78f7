use super::product::Product;
use crate::common::Point;

#[derive(Debug, Clone)]
pub struct Scoreboard {
    position: Point,
    good: i32,
    bad: i32,
    instructions: String,
    // 완료 보너스를 받기 위한 점수
    perfect_score: Option<i32>,
    level_score: i32,
    score_added: bool,
}

impl Scoreboard {
    pub fn new(
        position: Point,
        good: i32,
        bad: i32,
        instructions: String,
        perfect_score: Option<i32>,
    ) -> Self {
        Self {
            position,
            good,
            bad,
            instructions,
            perfect_score,
            level_score: 0,
            score_added: false,
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn good(&self) -> i32 {
        self.good
    }

    pub fn bad(&self) -> i32 {
        self.bad
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn level_score(&self) -> i32 {
        self.level_score
    }

    pub fn perfect_score(&self) -> Option<i32> {
        self.perfect_score
    }

    pub fn is_perfect(&self) -> bool {
        self.perfect_score == Some(self.level_score)
    }

    pub fn is_score_added(&self) -> bool {
        self.score_added
    }

    // 빔을 지났고 아직 채점되지 않은 물건을 채점함
    pub fn score_product(&mut self, product: &mut Product) -> bool {
        if product.is_scored() || !product.passed_beam() {
            return false;
        }

        let points = if product.is_kicked() == product.should_kick() {
            self.good
        } else {
            self.bad
        };
        self.level_score += points;
        product.set_scored();

        tracing::debug!(
            "product scored {points} (kicked: {}, should kick: {})",
            product.is_kicked(),
            product.should_kick()
        );
        true
    }

    // 레벨 점수를 한 번만 넘김, 넘긴 점수를 반환함
    pub fn take_level_score(&mut self, completion_bonus: i32) -> Option<i32> {
        if self.score_added {
            return None;
        }
        self.score_added = true;

        let bonus = if self.is_perfect() { completion_bonus } else { 0 };
        Some(self.level_score + bonus)
    }

    pub fn reset(&mut self) {
        self.level_score = 0;
        self.score_added = false;
    }
}

#[cfg(test)]
mod tests {
    use super::Scoreboard;
    use crate::common::{ItemId, Point, Property};
    use crate::line::product::Product;

    fn product(should_kick: bool) -> Product {
        Product::new(
            ItemId(0),
            0.0,
            Point(0.0, 0.0),
            [Property::Red, Property::None, Property::None],
            should_kick,
        )
    }

    fn passed(mut product: Product) -> Product {
        product.set_detected(true);
        product.set_detected(false);
        product
    }

    #[test]
    fn unittest_scoreboard_scores_each_product_once() {
        let mut scoreboard = Scoreboard::new(Point(0.0, 0.0), 10, -5, String::new(), Some(20));

        let mut waiting = product(true);
        assert!(!scoreboard.score_product(&mut waiting));

        let mut good = passed(product(false));
        assert!(scoreboard.score_product(&mut good));
        assert!(!scoreboard.score_product(&mut good));
        assert_eq!(scoreboard.level_score(), 10);

        let mut bad = passed(product(true));
        assert!(scoreboard.score_product(&mut bad));
        assert_eq!(scoreboard.level_score(), 5);

        let mut kicked = product(true);
        kicked.kick(1000.0);
        let mut kicked = passed(kicked);
        assert!(scoreboard.score_product(&mut kicked));
        assert_eq!(scoreboard.level_score(), 15);
    }

    #[test]
    fn unittest_scoreboard_take_level_score_once() {
        let mut scoreboard = Scoreboard::new(Point(0.0, 0.0), 10, 0, String::new(), Some(10));
        let mut good = passed(product(false));
        scoreboard.score_product(&mut good);

        assert!(scoreboard.is_perfect());
        assert_eq!(scoreboard.take_level_score(75), Some(85));
        assert_eq!(scoreboard.take_level_score(75), None);

        scoreboard.reset();
        assert_eq!(scoreboard.take_level_score(75), Some(0));
    }
}
