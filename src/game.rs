use eyre::ContextCompat;
use itertools::Itertools;

use crate::circuit::builder::CircuitBuilder;
use crate::circuit::gate::{GateId, GateKind};
use crate::circuit::graphviz::ToGraphviz;
use crate::circuit::pin::{PinId, PinOwner};
use crate::circuit::sort::EvaluationOrder;
use crate::circuit::{Circuit, Grab};
use crate::common::{ItemId, Point, Size};
use crate::constants::{DELAY_TIME, MESSAGE_DURATION};
use crate::level::{Level, LevelDef, LevelLoader};
use crate::line::conveyor::PanelButton;
use crate::line::detector::ProductDetector;
use crate::line::product::Product;
use crate::line::Item;
use crate::visitor::{
    accept_items, ControlPointToggler, ItemVisitor, LastProductVisitor, OutputResetter,
    PinCollector, ScoreboardVisitor,
};

// 레벨이 바뀌어도 유지되는 값
#[derive(Debug, Default, Clone)]
pub struct Session {
    pub game_score: i32,
    pub level_number: usize,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum LevelPhase {
    Running,
    // 마지막 물건이 빔을 지난 뒤 남은 시간
    Ending { remaining: f64 },
    Finished,
}

pub struct Game {
    session: Session,
    level: Level,
    circuit: Circuit,
    items: Vec<Item>,
    // 컨베이어별로 벨트 순서(앞쪽부터)
    products: Vec<Product>,
    grabbed: Option<Grab>,
    end_level_timer: f64,
    show_control_points: bool,
    order: EvaluationOrder,
}

impl Default for Game {
    fn default() -> Self {
        Game::new(Session::default())
    }
}

impl Game {
    pub fn new(session: Session) -> Self {
        Self {
            level: Level::new(session.level_number, Size::default(), false),
            session,
            circuit: Circuit::new(),
            items: Vec::new(),
            products: Vec::new(),
            grabbed: None,
            end_level_timer: DELAY_TIME,
            show_control_points: false,
            order: EvaluationOrder::default(),
        }
    }

    pub fn load(&mut self, def: &LevelDef) -> eyre::Result<()> {
        let loaded = LevelLoader::new(def).load(self.session.level_number)?;

        self.session.level_number = loaded.level.number();
        self.level = loaded.level;
        self.circuit = loaded.circuit;
        self.items = loaded.items;
        self.products = loaded.products;
        self.grabbed = None;
        self.end_level_timer = DELAY_TIME;
        self.order = EvaluationOrder::default();

        let show = self.show_control_points;
        self.set_show_control_points(show);

        Ok(())
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn grabbed(&self) -> Option<Grab> {
        self.grabbed
    }

    pub fn evaluation_order(&self) -> &EvaluationOrder {
        &self.order
    }

    pub fn end_level_timer(&self) -> f64 {
        self.end_level_timer
    }

    pub fn game_score(&self) -> i32 {
        self.session.game_score
    }

    pub fn level_score(&mut self) -> Option<i32> {
        let mut visitor = ScoreboardVisitor::default();
        self.accept(&mut visitor);
        visitor.level_score()
    }

    pub fn is_last_product_reached(&mut self) -> bool {
        let mut visitor = LastProductVisitor::default();
        self.accept(&mut visitor);
        visitor.is_last_product_reached()
    }

    // "Level Completed" 배너
    pub fn show_level_completed(&self) -> bool {
        self.end_level_timer <= MESSAGE_DURATION
    }

    pub fn accept<V: ItemVisitor + ?Sized>(&mut self, visitor: &mut V) {
        accept_items(&mut self.items, &mut self.products, visitor);
    }

    // 한 프레임 진행
    pub fn update(&mut self, elapsed: f64) -> LevelPhase {
        let Self {
            session,
            level,
            circuit,
            items,
            products,
            end_level_timer,
            order,
            ..
        } = self;

        level.update(elapsed);

        for (index, item) in items.iter_mut().enumerate() {
            if let Item::Conveyor(conveyor) = item {
                let id = ItemId(index);
                conveyor.update(
                    elapsed,
                    products.iter_mut().filter(|product| product.conveyor == id),
                );
            }
        }

        accept_items(items, products, &mut OutputResetter::new(circuit));

        let mut detector = ProductDetector::new(products);
        for item in items.iter_mut() {
            match item {
                Item::Sensor(sensor) => {
                    detector.update_sensor(sensor, circuit);
                }
                Item::Beam(beam) => {
                    detector.update_beam(beam, circuit);
                }
                _ => {}
            }
        }

        *order = circuit.evaluate();

        for item in items.iter_mut() {
            if let Item::Sparty(sparty) = item {
                let state = circuit.pin(sparty.input_pin()).state();
                if sparty.update(elapsed, state) {
                    detector.update_sparty(sparty);
                }
            }
        }

        if Self::is_kicker_connected(items, circuit) {
            for item in items.iter_mut() {
                if let Item::Scoreboard(scoreboard) = item {
                    detector.update_scoreboard(scoreboard);
                }
            }
        }

        let mut last_product = LastProductVisitor::default();
        accept_items(items, products, &mut last_product);

        if !last_product.is_last_product_reached() {
            level.update_completion_bonus();
            return LevelPhase::Running;
        }

        *end_level_timer -= elapsed;

        if *end_level_timer <= MESSAGE_DURATION {
            for item in items.iter_mut() {
                if let Item::Scoreboard(scoreboard) = item {
                    if let Some(score) = scoreboard.take_level_score(level.completion_bonus()) {
                        session.game_score += score;
                        tracing::info!(
                            "level {} completed: {score} points added, game score {}",
                            level.number(),
                            session.game_score
                        );
                    }
                }
            }
        }

        if *end_level_timer <= 0.0 {
            *end_level_timer = 0.0;
            return LevelPhase::Finished;
        }

        LevelPhase::Ending {
            remaining: *end_level_timer,
        }
    }

    fn is_kicker_connected(items: &[Item], circuit: &Circuit) -> bool {
        items
            .iter()
            .filter_map(Item::as_sparty)
            .any(|sparty| sparty.is_connected(circuit))
    }

    pub fn start_conveyors(&mut self) {
        let conveyors = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| matches!(item, Item::Conveyor(_)))
            .map(|(index, _)| ItemId(index))
            .collect_vec();

        for id in conveyors {
            self.start_conveyor(id);
        }
    }

    // 물건과 레벨 점수를 처음 상태로 되돌리고 시작함
    fn start_conveyor(&mut self, id: ItemId) {
        let Some(conveyor) = self.items.get_mut(id.0).and_then(Item::as_conveyor_mut) else {
            return;
        };
        conveyor.start(
            self.products
                .iter_mut()
                .filter(|product| product.conveyor == id),
        );

        for item in self.items.iter_mut() {
            if let Item::Scoreboard(scoreboard) = item {
                if !scoreboard.is_score_added() {
                    scoreboard.reset();
                }
            }
        }
        self.end_level_timer = DELAY_TIME;
    }

    pub fn add_gate(&mut self, kind: GateKind) -> GateId {
        let id = self.circuit.add_gate_at_default(kind);
        if self.show_control_points {
            self.circuit.set_show_control_points(true);
        }
        id
    }

    pub fn remove_gate(&mut self, id: GateId) -> bool {
        if self.grabbed == Some(Grab::Gate(id)) {
            self.grabbed = None;
        }
        self.circuit.remove_gate(id)
    }

    pub fn set_show_control_points(&mut self, show: bool) {
        self.show_control_points = show;
        self.circuit.set_show_control_points(show);

        let mut toggler = ControlPointToggler::new(&mut self.circuit, show);
        accept_items(&mut self.items, &mut self.products, &mut toggler);
    }

    fn sparty_pins(&self) -> Vec<PinId> {
        self.items
            .iter()
            .filter_map(Item::as_sparty)
            .map(|sparty| sparty.input_pin())
            .collect()
    }

    pub fn try_to_connect(&mut self, output: PinId, line_end: Point) -> bool {
        let extra = self.sparty_pins();
        self.circuit.try_to_connect(output, line_end, &extra)
    }

    // 빔, 센서 output 핀
    fn hit_source_pin(&self, x: f64, y: f64) -> Option<PinId> {
        self.circuit
            .pins()
            .iter()
            .find(|pin| {
                pin.is_output() && matches!(pin.owner(), PinOwner::Item(_)) && pin.hit_test(x, y)
            })
            .map(|pin| pin.id())
    }

    pub fn on_left_down(&mut self, x: f64, y: f64) {
        let clicked = self.items.iter().enumerate().find_map(|(index, item)| match item {
            Item::Conveyor(conveyor) => conveyor
                .hit_panel(x, y)
                .map(|button| (ItemId(index), button)),
            _ => None,
        });

        match clicked {
            Some((id, PanelButton::Start)) => {
                self.start_conveyor(id);
                return;
            }
            Some((id, PanelButton::Stop)) => {
                if let Some(conveyor) = self.items.get_mut(id.0).and_then(Item::as_conveyor_mut) {
                    conveyor.stop();
                }
                return;
            }
            None => {}
        }

        let grabbed = self
            .circuit
            .hit_draggable(x, y)
            .or_else(|| self.hit_source_pin(x, y).map(Grab::Wire));
        self.grabbed = grabbed;
    }

    pub fn on_mouse_move(&mut self, x: f64, y: f64) {
        match self.grabbed {
            Some(Grab::Gate(id)) => self.circuit.set_gate_location(id, x, y),
            Some(Grab::Wire(pin)) => self.circuit.pin_mut(pin).set_line_end(Some(Point(x, y))),
            None => {}
        }
    }

    pub fn on_left_up(&mut self) {
        let Some(Grab::Wire(pin)) = self.grabbed.take() else {
            return;
        };

        if let Some(line_end) = self.circuit.pin(pin).line_end() {
            if !self.try_to_connect(pin, line_end) {
                tracing::debug!("wire from pin {} dropped on nothing", pin.0);
            }
        }
        self.circuit.pin_mut(pin).set_line_end(None);
    }

    // 수식으로 회로를 만들어 Sparty에 연결함
    pub fn build_circuit(&mut self, stmt: &str) -> eyre::Result<Vec<GateId>> {
        let mut collector = PinCollector::default();
        self.accept(&mut collector);

        let sink = *collector
            .sinks()
            .first()
            .context("Level has no sparty to drive")?;

        let gates = CircuitBuilder::new(&mut self.circuit, stmt)
            .with_sources(collector.sources().iter().cloned())
            .build(sink)?;

        if self.circuit.has_feedback() {
            tracing::debug!("circuit has feedback loops");
        }

        Ok(gates)
    }

    pub fn to_graphviz(&mut self) -> String {
        let mut collector = PinCollector::default();
        self.accept(&mut collector);
        self.circuit.to_graphviz_with_labels(collector.into_labels())
    }
}

#[cfg(test)]
mod tests {
    use super::{Game, LevelPhase, Session};
    use crate::circuit::gate::GateKind;
    use crate::circuit::Grab;
    use crate::common::Point;
    use crate::level::LevelDef;
    use crate::line::Item;
    use crate::utils::init_test_tracing;

    const FRAME: f64 = 0.02;

    fn level(products: &str, extra_items: &str) -> eyre::Result<LevelDef> {
        format!(
            r#"{{
                "size": "1150,800",
                "items": [
                    {{
                        "type": "conveyor", "x": 150, "y": 400, "speed": 100, "height": 800,
                        "panel": "-140,-300",
                        "products": [{products}]
                    }},
                    {{ "type": "beam", "x": 125, "y": 437, "sender": -100 }},
                    {{ "type": "sparty", "x": 345, "y": 340, "pin": "300,350" }},
                    {{ "type": "scoreboard", "x": 700, "y": 40, "good": 10, "bad": -5, "perfect": 20 }}
                    {extra_items}
                ]
            }}"#
        )
        .parse()
    }

    fn run_until_finished(game: &mut Game, max_frames: usize) -> LevelPhase {
        let mut phase = LevelPhase::Running;
        for _ in 0..max_frames {
            phase = game.update(FRAME);
            if phase == LevelPhase::Finished {
                break;
            }
        }
        phase
    }

    #[test]
    fn unittest_game_beam_kicks_and_scores() -> eyre::Result<()> {
        init_test_tracing();

        let def = level(r#"{ "placement": 100, "color": "red", "kick": "yes" }"#, "")?;
        let mut game = Game::new(Session {
            game_score: 5,
            level_number: 1,
        });
        game.load(&def)?;
        assert!(game.build_circuit("beam")?.is_empty());
        game.start_conveyors();

        let phase = run_until_finished(&mut game, 1000);
        assert_eq!(phase, LevelPhase::Finished);
        assert!(game.products()[0].is_kicked());
        assert!(game.products()[0].is_scored());
        assert_eq!(game.level_score(), Some(10));
        // perfect 20이 아니므로 보너스 없음
        assert_eq!(game.game_score(), 15);

        assert_eq!(game.update(FRAME), LevelPhase::Finished);
        assert_eq!(game.game_score(), 15);

        Ok(())
    }

    #[test]
    fn unittest_game_sensor_circuit_sorts_products() -> eyre::Result<()> {
        init_test_tracing();

        let def = level(
            r#"{ "placement": 100, "color": "green", "kick": "no" },
               { "placement": "+200", "color": "red", "kick": "yes" }"#,
            r#", { "type": "sensor", "x": 200, "y": 430, "outputs": ["green", "red"] }"#,
        )?;
        let mut game = Game::default();
        game.load(&def)?;
        assert_eq!(game.build_circuit("beam & ~green")?.len(), 2);
        game.start_conveyors();

        let mut ending = None;
        for frame in 0..1000 {
            match game.update(FRAME) {
                LevelPhase::Running => {}
                LevelPhase::Ending { remaining } => {
                    ending.get_or_insert(frame);
                    assert!(remaining > 0.0);
                }
                LevelPhase::Finished => break,
            }
        }

        assert!(ending.is_some());
        assert!(!game.products()[0].is_kicked());
        assert!(game.products()[1].is_kicked());
        assert_eq!(game.level_score(), Some(20));
        // perfect 20 + 완료 보너스 75
        assert_eq!(game.game_score(), 95);
        assert_eq!(game.evaluation_order().len(), 2);

        Ok(())
    }

    #[test]
    fn unittest_game_demo_level_file() -> eyre::Result<()> {
        let def = LevelDef::from_file(concat!(env!("CARGO_MANIFEST_DIR"), "/levels/level1.json"))?;
        let mut game = Game::default();
        game.load(&def)?;
        assert_eq!(game.session().level_number, 1);

        game.build_circuit("beam & red")?;
        game.start_conveyors();

        assert_eq!(run_until_finished(&mut game, 2000), LevelPhase::Finished);
        let kicked = game
            .products()
            .iter()
            .map(|product| product.is_kicked())
            .collect::<Vec<_>>();
        assert_eq!(kicked, vec![true, false, true, false]);
        assert_eq!(game.level_score(), Some(40));
        assert_eq!(game.game_score(), 115);

        Ok(())
    }

    #[test]
    fn unittest_game_unconnected_kicker_does_not_score() -> eyre::Result<()> {
        let def = level(r#"{ "placement": 100, "color": "red", "kick": "yes" }"#, "")?;
        let mut game = Game::default();
        game.load(&def)?;
        game.start_conveyors();

        let phase = run_until_finished(&mut game, 1000);
        assert_eq!(phase, LevelPhase::Finished);
        assert!(game.products()[0].passed_beam());
        assert!(!game.products()[0].is_scored());
        assert_eq!(game.level_score(), Some(0));
        assert_eq!(game.game_score(), 0);

        Ok(())
    }

    #[test]
    fn unittest_game_empty_line_ends_after_delay() -> eyre::Result<()> {
        let def = level("", "")?;
        let mut game = Game::default();
        game.load(&def)?;

        assert!(game.is_last_product_reached());
        assert!(matches!(game.update(1.0), LevelPhase::Ending { .. }));
        assert!(!game.show_level_completed());
        assert!(matches!(game.update(2.5), LevelPhase::Ending { .. }));
        assert!(game.show_level_completed());
        assert_eq!(game.update(2.0), LevelPhase::Finished);

        Ok(())
    }

    #[test]
    fn unittest_game_panel_and_drag() -> eyre::Result<()> {
        let def = level(r#"{ "placement": 100, "color": "red", "kick": "yes" }"#, "")?;
        let mut game = Game::default();
        game.load(&def)?;

        let Some(Item::Conveyor(conveyor)) = game.items().first() else {
            eyre::bail!("first item must be a conveyor");
        };
        assert!(!conveyor.is_running());

        // 패널 좌상단 (10, 100), start 버튼 (45..140, 129..165)
        game.on_left_down(50.0, 140.0);
        assert!(game.grabbed().is_none());
        let Some(Item::Conveyor(conveyor)) = game.items().first() else {
            eyre::bail!("first item must be a conveyor");
        };
        assert!(conveyor.is_running());

        game.update(1.0);
        assert_eq!(game.products()[0].position(), Point(150.0, 400.0));

        // stop 후 start 하면 물건이 처음 위치로
        game.on_left_down(50.0, 200.0);
        game.on_left_down(50.0, 140.0);
        assert_eq!(game.products()[0].position(), Point(150.0, 300.0));

        // 게이트를 옮기고 빔 output 핀에서 게이트 input 핀으로 선을 연결함
        let not = game.add_gate(GateKind::Not);
        let center = game.circuit().gate(not).unwrap().position();
        game.on_left_down(center.0, center.1);
        assert_eq!(game.grabbed(), Some(Grab::Gate(not)));
        game.on_mouse_move(400.0, 600.0);
        game.on_left_up();
        assert_eq!(game.circuit().gate(not).unwrap().position(), Point(400.0, 600.0));

        let input = game.circuit().gate(not).unwrap().input_pins()[0];
        let input_position = game.circuit().pin(input).position();
        // 빔 output 핀 (165, 437)
        game.on_left_down(165.0, 437.0);
        assert!(matches!(game.grabbed(), Some(Grab::Wire(_))));
        game.on_mouse_move(input_position.0 + 2.0, input_position.1);
        game.on_left_up();
        assert!(game.circuit().pin(input).upstream().is_some());
        assert!(game.grabbed().is_none());

        Ok(())
    }

    #[test]
    fn unittest_game_build_circuit_errors() -> eyre::Result<()> {
        let def = level("", "")?;
        let mut game = Game::default();
        game.load(&def)?;

        assert!(game.build_circuit("beam & purple").is_err());
        assert!(game.build_circuit("green").is_err());

        // 실패한 수식의 게이트는 남지 않음
        assert!(game.build_circuit("~beam & purple").is_err());
        assert_eq!(game.circuit().gate_count(), 0);

        let dot = game.to_graphviz();
        assert!(dot.contains("Sparty 2"));

        Ok(())
    }
}
