//! Interactive trading session: one tick per frame.

use std::time::Duration;

use rand::Rng;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};
use trader_core::{
    traded_commodities, validate_config, validate_table, Button, InputEvent, Location,
    PointerState, ScreenMode, SessionConfig, StatusKind, StatusMessage, ValidationError,
};
use trader_econ::{
    choose_start, generate_locations, seeded_rng, status_for, Ship, Trade, TradeDesk,
    TradeRejection, TradeSide,
};

use crate::nav::{HoverView, Navigator, Starmap, Travel};
use crate::screen::{ScreenMachine, ScreenSignal, TransitionError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("starting port {index} is out of range ({count} ports)")]
    BadStart { index: usize, count: usize },
}

/// Whether the loop driver should keep going.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TickOutcome {
    Continue,
    Quit,
}

/// Running totals shown on the analytics screen.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Analytics {
    pub purchases: u64,
    pub sales: u64,
    pub credits_spent: u64,
    pub credits_earned: u64,
    pub rejected_trades: u64,
    pub jumps: u64,
    pub distance_travelled: f64,
}

impl Analytics {
    fn record_trade(&mut self, result: &Result<Trade, TradeRejection>) {
        match result {
            Ok(t) if t.side == TradeSide::Buy => {
                self.purchases += 1;
                self.credits_spent += u64::from(t.price);
            }
            Ok(t) => {
                self.sales += 1;
                self.credits_earned += u64::from(t.price);
            }
            Err(_) => self.rejected_trades += 1,
        }
    }

    fn record_travel(&mut self, travel: &Travel) {
        self.jumps += 1;
        self.distance_travelled += travel.distance;
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StatusView {
    pub kind: StatusKind,
    pub text: String,
    pub remaining_ms: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TravelNotice {
    pub destination: String,
    pub remaining_ms: u64,
}

/// Read-only view of the session handed to the presentation layer each tick.
#[derive(Clone, Debug, Serialize)]
pub struct SessionSnapshot {
    pub tick: u64,
    pub running: bool,
    pub mode: ScreenMode,
    pub title: &'static str,
    pub active_location: Location,
    pub ship: Ship,
    pub hovered: Option<HoverView>,
    /// Row index of the trade table under the pointer.
    pub hovered_row: Option<usize>,
    pub status: Option<StatusView>,
    pub travel: Option<TravelNotice>,
    /// Set after the first jump; drives the moving backdrop.
    pub cruising: bool,
    pub analytics: Analytics,
}

/// One play session. Owns the ship, the star map and the screen machine.
///
/// The ship is only mutated by the trade desk and the active port only by the
/// navigator, both inside [`Session::tick`].
#[derive(Clone, Debug)]
pub struct Session {
    config: SessionConfig,
    starmap: Starmap,
    ship: Ship,
    screen: ScreenMachine,
    pointer: PointerState,
    desk: TradeDesk,
    navigator: Navigator,
    status: Option<StatusMessage>,
    travel: Option<(String, Duration)>,
    cruising: bool,
    analytics: Analytics,
    running: bool,
    ticks: u64,
}

impl Session {
    /// Generate the market from `config` with the injected RNG.
    pub fn new<R: Rng>(config: SessionConfig, rng: &mut R) -> Result<Self, SessionError> {
        validate_config(&config)?;
        let locations = generate_locations(&config.locations, &config.map, rng)?;
        let start = choose_start(&locations, rng).ok_or(ValidationError::NoLocations)?;
        Self::from_locations(config, locations, start)
    }

    /// Same as [`Session::new`] with a ChaCha RNG seeded from `config.rng_seed`.
    pub fn from_seed(config: SessionConfig) -> Result<Self, SessionError> {
        let mut rng = seeded_rng(config.rng_seed);
        Self::new(config, &mut rng)
    }

    /// Start on a pre-built map, docked at `start`.
    pub fn from_locations(
        config: SessionConfig,
        locations: Vec<Location>,
        start: usize,
    ) -> Result<Self, SessionError> {
        validate_config(&config)?;
        let rows = locations.iter().map(|l| l.prices.len()).max().unwrap_or(0);
        validate_table(&config.trade_table, rows)?;
        let count = locations.len();
        let ship = Ship::new(
            traded_commodities(&locations),
            config.cargo_capacity,
            config.starting_credits,
        );
        let starmap =
            Starmap::new(locations, start).ok_or(SessionError::BadStart { index: start, count })?;
        info!(
            start = %starmap.active().name,
            ports = count,
            credits = ship.credits(),
            capacity = ship.capacity(),
            "session started"
        );
        Ok(Self {
            desk: TradeDesk::new(config.trade_table.clone()),
            navigator: Navigator::new(config.map),
            config,
            starmap,
            ship,
            screen: ScreenMachine::default(),
            pointer: PointerState::default(),
            status: None,
            travel: None,
            cruising: false,
            analytics: Analytics::default(),
            running: true,
            ticks: 0,
        })
    }

    /// Process one frame: count down timers, then apply `events` in order.
    pub fn tick(&mut self, events: &[InputEvent], dt: Duration) -> TickOutcome {
        if !self.running {
            return TickOutcome::Quit;
        }
        self.ticks += 1;
        self.advance_timers(dt);
        for event in events {
            self.handle(event);
            if !self.running {
                return TickOutcome::Quit;
            }
        }
        TickOutcome::Continue
    }

    /// Open a screen from Neutral.
    pub fn select(&mut self, mode: ScreenMode) -> Result<(), TransitionError> {
        self.apply_signal(ScreenSignal::Select(mode))
    }

    pub fn mode(&self) -> ScreenMode {
        self.screen.mode()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn ship(&self) -> &Ship {
        &self.ship
    }

    pub fn starmap(&self) -> &Starmap {
        &self.starmap
    }

    pub fn active_location(&self) -> &Location {
        self.starmap.active()
    }

    pub fn analytics(&self) -> &Analytics {
        &self.analytics
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let mode = self.mode();
        SessionSnapshot {
            tick: self.ticks,
            running: self.running,
            mode,
            title: mode.title(),
            active_location: self.starmap.active().clone(),
            ship: self.ship.clone(),
            hovered: self.navigator.hover_view(&self.starmap),
            hovered_row: self.desk.hovered_row(self.pointer.position),
            status: self.status.as_ref().map(|m| StatusView {
                kind: m.kind,
                text: m.text.clone(),
                remaining_ms: m.remaining().as_millis() as u64,
            }),
            travel: self.travel.as_ref().map(|(destination, left)| TravelNotice {
                destination: destination.clone(),
                remaining_ms: left.as_millis() as u64,
            }),
            cruising: self.cruising,
            analytics: self.analytics.clone(),
        }
    }

    fn advance_timers(&mut self, dt: Duration) {
        if let Some(msg) = &mut self.status {
            if !msg.advance(dt) {
                self.status = None;
            }
        }
        if let Some((_, left)) = &mut self.travel {
            *left = left.saturating_sub(dt);
            if left.is_zero() {
                self.travel = None;
            }
        }
    }

    fn handle(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::Quit => self.signal(ScreenSignal::Quit),
            InputEvent::Back => self.signal(ScreenSignal::Exit),
            InputEvent::SelectMode(mode) => self.signal(ScreenSignal::Select(mode)),
            InputEvent::PointerMove { .. } => {
                self.pointer.apply(event);
                self.refresh_hover();
            }
            InputEvent::ButtonDown(button) => {
                self.pointer.apply(event);
                self.refresh_hover();
                self.on_press(button);
            }
            InputEvent::ButtonUp(_) => {
                self.pointer.apply(event);
                if !self.pointer.buttons.any_down() {
                    self.desk.release_all();
                    self.navigator.release_all();
                }
                self.refresh_hover();
            }
        }
    }

    fn refresh_hover(&mut self) {
        if self.mode() == ScreenMode::Map {
            self.navigator.update_hover(&self.starmap, self.pointer);
        }
    }

    fn on_press(&mut self, button: Button) {
        match self.mode() {
            ScreenMode::Trade => {
                let result = self.desk.press(
                    button,
                    self.pointer.position,
                    &mut self.ship,
                    self.starmap.active(),
                );
                if let Some(result) = result {
                    self.analytics.record_trade(&result);
                    self.status = Some(status_for(&result, self.config.message_duration()));
                }
            }
            ScreenMode::Map => {
                if let Some(travel) = self.navigator.press(button, &mut self.starmap) {
                    self.analytics.record_travel(&travel);
                    self.travel = Some((
                        self.starmap.active().name.clone(),
                        self.config.travel_delay(),
                    ));
                    self.cruising = true;
                    self.signal(ScreenSignal::Exit);
                }
            }
            _ => {}
        }
    }

    /// Apply a signal, turning an illegal transition into a status message.
    fn signal(&mut self, signal: ScreenSignal) {
        if let Err(err) = self.apply_signal(signal) {
            warn!(%err, "ignored screen change");
            self.status = Some(StatusMessage::new(
                StatusKind::IllegalTransition,
                err.to_string(),
                self.config.message_duration(),
            ));
        }
    }

    fn apply_signal(&mut self, signal: ScreenSignal) -> Result<(), TransitionError> {
        let from = self.screen.mode();
        let step = self.screen.apply(signal)?;
        if step.next != from {
            self.leave(from);
            self.enter(step.next);
            debug!(?from, to = ?step.next, "screen change");
        }
        if step.ends_session {
            self.running = false;
            info!(ticks = self.ticks, credits = self.ship.credits(), "session ended");
        }
        Ok(())
    }

    fn enter(&mut self, mode: ScreenMode) {
        match mode {
            ScreenMode::Trade => self.desk.open(self.starmap.active(), self.pointer.buttons),
            ScreenMode::Map => self.navigator.open(&self.starmap, self.pointer),
            _ => {}
        }
    }

    fn leave(&mut self, mode: ScreenMode) {
        match mode {
            ScreenMode::Trade => self.desk.close(),
            ScreenMode::Map => self.navigator.close(),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use trader_core::{Commodity, LocationTemplate, Position, PriceEntry, PriceRange, PriceVector};

    const FRAME: Duration = Duration::from_millis(16);

    fn port(name: &str, x: i32, y: i32, iron: u32, gold: u32) -> Location {
        Location {
            name: name.into(),
            description: format!("{name} port"),
            position: Position::new(x, y),
            prices: PriceVector::new(vec![
                PriceEntry {
                    commodity: Commodity::new("Iron Ore"),
                    price: iron,
                },
                PriceEntry {
                    commodity: Commodity::new("Gold Ore"),
                    price: gold,
                },
            ])
            .unwrap(),
        }
    }

    fn config(credits: u64, capacity: u32) -> SessionConfig {
        SessionConfig {
            starting_credits: credits,
            cargo_capacity: capacity,
            locations: vec![LocationTemplate {
                name: "Template".into(),
                description: String::new(),
                prices: vec![PriceRange::new("Iron Ore", 1, 9), PriceRange::new("Gold Ore", 1, 9)],
            }],
            ..SessionConfig::default()
        }
    }

    /// A at (100,100) sells iron for 7, B at (300,300) for 3.
    fn session(credits: u64, capacity: u32) -> Session {
        let ports = vec![port("A", 100, 100, 7, 40), port("B", 300, 300, 3, 20)];
        Session::from_locations(config(credits, capacity), ports, 0).unwrap()
    }

    const IRON_ROW: InputEvent = InputEvent::PointerMove { x: 60, y: 85 };
    const GOLD_ROW: InputEvent = InputEvent::PointerMove { x: 60, y: 110 };
    const DOWN: InputEvent = InputEvent::ButtonDown(Button::Primary);
    const UP: InputEvent = InputEvent::ButtonUp(Button::Primary);
    const SELL_DOWN: InputEvent = InputEvent::ButtonDown(Button::Secondary);
    const SELL_UP: InputEvent = InputEvent::ButtonUp(Button::Secondary);

    fn iron() -> Commodity {
        Commodity::new("Iron Ore")
    }

    fn open(s: &mut Session, mode: ScreenMode) {
        s.tick(&[InputEvent::SelectMode(mode)], FRAME);
        assert_eq!(s.mode(), mode);
    }

    #[test]
    fn seeded_sessions_are_reproducible() {
        let a = Session::from_seed(SessionConfig::default()).unwrap();
        let b = Session::from_seed(SessionConfig::default()).unwrap();
        assert_eq!(a.starmap().locations(), b.starmap().locations());
        assert_eq!(a.active_location(), b.active_location());
        assert_eq!(a.ship().credits(), 100);
        assert_eq!(a.ship().capacity(), 100);
        assert_eq!(a.ship().used(), 0);
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let mut cfg = SessionConfig::default();
        cfg.locations[0].prices[0] = PriceRange::new("Iron Ore", 10, 5);
        assert!(matches!(
            Session::from_seed(cfg),
            Err(SessionError::Invalid(ValidationError::InvertedRange { .. }))
        ));
        let ports = vec![port("A", 1, 1, 1, 1)];
        let err = Session::from_locations(config(1, 1), ports, 3).unwrap_err();
        assert!(matches!(err, SessionError::BadStart { index: 3, count: 1 }));
    }

    #[test]
    fn table_wider_than_the_screen_is_rejected() {
        let mut cfg = SessionConfig::default();
        cfg.trade_table.column_widths = vec![i32::MAX, 1];
        assert!(matches!(
            Session::from_seed(cfg),
            Err(SessionError::Invalid(ValidationError::InvalidTable))
        ));

        // rows come from the supplied ports, not the templates
        let mut cfg = config(100, 100);
        cfg.trade_table.row_height = i32::MAX / 3;
        let ports = vec![port("A", 100, 100, 7, 40)];
        let mut s = Session::from_locations(cfg.clone(), ports, 0).unwrap();
        open(&mut s, ScreenMode::Trade);
        s.tick(&[IRON_ROW, DOWN], FRAME);
        assert_eq!(s.ship().used(), 1);
        let mut third = port("C", 300, 300, 3, 20);
        third.prices = PriceVector::new(vec![
            PriceEntry { commodity: iron(), price: 1 },
            PriceEntry { commodity: Commodity::new("Gold Ore"), price: 2 },
            PriceEntry { commodity: Commodity::new("Water"), price: 3 },
            PriceEntry { commodity: Commodity::new("Salt"), price: 4 },
        ])
        .unwrap();
        assert!(matches!(
            Session::from_locations(cfg, vec![third], 0),
            Err(SessionError::Invalid(ValidationError::InvalidTable))
        ));
    }

    #[test]
    fn buying_at_seven_from_a_hundred() {
        let mut s = session(100, 100);
        open(&mut s, ScreenMode::Trade);
        s.tick(&[IRON_ROW, DOWN], FRAME);
        assert_eq!(s.ship().credits(), 93);
        assert_eq!(s.ship().quantity(&iron()), 1);
        assert_eq!(s.ship().used(), 1);
        let status = s.status().unwrap();
        assert_eq!(status.kind, StatusKind::Bought);
        assert_eq!(status.text, "Bought Iron Ore!");
    }

    #[test]
    fn short_of_funds_is_reported() {
        let mut s = session(5, 100);
        open(&mut s, ScreenMode::Trade);
        s.tick(&[IRON_ROW, DOWN], FRAME);
        assert_eq!(s.ship().credits(), 5);
        assert_eq!(s.ship().used(), 0);
        assert_eq!(s.status().unwrap().kind, StatusKind::InsufficientFunds);
    }

    #[test]
    fn full_hold_is_reported() {
        let mut s = session(1_000, 3);
        open(&mut s, ScreenMode::Trade);
        for _ in 0..3 {
            s.tick(&[IRON_ROW, DOWN], FRAME);
            s.tick(&[UP], FRAME);
        }
        assert_eq!(s.ship().used(), 3);
        let before = s.ship().clone();
        s.tick(&[GOLD_ROW, DOWN], FRAME);
        assert_eq!(s.ship(), &before);
        assert_eq!(s.status().unwrap().kind, StatusKind::CargoFull);
    }

    #[test]
    fn selling_nothing_is_reported() {
        let mut s = session(100, 100);
        open(&mut s, ScreenMode::Trade);
        s.tick(&[IRON_ROW, SELL_DOWN], FRAME);
        assert_eq!(s.ship().credits(), 100);
        assert_eq!(s.status().unwrap().kind, StatusKind::NoStock);
    }

    #[test]
    fn held_button_buys_once() {
        let mut s = session(100, 100);
        open(&mut s, ScreenMode::Trade);
        s.tick(&[IRON_ROW], FRAME);
        for _ in 0..5 {
            s.tick(&[DOWN], FRAME);
        }
        assert_eq!(s.ship().quantity(&iron()), 1);
        assert_eq!(s.analytics().purchases, 1);
        s.tick(&[UP], FRAME);
        s.tick(&[DOWN], FRAME);
        assert_eq!(s.ship().quantity(&iron()), 2);
    }

    #[test]
    fn click_within_one_tick_is_not_dropped() {
        let mut s = session(100, 100);
        open(&mut s, ScreenMode::Trade);
        s.tick(&[IRON_ROW, DOWN, UP, DOWN, UP], FRAME);
        assert_eq!(s.ship().quantity(&iron()), 2);
    }

    #[test]
    fn releasing_one_of_two_buttons_keeps_the_latch() {
        let mut s = session(100, 100);
        open(&mut s, ScreenMode::Trade);
        s.tick(&[IRON_ROW, DOWN], FRAME);
        s.tick(&[SELL_DOWN], FRAME);
        s.tick(&[UP], FRAME);
        s.tick(&[DOWN], FRAME);
        assert_eq!(s.ship().quantity(&iron()), 1);
        s.tick(&[UP, SELL_UP], FRAME);
        s.tick(&[SELL_DOWN], FRAME);
        assert_eq!(s.ship().quantity(&iron()), 0);
        assert_eq!(s.ship().credits(), 100);
    }

    #[test]
    fn press_held_while_opening_trade_does_not_buy() {
        let mut s = session(100, 100);
        s.tick(&[IRON_ROW, DOWN, InputEvent::SelectMode(ScreenMode::Trade)], FRAME);
        s.tick(&[DOWN], FRAME);
        assert_eq!(s.ship().used(), 0);
    }

    #[test]
    fn travel_switches_prices() {
        let mut s = session(100, 100);
        open(&mut s, ScreenMode::Map);
        s.tick(&[InputEvent::PointerMove { x: 305, y: 295 }], FRAME);
        let hovered = s.snapshot().hovered.unwrap();
        assert_eq!(hovered.name, "B");
        assert!((hovered.distance - 282.842).abs() < 0.001);
        s.tick(&[DOWN, UP], FRAME);
        assert_eq!(s.mode(), ScreenMode::Neutral);
        assert_eq!(s.active_location().name, "B");
        let snap = s.snapshot();
        assert_eq!(snap.travel.unwrap().destination, "B");
        assert!(snap.cruising);
        assert_eq!(snap.analytics.jumps, 1);

        open(&mut s, ScreenMode::Trade);
        s.tick(&[IRON_ROW, DOWN], FRAME);
        assert_eq!(s.ship().credits(), 97);
    }

    #[test]
    fn description_shows_while_secondary_held() {
        let mut s = session(100, 100);
        open(&mut s, ScreenMode::Map);
        s.tick(&[InputEvent::PointerMove { x: 300, y: 300 }, SELL_DOWN], FRAME);
        let hovered = s.snapshot().hovered.unwrap();
        assert_eq!(hovered.description.as_deref(), Some("B port"));
        s.tick(&[SELL_UP], FRAME);
        assert_eq!(s.snapshot().hovered.unwrap().description, None);
        assert_eq!(s.mode(), ScreenMode::Map);
        assert_eq!(s.active_location().name, "A");
    }

    #[test]
    fn selecting_from_a_screen_is_reported_not_applied() {
        let mut s = session(100, 100);
        open(&mut s, ScreenMode::Cargo);
        s.tick(&[InputEvent::SelectMode(ScreenMode::Map)], FRAME);
        assert_eq!(s.mode(), ScreenMode::Cargo);
        assert_eq!(s.status().unwrap().kind, StatusKind::IllegalTransition);
        assert!(s.select(ScreenMode::Trade).is_err());
        s.tick(&[InputEvent::Back], FRAME);
        assert_eq!(s.mode(), ScreenMode::Neutral);
        assert!(s.is_running());
    }

    #[test]
    fn quit_from_a_screen_lands_on_neutral_and_ends() {
        let mut s = session(100, 100);
        open(&mut s, ScreenMode::Crew);
        let events = [InputEvent::Quit, InputEvent::SelectMode(ScreenMode::Map)];
        assert_eq!(s.tick(&events, FRAME), TickOutcome::Quit);
        assert_eq!(s.mode(), ScreenMode::Neutral);
        assert!(!s.is_running());
        assert_eq!(s.tick(&[], FRAME), TickOutcome::Quit);
    }

    #[test]
    fn status_expires_after_its_duration() {
        let mut s = session(100, 100);
        open(&mut s, ScreenMode::Trade);
        s.tick(&[IRON_ROW, DOWN], FRAME);
        assert_eq!(s.snapshot().status.unwrap().remaining_ms, 1000);
        s.tick(&[], Duration::from_millis(400));
        assert_eq!(s.snapshot().status.unwrap().remaining_ms, 600);
        s.tick(&[], Duration::from_millis(600));
        assert!(s.snapshot().status.is_none());
    }

    #[test]
    fn snapshot_serializes() {
        let mut s = session(100, 100);
        open(&mut s, ScreenMode::Trade);
        s.tick(&[IRON_ROW, DOWN], FRAME);
        let json = serde_json::to_value(s.snapshot()).unwrap();
        assert_eq!(json["mode"], "Trade");
        assert_eq!(json["title"], "Trade Menu");
        assert_eq!(json["ship"]["credits"], 93);
        assert_eq!(json["hovered_row"], 0);
        assert_eq!(json["active_location"]["prices"][0]["price"], 7);
    }

    fn any_event() -> impl Strategy<Value = InputEvent> {
        let mode = proptest::sample::select(ScreenMode::ALL.to_vec());
        let button = prop_oneof![Just(Button::Primary), Just(Button::Secondary)];
        prop_oneof![
            1 => Just(InputEvent::Back),
            3 => mode.prop_map(InputEvent::SelectMode),
            4 => (0i32..500, 0i32..500).prop_map(|(x, y)| InputEvent::PointerMove { x, y }),
            4 => button.clone().prop_map(InputEvent::ButtonDown),
            4 => button.prop_map(InputEvent::ButtonUp),
            // trade rows, so random input actually trades
            4 => (0i32..2).prop_map(|row| InputEvent::PointerMove { x: 60, y: 85 + 25 * row }),
        ]
    }

    proptest! {
        #[test]
        fn ledger_invariants_hold_under_random_input(
            ticks in proptest::collection::vec(proptest::collection::vec(any_event(), 0..6), 1..80),
            credits in 0u64..200,
            capacity in 1u32..10,
        ) {
            let mut s = session(credits, capacity);
            for events in ticks {
                s.tick(&events, FRAME);
                prop_assert!(s.ship().check_invariants().is_ok());
                prop_assert!(s.ship().used() <= s.ship().capacity());
                prop_assert!(s.starmap().active_index() < s.starmap().locations().len());
            }
        }

        #[test]
        fn holding_for_n_ticks_trades_once(n in 2usize..40) {
            let mut s = session(1_000, 100);
            open(&mut s, ScreenMode::Trade);
            s.tick(&[IRON_ROW], FRAME);
            for _ in 0..n {
                s.tick(&[DOWN], FRAME);
            }
            prop_assert_eq!(s.analytics().purchases, 1);
            prop_assert_eq!(s.ship().quantity(&iron()), 1);
        }

        #[test]
        fn trades_after_travel_use_destination_prices(
            prices in proptest::collection::vec(1u32..50, 3),
            dest in 0usize..3,
        ) {
            let ports: Vec<Location> = prices
                .iter()
                .enumerate()
                .map(|(i, p)| {
                    let at = 100 + 150 * i as i32;
                    port(&format!("P{i}"), at, at, *p, 40)
                })
                .collect();
            let mut s = Session::from_locations(config(1_000, 100), ports, 0).unwrap();
            open(&mut s, ScreenMode::Map);
            let target = s.starmap().get(dest).unwrap().position;
            s.tick(&[InputEvent::PointerMove { x: target.x, y: target.y }, DOWN, UP], FRAME);
            prop_assert_eq!(s.starmap().active_index(), dest);
            prop_assert_eq!(&s.active_location().name, &format!("P{dest}"));

            open(&mut s, ScreenMode::Trade);
            s.tick(&[IRON_ROW, DOWN], FRAME);
            let paid = 1_000 - s.ship().credits();
            let local = s.starmap().get(dest).unwrap().prices.price_of(&iron()).unwrap();
            prop_assert_eq!(paid, u64::from(local));
            if prices[0] != prices[dest] {
                prop_assert_ne!(paid, u64::from(prices[0]));
            }
        }

        #[test]
        fn every_screen_exit_returns_to_neutral(
            mode in proptest::sample::select(ScreenMode::ALL[1..].to_vec()),
            quit in any::<bool>(),
        ) {
            let mut s = session(100, 100);
            open(&mut s, mode);
            let exit = if quit { InputEvent::Quit } else { InputEvent::Back };
            s.tick(&[exit], FRAME);
            prop_assert_eq!(s.mode(), ScreenMode::Neutral);
            prop_assert_eq!(s.is_running(), !quit);
        }
    }
}
