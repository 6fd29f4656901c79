#![deny(warnings)]

//! Core domain models and invariants for Space Trader.
//!
//! This crate defines the types shared by the economy engine and the session
//! runtime: commodities, ports and their price vectors, pointer input, screen
//! modes and the session configuration, with validation helpers that reject
//! malformed configuration before a session starts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Commodity identifier, e.g. "Iron Ore".
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Commodity(pub String);

impl Commodity {
    /// Build a commodity from any string-like name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the commodity name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Commodity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// Integer point in screen/map space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Position) -> f64 {
        let dx = (other.x as i64 - self.x as i64) as f64;
        let dy = (other.y as i64 - self.y as i64) as f64;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Axis-aligned rectangle. Left/top edges are inside, right/bottom are not.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn contains(&self, p: Position) -> bool {
        let (px, py) = (i64::from(p.x), i64::from(p.y));
        let (x, y) = (i64::from(self.x), i64::from(self.y));
        px >= x && px < x + i64::from(self.width) && py >= y && py < y + i64::from(self.height)
    }
}

/// One commodity price inside a [`PriceVector`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PriceEntry {
    /// Commodity being priced.
    pub commodity: Commodity,
    /// Price in credits (> 0).
    pub price: u32,
}

/// Ordered, non-empty commodity to price mapping with every price > 0.
///
/// The same price is used for buying and selling at a port.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PriceVector(Vec<PriceEntry>);

impl PriceVector {
    /// Build a validated price vector, keeping the given order.
    pub fn new(entries: Vec<PriceEntry>) -> Result<Self, ValidationError> {
        if entries.is_empty() {
            return Err(ValidationError::EmptyPriceVector);
        }
        for (i, e) in entries.iter().enumerate() {
            if e.price == 0 {
                return Err(ValidationError::NonPositivePrice(e.commodity.0.clone()));
            }
            if entries[..i].iter().any(|prev| prev.commodity == e.commodity) {
                return Err(ValidationError::DuplicateCommodity(e.commodity.0.clone()));
            }
        }
        Ok(Self(entries))
    }

    /// Price of `commodity`, if this port trades it.
    pub fn price_of(&self, commodity: &Commodity) -> Option<u32> {
        self.0
            .iter()
            .find(|e| &e.commodity == commodity)
            .map(|e| e.price)
    }

    pub fn entries(&self) -> &[PriceEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a constructed vector; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A trading port. Created once per session and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Location {
    /// Port name, e.g. "Iron Mines".
    pub name: String,
    /// Flavour text shown on the star map.
    pub description: String,
    /// Fixed map position of the port icon center.
    pub position: Position,
    /// Commodity prices at this port.
    pub prices: PriceVector,
}

/// Closed integer range a commodity price is drawn from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub commodity: Commodity,
    pub min: u32,
    pub max: u32,
}

impl PriceRange {
    pub fn new(commodity: &str, min: u32, max: u32) -> Self {
        Self {
            commodity: Commodity::new(commodity),
            min,
            max,
        }
    }
}

/// Template a port is generated from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationTemplate {
    pub name: String,
    pub description: String,
    pub prices: Vec<PriceRange>,
}

/// Star map dimensions and the port icon footprint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapBounds {
    pub width: i32,
    pub height: i32,
    /// Ports are never placed closer than this to a map edge.
    pub margin: i32,
    /// Side length of the square hit box centered on a port.
    pub icon_size: i32,
}

impl Default for MapBounds {
    fn default() -> Self {
        Self {
            width: 500,
            height: 500,
            margin: 50,
            icon_size: 30,
        }
    }
}

/// Geometry of the trade table: a header followed by one row per commodity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TradeTableLayout {
    pub x: i32,
    pub y: i32,
    pub column_widths: Vec<i32>,
    pub header_height: i32,
    pub row_height: i32,
}

impl Default for TradeTableLayout {
    fn default() -> Self {
        Self {
            x: 40,
            y: 50,
            column_widths: vec![250, 100],
            header_height: 30,
            row_height: 25,
        }
    }
}

impl TradeTableLayout {
    /// Hit box of the row at `index` (0-based, below the header).
    pub fn row_rect(&self, index: usize) -> Rect {
        let offset = i32::try_from(index)
            .unwrap_or(i32::MAX)
            .saturating_mul(self.row_height);
        Rect {
            x: self.x,
            y: self
                .y
                .saturating_add(self.header_height)
                .saturating_add(offset),
            width: self
                .column_widths
                .iter()
                .fold(0i32, |acc, w| acc.saturating_add(*w)),
            height: self.row_height,
        }
    }
}

/// Pointer buttons the core reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Button {
    /// Left click: buy, travel.
    Primary,
    /// Right click: sell, show port description.
    Secondary,
}

/// Top-level screen. Exactly one is current.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScreenMode {
    #[default]
    Neutral,
    Crew,
    Cargo,
    Trade,
    Map,
    Analytics,
}

impl ScreenMode {
    pub const ALL: [ScreenMode; 6] = [
        ScreenMode::Neutral,
        ScreenMode::Crew,
        ScreenMode::Cargo,
        ScreenMode::Trade,
        ScreenMode::Map,
        ScreenMode::Analytics,
    ];

    pub fn is_neutral(self) -> bool {
        self == ScreenMode::Neutral
    }

    /// Window caption for the screen.
    pub fn title(self) -> &'static str {
        match self {
            ScreenMode::Neutral => "Space Trader",
            ScreenMode::Crew => "Crew Management",
            ScreenMode::Cargo => "Cargo Bay",
            ScreenMode::Trade => "Trade Menu",
            ScreenMode::Map => "Star Map",
            ScreenMode::Analytics => "Ship Analytics",
        }
    }
}

/// Discrete input delivered to the session, in order, once per tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Window close request.
    Quit,
    /// Leave the current screen without quitting.
    Back,
    PointerMove { x: i32, y: i32 },
    ButtonDown(Button),
    ButtonUp(Button),
    /// Menu command choosing a screen.
    SelectMode(ScreenMode),
}

/// Which pointer buttons are currently down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ButtonState {
    pub primary: bool,
    pub secondary: bool,
}

impl ButtonState {
    pub fn set(&mut self, button: Button, down: bool) {
        match button {
            Button::Primary => self.primary = down,
            Button::Secondary => self.secondary = down,
        }
    }

    pub fn is_down(&self, button: Button) -> bool {
        match button {
            Button::Primary => self.primary,
            Button::Secondary => self.secondary,
        }
    }

    pub fn any_down(&self) -> bool {
        self.primary || self.secondary
    }
}

/// Latest pointer position and button state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PointerState {
    pub position: Position,
    pub buttons: ButtonState,
}

impl PointerState {
    /// Fold one event into the pointer state. Non-pointer events are ignored.
    pub fn apply(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::PointerMove { x, y } => self.position = Position::new(x, y),
            InputEvent::ButtonDown(b) => self.buttons.set(b, true),
            InputEvent::ButtonUp(b) => self.buttons.set(b, false),
            _ => {}
        }
    }
}

/// Turns a continuously-true "held" signal into a single rising edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputEdgeState {
    held: bool,
}

impl InputEdgeState {
    /// Record that a button is held. Returns true only on the not-held to held edge.
    pub fn press(&mut self) -> bool {
        let edge = !self.held;
        self.held = true;
        edge
    }

    pub fn release(&mut self) {
        self.held = false;
    }

    /// Set the latch without reporting an edge.
    pub fn arm(&mut self, held: bool) {
        self.held = held;
    }

    pub fn is_held(&self) -> bool {
        self.held
    }
}

/// What a status message reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum StatusKind {
    Bought,
    Sold,
    InsufficientFunds,
    CargoFull,
    NoStock,
    NotTraded,
    Aborted,
    IllegalTransition,
}

/// Short-lived, time-boxed message for the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
    remaining: Duration,
}

impl StatusMessage {
    pub fn new(kind: StatusKind, text: impl Into<String>, duration: Duration) -> Self {
        Self {
            kind,
            text: text.into(),
            remaining: duration,
        }
    }

    /// Count down `dt`; returns false once the message has expired.
    pub fn advance(&mut self, dt: Duration) -> bool {
        self.remaining = self.remaining.saturating_sub(dt);
        !self.remaining.is_zero()
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }
}

/// Session configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Seed for deterministic market generation.
    pub rng_seed: u64,
    /// Credits the ship starts with.
    pub starting_credits: u64,
    /// Ceiling on the total cargo units aboard.
    pub cargo_capacity: u32,
    /// How long a trade status message stays visible.
    pub message_duration_ms: u64,
    /// How long the "Traveling to ..." notice stays visible.
    pub travel_delay_ms: u64,
    pub map: MapBounds,
    pub trade_table: TradeTableLayout,
    pub locations: Vec<LocationTemplate>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            rng_seed: 42,
            starting_credits: 100,
            cargo_capacity: 100,
            message_duration_ms: 1000,
            travel_delay_ms: 1000,
            map: MapBounds::default(),
            trade_table: TradeTableLayout::default(),
            locations: default_locations(),
        }
    }
}

impl SessionConfig {
    pub fn message_duration(&self) -> Duration {
        Duration::from_millis(self.message_duration_ms)
    }

    pub fn travel_delay(&self) -> Duration {
        Duration::from_millis(self.travel_delay_ms)
    }
}

/// Every commodity priced at any of `locations`, in first-seen order.
pub fn traded_commodities(locations: &[Location]) -> Vec<Commodity> {
    let mut out: Vec<Commodity> = Vec::new();
    for entry in locations.iter().flat_map(|l| l.prices.entries()) {
        if !out.contains(&entry.commodity) {
            out.push(entry.commodity.clone());
        }
    }
    out
}

/// The four ports of the stock scenario.
pub fn default_locations() -> Vec<LocationTemplate> {
    let port = |name: &str,
                description: &str,
                iron: (u32, u32),
                gold: (u32, u32),
                diamond: (u32, u32)| LocationTemplate {
        name: name.to_string(),
        description: description.to_string(),
        prices: vec![
            PriceRange::new("Iron Ore", iron.0, iron.1),
            PriceRange::new("Gold Ore", gold.0, gold.1),
            PriceRange::new("Diamond Ore", diamond.0, diamond.1),
        ],
    };
    vec![
        port(
            "Iron Mines",
            "Come get y'alls Iron for cheap!",
            (5, 10),
            (45, 75),
            (90, 200),
        ),
        port(
            "Gold Mines",
            "Gold 4 cheap! All other luxury materials maybe.",
            (15, 20),
            (25, 65),
            (150, 250),
        ),
        port(
            "The Grand",
            "All your luxury desires, accomodated.",
            (10, 10),
            (25, 35),
            (250, 350),
        ),
        port(
            "High Class Mining",
            "The best materials, for the finest Customers",
            (10, 20),
            (100, 150),
            (100, 300),
        ),
    ]
}

/// Validation errors for configuration and domain invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("location name must not be empty")]
    EmptyName,
    #[error("price vector must not be empty")]
    EmptyPriceVector,
    #[error("price for {0} must be > 0")]
    NonPositivePrice(String),
    #[error("price range for {commodity} is inverted ({min} > {max})")]
    InvertedRange { commodity: String, min: u32, max: u32 },
    #[error("commodity {0} listed twice")]
    DuplicateCommodity(String),
    #[error("at least one location is required")]
    NoLocations,
    #[error("cargo capacity must be > 0")]
    ZeroCapacity,
    #[error("map {width}x{height} leaves no room inside margin {margin}")]
    MapTooSmall { width: i32, height: i32, margin: i32 },
    #[error("trade table needs positive row height and column widths that fit on screen")]
    InvalidTable,
}

/// Validate a single port template.
pub fn validate_template(t: &LocationTemplate) -> Result<(), ValidationError> {
    if t.name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if t.prices.is_empty() {
        return Err(ValidationError::EmptyPriceVector);
    }
    for (i, r) in t.prices.iter().enumerate() {
        if r.min == 0 {
            return Err(ValidationError::NonPositivePrice(r.commodity.0.clone()));
        }
        if r.min > r.max {
            return Err(ValidationError::InvertedRange {
                commodity: r.commodity.0.clone(),
                min: r.min,
                max: r.max,
            });
        }
        if t.prices[..i].iter().any(|p| p.commodity == r.commodity) {
            return Err(ValidationError::DuplicateCommodity(r.commodity.0.clone()));
        }
    }
    Ok(())
}

/// Validate map bounds: the placement area inside the margin must be non-empty.
pub fn validate_map(m: &MapBounds) -> Result<(), ValidationError> {
    let inner = |extent: i32| i64::from(extent) - 2 * i64::from(m.margin);
    if m.margin < 0 || m.icon_size <= 0 || inner(m.width) < 0 || inner(m.height) < 0 {
        return Err(ValidationError::MapTooSmall {
            width: m.width,
            height: m.height,
            margin: m.margin,
        });
    }
    Ok(())
}

/// Validate a whole session configuration.
pub fn validate_config(c: &SessionConfig) -> Result<(), ValidationError> {
    if c.cargo_capacity == 0 {
        return Err(ValidationError::ZeroCapacity);
    }
    if c.locations.is_empty() {
        return Err(ValidationError::NoLocations);
    }
    for t in &c.locations {
        validate_template(t)?;
    }
    validate_map(&c.map)?;
    let rows = c.locations.iter().map(|t| t.prices.len()).max().unwrap_or(0);
    validate_table(&c.trade_table, rows)
}

/// Validate trade table geometry for `rows` commodity rows. Every row edge
/// must fit in screen coordinates.
pub fn validate_table(t: &TradeTableLayout, rows: usize) -> Result<(), ValidationError> {
    if t.row_height <= 0
        || t.header_height < 0
        || t.column_widths.is_empty()
        || t.column_widths.iter().any(|w| *w <= 0)
    {
        return Err(ValidationError::InvalidTable);
    }
    let right = t
        .column_widths
        .iter()
        .try_fold(t.x, |acc, w| acc.checked_add(*w));
    let bottom = i32::try_from(rows)
        .ok()
        .and_then(|n| n.checked_mul(t.row_height))
        .and_then(|h| h.checked_add(t.header_height))
        .and_then(|h| h.checked_add(t.y));
    if right.is_none() || bottom.is_none() {
        return Err(ValidationError::InvalidTable);
    }
    Ok(())
}
