//! Star map navigation: port hover, distance and travel.

use serde::Serialize;
use tracing::info;
use trader_core::{Button, InputEdgeState, Location, MapBounds, PointerState, Position};

/// The generated ports and which one the ship is docked at.
///
/// Exactly one port is active at any time; only [`Navigator::press`] moves it.
#[derive(Clone, Debug)]
pub struct Starmap {
    locations: Vec<Location>,
    active: usize,
}

impl Starmap {
    /// `None` when `active` does not index into `locations`.
    pub fn new(locations: Vec<Location>, active: usize) -> Option<Self> {
        (active < locations.len()).then_some(Self { locations, active })
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn active(&self) -> &Location {
        &self.locations[self.active]
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn get(&self, index: usize) -> Option<&Location> {
        self.locations.get(index)
    }

    fn travel(&mut self, to: usize) {
        self.active = to;
    }
}

/// A committed jump between two ports.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Travel {
    pub from: usize,
    pub to: usize,
    pub distance: f64,
}

/// Port under the pointer, as shown on the map.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HoverView {
    pub index: usize,
    pub name: String,
    /// Distance from the active port.
    pub distance: f64,
    /// Set while the secondary button is held over the port.
    pub description: Option<String>,
}

/// Map screen controller.
#[derive(Clone, Debug)]
pub struct Navigator {
    bounds: MapBounds,
    hovered: Option<usize>,
    describing: bool,
    edge: InputEdgeState,
}

impl Navigator {
    pub fn new(bounds: MapBounds) -> Self {
        Self {
            bounds,
            hovered: None,
            describing: false,
            edge: InputEdgeState::default(),
        }
    }

    pub fn open(&mut self, starmap: &Starmap, pointer: PointerState) {
        self.edge.arm(pointer.buttons.any_down());
        self.update_hover(starmap, pointer);
    }

    pub fn close(&mut self) {
        self.hovered = None;
        self.describing = false;
        self.edge.release();
    }

    /// Hit-test every port icon. When icons overlap the last port wins.
    pub fn update_hover(&mut self, starmap: &Starmap, pointer: PointerState) {
        self.hovered = starmap
            .locations()
            .iter()
            .rposition(|l| icon_contains(&self.bounds, l.position, pointer.position));
        self.describing = self.hovered.is_some() && pointer.buttons.secondary;
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn hover_view(&self, starmap: &Starmap) -> Option<HoverView> {
        let index = self.hovered?;
        let port = starmap.get(index)?;
        Some(HoverView {
            index,
            name: port.name.clone(),
            distance: starmap.active().position.distance(port.position),
            description: self.describing.then(|| port.description.clone()),
        })
    }

    /// Handle a button press. A fresh primary edge over a port travels there.
    pub fn press(&mut self, button: Button, starmap: &mut Starmap) -> Option<Travel> {
        let edge = self.edge.press();
        if !edge || button != Button::Primary {
            return None;
        }
        let to = self.hovered?;
        let from = starmap.active_index();
        let distance = starmap.active().position.distance(starmap.get(to)?.position);
        starmap.travel(to);
        info!(
            from = %starmap.locations()[from].name,
            to = %starmap.active().name,
            distance,
            "travel"
        );
        Some(Travel { from, to, distance })
    }

    pub fn release_all(&mut self) {
        self.edge.release();
    }
}

/// Square icon footprint centered on `center`, edges inclusive.
fn icon_contains(bounds: &MapBounds, center: Position, p: Position) -> bool {
    let half = i64::from(bounds.icon_size / 2);
    let within = |c: i32, v: i32| (i64::from(v) - i64::from(c)).abs() <= half;
    within(center.x, p.x) && within(center.y, p.y)
}
