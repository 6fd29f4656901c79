#![deny(warnings)]

//! Headless HUD driven by a bevy_ecs schedule: one schedule run per frame.

use bevy_ecs::prelude::*;
use trader_core::{Button, InputEvent, ScreenMode, SessionConfig};
use trader_runtime::{frame_duration, Session, TickOutcome};

#[derive(Resource)]
struct ActiveSession(Session);

/// Input gathered for the next frame.
#[derive(Resource, Default)]
struct PendingInput(Vec<InputEvent>);

#[derive(Resource, Default, Debug)]
struct HudState {
    caption: String,
    port: String,
    credits: u64,
    cargo: String,
    message: String,
    quit: bool,
}

fn tick_session_system(mut session: ResMut<ActiveSession>, mut input: ResMut<PendingInput>) {
    let events = std::mem::take(&mut input.0);
    if session.0.tick(&events, frame_duration()) == TickOutcome::Quit {
        tracing::info!("quit requested");
    }
}

fn update_hud_system(session: Res<ActiveSession>, mut hud: ResMut<HudState>) {
    let snap = session.0.snapshot();
    hud.caption = snap.title.to_string();
    hud.port = snap.active_location.name.clone();
    hud.credits = snap.ship.credits();
    hud.cargo = format!("{}/{}", snap.ship.used(), snap.ship.capacity());
    hud.message = snap.status.map(|s| s.text).unwrap_or_default();
    hud.quit = !snap.running;
}

fn build_world(session: Session) -> (World, Schedule) {
    let mut world = World::new();
    world.insert_resource(ActiveSession(session));
    world.insert_resource(PendingInput::default());
    world.insert_resource(HudState::default());
    let mut schedule = Schedule::default();
    schedule.add_systems((tick_session_system, update_hud_system).chain());
    (world, schedule)
}

fn frame(world: &mut World, schedule: &mut Schedule, events: Vec<InputEvent>) {
    world.resource_mut::<PendingInput>().0 = events;
    schedule.run(world);
}

fn main() {
    tracing_subscriber::fmt().init();
    let session = match Session::from_seed(SessionConfig::default()) {
        Ok(s) => s,
        Err(err) => {
            eprintln!("game-frontend: {err}");
            std::process::exit(1);
        }
    };
    let (mut world, mut schedule) = build_world(session);
    let script = vec![
        vec![InputEvent::SelectMode(ScreenMode::Trade)],
        vec![
            InputEvent::PointerMove { x: 60, y: 85 },
            InputEvent::ButtonDown(Button::Primary),
        ],
        vec![InputEvent::ButtonUp(Button::Primary)],
        vec![InputEvent::Back],
        vec![InputEvent::Quit],
    ];
    for events in script {
        frame(&mut world, &mut schedule, events);
        let hud = world.resource::<HudState>();
        println!(
            "game-frontend: [{}] {} | {}c | cargo {} | {}",
            hud.caption, hud.port, hud.credits, hud.cargo, hud.message
        );
        if hud.quit {
            break;
        }
    }
}
