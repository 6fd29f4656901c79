#![deny(warnings)]

//! Headless driver: builds a session, feeds it scripted input at the fixed
//! frame rate and prints the final state.

use anyhow::{Context, Result};
use std::fs;
use tracing::info;
use tracing_subscriber::EnvFilter;
use trader_core::{Button, InputEvent, ScreenMode, SessionConfig};
use trader_runtime::{frame_duration, run_session, ScriptedInput, Session, SessionSnapshot};

#[derive(Debug, Default)]
struct Args {
    scenario: Option<String>,
    script: Option<String>,
    seed: Option<u64>,
    max_ticks: Option<u64>,
    json: bool,
}

fn parse_args() -> Args {
    let mut args = Args::default();
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--scenario" => args.scenario = it.next(),
            "--script" => args.script = it.next(),
            "--seed" => args.seed = it.next().and_then(|s| s.parse().ok()),
            "--ticks" => args.max_ticks = it.next().and_then(|s| s.parse().ok()),
            "--json" => args.json = true,
            _ => {}
        }
    }
    args
}

fn load_config(args: &Args) -> Result<SessionConfig> {
    let mut cfg: SessionConfig = match &args.scenario {
        Some(path) => {
            let text =
                fs::read_to_string(path).with_context(|| format!("reading scenario {path}"))?;
            serde_yaml::from_str(&text).with_context(|| format!("parsing scenario {path}"))?
        }
        None => SessionConfig::default(),
    };
    if let Some(seed) = args.seed {
        cfg.rng_seed = seed;
    }
    Ok(cfg)
}

fn load_script(path: &str) -> Result<Vec<Vec<InputEvent>>> {
    let text = fs::read_to_string(path).with_context(|| format!("reading script {path}"))?;
    serde_yaml::from_str(&text).with_context(|| format!("parsing script {path}"))
}

/// Buy one unit of the first commodity, try selling the second, then fly to
/// the next port and quit.
fn demo_script(session: &Session) -> Vec<Vec<InputEvent>> {
    let table = &session.config().trade_table;
    let row = |i: usize| {
        let r = table.row_rect(i);
        InputEvent::PointerMove {
            x: r.x + 1,
            y: r.y + 1,
        }
    };
    let map = session.starmap();
    let next = &map.locations()[(map.active_index() + 1) % map.locations().len()];
    vec![
        vec![InputEvent::SelectMode(ScreenMode::Trade)],
        vec![row(0), InputEvent::ButtonDown(Button::Primary)],
        vec![InputEvent::ButtonDown(Button::Primary)],
        vec![InputEvent::ButtonUp(Button::Primary)],
        vec![row(1), InputEvent::ButtonDown(Button::Secondary)],
        vec![InputEvent::ButtonUp(Button::Secondary), InputEvent::Back],
        vec![InputEvent::SelectMode(ScreenMode::Map)],
        vec![InputEvent::PointerMove {
            x: next.position.x,
            y: next.position.y,
        }],
        vec![InputEvent::ButtonDown(Button::Primary), InputEvent::ButtonUp(Button::Primary)],
        vec![InputEvent::Quit],
    ]
}

/// Log filter from a `RUST_LOG`-style directive string, `info` when unset or invalid.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn snapshot_json(snap: &SessionSnapshot) -> Result<String> {
    Ok(serde_json::to_string_pretty(snap)?)
}

fn main() -> Result<()> {
    // Logging setup; stdout is reserved for the report
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(directives.as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args();
    info!(?args, "starting CLI");

    let cfg = load_config(&args)?;
    let mut session = Session::from_seed(cfg)?;
    let ticks = match &args.script {
        Some(path) => load_script(path)?,
        None => demo_script(&session),
    };
    let max_ticks = args.max_ticks.unwrap_or(ticks.len() as u64);
    let mut input = ScriptedInput::new(ticks);
    let summary = run_session(&mut session, &mut input, frame_duration(), max_ticks);

    let snap = session.snapshot();
    if args.json {
        println!("{}", snapshot_json(&snap)?);
        return Ok(());
    }
    println!(
        "Run | ticks: {} | quit: {} | mode: {} | docked at: {}",
        summary.ticks,
        summary.quit,
        snap.title,
        snap.active_location.name
    );
    println!(
        "Ship | credits: {}c | cargo: {}/{}",
        snap.ship.credits(),
        snap.ship.used(),
        snap.ship.capacity()
    );
    for hold in snap.ship.holds() {
        println!("  {:<20} {}", hold.commodity, hold.quantity);
    }
    let a = &snap.analytics;
    println!(
        "Log | bought: {} ({}c) | sold: {} ({}c) | refused: {} | jumps: {} | distance: {}",
        a.purchases,
        a.credits_spent,
        a.sales,
        a.credits_earned,
        a.rejected_trades,
        a.jumps,
        a.distance_travelled as u64
    );
    if let Some(status) = &snap.status {
        println!("Status | {}", status.text);
    }

    Ok(())
}
