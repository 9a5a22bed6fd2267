//! Cyber Arena entry point
//!
//! Native build runs a headless demo: an autopilot plays one run against a
//! synthetic 60 Hz host clock, then the result is paid out into progression.
//!
//! Usage: `cyber-arena [settings.json] [character-id] [level-id]`

fn main() {
    use std::cell::RefCell;
    use std::rc::Rc;

    use cyber_arena::progress::{MissionBoard, Progression};
    use cyber_arena::renderer::LogRenderer;
    use cyber_arena::sim::Catalog;
    use cyber_arena::{FrameStatus, Loadout, Session, Settings};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Cyber Arena (native, headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };
    let character_id = args.next();
    let level_id = args.next().and_then(|s| s.parse().ok());

    let catalog = Catalog::builtin();
    let mut progression = Progression::new(&catalog);
    let loadout = Loadout {
        character_id,
        level_id,
        unlocked: progression.unlocked.clone(),
    };

    let finished = Rc::new(RefCell::new(None));
    let slot = finished.clone();
    let mut session = Session::new(settings, catalog, loadout, MissionBoard::builtin())
        .with_outcome_callback(move |o| *slot.borrow_mut() = Some(o));
    let mut renderer = LogRenderer::new(600);

    // 60 Hz host callbacks, capped at ten simulated minutes
    let host_frame_ms = 1000.0 / 60.0;
    let mut now = 0.0;
    session.start(now);
    while now < 600_000.0 {
        now += host_frame_ms;
        autopilot(&mut session);
        if let FrameStatus::Ended(_) = session.frame(now, &mut renderer) {
            break;
        }
    }

    let Some(outcome) = *finished.borrow() else {
        log::warn!("Run did not finish within the time cap");
        return;
    };
    let earned = progression.award(&outcome);
    log::info!(
        "{} - score {}, {} XP earned",
        if outcome.victory { "Victory" } else { "Defeat" },
        outcome.score,
        earned
    );

    let ids: Vec<String> = session.telemetry().claimable().map(|m| m.id.clone()).collect();
    for id in ids {
        if let Ok(reward) = session.telemetry_mut().claim(&id, &mut progression) {
            log::info!("Mission '{id}' complete (+{reward} XP)");
        }
    }
    log::info!("Total XP: {}", progression.xp);
}

/// Simple demo AI: keep distance, shoot constantly, jump over close hostiles
fn autopilot<T: cyber_arena::sim::TelemetrySink>(session: &mut cyber_arena::Session<T>) {
    use cyber_arena::platform::HostInput;
    use cyber_arena::sim::ability;

    let Some(state) = session.state() else {
        return;
    };
    let avatar_x = state.avatar.pos.x;
    let nearest = state
        .hostiles
        .iter()
        .map(|h| h.pos.x - avatar_x)
        .filter(|dx| *dx > 0.0)
        .fold(f32::INFINITY, f32::min);
    let special_ready = ability::special_availability(state).is_ready();
    let on_ground = state.avatar.on_ground;

    let mut events = vec![HostInput::KeyDown("x".to_string())];
    if special_ready && nearest < 300.0 {
        events.push(HostInput::KeyDown("c".to_string()));
    }
    if on_ground && nearest < 120.0 {
        events.push(HostInput::KeyDown(" ".to_string()));
    }
    if nearest < 250.0 {
        events.push(HostInput::KeyDown("ArrowLeft".to_string()));
    } else {
        events.push(HostInput::KeyUp("ArrowLeft".to_string()));
    }

    for event in &events {
        session.handle_input(event);
    }
}
