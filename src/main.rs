use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use glam::Vec2;
use log::{info, warn};

use combat_timeline::engine::assets::{AssetLoader, AssetType};
use combat_timeline::game::ai::{PursuitBrain, PursuitTuning};
use combat_timeline::game::combat::{
    AttackKind, ClipChannels, ClipRef, CombatTuning, Faction, FightingStyle, HitReaction,
    HitboxType, MoveDefinition, SampleMode,
};
use combat_timeline::game::Arena;

/// Simulated wall-clock frame (a steady 60 Hz display)
const FRAME: Duration = Duration::from_micros(16_667);

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting combat timeline demo...");

    let root = std::env::args().nth(1).unwrap_or_else(|| "assets".to_string());
    let loader = AssetLoader::new(&root);

    let tuning = if loader.exists(AssetType::Tuning, "combat.json") {
        loader.load_json::<CombatTuning>(AssetType::Tuning, "combat.json")?
    } else {
        CombatTuning::default()
    };

    let style = match FightingStyle::load(&loader, "ninja.json") {
        Ok(mut style) => {
            if let Err(e) = bake_heavy(&loader, &mut style) {
                warn!("Heavy attack left without root motion: {}", e);
            }
            style
        }
        Err(e) => {
            warn!("Using built-in style ({})", e);
            builtin_style()
        }
    };

    let mut arena = Arena::new(tuning);
    let hero = arena.spawn("hero", Faction::Player, style.clone(), Vec2::ZERO, Vec2::X);
    let bandit = arena.spawn(
        "bandit",
        Faction::Enemy,
        style,
        Vec2::new(8.0, 0.5),
        -Vec2::X,
    );
    arena.set_brain(
        bandit,
        PursuitBrain::new(Faction::Player, PursuitTuning::default()),
    );

    // Scripted input: wait for the bandit to close in, then run the light chain
    // pressing inside each combo window, and finish with a heavy sweep
    let script = [
        (150, AttackKind::Light),
        (172, AttackKind::Light),
        (198, AttackKind::Light),
        (260, AttackKind::Heavy),
    ];

    let mut frame = 0u32;
    while frame < 420 && arena.actors().alive_count() > 1 {
        for (at, kind) in script.iter() {
            if *at == frame {
                if let Some(outcome) = arena.request_attack(hero, *kind) {
                    info!("Frame {}: {:?} -> {:?}", frame, kind, outcome);
                }
            }
        }

        for report in arena.run_frame(FRAME) {
            for hit in &report.hits {
                info!(
                    "t={:.2}s actor {} struck actor {} for {}",
                    arena.now(),
                    hit.attacker,
                    hit.target,
                    hit.damage
                );
            }
        }
        frame += 1;
    }

    for actor in arena.actors().all() {
        info!(
            "{}: {:.0}/{:.0} health at {:?}",
            actor.name,
            actor.health.current(),
            actor.health.max(),
            arena.position(actor.id)
        );
    }
    info!(
        "{} audio cues fired over {:.2}s",
        arena.audio().played().len(),
        arena.now()
    );

    Ok(())
}

/// Bake the heavy attack's root motion from its clip channels
fn bake_heavy(loader: &AssetLoader, style: &mut FightingStyle) -> Result<()> {
    let Some(heavy) = style.heavy_attack.as_mut() else {
        return Ok(());
    };
    let file = format!("{}.json", heavy.name);
    let channels: ClipChannels = loader.load_json(AssetType::Clip, &file)?;
    let mv = Arc::make_mut(heavy);
    mv.bake_motion(&channels, SampleMode::default());
    mv.validate();
    Ok(())
}

fn builtin_style() -> FightingStyle {
    FightingStyle::new("brawler")
        .with_light(MoveDefinition::new("jab", ClipRef::new("jab", 0.5, 30.0)))
        .with_light(
            MoveDefinition::new("hook", ClipRef::new("hook", 0.6, 30.0)).with_damage(12.0),
        )
        .with_heavy(
            MoveDefinition::new("stomp", ClipRef::new("stomp", 1.0, 30.0))
                .with_damage(25.0)
                .heavy()
                .with_hitbox(HitboxType::Foot, HitReaction::HeavyBack)
                .without_combo(),
        )
}
