//! Avatar actions and the special-power dispatcher
//!
//! Every action is cooldown- or charge-gated. A gated call is a no-op that
//! reports why through [`Availability`]; nothing here fails.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::ParticleKind;
use super::state::GameState;
use super::stats::Capability;
use crate::consts::*;

/// Whether an action could run when it was requested
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Availability {
    /// The action ran
    Ready,
    /// Gated by a cooldown
    Cooling { remaining_ms: f32 },
    /// Gated by something other than time (no jump charges, run over)
    Unavailable,
}

impl Availability {
    fn from_cooldown(remaining_ms: f32) -> Self {
        if remaining_ms > 0.0 {
            Availability::Cooling { remaining_ms }
        } else {
            Availability::Ready
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Availability::Ready)
    }
}

/// Effects that fire some time after the action that queued them
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScheduledEffect {
    /// One light-trail shot from wherever the avatar is when it fires
    TrailShot { damage: f32 },
}

#[derive(Debug, Clone, PartialEq)]
struct ScheduledEvent {
    due_ms: f64,
    seq: u64,
    effect: ScheduledEffect,
}

/// Pending effects ordered by (due time, insertion order)
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: Vec<ScheduledEvent>,
    next_seq: u64,
}

impl EventQueue {
    pub fn schedule(&mut self, due_ms: f64, effect: ScheduledEffect) {
        let seq = self.next_seq;
        self.next_seq += 1;
        let idx = self
            .events
            .partition_point(|e| (e.due_ms, e.seq) <= (due_ms, seq));
        self.events.insert(idx, ScheduledEvent { due_ms, seq, effect });
    }

    /// Remove and return every effect due at or before `now_ms`
    pub fn drain_due(&mut self, now_ms: f64) -> Vec<ScheduledEffect> {
        let split = self.events.partition_point(|e| e.due_ms <= now_ms);
        self.events.drain(..split).map(|e| e.effect).collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

pub fn jump_availability(state: &GameState) -> Availability {
    if !state.is_running() || state.avatar.jumps_left == 0 {
        Availability::Unavailable
    } else {
        Availability::Ready
    }
}

pub fn super_jump_availability(state: &GameState) -> Availability {
    if !state.is_running() {
        return Availability::Unavailable;
    }
    Availability::from_cooldown(state.avatar.super_jump_cooldown)
}

pub fn attack_availability(state: &GameState) -> Availability {
    if !state.is_running() {
        return Availability::Unavailable;
    }
    Availability::from_cooldown(state.avatar.attack_cooldown)
}

pub fn special_availability(state: &GameState) -> Availability {
    if !state.is_running() {
        return Availability::Unavailable;
    }
    Availability::from_cooldown(state.avatar.special_cooldown)
}

/// Spend one jump charge
pub fn jump(state: &mut GameState) -> Availability {
    let availability = jump_availability(state);
    if availability.is_ready() {
        let avatar = &mut state.avatar;
        avatar.vel.y = -avatar.profile.jump_power;
        avatar.jumps_left -= 1;
        state.stats.jumps += 1;
    }
    availability
}

/// Double-impulse jump that refills all charges
pub fn super_jump(state: &mut GameState) -> Availability {
    let availability = super_jump_availability(state);
    if availability.is_ready() {
        let avatar = &mut state.avatar;
        avatar.vel.y = -avatar.profile.jump_power * 2.0;
        avatar.jumps_left = avatar.profile.max_jumps;
        avatar.super_jump_cooldown = SUPER_JUMP_DELAY_MS;
        let feet = avatar.feet();
        state.explosion(feet);
        state.stats.super_jumps += 1;
    }
    availability
}

/// One forward shot, plus per-capability extras
pub fn attack(state: &mut GameState) -> Availability {
    let availability = attack_availability(state);
    if !availability.is_ready() {
        return availability;
    }

    let muzzle = state.avatar.muzzle();
    let damage = state.avatar.profile.damage;
    let caps = state.avatar.profile.capabilities;

    state.spawn_projectile(muzzle, damage);
    if caps.contains(Capability::PlasmaBeam) {
        state.spawn_projectile(muzzle - Vec2::new(0.0, 10.0), damage * 0.5);
    }
    if caps.contains(Capability::PhoenixFire) {
        state.fire_burst(muzzle);
    }
    if caps.contains(Capability::ChainLightning) {
        state.lightning_burst(muzzle);
    }

    state.avatar.attack_cooldown = ATTACK_DELAY_MS;
    availability
}

/// Fire every special capability the avatar holds, or the fallback spread.
///
/// One cooldown reset and one usage tick per call, however many effects fired.
pub fn use_special_power(state: &mut GameState) -> Availability {
    let availability = special_availability(state);
    if !availability.is_ready() {
        log::debug!("Special power not ready: {:?}", availability);
        return availability;
    }

    let caps = state.avatar.profile.capabilities;
    let mut fired = Vec::new();
    for cap in caps.iter().filter(|c| c.is_special()) {
        special_effect(state, cap);
        fired.push(cap);
    }
    if fired.is_empty() {
        fan_shot(state);
    }

    state.avatar.special_cooldown = SPECIAL_POWER_DELAY_MS;
    state.stats.power_usage += 1;
    log::debug!("Special power used: {:?}", fired);
    availability
}

fn special_effect(state: &mut GameState, cap: Capability) {
    let damage = state.avatar.profile.damage;
    let center = state.avatar.bounds().center();
    let muzzle = state.avatar.muzzle();

    match cap {
        Capability::GroundSlam => {
            damage_within(state, 200.0, damage * 2.0);
            let feet = state.avatar.feet();
            state.explosion(feet);
        }
        Capability::QuantumPhase => {
            for _ in 0..30 {
                state.lightning_burst(center);
            }
            damage_within(state, 150.0, damage * 1.5);
        }
        Capability::EnergyWave => {
            for h in state.hostiles.iter_mut() {
                h.pos.x += 100.0;
                h.take_damage(damage);
            }
            for _ in 0..20 {
                state.lightning_burst(muzzle);
            }
        }
        Capability::LightTrail => {
            for i in 0..5 {
                state.scheduled.schedule(
                    state.time_ms + i as f64 * 100.0,
                    ScheduledEffect::TrailShot { damage: damage * 0.5 },
                );
            }
        }
        Capability::VoltSurge => {
            damage_within(state, 300.0, damage * 1.5);
            for _ in 0..50 {
                jittered_burst(state, center, 50.0, ParticleKind::Lightning, 15);
            }
        }
        Capability::ChainLightning => {
            let targets: Vec<Vec2> = state
                .hostiles
                .iter_mut()
                .take(3)
                .map(|h| {
                    h.take_damage(damage * 1.2);
                    h.pos
                })
                .collect();
            for pos in targets {
                state.lightning_burst(pos);
            }
        }
        Capability::PhoenixFire => {
            damage_within(state, 250.0, damage);
            for _ in 0..40 {
                jittered_burst(state, center, 40.0, ParticleKind::Fire, 10);
            }
        }
        // Attack-only
        Capability::PlasmaBeam => {}
    }
}

/// Three-shot spread used when no special capability is unlocked
fn fan_shot(state: &mut GameState) {
    let muzzle = state.avatar.muzzle();
    let damage = state.avatar.profile.damage * 0.25;
    for offset in [-20.0, 0.0, 20.0] {
        state.spawn_projectile(muzzle + Vec2::new(0.0, offset), damage);
    }
}

/// Damage hostiles whose x lies within `range` of the avatar's x
fn damage_within(state: &mut GameState, range: f32, amount: f32) {
    let x = state.avatar.pos.x;
    for h in state.hostiles.iter_mut().filter(|h| (h.pos.x - x).abs() < range) {
        h.take_damage(amount);
    }
}

fn jittered_burst(
    state: &mut GameState,
    origin: Vec2,
    jitter: f32,
    kind: ParticleKind,
    count: usize,
) {
    let offset = Vec2::new(
        state.fx_rng.random_range(-jitter..jitter),
        state.fx_rng.random_range(-jitter..jitter),
    );
    state.burst(origin + offset, kind, count, 0.0);
}

/// Run scheduled effects that have come due
pub fn apply_scheduled(state: &mut GameState) {
    for effect in state.scheduled.drain_due(state.time_ms) {
        match effect {
            ScheduledEffect::TrailShot { damage } => {
                let muzzle = state.avatar.muzzle();
                state.spawn_projectile(muzzle, damage);
                state.fire_burst(muzzle);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::catalog::{CharacterProfile, LevelConfig};
    use crate::sim::entity::HostileKind;
    use crate::sim::stats::{CapabilitySet, StatProfile};

    fn state_with(caps: &[Capability]) -> GameState {
        let mut profile = StatProfile::base(&CharacterProfile::default());
        profile.capabilities = caps.iter().copied().collect::<CapabilitySet>();
        let mut state = GameState::new(1, &Settings::default(), LevelConfig::default(), profile);
        state.avatar.on_ground = true;
        state
    }

    fn place_hostile(state: &mut GameState, x: f32) -> u32 {
        state.spawn_hostile_kind(HostileKind::Tank);
        let h = state.hostiles.last_mut().unwrap();
        h.pos.x = x;
        h.id
    }

    #[test]
    fn test_special_power_counts_once_per_cooldown() {
        let mut state = state_with(&[]);
        assert!(use_special_power(&mut state).is_ready());
        let second = use_special_power(&mut state);
        assert_eq!(
            second,
            Availability::Cooling {
                remaining_ms: SPECIAL_POWER_DELAY_MS
            }
        );
        assert_eq!(state.stats.power_usage, 1);
    }

    #[test]
    fn test_fallback_fan_shot() {
        let mut state = state_with(&[]);
        use_special_power(&mut state);
        assert_eq!(state.projectiles.len(), 3);
        let muzzle_y = state.avatar.muzzle().y;
        let ys: Vec<f32> = state.projectiles.iter().map(|p| p.pos.y - muzzle_y).collect();
        assert_eq!(ys, vec![-20.0, 0.0, 20.0]);
        assert!(state.projectiles.iter().all(|p| p.damage == 2.5));
    }

    #[test]
    fn test_ground_slam_radius() {
        let mut state = state_with(&[Capability::GroundSlam]);
        let ax = state.avatar.pos.x;
        let near = place_hostile(&mut state, ax + 150.0);
        let far = place_hostile(&mut state, ax + 250.0);
        use_special_power(&mut state);

        let health = |id: u32| state.hostiles.iter().find(|h| h.id == id).unwrap().health;
        assert_eq!(health(near), 50.0 - 20.0);
        assert_eq!(health(far), 50.0);
        // Flagged effects replace the fallback
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_stacked_capabilities_all_fire() {
        let mut state = state_with(&[Capability::GroundSlam, Capability::PhoenixFire]);
        let ax = state.avatar.pos.x;
        place_hostile(&mut state, ax + 100.0);
        use_special_power(&mut state);
        // 20 from the slam, 10 from the phoenix burn
        assert_eq!(state.hostiles[0].health, 50.0 - 20.0 - 10.0);
        assert_eq!(state.stats.power_usage, 1);
    }

    #[test]
    fn test_chain_lightning_hits_first_three() {
        let mut state = state_with(&[Capability::ChainLightning]);
        for i in 0..4 {
            place_hostile(&mut state, 900.0 + i as f32 * 60.0);
        }
        use_special_power(&mut state);
        let hit = state.hostiles.iter().filter(|h| h.health < h.max_health).count();
        assert_eq!(hit, 3);
        assert_eq!(state.hostiles[3].health, 50.0);
    }

    #[test]
    fn test_energy_wave_knockback() {
        let mut state = state_with(&[Capability::EnergyWave]);
        place_hostile(&mut state, 700.0);
        use_special_power(&mut state);
        assert_eq!(state.hostiles[0].pos.x, 800.0);
        assert_eq!(state.hostiles[0].health, 40.0);
    }

    #[test]
    fn test_light_trail_is_staggered() {
        let mut state = state_with(&[Capability::LightTrail]);
        use_special_power(&mut state);
        assert_eq!(state.scheduled.len(), 5);

        apply_scheduled(&mut state);
        assert_eq!(state.projectiles.len(), 1);

        // Shots follow the avatar
        state.avatar.pos.x += 100.0;
        state.time_ms = 250.0;
        apply_scheduled(&mut state);
        assert_eq!(state.projectiles.len(), 3);
        assert_eq!(state.projectiles[2].pos.x, state.avatar.muzzle().x);

        state.time_ms = 400.0;
        apply_scheduled(&mut state);
        assert_eq!(state.projectiles.len(), 5);
        assert!(state.scheduled.is_empty());
        assert!(state.projectiles.iter().all(|p| p.damage == 5.0));
    }

    #[test]
    fn test_attack_extras() {
        let mut state = state_with(&[Capability::PlasmaBeam]);
        assert!(attack(&mut state).is_ready());
        assert_eq!(state.projectiles.len(), 2);
        assert_eq!(state.projectiles[1].damage, 5.0);
        assert!(matches!(attack(&mut state), Availability::Cooling { .. }));
        assert_eq!(state.projectiles.len(), 2);
    }

    #[test]
    fn test_jump_charges() {
        let mut state = state_with(&[]);
        for _ in 0..BASE_MAX_JUMPS {
            assert!(jump(&mut state).is_ready());
        }
        assert_eq!(jump(&mut state), Availability::Unavailable);
        assert_eq!(state.stats.jumps, BASE_MAX_JUMPS as u32);

        assert!(super_jump(&mut state).is_ready());
        assert_eq!(state.avatar.jumps_left, BASE_MAX_JUMPS);
        assert_eq!(state.avatar.vel.y, -30.0);
        assert!(!super_jump(&mut state).is_ready());
        assert_eq!(state.stats.super_jumps, 1);
    }

    #[test]
    fn test_event_queue_order() {
        let mut queue = EventQueue::default();
        queue.schedule(200.0, ScheduledEffect::TrailShot { damage: 2.0 });
        queue.schedule(100.0, ScheduledEffect::TrailShot { damage: 1.0 });
        queue.schedule(100.0, ScheduledEffect::TrailShot { damage: 1.5 });

        assert!(queue.drain_due(50.0).is_empty());
        assert_eq!(
            queue.drain_due(150.0),
            vec![
                ScheduledEffect::TrailShot { damage: 1.0 },
                ScheduledEffect::TrailShot { damage: 1.5 },
            ]
        );
        assert_eq!(queue.len(), 1);
    }
}
