//! Combat resolution
//!
//! Hostiles are scanned back to front. For each one, in order: escape past
//! the left edge, death from earlier damage, avatar contact, then projectile
//! hits. Each check that removes the hostile ends its turn, so a hostile
//! leaves the field through exactly one event.

use super::state::GameState;
use crate::consts::KILL_SCORE;

/// What the resolver removed this pass (hostile ids)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveReport {
    /// Removed on avatar contact
    pub contacts: Vec<u32>,
    /// Removed with health <= 0
    pub kills: Vec<u32>,
    /// Walked off the left edge
    pub escaped: Vec<u32>,
    /// Projectiles consumed by a hit
    pub projectile_hits: usize,
}

/// Resolve avatar/hostile and projectile/hostile interactions for one tick
pub fn resolve(state: &mut GameState) -> ResolveReport {
    let mut report = ResolveReport::default();
    let avatar_box = state.avatar.bounds();

    let mut i = state.hostiles.len();
    while i > 0 {
        i -= 1;
        let hostile = &state.hostiles[i];

        if hostile.has_escaped() {
            let gone = state.hostiles.remove(i);
            state.waves.release_slot();
            report.escaped.push(gone.id);
            continue;
        }

        if hostile.is_dead() {
            kill(state, i, &mut report);
            continue;
        }

        let hostile_box = hostile.bounds();
        if avatar_box.overlaps(&hostile_box) {
            contact(state, i, &mut report);
            continue;
        }

        // First matching projectile (newest first) takes the hit
        if let Some(j) = state
            .projectiles
            .iter()
            .rposition(|p| p.bounds().overlaps(&hostile_box))
        {
            let projectile = state.projectiles.remove(j);
            report.projectile_hits += 1;
            state.hostiles[i].take_damage(projectile.damage);
            if state.hostiles[i].is_dead() {
                kill(state, i, &mut report);
            }
        }
    }

    // Reflection can finish off a hostile the scan already passed
    while let Some(idx) = state.hostiles.iter().position(|h| h.is_dead()) {
        kill(state, idx, &mut report);
    }

    report
}

fn kill(state: &mut GameState, idx: usize, report: &mut ResolveReport) {
    let hostile = state.hostiles.remove(idx);
    state.stats.record_kill();
    state.waves.record_kill();
    state.score += KILL_SCORE;
    state.explosion(hostile.pos);
    report.kills.push(hostile.id);
}

fn contact(state: &mut GameState, idx: usize, report: &mut ResolveReport) {
    let hostile = state.hostiles.remove(idx);
    state.avatar.take_damage(hostile.damage);
    state.stats.record_contact();
    state.waves.release_slot();

    let reflected = state.avatar.reflected(hostile.damage);
    if reflected > 0.0 {
        if let Some(target) = state.hostiles.iter_mut().find(|h| !h.is_dead()) {
            target.take_damage(reflected);
        }
    }
    report.contacts.push(hostile.id);
}
