//! Entity model: avatar, hostiles, projectiles and particles
//!
//! Positions are top-left corners in screen space (y grows downward).
//! Velocities are in units per tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::stats::StatProfile;
use crate::consts::*;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    /// Strict overlap on all four half-planes (touching edges do not count)
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.min.x + other.size.x
            && self.min.x + self.size.x > other.min.x
            && self.min.y < other.min.y + other.size.y
            && self.min.y + self.size.y > other.min.y
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }
}

/// The player's avatar
#[derive(Debug, Clone)]
pub struct Avatar {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub jumps_left: u8,
    pub on_ground: bool,
    /// Remaining cooldowns (ms)
    pub attack_cooldown: f32,
    pub super_jump_cooldown: f32,
    pub special_cooldown: f32,
    pub profile: StatProfile,
}

impl Avatar {
    pub fn new(profile: StatProfile, ground_y: f32) -> Self {
        Self {
            pos: Vec2::new(AVATAR_START_X, ground_y - AVATAR_HEIGHT),
            vel: Vec2::ZERO,
            size: Vec2::new(AVATAR_WIDTH, AVATAR_HEIGHT),
            health: AVATAR_MAX_HEALTH,
            max_health: AVATAR_MAX_HEALTH,
            jumps_left: profile.max_jumps,
            on_ground: false,
            attack_cooldown: 0.0,
            super_jump_cooldown: 0.0,
            special_cooldown: 0.0,
            profile,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// Point projectiles leave from (right edge, mid height)
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.size.x, self.pos.y + self.size.y / 2.0)
    }

    pub fn feet(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.size.x / 2.0, self.pos.y + self.size.y)
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Swap in a freshly composed profile, keeping jump charges in range
    pub fn apply_profile(&mut self, profile: StatProfile) {
        self.jumps_left = self.jumps_left.min(profile.max_jumps);
        self.profile = profile;
    }

    /// Move by held direction, apply gravity, land, tick cooldowns
    pub fn update(&mut self, move_left: bool, move_right: bool, arena_width: f32, ground_y: f32, gravity: f32, elapsed_ms: f32) {
        self.vel.x = 0.0;
        if move_left {
            self.vel.x = -self.profile.speed;
        }
        if move_right {
            self.vel.x = self.profile.speed;
        }
        self.pos.x = (self.pos.x + self.vel.x).clamp(0.0, (arena_width - self.size.x).max(0.0));

        self.vel.y += gravity;
        self.pos.y += self.vel.y;

        if self.pos.y + self.size.y >= ground_y {
            self.pos.y = ground_y - self.size.y;
            self.vel.y = 0.0;
            self.on_ground = true;
            self.jumps_left = self.profile.max_jumps;
        } else {
            self.on_ground = false;
        }

        self.attack_cooldown = (self.attack_cooldown - elapsed_ms).max(0.0);
        self.super_jump_cooldown = (self.super_jump_cooldown - elapsed_ms).max(0.0);
        self.special_cooldown = (self.special_cooldown - elapsed_ms).max(0.0);
    }

    /// Apply incoming damage after reduction. Returns the amount actually lost.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        let before = self.health;
        let dealt = amount.max(0.0) * (1.0 - self.profile.damage_reduction);
        self.health = (self.health - dealt).clamp(0.0, self.max_health);
        before - self.health
    }

    /// Damage bounced back at a hostile for an incoming hit
    pub fn reflected(&self, amount: f32) -> f32 {
        amount.max(0.0) * self.profile.damage_reflection
    }
}

/// Hostile archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HostileKind {
    Basic,
    Fast,
    Tank,
}

impl HostileKind {
    pub const ALL: [HostileKind; 3] = [HostileKind::Basic, HostileKind::Fast, HostileKind::Tank];

    /// Base (speed, health, damage) before level multipliers
    pub fn base_stats(self) -> (f32, f32, f32) {
        match self {
            HostileKind::Basic => (1.8, 30.0, 15.0),
            HostileKind::Fast => (2.5, 20.0, 10.0),
            HostileKind::Tank => (1.2, 50.0, 20.0),
        }
    }
}

/// A hostile walking leftward along the ground
#[derive(Debug, Clone)]
pub struct Hostile {
    pub id: u32,
    pub kind: HostileKind,
    pub pos: Vec2,
    pub size: Vec2,
    /// Leftward speed, frozen at spawn
    pub speed: f32,
    pub health: f32,
    pub max_health: f32,
    pub damage: f32,
}

impl Hostile {
    /// Spawn with level multipliers baked in
    pub fn spawn(id: u32, kind: HostileKind, pos: Vec2, speed_mult: f32, health_mult: f32, damage_mult: f32) -> Self {
        let (speed, health, damage) = kind.base_stats();
        Self {
            id,
            kind,
            pos,
            size: Vec2::new(HOSTILE_WIDTH, HOSTILE_HEIGHT),
            speed: speed * speed_mult,
            health: health * health_mult,
            max_health: health * health_mult,
            damage: damage * damage_mult,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    pub fn advance(&mut self) {
        self.pos.x -= self.speed;
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.health -= amount;
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    pub fn has_escaped(&self) -> bool {
        self.pos.x < HOSTILE_ESCAPE_X
    }
}

/// A straight-flying shot
#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    /// Horizontal velocity (sign is direction)
    pub vel_x: f32,
    pub damage: f32,
}

impl Projectile {
    pub fn new(id: u32, pos: Vec2, direction: f32, damage: f32) -> Self {
        Self {
            id,
            pos,
            size: Vec2::new(PROJECTILE_WIDTH, PROJECTILE_HEIGHT),
            vel_x: PROJECTILE_SPEED * direction.signum(),
            damage,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    pub fn advance(&mut self) {
        self.pos.x += self.vel_x;
    }

    pub fn out_of_bounds(&self, arena_width: f32) -> bool {
        self.pos.x > arena_width || self.pos.x < 0.0
    }
}

/// Palette family a particle is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    Explosion,
    Fire,
    Lightning,
    WaveBanner,
}

/// A cosmetic particle
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub kind: ParticleKind,
    /// Hue in degrees, picked at spawn
    pub hue: f32,
    pub life: f32, // 0-1, decreases over time
    pub size: f32,
}

impl Particle {
    pub fn new(pos: Vec2, angle_deg: f32, speed: f32, kind: ParticleKind, hue: f32, size: f32) -> Self {
        let angle = angle_deg.to_radians();
        Self {
            pos,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            kind,
            hue,
            life: 1.0,
            size,
        }
    }

    pub fn update(&mut self) {
        self.pos += self.vel;
        self.life -= PARTICLE_DECAY;
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }
}
