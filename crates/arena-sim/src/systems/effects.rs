//! Cosmetic entities: particles, explosion rings, teleport flashes.

use hecs::{Entity, World};

use arena_core::components::{Explosion, Particle, TeleportEffect};
use arena_core::constants::PARTICLE_DRAG;

/// Age every effect and remove the ones whose `alive` flag dropped.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    for (entity, p) in world.query_mut::<&mut Particle>() {
        p.pos += p.vel;
        p.vel *= PARTICLE_DRAG;
        p.lifetime = p.lifetime.saturating_sub(1);
        p.alive = p.lifetime > 0 && p.pos.is_finite();
        if !p.alive {
            despawn_buffer.push(entity);
        }
    }

    for (entity, x) in world.query_mut::<&mut Explosion>() {
        x.remaining = x.remaining.saturating_sub(1);
        x.alive = x.remaining > 0;
        if !x.alive {
            despawn_buffer.push(entity);
        }
    }

    for (entity, t) in world.query_mut::<&mut TeleportEffect>() {
        t.remaining = t.remaining.saturating_sub(1);
        t.alive = t.remaining > 0;
        if !t.alive {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
