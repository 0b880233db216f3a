//! Training targets: respawn countdown.

use hecs::World;

use arena_core::components::Target;
use arena_core::constants::TARGET_HEALTH;

pub fn run(world: &mut World) {
    for (_, target) in world.query_mut::<&mut Target>() {
        if target.alive {
            continue;
        }
        target.respawn_timer = target.respawn_timer.saturating_sub(1);
        if target.respawn_timer == 0 {
            target.alive = true;
            target.health = TARGET_HEALTH;
        }
    }
}
