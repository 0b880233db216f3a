//! Camera shake decay and zoom-to-winner.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use arena_core::components::Camera;
use arena_core::constants::{CAMERA_SHAKE_DECAY, CAMERA_WINNER_ZOOM, CAMERA_ZOOM_LERP};
use arena_core::tuning::Tuning;
use glam::Vec2;

/// Below this the shake snaps to zero.
const SHAKE_EPSILON: f32 = 0.1;

pub fn run(camera: &mut Camera, rng: &mut ChaCha8Rng, tuning: &Tuning) {
    let center = Vec2::new(tuning.arena.width * 0.5, tuning.arena.height * 0.5);
    let (scale, offset) = match camera.focus {
        Some(focus) => (CAMERA_WINNER_ZOOM, center - focus),
        None => (1.0, Vec2::ZERO),
    };
    camera.scale += (scale - camera.scale) * CAMERA_ZOOM_LERP;
    camera.offset = camera.offset.lerp(offset, CAMERA_ZOOM_LERP);

    if camera.shake > 0.0 {
        let jitter = Vec2::new(rng.gen_range(-1.0..=1.0), rng.gen_range(-1.0..=1.0));
        camera.offset += jitter * camera.shake;
        camera.shake *= CAMERA_SHAKE_DECAY;
        if camera.shake < SHAKE_EPSILON {
            camera.shake = 0.0;
        }
    }
}

/// Start zooming toward `pos`.
pub fn focus(camera: &mut Camera, pos: Vec2) {
    camera.focus = Some(pos);
}

pub fn reset(camera: &mut Camera) {
    *camera = Camera::default();
}
