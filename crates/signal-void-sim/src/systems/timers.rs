//! Per-tick countdowns: attack windows, weapon cooldowns, i-frames, hit
//! flashes and lifetimes.

use crate::ecs::{ComponentKind as K, World};

pub fn cooldowns(world: &mut World) {
    for (_, attack) in world.attacks.iter_mut() {
        if attack.frames_remaining > 0 {
            attack.frames_remaining -= 1;
            if attack.frames_remaining == 0 {
                attack.active = false;
            }
        }
    }
    for (_, inv) in world.inventories.iter_mut() {
        for weapon in &mut inv.weapons {
            weapon.attack_timer = weapon.attack_timer.saturating_sub(1);
        }
    }
    for (_, inv) in world.invulnerables.iter_mut() {
        inv.frames = inv.frames.saturating_sub(1);
    }
}

/// Swap flashing entities to their flash colour and restore the original
/// once the flash runs out.
pub fn hit_flash(world: &mut World) {
    for id in world.query(&[K::HitFlash, K::Renderable]) {
        let (Some(flash), Some(render)) = (world.hit_flashes.get_mut(id), world.renderables.get_mut(id))
        else {
            continue;
        };
        if flash.frames > 0 {
            flash.frames -= 1;
            if flash.stashed_color.is_none() {
                flash.stashed_color = Some(render.color);
            }
            render.color = flash.flash_color;
        } else if let Some(color) = flash.stashed_color.take() {
            render.color = color;
        }
    }
}

/// Count down lifetimes and destroy what expires.
pub fn lifetimes(world: &mut World) {
    let mut expired = Vec::new();
    for (id, life) in world.lifetimes.iter_mut() {
        life.frames = life.frames.saturating_sub(1);
        if life.frames == 0 {
            expired.push(id);
        }
    }
    for id in expired {
        world.destroy(id);
    }
}

#[cfg(test)]
mod tests {
    use signal_void_core::components::{AttackState, HitFlash, Lifetime, Renderable};
    use signal_void_core::constants::{NEON_GREEN, WHITE};

    use super::*;

    #[test]
    fn test_attack_window_closes() {
        let mut world = World::new();
        let id = world.create();
        world.add(
            id,
            AttackState {
                active: true,
                frames_remaining: 2,
                ..Default::default()
            },
        );
        cooldowns(&mut world);
        assert!(world.attacks.get(id).unwrap().active);
        cooldowns(&mut world);
        assert!(!world.attacks.get(id).unwrap().active);
    }

    #[test]
    fn test_flash_restores_colour() {
        let mut world = World::new();
        let id = world.create();
        world.add(id, Renderable::new('&', NEON_GREEN, 5));
        world.add(
            id,
            HitFlash {
                frames: 2,
                ..Default::default()
            },
        );
        hit_flash(&mut world);
        assert_eq!(world.renderables.get(id).unwrap().color, WHITE);
        hit_flash(&mut world);
        hit_flash(&mut world);
        assert_eq!(world.renderables.get(id).unwrap().color, NEON_GREEN);
        assert!(world.hit_flashes.get(id).unwrap().stashed_color.is_none());
    }

    #[test]
    fn test_lifetime_expiry_destroys() {
        let mut world = World::new();
        let id = world.create();
        world.add(id, Lifetime { frames: 2 });
        lifetimes(&mut world);
        assert!(world.is_alive(id));
        lifetimes(&mut world);
        assert!(!world.is_alive(id));
    }
}
