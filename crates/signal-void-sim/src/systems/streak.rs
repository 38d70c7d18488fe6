//! Kill streak: rapid kills escalate the feedback.

use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use signal_void_core::constants::*;
use signal_void_core::events::FeedbackEvent;
use signal_void_core::types::Position;

use crate::ecs::World;
use crate::vfx::{self, Burst};

/// Kills chained within [`KILL_STREAK_WINDOW`] ticks of each other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KillStreak {
    pub count: u32,
    pub timer: u32,
}

impl KillStreak {
    /// Run down the window; the streak ends when it lapses.
    pub fn tick(&mut self) {
        if self.timer > 0 {
            self.timer -= 1;
            if self.timer == 0 {
                self.count = 0;
            }
        }
    }

    /// Extend the streak by this tick's kills and emit the matching feedback.
    pub fn record(
        &mut self,
        world: &mut World,
        rng: &mut ChaCha8Rng,
        kills: &[Position],
        feedback: &mut Vec<FeedbackEvent>,
    ) {
        if kills.is_empty() {
            return;
        }
        self.count += kills.len() as u32;
        self.timer = KILL_STREAK_WINDOW;

        let burst = if self.count >= 5 {
            feedback.push(FeedbackEvent::Shake {
                intensity: 3,
                frames: 6,
            });
            Some(Burst {
                count: 12,
                colors: &[NEON_YELLOW, WHITE, NEON_RED, NEON_CYAN],
                glyphs: &['*', '+', '.', '!'],
                speed: (0.5, 1.5),
                lifetime: (10, 20),
                gravity: 0.02,
            })
        } else if self.count >= 3 {
            feedback.push(FeedbackEvent::Shake {
                intensity: 2,
                frames: 4,
            });
            Some(Burst {
                count: 6,
                colors: &[NEON_YELLOW, WHITE],
                speed: (0.3, 1.0),
                lifetime: (8, 15),
                gravity: 0.02,
                ..Default::default()
            })
        } else {
            if self.count >= 2 {
                feedback.push(FeedbackEvent::Shake {
                    intensity: 1,
                    frames: 2,
                });
            }
            None
        };

        if let Some(burst) = burst {
            for &pos in kills {
                vfx::explosion(world, rng, pos, &burst);
            }
        }
        if self.count >= 3 {
            log::debug!("kill streak x{}", self.count);
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_streak_lapses_after_window() {
        let mut world = World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut streak = KillStreak::default();
        let mut feedback = Vec::new();
        streak.record(&mut world, &mut rng, &[Position::new(3.0, 3.0)], &mut feedback);
        assert!(feedback.is_empty());

        for _ in 0..KILL_STREAK_WINDOW - 1 {
            streak.tick();
        }
        assert_eq!(streak.count, 1);
        streak.tick();
        assert_eq!(streak.count, 0);
    }

    #[test]
    fn test_big_streak_escalates() {
        let mut world = World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut streak = KillStreak::default();
        let mut feedback = Vec::new();
        let kills = [Position::new(3.0, 3.0); 5];
        streak.record(&mut world, &mut rng, &kills, &mut feedback);
        assert_eq!(
            feedback,
            vec![FeedbackEvent::Shake {
                intensity: 3,
                frames: 6
            }]
        );
        assert_eq!(world.particles.len(), 60);
    }
}
