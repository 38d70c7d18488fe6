//! Scripted player: reads a snapshot and produces the next tick's commands.

use glam::DVec2;

use signal_void_core::commands::PlayerCommand;
use signal_void_core::enums::CardinalDir;
use signal_void_core::state::{EnemyView, PlayerView, SimSnapshot};

/// Swing when the nearest enemy is this close.
const ENGAGE_RANGE: f64 = 2.5;
/// Dash away when health falls under this fraction and something is near.
const PANIC_HEALTH: f64 = 0.3;
const PANIC_RANGE: f64 = 4.0;

/// Cardinal direction closest to `v`. Ties go to the horizontal axis.
pub fn cardinal(v: DVec2) -> CardinalDir {
    if v.x.abs() >= v.y.abs() {
        if v.x >= 0.0 {
            CardinalDir::Right
        } else {
            CardinalDir::Left
        }
    } else if v.y >= 0.0 {
        CardinalDir::Down
    } else {
        CardinalDir::Up
    }
}

fn nearest<'a>(player: &PlayerView, enemies: &'a [EnemyView]) -> Option<(&'a EnemyView, f64)> {
    enemies
        .iter()
        .map(|e| (e, player.position.distance_to(&e.position)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

/// Commands for the next tick. Nothing while there is no player.
pub fn plan(snapshot: &SimSnapshot) -> Vec<PlayerCommand> {
    let Some(player) = &snapshot.player else {
        return Vec::new();
    };
    let mut commands = Vec::new();

    if player.max_verbs > 0 && player.verbs.len() >= player.max_verbs {
        commands.push(PlayerCommand::ExecuteChain);
    }

    let Some((enemy, dist)) = nearest(player, &snapshot.enemies) else {
        return commands;
    };
    let toward = player.position.offset_to(&enemy.position).normalize_or_zero();

    let hurt = (player.health as f64) < player.max_health as f64 * PANIC_HEALTH;
    if hurt && dist < PANIC_RANGE && player.dash_cooldown == 0 && !player.dashing {
        commands.push(PlayerCommand::Move {
            x: -toward.x,
            y: -toward.y,
        });
        commands.push(PlayerCommand::Dash);
        return commands;
    }

    if dist <= ENGAGE_RANGE {
        commands.push(PlayerCommand::Attack {
            direction: cardinal(toward),
        });
    } else {
        commands.push(PlayerCommand::Move {
            x: toward.x,
            y: toward.y,
        });
    }
    commands
}

#[cfg(test)]
mod tests {
    use signal_void_core::enums::{AiState, EnemyKind, Verb};
    use signal_void_core::types::{EntityId, Position};

    use super::*;

    fn player_at(x: f64, y: f64) -> PlayerView {
        PlayerView {
            id: EntityId { index: 0, generation: 0 },
            position: Position::new(x, y),
            health: 100,
            max_health: 100,
            dashing: false,
            dash_cooldown: 0,
            invulnerable_frames: 0,
            verbs: Vec::new(),
            max_verbs: 3,
            weapon: None,
            mods: Vec::new(),
        }
    }

    fn enemy_at(x: f64, y: f64) -> EnemyView {
        EnemyView {
            id: EntityId { index: 1, generation: 0 },
            kind: EnemyKind::BufferLeak,
            position: Position::new(x, y),
            health: 1,
            max_health: 1,
            state: AiState::Chase,
            telegraphing: false,
        }
    }

    fn snapshot(player: PlayerView, enemies: Vec<EnemyView>) -> SimSnapshot {
        SimSnapshot {
            player: Some(player),
            enemies,
            ..Default::default()
        }
    }

    #[test]
    fn test_cardinal_picks_dominant_axis() {
        assert_eq!(cardinal(DVec2::new(0.9, 0.2)), CardinalDir::Right);
        assert_eq!(cardinal(DVec2::new(-0.9, 0.2)), CardinalDir::Left);
        assert_eq!(cardinal(DVec2::new(0.1, -0.8)), CardinalDir::Up);
        assert_eq!(cardinal(DVec2::new(0.1, 0.8)), CardinalDir::Down);
    }

    #[test]
    fn test_idles_without_player_or_enemies() {
        assert!(plan(&SimSnapshot::default()).is_empty());
        assert!(plan(&snapshot(player_at(10.0, 10.0), Vec::new())).is_empty());
    }

    #[test]
    fn test_closes_distance_then_swings() {
        let far = plan(&snapshot(player_at(10.0, 10.0), vec![enemy_at(20.0, 10.0)]));
        assert_eq!(far, vec![PlayerCommand::Move { x: 1.0, y: 0.0 }]);

        let near = plan(&snapshot(player_at(10.0, 10.0), vec![enemy_at(10.0, 8.0)]));
        assert_eq!(
            near,
            vec![PlayerCommand::Attack {
                direction: CardinalDir::Up
            }]
        );
    }

    #[test]
    fn test_dashes_away_when_hurt() {
        let mut player = player_at(10.0, 10.0);
        player.health = 20;
        let commands = plan(&snapshot(player, vec![enemy_at(12.0, 10.0)]));
        assert_eq!(
            commands,
            vec![PlayerCommand::Move { x: -1.0, y: -0.0 }, PlayerCommand::Dash]
        );
    }

    #[test]
    fn test_executes_full_chain() {
        let mut player = player_at(10.0, 10.0);
        player.verbs = vec![Verb::Recursive, Verb::Sudo, Verb::Null];
        let commands = plan(&snapshot(player, Vec::new()));
        assert_eq!(commands, vec![PlayerCommand::ExecuteChain]);
    }
}
