//! Game modes and their per-mode rules

use serde::{Deserialize, Serialize};

/// Rule set selected before a game starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Grows on food, obstacles appear as the level rises
    #[default]
    Classic,
    /// Faster start and a fixed countdown
    TimeAttack,
    /// Dense obstacles, the snake never grows from regular food
    Survival,
    /// Slow and obstacle free
    Zen,
}

impl GameMode {
    pub const ALL: [GameMode; 4] = [
        GameMode::Classic,
        GameMode::TimeAttack,
        GameMode::Survival,
        GameMode::Zen,
    ];

    /// Seconds between steps at the start of a game
    pub fn initial_move_interval(&self) -> f32 {
        match self {
            GameMode::Classic => 0.2,
            GameMode::TimeAttack => 0.15,
            GameMode::Survival => 0.18,
            GameMode::Zen => 0.25,
        }
    }

    /// Number of obstacles to place for a level
    pub fn obstacle_count(&self, level: u32, max_obstacles: usize) -> usize {
        let half_level = (level / 2) as usize;
        match self {
            GameMode::Classic | GameMode::TimeAttack => max_obstacles.min(half_level),
            GameMode::Survival => (max_obstacles + 3).min(half_level + 5),
            GameMode::Zen => 0,
        }
    }

    pub fn has_time_limit(&self) -> bool {
        matches!(self, GameMode::TimeAttack)
    }

    /// Food pops the tail as well, so length stays constant
    pub fn pops_tail_on_food(&self) -> bool {
        matches!(self, GameMode::Survival)
    }

    /// The mode after this one, wrapping around
    pub fn next(&self) -> GameMode {
        match self {
            GameMode::Classic => GameMode::TimeAttack,
            GameMode::TimeAttack => GameMode::Survival,
            GameMode::Survival => GameMode::Zen,
            GameMode::Zen => GameMode::Classic,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            GameMode::Classic => "Classic Mode",
            GameMode::TimeAttack => "Time Attack",
            GameMode::Survival => "Survival Mode",
            GameMode::Zen => "Zen Mode",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            GameMode::Classic => concat!(
                "The snake grows and the game gets harder as the level rises. ",
                "Obstacles appear on level up."
            ),
            GameMode::TimeAttack => {
                "60 seconds only! Score as much as you can. Faster than classic."
            }
            GameMode::Survival => concat!(
                "Lots of obstacles! The snake does not grow; ",
                "the challenge is dodging every obstacle."
            ),
            GameMode::Zen => "No obstacles, nice and easy. Relax and enjoy.",
        }
    }
}
