use serde::{Deserialize, Serialize};

use super::mode::GameMode;

/// Configuration for the game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Mode used by the next reset
    pub mode: GameMode,

    // Scoring
    /// Points for a regular food
    pub food_points: u32,
    /// Points needed per level
    pub points_per_level: u32,
    /// Bonus for golden special food
    pub golden_points: u32,

    // Pace (seconds between steps)
    /// Interval decrement applied per regular food
    pub speedup_per_food: f32,
    /// Floor for the per-food speedup
    pub min_move_interval: f32,
    /// Interval decrement from speed food
    pub speed_boost: f32,
    /// Floor for speed food
    pub speed_boost_floor: f32,
    /// Interval increment from slow food
    pub slow_down: f32,
    /// Cap for slow food
    pub slow_down_cap: f32,

    // Power-ups and timers
    /// Chance of a special food appearing with each regular food
    pub special_food_chance: f64,
    /// Seconds of ghost mode per ghost food
    pub ghost_duration: f32,
    /// Countdown length in time attack
    pub time_attack_duration: f32,

    // Obstacles
    /// Obstacle cap outside survival (survival allows three more)
    pub max_obstacles: usize,
    /// Placement attempts per obstacle before giving up
    pub obstacle_attempts: usize,

    /// Minimum drag distance, in terminal cells, that counts as a swipe
    pub min_swipe_distance: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 12,
            grid_height: 20,
            initial_snake_length: 3,
            mode: GameMode::Classic,
            food_points: 10,
            points_per_level: 50,
            golden_points: 50,
            speedup_per_food: 0.003,
            min_move_interval: 0.08,
            speed_boost: 0.05,
            speed_boost_floor: 0.05,
            slow_down: 0.05,
            slow_down_cap: 0.25,
            special_food_chance: 0.2,
            ghost_duration: 20.0,
            time_attack_duration: 60.0,
            max_obstacles: 5,
            obstacle_attempts: 100,
            min_swipe_distance: 3.0,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Same configuration with a different mode
    pub fn with_mode(self, mode: GameMode) -> Self {
        Self { mode, ..self }
    }

    /// Level reached at a given score
    pub fn level_for_score(&self, score: u32) -> u32 {
        score / self.points_per_level + 1
    }

    /// Validate configuration parameters
    ///
    /// # Returns
    ///
    /// `Ok(())` if all parameters are valid, `Err(String)` with an error message otherwise.
    pub fn validate(&self) -> Result<(), String> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(format!(
                "grid must be at least 1x1, got {}x{}",
                self.grid_width, self.grid_height
            ));
        }

        if self.initial_snake_length == 0 {
            return Err("initial_snake_length must be at least 1".to_string());
        }

        // The snake starts at the centre and extends upward
        let room_above_center = self.grid_height / 2 + 1;
        if self.initial_snake_length > room_above_center {
            return Err(format!(
                "initial_snake_length ({}) does not fit above the centre of a grid {} high",
                self.initial_snake_length, self.grid_height
            ));
        }

        if self.points_per_level == 0 {
            return Err("points_per_level must be at least 1".to_string());
        }

        if self.min_move_interval <= 0.0 || self.speed_boost_floor <= 0.0 {
            return Err(format!(
                "interval floors must be positive, got {} and {}",
                self.min_move_interval, self.speed_boost_floor
            ));
        }

        if self.slow_down_cap < self.speed_boost_floor {
            return Err(format!(
                "slow_down_cap ({}) cannot be below speed_boost_floor ({})",
                self.slow_down_cap, self.speed_boost_floor
            ));
        }

        if !(0.0..=1.0).contains(&self.special_food_chance) {
            return Err(format!(
                "special_food_chance must be in [0, 1], got {}",
                self.special_food_chance
            ));
        }

        if self.ghost_duration < 0.0 || self.time_attack_duration <= 0.0 {
            return Err(format!(
                "timers must be positive, got ghost {} and time attack {}",
                self.ghost_duration, self.time_attack_duration
            ));
        }

        if self.min_swipe_distance <= 0.0 {
            return Err(format!(
                "min_swipe_distance must be positive, got {}",
                self.min_swipe_distance
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_width, 12);
        assert_eq!(config.grid_height, 20);
        assert_eq!(config.initial_snake_length, 3);
        assert_eq!(config.mode, GameMode::Classic);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(15, 15).with_mode(GameMode::Zen);
        assert_eq!(config.grid_width, 15);
        assert_eq!(config.grid_height, 15);
        assert_eq!(config.mode, GameMode::Zen);
        assert_eq!(config.food_points, 10);
    }

    #[test]
    fn test_level_for_score() {
        let config = GameConfig::default();
        assert_eq!(config.level_for_score(0), 1);
        assert_eq!(config.level_for_score(40), 1);
        assert_eq!(config.level_for_score(50), 2);
        assert_eq!(config.level_for_score(149), 3);
    }

    #[test]
    fn test_validation_empty_grid() {
        let config = GameConfig::new(0, 10);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_snake_too_long() {
        let mut config = GameConfig::new(10, 4);
        config.initial_snake_length = 4;
        assert!(config.validate().is_err());

        config.initial_snake_length = 3;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_probability_out_of_range() {
        let mut config = GameConfig::default();
        config.special_food_chance = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_interval_bounds() {
        let mut config = GameConfig::default();
        config.min_move_interval = 0.0;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.slow_down_cap = 0.01;
        assert!(config.validate().is_err());
    }
}
