use super::{
    action::Direction,
    config::GameConfig,
    mode::GameMode,
    state::{CollisionType, GameState, Position, Snake, SpecialFood, SpecialFoodKind},
};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
use tracing::{debug, info};

/// Something collaborators may want to react to (sound, haptics, particles, HUD)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    AteFood { at: Position },
    PowerUp { kind: SpecialFoodKind, at: Position },
    LevelUp { level: u32 },
    GameOver { collision: CollisionType, score: u32, level: u32 },
}

/// Information about a step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate regular food this step
    pub ate_food: bool,
    /// Special food eaten this step
    pub special_food: Option<SpecialFoodKind>,
    /// Whether the level advanced this step
    pub level_up: bool,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Whether the game has terminated
    pub terminated: bool,
    /// Additional information about the step
    pub info: StepInfo,
}

/// Result of advancing time by one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutcome {
    /// Whether a grid step happened during this tick
    pub stepped: bool,
    pub events: Vec<GameEvent>,
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create an engine whose spawns are reproducible
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Select the mode used by the next reset
    pub fn set_mode(&mut self, mode: GameMode) {
        self.config.mode = mode;
    }

    /// Reset the game to initial state
    pub fn reset(&mut self) -> GameState {
        let center_x = (self.config.grid_width / 2) as i32;
        let center_y = (self.config.grid_height / 2) as i32;

        // Heading down with the body trailing above the head
        let snake = Snake::new(
            Position::new(center_x, center_y),
            Direction::Down,
            self.config.initial_snake_length,
        );

        let mut state = GameState::new(snake, Position::new(0, 0), &self.config);
        state.food = None;
        self.spawn_food(&mut state);
        self.spawn_obstacles(&mut state);

        info!(
            mode = ?state.mode,
            width = state.grid_width,
            height = state.grid_height,
            obstacles = state.obstacles.len(),
            "new game"
        );

        state
    }

    /// Buffer a turn for the next step
    ///
    /// Reversing into the committed direction is rejected, as is any input
    /// after game over. Returns whether the turn was accepted.
    pub fn set_direction(&self, state: &mut GameState, direction: Direction) -> bool {
        if !state.is_alive || state.snake.direction.is_opposite(direction) {
            return false;
        }
        state.next_direction = direction;
        true
    }

    /// Advance timers by `dt` seconds and step the snake when its interval elapses
    pub fn tick(&mut self, state: &mut GameState, dt: f32) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        if !state.is_alive {
            return outcome;
        }

        if let Some(remaining) = state.time_remaining.as_mut() {
            *remaining -= dt;
            if *remaining <= 0.0 {
                *remaining = 0.0;
                self.finish(state, CollisionType::TimeUp);
                outcome.events.push(Self::game_over_event(state, CollisionType::TimeUp));
                return outcome;
            }
        }

        if state.ghost_remaining > 0.0 {
            state.ghost_remaining -= dt;
            if state.ghost_remaining <= 0.0 {
                state.ghost_remaining = 0.0;
                debug!("ghost mode expired");
            }
        }

        state.move_timer += dt;
        if state.move_timer >= state.move_interval {
            state.move_timer = 0.0;
            let special_before = state.special_food;
            let result = self.step(state);
            outcome.stepped = true;
            Self::collect_events(state, &result, special_before, &mut outcome.events);
        }

        outcome
    }

    /// Execute one discrete grid step
    pub fn step(&mut self, state: &mut GameState) -> StepResult {
        if !state.is_alive {
            return StepResult {
                terminated: true,
                info: StepInfo::default(),
            };
        }

        state.snake.direction = state.next_direction;

        // Calculate new head position
        let mut new_head = state.snake.head().moved_in_direction(state.snake.direction);
        if state.is_ghost() {
            new_head = new_head.wrapped(state.grid_width, state.grid_height);
        }

        // Check for collisions
        if let Some(collision_type) = self.check_collision(state, new_head) {
            state.steps += 1;
            self.finish(state, collision_type);

            return StepResult {
                terminated: true,
                info: StepInfo {
                    collision_type: Some(collision_type),
                    ..StepInfo::default()
                },
            };
        }

        state.snake.push_head(new_head);
        state.steps += 1;

        let mut info = StepInfo::default();
        let level_before = state.level;

        if state.food == Some(new_head) {
            info.ate_food = true;
            state.score += self.config.food_points;
            state.level = self.config.level_for_score(state.score);
            self.spawn_food(state);

            if state.level > level_before {
                self.spawn_obstacles(state);
            }

            if state.mode.pops_tail_on_food() {
                state.snake.pop_tail();
            }

            state.move_interval = (state.move_interval - self.config.speedup_per_food)
                .max(self.config.min_move_interval);
        } else if let Some(special) = state.special_food.filter(|s| s.position == new_head) {
            state.special_food = None;
            info.special_food = Some(special.kind);
            self.apply_special_food(state, special.kind);

            if state.level > level_before {
                self.spawn_obstacles(state);
            }
        } else {
            state.snake.pop_tail();
        }

        info.level_up = state.level > level_before;

        StepResult {
            terminated: false,
            info,
        }
    }

    fn apply_special_food(&mut self, state: &mut GameState, kind: SpecialFoodKind) {
        match kind {
            SpecialFoodKind::Golden => {
                state.score += self.config.golden_points;
                state.level = self.config.level_for_score(state.score);
            }
            SpecialFoodKind::Speed => {
                state.move_interval = (state.move_interval - self.config.speed_boost)
                    .max(self.config.speed_boost_floor);
            }
            SpecialFoodKind::Slow => {
                state.move_interval =
                    (state.move_interval + self.config.slow_down).min(self.config.slow_down_cap);
            }
            SpecialFoodKind::Ghost => {
                state.ghost_remaining = self.config.ghost_duration;
            }
        }
        debug!(?kind, score = state.score, interval = state.move_interval, "power-up");
    }

    /// Check if the new head position causes a collision
    fn check_collision(&self, state: &GameState, pos: Position) -> Option<CollisionType> {
        // Wrapped positions are always in bounds
        if !state.is_in_bounds(pos) {
            return Some(CollisionType::Wall);
        }

        // The tail still counts; it has not moved yet
        if state.snake.occupies(pos) {
            return Some(CollisionType::SelfCollision);
        }

        if !state.is_ghost() && state.is_obstacle(pos) {
            return Some(CollisionType::Obstacle);
        }

        None
    }

    fn finish(&self, state: &mut GameState, collision: CollisionType) {
        state.end_game(collision);
        info!(
            cause = collision.describe(),
            score = state.score,
            level = state.level,
            length = state.snake.len(),
            "game over"
        );
    }

    fn game_over_event(state: &GameState, collision: CollisionType) -> GameEvent {
        GameEvent::GameOver {
            collision,
            score: state.score,
            level: state.level,
        }
    }

    fn collect_events(
        state: &GameState,
        result: &StepResult,
        special_before: Option<SpecialFood>,
        events: &mut Vec<GameEvent>,
    ) {
        if let Some(collision) = result.info.collision_type {
            events.push(Self::game_over_event(state, collision));
            return;
        }

        let head = state.snake.head();
        if result.info.ate_food {
            events.push(GameEvent::AteFood { at: head });
        }
        if let (Some(kind), Some(special)) = (result.info.special_food, special_before) {
            events.push(GameEvent::PowerUp {
                kind,
                at: special.position,
            });
        }
        if result.info.level_up {
            events.push(GameEvent::LevelUp { level: state.level });
        }
    }

    /// Place regular food, then roll for a special food
    fn spawn_food(&mut self, state: &mut GameState) {
        state.food = None;
        state.food = self.random_free_cell(state);

        if state.food.is_some() && self.rng.gen_bool(self.config.special_food_chance) {
            self.spawn_special_food(state);
        }
    }

    /// Place a special food of a random kind, replacing any current one
    fn spawn_special_food(&mut self, state: &mut GameState) {
        state.special_food = None;
        if let Some(position) = self.random_free_cell(state) {
            let kind = *SpecialFoodKind::ALL
                .choose(&mut self.rng)
                .unwrap_or(&SpecialFoodKind::Golden);
            state.special_food = Some(SpecialFood { position, kind });
        }
    }

    /// Regenerate obstacles for the current level and mode
    ///
    /// Each obstacle gets a bounded number of placement attempts; a crowded
    /// board silently ends up with fewer.
    fn spawn_obstacles(&mut self, state: &mut GameState) {
        state.obstacles.clear();
        let count = state
            .mode
            .obstacle_count(state.level, self.config.max_obstacles);

        for _ in 0..count {
            for _ in 0..self.config.obstacle_attempts {
                let pos = self.random_cell(state);
                if !state.is_occupied(pos) {
                    state.obstacles.push(pos);
                    break;
                }
            }
        }

        if state.obstacles.len() < count {
            debug!(
                wanted = count,
                placed = state.obstacles.len(),
                "board too crowded for obstacles"
            );
        }
    }

    fn random_cell(&mut self, state: &GameState) -> Position {
        let x = self.rng.gen_range(0..state.grid_width) as i32;
        let y = self.rng.gen_range(0..state.grid_height) as i32;
        Position::new(x, y)
    }

    /// Rejection-sample a free cell, falling back to an exhaustive scan
    fn random_free_cell(&mut self, state: &GameState) -> Option<Position> {
        let max_draws = state.grid_width * state.grid_height * 4;
        for _ in 0..max_draws {
            let pos = self.random_cell(state);
            if !state.is_occupied(pos) {
                return Some(pos);
            }
        }

        let free: Vec<Position> = (0..state.grid_height as i32)
            .flat_map(|y| (0..state.grid_width as i32).map(move |x| Position::new(x, y)))
            .filter(|&pos| !state.is_occupied(pos))
            .collect();
        free.choose(&mut self.rng).copied()
    }
}
