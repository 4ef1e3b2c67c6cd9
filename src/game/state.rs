use serde::{Deserialize, Serialize};

use super::action::Direction;
use super::config::GameConfig;
use super::mode::GameMode;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }

    /// Wrap onto a width x height torus
    pub fn wrapped(&self, width: usize, height: usize) -> Self {
        Self {
            x: self.x.rem_euclid(width as i32),
            y: self.y.rem_euclid(height as i32),
        }
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Direction committed at the last step
    pub direction: Direction,
}

impl Snake {
    /// Create a new snake with given starting position and direction
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let mut body = vec![head];

        // Add initial body segments behind the head
        let (dx, dy) = direction.delta();
        let (back_dx, back_dy) = (-dx, -dy);

        for i in 1..length {
            let prev = body[i - 1];
            body.push(prev.moved_by(back_dx, back_dy));
        }

        Self { body, direction }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Check if position is on any segment, head and tail included
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Put a new head in front of the current one
    pub fn push_head(&mut self, head: Position) {
        self.body.insert(0, head);
    }

    /// Drop the last segment
    pub fn pop_tail(&mut self) -> Option<Position> {
        // Never drop the head
        if self.body.len() > 1 {
            self.body.pop()
        } else {
            None
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Effect carried by a special food
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecialFoodKind {
    /// Bonus points
    Golden,
    /// Shorter move interval
    Speed,
    /// Longer move interval
    Slow,
    /// Temporary wraparound and obstacle immunity
    Ghost,
}

impl SpecialFoodKind {
    pub const ALL: [SpecialFoodKind; 4] = [
        SpecialFoodKind::Golden,
        SpecialFoodKind::Speed,
        SpecialFoodKind::Slow,
        SpecialFoodKind::Ghost,
    ];
}

/// A bonus item on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialFood {
    pub position: Position,
    pub kind: SpecialFoodKind,
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
    /// Snake hit an obstacle
    Obstacle,
    /// Time attack countdown ran out
    TimeUp,
}

impl CollisionType {
    pub fn describe(&self) -> &'static str {
        match self {
            CollisionType::Wall => "hit the wall",
            CollisionType::SelfCollision => "bit itself",
            CollisionType::Obstacle => "crashed into an obstacle",
            CollisionType::TimeUp => "ran out of time",
        }
    }
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    /// Direction applied at the next step
    pub next_direction: Direction,
    /// `None` only when no free cell is left
    pub food: Option<Position>,
    pub special_food: Option<SpecialFood>,
    pub obstacles: Vec<Position>,
    pub grid_width: usize,
    pub grid_height: usize,
    pub mode: GameMode,
    pub score: u32,
    pub level: u32,
    pub steps: u32,
    pub is_alive: bool,
    /// Why the game ended
    pub collision: Option<CollisionType>,
    /// Seconds between steps
    pub move_interval: f32,
    /// Seconds accumulated toward the next step
    pub move_timer: f32,
    /// Seconds of ghost mode left; zero when inactive
    pub ghost_remaining: f32,
    /// Time attack countdown, `None` in untimed modes
    pub time_remaining: Option<f32>,
}

impl GameState {
    /// Create a new game state
    pub fn new(snake: Snake, food: Position, config: &GameConfig) -> Self {
        let mode = config.mode;
        Self {
            next_direction: snake.direction,
            snake,
            food: Some(food),
            special_food: None,
            obstacles: Vec::new(),
            grid_width: config.grid_width,
            grid_height: config.grid_height,
            mode,
            score: 0,
            level: 1,
            steps: 0,
            is_alive: true,
            collision: None,
            move_interval: mode.initial_move_interval(),
            move_timer: 0.0,
            ghost_remaining: 0.0,
            time_remaining: mode
                .has_time_limit()
                .then_some(config.time_attack_duration),
        }
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.x < self.grid_width as i32
            && pos.y >= 0
            && pos.y < self.grid_height as i32
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.occupies(pos)
    }

    pub fn is_obstacle(&self, pos: Position) -> bool {
        self.obstacles.contains(&pos)
    }

    pub fn is_ghost(&self) -> bool {
        self.ghost_remaining > 0.0
    }

    /// Check if anything at all sits on a cell
    pub fn is_occupied(&self, pos: Position) -> bool {
        self.is_occupied_by_snake(pos)
            || self.food == Some(pos)
            || self.special_food.is_some_and(|special| special.position == pos)
            || self.is_obstacle(pos)
    }

    pub fn end_game(&mut self, collision: CollisionType) {
        self.is_alive = false;
        self.collision = Some(collision);
    }
}
