//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! Front ends drive it with [`GameEngine::tick`] and read [`GameState`] to draw.

pub mod action;
pub mod config;
pub mod engine;
pub mod mode;
pub mod particles;
pub mod sprite;
pub mod state;

// Re-export commonly used types
pub use action::Direction;
pub use config::GameConfig;
pub use engine::{GameEngine, GameEvent, StepInfo, StepResult, TickOutcome};
pub use mode::GameMode;
pub use particles::{Particle, ParticleSystem, ParticleTint};
pub use sprite::{BodyShape, SegmentSprite, segment_sprites};
pub use state::{CollisionType, GameState, Position, Snake, SpecialFood, SpecialFoodKind};
