//! Arcade Snake - a terminal Snake game with power-ups and several modes
//!
//! This library provides:
//! - Core game logic, spawning and sprite selection (game module)
//! - Keyboard and mouse-swipe input (input module)
//! - Persisted settings and snake skins (settings module)
//! - Sound and vibration cues (feedback module)
//! - Session timing and high score tracking (metrics module)
//! - TUI rendering (render module)
//! - The interactive play loop (modes module)

pub mod feedback;
pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod settings;
