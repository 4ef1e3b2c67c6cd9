pub mod handler;

pub use handler::{InputHandler, KeyAction, SwipeTracker, swipe_direction};
