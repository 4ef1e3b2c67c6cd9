pub mod skin;
pub mod store;

pub use skin::{RAINBOW_DEGREES_PER_SECOND, Rgb, Skin, hsl_to_rgb};
pub use store::{JsonFileStore, MemoryStore, Settings, SettingsStore};
