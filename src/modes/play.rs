use anyhow::{Context, Result};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind, MouseButton,
        MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::{Duration, Instant};
use tokio::time::interval;
use tracing::{info, warn};

use crate::feedback::{self, Feedback};
use crate::game::{GameEngine, GameEvent, GameMode, GameState, ParticleSystem, ParticleTint};
use crate::input::{InputHandler, KeyAction, SwipeTracker};
use crate::metrics::GameMetrics;
use crate::render::{Overlay, RenderView, Renderer};
use crate::settings::{RAINBOW_DEGREES_PER_SECOND, Settings, SettingsStore, Skin};

/// Seconds per obstacle animation frame
const ANIMATION_SPEED: f32 = 0.2;
const ANIMATION_FRAMES: usize = 4;
/// Longest frame fed to the engine, so a stalled terminal cannot skip the game ahead
const MAX_FRAME_DT: f32 = 0.25;

/// Interactive play in the terminal
pub struct PlayMode<S: SettingsStore, F: Feedback> {
    engine: GameEngine,
    state: GameState,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    swipe: SwipeTracker,
    particles: ParticleSystem,
    store: S,
    feedback: F,
    settings: Settings,
    paused: bool,
    show_settings: bool,
    should_quit: bool,
    animation_timer: f32,
    animation_frame: usize,
    rainbow_hue: f32,
}

impl<S: SettingsStore, F: Feedback> PlayMode<S, F> {
    /// Load saved settings and start the first game in the saved mode
    pub fn new(mut engine: GameEngine, store: S, feedback: F) -> Result<Self> {
        let settings = store.load().context("Failed to load settings")?;
        engine.set_mode(settings.game_mode);
        let state = engine.reset();
        let swipe = SwipeTracker::new(engine.config().min_swipe_distance);

        Ok(Self {
            engine,
            state,
            metrics: GameMetrics::new(settings.high_score),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            swipe,
            particles: ParticleSystem::new(),
            store,
            feedback,
            settings,
            paused: false,
            show_settings: false,
            should_quit: false,
            animation_timer: 0.0,
            animation_frame: 0,
            rainbow_hue: 0.0,
        })
    }

    /// Switch to a mode chosen on the command line, remembering it
    pub fn override_mode(&mut self, mode: GameMode) {
        if self.settings.game_mode != mode {
            self.settings.game_mode = mode;
            self.persist_settings();
        }
        self.reset_game();
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // One simulation tick per frame at ~60 FPS; dt comes from the wall clock
        let frame_interval = Duration::from_millis(16);
        let mut frame_timer = interval(frame_interval);
        let mut last_frame = Instant::now();

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                // Simulate and render
                _ = frame_timer.tick() => {
                    let now = Instant::now();
                    let dt = now.duration_since(last_frame).as_secs_f32().min(MAX_FRAME_DT);
                    last_frame = now;

                    self.advance(dt);
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.view());
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn view(&self) -> RenderView<'_> {
        RenderView {
            state: &self.state,
            metrics: &self.metrics,
            settings: &self.settings,
            particles: self.particles.particles(),
            overlay: if self.show_settings {
                Overlay::Settings
            } else if self.paused {
                Overlay::Paused
            } else {
                Overlay::None
            },
            animation_frame: self.animation_frame,
            rainbow_hue: self.rainbow_hue,
        }
    }

    /// Whether the simulation should advance
    fn is_running(&self) -> bool {
        self.state.is_alive && !self.paused && !self.show_settings
    }

    /// Advance the game and its visual effects by one frame
    fn advance(&mut self, dt: f32) {
        if !self.is_running() {
            return;
        }

        self.metrics.update(dt);
        let outcome = self.engine.tick(&mut self.state, dt);
        for event in outcome.events {
            self.on_game_event(event);
        }

        if self.settings.skin == Skin::Rainbow {
            self.rainbow_hue = (self.rainbow_hue + dt * RAINBOW_DEGREES_PER_SECOND) % 360.0;
        }

        self.animation_timer += dt;
        if self.animation_timer >= ANIMATION_SPEED {
            self.animation_timer = 0.0;
            self.animation_frame = (self.animation_frame + 1) % ANIMATION_FRAMES;
        }

        self.particles.update(dt);
    }

    fn on_game_event(&mut self, event: GameEvent) {
        feedback::notify(&mut self.feedback, &self.settings, &event);

        let mut rng = rand::thread_rng();
        match event {
            GameEvent::AteFood { at } => {
                self.particles.burst(&mut rng, at, ParticleTint::Food);
            }
            GameEvent::PowerUp { kind, at } => {
                info!(?kind, "power-up collected");
                self.particles.burst(&mut rng, at, ParticleTint::from(kind));
            }
            GameEvent::LevelUp { level } => {
                info!(level, obstacles = self.state.obstacles.len(), "level up");
            }
            GameEvent::GameOver { score, .. } => {
                if self.metrics.on_game_over(score) {
                    info!(score, "new high score");
                    self.settings.high_score = score;
                    self.persist_settings();
                }
            }
        }
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => {
                // Only process key press events, not release
                if key.kind != KeyEventKind::Press {
                    return;
                }
                let action = self.input_handler.handle_key_event(key);
                self.apply(action);
            }
            Event::Mouse(mouse) => {
                // A click on the game over screen starts a new game
                if !self.state.is_alive
                    && !self.show_settings
                    && mouse.kind == MouseEventKind::Down(MouseButton::Left)
                {
                    self.reset_game();
                    return;
                }

                if let Some(direction) = self.swipe.handle_mouse_event(mouse) {
                    if self.is_running() {
                        self.engine.set_direction(&mut self.state, direction);
                    }
                }
            }
            _ => {}
        }
    }

    fn apply(&mut self, action: KeyAction) {
        match action {
            KeyAction::Turn(direction) => {
                if self.is_running() {
                    self.engine.set_direction(&mut self.state, direction);
                }
            }
            KeyAction::TogglePause => {
                if self.state.is_alive && !self.show_settings {
                    self.paused = !self.paused;
                }
            }
            KeyAction::Restart => {
                self.reset_game();
            }
            KeyAction::ToggleSettings => {
                self.show_settings = !self.show_settings;
                self.swipe.cancel();
            }
            KeyAction::CycleMode => {
                // Takes effect on the next restart
                self.settings.game_mode = self.settings.game_mode.next();
                self.persist_settings();
            }
            KeyAction::CycleSkin => {
                self.settings.skin = self.settings.skin.next();
                self.persist_settings();
            }
            KeyAction::ToggleSound => {
                self.settings.sound_enabled = !self.settings.sound_enabled;
                self.persist_settings();
            }
            KeyAction::ToggleVibration => {
                self.settings.vibration_enabled = !self.settings.vibration_enabled;
                self.persist_settings();
            }
            KeyAction::Quit => {
                self.should_quit = true;
            }
            KeyAction::None => {}
        }
    }

    fn persist_settings(&mut self) {
        if let Err(error) = self.store.save(&self.settings) {
            warn!(?error, "failed to save settings");
        }
    }

    fn reset_game(&mut self) {
        self.engine.set_mode(self.settings.game_mode);
        self.state = self.engine.reset();
        self.metrics.on_game_start();
        self.particles.clear();
        self.swipe.cancel();
        self.paused = false;
        self.show_settings = false;
        self.rainbow_hue = 0.0;
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )
        .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::SoundCue;
    use crate::game::{
        CollisionType, Direction, GameConfig, Position, SpecialFood, SpecialFoodKind,
    };
    use crate::settings::MemoryStore;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};

    #[derive(Default)]
    struct Recorder {
        sounds: Vec<SoundCue>,
        pulses: Vec<Duration>,
    }

    impl Feedback for Recorder {
        fn play(&mut self, cue: SoundCue) {
            self.sounds.push(cue);
        }

        fn vibrate(&mut self, duration: Duration) {
            self.pulses.push(duration);
        }
    }

    fn play_mode(settings: Settings) -> PlayMode<MemoryStore, Recorder> {
        let engine = GameEngine::with_seed(GameConfig::default(), 11);
        PlayMode::new(engine, MemoryStore::new(settings), Recorder::default()).unwrap()
    }

    fn press(mode: &mut PlayMode<MemoryStore, Recorder>, code: KeyCode) {
        mode.handle_event(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_game_initialization() {
        let mode = play_mode(Settings {
            game_mode: GameMode::Zen,
            high_score: 80,
            ..Settings::default()
        });
        assert!(mode.state.is_alive);
        assert_eq!(mode.state.score, 0);
        assert_eq!(mode.state.mode, GameMode::Zen);
        assert_eq!(mode.metrics.high_score, 80);
    }

    #[test]
    fn test_game_reset() {
        let mut mode = play_mode(Settings::default());
        mode.state.score = 10;
        mode.state.end_game(CollisionType::Wall);
        mode.paused = true;

        press(&mut mode, KeyCode::Char('r'));

        assert_eq!(mode.state.score, 0);
        assert!(mode.state.is_alive);
        assert!(!mode.paused);
    }

    #[test]
    fn test_pause_freezes_simulation() {
        let mut mode = play_mode(Settings::default());
        let head = mode.state.snake.head();

        press(&mut mode, KeyCode::Char('p'));
        mode.advance(1.0);
        assert_eq!(mode.state.snake.head(), head);

        press(&mut mode, KeyCode::Char('p'));
        mode.advance(0.2);
        assert_ne!(mode.state.snake.head(), head);
    }

    #[test]
    fn test_clock_only_runs_during_play() {
        let mut mode = play_mode(Settings::default());
        mode.advance(0.1);
        assert_eq!(mode.metrics.elapsed_time.as_millis(), 100);

        press(&mut mode, KeyCode::Char('p'));
        mode.advance(5.0);
        press(&mut mode, KeyCode::Char('p'));

        press(&mut mode, KeyCode::Tab);
        mode.advance(5.0);
        press(&mut mode, KeyCode::Tab);

        mode.state.end_game(CollisionType::Wall);
        mode.advance(5.0);

        assert_eq!(mode.metrics.elapsed_time.as_millis(), 100);
        assert_eq!(mode.metrics.format_time(), "00:00");
    }

    #[test]
    fn test_turn_is_buffered() {
        let mut mode = play_mode(Settings::default());

        press(&mut mode, KeyCode::Left);
        assert_eq!(mode.state.next_direction, Direction::Left);
        assert_eq!(mode.state.snake.direction, Direction::Down);

        // Reversal is rejected
        press(&mut mode, KeyCode::Up);
        assert_eq!(mode.state.next_direction, Direction::Left);
    }

    #[test]
    fn test_swipe_turns_snake() {
        let mut mode = play_mode(Settings::default());

        mode.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), 10, 10));
        mode.handle_event(mouse(MouseEventKind::Up(MouseButton::Left), 20, 10));

        assert_eq!(mode.state.next_direction, Direction::Right);
    }

    #[test]
    fn test_click_restarts_after_game_over() {
        let mut mode = play_mode(Settings::default());
        mode.state.end_game(CollisionType::SelfCollision);

        mode.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), 3, 3));

        assert!(mode.state.is_alive);
    }

    #[test]
    fn test_settings_are_persisted() {
        let mut mode = play_mode(Settings::default());

        press(&mut mode, KeyCode::Char('n'));
        press(&mut mode, KeyCode::Char('v'));
        press(&mut mode, KeyCode::Char('k'));
        press(&mut mode, KeyCode::Char('m'));

        let saved = mode.store.load().unwrap();
        assert!(!saved.sound_enabled);
        assert!(!saved.vibration_enabled);
        assert_eq!(saved.skin, Skin::Blue);
        assert_eq!(saved.game_mode, GameMode::TimeAttack);
        assert_eq!(mode.store.save_count(), 4);

        // The running game keeps its mode until restart
        assert_eq!(mode.state.mode, GameMode::Classic);
        press(&mut mode, KeyCode::Char('r'));
        assert_eq!(mode.state.mode, GameMode::TimeAttack);
        assert_eq!(mode.state.time_remaining, Some(60.0));
    }

    #[test]
    fn test_settings_panel_pauses() {
        let mut mode = play_mode(Settings::default());
        let head = mode.state.snake.head();

        press(&mut mode, KeyCode::Tab);
        mode.advance(1.0);
        assert_eq!(mode.state.snake.head(), head);
        assert_eq!(mode.view().overlay, Overlay::Settings);
    }

    #[test]
    fn test_eating_triggers_feedback_and_particles() {
        let mut mode = play_mode(Settings::default());
        let ahead = mode.state.snake.head().moved_in_direction(Direction::Down);
        mode.state.food = Some(ahead);
        mode.state.special_food = None;
        mode.state.obstacles.clear();

        mode.advance(0.2);

        assert_eq!(mode.state.score, 10);
        assert_eq!(mode.feedback.sounds, vec![SoundCue::Eat]);
        assert_eq!(mode.feedback.pulses, vec![Duration::from_millis(50)]);
        assert!(!mode.particles.is_empty());
    }

    #[test]
    fn test_powerup_feedback() {
        let mut mode = play_mode(Settings {
            sound_enabled: false,
            ..Settings::default()
        });
        let ahead = mode.state.snake.head().moved_in_direction(Direction::Down);
        mode.state.food = Some(Position::new(0, 0));
        mode.state.special_food = Some(SpecialFood {
            position: ahead,
            kind: SpecialFoodKind::Ghost,
        });

        mode.advance(0.2);

        assert!(mode.state.is_ghost());
        assert!(mode.feedback.sounds.is_empty());
        assert_eq!(mode.feedback.pulses, vec![Duration::from_millis(100)]);
    }

    #[test]
    fn test_high_score_saved_on_game_over() {
        let mut mode = play_mode(Settings {
            high_score: 20,
            ..Settings::default()
        });
        mode.state.score = 30;
        mode.state.snake.direction = Direction::Left;
        mode.state.next_direction = Direction::Left;
        mode.state.snake.body = vec![Position::new(0, 5), Position::new(1, 5)];

        mode.advance(0.2);

        assert!(!mode.state.is_alive);
        assert!(mode.metrics.new_record);
        assert_eq!(mode.store.load().unwrap().high_score, 30);
        assert_eq!(mode.feedback.sounds, vec![SoundCue::Death]);
    }

    #[test]
    fn test_override_mode() {
        let mut mode = play_mode(Settings::default());

        mode.override_mode(GameMode::Survival);

        assert_eq!(mode.state.mode, GameMode::Survival);
        assert_eq!(mode.store.load().unwrap().game_mode, GameMode::Survival);
    }

    #[test]
    fn test_quit_key() {
        let mut mode = play_mode(Settings::default());
        press(&mut mode, KeyCode::Char('q'));
        assert!(mode.should_quit);
    }
}
