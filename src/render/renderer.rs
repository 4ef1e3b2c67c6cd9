use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction as LayoutDirection, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};
use std::collections::HashMap;

use crate::game::{
    BodyShape, Direction, GameState, Particle, ParticleTint, Position, SegmentSprite,
    SpecialFoodKind, segment_sprites,
};
use crate::metrics::GameMetrics;
use crate::settings::{Rgb, Settings};

const GHOST_COLOR: Color = Color::Rgb(0x8b, 0x5c, 0xf6);
const OBSTACLE_FRAMES: [&str; 4] = ["▓▓", "▒▓", "▒▒", "▓▒"];

/// Screen shown instead of the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Paused,
    Settings,
}

/// Everything drawn in one frame
pub struct RenderView<'a> {
    pub state: &'a GameState,
    pub metrics: &'a GameMetrics,
    pub settings: &'a Settings,
    pub particles: &'a [Particle],
    pub overlay: Overlay,
    /// Obstacle animation frame
    pub animation_frame: usize,
    /// Current rainbow hue in degrees
    pub rainbow_hue: f32,
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, view: &RenderView) {
        let chunks = Layout::default()
            .direction(LayoutDirection::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        // Render header with basic stats
        let stats = self.render_stats(view);
        frame.render_widget(stats, chunks[0]);

        // Center the game grid horizontally
        let game_area = Layout::default()
            .direction(LayoutDirection::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        // Overlays replace the grid
        let body = if view.overlay == Overlay::Settings {
            self.render_settings(view)
        } else if !view.state.is_alive {
            self.render_game_over(view)
        } else if view.overlay == Overlay::Paused {
            self.render_paused()
        } else {
            self.render_grid(view)
        };
        frame.render_widget(body, game_area);

        // Render footer with controls
        let controls = self.render_controls(chunks[2]);
        frame.render_widget(controls, chunks[2]);
    }

    fn render_grid(&self, view: &RenderView) -> Paragraph<'_> {
        let state = view.state;
        let (head_rgb, body_rgb) = view.settings.skin.colors(view.rainbow_hue);
        let ghost = state.is_ghost();

        let sprites: HashMap<Position, SegmentSprite> = state
            .snake
            .body
            .iter()
            .copied()
            .zip(segment_sprites(state))
            .collect();

        let sparks = particle_cells(view.particles, state.grid_width, state.grid_height);
        let obstacle_glyph = OBSTACLE_FRAMES[view.animation_frame % OBSTACLE_FRAMES.len()];

        let mut lines = Vec::with_capacity(state.grid_height);

        for y in 0..state.grid_height {
            let mut spans = Vec::with_capacity(state.grid_width);

            for x in 0..state.grid_width {
                let pos = Position::new(x as i32, y as i32);

                let cell = if let Some(sprite) = sprites.get(&pos) {
                    let rgb = if pos == state.snake.head() {
                        head_rgb
                    } else {
                        body_rgb
                    };
                    let style = if ghost {
                        Style::default().fg(GHOST_COLOR).add_modifier(Modifier::DIM)
                    } else {
                        Style::default().fg(rgb_color(rgb)).add_modifier(Modifier::BOLD)
                    };
                    Span::styled(sprite_glyph(*sprite), style)
                } else if state.food == Some(pos) {
                    Span::styled(
                        "● ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else if let Some(special) = state.special_food.filter(|s| s.position == pos) {
                    let (glyph, color) = special_food_look(special.kind);
                    Span::styled(glyph, Style::default().fg(color).add_modifier(Modifier::BOLD))
                } else if state.is_obstacle(pos) {
                    Span::styled(obstacle_glyph, Style::default().fg(Color::Gray))
                } else if let Some(particle) = sparks.get(&pos) {
                    Span::styled(
                        particle_glyph(particle),
                        Style::default().fg(tint_color(particle.tint)),
                    )
                } else {
                    // Empty cell
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        let title = if ghost { " Snake · ghost " } else { " Snake " };
        let border_color = if ghost { GHOST_COLOR } else { Color::White };

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(border_color))
                    .title(title),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, view: &RenderView) -> Paragraph<'_> {
        let state = view.state;
        let mut spans = vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                state.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("   "),
            Span::styled("Level: ", Style::default().fg(Color::Yellow)),
            Span::styled(state.level.to_string(), Style::default().fg(Color::White)),
            Span::raw("   "),
            Span::styled("Best: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                view.metrics.high_score.to_string(),
                Style::default().fg(Color::White),
            ),
            Span::raw("   "),
            Span::styled(state.mode.title(), Style::default().fg(Color::Cyan)),
        ];

        if let Some(remaining) = state.time_remaining {
            spans.push(Span::raw("   "));
            spans.push(Span::styled(
                format!("{}s", remaining.ceil() as u32),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::raw("   "));
            spans.push(Span::styled("Time: ", Style::default().fg(Color::Yellow)));
            spans.push(Span::styled(
                view.metrics.format_time(),
                Style::default().fg(Color::White),
            ));
        }

        if state.is_ghost() {
            spans.push(Span::raw("   "));
            spans.push(Span::styled(
                format!("GHOST: {}s", state.ghost_remaining.ceil() as u32),
                Style::default().fg(GHOST_COLOR).add_modifier(Modifier::BOLD),
            ));
        }

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }

    fn render_game_over(&self, view: &RenderView) -> Paragraph<'_> {
        let state = view.state;
        let cause = state
            .collision
            .map(|collision| collision.describe())
            .unwrap_or("");

        let mut text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(Span::styled(
                format!("The snake {}", cause),
                Style::default().fg(Color::Gray),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" | Level: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.level.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" | Games: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    view.metrics.games_played.to_string(),
                    Style::default().fg(Color::White),
                ),
            ]),
        ];

        if view.metrics.new_record {
            text.push(Line::from(Span::styled(
                "NEW RECORD!",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD | Modifier::SLOW_BLINK),
            )));
        }

        // The mode picked for the next game
        let next_mode = view.settings.game_mode;
        text.extend([
            Line::from(""),
            Line::from(Span::styled(
                next_mode.title(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                next_mode.description(),
                Style::default().fg(Color::Gray),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" or click to restart, ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ]);

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red)),
            )
    }

    fn render_paused(&self) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "PAUSED",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press P or Space to resume",
                Style::default().fg(Color::Gray),
            )),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
    }

    fn render_settings(&self, view: &RenderView) -> Paragraph<'_> {
        let settings = view.settings;
        let toggle = |on: bool| {
            if on {
                Span::styled("ON", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
            } else {
                Span::styled("OFF", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
            }
        };
        let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Cyan));
        let (head_rgb, _) = settings.skin.colors(view.rainbow_hue);

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "SETTINGS",
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![key("[N] "), Span::raw("Sound: "), toggle(settings.sound_enabled)]),
            Line::from(vec![
                key("[V] "),
                Span::raw("Vibrate: "),
                toggle(settings.vibration_enabled),
            ]),
            Line::from(vec![
                key("[K] "),
                Span::raw("Skin: "),
                Span::styled(settings.skin.name(), Style::default().fg(rgb_color(head_rgb))),
            ]),
            Line::from(vec![
                key("[M] "),
                Span::raw("Mode: "),
                Span::styled(
                    settings.game_mode.title(),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(Span::styled(
                settings.game_mode.description(),
                Style::default().fg(Color::Gray),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Mode changes apply on restart. Press O or Tab to close.",
                Style::default().fg(Color::DarkGray),
            )),
        ];

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
    }

    fn render_controls(&self, _area: Rect) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" / "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" / drag to move | "),
            Span::styled("P", Style::default().fg(Color::Yellow)),
            Span::raw(" pause | "),
            Span::styled("O", Style::default().fg(Color::Yellow)),
            Span::raw(" settings | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Two-column glyph for a snake segment
pub fn sprite_glyph(sprite: SegmentSprite) -> &'static str {
    match sprite {
        SegmentSprite::Head(Direction::Up) => "▲ ",
        SegmentSprite::Head(Direction::Down) => "▼ ",
        SegmentSprite::Head(Direction::Left) => "◀ ",
        SegmentSprite::Head(Direction::Right) => "▶ ",
        // Tail direction points away from the body
        SegmentSprite::Tail(Direction::Up) => "╻ ",
        SegmentSprite::Tail(Direction::Down) => "╹ ",
        SegmentSprite::Tail(Direction::Left) => "╺═",
        SegmentSprite::Tail(Direction::Right) => "╸ ",
        SegmentSprite::Body(BodyShape::Vertical) => "║ ",
        SegmentSprite::Body(BodyShape::Horizontal) => "══",
        SegmentSprite::Body(BodyShape::TopLeft) => "╝ ",
        SegmentSprite::Body(BodyShape::TopRight) => "╚═",
        SegmentSprite::Body(BodyShape::BottomLeft) => "╗ ",
        SegmentSprite::Body(BodyShape::BottomRight) => "╔═",
    }
}

fn special_food_look(kind: SpecialFoodKind) -> (&'static str, Color) {
    match kind {
        SpecialFoodKind::Golden => ("★ ", Color::Rgb(0xfb, 0xbf, 0x24)),
        SpecialFoodKind::Speed => ("» ", Color::Rgb(0x06, 0xb6, 0xd4)),
        SpecialFoodKind::Slow => ("« ", Color::Rgb(0x3b, 0x82, 0xf6)),
        SpecialFoodKind::Ghost => ("◆ ", Color::Rgb(0xa8, 0x55, 0xf7)),
    }
}

fn tint_color(tint: ParticleTint) -> Color {
    match tint {
        ParticleTint::Food => Color::Rgb(0x22, 0xc5, 0x5e),
        ParticleTint::Golden => Color::Rgb(0xfb, 0xbf, 0x24),
        ParticleTint::Speed => Color::Rgb(0x06, 0xb6, 0xd4),
        ParticleTint::Slow => Color::Rgb(0x3b, 0x82, 0xf6),
        ParticleTint::Ghost => Color::Rgb(0xa8, 0x55, 0xf7),
    }
}

/// Large, fresh particles draw as sparks and fade to dots
fn particle_glyph(particle: &Particle) -> &'static str {
    if particle.size * particle.alpha() >= 2.5 {
        "* "
    } else {
        "· "
    }
}

fn rgb_color((r, g, b): Rgb) -> Color {
    Color::Rgb(r, g, b)
}

/// Brightest particle per on-grid cell
fn particle_cells(
    particles: &[Particle],
    width: usize,
    height: usize,
) -> HashMap<Position, &Particle> {
    let mut cells: HashMap<Position, &Particle> = HashMap::new();
    for particle in particles {
        if particle.x < 0.0 || particle.y < 0.0 {
            continue;
        }
        let (x, y) = (particle.x as usize, particle.y as usize);
        if x >= width || y >= height {
            continue;
        }
        let pos = Position::new(x as i32, y as i32);
        match cells.get(&pos) {
            Some(existing) if existing.alpha() >= particle.alpha() => {}
            _ => {
                cells.insert(pos, particle);
            }
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{CollisionType, GameConfig, GameMode, Snake, SpecialFood};
    use ratatui::{Terminal, backend::TestBackend};

    fn sample_state() -> GameState {
        let snake = Snake::new(Position::new(6, 10), Direction::Down, 3);
        GameState::new(snake, Position::new(2, 2), &GameConfig::default())
    }

    fn draw(view: &RenderView) -> String {
        let backend = TestBackend::new(80, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| Renderer::new().render(frame, view))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn view<'a>(
        state: &'a GameState,
        metrics: &'a GameMetrics,
        settings: &'a Settings,
        overlay: Overlay,
    ) -> RenderView<'a> {
        RenderView {
            state,
            metrics,
            settings,
            particles: &[],
            overlay,
            animation_frame: 0,
            rainbow_hue: 0.0,
        }
    }

    #[test]
    fn test_board_shows_snake_and_food() {
        let mut state = sample_state();
        state.special_food = Some(SpecialFood {
            position: Position::new(0, 0),
            kind: SpecialFoodKind::Golden,
        });
        state.obstacles.push(Position::new(11, 19));
        let metrics = GameMetrics::default();
        let settings = Settings::default();

        let screen = draw(&view(&state, &metrics, &settings, Overlay::None));

        assert!(screen.contains("Score: "));
        assert!(screen.contains('▼'));
        assert!(screen.contains('║'));
        assert!(screen.contains('●'));
        assert!(screen.contains('★'));
        assert!(screen.contains('▓'));
    }

    #[test]
    fn test_hud_shows_timers() {
        let mut state = GameState::new(
            Snake::new(Position::new(6, 10), Direction::Down, 3),
            Position::new(2, 2),
            &GameConfig::default().with_mode(GameMode::TimeAttack),
        );
        state.time_remaining = Some(41.2);
        state.ghost_remaining = 3.5;
        let metrics = GameMetrics::default();
        let settings = Settings::default();

        let screen = draw(&view(&state, &metrics, &settings, Overlay::None));

        assert!(screen.contains("42s"));
        assert!(screen.contains("GHOST: 4s"));
    }

    #[test]
    fn test_game_over_screen() {
        let mut state = sample_state();
        state.score = 70;
        state.end_game(CollisionType::Obstacle);
        let mut metrics = GameMetrics::default();
        metrics.on_game_over(70);
        let settings = Settings::default();

        let screen = draw(&view(&state, &metrics, &settings, Overlay::None));

        assert!(screen.contains("GAME OVER"));
        assert!(screen.contains("NEW RECORD!"));
        assert!(screen.contains("Games: 1"));
        assert!(screen.contains("crashed into an obstacle"));
    }

    #[test]
    fn test_paused_and_settings_overlays() {
        let state = sample_state();
        let metrics = GameMetrics::default();
        let settings = Settings::default();

        let paused = draw(&view(&state, &metrics, &settings, Overlay::Paused));
        assert!(paused.contains("PAUSED"));

        let panel = draw(&view(&state, &metrics, &settings, Overlay::Settings));
        assert!(panel.contains("SETTINGS"));
        assert!(panel.contains("Classic Green"));
    }

    #[test]
    fn test_sprite_glyphs_fill_two_columns() {
        let sprites = [
            SegmentSprite::Head(Direction::Left),
            SegmentSprite::Tail(Direction::Left),
            SegmentSprite::Body(BodyShape::Horizontal),
            SegmentSprite::Body(BodyShape::TopRight),
        ];
        for sprite in sprites {
            assert_eq!(sprite_glyph(sprite).chars().count(), 2);
        }
    }

    #[test]
    fn test_particle_glyph_shrinks_with_size_and_age() {
        let spark = |size: f32, lifetime: f32| Particle {
            x: 0.0,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
            lifetime,
            max_lifetime: 1.0,
            size,
            tint: ParticleTint::Golden,
        };

        assert_eq!(particle_glyph(&spark(5.0, 1.0)), "* ");
        assert_eq!(particle_glyph(&spark(5.0, 0.4)), "· ");
        assert_eq!(particle_glyph(&spark(3.0, 0.9)), "* ");
        assert_eq!(particle_glyph(&spark(2.0, 1.0)), "· ");
    }

    #[test]
    fn test_particle_cells_keep_brightest() {
        let particle = |x: f32, lifetime: f32| Particle {
            x,
            y: 1.2,
            vx: 0.0,
            vy: 0.0,
            lifetime,
            max_lifetime: 1.0,
            size: 3.0,
            tint: ParticleTint::Food,
        };
        let particles = vec![particle(1.5, 0.2), particle(1.7, 0.9), particle(-0.5, 1.0)];

        let cells = particle_cells(&particles, 12, 20);

        assert_eq!(cells.len(), 1);
        assert_eq!(cells[&Position::new(1, 1)].lifetime, 0.9);
    }
}
