use std::time::Duration;

pub struct GameMetrics {
    /// Time spent actually playing the current game
    pub elapsed_time: Duration,
    pub high_score: u32,
    pub games_played: u32,
    /// Whether the last finished game set the high score
    pub new_record: bool,
}

impl GameMetrics {
    /// Start a session, seeding the best score from saved settings
    pub fn new(high_score: u32) -> Self {
        Self {
            elapsed_time: Duration::ZERO,
            high_score,
            games_played: 0,
            new_record: false,
        }
    }

    /// Count `dt` seconds of play; paused frames are never passed in
    pub fn update(&mut self, dt: f32) {
        self.elapsed_time += Duration::from_secs_f32(dt.max(0.0));
    }

    pub fn on_game_start(&mut self) {
        self.elapsed_time = Duration::ZERO;
        self.new_record = false;
    }

    /// Record a finished game; returns true when it beat the high score
    pub fn on_game_over(&mut self, final_score: u32) -> bool {
        self.games_played += 1;
        self.new_record = final_score > self.high_score;
        if self.new_record {
            self.high_score = final_score;
        }
        self.new_record
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new(0)
    }
}
