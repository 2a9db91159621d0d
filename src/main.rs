use std::time::Duration;

use arboard::Clipboard;
use macroquad::prelude::*;
use tracing::{error, info, warn};

use mazebot::config::Config;
use mazebot::ray::beam_angles;
use mazebot::{SimulationSession, StepResult, Ticker};

/// Visualization state
struct VisState {
    config: Config,
    profiles: Vec<String>,
    selected: usize,
    session: Option<SimulationSession>,
    ticker: Ticker,
    status: String,
}

impl VisState {
    fn new(config: Config) -> Self {
        let profiles: Vec<String> = config.profile_names().into_iter().map(String::from).collect();
        let selected = profiles
            .iter()
            .position(|p| *p == config.simulation.profile)
            .unwrap_or(0);
        let ticker = Ticker::from_millis(config.simulation.step_interval_ms);

        VisState {
            config,
            profiles,
            selected,
            session: None,
            ticker,
            status: "S: start".to_string(),
        }
    }

    fn selected_profile(&self) -> &str {
        self.profiles.get(self.selected).map(String::as_str).unwrap_or("")
    }

    fn select(&mut self, index: usize) {
        if index < self.profiles.len() {
            self.selected = index;
            self.status = format!("Profile: {} (S to start)", self.selected_profile());
        }
    }

    /// Fresh maze, robot and log; pending ticks from the previous run are dropped
    fn start(&mut self) {
        self.ticker.stop();
        let mut config = self.config.clone();
        config.simulation.profile = self.selected_profile().to_string();

        match SimulationSession::from_config(&config) {
            Ok(session) => {
                self.session = Some(session);
                self.ticker.start();
                self.status = format!("Running {}", config.simulation.profile);
            }
            Err(e) => {
                error!("Cannot start simulation: {}", e);
                self.session = None;
                self.status = format!("Error: {}", e);
            }
        }
    }

    fn update(&mut self, elapsed: Duration) {
        if !self.ticker.advance(elapsed) {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };

        if let StepResult::GoalReached(_) | StepResult::Finished = session.step() {
            self.ticker.stop();
            self.status = format!("Goal reached in {} steps", session.log().len());
        }
    }

    fn export(&mut self) {
        let Some(session) = self.session.as_ref() else {
            warn!("Nothing to export yet");
            return;
        };
        match session.export(&self.config.export.directory, self.config.export.compact) {
            Ok(paths) => {
                let names: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
                self.status = format!("Exported {}", names.join(", "));
            }
            Err(e) => {
                error!("Export failed: {}", e);
                self.status = format!("Export failed: {}", e);
            }
        }
    }

    fn copy_to_clipboard(&self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let maze = session.grid().to_ascii();
        match Clipboard::new() {
            Ok(mut clipboard) => {
                if let Err(e) = clipboard.set_text(maze) {
                    warn!("Failed to copy to clipboard: {}", e);
                } else {
                    info!("Maze layout copied to clipboard");
                    // Give clipboard managers a moment to capture it
                    std::thread::sleep(Duration::from_millis(100));
                }
            }
            Err(e) => {
                warn!("Failed to access clipboard: {}", e);
            }
        }
    }

    fn draw(&self) {
        let visual = &self.config.visual;
        clear_background(Color::from_rgba(
            visual.background_r,
            visual.background_g,
            visual.background_b,
            255,
        ));

        if let Some(session) = &self.session {
            let cs = session.robot().params.cell_size;
            // Cell (c, r) is centred on world point (c * cs, r * cs)
            let origin = cs / 2.0;
            let grid = session.grid();

            for y in 0..grid.rows {
                for x in 0..grid.cols {
                    if grid.is_wall(x, y) {
                        draw_rectangle(
                            origin + (x as f32 - 0.5) * cs,
                            origin + (y as f32 - 0.5) * cs,
                            cs,
                            cs,
                            BLACK,
                        );
                    }
                }
            }

            let goal = session.goal();
            draw_rectangle(
                origin + (goal.x as f32 - 0.5) * cs,
                origin + (goal.y as f32 - 0.5) * cs,
                cs,
                cs,
                Color::from_rgba(120, 220, 120, 255),
            );

            let pose = session.robot().pose;
            let (rx, ry) = (origin + pose.x, origin + pose.y);

            if visual.show_lidar {
                let lidar = session.lidar();
                for (angle, distance) in beam_angles(pose.heading, lidar.len()).zip(&lidar) {
                    draw_line(
                        rx,
                        ry,
                        rx + distance * angle.cos(),
                        ry + distance * angle.sin(),
                        1.0,
                        Color::new(0.0, 1.0, 0.0, 0.5),
                    );
                }
            }

            let radius = self.config.robot.radius;
            draw_circle(rx, ry, radius, BLUE);
            draw_line(
                rx,
                ry,
                rx + radius * 2.0 * pose.heading.cos(),
                ry + radius * 2.0 * pose.heading.sin(),
                2.0,
                RED,
            );
        }

        let info = format!(
            "{}\nProfile: {}\n1-{}: select profile  S: start  E: export  C: copy maze  Esc: quit",
            self.status,
            self.selected_profile(),
            self.profiles.len().min(9),
        );
        let bottom = screen_height() - 50.0;
        for (i, line) in info.lines().enumerate() {
            draw_text(line, 10.0, bottom + i as f32 * 18.0, 18.0, DARKGRAY);
        }
    }
}

fn window_conf() -> Conf {
    let config = Config::load();
    Conf {
        window_title: config.visual.window_title.clone(),
        window_width: ((config.maze.width as f32 + 1.0) * config.maze.cell_size) as i32,
        window_height: ((config.maze.height as f32 + 1.0) * config.maze.cell_size) as i32 + 60,
        ..Default::default()
    }
}

const PROFILE_KEYS: [KeyCode; 9] = [
    KeyCode::Key1,
    KeyCode::Key2,
    KeyCode::Key3,
    KeyCode::Key4,
    KeyCode::Key5,
    KeyCode::Key6,
    KeyCode::Key7,
    KeyCode::Key8,
    KeyCode::Key9,
];

#[macroquad::main(window_conf)]
async fn main() {
    tracing_subscriber::fmt::init();

    let mut state = VisState::new(Config::load());

    loop {
        for (i, key) in PROFILE_KEYS.iter().enumerate() {
            if is_key_pressed(*key) {
                state.select(i);
            }
        }

        if is_key_pressed(KeyCode::S) {
            state.start();
        }

        if is_key_pressed(KeyCode::E) {
            state.export();
        }

        if is_key_pressed(KeyCode::C) {
            state.copy_to_clipboard();
        }

        if is_key_pressed(KeyCode::Escape) {
            break;
        }

        state.update(Duration::from_secs_f32(get_frame_time()));
        state.draw();

        next_frame().await
    }
}
