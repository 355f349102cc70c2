//! Interactive Poisson-disk sampling viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns a [`Sampler`] run and the
//! configuration being edited, and implements [`eframe::App`] to animate the
//! run step by step and draw the accepted points.

use std::ops::{Range, RangeInclusive};

use eframe::App;
use glam::Vec2;
use log::{error, info};
use pds_core::{AcceptanceRule, Sampler, SamplerConfig, SamplerState};

/// Main application state for the interactive viewer.
///
/// The typical per-frame update is:
/// 1. Handle UI interactions / input.
/// 2. If `running` is `true` and enough time has passed, call [`Viewer::step_once`].
/// 3. Render the domain, the grid overlay, and the points.
///
/// ### Fields
/// - `sampler` - The sampling run being displayed.
/// - `pending` - Settings edited in the side panel; only Apply uses them.
/// - `seed_text` - Seed field of the side panel, parsed on Apply.
///
/// - `running` - Whether the run is currently auto-advancing.
/// - `steps_per_frame` - Sampler steps taken per automatic advance.
/// - `zoom` - Zoom factor for world-to-screen coordinate mapping.
/// - `pan` - Screen-space pan offset in pixels.
/// - `show_grid` - Whether to draw the acceleration grid.
///
/// - `last_new` - Points accepted during the last advance (for highlighting).
/// - `last_error` - Last configuration error, shown in the status bar.
///
/// - `step_interval` - Target time between automatic advances (seconds).
/// - `last_step_time` - Time stamp of the last advance (egui time).
/// - `last_step_dt` - Actual time delta between the last two advances.
pub struct Viewer {
    sampler: Sampler,
    pending: SamplerConfig,
    seed_text: String,

    running: bool,
    steps_per_frame: usize,
    zoom: f32,
    pan: egui::Vec2,
    show_grid: bool,

    last_new: Range<usize>,
    last_error: Option<String>,

    step_interval: f64,
    last_step_time: f64,
    last_step_dt: f64,
}

impl Viewer {
    /// Creates a viewer for a fresh, not yet seeded run of `cfg`.
    ///
    /// The seed chosen by the sampler is shown in the seed field so that
    /// the run can be replayed later.
    ///
    /// ### Errors
    /// Returns the sampler's configuration error if `cfg` is invalid.
    pub fn new(cfg: SamplerConfig) -> Result<Self, pds_core::SampleError> {
        let sampler = Sampler::new(cfg.clone())?;
        let seed_text = seed_to_text(sampler.seed());
        let zoom = Self::fit_zoom(&cfg);

        Ok(Self {
            sampler,
            pending: cfg,
            seed_text,
            running: false,
            steps_per_frame: 8,
            zoom,
            pan: egui::vec2(0.0, 0.0),
            show_grid: false,
            last_new: 0..0,
            last_error: None,
            step_interval: 0.02,
            last_step_time: 0.0,
            last_step_dt: 0.0,
        })
    }

    /// Zoom that fits the domain into roughly 700 pixels.
    fn fit_zoom(cfg: &SamplerConfig) -> f32 {
        (700.0 / cfg.width.max(cfg.height)).clamp(0.01, 50.0)
    }

    /// Replaces the run with a new one built from `cfg`.
    ///
    /// On an invalid configuration the current run is kept and the error is
    /// remembered for the status bar.
    ///
    /// ### Returns
    /// `true` if the run was replaced.
    fn rebuild(&mut self, cfg: SamplerConfig) -> bool {
        match Sampler::new(cfg.clone()) {
            Ok(sampler) => {
                info!(
                    "new run: {} x {}, R = {}, K = {}, seed = {:?}, {:?} rule",
                    cfg.width,
                    cfg.height,
                    cfg.min_distance,
                    cfg.attempts,
                    sampler.seed(),
                    cfg.rule
                );
                self.seed_text = seed_to_text(sampler.seed());
                self.sampler = sampler;
                self.last_new = 0..0;
                self.last_error = None;
                self.running = false;
                true
            }
            Err(e) => {
                error!("{e}");
                self.last_error = Some(e.to_string());
                false
            }
        }
    }

    /// Builds a new run from the side panel settings and refits the view.
    fn apply(&mut self) {
        let seed = match parse_seed(&self.seed_text) {
            Ok(seed) => seed,
            Err(e) => {
                error!("{e}");
                self.last_error = Some(e);
                return;
            }
        };
        let cfg = SamplerConfig {
            seed,
            ..self.pending.clone()
        };
        if self.rebuild(cfg) {
            self.zoom = Self::fit_zoom(self.sampler.config());
            self.pan = egui::vec2(0.0, 0.0);
        }
    }

    /// Restarts the displayed run with the same seed.
    ///
    /// Unapplied side panel edits are left alone.
    fn reset(&mut self) {
        let cfg = SamplerConfig {
            seed: self.sampler.seed(),
            ..self.sampler.config().clone()
        };
        self.rebuild(cfg);
    }

    /// Restarts the displayed run with a freshly drawn seed.
    fn reseed(&mut self) {
        let cfg = SamplerConfig {
            seed: None,
            ..self.sampler.config().clone()
        };
        self.rebuild(cfg);
    }

    /// Advances the run by `steps_per_frame` sampler steps.
    ///
    /// The points accepted during the advance are stored in `last_new` so
    /// they can be highlighted in the next frame.
    fn step_once(&mut self) {
        let start = self.sampler.points().len();
        for _ in 0..self.steps_per_frame {
            if self.sampler.is_done() {
                break;
            }
            self.sampler.step();
        }
        self.last_new = start..self.sampler.points().len();

        if self.sampler.is_done() {
            self.running = false;
        }
    }

    /// Runs the sampler to completion.
    pub fn finish(&mut self) {
        self.sampler.run();
        self.last_new = 0..0;
        self.running = false;
    }

    /// Converts a domain position to screen-space.
    ///
    /// The domain centre is placed at the centre of `rect`, scaled by `zoom`
    /// and offset by `pan`. The y-axis is flipped so that positive y goes up.
    fn world_to_screen(&self, p: Vec2, rect: egui::Rect) -> egui::Pos2 {
        let center = rect.center();
        let q = (p - self.sampler.config().domain().size() * 0.5) * self.zoom;
        egui::pos2(center.x + q.x + self.pan.x, center.y - q.y + self.pan.y)
    }

    /// Converts a screen-space position back to domain coordinates.
    ///
    /// This is the inverse of [`Viewer::world_to_screen`] (up to floating
    /// point rounding).
    fn screen_to_world(&self, p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        let center = rect.center();
        let x = (p.x - center.x - self.pan.x) / self.zoom;
        let y = (center.y - p.y + self.pan.y) / self.zoom;
        Vec2::new(x, y) + self.sampler.config().domain().size() * 0.5
    }

    /// Helper to draw a labeled numeric [`egui::DragValue`].
    fn labeled_drag<N: egui::emath::Numeric>(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut N,
        range: RangeInclusive<N>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Builds the top panel UI (run controls, stepping, zoom).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let done = self.sampler.is_done();

                if ui
                    .add_enabled(
                        !done,
                        egui::Button::new(if self.running { "⏸ Pause" } else { "▶ Run" }),
                    )
                    .clicked()
                {
                    self.running = !self.running;
                }

                ui.add(
                    egui::DragValue::new(&mut self.step_interval)
                        .prefix("dt target = ")
                        .range(0.0..=1.0)
                        .speed(0.01),
                );
                ui.add(
                    egui::DragValue::new(&mut self.steps_per_frame)
                        .prefix("steps/advance = ")
                        .range(1..=10_000)
                        .speed(1.0),
                );

                if ui.add_enabled(!done, egui::Button::new("Step")).clicked() {
                    let now = ctx.input(|i| i.time);
                    if self.last_step_time > 0.0 {
                        self.last_step_dt = now - self.last_step_time;
                    }
                    self.step_once();
                    self.last_step_time = now;
                }

                if ui.add_enabled(!done, egui::Button::new("Finish")).clicked() {
                    self.finish();
                }

                if ui.button("Reset").clicked() {
                    self.reset();
                }

                if ui.button("Reseed").clicked() {
                    self.reseed();
                }

                ui.separator();
                ui.add(egui::Slider::new(&mut self.zoom, 0.01..=50.0).logarithmic(true).text("Zoom"));
                ui.checkbox(&mut self.show_grid, "Grid");
            });
        });
    }

    /// Builds the bottom status bar (run state, counts, seed).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("dt target = {:.3} s", self.step_interval));
                ui.label(format!("dt last = {:.3} s", self.last_step_dt));
                ui.separator();

                let stats = self.sampler.stats();
                ui.label(format!(
                    "candidates = {} (rejected {})",
                    stats.candidates,
                    stats.rejected()
                ));
                ui.label(format!("cells = {}", self.sampler.grid().len()));
                ui.label(format!("active = {}", self.sampler.active_len()));
                ui.label(format!("points = {}", self.sampler.points().len()));
                ui.label(match self.sampler.state() {
                    SamplerState::Idle => "idle",
                    SamplerState::Active => "active",
                    SamplerState::Done => "done",
                });
                if let Some(seed) = self.sampler.seed() {
                    ui.label(format!("seed = {seed}"));
                }

                if let Some(err) = &self.last_error {
                    ui.separator();
                    ui.colored_label(egui::Color32::LIGHT_RED, err.as_str());
                }
            });
        });
    }

    /// Builds the right-hand configuration panel for sampling parameters.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Config");

                ui.separator();
                ui.label("Domain");
                Self::labeled_drag(ui, "width:", &mut self.pending.width, 1.0..=10_000.0, 1.0);
                Self::labeled_drag(ui, "height:", &mut self.pending.height, 1.0..=10_000.0, 1.0);

                ui.separator();
                ui.label("Spacing");
                Self::labeled_drag(ui, "R:", &mut self.pending.min_distance, 0.5..=500.0, 0.1);
                Self::labeled_drag(ui, "K:", &mut self.pending.attempts, 1..=200, 1.0);

                ui.separator();
                ui.label("Acceptance rule");
                ui.radio_value(
                    &mut self.pending.rule,
                    AcceptanceRule::Canonical,
                    "canonical (5×5, ≥ R)",
                );
                ui.radio_value(
                    &mut self.pending.rule,
                    AcceptanceRule::Reference,
                    "reference (3×3, ≥ R/√2)",
                );

                ui.separator();
                ui.label("Seed (empty = random)");
                ui.text_edit_singleline(&mut self.seed_text);

                ui.separator();
                if ui.button("Apply").clicked() {
                    self.apply();
                }
                if ui.button("Reset cfg to default").clicked() {
                    self.pending = SamplerConfig::default();
                    self.seed_text.clear();
                }
            });
    }

    /// Draws the domain outline and, if enabled, the acceleration grid.
    fn ui_domain(&self, painter: &egui::Painter, rect: egui::Rect) {
        let size = self.sampler.config().domain().size();

        if self.show_grid {
            let grid = self.sampler.grid();
            let w = grid.cell_width();
            let stroke = egui::Stroke::new(0.5, egui::Color32::from_gray(60));
            for c in 1..grid.cols() {
                let x = (c as f32 * w).min(size.x);
                let a = self.world_to_screen(Vec2::new(x, 0.0), rect);
                let b = self.world_to_screen(Vec2::new(x, size.y), rect);
                painter.line_segment([a, b], stroke);
            }
            for r in 1..grid.rows() {
                let y = (r as f32 * w).min(size.y);
                let a = self.world_to_screen(Vec2::new(0.0, y), rect);
                let b = self.world_to_screen(Vec2::new(size.x, y), rect);
                painter.line_segment([a, b], stroke);
            }
        }

        let corners = [
            Vec2::new(0.0, 0.0),
            Vec2::new(size.x, 0.0),
            Vec2::new(size.x, size.y),
            Vec2::new(0.0, size.y),
        ];
        let points: Vec<egui::Pos2> = corners
            .iter()
            .map(|&p| self.world_to_screen(p, rect))
            .collect();
        painter.add(egui::Shape::closed_line(
            points,
            egui::Stroke::new(1.0, egui::Color32::GRAY),
        ));
    }

    /// Builds the central panel where the points are drawn.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::click_and_drag());
            let rect = response.rect;
            let painter = ui.painter_at(rect);

            // Pan with drag.
            if response.dragged() {
                self.pan += response.drag_delta();
            }

            // Zoom around the mouse cursor.
            let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                let pointer_screen = response.hover_pos().unwrap_or(rect.center());
                let world_before = self.screen_to_world(pointer_screen, rect);

                let factor = (1.0 + scroll * 0.001).clamp(0.5, 2.0);
                self.zoom = (self.zoom * factor).clamp(0.01, 50.0);

                let screen_after = self.world_to_screen(world_before, rect);
                self.pan += pointer_screen - screen_after;
            }

            self.ui_domain(&painter, rect);

            // Draw accepted points (highlighting the last advance in red).
            let r = (self.sampler.config().min_distance * 0.15 * self.zoom).max(1.5);
            for (i, &p) in self.sampler.points().iter().enumerate() {
                let color = if self.last_new.contains(&i) {
                    egui::Color32::RED
                } else {
                    egui::Color32::GREEN
                };
                painter.circle_filled(self.world_to_screen(p, rect), r, color);
            }

            // Ring the points still waiting in the active set.
            let stroke = egui::Stroke::new(1.0, egui::Color32::YELLOW);
            for &p in self.sampler.active_points() {
                painter.circle_stroke(self.world_to_screen(p, rect), r + 2.0, stroke);
            }

            // Auto-run if requested.
            if self.running {
                let now = ctx.input(|i| i.time);
                let elapsed = now - self.last_step_time;
                if elapsed >= self.step_interval {
                    if self.last_step_time > 0.0 {
                        self.last_step_dt = elapsed;
                    }
                    self.step_once();
                    self.last_step_time = now;
                }

                ctx.request_repaint();
            }
        });
    }
}

fn seed_to_text(seed: Option<u64>) -> String {
    seed.map(|s| s.to_string()).unwrap_or_default()
}

/// Parses the seed field. Empty means "draw a random seed".
fn parse_seed(text: &str) -> Result<Option<u64>, String> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    text.parse::<u64>()
        .map(Some)
        .map_err(|e| format!("invalid seed `{text}`: {e}"))
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}
