//! Main application for the Gomoku GUI

use eframe::egui;
use egui::{CentralPanel, Context, CornerRadius, Frame, RichText, SidePanel, TopBottomPanel, Vec2};

use super::board_view::BoardView;
use super::game_state::{GameMode, GameState};
use super::theme::*;
use crate::board::CAPTURE_VICTORY_POINTS;
use crate::config::Config;
use crate::{GameResult, Stone};

/// Main Gomoku application
pub struct GomokuApp {
    state: GameState,
    board_view: BoardView,
    show_debug: bool,
}

impl GomokuApp {
    /// Create the app from a loaded configuration
    pub fn new(_cc: &eframe::CreationContext<'_>, config: &Config) -> GameResult<Self> {
        Ok(Self {
            state: GameState::new(config)?,
            board_view: BoardView::default(),
            show_debug: true,
        })
    }

    /// Render the top menu bar
    fn render_menu_bar(&mut self, ctx: &Context) {
        TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("Game", |ui| {
                    let modes = [
                        ("New Game (Human Black)", GameMode::HumanVsAi { human: Stone::Black }),
                        ("New Game (Human White)", GameMode::HumanVsAi { human: Stone::White }),
                        ("New Game (Hotseat)", GameMode::HumanVsHuman),
                        ("New Game (Engine vs Engine)", GameMode::AiVsAi),
                    ];
                    for (label, mode) in modes {
                        if ui.button(label).clicked() {
                            self.state.set_mode(mode);
                            ui.close_menu();
                        }
                    }
                    ui.separator();
                    if ui.button("Restart (N)").clicked() {
                        self.state.restart();
                        ui.close_menu();
                    }
                });

                ui.menu_button("View", |ui| {
                    ui.checkbox(&mut self.show_debug, "Engine Panel (D)");
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(self.state.mode.label());
                });
            });
        });
    }

    /// Render the side panel with game info and settings
    fn render_side_panel(&mut self, ctx: &Context) {
        SidePanel::right("info_panel")
            .min_width(240.0)
            .max_width(280.0)
            .frame(Frame::new().fill(PANEL_BG))
            .show(ctx, |ui| {
                ui.add_space(12.0);
                ui.label(RichText::new("GOMOKU").size(22.0).strong().color(TEXT_PRIMARY));
                ui.label(RichText::new("Ninuki-renju").size(11.0).color(TEXT_MUTED));
                ui.add_space(12.0);

                self.render_turn_card(ui);
                ui.add_space(10.0);

                self.render_timer_card(ui);
                ui.add_space(10.0);

                self.render_captures_card(ui);
                ui.add_space(10.0);

                if self.show_debug {
                    self.render_debug_card(ui);
                    ui.add_space(10.0);
                }

                self.render_settings_card(ui);

                if let Some(text) = self.state.pending_five_text() {
                    ui.add_space(10.0);
                    Self::render_message_card(ui, &text);
                }

                if let Some(text) = self.state.outcome_text() {
                    ui.add_space(10.0);
                    self.render_game_over_card(ui, &text);
                }

                if let Some(msg) = &self.state.message {
                    ui.add_space(10.0);
                    Self::render_message_card(ui, msg);
                }
            });
    }

    fn card_frame() -> Frame {
        Frame::new()
            .fill(CARD_BG)
            .corner_radius(CornerRadius::same(8))
            .inner_margin(12.0)
    }

    /// Render turn indicator card
    fn render_turn_card(&self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            let turn = self.state.game.turn();
            let accent = if turn == Stone::Black {
                egui::Color32::from_rgb(70, 70, 75)
            } else {
                egui::Color32::from_rgb(220, 220, 225)
            };

            ui.horizontal(|ui| {
                let (rect, _) = ui.allocate_exact_size(Vec2::new(48.0, 48.0), egui::Sense::hover());
                ui.painter().circle_filled(rect.center(), 22.0, accent);

                ui.add_space(12.0);

                ui.vertical(|ui| {
                    ui.add_space(4.0);
                    ui.label(
                        RichText::new(turn.name().to_uppercase())
                            .size(18.0)
                            .strong()
                            .color(TEXT_PRIMARY),
                    );

                    let status = if self.state.is_ai_thinking() {
                        ("Engine thinking...", TIMER_WARNING)
                    } else if self.state.game.is_over() {
                        ("Game over", WIN_HIGHLIGHT)
                    } else if self.state.is_human_turn() {
                        ("Your turn", TIMER_NORMAL)
                    } else {
                        ("Engine stopped", TIMER_CRITICAL)
                    };
                    ui.label(RichText::new(status.0).size(12.0).color(status.1));
                });
            });

            ui.add_space(6.0);
            ui.label(
                RichText::new(format!("Turn {}", self.state.game.state().turn_number()))
                    .size(11.0)
                    .color(TEXT_SECONDARY),
            );
        });
    }

    /// Render timer card
    fn render_timer_card(&self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            ui.label(RichText::new("TIMER").size(10.0).color(TEXT_MUTED));
            ui.add_space(6.0);

            if self.state.is_ai_thinking() {
                let secs = self.state.game.elapsed().as_secs_f32();
                let budget = self.state.game.budget().as_secs_f32();
                let color = if secs < budget * 0.6 {
                    TIMER_NORMAL
                } else if secs < budget {
                    TIMER_WARNING
                } else {
                    TIMER_CRITICAL
                };
                ui.label(RichText::new(format!("{:.2}s", secs)).size(28.0).strong().color(color));
            } else {
                let elapsed = self.state.move_timer.elapsed();
                ui.label(
                    RichText::new(format!("{:.1}s", elapsed.as_secs_f32()))
                        .size(24.0)
                        .color(TEXT_PRIMARY),
                );
            }

            if let Some(ai_time) = self.state.move_timer.ai_thinking_time {
                ui.add_space(4.0);
                ui.label(
                    RichText::new(format!("Last engine move: {:.3}s", ai_time.as_secs_f32()))
                        .size(10.0)
                        .color(TEXT_SECONDARY),
                );
            }
        });
    }

    /// Render captures card
    fn render_captures_card(&self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            ui.label(RichText::new("CAPTURES").size(10.0).color(TEXT_MUTED));
            ui.add_space(8.0);

            let (black, white) = self.state.game.captured_counts();
            Self::render_capture_row(ui, Stone::Black, black);
            ui.add_space(6.0);
            Self::render_capture_row(ui, Stone::White, white);
        });
    }

    fn render_capture_row(ui: &mut egui::Ui, stone: Stone, captured: u32) {
        ui.horizontal(|ui| {
            ui.label(RichText::new(stone.name()).size(13.0).color(TEXT_PRIMARY));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let text = format!("{}/{}", captured, CAPTURE_VICTORY_POINTS);
                let color = if captured >= CAPTURE_VICTORY_POINTS {
                    WIN_HIGHLIGHT
                } else if captured + 2 >= CAPTURE_VICTORY_POINTS {
                    TIMER_WARNING
                } else {
                    TEXT_SECONDARY
                };
                ui.label(RichText::new(text).size(14.0).strong().color(color));
            });
        });
    }

    /// Render the last engine decision
    fn render_debug_card(&self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            ui.label(RichText::new("ENGINE").size(10.0).color(TEXT_MUTED));
            ui.add_space(6.0);

            ui.label(
                RichText::new(format!("Position score: {}", self.state.game.current_score()))
                    .size(10.0)
                    .color(TEXT_SECONDARY),
            );

            match &self.state.last_choice {
                Some(choice) => {
                    ui.label(
                        RichText::new(format!("Played {}", choice.pos))
                            .size(12.0)
                            .strong()
                            .color(WIN_HIGHLIGHT),
                    );
                    ui.label(
                        RichText::new(format!(
                            "Score {} | {} candidates, {} tied",
                            choice.score, choice.candidates, choice.ties
                        ))
                        .size(10.0)
                        .color(TEXT_SECONDARY),
                    );
                    if choice.timed_out {
                        ui.label(RichText::new("Timed out").size(10.0).color(TIMER_CRITICAL));
                    }
                }
                None => {
                    ui.label(RichText::new("No engine move yet").size(10.0).color(TEXT_MUTED));
                }
            }
        });
    }

    /// Rule toggles apply on restart, display toggles at once
    fn render_settings_card(&mut self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            ui.label(RichText::new("RULES (next game)").size(10.0).color(TEXT_MUTED));
            let rules = &mut self.state.rules;
            ui.checkbox(&mut rules.double_three, "Forbid double three");
            ui.checkbox(&mut rules.capture, "Pair capture");
            ui.checkbox(&mut rules.capture_win, "Win by 10 captures");
            ui.checkbox(&mut rules.slow_mode, "Slow engine");

            ui.add_space(6.0);
            ui.label(RichText::new("DISPLAY").size(10.0).color(TEXT_MUTED));
            let tips = ui.checkbox(&mut self.state.rules.show_tips, "Show tip").changed();
            let priority = ui
                .checkbox(&mut self.state.rules.show_priority, "Show priority")
                .changed();
            if tips || priority {
                self.state.sync_display();
            }

            ui.add_space(6.0);
            if ui.button("Restart").clicked() {
                self.state.restart();
            }
        });
    }

    fn render_game_over_card(&mut self, ui: &mut egui::Ui, text: &str) {
        Frame::new()
            .fill(egui::Color32::from_rgb(45, 80, 55))
            .corner_radius(CornerRadius::same(8))
            .inner_margin(16.0)
            .show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new("GAME OVER").size(12.0).color(egui::Color32::from_rgb(180, 255, 180)));
                    ui.add_space(8.0);
                    ui.label(RichText::new(text).size(16.0).strong().color(TEXT_PRIMARY));
                    ui.add_space(12.0);
                    if ui.button("New Game").clicked() {
                        self.state.restart();
                    }
                });
            });
    }

    fn render_message_card(ui: &mut egui::Ui, msg: &str) {
        Frame::new()
            .fill(egui::Color32::from_rgb(80, 60, 30))
            .corner_radius(CornerRadius::same(8))
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.label(RichText::new(msg).size(11.0).color(TEXT_PRIMARY));
            });
    }

    /// Render the main board
    fn render_board(&mut self, ctx: &Context) {
        CentralPanel::default().show(ctx, |ui| {
            ui.style_mut().visuals.panel_fill = egui::Color32::from_rgb(40, 42, 46);

            let tip = self.state.tip();
            let accept_input = self.state.is_human_turn();
            let clicked = self.board_view.show(ui, &self.state.game, tip, accept_input);

            if let Some(pos) = clicked {
                if let Err(msg) = self.state.try_place_stone(pos) {
                    self.state.message = Some(msg);
                }
            }
        });
    }

    /// Handle keyboard shortcuts
    fn handle_input(&mut self, ctx: &Context) {
        let (toggle_debug, restart) =
            ctx.input(|i| (i.key_pressed(egui::Key::D), i.key_pressed(egui::Key::N)));

        if toggle_debug {
            self.show_debug = !self.show_debug;
        }
        if restart {
            self.state.restart();
        }
    }
}

impl eframe::App for GomokuApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.handle_input(ctx);

        self.state.check_ai_result();

        if self.state.is_ai_turn() && !self.state.is_ai_thinking() {
            self.state.start_ai_thinking();
        }

        self.render_menu_bar(ctx);
        self.render_side_panel(ctx);
        self.render_board(ctx);

        // Keep polling the search and the move timer
        if self.state.is_ai_thinking() || !self.state.game.is_over() {
            ctx.request_repaint_after(std::time::Duration::from_millis(50));
        }
    }
}
