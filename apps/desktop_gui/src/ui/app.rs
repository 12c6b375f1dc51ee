use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::{ConfirmChoice, INPUT_PLACEHOLDER};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::UiEvent,
    orchestration::dispatch_backend_command,
    reducer::{reduce, NicknameView},
};

const INPUT_WIDTH: f32 = 300.0;

pub struct NicknameApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    view: NicknameView,
    input_id: egui::Id,
}

impl NicknameApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            view: NicknameView::default(),
            input_id: egui::Id::new("nickname_input"),
        };
        app.send(BackendCommand::Load);
        app
    }

    fn send(&mut self, cmd: BackendCommand) {
        match dispatch_backend_command(&self.cmd_tx, cmd) {
            Ok(()) => self.view.mark_pending(),
            Err(err) => {
                tracing::warn!("{}", err.message());
                self.view.dispatch_failed(err);
            }
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            reduce(&mut self.view, event);
        }
    }

    fn show_main_screen(&mut self, ctx: &egui::Context) {
        let enabled = self.view.can_submit();
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(ui.available_height() / 3.0);
            ui.vertical_centered(|ui| {
                ui.heading(self.view.heading().to_string());
                ui.add_space(30.0);

                ui.add_enabled_ui(enabled, |ui| {
                    let response = ui.add(
                        egui::TextEdit::singleline(&mut self.view.input)
                            .id(self.input_id)
                            .hint_text(INPUT_PLACEHOLDER)
                            .desired_width(INPUT_WIDTH),
                    );
                    if response.changed() {
                        self.view.sync_input();
                    }
                    ui.add_space(30.0);

                    ui.horizontal(|ui| {
                        ui.add_space((ui.available_width() - 120.0).max(0.0) / 2.0);
                        if ui.button("Save").clicked() {
                            let cmd = self.view.save_command();
                            self.send(cmd);
                        }
                        if ui.button("Delete").clicked() {
                            self.send(BackendCommand::Remove);
                        }
                    });
                });

                if let Some(status) = self.view.status() {
                    ui.add_space(12.0);
                    let color = ui.visuals().warn_fg_color;
                    ui.colored_label(color, status);
                }
            });
        });
    }

    fn show_confirmation_dialog(&mut self, ctx: &egui::Context) {
        let Some(prompt) = self.view.prompt().cloned() else {
            return;
        };

        let mut chosen: Option<ConfirmChoice> = None;
        egui::Window::new(prompt.title.clone())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(prompt.message.clone());
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    for choice in prompt.choices {
                        if ui.button(choice.label()).clicked() {
                            chosen = Some(choice);
                        }
                    }
                });
            });

        if let Some(choice) = chosen {
            self.view.resolve_prompt(choice);
        }
    }
}

impl eframe::App for NicknameApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        if self.view.take_focus_dismissal() {
            ctx.memory_mut(|mem| mem.surrender_focus(self.input_id));
        }

        self.show_main_screen(ctx);
        self.show_confirmation_dialog(ctx);

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}
