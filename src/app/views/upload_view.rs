use egui::load::Bytes;

use crate::app::views::{palette, UiAction, View};
use crate::render::Tone;
use crate::session::SessionState;

const PREVIEW_HEIGHT: f32 = 240.0;
const KIB: usize = 1024;
const MIB: usize = 1024 * KIB;

// Upload limit as shown next to the picker.
fn size_label(bytes: usize) -> String {
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else if bytes >= MIB {
        format!("{:.1}MB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{}KB", bytes / KIB)
    } else {
        format!("{}B", bytes)
    }
}

/// Image selection, preview and the analyze trigger.
pub struct UploadView<'a> {
    state: &'a SessionState,
    path_input: &'a mut String,
    max_upload_bytes: usize,
    actions: &'a mut Vec<UiAction>,
}

impl<'a> UploadView<'a> {
    pub fn new(
        state: &'a SessionState,
        path_input: &'a mut String,
        max_upload_bytes: usize,
        actions: &'a mut Vec<UiAction>,
    ) -> Self {
        Self {
            state,
            path_input,
            max_upload_bytes,
            actions,
        }
    }

    fn draw_picker(&mut self, ui: &mut egui::Ui) {
        let processing = self.state.is_processing();
        let limit = size_label(self.max_upload_bytes);
        ui.group(|ui| {
            ui.vertical_centered(|ui| {
                ui.label("Drop your image here or enter its path");
                ui.small(format!("Supports: JPEG, PNG, WebP (Max {})", limit));
            });
            ui.horizontal(|ui| {
                ui.add_enabled(
                    !processing,
                    egui::TextEdit::singleline(&mut *self.path_input).hint_text("/path/to/scan.png"),
                );
                let load = ui.add_enabled(
                    !processing && !self.path_input.trim().is_empty(),
                    egui::Button::new("Load"),
                );
                if load.clicked() {
                    self.actions
                        .push(UiAction::LoadPath(self.path_input.trim().to_string()));
                }
            });
        });
    }

    fn draw_preview(&mut self, ui: &mut egui::Ui) {
        let state = self.state;
        let Some(image) = &state.image else {
            return;
        };
        let processing = state.is_processing();
        ui.group(|ui| {
            ui.add(
                egui::Image::from_bytes(
                    image.display_uri().to_string(),
                    Bytes::Shared(image.bytes().clone()),
                )
                .max_height(PREVIEW_HEIGHT)
                .maintain_aspect_ratio(true),
            );
            ui.horizontal(|ui| {
                ui.colored_label(
                    palette::tone_color(Tone::Success),
                    "Image uploaded successfully",
                );
                if let Some((width, height)) = image.dimensions() {
                    ui.weak(format!("{} ({}x{})", image.name(), width, height));
                } else {
                    ui.weak(image.name());
                }
                if ui.add_enabled(!processing, egui::Button::new("Clear")).clicked() {
                    self.actions.push(UiAction::Clear);
                }
            });
        });
    }

    fn draw_status(&self, ui: &mut egui::Ui) {
        let status = self.state.status;
        ui.group(|ui| {
            ui.horizontal(|ui| {
                ui.strong("Status:");
                ui.colored_label(palette::status_color(status), status.badge());
            });
            ui.weak("• Object-detection model trained on medical imaging data");
            ui.weak("• Findings ranked High, Medium or Low risk by confidence");
        });
    }
}

impl View for UploadView<'_> {
    fn draw(&mut self, ui: &mut egui::Ui) {
        ui.heading("Upload Medical Image");
        ui.label("Upload chest X-ray or CT scan for lung cancer detection");
        ui.add_space(8.0);

        if self.state.image.is_none() {
            self.draw_picker(ui);
        } else {
            self.draw_preview(ui);
        }

        if let Some(error) = &self.state.error {
            ui.colored_label(palette::tone_color(Tone::Destructive), error.user_message());
        }

        if self.state.image.is_some() {
            ui.add_space(8.0);
            if !self.state.is_processing() {
                ui.vertical_centered(|ui| {
                    let analyze = ui.add_enabled(
                        self.state.status.can_analyze(),
                        egui::Button::new("Analyze for Lung Cancer"),
                    );
                    if analyze.clicked() {
                        self.actions.push(UiAction::Analyze);
                    }
                });
            }
            self.draw_status(ui);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_label_units() {
        assert_eq!(size_label(10 * MIB), "10MB");
        assert_eq!(size_label(MIB + MIB / 2), "1.5MB");
        assert_eq!(size_label(512 * KIB), "512KB");
        assert_eq!(size_label(300), "300B");
    }
}
