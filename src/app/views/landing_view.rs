use crate::app::views::{palette, UiAction, View};

pub const DISCLAIMER: &str = "This is a demonstration system for academic purposes. \
Always consult with qualified medical professionals for diagnosis and treatment decisions.";

const FEATURES: [(&str, &str); 3] = [
    (
        "Fast Analysis",
        "Results in seconds from a single chest X-ray or CT slice.",
    ),
    (
        "Medical Imaging Model",
        "An object-detection model fine-tuned on lung imaging data.",
    ),
    (
        "Private by Default",
        "Images stay on this machine until you choose to analyze them.",
    ),
];

pub struct LandingView<'a> {
    actions: &'a mut Vec<UiAction>,
}

impl<'a> LandingView<'a> {
    pub fn new(actions: &'a mut Vec<UiAction>) -> Self {
        Self { actions }
    }
}

impl View for LandingView<'_> {
    fn draw(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(24.0);
            ui.heading(egui::RichText::new("Lung Cancer Detection").size(32.0).color(palette::PRIMARY));
            ui.label(
                "Upload chest X-rays or CT scans for automated lung cancer screening. \
                 The detection model reports each finding with a confidence score and a risk level.",
            );
            ui.add_space(12.0);
            if ui.button("Try Demo").clicked() {
                self.actions.push(UiAction::ShowDetection);
            }
        });

        ui.add_space(24.0);
        ui.separator();
        ui.columns(FEATURES.len(), |columns| {
            for (column, (title, blurb)) in columns.iter_mut().zip(FEATURES) {
                column.group(|ui| {
                    ui.strong(title);
                    ui.label(blurb);
                });
            }
        });

        ui.add_space(24.0);
        ui.vertical_centered(|ui| {
            ui.weak(DISCLAIMER);
        });
    }
}
