pub mod landing_view;
pub mod palette;
pub mod results_panel;
pub mod upload_view;

use crate::intake::ImageFile;

pub trait View {
    fn draw(&mut self, ui: &mut egui::Ui);
}

/// User intent collected while drawing, applied by the app after the frame.
#[derive(Debug)]
pub enum UiAction {
    LoadPath(String),
    Submit(ImageFile),
    Clear,
    Analyze,
    ShowLanding,
    ShowDetection,
}
