use egui::Color32;

use crate::render::Tone;
use crate::session::SessionStatus;

pub const PRIMARY: Color32 = Color32::from_rgb(37, 99, 235);

pub fn tone_color(tone: Tone) -> Color32 {
    match tone {
        Tone::Destructive => Color32::from_rgb(220, 38, 38),
        Tone::Warning => Color32::from_rgb(217, 119, 6),
        Tone::Success => Color32::from_rgb(22, 163, 74),
    }
}

pub fn status_color(status: SessionStatus) -> Color32 {
    match status {
        SessionStatus::Idle | SessionStatus::Ready => Color32::GRAY,
        SessionStatus::Processing => PRIMARY,
        SessionStatus::Completed => tone_color(Tone::Success),
        SessionStatus::Failed => tone_color(Tone::Destructive),
    }
}
