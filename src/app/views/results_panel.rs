use std::time::Duration;

use egui::RichText;

use crate::app::views::{palette, View};
use crate::render::{DetectionRow, ResultsView, RiskLevel, Tone};

pub struct ResultsPanel {
    view: ResultsView,
}

impl ResultsPanel {
    pub fn new(view: ResultsView) -> Self {
        Self { view }
    }

    fn draw_processing(ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.horizontal(|ui| {
                ui.add(egui::Spinner::new());
                ui.strong(ResultsView::PROCESSING_TITLE);
            });
            ui.weak("The detection model is processing your medical image");
        });
    }

    fn draw_summary(ui: &mut egui::Ui, overall: Option<RiskLevel>, elapsed: Duration) {
        ui.group(|ui| {
            ui.heading("AI Detection Results");
            if let Some(risk) = overall {
                ui.horizontal(|ui| {
                    ui.label("Risk Assessment:");
                    ui.label(
                        RichText::new(risk.badge())
                            .strong()
                            .color(palette::tone_color(risk.tone())),
                    );
                });
            }
            ui.weak(format!("Processing time: {}ms", elapsed.as_millis()));
        });
    }

    fn draw_row(ui: &mut egui::Ui, row: &DetectionRow) {
        let color = palette::tone_color(row.risk.tone());
        ui.group(|ui| {
            ui.horizontal(|ui| {
                ui.strong(&row.label);
                ui.label(format!("Confidence: {}", row.confidence_percent()));
                ui.label(RichText::new(row.risk.label()).color(color));
            });
            if let Some(bbox) = &row.bounding_box {
                ui.weak(format!(
                    "Location: ({:.0}, {:.0}), {:.0}x{:.0}px",
                    bbox.x, bbox.y, bbox.width, bbox.height
                ));
            }
        });
    }
}

impl View for ResultsPanel {
    fn draw(&mut self, ui: &mut egui::Ui) {
        match &self.view {
            ResultsView::Processing => Self::draw_processing(ui),
            ResultsView::AwaitingImage => {
                ui.group(|ui| {
                    ui.vertical_centered(|ui| {
                        ui.weak(ResultsView::AWAITING_MESSAGE);
                    });
                });
            }
            ResultsView::NoAnomalies { elapsed } => {
                Self::draw_summary(ui, None, *elapsed);
                ui.group(|ui| {
                    ui.heading("Detected Anomalies");
                    ui.vertical_centered(|ui| {
                        ui.label(
                            RichText::new(ResultsView::NO_ANOMALIES_TITLE)
                                .strong()
                                .color(palette::tone_color(Tone::Success)),
                        );
                        ui.weak(ResultsView::NO_ANOMALIES_DETAIL);
                    });
                });
            }
            ResultsView::Findings {
                overall,
                elapsed,
                rows,
            } => {
                Self::draw_summary(ui, Some(*overall), *elapsed);
                ui.group(|ui| {
                    ui.heading("Detected Anomalies");
                    for row in rows {
                        Self::draw_row(ui, row);
                    }
                });
            }
        }
    }
}
