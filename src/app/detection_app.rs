use std::path::Path;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::app::views::landing_view::{LandingView, DISCLAIMER};
use crate::app::views::results_panel::ResultsPanel;
use crate::app::views::upload_view::UploadView;
use crate::app::views::{UiAction, View};
use crate::config::Settings;
use crate::detection::create_detection_client;
use crate::error::AppError;
use crate::intake::{DisplayRegistry, ImageFile, ImagePicker};
use crate::render::ResultsRenderer;
use crate::session::{AnalysisSession, SessionState};

const TITLE: &str = "Lung Cancer Detection";
const MAX_LOGGED_ERRORS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Landing,
    Detection,
}

pub struct DetectionApp {
    session: AnalysisSession,
    state_rx: watch::Receiver<SessionState>,
    page: Page,
    path_input: String,
    max_upload_bytes: usize,
    errors: Vec<AppError>,
}

impl DetectionApp {
    pub fn new(session: AnalysisSession, max_upload_bytes: usize) -> Self {
        let state_rx = session.subscribe();
        Self {
            session,
            state_rx,
            page: Page::Landing,
            path_input: String::new(),
            max_upload_bytes,
            errors: Vec::new(),
        }
    }

    pub fn start_gui(settings: &Settings) -> Result<(), AppError> {
        let client = create_detection_client(&settings.detection)?;
        let picker = ImagePicker::new(settings.upload_limits(), DisplayRegistry::new());
        let session = AnalysisSession::new(picker, client, settings.detect_config());
        let max_upload_bytes = settings.upload.max_bytes;

        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size(egui::vec2(1280.0, 800.0))
                .with_title(TITLE),
            ..Default::default()
        };

        info!("Starting {} front-end", TITLE);
        eframe::run_native(
            TITLE,
            options,
            Box::new(move |cc| {
                egui_extras::install_image_loaders(&cc.egui_ctx);
                Ok(Box::new(DetectionApp::new(session, max_upload_bytes)))
            }),
        )
        .map_err(|e| AppError::Ui(e.to_string()))
    }

    fn apply(&mut self, ctx: &egui::Context, action: UiAction) {
        match action {
            UiAction::LoadPath(path) => match ImageFile::from_path(Path::new(&path)) {
                Ok(file) => self.submit(file),
                Err(e) => self.record(e.into()),
            },
            UiAction::Submit(file) => self.submit(file),
            UiAction::Clear => self.session.clear_image(),
            UiAction::Analyze => self.analyze(ctx),
            UiAction::ShowLanding => self.page = Page::Landing,
            UiAction::ShowDetection => self.page = Page::Detection,
        }
    }

    fn submit(&mut self, file: ImageFile) {
        match self.session.set_image(file) {
            Ok(()) => self.path_input.clear(),
            Err(e) => self.record(e.into()),
        }
    }

    fn analyze(&self, ctx: &egui::Context) {
        let session = self.session.clone();
        let ctx = ctx.clone();
        tokio::spawn(async move {
            match session.analyze().await {
                Ok(outcome) => debug!("Analyze finished: {:?}", outcome),
                Err(e) => warn!("Analyze rejected: {}", e),
            }
            ctx.request_repaint();
        });
    }

    fn record(&mut self, error: AppError) {
        error!("{}", error);
        self.errors.push(error);
        if self.errors.len() > MAX_LOGGED_ERRORS {
            self.errors.remove(0);
        }
    }

    // Dropped files: only the first one is taken.
    fn collect_dropped_files(&self, ctx: &egui::Context, actions: &mut Vec<UiAction>) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let Some(file) = dropped.into_iter().next() else {
            return;
        };
        if self.state_rx.borrow().is_processing() {
            debug!("Ignoring dropped file while processing");
            return;
        }
        if let Some(bytes) = file.bytes {
            actions.push(UiAction::Submit(ImageFile::from_bytes(
                file.name, &file.mime, bytes,
            )));
        } else if let Some(path) = file.path {
            actions.push(UiAction::LoadPath(path.display().to_string()));
        }
    }

    fn evict_revoked_images(&self, ctx: &egui::Context) {
        for uri in self.session.picker().registry().drain_revoked() {
            ctx.forget_image(&uri);
        }
    }
}

impl eframe::App for DetectionApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.evict_revoked_images(ctx);
        let state = self.state_rx.borrow_and_update().clone();
        let mut actions = Vec::new();
        if self.page == Page::Detection {
            self.collect_dropped_files(ctx, &mut actions);
        }

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(TITLE);
                ui.weak("AI-Powered Medical Image Analysis System");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .selectable_label(self.page == Page::Detection, "Detection")
                        .clicked()
                    {
                        actions.push(UiAction::ShowDetection);
                    }
                    if ui
                        .selectable_label(self.page == Page::Landing, "Home")
                        .clicked()
                    {
                        actions.push(UiAction::ShowLanding);
                    }
                });
            });
        });

        egui::TopBottomPanel::bottom("error_panel")
            .resizable(true)
            .show(ctx, |ui| {
                ui.weak(DISCLAIMER);
                if !self.errors.is_empty() {
                    ui.separator();
                    egui::ScrollArea::vertical().max_height(80.0).show(ui, |ui| {
                        for error in self.errors.iter().rev() {
                            ui.label(format!("[ERROR] {}", error));
                        }
                    });
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| match self.page {
            Page::Landing => LandingView::new(&mut actions).draw(ui),
            Page::Detection => {
                ui.columns(2, |columns| {
                    UploadView::new(
                        &state,
                        &mut self.path_input,
                        self.max_upload_bytes,
                        &mut actions,
                    )
                    .draw(&mut columns[0]);
                    ResultsPanel::new(ResultsRenderer::render_state(&state)).draw(&mut columns[1]);
                });
            }
        });

        for action in actions {
            self.apply(ctx, action);
        }

        if state.is_processing() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
