use lungscan_rust::app::DetectionApp;
use lungscan_rust::config::Settings;
use lungscan_rust::AppError;
use tracing::Level;

fn init_logging(level: &str) {
    let level = level.parse::<Level>().unwrap_or(Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let settings = Settings::load()?;
    init_logging(&settings.log_level);
    DetectionApp::start_gui(&settings)
}
