pub mod detection_app;
pub mod views;

pub use detection_app::DetectionApp;
