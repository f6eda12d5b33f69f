mod display;
mod handle;
mod image_file;
mod picker;

pub use display::{DisplayLease, DisplayRegistry};
pub use handle::ImageHandle;
pub use image_file::ImageFile;
pub use picker::{ImagePicker, UploadLimits};
