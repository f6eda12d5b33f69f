use std::io::Cursor;

use image::{DynamicImage, ImageFormat, RgbImage};

use crate::intake::{DisplayRegistry, ImageFile, ImageHandle, ImagePicker, UploadLimits};

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = DynamicImage::ImageRgb8(RgbImage::new(width, height));
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

pub fn png_file(name: &str, width: u32, height: u32) -> ImageFile {
    ImageFile::new(name, "image/png", png_bytes(width, height))
}

pub fn submit_png() -> (ImagePicker, ImageHandle) {
    let picker = ImagePicker::new(UploadLimits::default(), DisplayRegistry::new());
    let handle = picker.submit(png_file("scan.png", 16, 16)).unwrap();
    (picker, handle)
}
