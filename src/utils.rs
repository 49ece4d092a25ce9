use indicatif::{ProgressBar, ProgressStyle};
use log::error;
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::Path;

use crate::types::FrameAnnotation;

/// Check for the JPEG magic bytes without decoding the image
pub fn is_jpeg(image_bytes: &[u8]) -> bool {
    image_bytes.starts_with(&[0xFF, 0xD8, 0xFF])
}

/// Hex-encoded SHA-256 digest of the raw image bytes
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Read and parse a single XML file into a FrameAnnotation struct
pub fn read_and_parse_annotation(path: &Path) -> io::Result<FrameAnnotation> {
    let xml = fs::read_to_string(path).map_err(|e| {
        error!("Failed to read XML file ({}): {:?}", path.display(), e);
        e
    })?;

    quick_xml::de::from_str(&xml).map_err(|e| {
        error!("Failed to parse XML ({}): {:?}", path.display(), e);
        io::Error::new(io::ErrorKind::InvalidData, e)
    })
}

/// Create a progress bar with the given length and label
pub fn create_progress_bar(len: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} [{}] [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} ({{eta}})",
                label
            ))
            .expect("progress bar template is valid")
            .progress_chars("#>-"),
    );
    pb
}
