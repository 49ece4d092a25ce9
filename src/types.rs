use serde::Deserialize;

// The bounding box of a single annotated object, in pixel coordinates
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BndBox {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

// A single annotated object within one frame
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ObjectAnnotation {
    #[serde(default)]
    pub trackid: i64,
    pub name: String,
    pub bndbox: BndBox,
    #[serde(default)]
    pub occluded: i64,
    #[serde(default)]
    pub generated: i64,
}

// The <source> element of a frame annotation
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Source {
    pub database: String,
}

// The <size> element of a frame annotation
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

/// One frame's Pascal-VOC style XML annotation.
///
/// `folder` is the video directory relative to `Data/VID/<set>/` and is
/// identical for every frame of a video; `filename` is the frame's image
/// stem without the `.JPEG` extension.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct FrameAnnotation {
    pub folder: String,
    pub filename: String,
    pub source: Source,
    pub size: FrameSize,
    #[serde(rename = "object", default)]
    pub objects: Vec<ObjectAnnotation>,
}

// Struct to hold processing statistics across all generated shards
#[derive(Debug, Default, Clone)]
pub struct ProcessingStats {
    pub videos_written: usize,
    pub frames_written: usize,
    pub skipped_no_annotations: usize,
    pub failed_examples: usize,
    pub shards_already_present: usize,
}

impl ProcessingStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_videos(&mut self) {
        self.videos_written += 1;
    }

    pub fn add_frames(&mut self, count: usize) {
        self.frames_written += count;
    }

    pub fn increment_skipped_no_annotations(&mut self) {
        self.skipped_no_annotations += 1;
    }

    pub fn increment_failed(&mut self) {
        self.failed_examples += 1;
    }

    pub fn increment_shards_already_present(&mut self) {
        self.shards_already_present += 1;
    }

    pub fn print_summary(&self) {
        log::info!("=== Conversion Summary ===");
        log::info!("Videos written: {}", self.videos_written);
        log::info!("Frames written: {}", self.frames_written);
        log::info!(
            "Skipped (no XML annotations): {}",
            self.skipped_no_annotations
        );
        log::info!("Failed examples: {}", self.failed_examples);
        if self.shards_already_present > 0 {
            log::info!(
                "Shards already present (left untouched): {}",
                self.shards_already_present
            );
        }

        let total_skipped = self.skipped_no_annotations + self.failed_examples;
        if total_skipped > 0 {
            log::warn!(
                "Total examples not converted: {} (no annotations: {}, failed: {})",
                total_skipped,
                self.skipped_no_annotations,
                self.failed_examples
            );
        }
    }
}
