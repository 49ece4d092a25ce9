//! VID 2015 to TFRecord converter
//!
//! This library converts the ImageNet VID 2015 video object detection
//! dataset (per-frame JPEG images plus Pascal-VOC style XML annotations)
//! into sharded TFRecord files, one SequenceExample record per video.

pub mod config;
pub mod dataset;
pub mod features;
pub mod io;
pub mod protos;
pub mod tfrecord;
pub mod types;
pub mod utils;

// Re-export commonly used types and functions
pub use config::{Args, Set};
pub use dataset::{gen_shard, process_dataset, shard_filename, shard_ranges};
pub use features::build_sequence_example;
pub use io::{load_examples_list, read_examples_list, DatasetLayout};
pub use protos::SequenceExample;
pub use tfrecord::{read_records, RecordWriter};
pub use types::{FrameAnnotation, ProcessingStats};
