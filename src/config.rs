use clap::{Parser, ValueEnum};
use std::str::FromStr;

/// Command-line arguments parser for converting VID 2015 to TFRecord shards.
#[derive(Parser, Debug, Clone)]
#[command(version, long_about = None)]
pub struct Args {
    /// Root directory of the raw VID 2015 dataset (the ILSVRC directory)
    #[arg(short = 'd', long = "data_dir")]
    pub data_dir: String,

    /// Dataset split to convert
    #[arg(long = "set", value_enum, default_value = "train")]
    pub set: Set,

    /// Directory the TFRecord shard files are written into
    #[arg(short = 'o', long = "output_path", default_value = "./data/VID2015")]
    pub output_path: String,

    /// Index of the first shard to generate
    #[arg(long = "start_shard", default_value_t = 0)]
    pub start_shard: usize,

    /// Total number of TFRecord shard files
    #[arg(long = "num_shards", default_value_t = 10, value_parser = validate_num_shards)]
    pub num_shards: usize,

    /// Limit on the number of videos to convert
    #[arg(long = "num_examples")]
    pub num_examples: Option<usize>,
}

impl Args {
    /// Cross-field validation that clap's per-argument parsers cannot express
    pub fn validate(&self) -> Result<(), String> {
        if self.start_shard >= self.num_shards {
            return Err(format!(
                "start_shard ({}) must be less than num_shards ({})",
                self.start_shard, self.num_shards
            ));
        }
        Ok(())
    }
}

// Enumeration for the dataset split
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum Set {
    Train,
    Val,
    Test,
}

impl Set {
    /// Directory component used under ImageSets/VID, Annotations/VID and Data/VID
    pub fn as_str(&self) -> &'static str {
        match self {
            Set::Train => "train",
            Set::Val => "val",
            Set::Test => "test",
        }
    }
}

// Validate that at least one shard is requested
fn validate_num_shards(s: &str) -> Result<usize, String> {
    match usize::from_str(s) {
        Ok(val) if val >= 1 => Ok(val),
        _ => Err("NUM_SHARDS must be a positive integer".to_string()),
    }
}
