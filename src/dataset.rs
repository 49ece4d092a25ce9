use log::{error, info, warn};
use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::Args;
use crate::features::build_sequence_example;
use crate::io::{list_frame_annotations, load_examples_list, DatasetLayout};
use crate::tfrecord::RecordWriter;
use crate::types::{FrameAnnotation, ProcessingStats};
use crate::utils::{create_progress_bar, read_and_parse_annotation};

/// Decimal width shard indices are zero-padded to
pub fn shard_digits(num_shards: usize) -> usize {
    num_shards.saturating_sub(1).max(1).to_string().len()
}

/// Output filename for one shard
pub fn shard_filename(output_path: &Path, index: usize, num_shards: usize) -> PathBuf {
    output_path.join(format!(
        "VID_2015-{:0width$}.tfrecord",
        index,
        width = shard_digits(num_shards)
    ))
}

/// Contiguous example ranges covering the whole list, one per shard.
///
/// Uses ceil division, so earlier shards are at most one example larger and
/// trailing shards may be empty when there are more shards than examples.
pub fn shard_ranges(num_examples: usize, num_shards: usize) -> Vec<(usize, usize)> {
    let per_shard = num_examples.div_ceil(num_shards).max(1);
    (0..num_shards)
        .map(|i| {
            let start = (i * per_shard).min(num_examples);
            let end = ((i + 1) * per_shard).min(num_examples);
            (start, end)
        })
        .collect()
}

/// Main conversion pipeline: load the example list, then generate every
/// shard in the configured range
pub fn process_dataset(args: &Args) -> Result<ProcessingStats, Box<dyn std::error::Error>> {
    let layout = DatasetLayout::new(&args.data_dir, args.set);

    info!("Reading from VID 2015 dataset ({})", args.data_dir);
    let examples = load_examples_list(&layout, args.num_examples)?;
    info!("Found {} examples.", examples.len());

    let output_path = PathBuf::from(&args.output_path);
    fs::create_dir_all(&output_path)?;

    let ranges = shard_ranges(examples.len(), args.num_shards);
    let mut stats = ProcessingStats::new();

    for (index, &(start, end)) in ranges.iter().enumerate().skip(args.start_shard) {
        let out_filename = shard_filename(&output_path, index, args.num_shards);
        // Don't recreate shards when restarting an interrupted run
        if out_filename.exists() {
            info!(
                "Shard {} already exists, skipping: {}",
                index,
                out_filename.display()
            );
            stats.increment_shards_already_present();
            continue;
        }

        info!(
            "Shard {}/{} [{}..{}] -> {}",
            index,
            args.num_shards,
            start,
            end,
            out_filename.display()
        );
        gen_shard(
            &examples[start..end],
            &layout,
            &out_filename,
            index,
            args.num_shards,
            &mut stats,
        )?;
    }

    stats.print_summary();
    Ok(stats)
}

/// Write one shard file from its slice of the example list.
///
/// Failures of a single example are logged and counted; the shard keeps
/// going. Only I/O failures on the shard file itself abort the run.
pub fn gen_shard(
    examples: &[String],
    layout: &DatasetLayout,
    out_filename: &Path,
    index: usize,
    num_shards: usize,
    stats: &mut ProcessingStats,
) -> io::Result<()> {
    let pb = create_progress_bar(
        examples.len() as u64,
        &format!("Shard {}/{}", index, num_shards),
    );
    let mut writer = RecordWriter::create(out_filename)?;

    for example in examples {
        match convert_example(example, layout) {
            Ok(Some((sequence_example, frame_count))) => {
                writer.write_message(&sequence_example)?;
                stats.increment_videos();
                stats.add_frames(frame_count);
            }
            Ok(None) => {
                warn!("No XML annotations found for example: {}", example);
                stats.increment_skipped_no_annotations();
            }
            Err(e) => {
                error!("Failed to convert example {}: {}", example, e);
                stats.increment_failed();
            }
        }
        pb.inc(1);
    }

    writer.flush()?;
    pb.finish_with_message(format!("Shard {} complete", index));
    Ok(())
}

/// Parse one example's frames and assemble its record.
///
/// Returns Ok(None) when the example has no XML annotations at all.
fn convert_example(
    example: &str,
    layout: &DatasetLayout,
) -> io::Result<Option<(crate::protos::SequenceExample, usize)>> {
    let xml_files = list_frame_annotations(layout, example)?;
    if xml_files.is_empty() {
        return Ok(None);
    }

    // Order-preserving parallel parse of the per-frame XML files
    let frames: Vec<FrameAnnotation> = xml_files
        .par_iter()
        .map(|xml_file| read_and_parse_annotation(xml_file))
        .collect::<io::Result<_>>()?;

    let sequence_example = build_sequence_example(layout, &frames)?;
    Ok(Some((sequence_example, frames.len())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shard_digits() {
        assert_eq!(shard_digits(1), 1);
        assert_eq!(shard_digits(2), 1);
        assert_eq!(shard_digits(10), 1);
        assert_eq!(shard_digits(11), 2);
        assert_eq!(shard_digits(100), 2);
        assert_eq!(shard_digits(101), 3);
    }

    #[test]
    fn test_shard_filename_padding() {
        let path = shard_filename(Path::new("/out"), 3, 128);
        assert_eq!(path, PathBuf::from("/out/VID_2015-003.tfrecord"));

        let path = shard_filename(Path::new("/out"), 3, 10);
        assert_eq!(path, PathBuf::from("/out/VID_2015-3.tfrecord"));
    }

    #[test]
    fn test_shard_ranges_cover_all_examples() {
        let ranges = shard_ranges(10, 3);
        assert_eq!(ranges, vec![(0, 4), (4, 8), (8, 10)]);

        let total: usize = ranges.iter().map(|(s, e)| e - s).sum();
        assert_eq!(total, 10);
    }

    #[test]
    fn test_shard_ranges_more_shards_than_examples() {
        let ranges = shard_ranges(2, 4);
        assert_eq!(ranges, vec![(0, 1), (1, 2), (2, 2), (2, 2)]);
    }

    #[test]
    fn test_shard_ranges_empty_list() {
        let ranges = shard_ranges(0, 3);
        assert_eq!(ranges, vec![(0, 0), (0, 0), (0, 0)]);
    }
}
