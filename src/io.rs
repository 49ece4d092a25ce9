use glob::glob;
use log::{info, warn};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::config::Set;

/// Directory layout of a raw VID 2015 dataset for one split.
///
/// The split's example list files live in `ImageSets/VID/`, the per-frame
/// XML annotations under `Annotations/VID/<set>/<example>/`, and the JPEG
/// frames under `Data/VID/<set>/<folder>/`.
pub struct DatasetLayout {
    data_dir: PathBuf,
    set: Set,
}

impl DatasetLayout {
    pub fn new(data_dir: impl Into<PathBuf>, set: Set) -> Self {
        Self {
            data_dir: data_dir.into(),
            set,
        }
    }

    /// Glob pattern matching the split's example list files
    pub fn list_file_pattern(&self) -> String {
        format!(
            "{}/ImageSets/VID/{}*.txt",
            self.data_dir.display(),
            self.set.as_str()
        )
    }

    /// Directory holding one example's per-frame XML annotations
    pub fn annotations_dir(&self, example: &str) -> PathBuf {
        self.data_dir
            .join("Annotations/VID")
            .join(self.set.as_str())
            .join(example)
    }

    /// Directory holding a video's JPEG frames, from its annotated folder
    pub fn images_dir(&self, folder: &str) -> PathBuf {
        self.data_dir
            .join("Data/VID")
            .join(self.set.as_str())
            .join(folder)
    }

    /// Full path of one frame's JPEG image
    pub fn image_path(&self, folder: &str, filename: &str) -> PathBuf {
        self.images_dir(folder).join(format!("{}.JPEG", filename))
    }
}

/// Read example identifiers from one list file.
///
/// Each line carries the identifier as its first whitespace-separated token;
/// the remainder (a running index in the stock VID lists) is ignored.
pub fn read_examples_list(path: &Path) -> io::Result<Vec<String>> {
    let reader = BufReader::new(File::open(path)?);
    let mut examples = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if let Some(example) = line.split_whitespace().next() {
            examples.push(example.to_string());
        }
    }
    Ok(examples)
}

/// Collect the example identifiers for a split, optionally truncated.
///
/// List files are globbed and visited in sorted order so the resulting
/// example order (and therefore the shard assignment) is stable across runs.
pub fn load_examples_list(
    layout: &DatasetLayout,
    num_examples: Option<usize>,
) -> io::Result<Vec<String>> {
    let pattern = layout.list_file_pattern();
    let list_files: Vec<PathBuf> = glob(&pattern)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?
        .filter_map(|entry| entry.ok())
        .collect();

    if list_files.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("no example list files match {}", pattern),
        ));
    }

    let mut examples = Vec::new();
    for list_file in &list_files {
        info!("Reading example list: {}", list_file.display());
        examples.extend(read_examples_list(list_file)?);
    }

    if let Some(limit) = num_examples {
        if limit < examples.len() {
            warn!(
                "Truncating example list from {} to {} entries",
                examples.len(),
                limit
            );
            examples.truncate(limit);
        }
    }

    Ok(examples)
}

/// List one example's frame XML files in frame order
pub fn list_frame_annotations(layout: &DatasetLayout, example: &str) -> io::Result<Vec<PathBuf>> {
    let pattern = format!("{}/*.xml", layout.annotations_dir(example).display());
    let mut xml_files: Vec<PathBuf> = glob(&pattern)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?
        .filter_map(|entry| entry.ok())
        .collect();
    // glob yields sorted paths already; keep the ordering explicit anyway
    xml_files.sort();
    Ok(xml_files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_layout_paths() {
        let layout = DatasetLayout::new("/data/ILSVRC", Set::Val);
        assert_eq!(
            layout.list_file_pattern(),
            "/data/ILSVRC/ImageSets/VID/val*.txt"
        );
        assert_eq!(
            layout.annotations_dir("vid_a/seq_0001"),
            PathBuf::from("/data/ILSVRC/Annotations/VID/val/vid_a/seq_0001")
        );
        assert_eq!(
            layout.image_path("vid_a/seq_0001", "000008"),
            PathBuf::from("/data/ILSVRC/Data/VID/val/vid_a/seq_0001/000008.JPEG")
        );
    }

    #[test]
    fn test_read_examples_list() {
        let temp_dir = tempfile::tempdir().unwrap();
        let list_path = temp_dir.path().join("train_1.txt");
        let mut file = File::create(&list_path).unwrap();
        writeln!(file, "vid_a/seq_0001 1").unwrap();
        writeln!(file, "vid_a/seq_0002 2").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "vid_b/seq_0001 3").unwrap();
        drop(file);

        let examples = read_examples_list(&list_path).unwrap();
        assert_eq!(
            examples,
            vec!["vid_a/seq_0001", "vid_a/seq_0002", "vid_b/seq_0001"]
        );
    }

    #[test]
    fn test_load_examples_list_truncates() {
        let temp_dir = tempfile::tempdir().unwrap();
        let sets_dir = temp_dir.path().join("ImageSets/VID");
        std::fs::create_dir_all(&sets_dir).unwrap();
        std::fs::write(sets_dir.join("train_1.txt"), "a 1\nb 2\n").unwrap();
        std::fs::write(sets_dir.join("train_2.txt"), "c 1\nd 2\n").unwrap();

        let layout = DatasetLayout::new(temp_dir.path(), Set::Train);
        let examples = load_examples_list(&layout, Some(3)).unwrap();
        assert_eq!(examples, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_load_examples_list_missing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let layout = DatasetLayout::new(temp_dir.path(), Set::Train);
        let err = load_examples_list(&layout, None).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
