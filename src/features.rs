//! Per-video SequenceExample assembly.
//!
//! Context features carry the per-video constants (folder, frame count,
//! frame size); feature lists carry one entry per frame, index-aligned
//! across every list.

use std::fs;
use std::io;

use crate::io::DatasetLayout;
use crate::protos::{
    bytes_feature, bytes_list_feature, float_list_feature, int64_feature, int64_list_feature,
    Feature, FeatureList, FeatureLists, Features, SequenceExample,
};
use crate::types::FrameAnnotation;
use crate::utils::{is_jpeg, sha256_hex};

/// Per-frame feature accumulators for one video
#[derive(Default)]
struct FrameLists {
    filenames: Vec<Feature>,
    encodeds: Vec<Feature>,
    sources: Vec<Feature>,
    keys: Vec<Feature>,
    formats: Vec<Feature>,
    xmins: Vec<Feature>,
    ymins: Vec<Feature>,
    xmaxs: Vec<Feature>,
    ymaxs: Vec<Feature>,
    names: Vec<Feature>,
    trackids: Vec<Feature>,
    occludeds: Vec<Feature>,
    generateds: Vec<Feature>,
}

/// Assemble one video's frames into a SequenceExample.
///
/// The first frame fixes the video's folder and frame size; any later frame
/// disagreeing with them, a missing JPEG, or a non-JPEG image is an error.
pub fn build_sequence_example(
    layout: &DatasetLayout,
    frames: &[FrameAnnotation],
) -> io::Result<SequenceExample> {
    let first = frames.first().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "video has no annotated frames")
    })?;
    let folder = first.folder.clone();
    let width = first.size.width;
    let height = first.size.height;

    let mut lists = FrameLists::default();
    for frame in frames {
        if frame.folder != folder {
            return Err(invalid(format!(
                "frame {} belongs to folder {} but the video is {}",
                frame.filename, frame.folder, folder
            )));
        }
        if frame.size.width != width || frame.size.height != height {
            return Err(invalid(format!(
                "frame {} is {}x{} but the video is {}x{}",
                frame.filename, frame.size.width, frame.size.height, width, height
            )));
        }

        let image_path = layout.image_path(&folder, &frame.filename);
        let encoded_jpg = fs::read(&image_path).map_err(|e| {
            io::Error::new(
                e.kind(),
                format!("failed to read {}: {}", image_path.display(), e),
            )
        })?;
        if !is_jpeg(&encoded_jpg) {
            return Err(invalid(format!(
                "image format not JPEG: {}",
                image_path.display()
            )));
        }
        let key = sha256_hex(&encoded_jpg);

        let mut xmin = Vec::with_capacity(frame.objects.len());
        let mut ymin = Vec::with_capacity(frame.objects.len());
        let mut xmax = Vec::with_capacity(frame.objects.len());
        let mut ymax = Vec::with_capacity(frame.objects.len());
        let mut name = Vec::with_capacity(frame.objects.len());
        let mut trackid = Vec::with_capacity(frame.objects.len());
        let mut occluded = Vec::with_capacity(frame.objects.len());
        let mut generated = Vec::with_capacity(frame.objects.len());
        for object in &frame.objects {
            xmin.push((object.bndbox.xmin / width as f64) as f32);
            ymin.push((object.bndbox.ymin / height as f64) as f32);
            xmax.push((object.bndbox.xmax / width as f64) as f32);
            ymax.push((object.bndbox.ymax / height as f64) as f32);
            name.push(object.name.clone().into_bytes());
            trackid.push(object.trackid);
            occluded.push(object.occluded);
            generated.push(object.generated);
        }

        lists.filenames.push(bytes_feature(frame.filename.clone()));
        lists.encodeds.push(bytes_feature(encoded_jpg));
        lists
            .sources
            .push(bytes_feature(frame.source.database.clone()));
        lists.keys.push(bytes_feature(key));
        lists.formats.push(bytes_feature("jpeg"));
        lists.xmins.push(float_list_feature(xmin));
        lists.ymins.push(float_list_feature(ymin));
        lists.xmaxs.push(float_list_feature(xmax));
        lists.ymaxs.push(float_list_feature(ymax));
        lists.names.push(bytes_list_feature(name));
        lists.trackids.push(int64_list_feature(trackid));
        lists.occludeds.push(int64_list_feature(occluded));
        lists.generateds.push(int64_list_feature(generated));
    }

    let mut context = Features::default();
    context
        .feature
        .insert("video/folder".to_string(), bytes_feature(folder));
    context.feature.insert(
        "video/frame_numbers".to_string(),
        int64_feature(frames.len() as i64),
    );
    context
        .feature
        .insert("video/height".to_string(), int64_feature(height as i64));
    context
        .feature
        .insert("video/width".to_string(), int64_feature(width as i64));

    let mut feature_lists = FeatureLists::default();
    let mut insert = |key: &str, feature: Vec<Feature>| {
        feature_lists
            .feature_list
            .insert(key.to_string(), FeatureList { feature });
    };
    insert("image/filename", lists.filenames);
    insert("image/encoded", lists.encodeds);
    insert("image/sources", lists.sources);
    insert("image/key/sha256", lists.keys);
    insert("image/format", lists.formats);
    insert("image/object/bbox/xmin", lists.xmins);
    insert("image/object/bbox/ymin", lists.ymins);
    insert("image/object/bbox/xmax", lists.xmaxs);
    insert("image/object/bbox/ymax", lists.ymaxs);
    insert("image/object/name", lists.names);
    insert("image/object/trackid", lists.trackids);
    insert("image/object/occluded", lists.occludeds);
    insert("image/object/generated", lists.generateds);

    Ok(SequenceExample {
        context: Some(context),
        feature_lists: Some(feature_lists),
    })
}

fn invalid(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message)
}
