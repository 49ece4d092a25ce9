//! TensorFlow `Example` message definitions and feature constructors.
//!
//! Hand-written prost messages matching the field numbering of
//! `tensorflow/core/example/feature.proto` and `example.proto`, so the
//! serialized records decode with any stock TFRecord reader. Only the
//! messages the SequenceExample schema needs are defined.

use std::collections::HashMap;

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BytesList {
    #[prost(bytes = "vec", repeated, tag = "1")]
    pub value: Vec<Vec<u8>>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FloatList {
    #[prost(float, repeated, tag = "1")]
    pub value: Vec<f32>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Int64List {
    #[prost(int64, repeated, tag = "1")]
    pub value: Vec<i64>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Feature {
    #[prost(oneof = "feature::Kind", tags = "1, 2, 3")]
    pub kind: Option<feature::Kind>,
}

pub mod feature {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Kind {
        #[prost(message, tag = "1")]
        BytesList(super::BytesList),
        #[prost(message, tag = "2")]
        FloatList(super::FloatList),
        #[prost(message, tag = "3")]
        Int64List(super::Int64List),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Features {
    #[prost(map = "string, message", tag = "1")]
    pub feature: HashMap<String, Feature>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FeatureList {
    #[prost(message, repeated, tag = "1")]
    pub feature: Vec<Feature>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FeatureLists {
    #[prost(map = "string, message", tag = "1")]
    pub feature_list: HashMap<String, FeatureList>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SequenceExample {
    #[prost(message, optional, tag = "1")]
    pub context: Option<Features>,
    #[prost(message, optional, tag = "2")]
    pub feature_lists: Option<FeatureLists>,
}

/// Wrap a single byte string in a Feature
pub fn bytes_feature(value: impl Into<Vec<u8>>) -> Feature {
    Feature {
        kind: Some(feature::Kind::BytesList(BytesList {
            value: vec![value.into()],
        })),
    }
}

/// Wrap a list of byte strings in a Feature
pub fn bytes_list_feature(value: Vec<Vec<u8>>) -> Feature {
    Feature {
        kind: Some(feature::Kind::BytesList(BytesList { value })),
    }
}

/// Wrap a list of floats in a Feature
pub fn float_list_feature(value: Vec<f32>) -> Feature {
    Feature {
        kind: Some(feature::Kind::FloatList(FloatList { value })),
    }
}

/// Wrap a single integer in a Feature
pub fn int64_feature(value: i64) -> Feature {
    Feature {
        kind: Some(feature::Kind::Int64List(Int64List { value: vec![value] })),
    }
}

/// Wrap a list of integers in a Feature
pub fn int64_list_feature(value: Vec<i64>) -> Feature {
    Feature {
        kind: Some(feature::Kind::Int64List(Int64List { value })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn test_int64_list_wire_format() {
        // proto3 packed encoding: field 1 length-delimited, one varint
        let list = Int64List { value: vec![3] };
        assert_eq!(list.encode_to_vec(), vec![0x0A, 0x01, 0x03]);
    }

    #[test]
    fn test_float_list_wire_format() {
        let list = FloatList { value: vec![1.0] };
        assert_eq!(list.encode_to_vec(), vec![0x0A, 0x04, 0x00, 0x00, 0x80, 0x3F]);
    }

    #[test]
    fn test_bytes_feature_roundtrip() {
        let feature = bytes_feature("jpeg");
        let decoded = Feature::decode(feature.encode_to_vec().as_slice()).unwrap();
        match decoded.kind {
            Some(feature::Kind::BytesList(list)) => {
                assert_eq!(list.value, vec![b"jpeg".to_vec()]);
            }
            other => panic!("unexpected feature kind: {:?}", other),
        }
    }

    #[test]
    fn test_sequence_example_roundtrip() {
        let mut context = Features::default();
        context
            .feature
            .insert("video/height".to_string(), int64_feature(576));

        let mut feature_lists = FeatureLists::default();
        feature_lists.feature_list.insert(
            "image/object/bbox/xmin".to_string(),
            FeatureList {
                feature: vec![float_list_feature(vec![0.25, 0.5])],
            },
        );

        let example = SequenceExample {
            context: Some(context),
            feature_lists: Some(feature_lists),
        };

        let decoded = SequenceExample::decode(example.encode_to_vec().as_slice()).unwrap();
        assert_eq!(decoded, example);
    }
}
