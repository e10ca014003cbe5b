pub mod demuxer;
pub mod metadata;

pub use demuxer::{CodecDetails, Demuxer, MediaKind, ProbeError, ProbedContainer, StreamSummary};
pub use metadata::{MetadataError, MetadataExtractor};
