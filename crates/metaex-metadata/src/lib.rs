//! Audio metadata extraction from an open file descriptor.
//!
//! The pipeline resolves the descriptor to a path, probes the container with FFmpeg, picks the
//! first audio stream and folds container and stream tags into a [`MetadataResult`].
//!
//! [`MetadataResult`]: metaex_core::domain::MetadataResult

pub mod assembler;
pub mod config;
pub mod ffmpeg_extractor;
pub mod ffmpeg_probe;
pub mod normalizer;
pub mod selector;
pub mod tag_keys;

pub use assembler::{MetadataAssembler, assemble};
pub use config::{ProbeConfig, ProbeConfigBuilder};
pub use ffmpeg_extractor::FfmpegProbe;
pub use ffmpeg_probe::{FfmpegContainer, FfmpegDemuxer};
pub use normalizer::TagNormalizer;
