use metaex_core::domain::StreamInfo;
use metaex_core::ports::{CodecDetails, MediaKind, StreamSummary};

/// Index of the first audio stream, scanning in index order.
pub fn select_audio_stream(streams: &[StreamSummary]) -> Option<usize> {
  streams.iter().find(|stream| stream.kind == MediaKind::Audio).map(|stream| stream.index)
}

pub fn stream_info(details: CodecDetails) -> StreamInfo {
  StreamInfo {
    sample_rate: details.sample_rate,
    channels: details.channels,
    codec: details.decoder_name,
    codec_type: details.media_type,
  }
}
