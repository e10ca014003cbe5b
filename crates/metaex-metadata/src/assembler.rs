use std::path::Path;

use metaex_core::ExtractError;
use metaex_core::domain::{ContainerInfo, MetadataResult, Scope, Status, StreamInfo};
use metaex_core::ports::{Demuxer, ProbedContainer};
use metaex_fs::FdResolver;
use tracing::{debug, warn};

use crate::normalizer::TagNormalizer;
use crate::selector::{select_audio_stream, stream_info};

/// Runs the whole pipeline: descriptor → path → container → result.
///
/// Holds no per-call state, so one assembler can serve concurrent calls; each call
/// opens and closes its own container.
#[derive(Debug, Clone)]
pub struct MetadataAssembler<D> {
  resolver: FdResolver,
  demuxer: D,
}

impl<D: Demuxer> MetadataAssembler<D> {
  pub fn new(resolver: FdResolver, demuxer: D) -> Self {
    Self { resolver, demuxer }
  }

  /// Never fails: problems are reported through [`MetadataResult::status`].
  pub fn extract(&self, fd: i32) -> MetadataResult {
    let path = match self.resolver.resolve(fd) {
      Ok(path) => path,
      Err(e) => return failure(ExtractError::PathResolution(e.to_string())),
    };

    self.extract_from_path(&path)
  }

  /// Same as [`extract`](Self::extract) for a caller that already has a path.
  pub fn extract_from_path(&self, path: &Path) -> MetadataResult {
    match self.demuxer.open(path) {
      Ok(container) => assemble(&container),
      Err(e) => failure(e.into()),
    }
  }
}

fn failure(error: ExtractError) -> MetadataResult {
  match &error {
    // descriptors backed by pipes or sockets end here routinely
    ExtractError::PathResolution(_) => debug!(error = %error, "metadata extraction failed"),
    ExtractError::Probe(_) => warn!(error = %error, "metadata extraction failed"),
  }
  MetadataResult::failed(error.status())
}

/// Builds the result from an opened container. The container stays owned by the caller.
pub fn assemble<C: ProbedContainer>(container: &C) -> MetadataResult {
  let audio_index = select_audio_stream(&container.streams());

  let mut normalizer = TagNormalizer::new();
  normalizer.ingest(Scope::Container, container.container_tags());

  let mut stream = StreamInfo::default();
  match audio_index {
    Some(index) => {
      debug!(index, "selected audio stream");
      if let Some(details) = container.codec_details(index) {
        stream = stream_info(details);
      }
      normalizer.ingest(Scope::Stream, container.stream_tags(index));
    }
    None => debug!("container has no audio stream"),
  }

  let (tags, extras_raw) = normalizer.finish();

  MetadataResult {
    status: Status::Success,
    container: ContainerInfo { bitrate: container.bit_rate(), duration: container.duration() },
    stream,
    tags,
    extras_raw,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;
  use std::path::PathBuf;
  use std::sync::Arc;
  use std::sync::atomic::{AtomicUsize, Ordering};

  use metaex_core::domain::RawTagEntry;
  use metaex_core::ports::{CodecDetails, MediaKind, ProbeError, StreamSummary};
  use tempfile::TempDir;

  #[derive(Debug, Clone, Default)]
  struct FakeFile {
    pub streams: Vec<(MediaKind, CodecDetails, Vec<(String, String)>)>,
    pub tags: Vec<(String, String)>,
    pub bit_rate: i64,
    pub duration: i64,
  }

  #[derive(Debug, Clone)]
  enum Outcome {
    Opens(FakeFile),
    OpenFails,
    StreamInfoFails,
  }

  #[derive(Debug, Default)]
  struct Handles {
    pub opened: AtomicUsize,
    pub closed: AtomicUsize,
  }

  /// In-memory demuxer that counts how many handles it hands out and gets back.
  #[derive(Debug, Clone, Default)]
  struct FakeDemuxer {
    files: HashMap<PathBuf, Outcome>,
    pub handles: Arc<Handles>,
  }

  impl FakeDemuxer {
    fn with(mut self, path: &str, outcome: Outcome) -> Self {
      self.files.insert(PathBuf::from(path), outcome);
      self
    }
  }

  struct FakeContainer {
    file: FakeFile,
    handles: Arc<Handles>,
  }

  impl Drop for FakeContainer {
    fn drop(&mut self) {
      self.handles.closed.fetch_add(1, Ordering::SeqCst);
    }
  }

  impl Demuxer for FakeDemuxer {
    type Container = FakeContainer;

    fn open(&self, path: &Path) -> Result<FakeContainer, ProbeError> {
      let outcome = self.files.get(path).cloned().unwrap_or(Outcome::OpenFails);
      let file = match outcome {
        Outcome::OpenFails => return Err(ProbeError::Open(format!("cannot open {}", path.display()))),
        Outcome::StreamInfoFails => None,
        Outcome::Opens(file) => Some(file),
      };

      self.handles.opened.fetch_add(1, Ordering::SeqCst);
      let container = FakeContainer { file: file.clone().unwrap_or_default(), handles: self.handles.clone() };

      match file {
        Some(_) => Ok(container),
        None => Err(ProbeError::StreamInfo("no stream info".into())),
      }
    }
  }

  fn entries(pairs: &[(String, String)]) -> std::vec::IntoIter<RawTagEntry> {
    pairs.iter().map(|(k, v)| RawTagEntry::new(k.as_str(), v.as_str())).collect::<Vec<_>>().into_iter()
  }

  impl ProbedContainer for FakeContainer {
    type Tags<'a> = std::vec::IntoIter<RawTagEntry>;

    fn streams(&self) -> Vec<StreamSummary> {
      self.file.streams.iter().enumerate().map(|(index, (kind, _, _))| StreamSummary { index, kind: *kind }).collect()
    }

    fn codec_details(&self, index: usize) -> Option<CodecDetails> {
      self.file.streams.get(index).map(|(_, details, _)| details.clone())
    }

    fn container_tags(&self) -> Self::Tags<'_> {
      entries(&self.file.tags)
    }

    fn stream_tags(&self, index: usize) -> Self::Tags<'_> {
      self.file.streams.get(index).map(|(_, _, tags)| entries(tags)).unwrap_or_default()
    }

    fn bit_rate(&self) -> i64 {
      self.file.bit_rate
    }

    fn duration(&self) -> i64 {
      self.file.duration
    }
  }

  fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items.iter().map(|&(k, v)| (k.to_owned(), v.to_owned())).collect()
  }

  fn audio(rate: u32, channels: u32, tags: &[(&str, &str)]) -> (MediaKind, CodecDetails, Vec<(String, String)>) {
    let details = CodecDetails {
      sample_rate: rate,
      channels,
      decoder_name: Some("Vorbis".into()),
      media_type: Some("audio".into()),
    };
    (MediaKind::Audio, details, pairs(tags))
  }

  fn other(kind: MediaKind, tags: &[(&str, &str)]) -> (MediaKind, CodecDetails, Vec<(String, String)>) {
    (kind, CodecDetails::default(), pairs(tags))
  }

  /// A link dir where fd 3 points at `/virtual/song.ogg`, fd 4 at `/virtual/broken.ogg`
  /// and fd 5 at `/virtual/truncated.ogg`.
  fn link_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    #[cfg(unix)]
    for (fd, target) in [(3, "/virtual/song.ogg"), (4, "/virtual/broken.ogg"), (5, "/virtual/truncated.ogg")] {
      std::os::unix::fs::symlink(target, dir.path().join(fd.to_string())).unwrap();
    }
    dir
  }

  fn sample_file() -> FakeFile {
    FakeFile {
      streams: vec![
        other(MediaKind::Video, &[("title", "cover")]),
        audio(44_100, 2, &[("comment", "nice"), ("TITLE", "stream title")]),
        audio(22_050, 1, &[("comment", "second audio")]),
      ],
      tags: pairs(&[("title", "T"), ("mood", "happy"), ("Artist", "A"), ("ARTISTS", "B")]),
      bit_rate: 192_000,
      duration: 3_000_000,
    }
  }

  fn assembler(dir: &TempDir) -> MetadataAssembler<FakeDemuxer> {
    let demuxer = FakeDemuxer::default()
      .with("/virtual/song.ogg", Outcome::Opens(sample_file()))
      .with("/virtual/broken.ogg", Outcome::OpenFails)
      .with("/virtual/truncated.ogg", Outcome::StreamInfoFails);
    MetadataAssembler::new(FdResolver::with_link_dir(dir.path()), demuxer)
  }

  #[cfg(unix)]
  #[test]
  fn assembles_full_result() {
    let dir = link_dir();
    let result = assembler(&dir).extract(3);

    assert_eq!(result.status, Status::Success);
    assert_eq!(result.container, ContainerInfo { bitrate: 192_000, duration: 3_000_000 });
    assert_eq!(result.stream.sample_rate, 44_100);
    assert_eq!(result.stream.channels, 2);
    assert_eq!(result.stream.codec.as_deref(), Some("Vorbis"));
    assert_eq!(result.stream.codec_type.as_deref(), Some("audio"));
    assert_eq!(result.tags.title.as_deref(), Some("T"));
    assert_eq!(result.tags.artist.as_deref(), Some("A"));
    assert_eq!(result.tags.album, None);
    assert_eq!(result.extras_raw, vec!["mood: happy", "comment: nice", "TITLE: stream title"]);
  }

  #[test]
  fn unresolvable_descriptor_only_sets_status() {
    let dir = link_dir();
    let assembler = assembler(&dir);

    for fd in [-1, 99] {
      let result = assembler.extract(fd);
      assert_eq!(result, MetadataResult::failed(Status::PathResolutionError));
    }
    assert_eq!(assembler.demuxer.handles.opened.load(Ordering::SeqCst), 0);
  }

  #[cfg(unix)]
  #[test]
  fn probe_failures_map_to_their_status() {
    let dir = link_dir();
    let assembler = assembler(&dir);

    assert_eq!(assembler.extract(4), MetadataResult::failed(Status::OpenError));
    assert_eq!(assembler.extract(5), MetadataResult::failed(Status::StreamInfoError));
  }

  #[test]
  fn no_streams_is_still_success() {
    let demuxer =
      FakeDemuxer::default().with("/virtual/empty.mka", Outcome::Opens(FakeFile { bit_rate: -1, ..Default::default() }));
    let assembler = MetadataAssembler::new(FdResolver::new(), demuxer);

    let result = assembler.extract_from_path(Path::new("/virtual/empty.mka"));

    assert_eq!(result.status, Status::Success);
    assert_eq!(result.stream, StreamInfo::default());
    assert_eq!(result.container.bitrate, -1);
    assert!(result.extras_raw.is_empty());
  }

  #[test]
  fn non_audio_streams_contribute_no_stream_tags() {
    let file = FakeFile {
      streams: vec![other(MediaKind::Video, &[("handler_name", "VideoHandler")])],
      tags: pairs(&[("genre", "Ambient"), ("encoder", "Lavf")]),
      ..Default::default()
    };
    let demuxer = FakeDemuxer::default().with("/virtual/clip.mp4", Outcome::Opens(file));
    let assembler = MetadataAssembler::new(FdResolver::new(), demuxer);

    let result = assembler.extract_from_path(Path::new("/virtual/clip.mp4"));

    assert_eq!(result.status, Status::Success);
    assert_eq!(result.stream.sample_rate, 0);
    assert_eq!(result.stream.codec, None);
    assert_eq!(result.tags.genre.as_deref(), Some("Ambient"));
    assert_eq!(result.extras_raw, vec!["encoder: Lavf"]);
  }

  #[test]
  fn duplicate_extras_are_not_merged() {
    let file = FakeFile {
      streams: vec![audio(8_000, 1, &[("comment", "x"), ("comment", "y")])],
      tags: pairs(&[("comment", "a"), ("comment", "b")]),
      ..Default::default()
    };
    let demuxer = FakeDemuxer::default().with("/virtual/dupes.ogg", Outcome::Opens(file));
    let assembler = MetadataAssembler::new(FdResolver::new(), demuxer);

    let result = assembler.extract_from_path(Path::new("/virtual/dupes.ogg"));

    assert_eq!(result.extras_raw, vec!["comment: a", "comment: b", "comment: x", "comment: y"]);
  }

  #[derive(Clone, Default)]
  struct CapturedLog(Arc<std::sync::Mutex<Vec<u8>>>);

  impl std::io::Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
      self.0.lock().unwrap().extend_from_slice(buf);
      Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
      Ok(())
    }
  }

  fn warnings_during(f: impl FnOnce()) -> String {
    let log = CapturedLog::default();
    let writer = log.clone();
    let subscriber = tracing_subscriber::fmt()
      .with_max_level(tracing::Level::WARN)
      .with_ansi(false)
      .with_writer(move || writer.clone())
      .finish();

    tracing::subscriber::with_default(subscriber, f);

    let bytes = log.0.lock().unwrap().clone();
    String::from_utf8(bytes).unwrap()
  }

  #[cfg(unix)]
  #[test]
  fn only_probe_failures_are_warnings() {
    let dir = link_dir();
    let assembler = assembler(&dir);

    assert!(warnings_during(|| assert_eq!(assembler.extract(99).status, Status::PathResolutionError)).is_empty());

    let logged = warnings_during(|| assert_eq!(assembler.extract(4).status, Status::OpenError));
    assert!(logged.contains("WARN"), "{logged}");
    assert!(logged.contains("metadata extraction failed"), "{logged}");
  }

  #[cfg(unix)]
  #[test]
  fn repeated_extraction_is_identical() {
    let dir = link_dir();
    let assembler = assembler(&dir);

    assert_eq!(assembler.extract(3), assembler.extract(3));
  }

  #[cfg(unix)]
  #[test]
  fn every_opened_handle_is_closed_once() {
    let dir = link_dir();
    let assembler = assembler(&dir);
    let handles = assembler.demuxer.handles.clone();

    for fd in [3, 4, 5, 99] {
      assembler.extract(fd);
    }
    // 3 and 5 open a handle; 4 fails before one exists, 99 never reaches the demuxer
    assert_eq!(handles.opened.load(Ordering::SeqCst), 2);
    assert_eq!(handles.closed.load(Ordering::SeqCst), 2);

    for _ in 0..10_000 {
      assert_eq!(assembler.extract(3).status, Status::Success);
    }
    assert_eq!(handles.opened.load(Ordering::SeqCst), 10_002);
    assert_eq!(handles.closed.load(Ordering::SeqCst), 10_002);
  }
}
