//! Container probing on top of FFmpeg.
//!
//! `ffmpeg::format::input` folds open and stream-info probing into one call, which would hide
//! which of the two failed. The open and probe steps are therefore issued separately here, with
//! ownership of the context handed to [`Input`] as soon as it exists so that its `Drop` closes it
//! exactly once on every path.
//!
//! Tag dictionaries are walked with `av_dict_get` and decoded as UTF-8 (lossily) on the way out,
//! instead of going through `DictionaryRef::iter`, which assumes valid UTF-8.

use std::ffi::{CStr, CString, c_char, c_int};
use std::marker::PhantomData;
use std::path::Path;
use std::ptr;

use ffmpeg::ffi;
use ffmpeg::format::context::Input;
use ffmpeg::media;
use ffmpeg_next as ffmpeg;

use metaex_core::domain::RawTagEntry;
use metaex_core::ports::{CodecDetails, Demuxer, MediaKind, ProbeError, ProbedContainer, StreamSummary};

/// [`Demuxer`] backed by libavformat.
#[derive(Debug, Clone, Default)]
pub struct FfmpegDemuxer {
  /// Passed to `avformat_open_input` (e.g. `probesize`, `analyzeduration`).
  options: Vec<(String, String)>,
}

impl FfmpegDemuxer {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_options<I, K, V>(options: I) -> Self
  where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
  {
    Self { options: options.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
  }
}

impl Demuxer for FfmpegDemuxer {
  type Container = FfmpegContainer;

  fn open(&self, path: &Path) -> Result<FfmpegContainer, ProbeError> {
    let c_path = c_path(path)
      .ok_or_else(|| ProbeError::Open(format!("path cannot be passed to ffmpeg: {}", path.display())))?;

    let mut options = ffmpeg::Dictionary::new();
    for (key, value) in &self.options {
      options.set(key, value);
    }

    let mut ps: *mut ffi::AVFormatContext = ptr::null_mut();

    // SAFETY: `c_path` outlives the call, `ps` starts null as required, and the options
    // dictionary is taken back and freed right after, whatever entries remain in it.
    let code = unsafe {
      let mut opts = options.disown();
      let code = ffi::avformat_open_input(&mut ps, c_path.as_ptr(), ptr::null_mut(), &mut opts);
      drop(ffmpeg::Dictionary::own(opts));
      code
    };

    if code != 0 {
      // avformat_open_input frees the context itself on failure
      return Err(ProbeError::Open(ffmpeg::Error::from(code).to_string()));
    }

    // SAFETY: the open succeeded, so `ps` is a valid context and `Input` becomes its only owner.
    let mut input = unsafe { Input::wrap(ps) };

    // SAFETY: `input` holds a live, opened context.
    let code = unsafe { ffi::avformat_find_stream_info(input.as_mut_ptr(), ptr::null_mut()) };
    if code < 0 {
      return Err(ProbeError::StreamInfo(ffmpeg::Error::from(code).to_string()));
    }

    Ok(FfmpegContainer { input })
  }
}

/// File names are bytes on unix; they go to libavformat untouched, whatever their encoding.
#[cfg(unix)]
fn c_path(path: &Path) -> Option<CString> {
  use std::os::unix::ffi::OsStrExt;
  CString::new(path.as_os_str().as_bytes()).ok()
}

#[cfg(not(unix))]
fn c_path(path: &Path) -> Option<CString> {
  path.to_str().and_then(|p| CString::new(p).ok())
}

/// An opened and probed libavformat context. Closed on drop.
pub struct FfmpegContainer {
  input: Input,
}

impl ProbedContainer for FfmpegContainer {
  type Tags<'a> = DictionaryTags<'a>;

  fn streams(&self) -> Vec<StreamSummary> {
    self
      .input
      .streams()
      .map(|stream| StreamSummary { index: stream.index(), kind: media_kind(stream.parameters().medium()) })
      .collect()
  }

  fn codec_details(&self, index: usize) -> Option<CodecDetails> {
    let stream = self.input.stream(index)?;

    // SAFETY: every stream of an opened context carries codec parameters that live as long
    // as the context, which `self` keeps alive for this borrow.
    let par = unsafe { &*(*stream.as_ptr()).codecpar };

    // SAFETY: both lookups return pointers into static tables, or null.
    let (decoder_name, media_type) = unsafe {
      let decoder = ffi::avcodec_find_decoder(par.codec_id);
      let decoder_name = if decoder.is_null() { None } else { owned_text((*decoder).long_name) };
      (decoder_name, owned_text(ffi::av_get_media_type_string(par.codec_type)))
    };

    Some(CodecDetails {
      sample_rate: u32::try_from(par.sample_rate).unwrap_or(0),
      channels: u32::try_from(par.ch_layout.nb_channels).unwrap_or(0),
      decoder_name,
      media_type,
    })
  }

  fn container_tags(&self) -> DictionaryTags<'_> {
    // SAFETY: the context is live for the borrow of `self`.
    unsafe { DictionaryTags::new((*self.input.as_ptr()).metadata) }
  }

  fn stream_tags(&self, index: usize) -> DictionaryTags<'_> {
    match self.input.stream(index) {
      // SAFETY: as above, the stream belongs to the live context.
      Some(stream) => unsafe { DictionaryTags::new((*stream.as_ptr()).metadata) },
      None => DictionaryTags::empty(),
    }
  }

  fn bit_rate(&self) -> i64 {
    self.input.bit_rate()
  }

  fn duration(&self) -> i64 {
    self.input.duration()
  }
}

fn media_kind(medium: media::Type) -> MediaKind {
  match medium {
    media::Type::Audio => MediaKind::Audio,
    media::Type::Video => MediaKind::Video,
    media::Type::Subtitle => MediaKind::Subtitle,
    media::Type::Data => MediaKind::Data,
    media::Type::Attachment => MediaKind::Attachment,
    media::Type::Unknown => MediaKind::Unknown,
  }
}

/// # Safety
/// `text` must be null or point to a NUL-terminated string.
unsafe fn owned_text(text: *const c_char) -> Option<String> {
  if text.is_null() {
    return None;
  }
  // SAFETY: guaranteed by the caller.
  Some(unsafe { CStr::from_ptr(text) }.to_string_lossy().into_owned())
}

/// Pull iterator over an `AVDictionary`, in insertion order, duplicates included.
pub struct DictionaryTags<'a> {
  dict: *const ffi::AVDictionary,
  cursor: *const ffi::AVDictionaryEntry,
  _context: PhantomData<&'a Input>,
}

impl DictionaryTags<'_> {
  /// # Safety
  /// `dict` must be null or stay valid and unmodified for the iterator's lifetime.
  unsafe fn new(dict: *const ffi::AVDictionary) -> Self {
    Self { dict, cursor: ptr::null(), _context: PhantomData }
  }

  fn empty() -> Self {
    Self { dict: ptr::null(), cursor: ptr::null(), _context: PhantomData }
  }
}

impl Iterator for DictionaryTags<'_> {
  type Item = RawTagEntry;

  fn next(&mut self) -> Option<RawTagEntry> {
    if self.dict.is_null() {
      return None;
    }

    // SAFETY: `dict` is valid per `new`, and `cursor` is null or the entry returned by the
    // previous call on the same dictionary.
    let entry =
      unsafe { ffi::av_dict_get(self.dict, c"".as_ptr(), self.cursor, ffi::AV_DICT_IGNORE_SUFFIX as c_int) };

    if entry.is_null() {
      self.dict = ptr::null();
      return None;
    }
    self.cursor = entry;

    // SAFETY: dictionary entries always hold NUL-terminated key and value strings.
    let (key, value) = unsafe { (owned_text((*entry).key), owned_text((*entry).value)) };
    Some(RawTagEntry::new(key.unwrap_or_default(), value.unwrap_or_default()))
  }
}
