//! # Streaming Frame Parser
//!
//! [`NmeaParser`] extracts frames from an unaligned byte stream one byte at a
//! time, decodes them and merges them into a caller-owned [`NavInfo`].
//!
//! ```text
//!  SkipUntilStart --'$'--> ReadSentence --'*'--> ReadChecksum --2 hex--> ReadEol
//!        ^                      |  '$' restarts        |                    |
//!        +----------------------+----------------------+--------------------+
//! ```
//!
//! Every problem is local to one frame: the frame is dropped, reported to the
//! [`DiagnosticSink`] and scanning resumes at the next `$`.

use std::str;

use crate::{
    ChecksumMode, NmeaError, info::NavInfo, parse_checksum, sentences::NmeaSentence,
    sentences::SentenceKind,
};

/// Capacity of the sentence buffer: payload bytes between `$` and `*`.
pub const MAX_SENTENCE_LENGTH: usize = 128;

/// Receives diagnostics from the stream parser.
///
/// The parser never depends on what the sink does with a message.
pub trait DiagnosticSink {
    /// Called with the payload of every merged sentence, on every
    /// resynchronisation and for every unsupported sentence type.
    fn trace(&mut self, _text: &str) {}

    /// Called for every other dropped frame.
    fn error(&mut self, _text: &str) {}
}

/// Discards everything.
impl DiagnosticSink for () {}

impl<T: DiagnosticSink + ?Sized> DiagnosticSink for &mut T {
    fn trace(&mut self, text: &str) {
        (**self).trace(text);
    }

    fn error(&mut self, text: &str) {
        (**self).error(text);
    }
}

/// Forwards traces to [`log::trace!`] and errors to [`log::warn!`].
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn trace(&mut self, text: &str) {
        log::trace!("{text}");
    }

    fn error(&mut self, text: &str) {
        log::warn!("{text}");
    }
}

/// Builder for a [`NmeaParser`].
///
/// # Examples
///
/// ```rust
/// use nmea0183_nav::{ChecksumMode, NavInfo, NmeaParserBuilder};
///
/// let mut parser = NmeaParserBuilder::new()
///     .checksum_mode(ChecksumMode::Optional)
///     .build_with_sink(());
///
/// let mut info = NavInfo::default();
/// let outcome = parser.parse(b"$GPVTG,054.7,T,034.4,M,005.5,N,010.2,K\r\n", &mut info);
/// assert_eq!(outcome.merged, 1);
/// assert_eq!(info.speed, Some(10.2));
/// ```
#[must_use]
#[derive(Debug, Clone, Copy)]
pub struct NmeaParserBuilder {
    checksum_mode: ChecksumMode,
    max_sentence_length: usize,
}

impl Default for NmeaParserBuilder {
    fn default() -> Self {
        Self {
            checksum_mode: ChecksumMode::Required,
            max_sentence_length: MAX_SENTENCE_LENGTH,
        }
    }
}

impl NmeaParserBuilder {
    /// Creates a builder with [`ChecksumMode::Required`] and the largest
    /// sentence length.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the checksum mode.
    ///
    /// With [`ChecksumMode::Optional`] a frame may end at the line ending
    /// without `*hh`. A checksum that is present is always validated.
    pub fn checksum_mode(mut self, mode: ChecksumMode) -> Self {
        self.checksum_mode = mode;
        self
    }

    /// Sets the longest accepted payload, clamped to [`MAX_SENTENCE_LENGTH`].
    pub fn max_sentence_length(mut self, length: usize) -> Self {
        self.max_sentence_length = length.min(MAX_SENTENCE_LENGTH);
        self
    }

    /// Builds a parser reporting to [`LogSink`].
    pub fn build(self) -> NmeaParser<LogSink> {
        self.build_with_sink(LogSink)
    }

    /// Builds a parser reporting to `sink`.
    pub fn build_with_sink<S: DiagnosticSink>(self, sink: S) -> NmeaParser<S> {
        NmeaParser {
            state: State::SkipUntilStart,
            buffer: heapless::Vec::new(),
            checksum_mode: self.checksum_mode,
            max_sentence_length: self.max_sentence_length,
            sink,
        }
    }
}

// States are named for the portion of the frame being read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    SkipUntilStart,
    ReadSentence { checksum: u8 },
    ReadChecksum { checksum: u8, high: Option<u8> },
    ReadEol { eol_count: u8 },
}

/// Totals for one [`NmeaParser::parse`] call.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ParseOutcome {
    /// Bytes consumed; always the whole input
    pub consumed: usize,
    /// Sentences merged into the snapshot
    pub merged: usize,
    /// Frames dropped
    pub dropped: usize,
}

/// The byte-stream state machine.
///
/// Input may be split at any byte: the parser resumes mid-frame on the next
/// call. A frame ending in a single line-ending character completes when the
/// next byte arrives.
///
/// # Examples
///
/// ```rust
/// use nmea0183_nav::{NavInfo, NmeaParser, Present};
///
/// let mut parser = NmeaParser::new();
/// let mut info = NavInfo::default();
///
/// let stream = b"$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n";
/// let (head, tail) = stream.split_at(40);
///
/// assert_eq!(parser.parse(head, &mut info).merged, 0);
/// assert_eq!(parser.parse(tail, &mut info).merged, 1);
/// assert!(info.present().contains(Present::LAT | Present::LON | Present::ELV));
/// ```
#[derive(Debug)]
pub struct NmeaParser<S = LogSink> {
    state: State,
    buffer: heapless::Vec<u8, MAX_SENTENCE_LENGTH>,
    checksum_mode: ChecksumMode,
    max_sentence_length: usize,
    sink: S,
}

impl Default for NmeaParser<LogSink> {
    fn default() -> Self {
        Self::new()
    }
}

impl NmeaParser<LogSink> {
    /// A parser with the default configuration, see [`NmeaParserBuilder`].
    pub fn new() -> Self {
        NmeaParserBuilder::new().build()
    }
}

impl<S: DiagnosticSink> NmeaParser<S> {
    /// Feeds a buffer of any length, merging every completed sentence.
    pub fn parse(&mut self, bytes: &[u8], info: &mut NavInfo) -> ParseOutcome {
        let mut outcome = ParseOutcome {
            consumed: bytes.len(),
            ..ParseOutcome::default()
        };

        for &byte in bytes {
            match self.feed(byte, info) {
                Some(Ok(_)) => outcome.merged += 1,
                Some(Err(_)) => outcome.dropped += 1,
                None => {}
            }
        }

        outcome
    }

    /// Advances the state machine by one byte.
    ///
    /// Returns [`None`] while a frame is in progress or no frame has started,
    /// and the outcome of the frame once it completes or is dropped.
    pub fn feed(&mut self, b: u8, info: &mut NavInfo) -> Option<Result<SentenceKind, NmeaError>> {
        match self.state {
            State::SkipUntilStart => {
                if b == b'$' {
                    self.start();
                }
                None
            }
            State::ReadSentence { .. } | State::ReadChecksum { .. } if b == b'$' => {
                self.sink.trace("unexpected '$', resynchronising");
                self.start();
                Some(Err(NmeaError::MalformedFrame(
                    "frame interrupted by '$'".into(),
                )))
            }
            State::ReadSentence { checksum } => match b {
                b'*' => {
                    self.state = State::ReadChecksum {
                        checksum,
                        high: None,
                    };
                    None
                }
                b'\r' | b'\n' if self.checksum_mode == ChecksumMode::Optional => {
                    self.state = State::ReadEol { eol_count: 1 };
                    None
                }
                b'\r' | b'\n' => self.discard(NmeaError::MalformedFrame("missing checksum".into())),
                _ => match self.buffer.push(b) {
                    Ok(()) if self.buffer.len() <= self.max_sentence_length => {
                        self.state = State::ReadSentence {
                            checksum: checksum ^ b,
                        };
                        None
                    }
                    _ => self.discard(NmeaError::BufferOverflow(self.max_sentence_length)),
                },
            },
            State::ReadChecksum {
                checksum,
                high: None,
            } => {
                self.state = State::ReadChecksum {
                    checksum,
                    high: Some(b),
                };
                None
            }
            State::ReadChecksum {
                checksum,
                high: Some(high),
            } => match parse_checksum([high, b]) {
                Some(found) if found == checksum => {
                    self.state = State::ReadEol { eol_count: 0 };
                    None
                }
                Some(found) => self.discard(NmeaError::ChecksumMismatch {
                    expected: checksum,
                    found,
                }),
                None => self.discard(NmeaError::MalformedFrame(format!(
                    "invalid checksum characters {:?}",
                    [high as char, b as char]
                ))),
            },
            State::ReadEol { eol_count } => match b {
                b'\r' | b'\n' if eol_count < 1 => {
                    self.state = State::ReadEol {
                        eol_count: eol_count + 1,
                    };
                    None
                }
                b'\r' | b'\n' => Some(self.complete(info)),
                _ => {
                    let outcome = self.complete(info);
                    // the byte after the frame starts the next scan
                    if b == b'$' {
                        self.start();
                    }
                    Some(outcome)
                }
            },
        }
    }

    /// Abandons any partial frame.
    pub fn reset(&mut self) {
        self.state = State::SkipUntilStart;
        self.buffer.clear();
    }

    /// The diagnostic sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// The diagnostic sink, mutably.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consumes the parser, returning its sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    fn start(&mut self) {
        self.buffer.clear();
        self.state = State::ReadSentence { checksum: 0 };
    }

    fn discard(&mut self, error: NmeaError) -> Option<Result<SentenceKind, NmeaError>> {
        self.state = State::SkipUntilStart;
        self.sink.error(&error.to_string());
        Some(Err(error))
    }

    fn complete(&mut self, info: &mut NavInfo) -> Result<SentenceKind, NmeaError> {
        self.state = State::SkipUntilStart;

        let payload = str::from_utf8(&self.buffer)
            .ok()
            .filter(|payload| payload.is_ascii());
        let Some(payload) = payload else {
            let error = NmeaError::MalformedFrame("non-ASCII content".into());
            self.sink.error(&error.to_string());
            return Err(error);
        };

        match NmeaSentence::parse_payload(payload) {
            Ok(sentence) => {
                sentence.merge_into(info);
                self.sink.trace(payload);
                Ok(sentence.kind())
            }
            Err(error @ NmeaError::UnsupportedSentenceType(_)) => {
                self.sink.trace(&error.to_string());
                Err(error)
            }
            Err(error) => {
                self.sink.error(&error.to_string());
                Err(error)
            }
        }
    }
}
