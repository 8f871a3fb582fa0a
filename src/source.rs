//! Byte sources the tokenizer pulls from.
//!
//! A `ByteSource` hands out one byte at a time and accepts exactly one byte
//! of push-back. The tokenizer never pushes back twice without reading in
//! between, so implementations only need to remember a single byte and the
//! position it was read from.

use memchr::{memchr2, memchr_iter, memrchr};
use std::io::{self, BufRead, BufReader, Read};

/// A location in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// Zero-based byte offset.
    pub offset: usize,
    /// The 1-indexed line number.
    pub line: usize,
    /// The 1-indexed column number, counted in bytes.
    pub column: usize,
}

impl Position {
    /// The position of the first byte of any input.
    pub const fn start() -> Self {
        Position {
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::start()
    }
}

/// A pull-based byte stream with one byte of push-back.
pub trait ByteSource {
    /// Reads the next byte, or `None` at end of input.
    fn next_byte(&mut self) -> io::Result<Option<u8>>;

    /// Returns `byte` to the source so the next `next_byte` yields it again.
    ///
    /// Must only be called with the byte most recently returned by
    /// `next_byte`, and never twice in a row.
    fn push_back(&mut self, byte: u8);

    /// The position of the byte the next `next_byte` call will return.
    fn position(&self) -> Position;

    /// Skips ahead over at most `max` bytes of string content that needs no
    /// per-byte handling.
    ///
    /// Stops before the first `"` or `\`, and before the first control or
    /// non-ASCII byte when `strict` is set. Sources that cannot scan ahead
    /// may leave this as a no-op; the tokenizer falls back to reading byte
    /// by byte.
    fn skip_string_run(&mut self, strict: bool, max: usize) -> io::Result<()> {
        let _ = (strict, max);
        Ok(())
    }
}

/// Position bookkeeping shared by the sources.
#[derive(Debug, Clone, Copy, Default)]
struct Tracker {
    current: Position,
    previous: Position,
}

impl Tracker {
    #[inline]
    fn advance(&mut self, byte: u8) {
        self.previous = self.current;
        self.current.offset += 1;
        if byte == b'\n' {
            self.current.line += 1;
            self.current.column = 1;
        } else {
            self.current.column += 1;
        }
    }

    #[inline]
    fn retreat(&mut self) {
        self.current = self.previous;
    }

    /// Advances over a whole run of bytes at once.
    fn advance_run(&mut self, run: &[u8]) {
        if run.is_empty() {
            return;
        }
        let newlines = memchr_iter(b'\n', run).count();
        self.current.offset += run.len();
        match memrchr(b'\n', run) {
            Some(last) => {
                self.current.line += newlines;
                self.current.column = run.len() - last;
            }
            None => self.current.column += run.len(),
        }
        self.previous = self.current;
    }
}

/// Length of the prefix of `bytes` that is plain string content.
fn plain_run_len(bytes: &[u8], strict: bool) -> usize {
    let end = memchr2(b'"', b'\\', bytes).unwrap_or(bytes.len());
    if strict {
        bytes[..end]
            .iter()
            .position(|&b| b < 0x20 || !b.is_ascii())
            .unwrap_or(end)
    } else {
        end
    }
}

/// A `ByteSource` over an in-memory byte slice.
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    bytes: &'a [u8],
    cursor: usize,
    tracker: Tracker,
}

impl<'a> SliceSource<'a> {
    /// Creates a source reading `bytes` from the start.
    pub fn new(bytes: &'a [u8]) -> Self {
        SliceSource {
            bytes,
            cursor: 0,
            tracker: Tracker::default(),
        }
    }

    /// The bytes not yet read.
    pub fn remaining(&self) -> &'a [u8] {
        &self.bytes[self.cursor..]
    }
}

impl ByteSource for SliceSource<'_> {
    #[inline]
    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        let Some(&byte) = self.bytes.get(self.cursor) else {
            return Ok(None);
        };
        self.cursor += 1;
        self.tracker.advance(byte);
        Ok(Some(byte))
    }

    fn push_back(&mut self, byte: u8) {
        debug_assert!(self.cursor > 0 && self.bytes[self.cursor - 1] == byte);
        self.cursor -= 1;
        self.tracker.retreat();
    }

    fn position(&self) -> Position {
        self.tracker.current
    }

    fn skip_string_run(&mut self, strict: bool, max: usize) -> io::Result<()> {
        let rest = &self.bytes[self.cursor..];
        let rest = &rest[..rest.len().min(max)];
        let len = plain_run_len(rest, strict);
        self.tracker.advance_run(&rest[..len]);
        self.cursor += len;
        Ok(())
    }
}

/// A `ByteSource` over any `Read`, buffered internally.
pub struct ReaderSource<R> {
    reader: BufReader<R>,
    pending: Option<u8>,
    tracker: Tracker,
}

impl<R: Read> ReaderSource<R> {
    /// Wraps `reader` in a buffer.
    pub fn new(reader: R) -> Self {
        ReaderSource {
            reader: BufReader::new(reader),
            pending: None,
            tracker: Tracker::default(),
        }
    }
}

fn fill<R: Read>(reader: &mut BufReader<R>) -> io::Result<&[u8]> {
    loop {
        match reader.fill_buf() {
            Ok(_) => break,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    reader.fill_buf()
}

impl<R: Read> ByteSource for ReaderSource<R> {
    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        if let Some(byte) = self.pending.take() {
            self.tracker.advance(byte);
            return Ok(Some(byte));
        }
        let Some(&byte) = fill(&mut self.reader)?.first() else {
            return Ok(None);
        };
        self.reader.consume(1);
        self.tracker.advance(byte);
        Ok(Some(byte))
    }

    fn push_back(&mut self, byte: u8) {
        debug_assert!(self.pending.is_none());
        self.pending = Some(byte);
        self.tracker.retreat();
    }

    fn position(&self) -> Position {
        self.tracker.current
    }

    fn skip_string_run(&mut self, strict: bool, max: usize) -> io::Result<()> {
        if self.pending.is_some() {
            return Ok(());
        }
        let mut budget = max;
        while budget > 0 {
            let buf = fill(&mut self.reader)?;
            let available = buf.len().min(budget);
            let len = plain_run_len(&buf[..available], strict);
            self.tracker.advance_run(&buf[..len]);
            self.reader.consume(len);
            budget -= len;
            if available == 0 || len < available {
                break;
            }
        }
        Ok(())
    }
}
