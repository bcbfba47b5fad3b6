//! Line-oriented writer that turns plain text into log records

use contextlog_application::Entry;
use contextlog_domain::{Caller, Level, MAX_VALUE_LENGTH};
use std::io;

/// Emits every complete line written to it as one record.
///
/// A trailing line without a newline is held back until the writer is
/// flushed or dropped. Blank lines are skipped. A line longer than
/// [`MAX_VALUE_LENGTH`] bytes is emitted in pieces of at most that size.
pub struct LineWriter<E: Entry> {
    entry: E,
    level: Level,
    buffer: Vec<u8>,
}

impl<E: Entry> LineWriter<E> {
    /// Writer logging at `info`
    pub fn new(entry: E) -> Self {
        Self::with_level(entry, Level::Info)
    }

    pub fn with_level(entry: E, level: Level) -> Self {
        Self {
            entry,
            level,
            buffer: Vec::new(),
        }
    }

    fn emit(&self, mut line: &[u8]) {
        while line.len() > MAX_VALUE_LENGTH {
            let (piece, rest) = line.split_at(split_point(line));
            self.emit_piece(piece);
            line = rest;
        }
        self.emit_piece(line);
    }

    fn emit_piece(&self, line: &[u8]) {
        let line = String::from_utf8_lossy(line);
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            return;
        }
        self.entry.log(
            self.level,
            &line,
            Caller::new(file!(), line!(), Some(module_path!())),
        );
    }
}

impl<E: Entry> io::Write for LineWriter<E> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            self.emit(&line[..line.len() - 1]);
        }
        while self.buffer.len() > MAX_VALUE_LENGTH {
            let piece: Vec<u8> = self.buffer.drain(..split_point(&self.buffer)).collect();
            self.emit_piece(&piece);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.buffer.is_empty() {
            let line = std::mem::take(&mut self.buffer);
            self.emit(&line);
        }
        Ok(())
    }
}

/// Where to cut a buffer longer than `MAX_VALUE_LENGTH`, backing off so a
/// UTF-8 character is not split
fn split_point(buffer: &[u8]) -> usize {
    let mut end = MAX_VALUE_LENGTH;
    while end > MAX_VALUE_LENGTH - 3 && buffer[end] & 0b1100_0000 == 0b1000_0000 {
        end -= 1;
    }
    end
}

impl<E: Entry> Drop for LineWriter<E> {
    fn drop(&mut self) {
        let _ = io::Write::flush(self);
    }
}
