//! Indentation-aware LaTeX output sink

use std::fmt;
use std::io::{self, Write};

/// One level of indentation
const INDENT_UNIT: &str = "\t";

/// Writes LaTeX to an underlying sink, indenting each line by the current depth
///
/// Indentation is emitted lazily, when the first byte of a line is written,
/// so text that continues a line is never split by indentation. The
/// `write!`/`writeln!` macros work on a `LatexWriter` through
/// [`LatexWriter::write_fmt`].
pub struct LatexWriter<W: Write> {
    out: W,
    depth: usize,
    at_line_start: bool,
}

impl<W: Write> LatexWriter<W> {
    /// Create a writer at depth zero
    pub fn new(out: W) -> Self {
        Self {
            out,
            depth: 0,
            at_line_start: true,
        }
    }

    /// Current indentation depth
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Enter one nesting level
    pub fn indent(&mut self) {
        self.depth += 1;
    }

    /// Leave one nesting level
    pub fn dedent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Write `s`, indenting every line it starts
    pub fn write(&mut self, s: &str) -> io::Result<()> {
        for line in s.split_inclusive('\n') {
            if self.at_line_start && line != "\n" {
                for _ in 0..self.depth {
                    self.out.write_all(INDENT_UNIT.as_bytes())?;
                }
            }
            self.out.write_all(line.as_bytes())?;
            self.at_line_start = line.ends_with('\n');
        }
        Ok(())
    }

    /// Write `s` followed by a newline
    pub fn write_line(&mut self, s: &str) -> io::Result<()> {
        self.write(s)?;
        self.write("\n")
    }

    /// Write formatted output; this is what `write!` and `writeln!` call
    pub fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        match args.as_str() {
            Some(s) => self.write(s),
            None => self.write(&args.to_string()),
        }
    }

    /// End the current line unless nothing has been written on it yet
    pub fn start_line(&mut self) -> io::Result<()> {
        if self.at_line_start {
            return Ok(());
        }
        self.write("\n")
    }

    /// Write `s` byte-for-byte with no indentation
    pub fn write_raw(&mut self, s: &str) -> io::Result<()> {
        self.out.write_all(s.as_bytes())?;
        if !s.is_empty() {
            self.at_line_start = s.ends_with('\n');
        }
        Ok(())
    }

    /// Flush the underlying sink
    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    /// Recover the underlying sink
    pub fn into_inner(self) -> W {
        self.out
    }
}
