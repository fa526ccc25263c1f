//! Line-oriented writer for Octo source.

use std::io::{self, Write};

/// Bytes per line in data tables.
pub const BYTES_PER_LINE: usize = 16;

const INDENT: &str = "  ";

/// Writes Octo statements, labels, comments and data tables with
/// consistent indentation.
pub struct OctoStream<W: Write> {
    out: W,
    indent_level: usize,
}

impl<W: Write> OctoStream<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            indent_level: 0,
        }
    }

    pub fn indent_level(&self) -> usize {
        self.indent_level
    }

    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    /// Write one indented line. Empty lines carry no indentation.
    pub fn line(&mut self, text: &str) -> io::Result<()> {
        if text.is_empty() {
            return writeln!(self.out);
        }
        writeln!(self.out, "{}{}", INDENT.repeat(self.indent_level), text)
    }

    pub fn blank(&mut self) -> io::Result<()> {
        self.line("")
    }

    pub fn comment(&mut self, message: &str) -> io::Result<()> {
        self.line(&format!("# {}", message))
    }

    pub fn label(&mut self, name: &str) -> io::Result<()> {
        self.line(&format!(": {}", name))
    }

    /// Several statements on one line, separated like indentation.
    pub fn statements<S: AsRef<str>>(&mut self, statements: &[S]) -> io::Result<()> {
        let joined: Vec<&str> = statements.iter().map(|s| s.as_ref()).collect();
        self.line(&joined.join(INDENT))
    }

    /// Start a subroutine: its label, then an indented body.
    pub fn begin_func(&mut self, name: &str) -> io::Result<()> {
        self.label(name)?;
        self.indent();
        Ok(())
    }

    /// Finish a subroutine with `return`.
    pub fn end_func(&mut self) -> io::Result<()> {
        self.line("return")?;
        self.dedent();
        Ok(())
    }

    /// Write a labelled table of bytes.
    ///
    /// The first bytes share the label's line; continuation lines are padded
    /// so every byte column lines up under the first.
    pub fn data_table(&mut self, label: &str, bytes: &[u8]) -> io::Result<()> {
        let pad = " ".repeat(label.len() + 3);
        let prefix = INDENT.repeat(self.indent_level);
        for (i, chunk) in bytes.chunks(BYTES_PER_LINE).enumerate() {
            let hex: Vec<String> = chunk.iter().map(|b| format!("0x{:02X}", b)).collect();
            if i == 0 {
                writeln!(self.out, "{}: {} {}", prefix, label, hex.join(" "))?;
            } else {
                writeln!(self.out, "{}{}{}", prefix, pad, hex.join(" "))?;
            }
        }
        if bytes.is_empty() {
            writeln!(self.out, "{}: {}", prefix, label)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
