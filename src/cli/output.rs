//! Colored terminal output for packaging runs
//!
//! Normal output goes to stdout; errors always go to stderr, even in quiet mode.

use std::io::{self, Write};
use termcolor::{Buffer, BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

/// Output manager for consistent colored terminal output
#[derive(Debug)]
pub struct OutputManager {
    bufwtr: BufferWriter,
    verbose: bool,
    quiet: bool,
}

impl Clone for OutputManager {
    fn clone(&self) -> Self {
        Self::new(self.verbose, self.quiet)
    }
}

/// Leading marker of a status line.
struct Marker {
    symbol: &'static str,
    color: Color,
    bold: bool,
    /// Message text is colored too
    tint_message: bool,
}

impl Marker {
    const SUCCESS: Marker = Marker { symbol: "✓", color: Color::Green, bold: true, tint_message: false };
    const WARNING: Marker = Marker { symbol: "⚠", color: Color::Yellow, bold: true, tint_message: true };
    const ERROR: Marker = Marker { symbol: "✗", color: Color::Red, bold: true, tint_message: true };
    const VERBOSE: Marker = Marker { symbol: "→", color: Color::Blue, bold: false, tint_message: false };
    const PROGRESS: Marker = Marker { symbol: "⋯", color: Color::Magenta, bold: false, tint_message: false };

    fn write(&self, buffer: &mut Buffer, message: &str) -> io::Result<()> {
        buffer.set_color(ColorSpec::new().set_fg(Some(self.color)).set_bold(self.bold))?;
        write!(buffer, "{}", self.symbol)?;
        buffer.reset()?;
        if self.tint_message {
            buffer.set_color(ColorSpec::new().set_fg(Some(self.color)))?;
        }
        writeln!(buffer, " {}", message)?;
        buffer.reset()
    }
}

impl OutputManager {
    /// Create a new output manager
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            bufwtr: BufferWriter::stdout(ColorChoice::Auto),
            verbose,
            quiet,
        }
    }

    fn marked(&self, marker: &Marker, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }

        let mut buffer = self.bufwtr.buffer();
        marker.write(&mut buffer, message)?;
        self.bufwtr.print(&buffer)
    }

    /// Print a success message
    pub fn success(&self, message: &str) -> io::Result<()> {
        self.marked(&Marker::SUCCESS, message)
    }

    /// Print a warning message
    pub fn warn(&self, message: &str) -> io::Result<()> {
        self.marked(&Marker::WARNING, message)
    }

    /// Print an error message (always shown)
    pub fn error(&self, message: &str) {
        let bufwtr = BufferWriter::stderr(ColorChoice::Auto);
        let mut buffer = bufwtr.buffer();

        if Marker::ERROR.write(&mut buffer, message).is_err() || bufwtr.print(&buffer).is_err() {
            // stderr is gone, stdout is all that is left
            println!("✗ {}", message);
        }
    }

    /// Print a verbose message (only in verbose mode)
    pub fn verbose(&self, message: &str) -> io::Result<()> {
        if !self.verbose {
            return Ok(());
        }
        self.marked(&Marker::VERBOSE, message)
    }

    /// Print a progress message
    pub fn progress(&self, message: &str) -> io::Result<()> {
        self.marked(&Marker::PROGRESS, message)
    }

    /// Print a section header
    pub fn section(&self, title: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }

        let mut buffer = self.bufwtr.buffer();
        writeln!(&mut buffer)?;
        buffer.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
        writeln!(&mut buffer, "═══ {} ═══", title)?;
        buffer.reset()?;
        self.bufwtr.print(&buffer)
    }

    /// Print indented text (for sub-items)
    pub fn indent(&self, message: &str) -> io::Result<()> {
        self.println(&format!("    {}", message))
    }

    /// Print a plain message (respects quiet mode)
    pub fn println(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }

        let mut buffer = self.bufwtr.buffer();
        writeln!(&mut buffer, "{}", message)?;
        self.bufwtr.print(&buffer)
    }

    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Check if quiet mode is enabled
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_line_layout() {
        let mut buffer = Buffer::no_color();
        Marker::SUCCESS.write(&mut buffer, "Created 1 package(s)").unwrap();
        assert_eq!(String::from_utf8_lossy(buffer.as_slice()), "✓ Created 1 package(s)\n");
    }

    #[test]
    fn test_quiet_suppresses_normal_output() {
        let output = OutputManager::new(true, true);
        assert!(output.is_quiet());
        assert!(output.success("hidden").is_ok());
        assert!(output.verbose("hidden").is_ok());
    }
}
