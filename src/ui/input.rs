/// Line input.
///
/// Two sources behind one trait:
///   - `TerminalInput` reads keys in raw mode so Ctrl+C arrives as a key
///     event instead of a signal, and Ctrl+D on an empty line ends input.
///   - `BufferedInput` reads plain lines from any `BufRead` (piped stdin,
///     tests).
///
/// Raw mode is held only for the duration of one `read_line` call; all
/// other output happens in cooked mode.

use std::io::{self, BufRead, Write};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::{queue, style::Print, terminal};

/// One unit of player input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Line {
    Text(String),
    /// Ctrl+C.
    Interrupted,
    /// Ctrl+D or closed stdin.
    Eof,
}

pub trait LineSource {
    fn read_line(&mut self) -> io::Result<Line>;

    /// Whether the opening scene's "press space" pacing makes sense here.
    fn is_interactive(&self) -> bool {
        false
    }
}

// ══════════════════════════════════════════════════════════════
// Terminal (raw mode)
// ══════════════════════════════════════════════════════════════

pub struct TerminalInput<W: Write> {
    echo: W,
}

impl<W: Write> TerminalInput<W> {
    pub fn new(echo: W) -> Self {
        TerminalInput { echo }
    }

    fn read_raw(&mut self) -> io::Result<Line> {
        let mut buf = String::new();
        loop {
            let key = match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => key,
                _ => continue,
            };

            if ctrl_c_pressed(&key) {
                queue!(self.echo, Print("\r\n"))?;
                self.echo.flush()?;
                return Ok(Line::Interrupted);
            }

            let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
            match key.code {
                KeyCode::Char('d') | KeyCode::Char('D') if ctrl && buf.is_empty() => {
                    queue!(self.echo, Print("\r\n"))?;
                    self.echo.flush()?;
                    return Ok(Line::Eof);
                }
                KeyCode::Enter => {
                    queue!(self.echo, Print("\r\n"))?;
                    self.echo.flush()?;
                    return Ok(Line::Text(buf));
                }
                KeyCode::Backspace => {
                    if buf.pop().is_some() {
                        queue!(self.echo, Print("\u{8} \u{8}"))?;
                    }
                }
                KeyCode::Char(c) if !ctrl => {
                    buf.push(c);
                    queue!(self.echo, Print(c))?;
                }
                _ => {}
            }
            self.echo.flush()?;
        }
    }
}

impl<W: Write> LineSource for TerminalInput<W> {
    fn read_line(&mut self) -> io::Result<Line> {
        terminal::enable_raw_mode()?;
        let result = self.read_raw();
        terminal::disable_raw_mode()?;
        result
    }

    fn is_interactive(&self) -> bool {
        true
    }
}

/// Ctrl+C as a key event.
pub fn ctrl_c_pressed(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && (key.code == KeyCode::Char('c') || key.code == KeyCode::Char('C'))
}

// ══════════════════════════════════════════════════════════════
// Buffered (pipes, tests)
// ══════════════════════════════════════════════════════════════

pub struct BufferedInput<B: BufRead> {
    reader: B,
}

impl<B: BufRead> BufferedInput<B> {
    pub fn new(reader: B) -> Self {
        BufferedInput { reader }
    }
}

impl<B: BufRead> LineSource for BufferedInput<B> {
    fn read_line(&mut self) -> io::Result<Line> {
        let mut bytes = Vec::new();
        if self.reader.read_until(b'\n', &mut bytes)? == 0 {
            return Ok(Line::Eof);
        }
        // Bytes that are not UTF-8 become U+FFFD and parse as an unknown command.
        let text = String::from_utf8_lossy(&bytes);
        Ok(Line::Text(text.trim_end_matches(&['\n', '\r'][..]).to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn buffered_lines_then_eof() {
        let mut input = BufferedInput::new(Cursor::new("w\r\n \nlook"));
        assert_eq!(input.read_line().unwrap(), Line::Text("w".into()));
        assert_eq!(input.read_line().unwrap(), Line::Text(" ".into()));
        assert_eq!(input.read_line().unwrap(), Line::Text("look".into()));
        assert_eq!(input.read_line().unwrap(), Line::Eof);
        assert!(!input.is_interactive());
    }

    #[test]
    fn invalid_utf8_is_still_a_line() {
        let mut input = BufferedInput::new(Cursor::new(&b"\xff\xfe\nq\n"[..]));
        assert_eq!(input.read_line().unwrap(), Line::Text("\u{fffd}\u{fffd}".into()));
        assert_eq!(input.read_line().unwrap(), Line::Text("q".into()));
        assert_eq!(input.read_line().unwrap(), Line::Eof);
    }

    #[test]
    fn ctrl_c_detection() {
        let c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        let upper = KeyEvent::new(KeyCode::Char('C'), KeyModifiers::CONTROL | KeyModifiers::SHIFT);
        let plain = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE);
        let ctrl_d = KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL);
        assert!(ctrl_c_pressed(&c));
        assert!(ctrl_c_pressed(&upper));
        assert!(!ctrl_c_pressed(&plain));
        assert!(!ctrl_c_pressed(&ctrl_d));
    }
}
