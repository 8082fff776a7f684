use anyhow::Result;

use crate::clipboard::{ClipboardBackend, Target};

/// Plain text viewer bound to the clipboard buffer it was opened from
/// Every mutating edit writes the whole text back to that buffer
/// immediately; there is no save step and no debounce. The monitor sees
/// those writes like any other change and re-labels the menu entry, which
/// is the intended feedback loop. Populating the buffer on open is not an
/// edit and writes nothing.
pub struct TextViewer {
    visible: bool,
    binding: Option<Target>,
    lines: Vec<String>,
    /// Cursor position as (row, column) in characters
    cursor: (usize, usize),
}

impl Default for TextViewer {
    fn default() -> Self {
        TextViewer {
            visible: false,
            binding: None,
            lines: vec![String::new()],
            cursor: (0, 0),
        }
    }
}

impl TextViewer {
    pub fn new() -> Self {
        TextViewer::default()
    }

    /// Show the viewer with the given text, bound to its source buffer
    pub fn open(&mut self, target: Target, text: String) {
        self.binding = Some(target);
        self.lines = text.split('\n').map(str::to_string).collect();
        self.cursor = (0, 0);
        self.visible = true;
        log::debug!("Text viewer opened from {}", target.label());
    }

    /// Hide the viewer and clear the binding
    pub fn close(&mut self) {
        self.visible = false;
        self.binding = None;
        self.lines = vec![String::new()];
        self.cursor = (0, 0);
    }

    pub fn is_open(&self) -> bool {
        self.visible
    }

    pub fn binding(&self) -> Option<Target> {
        self.binding
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    /// The full buffer as one string (what write-back sends)
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Insert a character at the cursor and sync the bound buffer
    pub fn insert_char(&mut self, c: char, backend: &dyn ClipboardBackend) -> Result<()> {
        if !self.visible {
            return Ok(());
        }
        let (row, col) = self.cursor;
        let idx = byte_index(&self.lines[row], col);
        self.lines[row].insert(idx, c);
        self.cursor.1 += 1;
        self.write_back(backend)
    }

    /// Split the current line at the cursor and sync the bound buffer
    pub fn insert_newline(&mut self, backend: &dyn ClipboardBackend) -> Result<()> {
        if !self.visible {
            return Ok(());
        }
        let (row, col) = self.cursor;
        let idx = byte_index(&self.lines[row], col);
        let tail = self.lines[row].split_off(idx);
        self.lines.insert(row + 1, tail);
        self.cursor = (row + 1, 0);
        self.write_back(backend)
    }

    /// Delete the character before the cursor, joining lines at column 0
    pub fn backspace(&mut self, backend: &dyn ClipboardBackend) -> Result<()> {
        if !self.visible {
            return Ok(());
        }
        let (row, col) = self.cursor;
        if col > 0 {
            let idx = byte_index(&self.lines[row], col - 1);
            self.lines[row].remove(idx);
            self.cursor.1 -= 1;
        } else if row > 0 {
            let current = self.lines.remove(row);
            let prev_len = char_len(&self.lines[row - 1]);
            self.lines[row - 1].push_str(&current);
            self.cursor = (row - 1, prev_len);
        } else {
            return Ok(());
        }
        self.write_back(backend)
    }

    /// Delete the character under the cursor, joining lines at end of line
    pub fn delete(&mut self, backend: &dyn ClipboardBackend) -> Result<()> {
        if !self.visible {
            return Ok(());
        }
        let (row, col) = self.cursor;
        if col < char_len(&self.lines[row]) {
            let idx = byte_index(&self.lines[row], col);
            self.lines[row].remove(idx);
        } else if row + 1 < self.lines.len() {
            let next = self.lines.remove(row + 1);
            self.lines[row].push_str(&next);
        } else {
            return Ok(());
        }
        self.write_back(backend)
    }

    pub fn move_left(&mut self) {
        let (row, col) = self.cursor;
        if col > 0 {
            self.cursor.1 -= 1;
        } else if row > 0 {
            self.cursor = (row - 1, char_len(&self.lines[row - 1]));
        }
    }

    pub fn move_right(&mut self) {
        let (row, col) = self.cursor;
        if col < char_len(&self.lines[row]) {
            self.cursor.1 += 1;
        } else if row + 1 < self.lines.len() {
            self.cursor = (row + 1, 0);
        }
    }

    pub fn move_up(&mut self) {
        if self.cursor.0 > 0 {
            self.cursor.0 -= 1;
            self.clamp_column();
        }
    }

    pub fn move_down(&mut self) {
        if self.cursor.0 + 1 < self.lines.len() {
            self.cursor.0 += 1;
            self.clamp_column();
        }
    }

    pub fn move_home(&mut self) {
        self.cursor.1 = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor.1 = char_len(&self.lines[self.cursor.0]);
    }

    fn clamp_column(&mut self) {
        let len = char_len(&self.lines[self.cursor.0]);
        if self.cursor.1 > len {
            self.cursor.1 = len;
        }
    }

    /// Push the whole buffer to the bound clipboard target
    fn write_back(&self, backend: &dyn ClipboardBackend) -> Result<()> {
        if let Some(target) = self.binding {
            backend.write_text(target, &self.text())?;
        }
        Ok(())
    }
}

/// Byte offset of a character column within a line
fn byte_index(line: &str, col: usize) -> usize {
    line.char_indices()
        .nth(col)
        .map(|(i, _)| i)
        .unwrap_or(line.len())
}

fn char_len(line: &str) -> usize {
    line.chars().count()
}
