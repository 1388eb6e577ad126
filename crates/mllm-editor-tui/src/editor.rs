//! Rich-text buffer behind the compose pane
//!
//! Text is stored per character with its bold/italic marks; images occupy a
//! line of their own. On send the buffer is rendered to the same kind of
//! markup a contentEditable surface would hold and handed to the core parser.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Marks {
    pub bold: bool,
    pub italic: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub ch: char,
    pub marks: Marks,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorLine {
    Text(Vec<Glyph>),
    Image { name: String, url: String },
}

#[derive(Debug, Clone)]
pub struct Editor {
    lines: Vec<EditorLine>,
    row: usize,
    col: usize,
    /// Marks applied to newly typed characters
    pub marks: Marks,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    pub fn new() -> Self {
        Self {
            lines: vec![EditorLine::Text(Vec::new())],
            row: 0,
            col: 0,
            marks: Marks::default(),
        }
    }

    pub fn lines(&self) -> &[EditorLine] {
        &self.lines
    }

    /// (row, column) of the caret, column in characters
    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn clear(&mut self) {
        let marks = self.marks;
        *self = Self::new();
        self.marks = marks;
    }

    pub fn toggle_bold(&mut self) {
        self.marks.bold = !self.marks.bold;
    }

    pub fn toggle_italic(&mut self) {
        self.marks.italic = !self.marks.italic;
    }

    pub fn insert_char(&mut self, ch: char) {
        if ch == '\n' {
            self.newline();
            return;
        }
        if self.on_image() {
            self.lines.insert(self.row + 1, EditorLine::Text(Vec::new()));
            self.row += 1;
            self.col = 0;
        }
        let glyph = Glyph {
            ch,
            marks: self.marks,
        };
        if let EditorLine::Text(glyphs) = &mut self.lines[self.row] {
            glyphs.insert(self.col, glyph);
            self.col += 1;
        }
    }

    pub fn insert_str(&mut self, text: &str) {
        for ch in text.chars().filter(|c| *c != '\r') {
            self.insert_char(ch);
        }
    }

    /// Split the current line at the caret
    pub fn newline(&mut self) {
        let tail = match &mut self.lines[self.row] {
            EditorLine::Text(glyphs) => glyphs.split_off(self.col),
            EditorLine::Image { .. } => Vec::new(),
        };
        self.lines.insert(self.row + 1, EditorLine::Text(tail));
        self.row += 1;
        self.col = 0;
    }

    /// Put an image at the caret. Text after the caret moves below it.
    pub fn insert_image(&mut self, name: &str, url: &str) {
        let image = EditorLine::Image {
            name: name.to_string(),
            url: url.to_string(),
        };
        let tail = match &mut self.lines[self.row] {
            EditorLine::Text(glyphs) => glyphs.split_off(self.col),
            EditorLine::Image { .. } => Vec::new(),
        };
        self.lines.insert(self.row + 1, image);
        self.lines.insert(self.row + 2, EditorLine::Text(tail));
        self.row += 2;
        self.col = 0;
    }

    pub fn backspace(&mut self) {
        if self.on_image() {
            self.remove_line(self.row);
            return;
        }
        if self.col > 0 {
            if let EditorLine::Text(glyphs) = &mut self.lines[self.row] {
                glyphs.remove(self.col - 1);
            }
            self.col -= 1;
            return;
        }
        if self.row == 0 {
            return;
        }

        match self.lines.remove(self.row) {
            EditorLine::Text(current) => {
                self.row -= 1;
                match &mut self.lines[self.row] {
                    EditorLine::Text(prev) => {
                        self.col = prev.len();
                        prev.extend(current);
                    }
                    EditorLine::Image { .. } => {
                        // Backspace after an image deletes the image
                        self.lines[self.row] = EditorLine::Text(current);
                        self.col = 0;
                    }
                }
            }
            image => self.lines.insert(self.row, image),
        }
    }

    pub fn delete(&mut self) {
        if self.on_image() {
            self.remove_line(self.row);
            return;
        }
        let len = self.line_len(self.row);
        if self.col < len {
            if let EditorLine::Text(glyphs) = &mut self.lines[self.row] {
                glyphs.remove(self.col);
            }
            return;
        }
        if self.row + 1 >= self.lines.len() {
            return;
        }
        match self.lines.remove(self.row + 1) {
            EditorLine::Text(next) => {
                if let EditorLine::Text(glyphs) = &mut self.lines[self.row] {
                    glyphs.extend(next);
                }
            }
            EditorLine::Image { .. } => {}
        }
    }

    pub fn move_left(&mut self) {
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = self.line_len(self.row);
        }
    }

    pub fn move_right(&mut self) {
        if self.col < self.line_len(self.row) {
            self.col += 1;
        } else if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = 0;
        }
    }

    pub fn move_up(&mut self) {
        if self.row > 0 {
            self.row -= 1;
            self.col = self.col.min(self.line_len(self.row));
        }
    }

    pub fn move_down(&mut self) {
        if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = self.col.min(self.line_len(self.row));
        }
    }

    pub fn move_home(&mut self) {
        self.col = 0;
    }

    pub fn move_end(&mut self) {
        self.col = self.line_len(self.row);
    }

    fn on_image(&self) -> bool {
        matches!(self.lines[self.row], EditorLine::Image { .. })
    }

    fn line_len(&self, row: usize) -> usize {
        match &self.lines[row] {
            EditorLine::Text(glyphs) => glyphs.len(),
            EditorLine::Image { .. } => 0,
        }
    }

    fn remove_line(&mut self, row: usize) {
        self.lines.remove(row);
        if self.lines.is_empty() {
            self.lines.push(EditorLine::Text(Vec::new()));
        }
        self.row = row.min(self.lines.len() - 1);
        self.col = 0;
    }

    /// Render the buffer as an HTML fragment
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        for line in &self.lines {
            match line {
                EditorLine::Text(glyphs) if glyphs.is_empty() => html.push_str("<p><br></p>"),
                EditorLine::Text(glyphs) => {
                    html.push_str("<p>");
                    for run in glyphs.chunk_by(|a, b| a.marks == b.marks) {
                        push_run(&mut html, run);
                    }
                    html.push_str("</p>");
                }
                EditorLine::Image { name, url } => {
                    html.push_str(&format!(
                        r#"<img src="{}" alt="{}">"#,
                        escape_attr(url),
                        escape_attr(name)
                    ));
                }
            }
        }
        html
    }
}

fn push_run(html: &mut String, run: &[Glyph]) {
    let marks = run[0].marks;
    let text: String = run.iter().map(|g| g.ch).collect();

    if marks.bold {
        html.push_str("<b>");
    }
    if marks.italic {
        html.push_str("<i>");
    }
    html.push_str(&escape_text(&text));
    if marks.italic {
        html.push_str("</i>");
    }
    if marks.bold {
        html.push_str("</b>");
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(text: &str) -> String {
    escape_text(text).replace('"', "&quot;")
}
