pub struct InputState {
    pub buffer: String,
    cursor_position: usize,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

impl InputState {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            cursor_position: 0,
        }
    }

    pub fn handle_char(&mut self, c: char) {
        self.buffer.push(c);
        self.cursor_position = self.buffer.len();
    }

    pub fn handle_backspace(&mut self) {
        if !self.buffer.is_empty() {
            self.buffer.pop();
            self.cursor_position = self.buffer.len();
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor_position = 0;
    }

    pub fn cursor(&self) -> usize {
        self.cursor_position
    }
}
