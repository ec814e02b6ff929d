use crate::client::GenerateClient;
use crate::config::Config;
use crate::conversation::Conversation;

/// Screen-side state wrapped around one conversation.
///
/// Everything here is presentation bookkeeping; conversational state lives
/// in (and only changes through) the `Conversation`.
pub struct App {
    pub should_quit: bool,
    pub conversation: Conversation,

    // Input state
    pub input_cursor: usize, // cursor position in the draft, in chars

    // Chat viewport state (inner dimensions, updated during render)
    pub chat_scroll: u16,
    pub chat_height: u16,
    pub chat_width: u16,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation
}

impl App {
    pub fn new(config: &Config) -> Self {
        let client = GenerateClient::new(&config.endpoint());

        Self {
            should_quit: false,
            conversation: Conversation::new(client),
            input_cursor: 0,
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            animation_frame: 0,
        }
    }

    /// Tick the ellipsis animation while a reply is in flight.
    pub fn tick_animation(&mut self) {
        if self.conversation.pending() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    pub fn scroll_chat_up(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_sub(1);
    }

    pub fn scroll_chat_down(&mut self) {
        let max_scroll = self.rendered_chat_lines().saturating_sub(self.chat_height);
        if self.chat_scroll < max_scroll {
            self.chat_scroll += 1;
        }
    }

    /// Scroll so the newest message (or the thinking line) is visible.
    pub fn scroll_chat_to_bottom(&mut self) {
        let total_lines = self.rendered_chat_lines();
        let visible_height = if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        };

        if total_lines > visible_height {
            self.chat_scroll = total_lines.saturating_sub(visible_height);
        } else {
            self.chat_scroll = 0;
        }
    }

    /// Estimate how many terminal lines the chat renders to, accounting
    /// for wrapping at the current chat width.
    fn rendered_chat_lines(&self) -> u16 {
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        let mut total_lines: u16 = 0;
        for msg in self.conversation.messages() {
            total_lines += 1; // role line ("You:" or "Coach:")
            for line in msg.text.lines() {
                // Use character count, not byte length, for proper UTF-8 handling
                let char_count = line.chars().count();
                if char_count == 0 {
                    total_lines += 1; // empty line still takes one line
                } else {
                    total_lines += ((char_count / wrap_width) + 1) as u16;
                }
            }
            total_lines += 1; // blank line after message
        }

        if self.conversation.pending() {
            total_lines += 2; // "Coach:" + "Thinking..."
        }
        if self.conversation.last_error().is_some() {
            total_lines += 2; // error line + retry hint
        }

        total_lines
    }
}
