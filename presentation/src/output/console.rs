//! Console output formatter for chat sessions

use colored::{Color, Colorize};
use mindmingle_domain::{ChatSession, Message, Sender, Theme};

/// Colours used for one theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub accent: Color,
    pub user: Color,
    pub assistant: Color,
    pub muted: Color,
    pub error: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                accent: Color::BrightCyan,
                user: Color::BrightBlue,
                assistant: Color::BrightMagenta,
                muted: Color::BrightBlack,
                error: Color::BrightRed,
            },
            Theme::Light => Self {
                accent: Color::Blue,
                user: Color::Blue,
                assistant: Color::Magenta,
                muted: Color::Black,
                error: Color::Red,
            },
        }
    }
}

/// Formats sessions and messages for terminal display
pub struct ConsoleFormatter {
    palette: Palette,
}

impl ConsoleFormatter {
    pub fn new(theme: Theme) -> Self {
        Self {
            palette: Palette::for_theme(theme),
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.palette = Palette::for_theme(theme);
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    pub fn header(&self, title: &str) -> String {
        let line = "─".repeat(48);
        format!(
            "{}\n{:^48}\n{}",
            line.color(self.palette.accent),
            title.bold(),
            line.color(self.palette.accent)
        )
    }

    /// Avatar and name line shown above a message
    pub fn message_label(&self, message: &Message) -> String {
        let time = message
            .timestamp
            .with_timezone(&chrono::Local)
            .format("%H:%M");
        let (avatar, name, color) = match message.sender {
            Sender::User => ("U", "You", self.palette.user),
            Sender::Assistant => ("M", "MindMingle", self.palette.assistant),
        };
        format!(
            "{} {} {}",
            format!("[{}]", avatar).color(color).bold(),
            name.color(color).bold(),
            time.to_string().color(self.palette.muted)
        )
    }

    pub fn message(&self, message: &Message) -> String {
        let body = if message.is_typing {
            "typing...".color(self.palette.muted).italic().to_string()
        } else {
            message.content.clone()
        };
        format!("{}\n{}\n", self.message_label(message), body)
    }

    /// Full transcript of a session
    pub fn conversation(&self, session: &ChatSession) -> String {
        let mut output = format!("\n{}\n\n", self.header(&session.title));
        if session.messages.is_empty() {
            output.push_str(&format!(
                "{}\n",
                "No messages yet. Say hello!".color(self.palette.muted)
            ));
        }
        for message in &session.messages {
            output.push_str(&self.message(message));
            output.push('\n');
        }
        output
    }

    /// Session list with the active one marked.
    ///
    /// Each entry carries its 1-based position in the full list, so filtered
    /// results keep the numbers `/switch` understands.
    pub fn session_list(
        &self,
        entries: &[(usize, &ChatSession)],
        active_id: Option<&str>,
    ) -> String {
        if entries.is_empty() {
            return format!("{}\n", "No matching chats.".color(self.palette.muted));
        }

        let mut output = String::new();
        for (number, session) in entries {
            let is_active = active_id == Some(session.id.as_str());
            let marker = if is_active { "*" } else { " " };
            let title = if is_active {
                session.title.color(self.palette.accent).bold().to_string()
            } else {
                session.title.clone()
            };
            output.push_str(&format!(
                "{} {:>2}. {} {}\n",
                marker.color(self.palette.accent),
                number,
                title,
                format!("({} messages)", session.messages.len()).color(self.palette.muted)
            ));
        }
        output
    }

    pub fn notice(&self, text: &str) -> String {
        format!("{} {}", "::".color(self.palette.accent), text)
    }

    pub fn error(&self, text: &str) -> String {
        format!("{} {}", "!!".color(self.palette.error).bold(), text.color(self.palette.error))
    }

    /// Screen shown when no session is active
    pub fn welcome(&self) -> String {
        format!(
            "\n{}\n{}\n",
            "Welcome to MindMingle".color(self.palette.accent).bold(),
            "Start a new chat with /new or pick one with /list and /switch.".color(self.palette.muted)
        )
    }
}
