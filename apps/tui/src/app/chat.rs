use chrono::{DateTime, Local};

pub const GREETING: &str =
    "¡Hola! Soy el asistente de GeoMapVal. Pregúntame sobre los proyectos, zonas o precios.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    pub role: ChatRole,
    pub text: String,
    pub at: DateTime<Local>,
}

impl ChatEntry {
    fn new(role: ChatRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            at: Local::now(),
        }
    }

    pub fn timestamp(&self) -> String {
        self.at.format("%H:%M").to_string()
    }
}

/// Conversation with the backend assistant. Independent of the project
/// pipeline; a failure here only adds an error entry.
#[derive(Debug, Clone)]
pub struct ChatState {
    entries: Vec<ChatEntry>,
    pending: bool,
}

impl Default for ChatState {
    fn default() -> Self {
        Self {
            entries: vec![ChatEntry::new(ChatRole::Assistant, GREETING)],
            pending: false,
        }
    }
}

impl ChatState {
    /// Records the user's message. Returns the trimmed text to send, or
    /// `None` when it is blank or a reply is still pending.
    pub fn submit(&mut self, message: &str) -> Option<String> {
        let message = message.trim();
        if message.is_empty() || self.pending {
            return None;
        }
        self.entries.push(ChatEntry::new(ChatRole::User, message));
        self.pending = true;
        Some(message.to_string())
    }

    pub fn receive(&mut self, reply: String) {
        self.entries.push(ChatEntry::new(ChatRole::Assistant, reply));
        self.pending = false;
    }

    pub fn fail(&mut self, error: &str) {
        self.entries.push(ChatEntry::new(
            ChatRole::Error,
            format!("No pude responder: {error}"),
        ));
        self.pending = false;
    }

    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    /// Whether the "escribiendo..." indicator is shown.
    pub const fn is_pending(&self) -> bool {
        self.pending
    }
}
