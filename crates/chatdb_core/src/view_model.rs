/// Who wrote a chat entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    /// Replies from the server's chat endpoint.
    Bot,
}

impl Sender {
    pub fn tag(self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntryView {
    pub sender: Sender,
    pub text: String,
}

impl ChatEntryView {
    /// Class list of the entry, e.g. `chat-message user`.
    pub fn class(&self) -> String {
        format!("chat-message {}", self.sender.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryItemView {
    pub text: String,
}

impl QueryItemView {
    pub const CLASS: &'static str = "query-item";
}

/// Content of the results area.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResultsView {
    #[default]
    Empty,
    /// A short paragraph for prompts and errors.
    Notice(String),
    /// Preformatted text, used for the pretty-printed JSON response.
    Preformatted(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub input: String,
    pub chat: Vec<ChatEntryView>,
    pub queries: Vec<QueryItemView>,
    pub selected_file: Option<String>,
    pub results: ResultsView,
    /// Bumped on every write to the results area, even an identical one.
    pub results_revision: u64,
    pub requests_in_flight: usize,
    pub dirty: bool,
}
