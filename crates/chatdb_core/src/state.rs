use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::view_model::{AppViewModel, ChatEntryView, QueryItemView, ResultsView, Sender};
use crate::PageLayout;

pub type RequestId = u64;

/// A file picked in the file input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub path: PathBuf,
}

impl SelectedFile {
    /// Uses the last path component as the display and upload name.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = file_name_of(&path);
        Self { name, path }
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// How completions of overlapping results requests are applied to the results area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlapPolicy {
    /// Every completion overwrites the results; whichever resolves last wins.
    #[default]
    LastResolvedWins,
    /// A new request cancels the ones still in flight; only its result shows.
    LatestRequestWins,
}

/// What the engine reports back for one upload or API call.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestResult {
    /// The server answered with a JSON body (any HTTP status).
    Completed {
        status: u16,
        body: serde_json::Value,
    },
    /// Reading the file, sending, or parsing the response failed.
    Failed { message: String },
    /// The request was aborted before it resolved.
    Cancelled,
}

/// Where the answer to an in-flight request goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RequestKind {
    Upload,
    /// Explore, translate or execute; shown in the results area.
    Lookup,
    ChatReply,
}

impl RequestKind {
    pub(crate) fn targets_results(self) -> bool {
        !matches!(self, RequestKind::ChatReply)
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            RequestKind::Upload => "Upload",
            RequestKind::Lookup => "Request",
            RequestKind::ChatReply => "Chat reply",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    layout: PageLayout,
    overlap: OverlapPolicy,
    chat_replies: bool,
    input: String,
    chat: Vec<ChatEntryView>,
    queries: Vec<QueryItemView>,
    selection: Option<SelectedFile>,
    results: ResultsView,
    results_revision: u64,
    next_request_id: RequestId,
    in_flight: BTreeMap<RequestId, RequestKind>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(layout: PageLayout, overlap: OverlapPolicy) -> Self {
        Self {
            layout,
            overlap,
            ..Self::default()
        }
    }

    /// Forward every sent message to the chat endpoint and show its reply.
    pub fn with_chat_replies(mut self, enabled: bool) -> Self {
        self.chat_replies = enabled;
        self
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            input: self.input.clone(),
            chat: self.chat.clone(),
            queries: self.queries.clone(),
            selected_file: self.selection.as_ref().map(|file| file.name.clone()),
            results: self.results.clone(),
            results_revision: self.results_revision,
            requests_in_flight: self.in_flight.len(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything visible changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub fn overlap_policy(&self) -> OverlapPolicy {
        self.overlap
    }

    pub fn chat_replies(&self) -> bool {
        self.chat_replies
    }

    pub(crate) fn input(&self) -> &str {
        &self.input
    }

    pub(crate) fn set_input(&mut self, text: String) {
        self.input = text;
    }

    pub(crate) fn clear_input(&mut self) {
        self.input.clear();
        self.dirty = true;
    }

    pub(crate) fn push_chat(&mut self, sender: Sender, text: &str) {
        self.chat.push(ChatEntryView {
            sender,
            text: text.to_owned(),
        });
        self.dirty = true;
    }

    pub(crate) fn push_query(&mut self, text: &str) {
        self.queries.push(QueryItemView {
            text: text.to_owned(),
        });
        self.dirty = true;
    }

    pub(crate) fn select_file(&mut self, file: Option<SelectedFile>) {
        self.selection = file;
        self.dirty = true;
    }

    pub(crate) fn selected_file(&self) -> Option<&SelectedFile> {
        self.selection.as_ref()
    }

    pub(crate) fn set_results(&mut self, results: ResultsView) {
        self.results = results;
        self.results_revision += 1;
        self.dirty = true;
    }

    /// Allocates the id for a new request and records it as in flight.
    pub(crate) fn begin_request(&mut self, kind: RequestKind) -> RequestId {
        self.next_request_id += 1;
        let request_id = self.next_request_id;
        self.in_flight.insert(request_id, kind);
        self.dirty = true;
        request_id
    }

    /// Removes every in-flight request aimed at the results area and returns their ids.
    pub(crate) fn supersede_results_requests(&mut self) -> Vec<RequestId> {
        let superseded: Vec<_> = self
            .in_flight
            .iter()
            .filter(|(_, kind)| kind.targets_results())
            .map(|(request_id, _)| *request_id)
            .collect();
        for request_id in &superseded {
            self.in_flight.remove(request_id);
        }
        if !superseded.is_empty() {
            self.dirty = true;
        }
        superseded
    }

    /// Returns `None` if the request was not in flight (unknown or superseded).
    pub(crate) fn finish_request(&mut self, request_id: RequestId) -> Option<RequestKind> {
        let kind = self.in_flight.remove(&request_id);
        if kind.is_some() {
            self.dirty = true;
        }
        kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selected_file_takes_name_from_last_component() {
        let file = SelectedFile::from_path("/tmp/data/airtravel.csv");
        assert_eq!(file.name, "airtravel.csv");
        assert_eq!(file.path, PathBuf::from("/tmp/data/airtravel.csv"));
    }

    #[test]
    fn request_ids_increase_from_one() {
        let mut state = AppState::new();
        assert_eq!(state.begin_request(RequestKind::Upload), 1);
        assert_eq!(state.begin_request(RequestKind::Lookup), 2);
        assert_eq!(state.supersede_results_requests(), vec![1, 2]);
        assert_eq!(state.finish_request(1), None);
        assert_eq!(state.begin_request(RequestKind::Upload), 3);
        assert_eq!(state.finish_request(3), Some(RequestKind::Upload));
    }

    #[test]
    fn chat_replies_survive_superseding() {
        let mut state = AppState::new();
        let reply = state.begin_request(RequestKind::ChatReply);
        let upload = state.begin_request(RequestKind::Upload);

        assert_eq!(state.supersede_results_requests(), vec![upload]);
        assert_eq!(state.finish_request(reply), Some(RequestKind::ChatReply));
    }

    #[test]
    fn every_results_write_bumps_the_revision() {
        let mut state = AppState::new();
        state.set_results(ResultsView::Notice("same".to_string()));
        state.set_results(ResultsView::Notice("same".to_string()));
        assert_eq!(state.view().results_revision, 2);
    }
}
