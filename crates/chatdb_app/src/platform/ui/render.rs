use chatdb_core::{AppViewModel, ResultsView};

/// Turns view-model snapshots into terminal lines, printing only what changed.
///
/// The chat log and query list are append-only, so the renderer remembers how
/// many entries it has already shown.
#[derive(Debug, Default)]
pub struct Renderer {
    chat_shown: usize,
    queries_shown: usize,
    selection: Option<String>,
    requests_in_flight: usize,
    results_revision: u64,
}

impl Renderer {
    pub fn render(&mut self, view: &AppViewModel) -> Vec<String> {
        let mut lines = Vec::new();

        for entry in view.chat.iter().skip(self.chat_shown) {
            lines.push(format!("{}> {}", entry.sender.tag(), entry.text));
        }
        self.chat_shown = view.chat.len();

        for (index, item) in view.queries.iter().enumerate().skip(self.queries_shown) {
            lines.push(format!("  [query {}] {}", index + 1, item.text));
        }
        self.queries_shown = view.queries.len();

        if view.selected_file != self.selection {
            lines.push(match &view.selected_file {
                Some(name) => format!("Selected file: {name}"),
                None => "No file selected".to_string(),
            });
            self.selection = view.selected_file.clone();
        }

        if view.requests_in_flight != self.requests_in_flight {
            lines.push(format!("Requests in flight: {}", view.requests_in_flight));
            self.requests_in_flight = view.requests_in_flight;
        }

        // A repeated notice is a new write, so compare revisions, not content.
        if view.results_revision != self.results_revision {
            match &view.results {
                ResultsView::Empty => {}
                ResultsView::Notice(text) => lines.push(text.clone()),
                ResultsView::Preformatted(text) => {
                    lines.push("Results:".to_string());
                    lines.extend(text.lines().map(|line| format!("  {line}")));
                }
            }
            self.results_revision = view.results_revision;
        }

        lines
    }
}
