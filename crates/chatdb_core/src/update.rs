use serde_json::Value;

use crate::state::RequestKind;
use crate::{
    ApiCall, AppState, Effect, ElementId, Msg, OverlapPolicy, RequestId, RequestResult, ResultsView,
    Sender,
};

pub const SELECT_FILE_PROMPT: &str = "Please select a file to upload.";
pub const QUERY_PROMPT: &str = "Please enter a query.";
pub const UPLOAD_ERROR_MESSAGE: &str = "Error uploading file. Please check the console.";
pub const REQUEST_ERROR_MESSAGE: &str = "Error contacting the server. Please check the console.";
pub const CHAT_REPLY_ERROR: &str = "Error: the chat service could not be reached.";
pub const SEND_BUTTON_MISSING: &str = "Send button element not found";
pub const QUERY_LIST_MISSING: &str = "Query list element not found";
pub const CHAT_BOX_MISSING: &str = "Chat box element not found";
pub const RESULTS_MISSING: &str = "Results element not found";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(text) => {
            // The field already shows what was typed; nothing to re-render.
            state.set_input(text);
            Vec::new()
        }
        Msg::SendClicked => send_message(&mut state),
        Msg::FilesSelected(files) => {
            state.select_file(files.into_iter().next());
            Vec::new()
        }
        Msg::UploadClicked => upload_file(&mut state),
        Msg::ExploreRequested(db_type) => lookup(&mut state, ApiCall::Explore { db_type }),
        Msg::TranslateRequested(query) => {
            lookup_query(&mut state, &query, |query| ApiCall::NlToSql { query })
        }
        Msg::ExecuteRequested { query, db_type } => {
            lookup_query(&mut state, &query, |query| ApiCall::ExecuteQuery { query, db_type })
        }
        Msg::RequestCompleted { request_id, result } => {
            apply_request_result(&mut state, request_id, result)
        }
    };

    (state, effects)
}

fn send_message(state: &mut AppState) -> Vec<Effect> {
    if !state.layout().is_mounted(ElementId::SendButton) {
        return vec![Effect::error(SEND_BUTTON_MISSING)];
    }
    if !state.layout().is_mounted(ElementId::UserInput) {
        return vec![Effect::error("User input element not found")];
    }
    let message = state.input().trim().to_owned();
    if message.is_empty() {
        return Vec::new();
    }

    let mut effects = Vec::new();
    add_message_to_chat(state, &message, Sender::User, &mut effects);
    add_query_to_list(state, &message, &mut effects);
    state.clear_input();

    if state.chat_replies() {
        let request_id = state.begin_request(RequestKind::ChatReply);
        effects.push(Effect::Call {
            request_id,
            call: ApiCall::Chat { message },
        });
    }
    effects
}

fn add_message_to_chat(
    state: &mut AppState,
    message: &str,
    sender: Sender,
    effects: &mut Vec<Effect>,
) {
    if !state.layout().is_mounted(ElementId::ChatBox) {
        effects.push(Effect::error(CHAT_BOX_MISSING));
        return;
    }
    state.push_chat(sender, message);
    effects.push(Effect::ScrollToBottom {
        element: ElementId::ChatBox,
    });
}

fn add_query_to_list(state: &mut AppState, query: &str, effects: &mut Vec<Effect>) {
    if !state.layout().is_mounted(ElementId::QueryList) {
        effects.push(Effect::error(QUERY_LIST_MISSING));
        return;
    }
    state.push_query(query);
}

fn upload_file(state: &mut AppState) -> Vec<Effect> {
    if !state.layout().is_mounted(ElementId::FileInput) {
        return vec![Effect::error("File input element not found")];
    }

    let mut effects = Vec::new();
    let Some(file) = state.selected_file().cloned() else {
        let prompt = ResultsView::Notice(SELECT_FILE_PROMPT.to_owned());
        show_results(state, prompt, &mut effects);
        return effects;
    };

    let request_id = start_results_request(state, RequestKind::Upload, &mut effects);
    effects.push(Effect::Upload { request_id, file });
    effects
}

/// Blank queries get a prompt in the results area instead of a request.
fn lookup_query(
    state: &mut AppState,
    query: &str,
    call: impl FnOnce(String) -> ApiCall,
) -> Vec<Effect> {
    let query = query.trim();
    if query.is_empty() {
        let mut effects = Vec::new();
        show_results(state, ResultsView::Notice(QUERY_PROMPT.to_owned()), &mut effects);
        return effects;
    }
    lookup(state, call(query.to_owned()))
}

fn lookup(state: &mut AppState, call: ApiCall) -> Vec<Effect> {
    let mut effects = Vec::new();
    let request_id = start_results_request(state, RequestKind::Lookup, &mut effects);
    effects.push(Effect::Call { request_id, call });
    effects
}

fn start_results_request(
    state: &mut AppState,
    kind: RequestKind,
    effects: &mut Vec<Effect>,
) -> RequestId {
    if state.overlap_policy() == OverlapPolicy::LatestRequestWins {
        for request_id in state.supersede_results_requests() {
            effects.push(Effect::CancelRequest { request_id });
        }
    }
    state.begin_request(kind)
}

fn apply_request_result(
    state: &mut AppState,
    request_id: RequestId,
    result: RequestResult,
) -> Vec<Effect> {
    let Some(kind) = state.finish_request(request_id) else {
        return vec![Effect::debug(format!(
            "Ignoring result of request {request_id}: superseded or unknown"
        ))];
    };

    let mut effects = Vec::new();
    match result {
        RequestResult::Completed { status, body } => {
            if !(200..300).contains(&status) {
                effects.push(Effect::warn(format!(
                    "{} {request_id} answered with HTTP status {status}",
                    kind.label()
                )));
            }
            if kind.targets_results() {
                match serde_json::to_string_pretty(&body) {
                    Ok(pretty) => {
                        show_results(state, ResultsView::Preformatted(pretty), &mut effects)
                    }
                    Err(err) => show_request_error(state, kind, &err.to_string(), &mut effects),
                }
            } else {
                add_message_to_chat(state, &reply_text(&body), Sender::Bot, &mut effects);
            }
        }
        RequestResult::Failed { message } => {
            show_request_error(state, kind, &message, &mut effects)
        }
        RequestResult::Cancelled => {
            effects.push(Effect::debug(format!("{} {request_id} was cancelled", kind.label())));
        }
    }
    effects
}

/// The chat endpoint answers `{"response": ...}`; the value is usually text
/// but may be a query result.
fn reply_text(body: &Value) -> String {
    let value = match body.get("response") {
        Some(Value::String(text)) => return text.clone(),
        Some(value) => value,
        None => body,
    };
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn show_request_error(
    state: &mut AppState,
    kind: RequestKind,
    detail: &str,
    effects: &mut Vec<Effect>,
) {
    effects.push(Effect::error(format!("Error: {detail}")));
    match kind {
        RequestKind::Upload => {
            let notice = ResultsView::Notice(UPLOAD_ERROR_MESSAGE.to_owned());
            show_results(state, notice, effects);
        }
        RequestKind::Lookup => {
            let notice = ResultsView::Notice(REQUEST_ERROR_MESSAGE.to_owned());
            show_results(state, notice, effects);
        }
        RequestKind::ChatReply => {
            add_message_to_chat(state, CHAT_REPLY_ERROR, Sender::Bot, effects);
        }
    }
}

fn show_results(state: &mut AppState, results: ResultsView, effects: &mut Vec<Effect>) {
    if !state.layout().is_mounted(ElementId::Results) {
        effects.push(Effect::error(RESULTS_MISSING));
        return;
    }
    state.set_results(results);
}
