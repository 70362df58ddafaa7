use std::sync::Once;

use chatdb_core::{
    update, AppState, DiagnosticLevel, Effect, ElementId, Msg, OverlapPolicy, PageLayout,
    QueryItemView, Sender, QUERY_LIST_MISSING, SEND_BUTTON_MISSING,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn send(state: AppState, input: &str) -> (AppState, Vec<Effect>) {
    let (state, _) = update(state, Msg::InputChanged(input.to_string()));
    update(state, Msg::SendClicked)
}

#[test]
fn hello_lands_in_chat_box_and_query_list() {
    init_logging();
    let (mut state, effects) = send(AppState::new(), "Hello");
    let view = state.view();

    assert_eq!(view.chat.len(), 1);
    assert_eq!(view.chat[0].class(), "chat-message user");
    assert_eq!(view.chat[0].sender, Sender::User);
    assert_eq!(view.chat[0].text, "Hello");
    assert_eq!(
        view.queries,
        vec![QueryItemView {
            text: "Hello".to_string()
        }]
    );
    assert_eq!(QueryItemView::CLASS, "query-item");
    assert_eq!(view.input, "");
    assert_eq!(
        effects,
        vec![Effect::ScrollToBottom {
            element: ElementId::ChatBox
        }]
    );
    assert!(state.consume_dirty());
}

#[test]
fn blank_input_is_ignored_and_kept() {
    init_logging();
    for input in ["", " ", "   ", "\t\n", " \r\n \t "] {
        let (mut state, effects) = send(AppState::new(), input);
        let view = state.view();

        assert!(view.chat.is_empty(), "chat entry for {input:?}");
        assert!(view.queries.is_empty(), "query entry for {input:?}");
        assert_eq!(view.input, input);
        assert!(effects.is_empty());
        assert!(!state.consume_dirty());
    }
}

#[test]
fn message_is_trimmed_before_appending() {
    init_logging();
    let (state, _) = send(AppState::new(), "  show all tables \n");
    let view = state.view();

    assert_eq!(view.chat[0].text, "show all tables");
    assert_eq!(view.queries[0].text, "show all tables");
    assert_eq!(view.input, "");
}

#[test]
fn every_send_appends_exactly_one_entry_each() {
    init_logging();
    let inputs = ["first", "second", "  third  ", "", "fourth"];
    let mut state = AppState::new();
    let mut scrolls = 0;
    for input in inputs {
        let (next, effects) = send(state, input);
        scrolls += effects
            .iter()
            .filter(|effect| matches!(effect, Effect::ScrollToBottom { .. }))
            .count();
        state = next;
    }
    let view = state.view();

    let chat: Vec<_> = view.chat.iter().map(|entry| entry.text.as_str()).collect();
    let queries: Vec<_> = view.queries.iter().map(|item| item.text.as_str()).collect();
    assert_eq!(chat, vec!["first", "second", "third", "fourth"]);
    assert_eq!(queries, chat);
    assert_eq!(scrolls, 4);
}

#[test]
fn missing_query_list_logs_and_still_sends() {
    init_logging();
    let layout = PageLayout::full().without(ElementId::QueryList);
    let state = AppState::with_settings(layout, OverlapPolicy::default());

    let (state, effects) = send(state, "Hello");
    let view = state.view();

    assert_eq!(view.chat.len(), 1);
    assert!(view.queries.is_empty());
    assert_eq!(view.input, "");
    assert_eq!(
        effects,
        vec![
            Effect::ScrollToBottom {
                element: ElementId::ChatBox
            },
            Effect::Diagnostic {
                level: DiagnosticLevel::Error,
                message: QUERY_LIST_MISSING.to_string(),
            },
        ]
    );
}

#[test]
fn missing_chat_box_skips_entry_and_scroll() {
    init_logging();
    let layout = PageLayout::full().without(ElementId::ChatBox);
    let state = AppState::with_settings(layout, OverlapPolicy::default());

    let (state, effects) = send(state, "Hello");
    let view = state.view();

    assert!(view.chat.is_empty());
    assert_eq!(view.queries.len(), 1);
    assert!(!effects
        .iter()
        .any(|effect| matches!(effect, Effect::ScrollToBottom { .. })));
    assert!(effects.iter().any(|effect| matches!(
        effect,
        Effect::Diagnostic {
            level: DiagnosticLevel::Error,
            ..
        }
    )));
}

fn send_without(element: ElementId, input: &str) -> (AppState, Vec<Effect>) {
    let layout = PageLayout::full().without(element);
    send(AppState::with_settings(layout, OverlapPolicy::default()), input)
}

#[test]
fn missing_send_button_sends_nothing() {
    init_logging();
    let (mut state, effects) = send_without(ElementId::SendButton, "Hello");
    let view = state.view();

    assert_eq!(
        effects,
        vec![Effect::Diagnostic {
            level: DiagnosticLevel::Error,
            message: SEND_BUTTON_MISSING.to_string(),
        }]
    );
    assert_eq!(SEND_BUTTON_MISSING, "Send button element not found");
    assert!(view.chat.is_empty());
    assert!(view.queries.is_empty());
    assert_eq!(view.input, "Hello");
    assert!(!state.consume_dirty());
}

#[test]
fn missing_user_input_sends_nothing() {
    init_logging();
    let (mut state, effects) = send_without(ElementId::UserInput, "Hello");
    let view = state.view();

    assert_eq!(
        effects,
        vec![Effect::Diagnostic {
            level: DiagnosticLevel::Error,
            message: "User input element not found".to_string(),
        }]
    );
    assert!(view.chat.is_empty());
    assert!(view.queries.is_empty());
    assert_eq!(view.input, "Hello");
    assert!(!state.consume_dirty());
}
