use chatdb_core::{update, AppState, Msg, ResultsView};

#[test]
fn typing_alone_changes_nothing_visible() {
    let state = AppState::new();
    let (mut next, effects) = update(state, Msg::InputChanged("SELECT 1".to_string()));

    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
    let view = next.view();
    assert_eq!(view.input, "SELECT 1");
    assert!(view.chat.is_empty());
    assert!(view.queries.is_empty());
    assert_eq!(view.results, ResultsView::Empty);
}

#[test]
fn dirty_flag_is_consumed_once() {
    let state = AppState::new();
    let (state, _) = update(state, Msg::InputChanged("hi".to_string()));
    let (mut state, _) = update(state, Msg::SendClicked);

    assert!(state.view().dirty);
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());
    assert!(!state.view().dirty);
}
