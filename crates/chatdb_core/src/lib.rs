//! ChatDB core: pure page state machine and view-model helpers.
mod api;
mod effect;
mod msg;
mod page;
mod state;
mod update;
mod view_model;

pub use api::{ApiCall, DbType};
pub use effect::{DiagnosticLevel, Effect};
pub use msg::Msg;
pub use page::{ElementId, PageLayout};
pub use state::{AppState, OverlapPolicy, RequestId, RequestResult, SelectedFile};
pub use update::{
    update, CHAT_BOX_MISSING, CHAT_REPLY_ERROR, QUERY_LIST_MISSING, QUERY_PROMPT,
    REQUEST_ERROR_MESSAGE, RESULTS_MISSING, SELECT_FILE_PROMPT, SEND_BUTTON_MISSING,
    UPLOAD_ERROR_MESSAGE,
};
pub use view_model::{AppViewModel, ChatEntryView, QueryItemView, ResultsView, Sender};
