use crate::{DbType, RequestId, RequestResult, SelectedFile};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User edited the message input box.
    InputChanged(String),
    /// User clicked Send.
    SendClicked,
    /// User picked files in the file input. Only the first one is kept.
    FilesSelected(Vec<SelectedFile>),
    /// User clicked Upload.
    UploadClicked,
    /// User asked for the tables or collections of a database.
    ExploreRequested(DbType),
    /// User asked for the SQL behind a natural-language question.
    TranslateRequested(String),
    ExecuteRequested { query: String, db_type: DbType },
    /// Engine finished (or gave up on) an upload or API call.
    RequestCompleted {
        request_id: RequestId,
        result: RequestResult,
    },
}
