use crate::{ApiCall, ElementId, RequestId, SelectedFile};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send the file to the upload endpoint.
    Upload {
        request_id: RequestId,
        file: SelectedFile,
    },
    /// POST a JSON request to an `/api` route.
    Call {
        request_id: RequestId,
        call: ApiCall,
    },
    /// Abort an in-flight request that has been superseded.
    CancelRequest { request_id: RequestId },
    /// Scroll the element so its newest child is visible.
    ScrollToBottom { element: ElementId },
    /// Record a message on the diagnostic channel (the log).
    Diagnostic {
        level: DiagnosticLevel,
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    Error,
    Warn,
    Debug,
}

impl Effect {
    pub(crate) fn error(message: impl Into<String>) -> Self {
        Effect::Diagnostic {
            level: DiagnosticLevel::Error,
            message: message.into(),
        }
    }

    pub(crate) fn warn(message: impl Into<String>) -> Self {
        Effect::Diagnostic {
            level: DiagnosticLevel::Warn,
            message: message.into(),
        }
    }

    pub(crate) fn debug(message: impl Into<String>) -> Self {
        Effect::Diagnostic {
            level: DiagnosticLevel::Debug,
            message: message.into(),
        }
    }
}
