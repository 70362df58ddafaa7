//! ChatDB engine: upload and API request IO.
mod client;
mod engine;
mod types;

pub use client::{
    ApiClient, ClientSettings, ReqwestClient, Uploader, DEFAULT_API_BASE, DEFAULT_ENDPOINT,
};
pub use engine::{EngineError, EngineHandle};
pub use types::{
    ApiOutput, EngineEvent, FailureKind, RequestError, RequestId, UploadFile, UploadOutput,
};
