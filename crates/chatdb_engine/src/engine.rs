use std::collections::HashMap;
use std::future::Future;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use engine_logging::{engine_debug, engine_warn};
use serde_json::Value;
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

use crate::client::{ApiClient, ClientSettings, ReqwestClient, Uploader};
use crate::{EngineEvent, FailureKind, RequestError, RequestId, UploadFile};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start request runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("failed to build http client: {0}")]
    Client(#[from] RequestError),
}

enum EngineCommand {
    Upload {
        request_id: RequestId,
        file: UploadFile,
    },
    Call {
        request_id: RequestId,
        route: String,
        body: Value,
    },
    Cancel {
        request_id: RequestId,
    },
}

/// Owns the runtime and the clients; lives on the engine thread.
struct Worker {
    runtime: Runtime,
    uploader: Arc<dyn Uploader>,
    api: Arc<dyn ApiClient>,
    in_flight: Arc<Mutex<HashMap<RequestId, CancellationToken>>>,
    event_tx: mpsc::Sender<EngineEvent>,
}

/// Runs uploads and API calls on a background tokio runtime.
///
/// Each request is an independent task; completions arrive through
/// [`EngineHandle::try_recv`] in the order they resolve.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings) -> Result<Self, EngineError> {
        let client = Arc::new(ReqwestClient::new(settings)?);
        Self::with_clients(client.clone(), client)
    }

    pub fn with_clients(
        uploader: Arc<dyn Uploader>,
        api: Arc<dyn ApiClient>,
    ) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("chatdb-request")
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let worker = Worker {
                runtime,
                uploader,
                api,
                in_flight: Arc::default(),
                event_tx,
            };
            while let Ok(command) = cmd_rx.recv() {
                worker.handle(command);
            }
        });

        Ok(Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        })
    }

    pub fn upload(&self, request_id: RequestId, file: UploadFile) {
        self.send(EngineCommand::Upload { request_id, file });
    }

    /// POSTs `body` to the API route `route`.
    pub fn call(&self, request_id: RequestId, route: impl Into<String>, body: Value) {
        self.send(EngineCommand::Call {
            request_id,
            route: route.into(),
            body,
        });
    }

    pub fn cancel(&self, request_id: RequestId) {
        self.send(EngineCommand::Cancel { request_id });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            engine_warn!("Request engine has stopped; command dropped");
        }
    }
}

impl Worker {
    fn handle(&self, command: EngineCommand) {
        match command {
            EngineCommand::Upload { request_id, file } => {
                let uploader = self.uploader.clone();
                let task = async move { uploader.upload(request_id, &file).await };
                self.spawn(request_id, task, |request_id, result| {
                    EngineEvent::UploadCompleted { request_id, result }
                });
            }
            EngineCommand::Call {
                request_id,
                route,
                body,
            } => {
                let api = self.api.clone();
                let task = async move { api.call(request_id, &route, &body).await };
                self.spawn(request_id, task, |request_id, result| {
                    EngineEvent::CallCompleted { request_id, result }
                });
            }
            EngineCommand::Cancel { request_id } => {
                let token = self
                    .in_flight
                    .lock()
                    .ok()
                    .and_then(|mut tokens| tokens.remove(&request_id));
                match token {
                    Some(token) => token.cancel(),
                    None => engine_debug!("Request {} not in flight; cancel ignored", request_id),
                }
            }
        }
    }

    /// Runs `task` until it resolves or its cancellation token fires, then
    /// reports the outcome.
    fn spawn<T, F, E>(&self, request_id: RequestId, task: F, into_event: E)
    where
        F: Future<Output = Result<T, RequestError>> + Send + 'static,
        E: FnOnce(RequestId, Result<T, RequestError>) -> EngineEvent + Send + 'static,
    {
        let token = CancellationToken::new();
        if let Ok(mut tokens) = self.in_flight.lock() {
            tokens.insert(request_id, token.clone());
        }
        let in_flight = self.in_flight.clone();
        let event_tx = self.event_tx.clone();
        self.runtime.spawn(async move {
            let result = tokio::select! {
                result = task => result,
                _ = token.cancelled() => Err(RequestError::new(
                    FailureKind::Cancelled,
                    "request cancelled before completion",
                )),
            };
            if let Ok(mut tokens) = in_flight.lock() {
                tokens.remove(&request_id);
            }
            if event_tx.send(into_event(request_id, result)).is_err() {
                engine_warn!("Request {} finished after the UI went away", request_id);
            }
        });
    }
}
