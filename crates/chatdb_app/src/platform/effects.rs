use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use chatdb_core::{DiagnosticLevel, Effect, Msg, RequestResult};
use chatdb_engine::{
    ClientSettings, EngineError, EngineEvent, EngineHandle, FailureKind, RequestError, UploadFile,
};
use engine_logging::{engine_info, engine_log, engine_trace};

use super::app::UiEvent;

/// Executes core effects and feeds engine completions back as messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(
        settings: ClientSettings,
        event_tx: mpsc::Sender<UiEvent>,
    ) -> Result<Self, EngineError> {
        engine_info!("Uploads go to {}", settings.endpoint);
        engine_info!("API calls go to {}", settings.api_base);
        let engine = EngineHandle::new(settings)?;
        let runner = Self { engine };
        runner.spawn_event_loop(event_tx);
        Ok(runner)
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Upload { request_id, file } => {
                    engine_info!(
                        "Upload {} started for {} ({:?})",
                        request_id,
                        file.name,
                        file.path
                    );
                    self.engine.upload(
                        request_id,
                        UploadFile {
                            file_name: file.name,
                            path: file.path,
                        },
                    );
                }
                Effect::Call { request_id, call } => {
                    engine_info!("Request {} started for /{}", request_id, call.route());
                    self.engine.call(request_id, call.route(), call.body());
                }
                Effect::CancelRequest { request_id } => {
                    engine_info!("Request {} superseded; cancelling", request_id);
                    self.engine.cancel(request_id);
                }
                Effect::ScrollToBottom { element } => {
                    // The terminal always shows the newest line last.
                    engine_trace!("Scroll {} to bottom", element.dom_id());
                }
                Effect::Diagnostic { level, message } => {
                    engine_log!(log_level(level), "{}", message);
                }
            }
        }
    }

    fn spawn_event_loop(&self, event_tx: mpsc::Sender<UiEvent>) {
        let engine = self.engine.clone();
        thread::spawn(move || loop {
            if let Some(event) = engine.try_recv() {
                if event_tx.send(UiEvent::Msg(completion_msg(event))).is_err() {
                    break;
                }
            } else {
                thread::sleep(Duration::from_millis(20));
            }
        });
    }
}

fn completion_msg(event: EngineEvent) -> Msg {
    let (request_id, result) = match event {
        EngineEvent::UploadCompleted { request_id, result } => {
            (request_id, result.map(|output| (output.status, output.body)))
        }
        EngineEvent::CallCompleted { request_id, result } => {
            (request_id, result.map(|output| (output.status, output.body)))
        }
    };
    Msg::RequestCompleted {
        request_id,
        result: map_result(result),
    }
}

/// Status and JSON body on success.
fn map_result(result: Result<(u16, serde_json::Value), RequestError>) -> RequestResult {
    match result {
        Ok((status, body)) => RequestResult::Completed { status, body },
        Err(err) if err.kind == FailureKind::Cancelled => RequestResult::Cancelled,
        Err(err) => RequestResult::Failed {
            message: err.to_string(),
        },
    }
}

fn log_level(level: DiagnosticLevel) -> log::Level {
    match level {
        DiagnosticLevel::Error => log::Level::Error,
        DiagnosticLevel::Warn => log::Level::Warn,
        DiagnosticLevel::Debug => log::Level::Debug,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatdb_engine::ApiOutput;

    fn error(kind: FailureKind, message: &str) -> RequestError {
        RequestError {
            kind,
            message: message.to_string(),
        }
    }

    #[test]
    fn cancelled_requests_map_to_cancelled() {
        let result = map_result(Err(error(FailureKind::Cancelled, "stop")));
        assert_eq!(result, RequestResult::Cancelled);
    }

    #[test]
    fn failures_carry_kind_and_detail() {
        let result = map_result(Err(error(FailureKind::Network, "connection refused")));
        assert_eq!(
            result,
            RequestResult::Failed {
                message: "network error: connection refused".to_string()
            }
        );
    }

    #[test]
    fn outputs_keep_status_and_body() {
        let body: serde_json::Value = serde_json::from_str(r#"{"status":"ok"}"#).unwrap();
        let result = map_result(Ok((201, body.clone())));
        assert_eq!(result, RequestResult::Completed { status: 201, body });
    }

    #[test]
    fn call_completions_become_request_messages() {
        let event = EngineEvent::CallCompleted {
            request_id: 9,
            result: Ok(ApiOutput {
                status: 200,
                body: serde_json::json!({"response": "hi"}),
            }),
        };
        assert_eq!(
            completion_msg(event),
            Msg::RequestCompleted {
                request_id: 9,
                result: RequestResult::Completed {
                    status: 200,
                    body: serde_json::json!({"response": "hi"}),
                },
            }
        );
    }

    #[test]
    fn diagnostic_levels_map_onto_log_levels() {
        assert_eq!(log_level(DiagnosticLevel::Error), log::Level::Error);
        assert_eq!(log_level(DiagnosticLevel::Warn), log::Level::Warn);
        assert_eq!(log_level(DiagnosticLevel::Debug), log::Level::Debug);
    }
}
