//! Shared fakes for the integration tests: a scripted backend and a
//! navigator that records where it was sent.

#![allow(dead_code)]

use async_trait::async_trait;
use resume_builder::config::{BlobStore, DesignStore, MemoryBlobStore};
use resume_builder::models::ResumeDocument;
use resume_builder::services::{
    BackendClient, EnhanceRequest, EnhanceResponse, GenerateResponse, Navigator, TransportError,
};
use resume_builder::{AppSettings, EditorController, StateManager};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Backend that answers from queued responses and records every request.
#[derive(Default)]
pub struct ScriptedBackend {
    enhance_replies: Mutex<VecDeque<Result<EnhanceResponse, TransportError>>>,
    generate_replies: Mutex<VecDeque<Result<GenerateResponse, TransportError>>>,
    pub enhance_requests: Mutex<Vec<EnhanceRequest>>,
    pub generated: Mutex<Vec<ResumeDocument>>,
    /// When set, `enhance` waits for a notification before answering
    pub gate: Option<Arc<Notify>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn enhanced(self, text: &str) -> Self {
        self.reply_enhance(Ok(EnhanceResponse {
            success: true,
            enhanced: Some(text.to_string()),
            error: None,
        }))
    }

    pub fn reply_enhance(self, reply: Result<EnhanceResponse, TransportError>) -> Self {
        self.enhance_replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn reply_generate(self, reply: Result<GenerateResponse, TransportError>) -> Self {
        self.generate_replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn enhance_count(&self) -> usize {
        self.enhance_requests.lock().unwrap().len()
    }

    pub fn generate_count(&self) -> usize {
        self.generated.lock().unwrap().len()
    }
}

#[async_trait]
impl BackendClient for ScriptedBackend {
    async fn enhance(&self, request: &EnhanceRequest) -> Result<EnhanceResponse, TransportError> {
        self.enhance_requests.lock().unwrap().push(request.clone());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.enhance_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(EnhanceResponse::default()))
    }

    async fn generate(
        &self,
        document: &ResumeDocument,
    ) -> Result<GenerateResponse, TransportError> {
        self.generated.lock().unwrap().push(document.clone());
        self.generate_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(GenerateResponse::default()))
    }
}

/// Navigator that records each URL with the (tokio) time it was visited.
#[derive(Default)]
pub struct RecordingNavigator {
    pub visits: Mutex<Vec<(String, tokio::time::Instant)>>,
}

impl RecordingNavigator {
    pub fn urls(&self) -> Vec<String> {
        self.visits
            .lock()
            .unwrap()
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }
}

#[async_trait]
impl Navigator for RecordingNavigator {
    async fn navigate(&self, url: &str) -> anyhow::Result<()> {
        self.visits
            .lock()
            .unwrap()
            .push((url.to_string(), tokio::time::Instant::now()));
        Ok(())
    }
}

pub fn controller_with(
    backend: Arc<ScriptedBackend>,
    navigator: Arc<RecordingNavigator>,
) -> EditorController<MemoryBlobStore> {
    EditorController::new(
        Arc::new(StateManager::new()),
        backend,
        DesignStore::new(MemoryBlobStore::new()),
        navigator,
        &AppSettings::default(),
    )
}

pub fn last_message<S: BlobStore>(controller: &EditorController<S>) -> Option<String> {
    controller
        .state()
        .read(|s| s.last_notification.clone())
        .map(|n| n.message)
}
