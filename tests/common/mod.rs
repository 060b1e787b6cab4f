#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::sync::Notify;

use webp_batch_lib::bridge::{DropHandler, ListenerId};
use webp_batch_lib::utils::extract_filename;
use webp_batch_lib::{
    ConversionQueue, ConversionRequest, ConversionResult, ConversionService, ConverterError,
    ConverterResult, DropEvent, DropPayload, DropSource, PreviewStore,
};

/// Preview store that counts how often each reference is released.
#[derive(Default)]
pub struct CountingPreviews {
    acquired: AtomicUsize,
    releases: Mutex<HashMap<String, usize>>,
}

impl CountingPreviews {
    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn releases_of(&self, reference: &str) -> usize {
        self.releases.lock().unwrap().get(reference).copied().unwrap_or(0)
    }

    pub fn total_released(&self) -> usize {
        self.releases.lock().unwrap().values().sum()
    }

    pub fn max_releases(&self) -> usize {
        self.releases.lock().unwrap().values().copied().max().unwrap_or(0)
    }
}

impl PreviewStore for CountingPreviews {
    fn acquire(&self, _source_path: &str, _bytes: Vec<u8>) -> String {
        let n = self.acquired.fetch_add(1, Ordering::SeqCst);
        format!("test://{n}")
    }

    fn release(&self, reference: &str) {
        *self
            .releases
            .lock()
            .unwrap()
            .entry(reference.to_string())
            .or_default() += 1;
    }
}

/// How the stub service answers for a given file name.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Behaviour {
    Succeed,
    /// `success: false` result
    Reject,
    /// `Err` from the call
    Error,
    Panic,
}

/// Conversion service stub that records calls and concurrency.
#[derive(Default)]
pub struct StubService {
    behaviours: HashMap<String, Behaviour>,
    gated: Vec<String>,
    pub calls: Mutex<Vec<ConversionRequest>>,
    active: AtomicUsize,
    max_active: AtomicUsize,
    pub started: Notify,
    pub release: Notify,
}

impl StubService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, file_name: &str, behaviour: Behaviour) -> Self {
        self.behaviours.insert(file_name.to_string(), behaviour);
        self
    }

    /// Calls for `file_name` signal `started` and then wait for `release`.
    pub fn gate(mut self, file_name: &str) -> Self {
        self.gated.push(file_name.to_string());
        self
    }

    pub fn called_names(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|r| extract_filename(&r.source_path).to_string())
            .collect()
    }

    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }
}

struct ActiveCall<'a>(&'a AtomicUsize);

impl Drop for ActiveCall<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ConversionService for StubService {
    async fn convert(&self, request: ConversionRequest) -> ConverterResult<ConversionResult> {
        let name = extract_filename(&request.source_path).to_string();
        self.calls.lock().unwrap().push(request.clone());

        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now, Ordering::SeqCst);
        // Counts down on return, panic or cancellation
        let _active = ActiveCall(&self.active);

        if self.gated.contains(&name) {
            self.started.notify_one();
            self.release.notified().await;
        }
        // Let other tasks run so overlapping calls would be observable
        tokio::task::yield_now().await;

        match self.behaviours.get(&name).copied().unwrap_or(Behaviour::Succeed) {
            Behaviour::Succeed => Ok(ConversionResult {
                success: true,
                output_path: format!("/out/{name}.webp"),
                original_size: 10,
                new_size: 4,
                error: None,
                base64_data: Some("UklGRg==".to_string()),
            }),
            Behaviour::Reject => Ok(ConversionResult::failure(10, "Failed to load image: bad data")),
            Behaviour::Error => Err(ConverterError::processing("encoder exploded")),
            Behaviour::Panic => panic!("stub service panicked on {name}"),
        }
    }
}

/// Drop source stub: keeps handlers so tests can fire events.
#[derive(Default)]
pub struct StubDropSource {
    handlers: Mutex<Vec<(ListenerId, DropHandler)>>,
    pub listen_calls: AtomicUsize,
    pub unlisten_calls: AtomicUsize,
    pub fail_next: AtomicBool,
    gated: bool,
    /// Signalled when a gated `listen` starts waiting
    pub listening: Notify,
    /// Lets one gated `listen` continue
    pub proceed: Notify,
}

impl StubDropSource {
    pub fn failing_once() -> Self {
        let source = Self::default();
        source.fail_next.store(true, Ordering::SeqCst);
        source
    }

    /// The first `listen` call waits for `proceed` before answering.
    pub fn gated(mut self) -> Self {
        self.gated = true;
        self
    }

    pub fn live_listeners(&self) -> usize {
        self.handlers.lock().unwrap().len()
    }

    pub fn drop_paths(&self, paths: &[&str]) {
        let handlers: Vec<DropHandler> =
            self.handlers.lock().unwrap().iter().map(|(_, h)| h.clone()).collect();
        let payload = DropPayload {
            paths: paths.iter().map(|p| p.to_string()).collect(),
        };
        for handler in handlers {
            handler(DropEvent::DragOver);
            handler(DropEvent::Drop(payload.clone()));
        }
    }
}

#[async_trait]
impl DropSource for StubDropSource {
    async fn listen(&self, handler: DropHandler) -> ConverterResult<ListenerId> {
        let n = self.listen_calls.fetch_add(1, Ordering::SeqCst) as u64;
        if self.gated && n == 0 {
            self.listening.notify_one();
            self.proceed.notified().await;
        }
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(ConverterError::bridge_setup("window not ready"));
        }
        let id = ListenerId(n);
        self.handlers.lock().unwrap().push((id, handler));
        Ok(id)
    }

    fn unlisten(&self, id: ListenerId) {
        self.unlisten_calls.fetch_add(1, Ordering::SeqCst);
        self.handlers.lock().unwrap().retain(|(listener, _)| *listener != id);
    }
}

/// Creates files with distinct sizes; returns their absolute paths in order.
pub fn image_files(dir: &TempDir, names: &[&str]) -> Vec<String> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| write_file(dir.path(), name, i + 1))
        .collect()
}

pub fn write_file(dir: &Path, name: &str, len: usize) -> String {
    let path = dir.join(name);
    std::fs::write(&path, vec![0xAB; len]).unwrap();
    path.to_string_lossy().to_string()
}

pub fn queue_with(service: Arc<StubService>, previews: Arc<CountingPreviews>) -> Arc<ConversionQueue> {
    Arc::new(ConversionQueue::new(service, previews))
}
