//! Recording doubles for the transfer collaborators.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use ferry_core::{Credential, Environment, Fingerprint, LogicalPath};
use ferry_transfer::{
    Ack, Authenticator, ChunkMessage, ContentStore, StoreConnector, TransferError, Transport,
};

// ---------------------------------------------------------------------------
// Authenticator
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
pub struct CountingAuthenticator {
    pub calls: Arc<AtomicUsize>,
}

impl CountingAuthenticator {
    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Authenticator for CountingAuthenticator {
    fn authenticate(&mut self) -> Result<Credential, TransferError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Credential::issue("test-token", chrono::Duration::minutes(10)))
    }
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

type SendHook = Box<dyn FnMut(&ChunkMessage) + Send>;

/// Records every message; acknowledges unless `deny` is set.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    pub sent: Arc<Mutex<Vec<ChunkMessage>>>,
    pub deny: bool,
    on_send: Option<Arc<Mutex<SendHook>>>,
}

impl RecordingTransport {
    pub fn denying() -> Self {
        RecordingTransport {
            deny: true,
            ..RecordingTransport::default()
        }
    }

    /// Run `hook` after each message is recorded.
    pub fn with_hook(mut self, hook: impl FnMut(&ChunkMessage) + Send + 'static) -> Self {
        let hook: SendHook = Box::new(hook);
        self.on_send = Some(Arc::new(Mutex::new(hook)));
        self
    }

    pub fn sent(&self) -> Vec<ChunkMessage> {
        self.sent.lock().expect("sent log").clone()
    }

    pub fn sent_paths(&self) -> Vec<String> {
        self.sent().into_iter().map(|m| m.path).collect()
    }
}

impl Transport for RecordingTransport {
    fn send(&mut self, message: &ChunkMessage) -> Option<Ack> {
        self.sent.lock().expect("sent log").push(message.clone());
        if let Some(hook) = &self.on_send {
            (hook.lock().expect("hook"))(message);
        }
        if self.deny {
            None
        } else {
            Some(Ack {
                received: message.data.len() as u64,
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Content store
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MockState {
    /// Logical path -> (reported fingerprint, bytes written on fetch).
    pub files: BTreeMap<String, (Fingerprint, Vec<u8>)>,
    /// Logical dir -> relative file names with their bytes, in store order.
    pub dirs: BTreeMap<String, Vec<(String, Vec<u8>)>>,
    pub connects: usize,
    pub resolves: Vec<(String, Environment)>,
    pub fetches: Vec<(String, PathBuf, bool, Environment)>,
}

#[derive(Clone, Default)]
pub struct MockConnector {
    pub state: Arc<Mutex<MockState>>,
}

impl MockConnector {
    pub fn with_file(self, path: &str, reported: Fingerprint, bytes: &[u8]) -> Self {
        self.state
            .lock()
            .expect("state")
            .files
            .insert(path.to_string(), (reported, bytes.to_vec()));
        self
    }

    pub fn with_dir(self, path: &str, files: &[(&str, &str)]) -> Self {
        let entries = files
            .iter()
            .map(|(name, contents)| (name.to_string(), contents.as_bytes().to_vec()))
            .collect();
        self.state
            .lock()
            .expect("state")
            .dirs
            .insert(path.to_string(), entries);
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.state.lock().expect("state").fetches.len()
    }

    pub fn connects(&self) -> usize {
        self.state.lock().expect("state").connects
    }

    pub fn resolves(&self) -> Vec<(String, Environment)> {
        self.state.lock().expect("state").resolves.clone()
    }
}

impl StoreConnector for MockConnector {
    type Store = MockStore;

    fn connect(&self) -> Result<MockStore, TransferError> {
        self.state.lock().expect("state").connects += 1;
        Ok(MockStore {
            state: Arc::clone(&self.state),
        })
    }
}

pub struct MockStore {
    state: Arc<Mutex<MockState>>,
}

impl ContentStore for MockStore {
    fn resolve_fingerprint(
        &mut self,
        path: &LogicalPath,
        env: &Environment,
    ) -> Result<Option<Fingerprint>, TransferError> {
        let mut state = self.state.lock().expect("state");
        state.resolves.push((path.to_string(), env.clone()));
        Ok(state.files.get(path.as_str()).map(|(fp, _)| fp.clone()))
    }

    fn fetch_file(
        &mut self,
        path: &LogicalPath,
        dest: &Path,
        makedirs: bool,
        env: &Environment,
    ) -> Result<PathBuf, TransferError> {
        let mut state = self.state.lock().expect("state");
        state
            .fetches
            .push((path.to_string(), dest.to_path_buf(), makedirs, env.clone()));
        let (_, bytes) = state
            .files
            .get(path.as_str())
            .cloned()
            .ok_or_else(|| TransferError::Store(format!("{path} not found")))?;
        if makedirs {
            if let Some(parent) = dest.parent() {
                std::fs::create_dir_all(parent).expect("create parents");
            }
        }
        std::fs::write(dest, bytes).expect("write fetched file");
        Ok(dest.to_path_buf())
    }

    fn fetch_dir(
        &mut self,
        path: &LogicalPath,
        dest: &Path,
        env: &Environment,
    ) -> Result<Vec<PathBuf>, TransferError> {
        let mut state = self.state.lock().expect("state");
        state
            .fetches
            .push((path.to_string(), dest.to_path_buf(), false, env.clone()));
        let entries = state.dirs.get(path.as_str()).cloned().unwrap_or_default();
        let mut written = Vec::new();
        for (name, bytes) in entries {
            let target = dest.join(name);
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent).expect("create parents");
            }
            std::fs::write(&target, bytes).expect("write fetched file");
            written.push(target);
        }
        Ok(written)
    }
}
