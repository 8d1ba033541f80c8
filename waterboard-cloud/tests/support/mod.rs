use std::sync::{Arc, Mutex};
use waterboard_cloud::{
    AttachmentStore, CloudConfig, RemoteStore, StatusLevel, StatusSink, SyncCoordinator,
};
use waterboard_store::LocalStore;

/// Status sink that records every message for assertions.
#[derive(Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<(StatusLevel, String)>>,
}

impl RecordingSink {
    pub fn messages(&self) -> Vec<(StatusLevel, String)> {
        self.messages.lock().unwrap().clone()
    }

    pub fn has_level(&self, level: StatusLevel) -> bool {
        self.messages.lock().unwrap().iter().any(|(l, _)| *l == level)
    }
}

impl StatusSink for RecordingSink {
    fn notify(&self, level: StatusLevel, message: &str) {
        self.messages
            .lock()
            .unwrap()
            .push((level, message.to_string()));
    }
}

pub struct Harness {
    pub local: LocalStore,
    pub coordinator: Arc<SyncCoordinator>,
    pub sink: Arc<RecordingSink>,
    pub config: CloudConfig,
}

/// Builds a coordinator wired to an in-memory cache and the given mock
/// server.
pub fn harness(api_base_url: &str) -> Harness {
    let config = CloudConfig::for_base_url(api_base_url);
    let local = LocalStore::open_in_memory(&config.app_namespace).unwrap();
    let remote = Arc::new(RemoteStore::new(config.clone()));
    let attachments = Arc::new(AttachmentStore::new(config.clone()));
    let sink = Arc::new(RecordingSink::default());
    let coordinator = Arc::new(SyncCoordinator::new(
        local.clone(),
        remote,
        attachments,
        sink.clone(),
        config.clone(),
    ));
    Harness {
        local,
        coordinator,
        sink,
        config,
    }
}
