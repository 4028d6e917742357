use crate::editing::EditState;
use crate::tracker::Tracker;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared server state. Handlers needing both locks take `editing` first.
#[derive(Clone)]
pub struct AppState {
    pub tracker: Arc<Mutex<Tracker>>,
    pub editing: Arc<Mutex<EditState>>,
}

impl AppState {
    pub fn new(tracker: Tracker) -> Self {
        Self {
            tracker: Arc::new(Mutex::new(tracker)),
            editing: Arc::new(Mutex::new(EditState::Idle)),
        }
    }
}
