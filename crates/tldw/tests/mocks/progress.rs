use std::sync::{Arc, Mutex};

use tldw::{ProgressSink, ProgressUpdate};

/// Records rendered progress messages in emission order.
#[derive(Clone, Default)]
pub struct RecordingProgress {
    pub events: Arc<Mutex<Vec<String>>>,
}

impl ProgressSink for RecordingProgress {
    fn notify(&self, update: ProgressUpdate) {
        self.events.lock().unwrap().push(update.to_string());
    }
}
