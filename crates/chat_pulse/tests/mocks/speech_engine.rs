use std::sync::{Arc, Mutex};

use chat_pulse::SpeechEngine;

/// Records every `(text, voice)` the dispatcher asks for, optionally failing
/// each call to exercise the worker's failure isolation.
#[derive(Clone, Default)]
pub struct MockSpeechEngine {
    pub calls: Arc<Mutex<Vec<(String, Option<String>)>>>,
    pub fail_with: Option<String>,
}

impl MockSpeechEngine {
    pub fn failing(msg: &str) -> Self {
        MockSpeechEngine {
            fail_with: Some(msg.to_string()),
            ..Default::default()
        }
    }

    pub fn spoken_texts(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(text, _)| text.clone())
            .collect()
    }
}

impl SpeechEngine for MockSpeechEngine {
    type Error = String;

    fn voices(&self) -> Vec<String> {
        vec!["mock-voice-1".to_string(), "mock-voice-2".to_string()]
    }

    fn speak(&mut self, text: &str, voice: Option<&str>) -> Result<(), String> {
        self.calls
            .lock()
            .unwrap()
            .push((text.to_owned(), voice.map(str::to_owned)));
        if let Some(ref msg) = self.fail_with {
            return Err(msg.clone());
        }
        Ok(())
    }
}
