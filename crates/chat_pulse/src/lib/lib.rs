mod error;
mod history;
mod ledger;
pub mod overlay;
pub mod parser;
mod poller;
mod speech;
pub mod tracing;
pub mod yt;

pub use error::Error;
pub use history::{ChatLine, HistoryBuffer};
pub use ledger::Ledger;
pub use poller::{builder::ChatPollerBuilder, format_line, ChatPoller};
pub use speech::{SpeechDispatcher, SpeechEngine, SpeechHandle, SpeechRequest, SystemTts};
