pub mod chat_source;
pub mod speech_engine;
