pub mod chat_service;
pub mod voice_service;

pub use chat_service::ChatService;
pub use voice_service::VoiceService;
