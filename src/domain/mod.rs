pub mod feed;
pub mod podcast;
pub mod text;
pub mod tts;
