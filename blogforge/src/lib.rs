// Library interface for blogforge modules
// This allows tests and other binaries to import modules

pub mod composer;
pub mod llm;
pub mod news;
pub mod server;
