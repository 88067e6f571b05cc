// Mulmocast Web - API Core
//
// Turns a web page URL into a finished multimedia artifact: scrape, script
// generation via OpenAI, then the external `mulmo` tool for audio, images
// and video. The HTTP layer tracks each request as an asynchronous job.

pub mod config;
pub mod kernel;
pub mod server;

pub use config::*;
