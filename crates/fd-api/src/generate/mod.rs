pub mod client;
pub mod routes;

pub use client::{BoxFuture, CardGenerator, GeneratedCard, GenerationError, OpenAiGenerator};
pub use routes::routes;
