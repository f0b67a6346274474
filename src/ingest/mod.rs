//! Line ingestion: transport -> parser -> dispatcher

mod pipeline;

pub use pipeline::Pipeline;
