pub mod catalog;
pub mod config;
pub mod llm;
pub mod pipeline;
pub mod utils;

pub use llm::media::ImageFile;
pub use pipeline::analysis::DesignSystemAnalysis;
pub use pipeline::synthesis::SynthesisError;
pub use pipeline::text_elements::TextElement;
pub use pipeline::{generate_thumbnail, GenerationRequest, GenerationResult};
