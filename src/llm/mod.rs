pub mod gemini;
pub mod media;

pub use media::ImageFile;
