pub mod huggingface;

pub use huggingface::HuggingFaceTextGenerator;
