pub mod compressor;
pub mod inference;
pub mod pipeline;
pub mod prompts;
pub mod staging;
pub mod storage;
