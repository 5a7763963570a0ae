pub mod fetcher;
pub mod openai;
