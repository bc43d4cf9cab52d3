pub mod authors;
pub mod range_search;
pub mod sample;
pub mod search;
pub mod word_frequency;
