pub mod curl;
pub mod errors;
pub mod extract;
pub mod render;
pub mod run;
pub mod samples;
pub mod stats;
pub mod types;
