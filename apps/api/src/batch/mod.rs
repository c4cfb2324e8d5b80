// Weekly batch: draw topics, run the generator for each in sequence.

pub mod handlers;
pub mod scheduler;
