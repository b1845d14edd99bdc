mod classifier;
mod common;
mod evaluation;
