pub mod cli;
pub mod commands;
pub mod hmm;
pub mod motifs;
pub mod nlr;
pub mod scoring;
pub mod utils;
