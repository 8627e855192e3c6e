pub mod config;
pub mod detect;
pub mod info;
pub mod synth;
