pub mod config;
pub mod consts;
pub mod detection;
pub mod error;
pub mod fit;
pub mod frame;
pub mod gesture;
pub mod io;
pub mod preprocess;
pub mod synth;
