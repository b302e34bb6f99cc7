// Reusable library API, shared by the CLI, the helper binaries and the WASM build
pub mod assembler;
pub mod errors;
pub mod export;
pub mod formulator;
pub mod generator;
pub mod letters;
pub mod lexicon;
pub mod log;
pub mod milp;
pub mod model;
pub mod solver;

// Compile the wasm glue only when targeting wasm32.
#[cfg(target_arch = "wasm32")]
pub mod wasm;
