pub mod models;
pub mod utils;

// Models and helpers shared by the engine library and the CLI front-end.
// Nothing here performs I/O.
