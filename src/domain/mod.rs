// Domain layer: form model, submission state and ports. No I/O here.

pub mod model;
pub mod ports;
pub mod state;
