// Domain layer: date/decision models and the ports the engine and presenters plug into.

pub mod model;
pub mod ports;
