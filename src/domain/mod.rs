// Domain layer: search models, the industry/state catalogue, and ports.

pub mod catalogue;
pub mod model;
pub mod ports;
