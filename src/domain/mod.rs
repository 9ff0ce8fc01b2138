// Domain layer: the cleanup settings model and the ports (traits) the rest of the crate plugs into.

pub mod model;
pub mod ports;
