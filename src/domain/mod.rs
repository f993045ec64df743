// Domain layer: the Table model and the pipeline ports. No I/O here.

pub mod model;
pub mod ports;
