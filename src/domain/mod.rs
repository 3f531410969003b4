// Domain layer: typed records, filter selections and count tables, plus the
// ports the adapters implement.

pub mod aggregates;
pub mod model;
pub mod ports;
pub mod selection;
