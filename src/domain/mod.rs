// Domain layer: catalog and selection models plus the ports the core talks through.

pub mod catalog;
pub mod model;
pub mod ports;
pub mod selection;
