// Domain layer: step outcomes, command descriptions, ports, and pure text/byte transforms.

pub mod model;
pub mod ports;

pub mod services;
