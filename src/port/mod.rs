//! Ports: trait contracts between the services and the outside world.

pub mod outbound;
