// private sub-module defined in other files
mod is_clockwise_order;
mod point_in_poly;

// exports identifiers from private sub-modules in the current module namespace
pub use self::is_clockwise_order::is_clockwise_order;
pub use self::point_in_poly::{point_in_poly, ring_contains_some, ring_position, RingPosition};
