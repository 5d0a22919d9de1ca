mod coerce;
mod node;
mod yaml;

pub use node::{Node, Scalar};
pub(crate) use node::lookup;
