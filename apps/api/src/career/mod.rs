// Career guidance attached to every match result: a phased learning roadmap
// and curated study resources. Pure lookup tables, no model involvement.

pub mod resources;
pub mod roadmap;

pub use resources::{map_resources, Resource};
pub use roadmap::{generate_roadmap, Roadmap};
