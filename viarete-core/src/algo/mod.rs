//! Geometric pipeline algorithms, in dependency order: merge the
//! acquired graphs, buffer them into a corridor, skeletonize it,
//! clean the topology, then polygonize and sample the result.

pub mod buffer;
pub mod centerline;
pub mod merge;
pub mod planar;
pub mod polygonize;
pub mod sample;
pub mod topology;

pub use buffer::build_corridor;
pub use centerline::extract_centerlines;
pub use merge::merge_networks;
pub use planar::PlanarGraph;
pub use polygonize::polygonize;
pub use sample::sample_network;
pub use topology::clean_topology;
