pub mod body;
pub mod bounds;
pub mod broadphase;
pub mod config;
pub mod error;
pub mod hash_set;
pub mod math;
pub mod shape;
pub mod shapes;
pub mod space;

pub use body::{Body, BodyArena, BodyHandle};
pub use bounds::Bounds;
pub use config::{Material, PhysicsConfig};
pub use error::PhysicsError;
pub use hash_set::{hash_pair, HashSet, HashValue};
pub use shape::{Shape, ShapeFilter, ShapeMassInfo, SupportPoint};
pub use shapes::{PointQueryInfo, SegmentQueryInfo, ShapeClass};
pub use space::{ShapeArena, ShapeHandle, SpaceHandle};
