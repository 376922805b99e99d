//! Scene management
//!
//! Scene graph, orbit camera and the render surface the session draws into.

mod camera;
mod graph;
mod surface;

pub use camera::{CameraState, OrbitCamera};
pub use graph::{
    Material, MaterialId, MaterialTable, MeshInstance, NodeId, Primitive, SceneGraph, SceneNode,
};
pub use surface::{Registration, ResourceKind, Surface, SurfaceUsage};

#[cfg(test)]
pub(crate) use graph::tests::cube;
