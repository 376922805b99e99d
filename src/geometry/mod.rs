//! Geometry kernel for the viewer
//!
//! Small, dependency-free math used by picking, framing and the explode
//! interpolation. Kept separate from macroquad's glam types so the runtime
//! can be serialized and tested without a graphics context.
//!
//! # Module Organization
//!
//! - `math` - Vec3, Vec2, Mat4 helpers, Aabb
//! - `ray` - Ray casting and screen/world conversion

pub mod math;
pub mod ray;

pub use math::{
    Aabb, Mat4, Vec2, Vec3,
    mat4_identity, mat4_translation, mat4_scale, mat4_rotation,
    mat4_mul, mat4_transform_point, mat4_transform_vector, mat4_from_trs, mat4_from_cols,
    lerp,
};

pub use ray::{
    Ray, Viewpoint, screen_to_ray, world_to_screen, world_to_screen_with_depth, view_depth,
    ray_triangle_intersect, ray_aabb_intersect, ray_plane_intersection,
};
