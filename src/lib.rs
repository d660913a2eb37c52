//! **Constructive Solid Geometry (CSG)** on triangle soups, built around Boolean
//! operations (*union*, *difference*, *intersection*, *inverse*) on sets of
//! polygons stored in [BSP](mesh::bsp) trees.
//!
//! Triangles go in, a [`Solid`] is combined with others, and flat
//! position/normal/uv arrays come out for a renderer:
//!
//! ```rust
//! use nalgebra::Point3;
//! use pg_csg::mesh::Solid;
//!
//! let cube = Solid::<()>::cuboid(-1.0, 1.0, -1.0, 1.0, -1.0, 1.0, None);
//! let ball = Solid::<()>::sphere(2, 1.35, Point3::origin(), None);
//! let rounded = &cube & &ball;
//!
//! let buffers = rounded.mesh();
//! assert_eq!(buffers.positions.len(), buffers.normals.len());
//! assert!(rounded.volume() < cube.volume());
//! ```
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//! - [**stl-io**](https://en.wikipedia.org/wiki/STL_(file_format)): `.stl` import/export
//! - **hashmap**: enables use of hashbrown for `is_watertight` and `close_seams`
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64
//! - **parallel**: use rayon to split polygon batches in parallel

#![forbid(unsafe_code)]
#![deny(unused)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod errors;
pub mod float_types;
pub mod io;
pub mod mesh;
pub mod soup;
pub mod traits;
pub mod triangulated;

#[cfg(any(all(feature = "f64", feature = "f32"), not(any(feature = "f64", feature = "f32"))))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use mesh::Solid;
pub use mesh::vertex::Vertex;
pub use soup::TriangleSoup;
pub use traits::CSGOps;
