// main.rs
//
// Builds the classic CSG demo scene, (cube & sphere) - (cylinder x | y | z),
// reports its statistics and writes it to stl/csg.stl.
// Here, we do not use any shared data, so we'll bind the generic S to ().

use nalgebra::Point3;
use pg_csg::float_types::Real;
use pg_csg::mesh::Solid;
use std::error::Error;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber; `RUST_LOG` overrides the default level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("pg_csg=info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .with(filter)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let cube = Solid::<()>::cuboid(-1.0, 1.0, -1.0, 1.0, -1.0, 1.0, None);
    let sphere = Solid::<()>::sphere(3, 1.35, Point3::origin(), None);
    let cylinder = |from: [Real; 3], to: [Real; 3]| {
        Solid::<()>::cylinder(Point3::from(from), Point3::from(to), 0.5, 36, None)
    };
    let x = cylinder([-1.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
    let y = cylinder([0.0, -1.0, 0.0], [0.0, 1.0, 0.0]);
    let z = cylinder([0.0, 0.0, -1.0], [0.0, 0.0, 1.0]);

    let result = (&cube & &sphere) - (&x | &y | &z);
    let closed = result.close_seams();

    info!(
        "Result: {} polygons, {} triangles, volume {:.4}, area {:.4}, watertight: {}",
        result.polygons.len(),
        result.triangle_count(),
        result.volume(),
        result.surface_area(),
        closed.is_watertight()
    );

    let buffers = closed.mesh();
    info!(
        "Mesh buffers: {} vertices ({} interleaved floats)",
        buffers.vertex_count(),
        buffers.interleaved().len()
    );

    #[cfg(feature = "stl-io")]
    {
        std::fs::create_dir_all("stl")?;
        std::fs::write("stl/csg.stl", closed.to_stl_binary("csg")?)?;
        info!("Wrote stl/csg.stl");
    }

    Ok(())
}
