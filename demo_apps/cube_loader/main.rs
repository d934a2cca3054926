//! Cube Loader
//!
//! Registers the vertex and index data of a colored cube with the resource
//! registry, loads any files named on the command line, prints what is
//! registered and drains the registry on exit.
//!
//! ```text
//! RUST_LOG=debug cargo run -p cube_loader -- assets/stone.png assets/grass.png
//! ```

use anyhow::{Context, Result};
use bytemuck::{Pod, Zeroable};
use cairn::prelude::*;
use glam::Vec3;

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    abgr: u32,
}

const fn vertex(x: f32, y: f32, z: f32, abgr: u32) -> Vertex {
    Vertex {
        position: [x, y, z],
        abgr,
    }
}

const CUBE_VERTICES: [Vertex; 8] = [
    vertex(-10.0, 10.0, 10.0, 0xff55_5555),
    vertex(10.0, 10.0, 10.0, 0xff00_00ff),
    vertex(-10.0, -10.0, 10.0, 0xff00_ff00),
    vertex(10.0, -10.0, 10.0, 0xff00_ffff),
    vertex(-10.0, 10.0, -10.0, 0xffff_0000),
    vertex(10.0, 10.0, -10.0, 0xffff_00ff),
    vertex(-10.0, -10.0, -10.0, 0xffff_ff00),
    vertex(10.0, -10.0, -10.0, 0xffff_ffff),
];

#[rustfmt::skip]
const CUBE_INDICES: [u16; 36] = [
    0, 1, 2,
    1, 3, 2,
    4, 6, 5,
    5, 6, 7,
    0, 2, 4,
    4, 2, 6,
    1, 5, 3,
    5, 7, 3,
    0, 4, 1,
    4, 5, 1,
    2, 3, 6,
    6, 3, 7,
];

/// Scene object whose geometry lives in the registry.
struct Object {
    name: String,
    transform: Vec3,
    vertex_buffer: HashId,
    index_buffer: HashId,
}

impl Object {
    fn cube(name: &str, transform: Vec3, registry: &mut ResourceRegistry) -> Result<Self> {
        let vertex_buffer = registry
            .create_from_memory(&format!("{name}.vertices"), bytemuck::cast_slice(&CUBE_VERTICES))
            .with_context(|| format!("registering vertices of '{name}'"))?
            .id();
        let index_buffer = registry
            .create_from_memory(&format!("{name}.indices"), bytemuck::cast_slice(&CUBE_INDICES))
            .with_context(|| format!("registering indices of '{name}'"))?
            .id();

        Ok(Self {
            name: name.to_owned(),
            transform,
            vertex_buffer,
            index_buffer,
        })
    }

    fn vertices<'a>(&self, registry: &'a ResourceRegistry) -> Option<&'a [Vertex]> {
        let view = registry.get_by_id(self.vertex_buffer)?;
        bytemuck::try_cast_slice(view.bytes()).ok()
    }

    fn index_count(&self, registry: &ResourceRegistry) -> usize {
        registry
            .get_by_id(self.index_buffer)
            .map_or(0, |view| view.len() / std::mem::size_of::<u16>())
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let mut registry = ResourceRegistry::new(RegistrySettings::default())?;

    let cube = Object::cube("cube", Vec3::new(0.0, 0.0, -35.0), &mut registry)?;
    let vertex_count = cube.vertices(&registry).map_or(0, <[Vertex]>::len);
    log::info!(
        "Object '{}' at {}: {} vertices, {} indices",
        cube.name,
        cube.transform,
        vertex_count,
        cube.index_count(&registry)
    );

    for path in std::env::args().skip(1) {
        match registry.load_from_file(&path, &path) {
            Ok(view) => log::info!("Loaded '{}' ({} bytes)", view.name(), view.len()),
            Err(err) => log::warn!("Skipping '{path}': {err}"),
        }
    }

    for resource in registry.iter() {
        println!(
            "[{:>4}] {} {:<32} {:>10} bytes",
            resource.index(),
            resource.id(),
            resource.name(),
            resource.len()
        );
    }

    let released = registry.drain_all();
    log::info!("Released {released} resources");

    Ok(())
}
