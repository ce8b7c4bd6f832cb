//! Mesh2d-based filled rendering for every painted body.
//!
//! Every entity spawned with a [`Paint`] and a polygon [`Vertices`] outline
//! automatically receives a filled `Mesh2d` shortly after spawning, via
//! `attach_body_mesh_system` (which queries `Added<Paint>`).  Blocks, debris
//! fragments, projectiles, and the ground all flow through the same path; the
//! fill colour comes from the paint rather than any per-kind special case.
//!
//! Meshes are retained GPU assets: geometry uploads once at spawn and rides
//! the entity's Rapier-managed `Transform` for free, so a pile of hundreds of
//! fragments costs almost nothing per frame.  The stroke outline is the only
//! immediate-mode pass, one gizmo linestrip per body.

use crate::block::{Paint, Vertices};
use crate::laser::world_outline;
use bevy::prelude::*;
use bevy_asset::RenderAssetUsages;
use bevy_mesh::{Indices, PrimitiveTopology};

// ── Spawn-time mesh attachment ────────────────────────────────────────────────

/// Attach a filled `Mesh2d` polygon to every newly painted body.
///
/// `Added<Paint>` filters to entities that appeared since the previous frame,
/// so existing bodies cost nothing.  Vertices are local-space; Rapier's
/// rotation applies through the transform with no extra math here.
pub fn attach_body_mesh_system(
    mut commands: Commands,
    query: Query<(Entity, &Vertices, &Paint), Added<Paint>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    for (entity, vertices, paint) in query.iter() {
        if vertices.0.len() < 3 {
            continue;
        }
        let mesh_handle = meshes.add(filled_polygon_mesh(&vertices.0));
        let material_handle = materials.add(ColorMaterial::from_color(paint.fill));
        commands.entity(entity).insert((
            Mesh2d(mesh_handle),
            MeshMaterial2d(material_handle),
            Visibility::Visible,
        ));
    }
}

/// Trace each body's outline in its stroke colour.
pub fn outline_render_system(bodies: Query<(&Transform, &Vertices, &Paint)>, mut gizmos: Gizmos) {
    for (transform, vertices, paint) in bodies.iter() {
        if vertices.0.len() < 2 {
            continue;
        }
        let outline = world_outline(transform, &vertices.0);
        let first = outline[0];
        gizmos.linestrip_2d(
            outline.into_iter().chain(std::iter::once(first)),
            paint.stroke,
        );
    }
}

// ── Geometry helpers ──────────────────────────────────────────────────────────

/// Fan-triangulate a convex polygon into a renderable [`Mesh`].
///
/// Triangle fan from vertex 0: triangles `(0, i, i+1)`.  Every body outline in
/// the sandbox is convex (rects, regular polygons, fragment squares), so the
/// fan is always valid.
pub fn filled_polygon_mesh(vertices: &[Vec2]) -> Mesh {
    let n = vertices.len();
    debug_assert!(n >= 3, "polygon must have ≥ 3 vertices");

    let positions: Vec<[f32; 3]> = vertices.iter().map(|v| [v.x, v.y, 0.0]).collect();
    let normals: Vec<[f32; 3]> = vec![[0.0, 0.0, 1.0]; n];
    // The widest block spans ±40 local units; squeeze that into the UV square.
    let uvs: Vec<[f32; 2]> = vertices
        .iter()
        .map(|v| [v.x / 100.0 + 0.5, v.y / 100.0 + 0.5])
        .collect();

    let indices: Vec<u32> = (1..n as u32 - 1).flat_map(|i| [0, i, i + 1]).collect();

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

pub struct BlockRenderingPlugin;

impl Plugin for BlockRenderingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (attach_body_mesh_system, outline_render_system));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fan_triangulation_covers_the_polygon() {
        let hexagon = crate::block::regular_polygon(10.0, 6);
        let mesh = filled_polygon_mesh(&hexagon);
        let indices = match mesh.indices() {
            Some(Indices::U32(indices)) => indices.clone(),
            other => panic!("expected u32 indices, got {other:?}"),
        };
        // n vertices fan into n − 2 triangles.
        assert_eq!(indices.len(), (6 - 2) * 3);
        assert!(indices.iter().all(|&i| i < 6), "indices must stay in range");
    }

    #[test]
    fn rect_mesh_has_one_position_per_corner() {
        let rect = crate::block::BlockShape::default_rect().vertices();
        let mesh = filled_polygon_mesh(&rect);
        let positions = mesh
            .attribute(Mesh::ATTRIBUTE_POSITION)
            .and_then(|a| a.as_float3())
            .expect("position attribute");
        assert_eq!(positions.len(), 4);
    }
}
