use std::io::{BufReader, Cursor};

use cgmath::{Vector2, Vector3};

use crate::data_structures::mesh::{Mesh, MeshFace, MeshMaterial};

/**
 * OBJ files are read without triangulation so quads stay quads. tobj splits
 * the file into one model per material and each model carries its own
 * position and texcoord pools, so they are merged into one shared pool here.
 *
 * The MTL text is handed to every `mtllib` statement regardless of its name.
 */
pub async fn parse_obj(obj_text: &str, mtl_text: &str) -> anyhow::Result<Mesh> {
    let mut obj_reader = BufReader::new(Cursor::new(obj_text));
    let mtl_text = mtl_text.to_string();

    let (models, obj_materials) = tobj::load_obj_buf_async(
        &mut obj_reader,
        &tobj::LoadOptions {
            triangulate: false,
            single_index: false,
            ..Default::default()
        },
        |_| {
            let mtl_text = mtl_text.clone();
            async move { tobj::load_mtl_buf(&mut BufReader::new(Cursor::new(mtl_text))) }
        },
    )
    .await?;

    let materials = match obj_materials {
        Ok(materials) => materials
            .into_iter()
            .map(|m| MeshMaterial {
                name: m.name,
                diffuse_texture: m.diffuse_texture,
            })
            .collect(),
        Err(e) => {
            log::warn!("Materials of the OBJ could not be read: {e}");
            Vec::new()
        }
    };

    let mut mesh = Mesh {
        materials,
        ..Default::default()
    };
    for model in &models {
        let m = &model.mesh;
        let position_base = mesh.positions.len();
        let texcoord_base = mesh.texcoords.len();
        mesh.positions.extend(
            m.positions
                .chunks_exact(3)
                .map(|p| Vector3::new(p[0], p[1], p[2])),
        );
        mesh.texcoords
            .extend(m.texcoords.chunks_exact(2).map(|t| Vector2::new(t[0], t[1])));

        // An empty arity list means every face is a triangle
        let arities: Vec<usize> = if m.face_arities.is_empty() {
            vec![3; m.indices.len() / 3]
        } else {
            m.face_arities.iter().map(|&a| a as usize).collect()
        };
        let material = m.material_id.filter(|&idx| idx < mesh.materials.len());

        let mut offset = 0;
        for arity in arities {
            let Some(indices) = m.indices.get(offset..offset + arity) else {
                log::warn!("OBJ model {} ends inside a face; dropping the rest.", model.name);
                break;
            };
            let positions = indices.iter().map(|&i| position_base + i as usize).collect();
            let texcoords = (offset..offset + arity)
                .map(|i| m.texcoord_indices.get(i).map(|&t| texcoord_base + t as usize))
                .collect();
            mesh.faces.push(MeshFace {
                positions,
                texcoords,
                material,
            });
            offset += arity;
        }
    }
    Ok(mesh)
}
