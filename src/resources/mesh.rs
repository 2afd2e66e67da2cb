use std::{
    collections::HashMap,
    io::{BufReader, Cursor},
    path::Path,
};

use crate::{
    data_structures::mesh::MeshData,
    error::{Error, Result},
    resources::load_string,
};

/// Loads a Wavefront OBJ file as one flattened triangle list.
///
/// Faces are triangulated and every model in the file is appended in order.
/// Indices are expanded so the result can be drawn without an index buffer.
/// Material libraries are not read.
pub fn load_mesh(path: impl AsRef<Path>) -> Result<MeshData> {
    let path = path.as_ref();
    let failed = |reason: String| Error::MeshLoadFailed {
        path: path.display().to_string(),
        reason,
    };

    let obj_text = load_string(path).map_err(|e| failed(format!("{e:#}")))?;
    let mut obj_reader = BufReader::new(Cursor::new(obj_text));
    let (models, _materials) = tobj::load_obj_buf(
        &mut obj_reader,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        |_| Ok((Vec::new(), HashMap::new())),
    )
    .map_err(|e| failed(e.to_string()))?;

    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mesh = flatten(name, &models);
    if mesh.is_empty() {
        return Err(failed("file contains no vertices".to_string()));
    }
    log::info!(
        "loaded mesh {} with {} vertices from {} model(s)",
        path.display(),
        mesh.point_count,
        models.len()
    );
    Ok(mesh)
}

fn flatten(name: String, models: &[tobj::Model]) -> MeshData {
    let total = models.iter().map(|m| m.mesh.indices.len()).sum();
    let mut positions = Vec::with_capacity(total);
    let mut normals = Vec::with_capacity(total);
    let mut tex_coords = Vec::with_capacity(total);

    for model in models {
        let mesh = &model.mesh;
        for triangle in mesh.indices.chunks_exact(3) {
            let in_range = triangle
                .iter()
                .all(|&i| (i as usize + 1) * 3 <= mesh.positions.len());
            if !in_range {
                log::warn!("skipping triangle of {} with an out-of-range index", model.name);
                continue;
            }
            for &index in triangle {
                let i = index as usize;
                let p = &mesh.positions[i * 3..i * 3 + 3];
                positions.push([p[0], p[1], p[2]]);
                normals.push(
                    mesh.normals
                        .get(i * 3..i * 3 + 3)
                        .map_or([0.0; 3], |n| [n[0], n[1], n[2]]),
                );
                tex_coords.push(
                    mesh.texcoords
                        .get(i * 2..i * 2 + 2)
                        .map_or([0.0; 2], |t| [t[0], 1.0 - t[1]]),
                );
            }
        }
    }

    MeshData::new(name, positions, normals, tex_coords)
}
