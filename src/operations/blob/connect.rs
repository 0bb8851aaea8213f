use crate::blob::{ClayBlob, ParticleId};

/// Bridges `id` to its nearest unlinked neighbors until it has
/// `max_connections` bridges.
///
/// Candidates must lie strictly within `radius * blend_radius_factor` of the
/// particle, so the reach scales with the particle's own size. Returns the
/// number of bridges created.
pub(crate) fn connect_to_neighbors(blob: &mut ClayBlob, id: ParticleId) -> usize {
    let params = *blob.params();
    if !params.blending {
        return 0;
    }
    let Some(particle) = blob.get(id) else {
        return 0;
    };
    let existing = particle.connectors().len();
    if existing >= params.max_connections {
        return 0;
    }
    let reach = particle.radius() * params.blend_radius_factor;
    let position = *particle.position();

    let candidates = blob.nearest(&position, reach, params.max_connections + existing, Some(id));
    let mut created = 0;
    for other in candidates {
        if existing + created >= params.max_connections {
            break;
        }
        if blob.link(id, other).is_some() {
            created += 1;
        }
    }
    created
}

/// Re-bridges particles that lost a connector to a removal.
pub(crate) fn relink(blob: &mut ClayBlob, mut survivors: Vec<ParticleId>) {
    survivors.sort_unstable();
    survivors.dedup();
    for id in survivors {
        if blob.contains(id) {
            connect_to_neighbors(blob, id);
        }
    }
}
