//! Distance-based level-of-detail selection.

use crate::planet::config::LodLevel;

/// Picks the level of detail for a viewer at `distance`.
///
/// Returns the first (most detailed) level whose view distance reaches
/// `distance`. Beyond every level the last one is used. An empty table yields 0.
///
/// # Examples
///
/// ```
/// use voxel_planet::planet::{config::LodLevel, voxels::select_lod};
///
/// let lods = [
///     LodLevel { view_distance: 10.0, ..Default::default() },
///     LodLevel { view_distance: 50.0, quality: 0.5, collidable: false, ..Default::default() },
/// ];
/// assert_eq!(select_lod(4.0, &lods), 0);
/// assert_eq!(select_lod(20.0, &lods), 1);
/// assert_eq!(select_lod(900.0, &lods), 1);
/// ```
pub fn select_lod(distance: f32, lods: &[LodLevel]) -> usize {
    lods.iter()
        .position(|lod| lod.view_distance >= distance)
        .unwrap_or_else(|| lods.len().saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Vec<LodLevel> {
        [5.0, 10.0, 10.0, 40.0]
            .into_iter()
            .map(|view_distance| LodLevel {
                view_distance,
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn boundaries_belong_to_the_nearer_level() {
        let lods = table();
        assert_eq!(select_lod(0.0, &lods), 0);
        assert_eq!(select_lod(5.0, &lods), 0);
        assert_eq!(select_lod(5.01, &lods), 1);
        assert_eq!(select_lod(10.0, &lods), 1);
        assert_eq!(select_lod(39.0, &lods), 3);
    }

    #[test]
    fn falls_back_to_the_last_level() {
        assert_eq!(select_lod(1000.0, &table()), 3);
        assert_eq!(select_lod(1.0, &[]), 0);
    }
}
