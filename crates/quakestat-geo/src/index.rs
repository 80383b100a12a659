use crate::spatial::point_within;
use geo::algorithm::bounding_rect::BoundingRect;
use geo::{Geometry, Point};
use quakestat_core::models::GeoTable;
use rstar::{RTree, RTreeObject, AABB};

/// Envelope of one indexed polygon row
#[derive(Debug, Clone, PartialEq)]
struct IndexedEnvelope {
    /// Row of the geometry in the indexed table
    row: usize,

    /// Bounding box for spatial indexing
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedEnvelope {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// R-tree over the polygons of a feature table
///
/// Envelope hits are only candidates; [`PolygonIndex::containing`] confirms
/// each one with the exact "within" predicate.
pub struct PolygonIndex<'a> {
    tree: RTree<IndexedEnvelope>,
    geometries: &'a [Geometry<f64>],
}

impl<'a> PolygonIndex<'a> {
    /// Index every geometry of a feature table
    pub fn build(table: &'a GeoTable) -> Self {
        Self::from_geometries(table.geometries())
    }

    /// Index a slice of geometries; row numbers are slice positions
    ///
    /// Empty geometries have no envelope and are left out.
    pub fn from_geometries(geometries: &'a [Geometry<f64>]) -> Self {
        let indexed: Vec<IndexedEnvelope> = geometries
            .iter()
            .enumerate()
            .filter_map(|(row, geometry)| {
                geometry.bounding_rect().map(|rect| IndexedEnvelope {
                    row,
                    envelope: AABB::from_corners(
                        [rect.min().x, rect.min().y],
                        [rect.max().x, rect.max().y],
                    ),
                })
            })
            .collect();

        Self { tree: RTree::bulk_load(indexed), geometries }
    }

    /// Number of indexed geometries
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Rows whose geometry strictly contains the point, ascending
    pub fn containing(&self, point: &Point<f64>) -> Vec<usize> {
        let envelope = AABB::from_point([point.x(), point.y()]);

        let mut rows: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|candidate| candidate.row)
            .filter(|&row| point_within(point, &self.geometries[row]))
            .collect();

        rows.sort_unstable();
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, GeometryCollection, Rect};

    fn squares() -> Vec<Geometry<f64>> {
        vec![
            Geometry::Polygon(Rect::new((0.0, 0.0), (10.0, 10.0)).to_polygon()),
            Geometry::Polygon(Rect::new((5.0, 5.0), (15.0, 15.0)).to_polygon()),
            Geometry::GeometryCollection(GeometryCollection::default()),
            Geometry::Polygon(Rect::new((20.0, 0.0), (30.0, 10.0)).to_polygon()),
        ]
    }

    #[test]
    fn test_empty_geometries_skipped() {
        let geometries = squares();
        let index = PolygonIndex::from_geometries(&geometries);
        assert_eq!(index.len(), 3);
        assert!(!index.is_empty());
    }

    #[test]
    fn test_containing_overlap() {
        let geometries = squares();
        let index = PolygonIndex::from_geometries(&geometries);

        assert_eq!(index.containing(&Point::new(7.0, 7.0)), vec![0, 1]);
        assert_eq!(index.containing(&Point::new(2.0, 2.0)), vec![0]);
        assert_eq!(index.containing(&Point::new(25.0, 5.0)), vec![3]);
        assert!(index.containing(&Point::new(17.0, 5.0)).is_empty());
    }

    #[test]
    fn test_envelope_hit_is_not_enough() {
        // A triangle whose bounding box covers the query point
        let triangle = Geometry::Polygon(geo::polygon![
            (x: 0.0, y: 0.0),
            (x: 10.0, y: 0.0),
            (x: 0.0, y: 10.0),
            (x: 0.0, y: 0.0),
        ]);
        let geometries = vec![triangle];
        let index = PolygonIndex::from_geometries(&geometries);

        assert!(index.containing(&Point::new(9.0, 9.0)).is_empty());
        assert_eq!(index.containing(&Point::new(1.0, 1.0)), vec![0]);
    }
}
