use geo::algorithm::contains::Contains;
use geo::{Geometry, Point};

/// Check if a point lies strictly inside an areal geometry
///
/// Points on the boundary are not within. Non-areal geometries contain no points.
pub fn point_within(point: &Point<f64>, area: &Geometry<f64>) -> bool {
    match area {
        Geometry::Polygon(polygon) => polygon.contains(point),
        Geometry::MultiPolygon(polygons) => polygons.contains(point),
        Geometry::Rect(rect) => rect.to_polygon().contains(point),
        Geometry::Triangle(triangle) => triangle.to_polygon().contains(point),
        Geometry::GeometryCollection(collection) => {
            collection.iter().any(|member| point_within(point, member))
        }
        _ => false,
    }
}

/// Point of a point feature, or `None` for any other geometry
pub fn as_point(geometry: &Geometry<f64>) -> Option<Point<f64>> {
    match geometry {
        Geometry::Point(point) => Some(*point),
        _ => None,
    }
}
