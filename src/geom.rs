pub mod bboxes;
pub mod point;
pub mod polygon;
pub mod prism;
pub mod ray;
pub mod segment;
pub mod vector;

/// Geometric precision
const EPS: f64 = 1e-13;
