//! Slice statistics like min(), max(), mean()
//!
//! All functions return `None` for an empty slice.

pub fn max(vec: &[f64]) -> Option<f64> {
    vec.iter().cloned().max_by(f64::total_cmp)
}

pub fn min(vec: &[f64]) -> Option<f64> {
    vec.iter().cloned().min_by(f64::total_cmp)
}

pub fn mean(vec: &[f64]) -> Option<f64> {
    if vec.is_empty() {
        return None;
    }
    Some(vec.iter().sum::<f64>() / vec.len() as f64)
}
