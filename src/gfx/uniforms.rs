//! # Uniform Sink
//!
//! Cameras and lights publish their per-frame parameters through the
//! [`UniformSink`] trait, addressing each value by a dotted name such as
//! `"spotLight.cutoff"` or `"directionalLight.direction"`. The sink decides
//! what to do with the value; names it does not know are ignored.
//!
//! [`UniformTable`] is the sink used by the renderer: it records the most
//! recent value per name so the render engine can pack the table into the
//! GPU-side uniform structs once per frame.

use std::collections::HashMap;

use cgmath::{Matrix4, Vector3};

/// Receiver for named shader parameters.
pub trait UniformSink {
    fn set_float(&mut self, name: &str, value: f32);
    fn set_vec3(&mut self, name: &str, value: Vector3<f32>);
    fn set_mat4(&mut self, name: &str, value: Matrix4<f32>);
    fn set_int(&mut self, name: &str, value: i32);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec3(Vector3<f32>),
    Mat4(Matrix4<f32>),
    Int(i32),
}

/// A sink that keeps the last value written under each name.
#[derive(Debug, Clone, Default)]
pub struct UniformTable {
    values: HashMap<String, UniformValue>,
}

impl UniformTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_float(&self, name: &str) -> Option<f32> {
        match self.values.get(name) {
            Some(UniformValue::Float(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_vec3(&self, name: &str) -> Option<Vector3<f32>> {
        match self.values.get(name) {
            Some(UniformValue::Vec3(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_mat4(&self, name: &str) -> Option<Matrix4<f32>> {
        match self.values.get(name) {
            Some(UniformValue::Mat4(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_int(&self, name: &str) -> Option<i32> {
        match self.values.get(name) {
            Some(UniformValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    /// True if any uniform under `prefix.` has been written.
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.values
            .keys()
            .any(|name| {
                name.strip_prefix(prefix)
                    .is_some_and(|rest| rest.starts_with('.'))
            })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn insert(&mut self, name: &str, value: UniformValue) {
        match self.values.get_mut(name) {
            Some(slot) => *slot = value,
            None => {
                self.values.insert(name.to_string(), value);
            }
        }
    }
}

impl UniformSink for UniformTable {
    fn set_float(&mut self, name: &str, value: f32) {
        self.insert(name, UniformValue::Float(value));
    }

    fn set_vec3(&mut self, name: &str, value: Vector3<f32>) {
        self.insert(name, UniformValue::Vec3(value));
    }

    fn set_mat4(&mut self, name: &str, value: Matrix4<f32>) {
        self.insert(name, UniformValue::Mat4(value));
    }

    fn set_int(&mut self, name: &str, value: i32) {
        self.insert(name, UniformValue::Int(value));
    }
}

/// One value per shader program the scene feeds each frame.
#[derive(Debug, Clone, Default)]
pub struct ShaderSet<T> {
    pub player: T,
    pub model: T,
    pub skybox: T,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_write_wins() {
        let mut table = UniformTable::new();
        table.set_float("spotLight.intensity", 1.0);
        table.set_float("spotLight.intensity", 2.0);
        assert_eq!(table.get_float("spotLight.intensity"), Some(2.0));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_typed_accessors_reject_other_kinds() {
        let mut table = UniformTable::new();
        table.set_int("useTexture", 1);
        assert_eq!(table.get_int("useTexture"), Some(1));
        assert_eq!(table.get_float("useTexture"), None);
        assert_eq!(table.get_vec3("missing"), None);
    }

    #[test]
    fn test_prefix_lookup() {
        let mut table = UniformTable::new();
        table.set_vec3("pointLight.position", Vector3::new(1.0, 2.0, 3.0));
        assert!(table.has_prefix("pointLight"));
        assert!(!table.has_prefix("point"));
        assert!(!table.has_prefix("spotLight"));
    }
}
