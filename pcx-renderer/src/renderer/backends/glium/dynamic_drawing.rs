//! Helpers, that allow glium to be used in a more dynamic manner.
//!
//! The uniforms of a material are only known at runtime, so they cannot be defined at compile
//! time, as "vanilla glium" would expect us to do.

use glium::uniforms::{AsUniformValue, UniformValue, Uniforms};

/// Allows passing uniforms to glium, that are built dynamically at runtime.
/// (The [glium::uniform!] macro requires the uniforms to be known at compile time.)
///
/// Example:
///
/// ```ignore
/// let mut uniforms = DynamicUniforms::new();
/// uniforms.add("_Tint", &[1.0, 0.5, 0.0, 1.0]);
/// uniforms.add("_PointSize", &0.05);
///
/// surface.draw(
///     // ...
///     &uniforms,
///     // ...
/// )
/// ```
#[derive(Clone, Default)]
pub struct DynamicUniforms<'a> {
    uniforms: Vec<(&'static str, UniformValue<'a>)>,
}

impl<'a> DynamicUniforms<'a> {
    /// Creates a new, empty set of uniforms.
    pub fn new() -> Self {
        DynamicUniforms { uniforms: vec![] }
    }

    /// Adds a uniform to the collection.
    pub fn add<T>(&mut self, name: &'static str, value: &'a T)
    where
        T: AsUniformValue,
    {
        self.add_uniform_value(name, value.as_uniform_value())
    }

    /// Adds a uniform to the collection.
    /// A uniform, that has been added before under the same name, is replaced.
    pub fn add_uniform_value(&mut self, name: &'static str, value: UniformValue<'a>) {
        match self.uniforms.iter_mut().find(|(n, _)| *n == name) {
            Some((_, old)) => *old = value,
            None => self.uniforms.push((name, value)),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.uniforms.iter().any(|(n, _)| *n == name)
    }

    pub fn len(&self) -> usize {
        self.uniforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uniforms.is_empty()
    }
}

impl Uniforms for DynamicUniforms<'_> {
    fn visit_values<'a, F: FnMut(&str, UniformValue<'a>)>(&'a self, mut fun: F) {
        for &(name, value) in &self.uniforms {
            fun(name, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DynamicUniforms;
    use glium::uniforms::{UniformValue, Uniforms};

    #[test]
    fn later_values_replace_earlier_ones() {
        let size = 0.05f32;
        let tint = [0.5f32, 0.5, 0.5, 1.0];
        let mut uniforms = DynamicUniforms::new();
        uniforms.add("_PointSize", &size);
        uniforms.add("_Tint", &tint);
        uniforms.add_uniform_value("_PointSize", UniformValue::Float(1.0));
        assert_eq!(uniforms.len(), 2);
        assert!(uniforms.contains("_Tint"));

        let mut visited = vec![];
        uniforms.visit_values(|name, value| {
            if let UniformValue::Float(f) = value {
                visited.push((name.to_string(), f));
            }
        });
        assert_eq!(visited, vec![("_PointSize".to_string(), 1.0)]);
    }
}
