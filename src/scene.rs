use std::collections::HashMap;

use raylib::prelude::*;

/// Animatable properties of one card element. `x`/`y` are pixel offsets from
/// the element's layout anchor; `opacity` multiplies the draw alpha.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Props {
    pub opacity: f32,
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    pub rotation: f32,
    pub color: Color,
}

impl Default for Props {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            x: 0.0,
            y: 0.0,
            scale: 1.0,
            rotation: 0.0,
            color: Color::WHITE,
        }
    }
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

pub fn lerp_color(a: Color, b: Color, t: f32) -> Color {
    fn channel(a: u8, b: u8, t: f32) -> u8 {
        (a as f32 + (b as f32 - a as f32) * t).round().clamp(0.0, 255.0) as u8
    }
    Color::new(
        channel(a.r, b.r, t),
        channel(a.g, b.g, t),
        channel(a.b, b.b, t),
        channel(a.a, b.a, t),
    )
}

/// Partial property change. `None` fields are left untouched by the step
/// that carries the patch.
#[derive(Clone, Copy, Debug, Default)]
pub struct PropPatch {
    pub opacity: Option<f32>,
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub scale: Option<f32>,
    pub rotation: Option<f32>,
    pub color: Option<Color>,
}

impl PropPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opacity(mut self, v: f32) -> Self {
        self.opacity = Some(v);
        self
    }

    pub fn x(mut self, v: f32) -> Self {
        self.x = Some(v);
        self
    }

    pub fn y(mut self, v: f32) -> Self {
        self.y = Some(v);
        self
    }

    pub fn scale(mut self, v: f32) -> Self {
        self.scale = Some(v);
        self
    }

    pub fn rotation(mut self, v: f32) -> Self {
        self.rotation = Some(v);
        self
    }

    pub fn color(mut self, v: Color) -> Self {
        self.color = Some(v);
        self
    }

    /// Moves `current` toward this patch by eased progress `t`, field by
    /// field. At `t = 1.0` the patched fields sit exactly on the patch.
    pub fn blend_toward(&self, current: &mut Props, t: f32) {
        if let Some(v) = self.opacity {
            current.opacity = lerp(current.opacity, v, t);
        }
        if let Some(v) = self.x {
            current.x = lerp(current.x, v, t);
        }
        if let Some(v) = self.y {
            current.y = lerp(current.y, v, t);
        }
        if let Some(v) = self.scale {
            current.scale = lerp(current.scale, v, t);
        }
        if let Some(v) = self.rotation {
            current.rotation = lerp(current.rotation, v, t);
        }
        if let Some(v) = self.color {
            current.color = lerp_color(current.color, v, t);
        }
    }

    /// Overwrites `current` with the patched fields (start of a from-to
    /// step), leaving unpatched fields alone.
    pub fn write_onto(&self, current: &mut Props) {
        self.blend_toward(current, 1.0);
    }
}

/// Named sections of the card, each a run of elements (one for plain
/// sections, one per character or balloon for staggered ones). `base` is
/// the pre-presentation pose; `current` is rewritten every sample.
pub struct Scene {
    sections: Vec<Section>,
    index: HashMap<String, usize>,
}

pub struct Section {
    pub base: Vec<Props>,
    pub current: Vec<Props>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            sections: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn add(&mut self, name: &str, base: Props, elements: usize) {
        let base = vec![base; elements.max(1)];
        self.index.insert(name.to_string(), self.sections.len());
        self.sections.push(Section {
            current: base.clone(),
            base,
        });
    }

    pub fn count(&self, name: &str) -> usize {
        self.section(name).map_or(0, |s| s.base.len())
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.index.get(name).map(|&i| &self.sections[i])
    }

    pub fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        let i = *self.index.get(name)?;
        Some(&mut self.sections[i])
    }

    /// First element of a section, or the resting default when the section
    /// is absent. Callers drawing optional collaborators lean on this.
    pub fn props(&self, name: &str) -> Props {
        self.section(name)
            .and_then(|s| s.current.first().copied())
            .unwrap_or_default()
    }

    pub fn element(&self, name: &str, i: usize) -> Props {
        self.section(name)
            .and_then(|s| s.current.get(i).copied())
            .unwrap_or_default()
    }

    /// Rewinds every element to its base pose.
    pub fn reset(&mut self) {
        for section in &mut self.sections {
            section.current.copy_from_slice(&section.base);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_blend_hits_target_at_one() {
        let mut p = Props::default();
        let patch = PropPatch::new().opacity(0.0).y(10.0);
        patch.blend_toward(&mut p, 1.0);
        assert_eq!(p.opacity, 0.0);
        assert_eq!(p.y, 10.0);
        // Unpatched fields untouched
        assert_eq!(p.scale, 1.0);
    }

    #[test]
    fn patch_blend_is_partial_midway() {
        let mut p = Props::default();
        PropPatch::new().opacity(0.0).blend_toward(&mut p, 0.25);
        assert!((p.opacity - 0.75).abs() < 1e-6);
    }

    #[test]
    fn color_lerp_midpoint() {
        let mid = lerp_color(Color::BLACK, Color::WHITE, 0.5);
        assert_eq!(mid.r, 128);
        assert_eq!(mid.g, 128);
        assert_eq!(mid.b, 128);
    }

    #[test]
    fn reset_restores_base() {
        let mut scene = Scene::new();
        scene.add("one", Props::default(), 1);
        scene.section_mut("one").unwrap().current[0].opacity = 0.2;
        scene.reset();
        assert_eq!(scene.props("one").opacity, 1.0);
    }

    #[test]
    fn missing_section_yields_defaults() {
        let scene = Scene::new();
        assert_eq!(scene.count("nope"), 0);
        assert_eq!(scene.props("nope"), Props::default());
    }
}
