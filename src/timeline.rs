use std::collections::HashMap;

use crate::ease::Ease;
use crate::scene::{PropPatch, Scene};

/// Placement of a step or cue on the timeline.
#[derive(Clone, Copy, Debug)]
pub enum At {
    /// Appended at the current end of the timeline.
    End,
    /// Relative to the current end: `Offset(2.0)` is the `"+=2"` of the
    /// original script, `Offset(-1.0)` is `"-=1"`.
    Offset(f32),
    Marker(&'static str),
    MarkerOffset(&'static str, f32),
}

#[derive(Clone, Copy, Debug)]
enum Span {
    /// Tween the accumulated value toward the patch.
    To(PropPatch),
    /// Pin the first patch at the step start, tween toward the second.
    FromTo(PropPatch, PropPatch),
}

#[derive(Clone, Copy, Debug)]
enum Elem {
    All,
    Index(usize),
}

struct Step {
    section: &'static str,
    element: Elem,
    start: f32,
    duration: f32,
    span: Span,
    ease: Ease,
}

struct CueSlot<C> {
    at: f32,
    cue: C,
    fired: bool,
}

/// Ordered storyboard of timed property tweens over a [`Scene`], with named
/// markers, relative offsets, staggers and typed cues. All start times are
/// resolved while building, so a replay is a pure restart of the same
/// schedule.
pub struct Timeline<C> {
    steps: Vec<Step>,
    cues: Vec<CueSlot<C>>,
    duration: f32,
    playhead: f32,
}

pub struct TimelineBuilder<C> {
    steps: Vec<Step>,
    cues: Vec<(f32, C)>,
    markers: HashMap<&'static str, f32>,
    end: f32,
}

impl<C: Copy> TimelineBuilder<C> {
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            cues: Vec::new(),
            markers: HashMap::new(),
            end: 0.0,
        }
    }

    /// A marker referenced before being placed is created at the current
    /// end, which is how the original script introduces its anchors.
    fn resolve(&mut self, at: At) -> f32 {
        match at {
            At::End => self.end,
            At::Offset(d) => (self.end + d).max(0.0),
            At::Marker(name) => *self.markers.entry(name).or_insert(self.end),
            At::MarkerOffset(name, d) => {
                (*self.markers.entry(name).or_insert(self.end) + d).max(0.0)
            }
        }
    }

    fn push(&mut self, section: &'static str, element: Elem, start: f32, duration: f32, span: Span, ease: Ease) {
        self.end = self.end.max(start + duration);
        self.steps.push(Step {
            section,
            element,
            start,
            duration,
            span,
            ease,
        });
    }

    pub fn marker(mut self, name: &'static str) -> Self {
        let end = self.end;
        self.markers.entry(name).or_insert(end);
        self
    }

    pub fn to(mut self, section: &'static str, duration: f32, patch: PropPatch, ease: Ease, at: At) -> Self {
        let start = self.resolve(at);
        self.push(section, Elem::All, start, duration, Span::To(patch), ease);
        self
    }

    pub fn from_to(
        mut self,
        section: &'static str,
        duration: f32,
        from: PropPatch,
        to: PropPatch,
        ease: Ease,
        at: At,
    ) -> Self {
        let start = self.resolve(at);
        self.push(section, Elem::All, start, duration, Span::FromTo(from, to), ease);
        self
    }

    /// Applies the same change to each of `count` elements with a
    /// per-element start delay of `each` seconds.
    pub fn stagger_to(
        mut self,
        section: &'static str,
        count: usize,
        duration: f32,
        patch: PropPatch,
        each: f32,
        ease: Ease,
        at: At,
    ) -> Self {
        let start = self.resolve(at);
        for i in 0..count {
            self.push(
                section,
                Elem::Index(i),
                start + each * i as f32,
                duration,
                Span::To(patch),
                ease,
            );
        }
        self
    }

    pub fn stagger_from_to(
        mut self,
        section: &'static str,
        count: usize,
        duration: f32,
        from: PropPatch,
        to: PropPatch,
        each: f32,
        ease: Ease,
        at: At,
    ) -> Self {
        let start = self.resolve(at);
        for i in 0..count {
            self.push(
                section,
                Elem::Index(i),
                start + each * i as f32,
                duration,
                Span::FromTo(from, to),
                ease,
            );
        }
        self
    }

    pub fn cue(mut self, cue: C, at: At) -> Self {
        let at = self.resolve(at);
        self.cues.push((at, cue));
        self
    }

    pub fn build(self) -> Timeline<C> {
        let duration = self
            .cues
            .iter()
            .map(|(at, _)| *at)
            .fold(self.end, f32::max);
        Timeline {
            steps: self.steps,
            cues: self
                .cues
                .into_iter()
                .map(|(at, cue)| CueSlot {
                    at,
                    cue,
                    fired: false,
                })
                .collect(),
            duration,
            playhead: 0.0,
        }
    }
}

impl<C: Copy> Timeline<C> {
    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn playhead(&self) -> f32 {
        self.playhead
    }

    /// Advances the playhead and appends any cues it crossed, in time order.
    pub fn update(&mut self, dt: f32, fired: &mut Vec<C>) {
        self.playhead += dt;
        let playhead = self.playhead;
        let mut crossed: Vec<(f32, C)> = self
            .cues
            .iter_mut()
            .filter(|slot| !slot.fired && playhead >= slot.at)
            .map(|slot| {
                slot.fired = true;
                (slot.at, slot.cue)
            })
            .collect();
        crossed.sort_by(|a, b| a.0.total_cmp(&b.0));
        fired.extend(crossed.into_iter().map(|(_, cue)| cue));
    }

    /// Rewinds the playhead and re-arms every cue. The resolved steps are
    /// untouched, so the replayed run is identical to the first.
    pub fn restart(&mut self) {
        self.playhead = 0.0;
        for slot in &mut self.cues {
            slot.fired = false;
        }
    }

    /// Writes the pose at the current playhead into the scene: base props,
    /// then every started step folded on top in declaration order. Steps
    /// addressing sections the scene does not have are skipped, which is
    /// what keeps the storyboard running when a collaborator is absent.
    pub fn sample(&self, scene: &mut Scene) {
        scene.reset();
        for step in &self.steps {
            if self.playhead < step.start {
                continue;
            }
            let progress = if step.duration <= 0.0 {
                1.0
            } else {
                ((self.playhead - step.start) / step.duration).min(1.0)
            };
            let eased = step.ease.apply(progress);
            let Some(section) = scene.section_mut(step.section) else {
                continue;
            };
            let range = match step.element {
                Elem::All => 0..section.current.len(),
                Elem::Index(i) => {
                    if i >= section.current.len() {
                        continue;
                    }
                    i..i + 1
                }
            };
            for props in &mut section.current[range] {
                match step.span {
                    Span::To(patch) => patch.blend_toward(props, eased),
                    Span::FromTo(from, to) => {
                        from.write_onto(props);
                        to.blend_toward(props, eased);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Props;

    #[derive(Clone, Copy, Debug, PartialEq)]
    enum TestCue {
        Party,
        Done,
    }

    fn scene_with(name: &'static str, count: usize) -> Scene {
        let mut scene = Scene::new();
        scene.add(name, Props::default(), count);
        scene
    }

    #[test]
    fn sequential_steps_append_at_end() {
        let tl: Timeline<TestCue> = TimelineBuilder::new()
            .to("a", 1.0, PropPatch::new().opacity(0.0), Ease::Linear, At::End)
            .to("a", 2.0, PropPatch::new().opacity(1.0), Ease::Linear, At::End)
            .build();
        assert_eq!(tl.duration(), 3.0);
    }

    #[test]
    fn offsets_move_the_insertion_point() {
        let tl: Timeline<TestCue> = TimelineBuilder::new()
            .to("a", 1.0, PropPatch::new().opacity(0.0), Ease::Linear, At::End)
            .to("a", 1.0, PropPatch::new().opacity(1.0), Ease::Linear, At::Offset(2.0))
            .build();
        // 1.0 gap of 2.0 then 1.0
        assert_eq!(tl.duration(), 4.0);

        let tl: Timeline<TestCue> = TimelineBuilder::new()
            .to("a", 2.0, PropPatch::new().opacity(0.0), Ease::Linear, At::End)
            .to("a", 1.0, PropPatch::new().opacity(1.0), Ease::Linear, At::Offset(-1.0))
            .build();
        // Second step overlaps the first's tail
        assert_eq!(tl.duration(), 2.0);
    }

    #[test]
    fn unknown_marker_is_created_at_current_end() {
        let tl: Timeline<TestCue> = TimelineBuilder::new()
            .to("a", 2.0, PropPatch::new().opacity(0.0), Ease::Linear, At::End)
            .cue(TestCue::Party, At::Marker("party"))
            .to("a", 1.0, PropPatch::new().opacity(1.0), Ease::Linear, At::End)
            // Re-anchors at the marker, not at the new end
            .to("a", 0.5, PropPatch::new().y(1.0), Ease::Linear, At::Marker("party"))
            .build();
        assert_eq!(tl.duration(), 3.0);

        let mut fired = Vec::new();
        let mut tl = tl;
        tl.update(1.9, &mut fired);
        assert!(fired.is_empty());
        tl.update(0.2, &mut fired);
        assert_eq!(fired, vec![TestCue::Party]);
    }

    #[test]
    fn cues_fire_once_and_in_time_order() {
        let mut tl: Timeline<TestCue> = TimelineBuilder::new()
            .cue(TestCue::Party, At::Offset(1.0))
            .cue(TestCue::Done, At::Offset(2.0))
            .build();
        let mut fired = Vec::new();
        // One big stall crosses both
        tl.update(5.0, &mut fired);
        assert_eq!(fired, vec![TestCue::Party, TestCue::Done]);
        fired.clear();
        tl.update(5.0, &mut fired);
        assert!(fired.is_empty());
    }

    #[test]
    fn restart_rearms_cues_and_rewinds() {
        let mut tl: Timeline<TestCue> = TimelineBuilder::new()
            .cue(TestCue::Done, At::Offset(1.0))
            .build();
        let mut fired = Vec::new();
        tl.update(2.0, &mut fired);
        assert_eq!(fired, vec![TestCue::Done]);
        tl.restart();
        assert_eq!(tl.playhead(), 0.0);
        fired.clear();
        tl.update(2.0, &mut fired);
        assert_eq!(fired, vec![TestCue::Done]);
    }

    #[test]
    fn to_step_blends_from_base_to_patch() {
        let mut scene = scene_with("a", 1);
        let mut tl: Timeline<TestCue> = TimelineBuilder::new()
            .to("a", 1.0, PropPatch::new().opacity(0.0), Ease::Linear, At::End)
            .build();
        let mut fired = Vec::new();
        tl.update(0.5, &mut fired);
        tl.sample(&mut scene);
        assert!((scene.props("a").opacity - 0.5).abs() < 1e-6);
        tl.update(10.0, &mut fired);
        tl.sample(&mut scene);
        assert_eq!(scene.props("a").opacity, 0.0);
    }

    #[test]
    fn from_to_pins_start_value() {
        let mut scene = scene_with("a", 1);
        let mut tl: Timeline<TestCue> = TimelineBuilder::new()
            .from_to(
                "a",
                2.0,
                PropPatch::new().y(100.0),
                PropPatch::new().y(-100.0),
                Ease::Linear,
                At::End,
            )
            .build();
        let mut fired = Vec::new();
        tl.update(0.0, &mut fired);
        tl.sample(&mut scene);
        assert_eq!(scene.props("a").y, 100.0);
        tl.update(1.0, &mut fired);
        tl.sample(&mut scene);
        assert_eq!(scene.props("a").y, 0.0);
    }

    #[test]
    fn stagger_delays_each_element() {
        let mut scene = scene_with("chars", 3);
        let mut tl: Timeline<TestCue> = TimelineBuilder::new()
            .stagger_to(
                "chars",
                3,
                0.5,
                PropPatch::new().opacity(0.0),
                0.5,
                Ease::Linear,
                At::End,
            )
            .build();
        // Stagger tail: last element starts at 1.0, ends at 1.5
        assert_eq!(tl.duration(), 1.5);
        let mut fired = Vec::new();
        tl.update(0.5, &mut fired);
        tl.sample(&mut scene);
        assert_eq!(scene.element("chars", 0).opacity, 0.0);
        assert_eq!(scene.element("chars", 1).opacity, 1.0);
        assert_eq!(scene.element("chars", 2).opacity, 1.0);
    }

    #[test]
    fn sampling_tolerates_missing_sections() {
        let mut scene = Scene::new();
        let mut tl: Timeline<TestCue> = TimelineBuilder::new()
            .to("gallery", 1.0, PropPatch::new().opacity(1.0), Ease::Linear, At::End)
            .build();
        let mut fired = Vec::new();
        tl.update(0.5, &mut fired);
        // Must not panic
        tl.sample(&mut scene);
    }

    #[test]
    fn later_steps_fold_over_earlier_ones() {
        let mut scene = scene_with("a", 1);
        let mut tl: Timeline<TestCue> = TimelineBuilder::new()
            .to("a", 1.0, PropPatch::new().opacity(0.0), Ease::Linear, At::End)
            .to("a", 1.0, PropPatch::new().opacity(1.0), Ease::Linear, At::End)
            .build();
        let mut fired = Vec::new();
        tl.update(1.5, &mut fired);
        tl.sample(&mut scene);
        // Exit finished (0.0), re-entrance halfway back up
        assert!((scene.props("a").opacity - 0.5).abs() < 1e-6);
    }
}
