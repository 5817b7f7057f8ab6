use tracing::debug;

use crate::constants::*;
use crate::ease::Ease;
use crate::scene::{PropPatch, Scene};
use crate::timeline::{At, Timeline, TimelineBuilder};

/// Timeline events the frame loop reacts to. The confetti cues bracket the
/// party stretch; `Finished` is the explicit end-of-presentation hook the
/// replay logic keys off.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Cue {
    PartyStart,
    PartyEnd,
    Finished,
}

pub struct Storyboard {
    timeline: Timeline<Cue>,
}

// Recurring poses of the script
fn enter_up() -> PropPatch {
    PropPatch::new().opacity(1.0).y(0.0)
}

fn leave_down() -> PropPatch {
    PropPatch::new().opacity(0.0).y(20.0).rotation(-5.0)
}

fn idea_rest() -> PropPatch {
    PropPatch::new().opacity(1.0).y(0.0).rotation(0.0)
}

impl Storyboard {
    /// The full fixed script. Stagger counts are read from the scene so the
    /// per-character runs match whatever the customization produced; absent
    /// collaborator sections simply resolve to zero-element staggers or
    /// skipped steps.
    pub fn build(scene: &Scene) -> Self {
        let chat_chars = scene.count("chatbox");
        let surprise_chars = scene.count("idea6");
        let wish_chars = scene.count("wish_hbd");
        let balloons = scene.count("balloons");
        let rays = scene.count("rays");
        let outro_lines = scene.count("outro");

        let mut tl = TimelineBuilder::new()
            .to("container", 0.1, PropPatch::new().opacity(1.0), Ease::Linear, At::End)
            // Opening lines
            .to("one", 0.7, enter_up(), Ease::OutQuad, At::End)
            .to("two", 0.4, enter_up(), Ease::OutQuad, At::Offset(2.0))
            .to("one", 0.7, PropPatch::new().opacity(0.0).y(10.0), Ease::OutQuad, At::Offset(3.5))
            .to("two", 0.7, PropPatch::new().opacity(0.0).y(10.0), Ease::OutQuad, At::Offset(-1.0))
            .to("three", 0.7, enter_up(), Ease::OutQuad, At::End)
            .to("three", 0.7, PropPatch::new().opacity(0.0).y(10.0), Ease::OutQuad, At::Offset(3.5))
            // Chat panel types out the message
            .to("four", 0.7, PropPatch::new().opacity(1.0).scale(1.0), Ease::OutQuad, At::End)
            .to("fake_btn", 0.3, PropPatch::new().opacity(1.0).scale(1.0), Ease::OutQuad, At::End)
            .stagger_to("chatbox", chat_chars, 0.5, PropPatch::new().opacity(1.0), 0.05, Ease::Linear, At::End)
            .to("fake_btn", 0.1, PropPatch::new().color(CARD_BUTTON), Ease::Linear, At::End)
            .to("four", 0.5, PropPatch::new().opacity(0.0).scale(0.2).y(-150.0), Ease::OutQuad, At::Offset(7.0))
            // Idea lines, one at a time
            .to("idea1", 0.7, idea_rest(), Ease::OutQuad, At::End)
            .to("idea1", 0.7, leave_down(), Ease::OutQuad, At::Offset(6.0))
            .to("idea2", 0.7, idea_rest(), Ease::OutQuad, At::End)
            .to("idea2", 0.7, leave_down(), Ease::OutQuad, At::Offset(6.0))
            .to("idea3", 0.7, idea_rest(), Ease::OutQuad, At::End)
            .to("idea3_em", 0.5, PropPatch::new().scale(1.1).color(CARD_ACCENT), Ease::OutQuad, At::Offset(2.0))
            .to("idea3", 0.7, leave_down(), Ease::OutQuad, At::Offset(6.0))
            .to("idea4", 0.7, idea_rest(), Ease::OutQuad, At::End)
            .to("idea4", 0.7, leave_down(), Ease::OutQuad, At::Offset(6.0))
            .to("idea5", 0.7, idea_rest(), Ease::OutQuad, At::End)
            .to("idea5_smiley", 0.7, PropPatch::new().rotation(90.0).x(8.0), Ease::OutQuad, At::Offset(0.4))
            .to("idea5", 0.7, PropPatch::new().opacity(0.0).scale(0.2), Ease::OutQuad, At::Offset(5.0))
            // The big surprise word, in and out per character
            .stagger_to("idea6", surprise_chars, 0.8, PropPatch::new().opacity(1.0).scale(1.0).rotation(0.0), 0.2, Ease::OutExpo, At::End)
            .stagger_to("idea6", surprise_chars, 0.8, PropPatch::new().opacity(0.0).scale(3.0).rotation(-15.0), 0.2, Ease::OutExpo, At::Offset(3.0))
            // Balloons sail through, portrait and hat land
            .stagger_from_to(
                "balloons",
                balloons,
                2.5,
                PropPatch::new().opacity(0.9).y(1400.0),
                PropPatch::new().opacity(1.0).y(-1000.0),
                0.2,
                Ease::OutQuad,
                At::End,
            )
            .to("photo", 0.5, PropPatch::new().opacity(1.0).scale(1.0).x(0.0).y(0.0).rotation(0.0), Ease::OutQuad, At::Offset(-2.0))
            .to("hat", 0.5, PropPatch::new().opacity(1.0).x(0.0).y(0.0).rotation(0.0), Ease::OutQuad, At::End)
            // Party moment
            .cue(Cue::PartyStart, At::Marker("party"))
            .stagger_to("wish_hbd", wish_chars, 0.7, PropPatch::new().opacity(1.0).y(0.0).rotation(0.0), 0.1, Ease::OutElastic, At::End)
            .stagger_to("wish_hbd", wish_chars, 0.7, PropPatch::new().scale(1.0).color(CARD_ACCENT), 0.1, Ease::OutExpo, At::Marker("party"))
            .to("wish_note", 0.5, enter_up(), Ease::OutQuad, At::Marker("party"));

        // Ray pulses: four passes stand in for the original repeat count
        tl = tl.marker("rays");
        for pass in 0..4 {
            tl = tl.stagger_from_to(
                "rays",
                rays,
                1.5,
                PropPatch::new().opacity(0.9).scale(1.0),
                PropPatch::new().opacity(0.0).scale(80.0),
                0.3,
                Ease::OutQuad,
                At::MarkerOffset("rays", pass as f32 * 2.9),
            );
        }

        let timeline = tl
            .to("six", 0.5, PropPatch::new().opacity(0.0).y(30.0), Ease::OutQuad, At::End)
            .cue(Cue::PartyEnd, At::Offset(-0.5))
            // Closing reveals: gallery first, then the outro, then the music panel
            .to("gallery", 1.0, enter_up(), Ease::OutCubic, At::Marker("phase9"))
            .stagger_to("outro", outro_lines, 1.0, enter_up(), 1.0, Ease::OutQuad, At::MarkerOffset("phase9", 0.3))
            .to("last_smile", 0.5, PropPatch::new().opacity(1.0).rotation(90.0), Ease::OutQuad, At::Offset(0.5))
            .to("music", 1.0, enter_up(), Ease::OutCubic, At::Offset(-0.3))
            .cue(Cue::Finished, At::End)
            .build();

        debug!(duration = timeline.duration(), "storyboard resolved");
        Self { timeline }
    }

    pub fn duration(&self) -> f32 {
        self.timeline.duration()
    }

    pub fn update(&mut self, dt: f32, fired: &mut Vec<Cue>) {
        self.timeline.update(dt, fired);
    }

    pub fn sample(&self, scene: &mut Scene) {
        self.timeline.sample(scene);
    }

    /// Pure restart of the resolved schedule; cues re-arm, steps replay at
    /// the same absolute times.
    pub fn replay(&mut self) {
        self.timeline.restart();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Content, build_scene};

    fn run_until(board: &mut Storyboard, t: f32) -> Vec<Cue> {
        let mut fired = Vec::new();
        let steps = (t / 0.1).ceil() as usize;
        for _ in 0..steps {
            board.update(0.1, &mut fired);
        }
        fired
    }

    #[test]
    fn script_resolves_to_a_long_presentation() {
        let scene = build_scene(&Content::defaults());
        let board = Storyboard::build(&scene);
        // The full storyboard runs for over a minute of scripted steps
        assert!(board.duration() > 60.0, "duration {}", board.duration());
    }

    #[test]
    fn cues_fire_in_script_order() {
        let scene = build_scene(&Content::defaults());
        let mut board = Storyboard::build(&scene);
        let duration = board.duration();
        let fired = run_until(&mut board, duration + 1.0);
        assert_eq!(fired, vec![Cue::PartyStart, Cue::PartyEnd, Cue::Finished]);
    }

    #[test]
    fn party_stretch_sits_strictly_inside_the_script() {
        let scene = build_scene(&Content::defaults());
        let mut board = Storyboard::build(&scene);
        let duration = board.duration();

        let mut fired = Vec::new();
        let mut t = 0.0;
        let mut party_start = None;
        let mut party_end = None;
        while t < duration + 1.0 {
            board.update(0.1, &mut fired);
            t += 0.1;
            for cue in fired.drain(..) {
                match cue {
                    Cue::PartyStart => party_start = Some(t),
                    Cue::PartyEnd => party_end = Some(t),
                    Cue::Finished => {}
                }
            }
        }
        let start = party_start.unwrap();
        let end = party_end.unwrap();
        assert!(start > 10.0, "party starts well into the script");
        assert!(end > start + 5.0, "confetti runs for a while");
        assert!(end < duration, "confetti stops before the script ends");
    }

    #[test]
    fn final_pose_shows_gallery_outro_and_music() {
        let mut scene = build_scene(&Content::defaults());
        let mut board = Storyboard::build(&scene);
        let duration = board.duration();
        run_until(&mut board, duration + 1.0);
        board.sample(&mut scene);

        assert_eq!(scene.props("container").opacity, 1.0);
        assert_eq!(scene.props("gallery").opacity, 1.0);
        assert_eq!(scene.props("gallery").y, 0.0);
        assert_eq!(scene.props("music").opacity, 1.0);
        assert_eq!(scene.element("outro", 2).opacity, 1.0);
        // The portrait group has been dimmed out
        assert_eq!(scene.props("six").opacity, 0.0);
    }

    #[test]
    fn opening_pose_hides_everything_but_the_first_line() {
        let mut scene = build_scene(&Content::defaults());
        let mut board = Storyboard::build(&scene);
        run_until(&mut board, 1.5);
        board.sample(&mut scene);

        assert_eq!(scene.props("container").opacity, 1.0);
        assert!(scene.props("one").opacity > 0.9);
        assert_eq!(scene.props("two").opacity, 0.0);
        assert_eq!(scene.props("gallery").opacity, 0.0);
        assert_eq!(scene.props("music").opacity, 0.0);
    }

    #[test]
    fn replay_reproduces_the_same_pose() {
        let mut scene = build_scene(&Content::defaults());
        let mut board = Storyboard::build(&scene);

        run_until(&mut board, 20.0);
        board.sample(&mut scene);
        let first = scene.props("idea1");

        board.replay();
        assert_eq!(board.timeline.playhead(), 0.0);
        run_until(&mut board, 20.0);
        board.sample(&mut scene);
        assert_eq!(scene.props("idea1"), first);

        // And the cues fire again on the replayed run
        let duration = board.duration();
        let fired = run_until(&mut board, duration);
        assert!(fired.contains(&Cue::PartyStart));
    }

    #[test]
    fn storyboard_tolerates_missing_collaborator_sections() {
        // A scene without gallery or music sections still samples cleanly
        let mut scene = crate::scene::Scene::new();
        scene.add("container", crate::scene::Props::default(), 1);
        let full_scene = build_scene(&Content::defaults());
        let mut board = Storyboard::build(&full_scene);
        run_until(&mut board, 10.0);
        board.sample(&mut scene);
    }
}
