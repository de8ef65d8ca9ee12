use serde::{Deserialize, Serialize};

/// Cadence used when a clip definition does not override it: the frame index
/// advances every 6 ticks, i.e. 10 animation frames per second at 60 TPS.
pub const ANIM_CADENCE_DEFAULT: u32 = 6;

/// One playable strip of frames inside a sprite sheet.
///
/// Frames are laid out left to right in a single row. `sheet` is a sprite key
/// resolved by the renderer against the assets directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionClip {
    pub sheet: String,
    pub frame_width: u32,
    pub frame_height: u32,
    pub frame_count: u32,
    pub cadence: u32,
    pub looped: bool,
}

/// Playback cursor over an [`ActionClip`].
///
/// The counter runs monotonically and the frame index moves only on counter
/// multiples of the cadence. A non-looping clip parks on its last frame and
/// reports "no longer playing" on the first cadence boundary after reaching
/// it; between boundaries `advance` keeps returning true.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationController {
    frame: u32,
    counter: u32,
    cadence: u32,
    frame_count: u32,
    looped: bool,
}

impl AnimationController {
    /// Fresh cursor at frame zero of `clip`.
    pub fn start(clip: &ActionClip) -> Self {
        Self {
            frame: 0,
            counter: 0,
            cadence: clip.cadence.max(1),
            frame_count: clip.frame_count.max(1),
            looped: clip.looped,
        }
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Advances playback by one tick. Returns false only on the cadence
    /// boundary where a non-looping clip has already shown its last frame.
    pub fn advance(&mut self) -> bool {
        let mut playing = true;
        self.counter += 1;
        if self.counter % self.cadence == 0 {
            if self.frame + 1 < self.frame_count {
                self.frame += 1;
            } else if self.looped {
                self.frame = 0;
            } else {
                playing = false;
            }
        }
        playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(frame_count: u32, cadence: u32, looped: bool) -> ActionClip {
        ActionClip {
            sheet: "soldier_idle".to_string(),
            frame_width: 60,
            frame_height: 80,
            frame_count,
            cadence,
            looped,
        }
    }

    #[test]
    fn frame_advances_only_on_cadence_boundaries() {
        let mut anim = AnimationController::start(&clip(4, 6, true));
        for _ in 0..5 {
            assert!(anim.advance());
            assert_eq!(anim.frame(), 0);
        }
        assert!(anim.advance());
        assert_eq!(anim.frame(), 1);
    }

    #[test]
    fn looping_clip_wraps_to_frame_zero() {
        let mut anim = AnimationController::start(&clip(3, 2, true));
        for _ in 0..6 {
            assert!(anim.advance());
        }
        assert_eq!(anim.frame(), 0);
    }

    #[test]
    fn non_looping_clip_parks_on_last_frame_and_stops() {
        let mut anim = AnimationController::start(&clip(3, 2, false));
        for _ in 0..4 {
            assert!(anim.advance());
        }
        assert_eq!(anim.frame(), 2);
        // Next boundary is two ticks away; the tick in between still plays.
        assert!(anim.advance());
        assert!(!anim.advance());
        assert_eq!(anim.frame(), 2);
    }

    #[test]
    fn single_frame_non_looping_clip_finishes_on_first_boundary() {
        let mut anim = AnimationController::start(&clip(1, 3, false));
        assert!(anim.advance());
        assert!(anim.advance());
        assert!(!anim.advance());
    }

    #[test]
    fn explosion_style_clip_runs_frame_count_times_cadence_ticks() {
        // 6 frames at cadence 3: last frame is reached on tick 15 and the
        // finished signal lands on tick 18.
        let mut anim = AnimationController::start(&clip(6, 3, false));
        let mut finished_at = None;
        for tick in 1..=30 {
            if !anim.advance() {
                finished_at = Some(tick);
                break;
            }
        }
        assert_eq!(finished_at, Some(18));
    }

    #[test]
    fn start_tolerates_degenerate_clip_values() {
        let mut anim = AnimationController::start(&clip(0, 0, true));
        assert!(anim.advance());
        assert_eq!(anim.frame(), 0);
    }
}
