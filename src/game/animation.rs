// Doll animation: frame timing plus per-frame base part visibility keys

use crate::core::BodyPart;
use std::collections::HashMap;

/// Show or hide one base part when playback enters `frame`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartVisibilityKey {
    pub frame: usize,
    pub part: BodyPart,
    pub active: bool,
}

/// A single animation clip
#[derive(Debug, Clone)]
pub struct AnimationClip {
    /// Name of the animation (e.g., "idle", "walk", "wave")
    pub name: String,
    /// Number of frames in the animation
    pub frame_count: usize,
    /// Duration of each frame in seconds
    pub frame_duration: f32,
    /// Whether the animation loops
    pub looping: bool,
    keys: Vec<PartVisibilityKey>,
}

impl AnimationClip {
    pub fn new(name: &str, frame_count: usize, fps: f32, looping: bool) -> Self {
        Self {
            name: name.to_string(),
            frame_count,
            frame_duration: 1.0 / fps,
            looping,
            keys: Vec::new(),
        }
    }

    pub fn looping(name: &str, frame_count: usize, fps: f32) -> Self {
        Self::new(name, frame_count, fps, true)
    }

    /// Create a one-shot animation (plays once)
    pub fn one_shot(name: &str, frame_count: usize, fps: f32) -> Self {
        Self::new(name, frame_count, fps, false)
    }

    /// Toggle a base part when `frame` is reached. Frames past the end are clamped
    pub fn with_key(mut self, frame: usize, part: BodyPart, active: bool) -> Self {
        let frame = frame.min(self.frame_count.saturating_sub(1));
        self.keys.push(PartVisibilityKey { frame, part, active });
        self
    }

    /// Keys of one frame, in the order they were added
    pub fn keys_at(&self, frame: usize) -> impl Iterator<Item = &PartVisibilityKey> + '_ {
        self.keys.iter().filter(move |key| key.frame == frame)
    }
}

/// Plays one clip at a time and reports the visibility keys it passes
#[derive(Debug)]
pub struct AnimationPlayer {
    animations: HashMap<String, AnimationClip>,
    current_animation: String,
    current_frame: usize,
    /// Time elapsed in current frame
    frame_timer: f32,
    playing: bool,
    /// Whether the first frame's keys have been reported
    entered: bool,
}

impl Default for AnimationPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationPlayer {
    pub fn new() -> Self {
        Self {
            animations: HashMap::new(),
            current_animation: String::new(),
            current_frame: 0,
            frame_timer: 0.0,
            playing: true,
            entered: false,
        }
    }

    pub fn add_animation(&mut self, clip: AnimationClip) {
        self.animations.insert(clip.name.clone(), clip);
    }

    /// Play an animation by name; already playing it: no-op
    pub fn play(&mut self, name: &str) {
        if self.current_animation != name {
            self.play_from_start(name);
        }
    }

    /// Play an animation from the beginning, even if it's the same
    pub fn play_from_start(&mut self, name: &str) {
        self.current_animation = name.to_string();
        self.current_frame = 0;
        self.frame_timer = 0.0;
        self.playing = true;
        self.entered = false;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Advance playback and return the keys of every frame entered, in order
    pub fn update(&mut self, dt: f32) -> Vec<PartVisibilityKey> {
        let mut crossed = Vec::new();
        if !self.playing {
            return crossed;
        }

        let Some(clip) = self.animations.get(&self.current_animation) else {
            return crossed;
        };

        if !self.entered {
            self.entered = true;
            crossed.extend(clip.keys_at(self.current_frame).copied());
        }

        self.frame_timer += dt;

        while self.frame_timer >= clip.frame_duration {
            self.frame_timer -= clip.frame_duration;
            self.current_frame += 1;

            if self.current_frame >= clip.frame_count {
                if clip.looping {
                    self.current_frame = 0;
                } else {
                    // Stay on last frame
                    self.current_frame = clip.frame_count.saturating_sub(1);
                    self.playing = false;
                    break;
                }
            }
            crossed.extend(clip.keys_at(self.current_frame).copied());
        }

        crossed
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Check if the current animation has finished (for non-looping animations)
    pub fn is_finished(&self) -> bool {
        if let Some(clip) = self.animations.get(&self.current_animation) {
            !clip.looping && self.current_frame + 1 >= clip.frame_count && !self.playing
        } else {
            true
        }
    }
}
