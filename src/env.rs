use image::imageops::{self, FilterType};
use image::{GrayImage, Luma};
use minifb::{Window, WindowOptions};
use ndarray::{Array3, Zip};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;

use crate::backend::{
    ButtonPresses, EmulationBackend, Frame, Info, SessionOptions, NUM_BUTTONS,
};
use crate::spaces::{BoxSpace, MultiBinary};

/// Side length of the preprocessed observation.
pub const OBS_SIZE: usize = 84;

/// How `render` presents frames.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// Rendering disabled; `render` returns nothing.
    #[default]
    None,
    /// `render` returns the backend's raw frame.
    Array,
    /// Like `Array`, but the frame is also shown in a window.
    Human,
}

struct RenderState {
    buffer: Vec<u32>,
    window: Window,
}

/// Street Fighter II exposed as an RL environment.
///
/// Owns one emulator session plus the episode-scoped state needed to turn
/// raw frames and the game's score counter into frame-delta observations
/// and score-delta rewards. Not safe to share between callers; parallel
/// training uses one instance (and one session) per worker.
pub struct StreetFighterEnv<B: EmulationBackend> {
    pub game: B,
    pub observation_space: BoxSpace,
    pub action_space: MultiBinary,
    savestates: Vec<String>,
    previous_frame: Option<Array3<u8>>,
    score: f64,
    render_mode: RenderMode,
    rng: StdRng,
    render_state: Option<RenderState>,
}

impl<B: EmulationBackend> StreetFighterEnv<B> {
    /// Opens a session for the fixed game title with filtered actions.
    ///
    /// * `savestates`: opaque ids the backend can `load_state`; episodes
    ///   start from a uniformly sampled one. With `None` (or an empty list)
    ///   episodes start from the game's default reset.
    /// * `render_mode`: fixed for the environment's lifetime.
    pub fn new(
        savestates: Option<Vec<String>>,
        render_mode: RenderMode,
    ) -> Result<Self, crate::backend::BackendError> {
        let game = B::open(&SessionOptions::street_fighter())?;
        Ok(Self {
            game,
            observation_space: BoxSpace::new(0, 255, [OBS_SIZE, OBS_SIZE, 1]),
            action_space: MultiBinary::new(NUM_BUTTONS),
            savestates: savestates.unwrap_or_default(),
            previous_frame: None,
            score: 0.0,
            render_mode,
            rng: StdRng::from_entropy(),
            render_state: None,
        })
    }

    /// Starts a new episode and returns the first observation.
    ///
    /// A seed reseeds only the adapter's own sampling; the emulator's
    /// internal randomness (if any) is outside this adapter's control.
    /// `options` is accepted for interface compatibility and ignored.
    pub fn reset(&mut self, seed: Option<u64>, _options: Option<&Info>) -> (Array3<u8>, Info) {
        if let Some(seed) = seed {
            self.rng = StdRng::seed_from_u64(seed);
        }
        let raw = if self.savestates.is_empty() {
            self.game.reset()
        } else {
            let id = &self.savestates[self.rng.gen_range(0..self.savestates.len())];
            // load_state returns no observation; the screen is read back.
            self.game.load_state(id);
            self.game.get_screen()
        };
        let obs = preprocess(&raw);
        self.previous_frame = Some(obs.clone());
        self.score = 0.0;
        (obs, Info::new())
    }

    /// Advances the game by one action.
    ///
    /// The observation is the pixel-wise (wrapping u8) difference between
    /// the new preprocessed frame and the previous one, surfacing motion
    /// rather than the static screen. Reward is the change in the game's
    /// own score counter; the backend's native reward channel is ignored.
    pub fn step(&mut self, action: &ButtonPresses) -> (Array3<u8>, f64, bool, bool, Info) {
        let outcome = self.game.step(action);
        let obs = preprocess(&outcome.frame);

        // Delta against the old buffer, then the buffer advances. A missing
        // buffer means step ran before reset; fall back to zeros rather
        // than reading uninitialized state.
        let previous = self
            .previous_frame
            .take()
            .unwrap_or_else(|| Array3::zeros((OBS_SIZE, OBS_SIZE, 1)));
        let frame_delta = Zip::from(&obs)
            .and(&previous)
            .map_collect(|new, old| new.wrapping_sub(*old));
        self.previous_frame = Some(obs);

        let current_score = outcome
            .info
            .get("score")
            .and_then(Value::as_f64)
            .expect("backend info missing numeric 'score'");
        let reward = current_score - self.score;
        self.score = current_score;

        let terminated = outcome.done;
        // The environment imposes no step limit of its own; truncation is a
        // harness concern.
        let truncated = false;

        (frame_delta, reward, terminated, truncated, outcome.info)
    }

    /// Returns the backend's display frame per the configured render mode.
    pub fn render(&mut self) -> Option<Frame> {
        match self.render_mode {
            RenderMode::None => None,
            RenderMode::Array => self.game.render(),
            RenderMode::Human => {
                let frame = self.game.render()?;
                self.present(&frame);
                Some(frame)
            }
        }
    }

    pub fn render_mode(&self) -> RenderMode {
        self.render_mode
    }

    /// Releases the emulation session.
    pub fn close(&mut self) {
        self.game.close();
    }

    fn present(&mut self, frame: &Frame) {
        let (h, w, _) = frame.dim();
        let render_state = self.render_state.get_or_insert_with(|| RenderState {
            buffer: vec![0; w * h],
            window: Window::new("Street Fighter II", w, h, WindowOptions::default())
                .expect("Couldn't create window"),
        });
        for y in 0..h {
            for x in 0..w {
                let r = frame[[y, x, 0]] as u32;
                let g = frame[[y, x, 1]] as u32;
                let b = frame[[y, x, 2]] as u32;
                render_state.buffer[y * w + x] = (r << 16) + (g << 8) + b;
            }
        }
        render_state
            .window
            .update_with_buffer(&render_state.buffer, w, h)
            .expect("Couldn't render buffer");
    }
}

/// Turns a raw color frame into an 84x84x1 intensity observation: standard
/// luma grayscale, cubic resize, explicit channel dimension. Deterministic,
/// always u8.
pub fn preprocess(frame: &Frame) -> Array3<u8> {
    let (h, w, _) = frame.dim();
    let mut gray = GrayImage::new(w as u32, h as u32);
    for y in 0..h {
        for x in 0..w {
            let r = frame[[y, x, 0]] as f32;
            let g = frame[[y, x, 1]] as f32;
            let b = frame[[y, x, 2]] as f32;
            let luma = (0.299 * r + 0.587 * g + 0.114 * b).round().min(255.0) as u8;
            gray.put_pixel(x as u32, y as u32, Luma([luma]));
        }
    }
    let resized = imageops::resize(
        &gray,
        OBS_SIZE as u32,
        OBS_SIZE as u32,
        FilterType::CatmullRom,
    );
    Array3::from_shape_fn((OBS_SIZE, OBS_SIZE, 1), |(y, x, _)| {
        resized.get_pixel(x as u32, y as u32)[0]
    })
}
