use ndarray::Array3;
use rand::Rng;
use sf2_env::backend::{
    BackendError, ButtonPresses, EmulationBackend, Frame, Info, SessionOptions, StepOutcome,
};
use sf2_env::env::{RenderMode, StreetFighterEnv};

/// Stand-in emulator that scrolls a test pattern and pays out score for
/// button presses. Lets the env loop run without a real emulator attached.
struct PatternBackend {
    tick: u64,
    score: f64,
}

fn pattern(tick: u64) -> Frame {
    Array3::from_shape_fn((224, 320, 3), |(y, x, c)| {
        ((x + y + tick as usize * 4 + c * 40) % 256) as u8
    })
}

impl EmulationBackend for PatternBackend {
    fn open(_options: &SessionOptions) -> Result<Self, BackendError> {
        Ok(Self { tick: 0, score: 0.0 })
    }

    fn load_state(&mut self, _id: &str) {
        self.tick = 0;
        self.score = 0.0;
    }

    fn get_screen(&mut self) -> Frame {
        pattern(self.tick)
    }

    fn reset(&mut self) -> Frame {
        self.tick = 0;
        self.score = 0.0;
        pattern(self.tick)
    }

    fn step(&mut self, action: &ButtonPresses) -> StepOutcome {
        self.tick += 1;
        let presses = action.iter().filter(|&&b| b != 0).count() as f64;
        self.score += presses * 10.0;
        let mut info = Info::new();
        info.insert("score".to_string(), self.score.into());
        StepOutcome {
            frame: pattern(self.tick),
            reward: 0.0,
            done: self.tick >= 600,
            info,
        }
    }

    fn render(&mut self) -> Option<Frame> {
        Some(pattern(self.tick))
    }

    fn close(&mut self) {}
}

fn main() {
    let mut env: StreetFighterEnv<PatternBackend> =
        StreetFighterEnv::new(None, RenderMode::Human).expect("Couldn't open session");
    let mut rng = rand::thread_rng();
    _ = env.reset(None, None);
    loop {
        let action: ButtonPresses = std::array::from_fn(|_| rng.gen_range(0..=1));
        let (_, _, done, trunc, _) = env.step(&action);
        env.render();
        if done || trunc {
            _ = env.reset(None, None);
        }
    }
}
