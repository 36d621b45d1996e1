use ndarray::Array3;
use thiserror::Error;

/// Title of the ROM every session is opened with.
pub const GAME_TITLE: &str = "StreetFighterIISpecialChampionEdition-Genesis";

/// Number of controllable buttons on the Genesis pad.
pub const NUM_BUTTONS: usize = 12;

/// Raw interleaved RGB frame from the emulator, shape (height, width, 3).
pub type Frame = Array3<u8>;

/// One entry per button; nonzero means pressed. Which combinations are
/// legal is the backend's concern, not the adapter's.
pub type ButtonPresses = [u8; NUM_BUTTONS];

/// Auxiliary info mapping passed alongside frames.
pub type Info = serde_json::Map<String, serde_json::Value>;

/// How the backend restricts the raw action space.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ActionFilter {
    /// Every button combination, including nonsensical ones.
    All,
    /// Only legal/meaningful combinations.
    Filtered,
    /// One discrete choice per step.
    Discrete,
}

/// Per-session configuration, fixed at open time.
#[derive(Clone, Debug)]
pub struct SessionOptions {
    pub game: String,
    pub action_filter: ActionFilter,
}

impl SessionOptions {
    /// Options for a Street Fighter II session with filtered actions.
    pub fn street_fighter() -> Self {
        Self {
            game: GAME_TITLE.to_string(),
            action_filter: ActionFilter::Filtered,
        }
    }
}

/// The session could not be brought up. There is no recovery path; callers
/// propagate this out of environment construction.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("unsupported game: {0}")]
    UnsupportedGame(String),
    #[error("emulation session failed to start: {0}")]
    SessionFailed(String),
}

/// Output of a single emulated step.
pub struct StepOutcome {
    pub frame: Frame,
    /// The backend's native reward channel. The adapter ignores this in
    /// favor of the score delta.
    pub reward: f64,
    /// Terminal game condition (round/match over).
    pub done: bool,
    /// Must contain a numeric "score" entry.
    pub info: Info,
}

/// A live emulator session.
///
/// The environment treats these as black-box calls: savestate identifiers
/// are opaque, action legality is delegated, and runtime failures inside the
/// backend panic straight through to the caller.
pub trait EmulationBackend: Sized {
    /// Opens one session for the requested game.
    fn open(options: &SessionOptions) -> Result<Self, BackendError>;

    /// Loads a savestate. Does not return an observation; follow up with
    /// [`get_screen`](EmulationBackend::get_screen).
    fn load_state(&mut self, id: &str);

    /// Returns the current raw frame without advancing emulation.
    fn get_screen(&mut self) -> Frame;

    /// Resets to the game's default start and returns the initial frame.
    fn reset(&mut self) -> Frame;

    /// Advances emulation by one step.
    fn step(&mut self, action: &ButtonPresses) -> StepOutcome;

    /// Returns the current display frame, if the backend produces one.
    fn render(&mut self) -> Option<Frame>;

    /// Shuts the session down. Whether a second call is safe is
    /// backend-defined.
    fn close(&mut self);
}
