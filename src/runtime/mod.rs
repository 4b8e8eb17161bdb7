//! Clock, animation state and the frame loop that ties them together

pub mod animation;
pub mod clock;
pub mod frame_loop;

pub use animation::{AnimationRules, AnimationState, Spin};
pub use clock::{Clock, ManualTimeSource, SystemTimeSource, TimeSource};
pub use frame_loop::{FrameHost, FrameLoop, LoopState, StopToken, TickOutcome};
