/// Per-tick scratch state shared by the update passes of a single tick.
///
/// A fresh value is built at the start of every tick and dropped at the end;
/// nothing in here survives across ticks. The player update publishes the
/// scroll delta, every later pass consumes it, and end-of-tick bookkeeping
/// folds `game_over` and `shake_requested` back into the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    /// Fixed simulation timestep in seconds.
    pub fixed_dt_seconds: f32,
    /// Horizontal world shift for this tick, negative when the world moves
    /// left under the player. Zero until the player update runs.
    pub scroll_dx: f32,
    /// Right edge of the world in current screen coordinates, sampled before
    /// any scrolling this tick.
    pub world_right_edge_x: f32,
    /// Raised when the player's health reaches zero this tick.
    pub game_over: bool,
    /// Raised when a grenade detonates this tick.
    pub shake_requested: bool,
}

impl FrameContext {
    pub fn for_tick(fixed_dt_seconds: f32, world_right_edge_x: f32) -> Self {
        Self {
            fixed_dt_seconds,
            scroll_dx: 0.0,
            world_right_edge_x,
            game_over: false,
            shake_requested: false,
        }
    }
}
