use super::world::SimWorld;

/// Context passed to each system on every tick.
///
/// Bundled so we can add fields later without changing the `SimSystem`
/// trait signature.
pub struct TickContext<'a> {
    /// Simulated seconds since the previous frame. Never negative.
    pub dt: f32,
    pub world: &'a mut SimWorld,
}
