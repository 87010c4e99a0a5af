use glam::Vec2;

/// An action the engine performs in response to input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Mouse-look by a drag of `delta` pixels.
    RotateCamera {
        /// Cursor movement since the last event.
        delta: Vec2,
    },
    /// Pick the triangle under the given pixel.
    Pick {
        /// Horizontal position in physical pixels.
        x: f32,
        /// Vertical position in physical pixels.
        y: f32,
    },
    /// Hide the pick highlight.
    ClearPick,
    /// Return the camera to its start pose.
    ResetCamera,
}
