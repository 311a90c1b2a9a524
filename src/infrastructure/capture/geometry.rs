//! Window geometry as reported by `xwininfo`

/// Position and size of an X window, in root-window coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowGeometry {
    pub window_id: String,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl WindowGeometry {
    /// Clamp to the visible area and round the size down to even numbers,
    /// which the 4:2:0 encoders require.
    pub fn normalized(&self) -> Self {
        Self {
            window_id: self.window_id.clone(),
            x: self.x.max(0),
            y: self.y.max(0),
            width: self.width & !1,
            height: self.height & !1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Parse the output of `xwininfo` (interactive or `-root`).
///
/// Returns `None` if the id or any of the geometry fields are missing.
pub fn parse_xwininfo(output: &str) -> Option<WindowGeometry> {
    let mut window_id = None;
    let mut x = None;
    let mut y = None;
    let mut width = None;
    let mut height = None;

    for line in output.lines() {
        let line = line.trim();
        if let Some(rest) = line
            .strip_prefix("xwininfo: Window id:")
            .or_else(|| line.strip_prefix("Window id:"))
        {
            window_id = rest.split_whitespace().next().map(str::to_string);
        } else if let Some(rest) = line.strip_prefix("Absolute upper-left X:") {
            x = rest.trim().parse().ok();
        } else if let Some(rest) = line.strip_prefix("Absolute upper-left Y:") {
            y = rest.trim().parse().ok();
        } else if let Some(rest) = line.strip_prefix("Width:") {
            width = rest.trim().parse().ok();
        } else if let Some(rest) = line.strip_prefix("Height:") {
            height = rest.trim().parse().ok();
        }
    }

    Some(WindowGeometry {
        window_id: window_id?,
        x: x?,
        y: y?,
        width: width?,
        height: height?,
    })
}
