/// Largest edge a resize may produce, sent or derived. Matches libwebp's limit.
pub const MAX_DIMENSION: u32 = 16_383;

/// Resize step requested by the client. Carries only the dimensions that were sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeDirective {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ResizeDirective {
    /// Build a directive from the raw `width`/`height` form fields.
    ///
    /// Returns `None` when neither field holds a positive integer, meaning no resize step runs.
    /// Values larger than `MAX_DIMENSION` are clamped.
    pub fn from_fields(width: Option<&str>, height: Option<&str>) -> Option<Self> {
        let width = width.and_then(parse_dimension);
        let height = height.and_then(parse_dimension);

        if width.is_none() && height.is_none() {
            return None;
        }

        Some(ResizeDirective { width, height })
    }

    /// Target dimensions for an image of `orig_width` x `orig_height`.
    ///
    /// With a single dimension the other one keeps the aspect ratio; with both the
    /// image is resized exactly. A derived edge above `MAX_DIMENSION` shrinks both
    /// edges until it fits, keeping the aspect ratio.
    pub fn target_dimensions(&self, orig_width: u32, orig_height: u32) -> (u32, u32) {
        match (self.width, self.height) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) => {
                let aspect_ratio = orig_height as f64 / orig_width.max(1) as f64;
                fit_within_max(w as f64, w as f64 * aspect_ratio)
            }
            (None, Some(h)) => {
                let aspect_ratio = orig_width as f64 / orig_height.max(1) as f64;
                let (h, w) = fit_within_max(h as f64, h as f64 * aspect_ratio);
                (w, h)
            }
            (None, None) => (orig_width, orig_height),
        }
    }
}

/// Round a (requested, derived) edge pair, scaling both down when the derived edge
/// exceeds `MAX_DIMENSION`. Neither edge ends up below 1.
fn fit_within_max(requested: f64, derived: f64) -> (u32, u32) {
    let max = MAX_DIMENSION as f64;
    let (requested, derived) = if derived > max {
        (requested * max / derived, max)
    } else {
        (requested, derived)
    };
    (round_edge(requested), round_edge(derived))
}

fn round_edge(edge: f64) -> u32 {
    edge.round().clamp(1.0, MAX_DIMENSION as f64) as u32
}

fn parse_dimension(raw: &str) -> Option<u32> {
    let value = raw.trim().parse::<u32>().ok()?;
    if value == 0 {
        return None;
    }
    Some(value.min(MAX_DIMENSION))
}
