use overlay_scan_types::RegionView;

/// Reading direction for a linear bar gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Estimate a bar gauge's fill fraction from the position of its strongest
/// intensity edge.
///
/// A thin strip through the middle of the region is averaged down to a 1-D
/// intensity profile, and the argmax of the profile's absolute first
/// difference marks the fill/empty boundary. Progress bars render as two
/// intensity regions abutting at one edge, so the strongest local gradient is
/// a cheap, rotation-free position estimate. A constant-intensity region has
/// an all-zero difference profile; argmax then resolves to the first index
/// and the reported position is 0.0.
///
/// Returns `None` when the profile is shorter than 2 pixels, in which case no
/// edge position is defined.
pub fn bar_position(view: &RegionView<'_>, orientation: Orientation) -> Option<f64> {
    let profile = match orientation {
        Orientation::Horizontal => horizontal_profile(view)?,
        Orientation::Vertical => vertical_profile(view)?,
    };
    if profile.len() < 2 {
        return None;
    }

    let mut edge_index = 0usize;
    let mut strongest = -1i32;
    for (i, pair) in profile.windows(2).enumerate() {
        let difference = (pair[1] as i32 - pair[0] as i32).abs();
        if difference > strongest {
            strongest = difference;
            edge_index = i;
        }
    }

    Some(edge_index as f64 / (profile.len() - 1) as f64)
}

/// Strip half-extent: a tenth of the cross dimension, at least 1, at most 6.
fn strip_half_extent(cross: u32) -> u32 {
    (cross / 10).clamp(1, 6)
}

fn horizontal_profile(view: &RegionView<'_>) -> Option<Vec<u8>> {
    let width = view.width();
    let height = view.height();
    if width < 2 || height == 0 {
        return None;
    }
    let half = strip_half_extent(height);
    let mid = height / 2;
    let top = mid.saturating_sub(half);
    let bottom = (mid + half).min(height);

    let rows = (bottom - top) as u64;
    let mut profile = Vec::with_capacity(width as usize);
    for x in 0..width {
        let mut sum = 0u64;
        for y in top..bottom {
            sum += view.pixel(x, y) as u64;
        }
        profile.push((sum / rows) as u8);
    }
    Some(profile)
}

fn vertical_profile(view: &RegionView<'_>) -> Option<Vec<u8>> {
    let width = view.width();
    let height = view.height();
    if height < 2 || width == 0 {
        return None;
    }
    let half = strip_half_extent(width);
    let mid = width / 2;
    let left = mid.saturating_sub(half);
    let right = (mid + half).min(width);

    let cols = (right - left) as u64;
    let mut profile = Vec::with_capacity(height as usize);
    for y in 0..height {
        let mut sum = 0u64;
        for x in left..right {
            sum += view.pixel(x, y) as u64;
        }
        profile.push((sum / cols) as u8);
    }
    Some(profile)
}
