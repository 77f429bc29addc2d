//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Scale `source` down to fit inside `bounds`, preserving aspect ratio.
///
/// Never upscales: a source already inside the box is returned unchanged.
/// Neither output edge drops below 1px.
///
/// # Examples
/// ```
/// # use photo_page::imaging::fit_within;
/// // 4000x3000 into 1280x1280 → 1280x960
/// assert_eq!(fit_within((4000, 3000), (1280, 1280)), (1280, 960));
///
/// // Small images are left alone
/// assert_eq!(fit_within((640, 480), (1280, 1280)), (640, 480));
/// ```
pub fn fit_within(source: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (max_w, max_h) = bounds;

    if src_w <= max_w && src_h <= max_h {
        return source;
    }

    let scale = f64::min(
        max_w as f64 / src_w as f64,
        max_h as f64 / src_h as f64,
    );

    let w = ((src_w as f64 * scale).round() as u32).clamp(1, max_w.max(1));
    let h = ((src_h as f64 * scale).round() as u32).clamp(1, max_h.max(1));
    (w, h)
}
