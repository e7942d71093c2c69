//! Small UI helpers: sizes, durations, popup placement.

use ratatui::layout::Rect;

/// Kibibytes as a short human-readable size.
pub fn human_kb(kb: u64) -> String {
    const K: f64 = 1024.0;
    let kb = kb as f64;
    if kb < K {
        return format!("{kb:.0}K");
    }
    let mb = kb / K;
    if mb < K {
        return format!("{mb:.1}M");
    }
    let gb = mb / K;
    if gb < K {
        return format!("{gb:.1}G");
    }
    format!("{:.2}T", gb / K)
}

/// `[d-]hh:mm:ss`, like the ELAPSED column of ps.
pub fn fmt_elapsed(secs: u64) -> String {
    let (days, rem) = (secs / 86_400, secs % 86_400);
    let (h, m, s) = (rem / 3600, rem % 3600 / 60, rem % 60);
    if days > 0 {
        format!("{days}-{h:02}:{m:02}:{s:02}")
    } else {
        format!("{h:02}:{m:02}:{s:02}")
    }
}

/// A `width` x `height` rectangle centered in `area`, shrunk to fit.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes() {
        assert_eq!(human_kb(512), "512K");
        assert_eq!(human_kb(2048), "2.0M");
        assert_eq!(human_kb(3 * 1024 * 1024 + 512 * 1024), "3.5G");
    }

    #[test]
    fn elapsed() {
        assert_eq!(fmt_elapsed(0), "00:00:00");
        assert_eq!(fmt_elapsed(3661), "01:01:01");
        assert_eq!(fmt_elapsed(86_400 * 2 + 59), "2-00:00:59");
    }

    #[test]
    fn popup_fits_small_screens() {
        let r = centered(Rect::new(0, 0, 20, 10), 40, 6);
        assert_eq!(r, Rect::new(0, 2, 20, 6));
    }
}
