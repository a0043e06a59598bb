// src/canvas/tests.rs

use super::*;
use test_log::test;

fn clean_canvas() -> Canvas {
    let mut canvas = Canvas::new(320, 480, 256, 64).unwrap();
    for y in 0..canvas.height() {
        canvas.dirty_mut().clear_row(y);
    }
    canvas
}

#[test]
fn crop_fully_visible_span_is_unchanged() {
    let span = crop_to_viewport(10, 20, 320).unwrap();
    assert_eq!(span, Span { start: 10, len: 20 });
    assert_eq!(span.end(), 29);
}

#[test]
fn crop_clips_left_edge() {
    let span = crop_to_viewport(-5, 10, 320).unwrap();
    assert_eq!(span, Span { start: 0, len: 5 });
    assert_eq!(span.end(), 4);
}

#[test]
fn crop_clips_right_edge() {
    let span = crop_to_viewport(310, 20, 320).unwrap();
    assert_eq!(span, Span { start: 310, len: 10 });
    assert_eq!(span.end(), 319);
}

#[test]
fn crop_clips_both_edges() {
    let span = crop_to_viewport(-100, 1000, 320).unwrap();
    assert_eq!(span, Span { start: 0, len: 320 });
}

#[test]
fn crop_rejects_invisible_spans() {
    assert_eq!(crop_to_viewport(320, 5, 320), None);
    assert_eq!(crop_to_viewport(-10, 10, 320), None); // ends at -1
    assert_eq!(crop_to_viewport(5, 0, 320), None);
    assert_eq!(crop_to_viewport(0, 5, 0), None);
}

#[test]
fn crop_never_leaves_the_viewport() {
    for view in [1usize, 7, 64, 320] {
        for start in -80i32..400 {
            for length in [0u32, 1, 2, 5, 63, 64, 65, 500] {
                let end = i64::from(start) + i64::from(length) - 1;
                let intersects = length > 0 && end >= 0 && i64::from(start) < view as i64;
                match crop_to_viewport(start, length, view) {
                    Some(span) => {
                        assert!(intersects, "start={} len={} view={}", start, length, view);
                        assert!(span.len > 0);
                        assert!(span.end() < view);
                        assert!(span.start as i64 >= i64::from(start));
                        assert!(span.end() as i64 <= end);
                    }
                    None => assert!(!intersects, "start={} len={} view={}", start, length, view),
                }
            }
        }
    }
}

#[test]
fn set_then_get_roundtrips_across_sector_boundary() {
    let mut canvas = clean_canvas();
    for (x, y, c) in [(0, 0, 1u8), (319, 255, 2), (0, 256, 3), (319, 256, 4), (160, 479, 5)] {
        canvas.set_pixel(x, y, c);
        assert_eq!(canvas.get_pixel(x, y), Some(c), "pixel ({}, {})", x, y);
    }
    assert_eq!(canvas.get_pixel(319, 255), Some(2));
    assert_eq!(canvas.get_pixel(0, 256), Some(3));
}

#[test]
fn set_pixel_marks_only_its_band() {
    let mut canvas = clean_canvas();
    canvas.set_pixel(130, 300, 9);
    assert!(canvas.dirty().is_dirty(300, 2));
    assert_eq!(canvas.dirty().dirty_count(), 1);
}

#[test]
fn off_canvas_pixel_is_a_no_op() {
    let mut canvas = clean_canvas();
    canvas.set_pixel(-1, 0, 1);
    canvas.set_pixel(0, -1, 1);
    canvas.set_pixel(320, 0, 1);
    canvas.set_pixel(0, 480, 1);
    assert!(canvas.dirty().is_clean());
    assert_eq!(canvas.get_pixel(-1, 0), None);
}

#[test]
fn fill_marks_everything_dirty() {
    let mut canvas = clean_canvas();
    canvas.fill(7);
    assert_eq!(canvas.dirty().dirty_count(), canvas.dirty().capacity());
    assert_eq!(canvas.get_pixel(0, 0), Some(7));
    assert_eq!(canvas.get_pixel(319, 479), Some(7));
}

#[test]
fn hline_is_clipped_and_marks_bands() {
    let mut canvas = clean_canvas();
    canvas.draw_hline(-10, 5, 80, 3);
    assert_eq!(canvas.get_pixel(0, 5), Some(3));
    assert_eq!(canvas.get_pixel(69, 5), Some(3));
    assert_eq!(canvas.get_pixel(70, 5), Some(0));
    assert_eq!(canvas.dirty().row_flags(5), &[true, true, false, false, false]);
    assert_eq!(canvas.dirty().dirty_count(), 2);
}

#[test]
fn vline_crosses_the_sector_split() {
    let mut canvas = clean_canvas();
    canvas.draw_vline(100, 250, 12, 6);
    for y in 250..262 {
        assert_eq!(canvas.get_pixel(100, y), Some(6), "row {}", y);
        assert!(canvas.dirty().is_dirty(y as usize, 1));
    }
    assert_eq!(canvas.get_pixel(100, 262), Some(0));
    assert_eq!(canvas.dirty().dirty_count(), 12);
}

#[test]
fn fully_off_canvas_lines_touch_nothing() {
    let mut canvas = clean_canvas();
    canvas.draw_hline(0, -1, 10, 1);
    canvas.draw_hline(320, 0, 10, 1);
    canvas.draw_vline(-1, 0, 10, 1);
    canvas.draw_vline(0, 480, 10, 1);
    canvas.draw_vline(0, -20, 20, 1);
    assert!(canvas.dirty().is_clean());
}

#[test]
fn clip_rect_reports_source_offsets() {
    let canvas = clean_canvas();
    let clip = canvas.clip_rect(-3, -4, 10, 10).unwrap();
    assert_eq!(clip.xs, Span { start: 0, len: 7 });
    assert_eq!(clip.ys, Span { start: 0, len: 6 });
    assert_eq!((clip.src_x, clip.src_y), (3, 4));
    assert!(canvas.clip_rect(320, 0, 5, 5).is_none());
}
