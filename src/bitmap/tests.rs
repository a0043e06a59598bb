// src/bitmap/tests.rs

use super::*;
use std::collections::BTreeSet;
use test_log::test;

fn clean_canvas() -> Canvas {
    let mut canvas = Canvas::new(320, 480, 256, 64).unwrap();
    for y in 0..canvas.height() {
        canvas.dirty_mut().clear_row(y);
    }
    canvas
}

fn painted(canvas: &Canvas, color: u8) -> BTreeSet<(i32, i32)> {
    let mut out = BTreeSet::new();
    for y in 0..canvas.height() {
        for (x, &p) in canvas.row(y).unwrap().iter().enumerate() {
            if p == color {
                out.insert((x as i32, y as i32));
            }
        }
    }
    out
}

/// 4x3 bitmap whose pixel values encode their own coordinates.
fn numbered() -> Vec<u8> {
    (0..3u8).flat_map(|v| (0..4u8).map(move |u| 10 * (v + 1) + u)).collect()
}

#[test]
fn bitmap_rejects_short_buffers() {
    let data = [0u8; 11];
    assert!(Bitmap::new(&data, 4, 3).is_err());
    assert!(Bitmap::with_stride(&data, 4, 3, 3).is_err());
    // Last row does not need trailing stride padding.
    assert!(Bitmap::with_stride(&data, 3, 2, 8).is_ok());
    assert!(MonoBitmap::new(&[0u8; 3], 9, 2).is_err());
    assert!(MonoBitmap::new(&[0u8; 4], 9, 2).is_ok());
}

#[test]
fn opaque_copy_places_every_pixel() {
    let data = numbered();
    let bitmap = Bitmap::new(&data, 4, 3).unwrap();
    let mut canvas = clean_canvas();
    canvas.draw_bitmap(&bitmap, 100, 254);
    for v in 0..3 {
        for u in 0..4 {
            assert_eq!(
                canvas.get_pixel(100 + u as i32, 254 + v as i32),
                bitmap.get(u, v),
                "pixel ({}, {})",
                u,
                v
            );
        }
    }
    assert_eq!(canvas.dirty().dirty_count(), 3);
}

#[test]
fn opaque_copy_clipped_top_left_uses_source_offset() {
    let data = numbered();
    let bitmap = Bitmap::new(&data, 4, 3).unwrap();
    let mut canvas = clean_canvas();
    canvas.draw_bitmap(&bitmap, -2, -1);
    assert_eq!(canvas.get_pixel(0, 0), Some(22));
    assert_eq!(canvas.get_pixel(1, 0), Some(23));
    assert_eq!(canvas.get_pixel(0, 1), Some(32));
    assert_eq!(canvas.get_pixel(1, 1), Some(33));
    assert_eq!(canvas.get_pixel(2, 0), Some(0));
    assert_eq!(canvas.get_pixel(0, 2), Some(0));
}

#[test]
fn opaque_copy_clipped_bottom_right() {
    let data = numbered();
    let bitmap = Bitmap::new(&data, 4, 3).unwrap();
    let mut canvas = clean_canvas();
    canvas.draw_bitmap(&bitmap, 317, 478);
    assert_eq!(canvas.get_pixel(317, 478), Some(10));
    assert_eq!(canvas.get_pixel(319, 478), Some(12));
    assert_eq!(canvas.get_pixel(319, 479), Some(22));
}

#[test]
fn fully_off_canvas_bitmap_is_rejected() {
    let data = numbered();
    let bitmap = Bitmap::new(&data, 4, 3).unwrap();
    let mut canvas = clean_canvas();
    canvas.draw_bitmap(&bitmap, 320, 0);
    canvas.draw_bitmap(&bitmap, -4, 0);
    canvas.draw_bitmap(&bitmap, 0, -3);
    canvas.draw_bitmap_keyed(&bitmap, 0, 480, 0);
    assert!(canvas.dirty().is_clean());
}

#[test]
fn strided_view_copies_a_sub_rectangle() {
    // 2x2 window starting at column 1 of the numbered sheet.
    let data = numbered();
    let window = Bitmap::with_stride(&data[1..], 2, 2, 4).unwrap();
    let mut canvas = clean_canvas();
    canvas.draw_bitmap(&window, 0, 0);
    assert_eq!(canvas.row(0).unwrap()[..3], [11, 12, 0]);
    assert_eq!(canvas.row(1).unwrap()[..3], [21, 22, 0]);
}

#[test]
fn keyed_copy_skips_the_key_color() {
    let data = [5, 0, 5, 0, 7, 0];
    let bitmap = Bitmap::new(&data, 3, 2).unwrap();
    let mut canvas = clean_canvas();
    canvas.fill_rect(0, 0, 3, 2, 9);
    canvas.draw_bitmap_keyed(&bitmap, 0, 0, 0);
    assert_eq!(canvas.row(0).unwrap()[..3], [5, 9, 5]);
    assert_eq!(canvas.row(1).unwrap()[..3], [9, 7, 9]);
}

#[test]
fn save_and_restore_background() {
    let mut canvas = clean_canvas();
    canvas.fill_circle(50, 50, 10, 3);
    let mut saved = IndexedImage::filled(16, 16, 0xAA);
    canvas.copy_to_bitmap(&mut saved.as_bitmap_mut(), 42, 42);
    let before: Vec<Vec<u8>> = (42..58).map(|y| canvas.row(y).unwrap()[42..58].to_vec()).collect();

    canvas.fill_rect(42, 42, 16, 16, 12);
    canvas.draw_bitmap(&saved.as_bitmap(), 42, 42);

    let after: Vec<Vec<u8>> = (42..58).map(|y| canvas.row(y).unwrap()[42..58].to_vec()).collect();
    assert_eq!(before, after);
}

#[test]
fn copy_to_bitmap_leaves_clipped_part_untouched() {
    let mut canvas = clean_canvas();
    canvas.fill(4);
    let mut saved = IndexedImage::filled(3, 2, 0xEE);
    canvas.copy_to_bitmap(&mut saved.as_bitmap_mut(), -1, 479);
    assert_eq!(saved.data, vec![0xEE, 4, 4, 0xEE, 0xEE, 0xEE]);
}

#[test]
fn mono_blit_reads_msb_first() {
    // 10 pixels wide: two bytes per row.
    let rows = [0b1000_0001, 0b0100_0000, 0b0000_0000, 0b1000_0000];
    let mono = MonoBitmap::new(&rows, 10, 2).unwrap();
    let mut canvas = clean_canvas();
    canvas.draw_mono(&mono, 5, 5, 6);
    let expected: BTreeSet<_> = [(5, 5), (12, 5), (14, 5), (13, 6)].into_iter().collect();
    assert_eq!(painted(&canvas, 6), expected);
}

#[test]
fn mono_blit_clips_per_pixel() {
    let mono = MonoBitmap::new(&[0xFF, 0xFF], 8, 2).unwrap();
    let mut canvas = clean_canvas();
    canvas.draw_mono(&mono, -6, 479, 1);
    assert_eq!(painted(&canvas, 1), [(0, 479), (1, 479)].into_iter().collect::<BTreeSet<_>>());
}

#[test]
fn scale2x_rules() {
    // Lone pixel: no neighbours agree, so all four copy the center.
    assert_eq!(scale2x(true, false, false, false, false), [true; 4]);
    // Up and left set, down and right clear: the top-left corner fills in.
    assert_eq!(scale2x(false, true, false, true, false), [true, false, false, false]);
    // Down and right set: bottom-right fills in.
    assert_eq!(scale2x(false, false, true, false, true), [false, false, false, true]);
    // Uniform neighbourhood keeps the center.
    assert_eq!(scale2x(true, true, true, true, true), [true; 4]);
}

#[test]
fn scale2x_smooths_a_diagonal() {
    // 2x2 diagonal: bits at (0, 0) and (1, 1).
    let mono = MonoBitmap::new(&[0b1000_0000, 0b0100_0000], 2, 2).unwrap();
    let mut canvas = clean_canvas();
    canvas.draw_mono_2x(&mono, 0, 0, 2);
    let expected: BTreeSet<_> = [
        (0, 0),
        (1, 0),
        (0, 1),
        (1, 1),
        (2, 1),
        (1, 2),
        (2, 2),
        (3, 2),
        (2, 3),
        (3, 3),
    ]
    .into_iter()
    .collect();
    assert_eq!(painted(&canvas, 2), expected);
}

#[test]
fn scale2x_rounds_the_corners_of_a_square() {
    let mono = MonoBitmap::new(&[0b1100_0000, 0b1100_0000], 2, 2).unwrap();
    let mut canvas = clean_canvas();
    canvas.draw_mono_2x(&mono, 10, 10, 1);
    let got = painted(&canvas, 1);
    assert_eq!(got.len(), 12);
    for corner in [(10, 10), (13, 10), (10, 13), (13, 13)] {
        assert!(!got.contains(&corner), "corner {:?}", corner);
    }
}

#[test]
fn scale2x_single_pixel_is_a_block() {
    let mono = MonoBitmap::new(&[0x80], 1, 1).unwrap();
    let mut canvas = clean_canvas();
    canvas.draw_mono_2x(&mono, 319, 479, 5);
    assert_eq!(painted(&canvas, 5), [(319, 479)].into_iter().collect::<BTreeSet<_>>());
}
