// M1-020: Pointer coordinate mapping while drawing
// Test: Toggle marking mode on, drag on the canvas
// Expected: Printed image coordinates track the drag, scaled from the
// display size to the 640x480 intrinsic size regardless of window size

slint::include_modules!();

use slint::SharedPixelBuffer;

fn test_image() -> slint::Image {
    let (width, height) = (640u32, 480u32);
    let mut buffer = SharedPixelBuffer::new(width, height);
    let data = buffer.make_mut_bytes();
    for y in 0..height {
        for x in 0..width {
            let v = if (x / 32 + y / 32) % 2 == 0 { 70 } else { 120 };
            let i = ((y * width + x) * 3) as usize;
            data[i] = v;
            data[i + 1] = v;
            data[i + 2] = v;
        }
    }
    slint::Image::from_rgb8(buffer)
}

const INTRINSIC: (f32, f32) = (640.0, 480.0);

fn map(x: f32, y: f32, w: f32, h: f32) -> (f32, f32) {
    (x * INTRINSIC.0 / w, y * INTRINSIC.1 / h)
}

fn main() -> Result<(), slint::PlatformError> {
    let ui = AppWindow::new()?;

    ui.set_canvas_source(test_image());
    ui.set_image_aspect(INTRINSIC.0 / INTRINSIC.1);
    ui.set_status_text("Toggle marking mode, then drag on the canvas".into());

    let ui_weak = ui.as_weak();
    ui.on_toggle_marking(move || {
        let ui = ui_weak.unwrap();
        ui.set_marking_mode(!ui.get_marking_mode());
        println!("✓ Marking mode: {}", ui.get_marking_mode());
    });

    ui.on_canvas_pressed(move |x, y, w, h| {
        let (ix, iy) = map(x, y, w, h);
        println!("down    display=({x:.0},{y:.0}) image=({ix:.1},{iy:.1})");
    });

    ui.on_canvas_moved(move |x, y, w, h| {
        let (ix, iy) = map(x, y, w, h);
        println!("move    display=({x:.0},{y:.0}) image=({ix:.1},{iy:.1})");
    });

    ui.on_canvas_released(move |x, y, w, h| {
        let (ix, iy) = map(x, y, w, h);
        println!("up      display=({x:.0},{y:.0}) image=({ix:.1},{iy:.1})");
    });

    println!("=== M1-020: Coordinate Mapping ===");
    println!("Instructions:");
    println!("1. Resize the window, then drag across the canvas");
    println!("2. Verify image coordinates stay within 640x480");
    println!("3. Verify the same canvas spot maps to the same image");
    println!("   coordinates at different window sizes");
    println!("==================================");

    ui.run()
}
