use image::{Rgba, RgbaImage};

use snipmark::{
    CapturedFrame, EncodedFormat, ExportDelivery, GestureEvent, Point, QualityTier, Session,
    SessionKind, Settings, StampPlan, ToolMode, Transition, flatten, handle_gesture,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn checker_frame(w: u32, h: u32, view_w: f32, view_h: f32) -> CapturedFrame {
    let rgba = RgbaImage::from_fn(w, h, |x, y| {
        if (x / 8 + y / 8) % 2 == 0 {
            Rgba([220, 220, 220, 255])
        } else {
            Rgba([40, 40, 40, 255])
        }
    });
    CapturedFrame::new(rgba, view_w, view_h)
}

fn drag(session: &mut Session, from: Point, to: Point) -> Transition {
    handle_gesture(session, GestureEvent::Begin(from));
    handle_gesture(
        session,
        GestureEvent::Drag(Point::new((from.x + to.x) / 2.0, (from.y + to.y) / 2.0)),
    );
    handle_gesture(session, GestureEvent::End(to))
}

#[test]
fn select_annotate_export_produces_a_png_of_the_selection() {
    init_logging();
    let frame = checker_frame(200, 160, 200.0, 160.0);
    let mut session = Session::new(frame, Settings::default(), SessionKind::Interactive);

    let t = drag(&mut session, Point::new(20.0, 20.0), Point::new(120.0, 100.0));
    assert_eq!(t, Transition::SelectionCommitted);

    session.set_tool(ToolMode::Redact);
    let t = drag(&mut session, Point::new(30.0, 30.0), Point::new(60.0, 60.0));
    assert_eq!(t, Transition::ShapeCommitted);

    assert!(session.request_export(ExportDelivery::File));
    let encoded = session
        .wait_export()
        .expect("export abandoned")
        .expect("export failed");
    assert_eq!(encoded.format, EncodedFormat::Lossless);

    let decoded = image::load_from_memory(&encoded.bytes).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (100, 80));
    // The redacted block sits at view (30..60, 30..60), i.e. (10..40, 10..40)
    // inside the crop, painted in the default red
    let p = decoded.get_pixel(25, 25).0;
    assert!(p[0] > 180 && p[1] < 60, "expected redact fill, got {p:?}");
}

#[test]
fn undo_then_reappend_reproduces_identical_flatten_bytes() {
    init_logging();
    let frame = checker_frame(120, 120, 120.0, 120.0);
    let mut session = Session::new(frame, Settings::default(), SessionKind::Interactive);

    session.set_tool(ToolMode::Arrow);
    drag(&mut session, Point::new(10.0, 10.0), Point::new(90.0, 70.0));
    session.set_tool(ToolMode::Blur);
    drag(&mut session, Point::new(40.0, 40.0), Point::new(100.0, 100.0));
    assert_eq!(session.annotations.len(), 2);

    let mapping = session.mapping();
    let base = session.frame().rgba().clone();
    let stamps = StampPlan::default();
    let selection = session.selection.rect;

    let before = flatten(
        &base,
        &session.annotations.snapshot(),
        &mapping,
        selection,
        &stamps,
    );

    let undone = session.undo().expect("nothing to undo");
    session.annotations.push(undone);

    let after = flatten(
        &base,
        &session.annotations.snapshot(),
        &mapping,
        selection,
        &stamps,
    );
    assert_eq!(before.as_raw(), after.as_raw());
}

#[test]
fn minimum_tier_end_to_end_halves_the_exported_raster() {
    init_logging();
    let frame = checker_frame(400, 300, 400.0, 300.0);
    let settings = Settings {
        quality: QualityTier::Minimum,
        downscale_minimum: true,
        ..Settings::default()
    };
    let mut session = Session::new(frame, settings, SessionKind::Interactive);

    drag(&mut session, Point::new(0.0, 0.0), Point::new(400.0, 300.0));
    assert!(session.request_export(ExportDelivery::File));
    let encoded = session.wait_export().unwrap().unwrap();
    assert_eq!(encoded.format, EncodedFormat::Lossy);
    let decoded = image::load_from_memory(&encoded.bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (200, 150));

    // The clipboard path ignores the tier and stays lossless
    assert!(session.request_export(ExportDelivery::Clipboard));
    let clip = session.wait_export().unwrap().unwrap();
    assert_eq!(clip.format, EncodedFormat::Lossless);
}

#[test]
fn zero_area_selection_export_is_a_silent_no_op() {
    init_logging();
    let frame = checker_frame(100, 100, 100.0, 100.0);
    let mut session = Session::new(frame, Settings::default(), SessionKind::Interactive);

    // Release at the start point: the selection commits with zero area
    drag(&mut session, Point::new(50.0, 50.0), Point::new(50.0, 50.0));
    assert!(session.request_export(ExportDelivery::File));
    let result = session.wait_export().unwrap();
    assert!(result.is_err(), "degenerate selection must produce no bytes");
}

#[test]
fn letterboxed_view_round_trips_annotations_into_the_raster() {
    init_logging();
    // 400x200 view over a square raster: 100 view units of padding per side
    let frame = checker_frame(200, 200, 400.0, 200.0);
    let mut session = Session::new(frame, Settings::default(), SessionKind::Interactive);

    drag(&mut session, Point::new(100.0, 0.0), Point::new(300.0, 200.0));
    session.set_tool(ToolMode::Redact);
    drag(&mut session, Point::new(140.0, 40.0), Point::new(180.0, 80.0));

    assert!(session.request_export(ExportDelivery::File));
    let encoded = session.wait_export().unwrap().unwrap();
    let decoded = image::load_from_memory(&encoded.bytes).unwrap().to_rgba8();
    // The selection covers the whole raster
    assert_eq!(decoded.dimensions(), (200, 200));
    // View (140..180, 40..80) minus the 100-unit offset lands at raster
    // (40..80, 40..80)
    let p = decoded.get_pixel(60, 60).0;
    assert!(p[0] > 180 && p[1] < 60, "expected redact fill, got {p:?}");
}
