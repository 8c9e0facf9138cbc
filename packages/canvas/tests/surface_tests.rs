use scrawl_canvas::{
    build_surface, DrawingSurface, PointerEvent, PointerKind, SurfaceEvent, SurfaceKind, SurfaceOptions,
    ToolbarAction,
};

fn options(kind: SurfaceKind) -> SurfaceOptions {
    SurfaceOptions {
        kind,
        width: 64,
        height: 32,
        ..SurfaceOptions::default()
    }
}

fn scribble(surface: &mut dyn DrawingSurface) {
    let display = (64.0, 32.0);
    surface.handle_pointer(PointerEvent::new(PointerKind::Down, 4.0, 4.0, display));
    for x in 4..20 {
        surface.handle_pointer(PointerEvent::new(PointerKind::Move, x as f32, 8.0, display));
    }
    surface.handle_pointer(PointerEvent::new(PointerKind::Up, 20.0, 8.0, display));
}

#[test]
fn test_saved_drawing_reloads_identically() {
    for kind in [SurfaceKind::Raster, SurfaceKind::Scene] {
        let mut original = build_surface(&options(kind)).unwrap();
        original.mark_blank();
        scribble(original.as_mut());
        let bytes = original.render_to_bytes().unwrap();

        let mut reloaded = build_surface(&SurfaceOptions::default()).unwrap();
        reloaded.load_from_bytes(&bytes).unwrap();

        assert_eq!(reloaded.dimensions(), Some((64, 32)), "{:?}", kind);
        assert_eq!(
            reloaded.snapshot().unwrap(),
            original.snapshot().unwrap(),
            "{:?}",
            kind
        );
    }
}

#[test]
fn test_every_attached_element_sees_strokes() {
    let mut surface = build_surface(&options(SurfaceKind::Scene)).unwrap();
    let first = surface.attach_to_dom();
    let second = surface.attach_to_dom();
    surface.mark_blank();

    scribble(surface.as_mut());

    assert_eq!(surface.attached_count(), 2);
    assert_eq!(first.attribute("data-revision"), second.attribute("data-revision"));

    surface.detach_from_dom(&first);
    surface.apply_action(&ToolbarAction::Undo);
    assert_ne!(first.attribute("data-revision"), second.attribute("data-revision"));
}

#[test]
fn test_save_action_requests_save_on_both_kinds() {
    for kind in [SurfaceKind::Raster, SurfaceKind::Scene] {
        let mut surface = build_surface(&options(kind)).unwrap();
        assert_eq!(
            surface.apply_action(&ToolbarAction::Save),
            Some(SurfaceEvent::SaveRequested)
        );
    }
}

#[test]
fn test_corrupt_bytes_leave_surface_loading() {
    let mut surface = build_surface(&options(SurfaceKind::Scene)).unwrap();

    assert!(surface.load_from_bytes(b"garbage").is_err());
    assert!(!surface.is_ready());
}
