use futures::executor::LocalPool;
use scrawl_canvas::{decode_png, PointerEvent, PointerKind, SurfaceKind};
use scrawl_common::{DiskStore, MemoryStore};
use scrawl_editor::{EditorState, Selection, TransactionSpec, WidgetType};
use scrawl_embed::{
    CollectingNotifier, DrawingPlugin, DrawingSession, DrawingWidget, EmbedConfig, Host, LoadState,
    SavePolicy, DEFAULT_CONFIG_NAME,
};
use std::rc::Rc;

struct Harness {
    pool: LocalPool,
    store: MemoryStore,
    notifier: CollectingNotifier,
    plugin: DrawingPlugin,
}

impl Harness {
    fn new(config: EmbedConfig) -> Self {
        let pool = LocalPool::new();
        let store = MemoryStore::new();
        let notifier = CollectingNotifier::new();
        let host = Host::new(
            Rc::new(store.clone()),
            Rc::new(notifier.clone()),
            Rc::new(pool.spawner()),
        );
        Self {
            pool,
            store,
            notifier,
            plugin: DrawingPlugin::new(host, config),
        }
    }

    fn open(&mut self, doc: &str) -> DrawingSession {
        let session = self.plugin.open(EditorState::new(doc));
        self.pool.run_until_stalled();
        session
    }
}

fn small() -> EmbedConfig {
    EmbedConfig {
        default_width: 40,
        aspect_ratio: 2.0,
        ..EmbedConfig::default()
    }
}

fn stroke(widget: &DrawingWidget, y: f32) {
    let display = (40.0, 20.0);
    widget.handle_pointer(PointerEvent::new(PointerKind::Down, 2.0, y, display));
    widget.handle_pointer(PointerEvent::new(PointerKind::Move, 30.0, y, display));
    widget.handle_pointer(PointerEvent::new(PointerKind::Up, 30.0, y, display));
}

fn offsets(session: &DrawingSession) -> Vec<usize> {
    session.drawings().into_iter().map(|(pos, _)| pos).collect()
}

#[test]
fn test_blank_drawing_saved_on_request() {
    let mut h = Harness::new(EmbedConfig::default());
    let session = h.open("Hello ?[[draw.png]] world");

    assert_eq!(offsets(&session), vec![19]);
    let widget = session.drawing_at(19).unwrap();
    assert_eq!(widget.cell().load_state(), LoadState::Blank);
    assert_eq!(widget.cell().with_surface(|s| s.dimensions()).unwrap(), Some((700, 495)));

    widget.press("save").unwrap();
    h.pool.run_until_stalled();

    let saved = decode_png(&h.store.get("draw.png").unwrap()).unwrap();
    assert_eq!(saved.dimensions(), (700, 495));
    assert_eq!(h.notifier.messages(), vec!["Drawing saved as draw.png".to_string()]);
}

#[test]
fn test_identity_stable_across_unrelated_edits() {
    let mut h = Harness::new(small());
    let mut session = h.open("Intro\n?[[a.png]]\nOutro");

    let widget = session.drawing_at(16).unwrap();
    let cell = widget.cell().clone();
    let widget_ptr = widget as *const DrawingWidget;
    let dom = session.view().mounted_widgets()[0].dom.clone();

    session.dispatch(TransactionSpec::insert(0, "Hello ")).unwrap();
    let end = session.view().state().len();
    session.dispatch(TransactionSpec::insert(end, "!")).unwrap();
    session.dispatch(TransactionSpec::insert(22, "typed")).unwrap();

    assert_eq!(offsets(&session), vec![22]);
    let widget = session.drawing_at(22).unwrap();
    assert!(Rc::ptr_eq(widget.cell(), &cell));
    assert_eq!(widget as *const DrawingWidget, widget_ptr);
    assert!(session.view().mounted_widgets()[0].dom.ptr_eq(&dom));
    assert_eq!(widget.mounted_count(), 1);
}

#[test]
fn test_one_decoration_per_offset() {
    let mut h = Harness::new(small());
    let mut session = h.open("?[[a.png]] ?[[b.png]]\n?[[a.png]]");

    session.dispatch(TransactionSpec::insert(11, "?[[c.png]] ")).unwrap();
    session.dispatch(TransactionSpec::delete(0, 1)).unwrap();

    let found = offsets(&session);
    let mut unique = found.clone();
    unique.dedup();
    assert_eq!(found, unique);
    assert_eq!(found.len(), 3);
}

#[test]
fn test_removing_tag_keeps_cached_surface() {
    let mut h = Harness::new(small());
    let mut session = h.open("x ?[[a.png]] y");
    let cell = session.drawing_at(12).unwrap().cell().clone();

    session.dispatch(TransactionSpec::delete(2, 12)).unwrap();
    assert!(session.drawings().is_empty());
    assert!(session.registry().contains("a.png"));

    session.dispatch(TransactionSpec::insert(2, "?[[a.png]]")).unwrap();
    let restored = session.drawing_at(12).unwrap();
    assert!(Rc::ptr_eq(restored.cell(), &cell));
}

#[test]
fn test_evicted_surface_is_rebuilt_and_reloaded() {
    let mut h = Harness::new(EmbedConfig {
        evict_after_passes: Some(2),
        ..small()
    });
    let mut session = h.open("x ?[[a.png]] y");
    let cell = Rc::downgrade(session.drawing_at(12).unwrap().cell());

    session.dispatch(TransactionSpec::delete(2, 12)).unwrap();
    session.dispatch(TransactionSpec::insert(0, "more ")).unwrap();
    assert!(!session.registry().contains("a.png"));
    assert!(cell.upgrade().is_none());

    session.dispatch(TransactionSpec::insert(0, "?[[a.png]]")).unwrap();
    let fresh = session.drawing_at(10).unwrap();
    assert_eq!(fresh.cell().load_state(), LoadState::Pending);
    h.pool.run_until_stalled();
    assert_eq!(fresh.cell().load_state(), LoadState::Blank);
}

#[test]
fn test_late_load_after_eviction_is_ignored() {
    let mut h = Harness::new(EmbedConfig {
        evict_after_passes: Some(1),
        ..small()
    });
    h.store.insert("a.png", scrawl_canvas::encode_png(&scrawl_canvas::RgbaImage::new(4, 4)).unwrap());

    // not driving the pool: the load stays in flight
    let mut session = h.plugin.open(EditorState::new("?[[a.png]]"));
    let cell = Rc::downgrade(session.drawing_at(10).unwrap().cell());

    session.dispatch(TransactionSpec::delete(0, 1)).unwrap();
    assert!(session.registry().is_empty());

    h.pool.run_until_stalled();
    assert!(cell.upgrade().is_none());
    assert!(session.drawings().is_empty());
}

#[test]
fn test_concealment_follows_cursor() {
    let mut h = Harness::new(small());
    let mut session = h.open("Hello ?[[draw.png]] world");

    assert_eq!(session.view().rendered_text(), "Hello  world");

    session.dispatch(TransactionSpec::select(Selection::cursor(12))).unwrap();
    assert_eq!(session.view().rendered_text(), "Hello ?[[draw.png]] world");

    session.dispatch(TransactionSpec::select(Selection::cursor(2))).unwrap();
    assert_eq!(session.view().rendered_text(), "Hello  world");
}

#[test]
fn test_selection_changes_do_not_touch_widgets() {
    let mut h = Harness::new(small());
    let mut session = h.open("?[[a.png]] text");
    let dom = session.view().mounted_widgets()[0].dom.clone();

    for pos in [0, 4, 10, 15] {
        session.dispatch(TransactionSpec::select(Selection::cursor(pos))).unwrap();
    }

    assert_eq!(session.registry().len(), 1);
    assert!(session.view().mounted_widgets()[0].dom.ptr_eq(&dom));
    assert_eq!(session.drawing_at(10).unwrap().mounted_count(), 1);
}

#[test]
fn test_two_placements_share_one_surface() {
    let mut h = Harness::new(small());
    let session = h.open("?[[draw.png]]\n?[[draw.png]]");

    let drawings = session.drawings();
    assert_eq!(drawings.iter().map(|(pos, _)| *pos).collect::<Vec<_>>(), vec![13, 27]);

    let (first, second) = (drawings[0].1, drawings[1].1);
    assert!(!std::ptr::eq(first, second));
    assert!(Rc::ptr_eq(first.cell(), second.cell()));
    assert_eq!(first.cell().with_surface(|s| s.attached_count()).unwrap(), 2);

    stroke(first, 5.0);
    let through_second = second.cell().with_surface(|s| s.snapshot().unwrap()).unwrap();
    assert_eq!(through_second.get_pixel(10, 5)[3], 255);
}

#[test]
fn test_tool_change_shows_in_every_placement() {
    let mut h = Harness::new(small());
    let session = h.open("?[[d.png]]\n?[[d.png]]");

    session.drawings()[0].1.press("tool:rectangle").unwrap();

    let active_tool = |dom: &scrawl_common::DomElement| {
        let toolbar = dom.children()[0].clone();
        assert!(toolbar.has_class("scrawl-toolbar"));
        toolbar.children().iter().position(|b| b.has_class("active"))
    };
    let mounted = session.view().mounted_widgets();
    assert_eq!(mounted.len(), 2);
    assert_eq!(active_tool(&mounted[0].dom), Some(1));
    assert_eq!(active_tool(&mounted[1].dom), Some(1));
}

#[test]
fn test_saved_bytes_round_trip() {
    let mut h = Harness::new(small());
    let session = h.open("?[[sketch.png]]");
    let widget = session.drawing_at(15).unwrap();

    stroke(widget, 8.0);
    widget.press("save").unwrap();
    h.pool.run_until_stalled();

    let expected = widget.cell().with_surface(|s| s.render_to_bytes().unwrap()).unwrap();
    assert_eq!(h.store.get("sketch.png"), Some(expected));
}

#[test]
fn test_existing_drawing_is_loaded_and_overwritten() {
    let mut h = Harness::new(small());
    let mut image = scrawl_canvas::RgbaImage::new(12, 6);
    image.put_pixel(1, 1, scrawl_canvas::Color::BLACK.to_rgba());
    h.store.insert("old.png", scrawl_canvas::encode_png(&image).unwrap());

    let session = h.open("?[[old.png]]");
    let widget = session.drawing_at(12).unwrap();
    assert_eq!(widget.cell().load_state(), LoadState::Loaded);
    assert_eq!(widget.estimated_height(), Some(6));

    widget.press("save").unwrap();
    h.pool.run_until_stalled();

    assert_eq!(h.store.len(), 1);
    assert_eq!(decode_png(&h.store.get("old.png").unwrap()).unwrap(), image);
}

#[test]
fn test_undo_redo_restores_drawing() {
    let mut h = Harness::new(small());
    let session = h.open("?[[a.png]]");
    let widget = session.drawing_at(10).unwrap();
    let snapshot = || widget.cell().with_surface(|s| s.snapshot().unwrap()).unwrap();

    stroke(widget, 4.0);
    let one = snapshot();
    widget.press("color:#ff0000").unwrap();
    widget.press("tool:rectangle").unwrap();
    stroke(widget, 12.0);
    let two = snapshot();
    assert_ne!(one, two);

    widget.press("undo").unwrap();
    assert_eq!(snapshot(), one);
    widget.press("redo").unwrap();
    assert_eq!(snapshot(), two);
}

#[test]
fn test_autosave_on_pointer_release() {
    let mut h = Harness::new(EmbedConfig {
        save_policy: SavePolicy::OnPointerRelease,
        surface: SurfaceKind::Raster,
        ..small()
    });
    let session = h.open("?[[a.png]]");
    let widget = session.drawing_at(10).unwrap();

    stroke(widget, 4.0);
    h.pool.run_until_stalled();

    assert_eq!(h.store.write_count(), 1);
    let saved = decode_png(&h.store.get("a.png").unwrap()).unwrap();
    assert_eq!(saved.get_pixel(30, 4)[3], 255);
}

#[test]
fn test_unbuildable_surface_leaves_view_usable() {
    let mut h = Harness::new(EmbedConfig {
        default_width: 0,
        ..EmbedConfig::default()
    });
    let mut session = h.open("a ?[[x.png]] b");

    assert!(session.drawings().is_empty());
    assert!(session.registry().is_empty());
    session.dispatch(TransactionSpec::insert(0, "still editing ")).unwrap();
    assert_eq!(session.view().rendered_text(), "still editing a  b");
}

#[test]
fn test_save_before_load_is_refused() {
    let mut h = Harness::new(small());
    h.store.insert("a.png", scrawl_canvas::encode_png(&scrawl_canvas::RgbaImage::new(4, 4)).unwrap());
    let session = h.plugin.open(EditorState::new("?[[a.png]]"));

    let widget = session.drawing_at(10).unwrap();
    assert!(widget.press("save").is_err());
    h.pool.run_until_stalled();

    assert_eq!(h.store.write_count(), 0);
    assert_eq!(h.notifier.messages().len(), 1);
}

#[test]
fn test_close_releases_surfaces() {
    let mut h = Harness::new(small());
    let mut session = h.open("?[[a.png]]");
    let cell = Rc::downgrade(session.drawing_at(10).unwrap().cell());

    session.close();

    assert!(session.registry().is_empty());
    assert!(cell.upgrade().is_none());
    assert!(session.dispatch(TransactionSpec::insert(0, "x")).is_err());
}

#[test]
fn test_disk_vault_end_to_end() {
    let vault = tempfile::tempdir().unwrap();
    std::fs::write(
        vault.path().join(DEFAULT_CONFIG_NAME),
        r#"{"surface": "raster", "defaultWidth": 64, "aspectRatio": 2.0}"#,
    )
    .unwrap();

    let mut pool = LocalPool::new();
    let host = Host::new(
        Rc::new(DiskStore::new(vault.path())),
        Rc::new(CollectingNotifier::new()),
        Rc::new(pool.spawner()),
    );
    let plugin = DrawingPlugin::load(host, vault.path()).unwrap();
    assert_eq!(plugin.config().surface, SurfaceKind::Raster);

    let session = plugin.open(EditorState::new("?[[drawings/first.png]]"));
    pool.run_until_stalled();
    session.drawing_at(23).unwrap().press("save").unwrap();
    pool.run_until_stalled();

    let bytes = std::fs::read(vault.path().join("drawings/first.png")).unwrap();
    assert_eq!(decode_png(&bytes).unwrap().dimensions(), (64, 32));
}
