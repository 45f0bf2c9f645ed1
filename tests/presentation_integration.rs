//! Presentation integration tests: zoom and drag gestures, persistence and
//! global pointer handling with a fake host window and pointer hook.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use bevy_ecs::observer::{Observer, On};
use bevy_ecs::prelude::*;
use crossbeam_channel::Sender;
use raylib::prelude::{Rectangle, Vector2};

use desktopchara::events::presentation::{
    PointerClickEvent, PresentationChangedEvent, persist_presentation_observer,
};
use desktopchara::host::{GlobalPointerHook, HostWindow};
use desktopchara::resources::characonfig::CharaConfig;
use desktopchara::resources::charadata::CharaData;
use desktopchara::resources::globalmouse::{DEREGISTER_DELAY, GlobalMouse, GlobalPointerEvent};
use desktopchara::resources::overlay::{
    PresentationChange, PresentationObserver, PresentationView, StatusBarOverlay,
};
use desktopchara::resources::pointerinput::PointerInput;
use desktopchara::resources::presentation::{PersistedPresentation, PresentationController};
use desktopchara::resources::worldtime::WorldTime;
use desktopchara::systems::globalmouse::{global_pointer, pointer_hover};
use desktopchara::systems::presentation::{drag_gesture, recenter, zoom_gesture};

const EPSILON: f32 = 1e-3;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

#[derive(Default)]
struct FakeWindow {
    size: Option<(f32, f32)>,
    position: Option<(f32, f32)>,
}

impl HostWindow for FakeWindow {
    fn resize_window(&mut self, width: f32, height: f32) {
        self.size = Some((width, height));
    }
    fn move_window(&mut self, x: f32, y: f32) {
        self.position = Some((x, y));
    }
    fn screen_bounds(&self) -> Vec<Rectangle> {
        vec![Rectangle {
            x: 0.0,
            y: 0.0,
            width: 1920.0,
            height: 1080.0,
        }]
    }
}

#[derive(Default)]
struct FakeHook {
    enabled: usize,
    disabled: usize,
    tx: Option<Sender<GlobalPointerEvent>>,
}

impl GlobalPointerHook for FakeHook {
    fn enable(&mut self, tx: Sender<GlobalPointerEvent>) {
        self.enabled += 1;
        self.tx = Some(tx);
    }
    fn disable(&mut self) {
        self.disabled += 1;
        self.tx = None;
    }
}

/// Counts hover updates and leaves seen by observers.
struct HoverLog {
    moves: Arc<Mutex<usize>>,
    leaves: Arc<Mutex<usize>>,
}

impl PresentationObserver for HoverLog {
    fn relayout(&mut self, _change: PresentationChange, _view: &PresentationView<'_>) {}

    fn pointer_moved(&mut self, scene: Option<Vector2>, _view: &PresentationView<'_>) {
        match scene {
            Some(_) => *self.moves.lock().unwrap() += 1,
            None => *self.leaves.lock().unwrap() += 1,
        }
    }
}

fn data() -> CharaData {
    CharaData {
        image_width: 1000.0,
        image_height: 1500.0,
        min_width: 200.0,
        initial_width: 500.0,
        min_x: 50.0,
        max_x: 950.0,
        min_y: 0.0,
        max_y: 1400.0,
        top_middle_x: 500.0,
        bottom_middle_x: 480.0,
        message_offset_x: 120.0,
        message_at_min_y: 300.0,
        message_supported: true,
    }
}

fn config_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "desktopchara-it-{}-{}.ini",
        name,
        std::process::id()
    ))
}

struct Harness {
    world: World,
    schedule: Schedule,
    changes: Arc<Mutex<Vec<PresentationChange>>>,
    clicks: Arc<Mutex<Vec<Vector2>>>,
    moves: Arc<Mutex<usize>>,
    leaves: Arc<Mutex<usize>>,
    path: PathBuf,
}

impl Drop for Harness {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

fn harness(name: &str) -> Harness {
    let mut window = FakeWindow::default();
    let mut controller =
        PresentationController::from_data(&data(), 24.0, &window.screen_bounds()).unwrap();
    let moves = Arc::new(Mutex::new(0));
    let leaves = Arc::new(Mutex::new(0));
    controller.add_observer(Box::new(StatusBarOverlay::new(&data())));
    controller.add_observer(Box::new(HoverLog {
        moves: moves.clone(),
        leaves: leaves.clone(),
    }));
    controller
        .restore(
            PersistedPresentation {
                ratio: Some(0.5),
                position: Some(Vector2 { x: 100.0, y: 100.0 }),
            },
            &mut window,
        )
        .unwrap();

    let path = config_path(name);
    let mut world = World::new();
    world.insert_resource(WorldTime::default());
    world.insert_resource(PointerInput::default());
    world.insert_resource(GlobalMouse::new());
    world.insert_resource(CharaConfig::with_path(&path));
    world.insert_resource(controller);
    world.insert_non_send_resource(window);
    world.insert_non_send_resource(FakeHook::default());

    let changes = Arc::new(Mutex::new(Vec::new()));
    let changes_clone = changes.clone();
    world.add_observer(move |trigger: On<PresentationChangedEvent>| {
        changes_clone.lock().unwrap().push(trigger.event().change);
    });
    let clicks = Arc::new(Mutex::new(Vec::new()));
    let clicks_clone = clicks.clone();
    world.add_observer(move |trigger: On<PointerClickEvent>| {
        clicks_clone.lock().unwrap().push(trigger.event().image);
    });
    world.spawn(Observer::new(persist_presentation_observer));
    world.flush();

    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            zoom_gesture::<FakeWindow>,
            drag_gesture::<FakeWindow>,
            pointer_hover::<FakeHook>,
            global_pointer::<FakeHook>,
        )
            .chain(),
    );

    Harness {
        world,
        schedule,
        changes,
        clicks,
        moves,
        leaves,
        path,
    }
}

impl Harness {
    /// Start a new frame with the pointer at `scene` (or outside).
    fn pointer(&mut self, scene: Option<Vector2>) -> &mut PointerInput {
        let window = self
            .world
            .resource::<PresentationController>()
            .transform()
            .position();
        let mut input = self.world.resource_mut::<PointerInput>();
        input.advance();
        input.scene = scene;
        if let Some(s) = scene {
            input.screen = Vector2 {
                x: s.x + window.x,
                y: s.y + window.y,
            };
        }
        input.into_inner()
    }

    fn run(&mut self) {
        self.schedule.run(&mut self.world);
    }

    fn controller(&self) -> &PresentationController {
        self.world.resource::<PresentationController>()
    }

    fn hook(&self) -> &FakeHook {
        self.world.non_send_resource::<FakeHook>()
    }
}

#[test]
fn wheel_zoom_resizes_window_and_persists_ratio() {
    let mut h = harness("zoom");
    h.pointer(Some(Vector2 { x: 200.0, y: 300.0 })).wheel = 1.0;
    h.run();

    let t = h.controller().transform().clone();
    assert!(approx_eq(t.scale_ratio(), 0.51));
    let (w, hgt) = h.world.non_send_resource::<FakeWindow>().size.unwrap();
    assert!(approx_eq(w, t.width()));
    assert!(approx_eq(hgt, t.height()));
    assert_eq!(*h.changes.lock().unwrap(), vec![PresentationChange::Resized]);

    let mut saved = CharaConfig::with_path(&h.path);
    saved.load_from_file().unwrap();
    assert!(approx_eq(saved.ratio.unwrap(), 0.51));
    assert!(approx_eq(saved.stage_x.unwrap(), t.window_x()));
}

#[test]
fn zoom_keeps_pointed_pixel_on_screen() {
    let mut h = harness("anchor");
    let pointer = Vector2 { x: 300.0, y: 400.0 };
    let screen_before = h.controller().transform().scene_to_screen(pointer);
    let image = h.controller().click(pointer);

    h.pointer(Some(pointer)).wheel = -1.0;
    h.run();

    let screen_after = h.controller().transform().image_to_screen(image);
    assert!(approx_eq(screen_before.x, screen_after.x));
    assert!(approx_eq(screen_before.y, screen_after.y));
}

#[test]
fn drag_moves_window_by_screen_delta_and_persists() {
    let mut h = harness("drag");
    {
        let input = h.pointer(Some(Vector2 { x: 200.0, y: 200.0 }));
        input.primary_pressed = true;
        input.primary_down = true;
    }
    h.run();
    {
        let input = h.pointer(Some(Vector2 { x: 220.0, y: 190.0 }));
        input.primary_down = true;
    }
    h.run();

    let t = h.controller().transform();
    assert!(approx_eq(t.window_x(), 120.0));
    assert!(approx_eq(t.window_y(), 90.0));
    assert_eq!(
        h.world.non_send_resource::<FakeWindow>().position,
        Some((120.0, 90.0))
    );
    assert!(!h.path.exists());

    {
        // The window followed the pointer, so it is back at scene (200, 200).
        let input = h.pointer(Some(Vector2 { x: 200.0, y: 200.0 }));
        input.primary_released = true;
    }
    h.run();

    assert!(h.clicks.lock().unwrap().is_empty());
    let mut saved = CharaConfig::with_path(&h.path);
    saved.load_from_file().unwrap();
    assert_eq!(saved.stage_x, Some(120.0));
    assert_eq!(saved.stage_y, Some(90.0));
    assert_eq!(
        *h.changes.lock().unwrap(),
        vec![PresentationChange::Moved]
    );
}

#[test]
fn release_without_motion_is_a_click_in_image_space() {
    let mut h = harness("click");
    {
        let input = h.pointer(Some(Vector2 { x: 50.0, y: 124.0 }));
        input.primary_pressed = true;
        input.primary_down = true;
    }
    h.run();
    {
        let input = h.pointer(Some(Vector2 { x: 50.0, y: 124.0 }));
        input.primary_released = true;
    }
    h.run();

    let clicks = h.clicks.lock().unwrap();
    assert_eq!(clicks.len(), 1);
    // x: 50 / 0.5 + 50, y: (124 - 24) / 0.5 + 0
    assert!(approx_eq(clicks[0].x, 150.0));
    assert!(approx_eq(clicks[0].y, 200.0));
    assert!(!h.path.exists());
}

#[test]
fn drag_ignored_when_not_draggable() {
    let mut h = harness("nodrag");
    h.world
        .resource_mut::<PresentationController>()
        .set_draggable(false);
    {
        let input = h.pointer(Some(Vector2 { x: 200.0, y: 200.0 }));
        input.primary_pressed = true;
        input.primary_down = true;
    }
    h.run();
    {
        let input = h.pointer(Some(Vector2 { x: 260.0, y: 260.0 }));
        input.primary_down = true;
    }
    h.run();

    assert_eq!(h.controller().transform().window_x(), 100.0);
    assert!(h.changes.lock().unwrap().is_empty());
}

#[test]
fn leaving_window_enables_global_pointer_until_deadline() {
    let mut h = harness("global");
    h.pointer(Some(Vector2 { x: 10.0, y: 10.0 }));
    h.run();
    assert_eq!(h.hook().enabled, 0);

    h.pointer(None);
    h.run();
    assert_eq!(h.hook().enabled, 1);
    assert_eq!(*h.leaves.lock().unwrap(), 1);
    let deadline = h.world.resource::<GlobalMouse>().deregister_at().unwrap();
    assert!((deadline - DEREGISTER_DELAY).abs() < 1e-9);

    // Back over the status bar band, seen only by the global hook.
    let tx = h.hook().tx.clone().unwrap();
    tx.send(GlobalPointerEvent {
        screen: Vector2 { x: 300.0, y: 110.0 },
    })
    .unwrap();
    h.pointer(None);
    h.run();
    let bar = h.controller().placements()[0];
    assert!(bar.visible);
    assert_eq!(*h.moves.lock().unwrap(), 2);

    // Two positions outside produce a single leave.
    for x in [3000.0, 3100.0] {
        tx.send(GlobalPointerEvent {
            screen: Vector2 { x, y: 10.0 },
        })
        .unwrap();
    }
    h.pointer(None);
    h.run();
    assert_eq!(*h.leaves.lock().unwrap(), 2);
    assert!(!h.controller().placements()[0].visible);

    h.world.resource_mut::<WorldTime>().elapsed += DEREGISTER_DELAY + 1.0;
    h.pointer(None);
    h.run();
    assert_eq!(h.hook().disabled, 1);
    assert!(!h.world.resource::<GlobalMouse>().is_running());
}

#[test]
fn local_input_switches_global_pointer_off() {
    let mut h = harness("local");
    h.pointer(Some(Vector2 { x: 10.0, y: 10.0 }));
    h.run();
    h.pointer(None);
    h.run();
    assert!(h.world.resource::<GlobalMouse>().is_running());

    h.pointer(Some(Vector2 { x: 20.0, y: 20.0 }));
    h.run();
    assert_eq!(h.hook().disabled, 1);
    let mouse = h.world.resource::<GlobalMouse>();
    assert!(!mouse.is_running());
    assert_eq!(mouse.deregister_at(), None);
}

#[test]
fn recenter_moves_to_screen_middle_and_persists() {
    let mut h = harness("recenter");
    recenter::<FakeWindow>(&mut h.world);

    let t = h.controller().transform().clone();
    assert!(approx_eq(t.window_x() + t.width() / 2.0, 960.0));
    assert!(approx_eq(t.window_y() + t.height() / 2.0, 540.0));
    assert_eq!(*h.changes.lock().unwrap(), vec![PresentationChange::Moved]);
    assert_eq!(
        h.world.non_send_resource::<FakeWindow>().position,
        Some((t.window_x(), t.window_y()))
    );

    let mut saved = CharaConfig::with_path(&h.path);
    saved.load_from_file().unwrap();
    assert!(approx_eq(saved.stage_x.unwrap(), t.window_x()));
    assert!(approx_eq(saved.stage_y.unwrap(), t.window_y()));
}

