//! Desktop character entry point.
//!
//! Shows an animated character in a transparent, undecorated, top-most
//! window using:
//! - **raylib** for the window, textures and input
//! - **bevy_ecs** for parts, resources, observers and the frame schedule
//!
//! # Main Loop
//!
//! 1. Parse the command line, load the config and the character definition
//! 2. Open the window, compute size limits from the monitors and restore the
//!    last scale and position
//! 3. Spawn one entity per body part and load every frame texture
//! 4. Each frame: update the clock and pointer, run gestures, global pointer
//!    handling, messages and animation, then draw. `Home` re-centres the
//!    window on its screen
//! 5. On exit release the parts and save the config
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --chara assets/chara/chara.json
//! ```

// Do not create console on Windows
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

use std::path::{Path, PathBuf};

use bevy_ecs::observer::Observer;
use bevy_ecs::prelude::*;
use clap::Parser;
use crossbeam_channel::Sender;
use log::{error, info, warn};
use raylib::ffi;
use raylib::prelude::*;

use desktopchara::chara::{load_definition, release_parts, spawn_parts};
use desktopchara::events::clip::play_clip_observer;
use desktopchara::events::message::show_message_observer;
use desktopchara::events::presentation::persist_presentation_observer;
use desktopchara::events::reaction::react_to_click_observer;
use desktopchara::host::{GlobalPointerHook, HostWindow};
use desktopchara::resources::characonfig::{CharaConfig, DEFAULT_CONFIG_PATH};
use desktopchara::resources::clickreaction::ClickReaction;
use desktopchara::resources::displaylist::DisplayList;
use desktopchara::resources::globalmouse::{GlobalMouse, GlobalPointerEvent, send_global_pointer};
use desktopchara::resources::messages::MessageQueue;
use desktopchara::resources::overlay::{InputBoxOverlay, MessagePanelOverlay, StatusBarOverlay};
use desktopchara::resources::pointerinput::PointerInput;
use desktopchara::resources::presentation::PresentationController;
use desktopchara::resources::texturestore::TextureStore;
use desktopchara::resources::worldtime::WorldTime;
use desktopchara::systems::animation::animation;
use desktopchara::systems::globalmouse::{global_pointer, pointer_hover};
use desktopchara::systems::input::update_pointer_input;
use desktopchara::systems::messages::update_messages;
use desktopchara::systems::presentation::{drag_gesture, recenter, zoom_gesture};
use desktopchara::systems::render::render_pass;
use desktopchara::systems::time::update_world_time;

/// Desktop character
#[derive(Parser)]
#[command(version, about = "An animated character living on the desktop")]
struct Cli {
    /// Character definition file.
    #[arg(long, value_name = "PATH", default_value = "assets/chara/chara.json")]
    chara: PathBuf,

    /// Configuration file.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

/// Global pointer source for raylib.
///
/// GLFW keeps reporting the cursor relative to the window after it left, so
/// while enabled the main loop feeds the rebuilt screen position into the
/// channel.
#[derive(Default)]
struct CursorPollHook {
    tx: Option<Sender<GlobalPointerEvent>>,
}

impl GlobalPointerHook for CursorPollHook {
    fn enable(&mut self, tx: Sender<GlobalPointerEvent>) {
        self.tx = Some(tx);
    }

    fn disable(&mut self) {
        self.tx = None;
    }
}

/// Push the screen position while the pointer is outside the window.
fn poll_cursor(hook: NonSend<CursorPollHook>, input: Res<PointerInput>) {
    if input.is_inside() {
        return;
    }
    if let Some(tx) = &hook.tx {
        send_global_pointer(
            tx,
            GlobalPointerEvent {
                screen: input.screen,
            },
        );
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = CharaConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        info!("{}, using defaults", e);
    }

    let def = match load_definition(&cli.chara) {
        Ok(def) => def,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    let base = cli.chara.parent().unwrap_or(Path::new(".")).to_path_buf();

    // --------------- Raylib window ---------------
    let (mut rl, thread) = raylib::init()
        .size(1, 1)
        .transparent()
        .undecorated()
        .title("desktopchara")
        .build();
    if config.always_on_top {
        unsafe {
            ffi::SetWindowState(ffi::ConfigFlags::FLAG_WINDOW_TOPMOST as u32);
        }
    }
    rl.set_target_fps(config.target_fps);
    // Disable ESC to exit
    rl.set_exit_key(None);
    info!("Window created");

    let mut controller =
        match PresentationController::from_data(&def.data, def.extra_top, &rl.screen_bounds()) {
            Ok(c) => c,
            Err(e) => {
                error!("{}", e);
                std::process::exit(1);
            }
        };
    if let Err(e) = controller.set_zoom_step(config.zoom_step) {
        warn!("zoom step {} ignored: {}", config.zoom_step, e);
    }
    let chat = config.chat_enabled && def.data.message_supported;
    controller.add_observer(Box::new(StatusBarOverlay::new(&def.data)));
    controller.add_observer(Box::new(InputBoxOverlay::new(&def.data, chat)));
    controller.add_observer(Box::new(MessagePanelOverlay::new(&def.data)));
    if let Err(e) = controller.restore(config.persisted(), &mut rl) {
        error!("{}", e);
    }

    let mut textures = TextureStore::new();
    textures.load_frames(&mut rl, &thread, &base, &def.frame_ids());

    // --------------- ECS world + resources ---------------
    let mut world = World::new();
    world.insert_resource(WorldTime::default().with_time_scale(1.0));
    world.insert_resource(PointerInput::default());
    world.insert_resource(DisplayList::new());
    world.insert_resource(GlobalMouse::new());
    world.insert_resource(MessageQueue::new(chat));
    world.insert_resource(def.data.clone());
    world.insert_resource(ClickReaction::new(def.click_lines.clone()));
    world.insert_resource(controller);
    world.insert_resource(textures);
    world.insert_resource(config);
    world.insert_non_send_resource(CursorPollHook::default());
    world.insert_non_send_resource(rl);

    world.spawn(Observer::new(play_clip_observer));
    world.spawn(Observer::new(persist_presentation_observer));
    world.spawn(Observer::new(show_message_observer));
    world.spawn(Observer::new(react_to_click_observer));
    // Ensure the observer is registered before we run any systems that may trigger events.
    world.flush();

    if let Err(e) = spawn_parts(&mut world, &def) {
        error!("{}", e);
        std::process::exit(1);
    }

    let mut update = Schedule::default();
    update.add_systems(
        (
            update_pointer_input,
            zoom_gesture::<RaylibHandle>,
            drag_gesture::<RaylibHandle>,
            pointer_hover::<CursorPollHook>,
            poll_cursor,
            global_pointer::<CursorPollHook>,
            update_messages,
            animation,
        )
            .chain(),
    );

    // --------------- Main loop ---------------
    while !world
        .non_send_resource::<raylib::RaylibHandle>()
        .window_should_close()
    {
        let dt = world
            .non_send_resource::<raylib::RaylibHandle>()
            .get_frame_time();
        update_world_time(&mut world, dt);

        update.run(&mut world);

        if world
            .non_send_resource::<raylib::RaylibHandle>()
            .is_key_pressed(KeyboardKey::KEY_HOME)
        {
            recenter::<RaylibHandle>(&mut world);
        }

        world.clear_trackers();

        let Some(mut rl) = world.remove_non_send_resource::<raylib::RaylibHandle>() else {
            break;
        };
        {
            let mut d = rl.begin_drawing(&thread);
            d.clear_background(Color::BLANK);
            render_pass(&mut world, &mut d);
        }
        world.insert_non_send_resource(rl);
    }

    let released = release_parts(&mut world);
    info!(
        "released {} parts after {} frames",
        released,
        world.resource::<WorldTime>().frame_count
    );
    let persisted = world.resource::<PresentationController>().persisted();
    let mut config = world.resource_mut::<CharaConfig>();
    config.set_persisted(persisted);
    if let Err(e) = config.save_to_file() {
        error!("{}", e);
    }
}
