//! Canvas demo application
//!
//! Runs a few headless frames with two canvases: a world-space panel in front
//! of the camera and a flat overlay. Frames are executed on a render thread
//! against a recording device, and the recorded work is summarised at exit.
//!
//! Usage: `canvas_demo [config.toml|config.ron]`

mod demo_ui;

use demo_ui::PanelLibrary;
use std::cell::RefCell;
use std::rc::Rc;
use surface_ui::assets::TEXTURE_UPLOAD_ORDER;
use surface_ui::foundation::{logging, time::Timer};
use surface_ui::prelude::*;
use surface_ui::render::{Camera, HandleAllocator};

const FRAMES: usize = 5;

#[derive(thiserror::Error, Debug)]
enum DemoError {
    #[error(transparent)]
    Ui(#[from] UiError),

    #[error("configuration error: {0}")]
    Config(#[from] surface_ui::config::ConfigError),

    #[error("failed to start worker thread: {0}")]
    Thread(#[from] std::io::Error),

    #[error("scene has no active camera")]
    NoCamera,

    #[error("render thread stopped unexpectedly")]
    RenderThread,
}

fn load_config() -> Result<SurfaceUiConfig, DemoError> {
    match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading configuration from {}", path);
            Ok(SurfaceUiConfig::load_from_file(&path)?)
        }
        None => Ok(SurfaceUiConfig::default()),
    }
}

/// Pointer path sweeping across the world-space panel's button
fn input_for_frame(frame: usize) -> Vec<InputEvent> {
    let x = 250 + frame as i32 * 50;
    let mut events = vec![InputEvent::mouse_move(x, 300)];
    if frame == 2 {
        events.push(InputEvent::mouse_button(0, true));
        events.push(InputEvent::mouse_button(0, false));
    }
    events
}

fn run() -> Result<(), DemoError> {
    let config = load_config()?;
    let handles = HandleAllocator::new();

    let mut world = World::new(800, 600);
    let facing = Quat::from_axis_angle(&Vec3::y_axis(), std::f32::consts::PI);
    let camera = world.spawn(Transform::from_position_rotation(Vec3::zeros(), facing));
    world.add_camera(camera, Camera::perspective(60.0, 0.1, 100.0));
    world.set_active_camera(Some(camera));

    // panel centred half a unit left and down of its origin, five units ahead
    let panel = world.spawn(Transform::from_position_rotation(Vec3::new(0.5, -0.5, 5.0), facing));
    let hud = world.spawn(Transform::identity());

    let library = Rc::new(RefCell::new(PanelLibrary::new()));
    let system = UiSystem::new(library.clone(), config.clone())?;

    let textures = Rc::new(RefCell::new(FileTextureSource::new(&config.asset_root)?));
    let mut registry = system.create_registry(
        Box::new(DiskFileSystem::new(&config.asset_root)),
        textures.clone(),
    );
    registry.create_canvas(&mut world, panel)?;
    registry.create_canvas(&mut world, hud)?;
    registry.set_3d(hud, false)?;
    log::info!(
        "{} canvases, {} live contexts, {} fonts, focus on {:?}",
        registry.len(),
        library.borrow().context_count(),
        library.borrow().font_count(),
        registry.focused()
    );

    let viewport = world.active_viewport().ok_or(DemoError::NoCamera)?;
    let mut pipeline = Pipeline::new(HeadlessRenderer::with_allocator(true, handles.clone()), viewport);
    let render_thread = RenderThread::spawn(RecordingDevice::with_allocator(handles))?;

    let mut timer = Timer::new();
    for frame in 0..FRAMES {
        timer.update();
        registry.update(&world, &input_for_frame(frame), timer.delta_time());
        registry.render(&world, &mut pipeline);

        if let Some(uploads) = textures.borrow_mut().take_upload_job() {
            log::debug!("Queueing {} texture uploads", uploads.uploads().len());
            pipeline.renderer_mut().queue(Box::new(uploads), TEXTURE_UPLOAD_ORDER);
        }

        let jobs = pipeline.renderer_mut().take_frame();
        log::info!("Frame {}: submitting {} jobs", timer.frame_count(), jobs.len());
        if !render_thread.submit(jobs) {
            return Err(DemoError::RenderThread);
        }
    }

    registry.clear(&mut world);
    let device = render_thread.shutdown().ok_or(DemoError::RenderThread)?;
    log::info!(
        "Recorded {} commands, {} draw calls, {} live buffers, {} lifecycle events in {:.3}s",
        device.commands().len(),
        device.draw_count(),
        device.live_buffers(),
        world.lifecycle_events().len(),
        timer.time_since_start()
    );
    Ok(())
}

fn main() {
    logging::init();
    if let Err(err) = run() {
        log::error!("{}", err);
        std::process::exit(1);
    }
}
