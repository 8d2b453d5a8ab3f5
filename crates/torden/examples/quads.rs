//! Animated sprites and a debug overlay, synchronized through the
//! incremental patch path — only the handful of mutated drawables re-upload
//! each frame.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use torden::prelude::*;
use torden::render2d::SpriteVertex;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowId};

const SPRITE_COUNT: usize = 12;

struct Scene {
    gpu: GpuContext,
    sprites: BatchRenderer<SpriteVertex, WgpuGeometry>,
    overlay: DebugOverlay<WgpuGeometry>,
    handles: Vec<Rc<RefCell<Sprite>>>,
    marker: usize,
    started: Instant,
}

impl Scene {
    fn new(window: Arc<Window>) -> Self {
        let gpu = GpuContext::new(window);

        // One white layer is enough — sprites here are tint-only.
        let textures = TextureArray::new(&gpu, 1, 1, 1);

        let sprite_material = BatchMaterial::sprite(&gpu, &textures);
        let mut sprites = BatchRenderer::new(WgpuGeometry::new::<SpriteVertex>(
            &gpu,
            sprite_material,
            SPRITE_COUNT * 4,
            SPRITE_COUNT * 6,
        ));

        // A ring of tinted quads. Higher z draws on top.
        let mut handles = Vec::with_capacity(SPRITE_COUNT);
        for i in 0..SPRITE_COUNT {
            let hue = i as f32 / SPRITE_COUNT as f32;
            let sprite = Rc::new(RefCell::new(
                Sprite::new(Vec2::ZERO, Vec2::new(60.0, 60.0), textures.white())
                    .with_color(Color::rgb(hue, 0.4, 1.0 - hue))
                    .with_z_order(i as i32),
            ));
            sprites.add(sprite.clone());
            handles.push(sprite);
        }
        sprites.repack();

        let shape_material = BatchMaterial::shape(&gpu);
        let mut overlay =
            DebugOverlay::new(WgpuGeometry::new::<torden::render2d::ShapeVertex>(
                &gpu,
                shape_material,
                256,
                384,
            ));
        overlay.add_line(
            Vec2::new(-300.0, 0.0),
            Vec2::new(300.0, 0.0),
            Color::rgba(0.0, 1.0, 0.0, 0.4),
            2.0,
        );
        overlay.add_line(
            Vec2::new(0.0, -300.0),
            Vec2::new(0.0, 300.0),
            Color::rgba(0.0, 1.0, 0.0, 0.4),
            2.0,
        );
        let marker = overlay.add_point(Vec2::ZERO, Color::RED, 12.0);

        Self {
            gpu,
            sprites,
            overlay,
            handles,
            marker,
            started: Instant::now(),
        }
    }

    fn projection(&self) -> Mat4 {
        let (w, h) = self.gpu.surface_size();
        let half_w = w as f32 / 2.0;
        let half_h = h as f32 / 2.0;
        Mat4::orthographic_rh(-half_w, half_w, -half_h, half_h, -1000.0, 1000.0)
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let t = self.started.elapsed().as_secs_f32();

        // Mutate the ring: each handle raises its own dirty flag, and
        // patch_dirty re-uploads exactly those blocks.
        for (i, handle) in self.handles.iter().enumerate() {
            let phase = t + i as f32 / SPRITE_COUNT as f32 * std::f32::consts::TAU;
            let mut sprite = handle.borrow_mut();
            sprite.set_position(Vec2::new(phase.cos() * 200.0, phase.sin() * 200.0));
            sprite.set_rotation(t + i as f32);
        }
        self.sprites.patch_dirty();

        self.overlay
            .set_point(self.marker, Vec2::new(t.cos() * 260.0, t.sin() * 260.0));

        let projection = self.projection();
        let mut frame = begin_frame(&self.gpu, ClearColor::default())?;
        {
            let mut pass = frame.pass();
            self.sprites.draw(&mut pass, projection);
            self.overlay.render(&mut pass, projection);
        }
        frame.present();
        Ok(())
    }
}

#[derive(Default)]
struct App {
    window: Option<Arc<Window>>,
    scene: Option<Scene>,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let attrs = Window::default_attributes()
                .with_title("torden — quads")
                .with_inner_size(winit::dpi::LogicalSize::new(1280.0, 720.0));
            let window = Arc::new(
                event_loop
                    .create_window(attrs)
                    .expect("Failed to create window"),
            );
            self.scene = Some(Scene::new(window.clone()));
            self.window = Some(window);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Window close requested, exiting.");
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(scene) = &mut self.scene {
                    scene.gpu.resize(size.width, size.height);
                }
            }

            WindowEvent::RedrawRequested => {
                if let Some(scene) = &mut self.scene {
                    match scene.render() {
                        Ok(()) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            let (w, h) = scene.gpu.surface_size();
                            scene.gpu.resize(w, h);
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("Out of GPU memory!");
                            event_loop.exit();
                        }
                        Err(e) => {
                            log::warn!("Surface error: {:?}", e);
                        }
                    }
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}

fn main() {
    env_logger::init();

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    let mut app = App::default();
    event_loop.run_app(&mut app).expect("Event loop error");
}
