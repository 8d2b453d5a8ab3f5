//! Text rendering through the pooled glyph painter, over a UI quad panel.
//!
//! Usage: `cargo run --example glyphs -- path/to/font.ttf`

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use torden::prelude::*;
use torden::render2d::UiVertex;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowId};

struct Scene {
    gpu: GpuContext,
    ui: BatchRenderer<UiVertex, WgpuGeometry>,
    painter: TextPainter,
    panel: Rc<RefCell<UiQuad>>,
    started: Instant,
    frames: u64,
}

impl Scene {
    fn new(window: Arc<Window>, font_path: &str) -> Self {
        let gpu = GpuContext::new(window);

        let atlas = rasterize_font(font_path, 32.0);
        let mut textures = TextureArray::new(&gpu, atlas.size, atlas.size, 2);
        let atlas_layer = textures.push_rgba(&gpu, &atlas.pixels);

        let material = BatchMaterial::ui(&gpu, &textures);
        let mut ui = BatchRenderer::new(WgpuGeometry::new::<UiVertex>(&gpu, material, 0, 0));

        // Backdrop panel behind the text (glyphs sit at z 0).
        let panel = Rc::new(RefCell::new(
            UiQuad::new(
                Vec2::new(0.0, 0.0),
                Vec2::new(520.0, 120.0),
                Color::rgba(0.1, 0.1, 0.1, 0.8),
                textures.white(),
            )
            .with_z_order(-1),
        ));
        ui.add(panel.clone());

        let painter = TextPainter::new(atlas.font.clone(), atlas_layer);

        Self {
            gpu,
            ui,
            painter,
            panel,
            started: Instant::now(),
            frames: 0,
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.frames += 1;
        let t = self.started.elapsed().as_secs_f32();

        self.painter.begin();
        self.painter.draw_text(
            &mut self.ui,
            "torden text layer",
            Vec2::new(-240.0, 20.0),
            1.0,
            Color::WHITE,
        );
        let counter = format!("frame {}", self.frames);
        self.painter.draw_text(
            &mut self.ui,
            &counter,
            Vec2::new(-240.0, -30.0),
            1.0,
            Color::rgb(1.0, 0.8, 0.2),
        );
        self.painter.end();

        // Gentle panel pulse, patched in place alongside the glyphs.
        self.panel
            .borrow_mut()
            .set_scale(Vec2::new(520.0 + (t * 2.0).sin() * 10.0, 120.0));

        self.ui.patch_dirty();

        let (w, h) = self.gpu.surface_size();
        let projection = Mat4::orthographic_rh(
            -(w as f32) / 2.0,
            w as f32 / 2.0,
            -(h as f32) / 2.0,
            h as f32 / 2.0,
            -1000.0,
            1000.0,
        );

        let mut frame = begin_frame(&self.gpu, ClearColor::default())?;
        {
            let mut pass = frame.pass();
            self.ui.draw(&mut pass, projection);
        }
        frame.present();
        Ok(())
    }
}

struct App {
    font_path: String,
    window: Option<Arc<Window>>,
    scene: Option<Scene>,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let attrs = Window::default_attributes()
                .with_title("torden — glyphs")
                .with_inner_size(winit::dpi::LogicalSize::new(960.0, 540.0));
            let window = Arc::new(
                event_loop
                    .create_window(attrs)
                    .expect("Failed to create window"),
            );
            self.scene = Some(Scene::new(window.clone(), &self.font_path));
            self.window = Some(window);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
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

    let font_path = std::env::args()
        .nth(1)
        .expect("usage: glyphs <path/to/font.ttf>");

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    let mut app = App {
        font_path,
        window: None,
        scene: None,
    };
    event_loop.run_app(&mut app).expect("Event loop error");
}
