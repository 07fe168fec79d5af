//! Windowed HUD demo: three text boxes sharing one font catalog, showing
//! alignment, wrapping with scale back-off, and the cheap colour path.
//!
//! Usage: `cargo run --example hud_demo -- <font.fnt> <texture_dir>`

use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use heatstroke_text::{
    Camera, Color, FontCatalog, HorizontalAlignment, RenderContext, Size, TextBoxView,
    TextPipeline, VerticalAlignment,
};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

const WINDOW_WIDTH: u32 = 1280;
const WINDOW_HEIGHT: u32 = 720;

struct Gfx {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: TextPipeline,
    boxes: Vec<TextBoxView>,
    camera: Camera,
}

struct HudApp {
    descriptor_path: String,
    texture_dir: String,
    window: Option<Arc<Window>>,
    gfx: Option<Gfx>,
    started: Instant,
}

impl HudApp {
    fn new(descriptor_path: String, texture_dir: String) -> Self {
        Self {
            descriptor_path,
            texture_dir,
            window: None,
            gfx: None,
            started: Instant::now(),
        }
    }

    fn init_gfx(&mut self, window: Arc<Window>) -> anyhow::Result<Gfx> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance.create_surface(window.clone())?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            force_fallback_adapter: false,
            compatible_surface: Some(&surface),
        }))
        .context("no suitable GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
            },
            None,
        ))?;

        let size = window.inner_size();
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(caps.formats[0]);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::Fifo,
            desired_maximum_frame_latency: 2,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let pipeline = TextPipeline::new(&device, format);

        let font = Rc::new(
            FontCatalog::load(&self.descriptor_path, &self.texture_dir)
                .context("failed to load font")?,
        );
        log::info!(
            "loaded font '{}' ({} glyphs, {} pages)",
            font.name(),
            font.glyph_count(),
            font.page_count()
        );

        let mut title = TextBoxView::new(font.clone(), "HEATSTROKE", 600.0, 80.0)?;
        title.set_alignment(HorizontalAlignment::Center, VerticalAlignment::Middle)?;
        title.set_position(340.0, 40.0);

        let mut body = TextBoxView::new(
            font.clone(),
            "a long message wraps onto several lines and shrinks until it fits the box",
            420.0,
            160.0,
        )?;
        body.set_position(60.0, 200.0);

        let mut lap = TextBoxView::new(font.clone(), "LAP 2/3", 240.0, 60.0)?;
        lap.set_alignment(HorizontalAlignment::Right, VerticalAlignment::Bottom)?;
        lap.set_position(980.0, 620.0);

        Ok(Gfx {
            surface,
            device,
            queue,
            config,
            pipeline,
            boxes: vec![title, body, lap],
            camera: Camera::default(),
        })
    }

    fn redraw(&mut self) -> anyhow::Result<()> {
        let elapsed = self.started.elapsed().as_secs_f32();
        let gfx = match &mut self.gfx {
            Some(gfx) => gfx,
            None => return Ok(()),
        };

        // Pulse the title tint; colour changes reuse the existing batches.
        let pulse = 0.5 + 0.5 * (elapsed * 2.0).sin();
        gfx.boxes[0].set_color(Color::new(1.0, pulse, 0.2, 1.0));

        let viewport = Size {
            width: gfx.config.width as f32,
            height: gfx.config.height as f32,
        };
        let ctx = RenderContext {
            device: &gfx.device,
            queue: &gfx.queue,
            pipeline: &gfx.pipeline,
        };
        for text_box in &mut gfx.boxes {
            text_box.prepare(&ctx, &gfx.camera, viewport)?;
        }

        let frame = gfx.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = gfx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("hud encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("hud pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.1,
                            g: 0.2,
                            b: 0.3,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            for text_box in &gfx.boxes {
                text_box.render(&mut rpass, &gfx.pipeline);
            }
        }
        gfx.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

impl ApplicationHandler<()> for HudApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let attributes = Window::default_attributes()
            .with_title("HeatStroke HUD demo")
            .with_inner_size(winit::dpi::PhysicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT));
        match event_loop.create_window(attributes) {
            Ok(window) => {
                let window = Arc::new(window);
                match self.init_gfx(window.clone()) {
                    Ok(gfx) => {
                        self.gfx = Some(gfx);
                        self.window = Some(window);
                    }
                    Err(err) => {
                        log::error!("initialization failed: {err:#}");
                        event_loop.exit();
                    }
                }
            }
            Err(err) => {
                log::error!("window creation failed: {err}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::RedrawRequested => {
                if let Err(err) = self.redraw() {
                    log::error!("frame failed: {err:#}");
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gfx) = &mut self.gfx {
                    gfx.config.width = new_size.width.max(1);
                    gfx.config.height = new_size.height.max(1);
                    gfx.surface.configure(&gfx.device, &gfx.config);
                }
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            _ => (),
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let descriptor_path = args
        .next()
        .context("usage: hud_demo <font.fnt> <texture_dir>")?;
    let texture_dir = args
        .next()
        .context("usage: hud_demo <font.fnt> <texture_dir>")?;

    let event_loop = EventLoop::new()?;
    let mut app = HudApp::new(descriptor_path, texture_dir);
    event_loop.run_app(&mut app)?;
    Ok(())
}
