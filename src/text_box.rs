use std::rc::Rc;

use uuid::Uuid;
use wgpu::util::DeviceExt;

use crate::camera::Camera;
use crate::font::{FontCatalog, FontError};
use crate::geometry::{build_batches, HorizontalAlignment, TexturePageBatch, VerticalAlignment};
use crate::layout::{fit_to_box, LayoutError};
use crate::pipeline::{PageTexture, RenderContext, TextPipeline};
use crate::utils::{Color, ColorUniform, Position, Size, TransformUniform};

/// Vertical extent of the user coordinate system. Positions are given
/// top-left-origin with y growing downward; internally they are flipped
/// against this height into the bottom-left-origin world space.
pub const DEFAULT_REFERENCE_HEIGHT: f32 = 720.0;

#[derive(Debug, thiserror::Error)]
pub enum TextBoxError {
    #[error("box dimensions must be positive, got {width} x {height}")]
    InvalidSize { width: f32, height: f32 },
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Font(#[from] FontError),
}

/// GPU half of one [`TexturePageBatch`]: buffers plus the page texture it
/// samples. Dropped (and its buffers with it) whenever the batch list is
/// replaced, so a buffer is never freed twice and never leaks.
struct BatchGpu {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    num_indices: u32,
    page_texture: Rc<PageTexture>,
}

/// Per-view uniforms shared by all of the view's batches.
struct ViewGpu {
    transform_buffer: wgpu::Buffer,
    transform_bind_group: wgpu::BindGroup,
    color_buffer: wgpu::Buffer,
    color_bind_group: wgpu::BindGroup,
}

/// A message fitted into a fixed box and rendered as one draw call per
/// font texture page.
///
/// Setters that change what the text looks like (`set_text`, `set_size`,
/// `set_alignment`) re-run the fit and rebuild all batches; `set_position`
/// and `set_color` only touch uniforms. When a new layout cannot fit, the
/// previous geometry is kept untouched and the failure is returned and
/// logged.
///
/// The font catalog is shared and caller-owned; it must outlive every
/// view that references it, which the `Rc` makes structural.
pub struct TextBoxView {
    id: Uuid,
    font: Rc<FontCatalog>,
    text: String,
    width: f32,
    height: f32,
    position: Position,
    reference_height: f32,
    color: Color,
    h_align: HorizontalAlignment,
    v_align: VerticalAlignment,
    scale: f32,
    batches: Vec<TexturePageBatch>,
    batch_gpu: Vec<BatchGpu>,
    view_gpu: Option<ViewGpu>,
}

impl TextBoxView {
    /// Creates a view and performs the initial fit. Rejects non-positive
    /// box dimensions; a message that cannot fit is not an error here,
    /// the view simply starts without geometry (and the failure is
    /// logged).
    pub fn new(
        font: Rc<FontCatalog>,
        text: &str,
        width: f32,
        height: f32,
    ) -> Result<Self, TextBoxError> {
        if width <= 0.0 || height <= 0.0 {
            return Err(TextBoxError::InvalidSize { width, height });
        }

        let mut view = Self {
            id: Uuid::new_v4(),
            font,
            text: text.to_string(),
            width,
            height,
            position: Position::default(),
            reference_height: DEFAULT_REFERENCE_HEIGHT,
            color: Color::WHITE,
            h_align: HorizontalAlignment::Left,
            v_align: VerticalAlignment::Top,
            scale: 1.0,
            batches: Vec::new(),
            batch_gpu: Vec::new(),
            view_gpu: None,
        };
        if let Err(err) = view.rebuild() {
            log::warn!("text box {}: initial layout failed: {err}", view.id);
        }
        Ok(view)
    }

    /// Overrides the reference height used for the vertical coordinate
    /// flip (default 720).
    pub fn with_reference_height(mut self, reference_height: f32) -> Self {
        self.reference_height = reference_height;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Position in user coordinates (top-left origin, y down).
    pub fn position(&self) -> Position {
        self.position
    }

    /// Position in world coordinates (bottom-left origin, y up).
    pub fn world_position(&self) -> Position {
        Position {
            x: self.position.x,
            y: self.reference_height - self.position.y,
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn alignment(&self) -> (HorizontalAlignment, VerticalAlignment) {
        (self.h_align, self.v_align)
    }

    /// Scale the current geometry was fitted at.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn batches(&self) -> &[TexturePageBatch] {
        &self.batches
    }

    pub fn set_text(&mut self, text: &str) -> Result<(), TextBoxError> {
        if text == self.text {
            return Ok(());
        }
        self.text = text.to_string();
        self.relayout()
    }

    /// Resizes the box. A non-positive dimension is rejected and clears
    /// all geometry; the view then renders nothing until a valid size is
    /// set again.
    pub fn set_size(&mut self, width: f32, height: f32) -> Result<(), TextBoxError> {
        if width <= 0.0 || height <= 0.0 {
            self.batches.clear();
            self.batch_gpu.clear();
            return Err(TextBoxError::InvalidSize { width, height });
        }
        if width == self.width && height == self.height {
            return Ok(());
        }
        self.width = width;
        self.height = height;
        self.relayout()
    }

    pub fn set_alignment(
        &mut self,
        h_align: HorizontalAlignment,
        v_align: VerticalAlignment,
    ) -> Result<(), TextBoxError> {
        if h_align == self.h_align && v_align == self.v_align {
            return Ok(());
        }
        self.h_align = h_align;
        self.v_align = v_align;
        self.relayout()
    }

    /// Moves the box. Cheap: only the shared world transform changes, the
    /// batches are untouched.
    pub fn set_position(&mut self, x: f32, y: f32) {
        self.position = Position { x, y };
    }

    /// Tints the text. Cheap: only the shared colour uniform changes, the
    /// batches are untouched.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn relayout(&mut self) -> Result<(), TextBoxError> {
        match self.rebuild() {
            Ok(()) => Ok(()),
            Err(err) => {
                log::warn!("text box {}: {err}; keeping previous geometry", self.id);
                Err(err.into())
            }
        }
    }

    /// Re-fits the message and rebuilds all batches. Existing geometry is
    /// only replaced after the fit succeeds.
    fn rebuild(&mut self) -> Result<(), LayoutError> {
        let layout = fit_to_box(&self.text, self.width, self.height, &self.font)?;
        let batches = build_batches(
            &layout,
            self.width,
            self.height,
            self.h_align,
            self.v_align,
            &self.font,
        );
        log::debug!(
            "text box {}: {} line(s) at scale {:.2}, {} batch(es)",
            self.id,
            layout.lines.len(),
            layout.scale,
            batches.len()
        );
        self.scale = layout.scale;
        self.batches = batches;
        self.batch_gpu.clear();
        Ok(())
    }

    fn transform_uniform(&self, camera: &Camera, viewport: Size) -> TransformUniform {
        let world = self.world_position();
        let cam = camera.get_pos();
        let sx = 2.0 / viewport.width;
        let sy = 2.0 / viewport.height;
        TransformUniform {
            transform: [
                [sx, 0.0, 0.0, 0.0],
                [0.0, sy, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [
                    (world.x - cam.x) * sx - 1.0,
                    (world.y - cam.y) * sy - 1.0,
                    0.0,
                    1.0,
                ],
            ],
        }
    }

    /// Uploads any batches that do not have GPU buffers yet (page textures
    /// are created lazily by the catalog on first use) and writes the
    /// current transform and tint uniforms. Call once per frame, outside
    /// the render pass.
    pub fn prepare(
        &mut self,
        ctx: &RenderContext,
        camera: &Camera,
        viewport: Size,
    ) -> Result<(), TextBoxError> {
        if self.view_gpu.is_none() {
            self.view_gpu = Some(self.create_view_gpu(ctx));
        }

        if self.batch_gpu.len() != self.batches.len() {
            self.batch_gpu.clear();
            for batch in &self.batches {
                let vertex_buffer =
                    ctx.device
                        .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                            label: Some(&format!("text box {} page {} vertices", self.id, batch.page)),
                            contents: bytemuck::cast_slice(&batch.vertices),
                            usage: wgpu::BufferUsages::VERTEX,
                        });
                let index_buffer =
                    ctx.device
                        .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                            label: Some(&format!("text box {} page {} indices", self.id, batch.page)),
                            contents: bytemuck::cast_slice(&batch.indices),
                            usage: wgpu::BufferUsages::INDEX,
                        });
                let page_texture = self.font.page_texture(batch.page, ctx)?;
                self.batch_gpu.push(BatchGpu {
                    vertex_buffer,
                    index_buffer,
                    num_indices: batch.indices.len() as u32,
                    page_texture,
                });
            }
        }

        if let Some(view_gpu) = &self.view_gpu {
            let transform = self.transform_uniform(camera, viewport);
            ctx.queue
                .write_buffer(&view_gpu.transform_buffer, 0, bytemuck::bytes_of(&transform));
            let color = ColorUniform {
                color: self.color.to_array(),
            };
            ctx.queue
                .write_buffer(&view_gpu.color_buffer, 0, bytemuck::bytes_of(&color));
        }
        Ok(())
    }

    /// Issues one indexed draw per batch. Call inside a render pass, after
    /// [`prepare`](Self::prepare). A view without geometry draws nothing.
    pub fn render<'a>(&'a self, rpass: &mut wgpu::RenderPass<'a>, pipeline: &'a TextPipeline) {
        let view_gpu = match &self.view_gpu {
            Some(view_gpu) => view_gpu,
            None => return,
        };
        if self.batch_gpu.is_empty() {
            return;
        }

        rpass.set_pipeline(pipeline.pipeline());
        rpass.set_bind_group(1, &view_gpu.transform_bind_group, &[]);
        rpass.set_bind_group(2, &view_gpu.color_bind_group, &[]);
        for batch in &self.batch_gpu {
            rpass.set_bind_group(0, batch.page_texture.bind_group(), &[]);
            rpass.set_vertex_buffer(0, batch.vertex_buffer.slice(..));
            rpass.set_index_buffer(batch.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            rpass.draw_indexed(0..batch.num_indices, 0, 0..1);
        }
    }

    fn create_view_gpu(&self, ctx: &RenderContext) -> ViewGpu {
        let transform_buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("text box {} transform", self.id)),
                contents: bytemuck::bytes_of(&TransformUniform::IDENTITY),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let transform_bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("text box {} transform bind group", self.id)),
            layout: ctx.pipeline.transform_layout(),
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: transform_buffer.as_entire_binding(),
            }],
        });

        let color_buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("text box {} color", self.id)),
                contents: bytemuck::bytes_of(&ColorUniform {
                    color: self.color.to_array(),
                }),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let color_bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("text box {} color bind group", self.id)),
            layout: ctx.pipeline.color_layout(),
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: color_buffer.as_entire_binding(),
            }],
        });

        ViewGpu {
            transform_buffer,
            transform_bind_group,
            color_buffer,
            color_bind_group,
        }
    }
}
