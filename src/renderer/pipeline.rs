//! WebGPU render pipeline
//!
//! `GpuRenderer` records the frame into a `ShapeBatch` and uploads the
//! triangles on `present`.

use wgpu::util::DeviceExt;

use super::batch::ShapeBatch;
use super::vertex::Vertex;
use super::{Color, Renderer};
use crate::error::RenderError;

pub struct GpuRenderer {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,
    batch: ShapeBatch,
}

impl GpuRenderer {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Result<Self, RenderError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("flapgate-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await
            .map_err(|e| RenderError::Unavailable(e.to_string()))?;

        let surface_caps = surface.get_capabilities(adapter);
        // Colors are already sRGB encoded, same as the canvas backend
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| RenderError::Unavailable("surface has no formats".into()))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("render_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::info!("GPU renderer ready ({:?}, {}x{})", surface_format, width, height);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            batch: ShapeBatch::new(width, height),
        })
    }

    /// Pixel space (+y down) to normalized device coordinates (+y up)
    fn to_ndc(&self, v: &Vertex) -> Vertex {
        let (w, h) = self.batch.size();
        let [x, y] = v.position;
        Vertex {
            position: [
                x / w.max(1) as f32 * 2.0 - 1.0,
                1.0 - y / h.max(1) as f32 * 2.0,
            ],
            color: v.color,
        }
    }

    fn draw_frame(&mut self) -> Result<(), RenderError> {
        let ndc_vertices: Vec<Vertex> = self
            .batch
            .vertices()
            .iter()
            .map(|v| self.to_ndc(v))
            .collect();

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        let vertex_buffer = (!ndc_vertices.is_empty()).then(|| {
            self.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("vertex_buffer"),
                    contents: bytemuck::cast_slice(&ndc_vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                })
        });

        let [r, g, b, a] = self.batch.clear_color().0;
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if let Some(buffer) = &vertex_buffer {
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_vertex_buffer(0, buffer.slice(..));
                render_pass.draw(0..ndc_vertices.len() as u32, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

impl Renderer for GpuRenderer {
    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
        self.batch.resize(width, height);
    }

    fn clear(&mut self, color: Color) {
        self.batch.clear(color);
    }

    fn save(&mut self) {
        self.batch.save();
    }

    fn restore(&mut self) {
        self.batch.restore();
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.batch.scale(sx, sy);
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.batch.translate(x, y);
    }

    fn set_line_width(&mut self, width: f32) {
        self.batch.set_line_width(width);
    }

    fn set_stroke_color(&mut self, color: Option<Color>) {
        self.batch.set_stroke_color(color);
    }

    fn set_fill_color(&mut self, color: Option<Color>) {
        self.batch.set_fill_color(color);
    }

    fn draw_polygon(&mut self, x: f32, y: f32, radius: f32, sides: u32, angle: f32) {
        self.batch.draw_polygon(x, y, radius, sides, angle);
    }

    fn draw_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.batch.draw_rect(x, y, w, h);
    }

    fn present(&mut self) -> Result<(), RenderError> {
        let result = self.draw_frame();
        // The batch is per frame whether or not the surface accepted it
        self.batch.present()?;
        result
    }
}
