use std::collections::HashMap;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlContextAttributes,
    WebGlProgram, WebGlShader, WebGlUniformLocation, WebGlVertexArrayObject,
};

use crate::backend::{Camera, LightRig, RenderHost, Renderer, Transform, Viewport};
use crate::color::Rgb;
use crate::error::SurfaceError;
use crate::geometry::Geometry;

/// Material opacity; shapes are translucent decoration over page content.
const OPACITY: f32 = 0.85;

/// Floats per vertex: position + normal.
const STRIDE_FLOATS: i32 = 6;

const VERTEX_SHADER: &str = r"#version 300 es
layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;
uniform mat4 u_view_projection;
uniform mat4 u_model;
out vec3 v_normal;
out vec3 v_world;
void main() {
    vec4 world = u_model * vec4(a_position, 1.0);
    v_world = world.xyz;
    v_normal = mat3(u_model) * a_normal;
    gl_Position = u_view_projection * world;
}
";

const FRAGMENT_SHADER: &str = r"#version 300 es
precision mediump float;
in vec3 v_normal;
in vec3 v_world;
uniform vec3 u_color;
uniform float u_opacity;
uniform vec3 u_ambient;
uniform vec3 u_sun_dir;
uniform vec3 u_sun;
uniform vec3 u_point_pos;
uniform vec3 u_point;
out vec4 out_color;
void main() {
    vec3 n = normalize(v_normal);
    float sun = max(dot(n, normalize(u_sun_dir)), 0.0);
    vec3 to_point = u_point_pos - v_world;
    float falloff = 1.0 / (1.0 + 0.02 * dot(to_point, to_point));
    float point = max(dot(n, normalize(to_point)), 0.0) * falloff;
    vec3 light = u_ambient + u_sun * sun + u_point * point;
    out_color = vec4(u_color * light, u_opacity);
}
";

/// Looks canvases up by element id and binds a WebGL2 context to each.
pub struct WebGlHost {
    document: Document,
    device_pixel_ratio: f64,
    /// Whether a fresh canvas can get a WebGL2 context; probed on first refusal.
    webgl2_supported: Option<bool>,
}

impl WebGlHost {
    #[must_use]
    pub fn new(document: Document, device_pixel_ratio: f64) -> Self {
        Self {
            document,
            device_pixel_ratio: device_pixel_ratio.max(1.0),
            webgl2_supported: None,
        }
    }

    /// Tell a page without WebGL2 apart from one canvas that refused it,
    /// e.g. because it already holds a 2d context.
    fn refusal(&mut self, target: &str) -> SurfaceError {
        let document = &self.document;
        let supported = *self.webgl2_supported.get_or_insert_with(|| {
            document
                .create_element("canvas")
                .ok()
                .and_then(|element| element.dyn_into::<HtmlCanvasElement>().ok())
                .and_then(|canvas| canvas.get_context("webgl2").ok().flatten())
                .is_some()
        });
        if supported {
            context_failed(target, "canvas refused a WebGL2 context")
        } else {
            SurfaceError::GraphicsUnavailable
        }
    }
}

impl RenderHost for WebGlHost {
    type Renderer = WebGlRenderer;

    fn create_renderer(
        &mut self,
        target: &str,
        lights: &LightRig,
    ) -> Result<WebGlRenderer, SurfaceError> {
        let canvas = self
            .document
            .get_element_by_id(target)
            .ok_or_else(|| SurfaceError::TargetNotFound {
                target: target.to_owned(),
            })?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| context_failed(target, "element is not a canvas"))?;

        let attrs = WebGlContextAttributes::new();
        attrs.set_alpha(true);
        attrs.set_antialias(true);
        let context = canvas
            .get_context_with_context_options("webgl2", &attrs)
            .map_err(|e| context_failed(target, &describe(&e)))?;
        let Some(context) = context else {
            return Err(self.refusal(target));
        };
        let gl: GL = context
            .dyn_into()
            .map_err(|_| context_failed(target, "unexpected context type"))?;

        let program = link_program(&gl, VERTEX_SHADER, FRAGMENT_SHADER)
            .map_err(|e| context_failed(target, &e))?;
        let uniforms = Uniforms::locate(&gl, &program);

        gl.use_program(Some(&program));
        gl.uniform1f(uniforms.opacity.as_ref(), OPACITY);
        let vec3 = |location: &Option<WebGlUniformLocation>, value: [f32; 3]| {
            gl.uniform3fv_with_f32_array(location.as_ref(), &value);
        };
        vec3(&uniforms.ambient, lights.ambient.radiance());
        vec3(&uniforms.sun_dir, lights.directional.vector.to_array());
        vec3(&uniforms.sun, lights.directional.radiance());
        vec3(&uniforms.point_pos, lights.point.vector.to_array());
        vec3(&uniforms.point, lights.point.radiance());

        gl.enable(GL::DEPTH_TEST);
        gl.enable(GL::BLEND);
        gl.blend_func(GL::SRC_ALPHA, GL::ONE_MINUS_SRC_ALPHA);
        gl.clear_color(0.0, 0.0, 0.0, 0.0);

        Ok(WebGlRenderer {
            target: target.to_owned(),
            canvas,
            gl,
            program: Some(program),
            uniforms,
            device_pixel_ratio: self.device_pixel_ratio,
            buffers: HashMap::new(),
            meshes: HashMap::new(),
            next_mesh: 0,
        })
    }
}

struct Uniforms {
    view_projection: Option<WebGlUniformLocation>,
    model: Option<WebGlUniformLocation>,
    color: Option<WebGlUniformLocation>,
    opacity: Option<WebGlUniformLocation>,
    ambient: Option<WebGlUniformLocation>,
    sun_dir: Option<WebGlUniformLocation>,
    sun: Option<WebGlUniformLocation>,
    point_pos: Option<WebGlUniformLocation>,
    point: Option<WebGlUniformLocation>,
}

impl Uniforms {
    fn locate(gl: &GL, program: &WebGlProgram) -> Self {
        let at = |name: &str| gl.get_uniform_location(program, name);
        Self {
            view_projection: at("u_view_projection"),
            model: at("u_model"),
            color: at("u_color"),
            opacity: at("u_opacity"),
            ambient: at("u_ambient"),
            sun_dir: at("u_sun_dir"),
            sun: at("u_sun"),
            point_pos: at("u_point_pos"),
            point: at("u_point"),
        }
    }
}

/// Vertex data shared by every mesh of one geometry.
struct GpuGeometry {
    vao: WebGlVertexArrayObject,
    buffer: WebGlBuffer,
    vertex_count: i32,
    users: usize,
}

struct MeshEntry {
    geometry: Geometry,
    model: [f32; 16],
    color: Rgb,
}

/// Handle to one drawable mesh on a [`WebGlRenderer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(u32);

pub struct WebGlRenderer {
    target: String,
    canvas: HtmlCanvasElement,
    gl: GL,
    program: Option<WebGlProgram>,
    uniforms: Uniforms,
    device_pixel_ratio: f64,
    buffers: HashMap<Geometry, GpuGeometry>,
    meshes: HashMap<MeshId, MeshEntry>,
    next_mesh: u32,
}

impl WebGlRenderer {
    fn upload(&self, geometry: &Geometry) -> Result<GpuGeometry, SurfaceError> {
        let gl = &self.gl;
        let mesh = geometry.build();
        let vao = gl
            .create_vertex_array()
            .ok_or_else(|| self.allocation_failed("vertex array"))?;
        let buffer = gl
            .create_buffer()
            .ok_or_else(|| self.allocation_failed("vertex buffer"))?;

        gl.bind_vertex_array(Some(&vao));
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
        let data = js_sys::Float32Array::from(mesh.interleaved().as_slice());
        gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &data, GL::STATIC_DRAW);

        let stride = STRIDE_FLOATS * 4;
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_with_i32(0, 3, GL::FLOAT, false, stride, 0);
        gl.enable_vertex_attrib_array(1);
        gl.vertex_attrib_pointer_with_i32(1, 3, GL::FLOAT, false, stride, 3 * 4);
        gl.bind_vertex_array(None);

        Ok(GpuGeometry {
            vao,
            buffer,
            vertex_count: i32::try_from(mesh.vertex_count()).unwrap_or(i32::MAX),
            users: 0,
        })
    }

    fn free(&self, gpu: &GpuGeometry) {
        self.gl.delete_buffer(Some(&gpu.buffer));
        self.gl.delete_vertex_array(Some(&gpu.vao));
    }

    fn allocation_failed(&self, what: &str) -> SurfaceError {
        SurfaceError::ResourceAllocationFailed {
            target: self.target.clone(),
            reason: format!("could not create {what}"),
        }
    }
}

impl Renderer for WebGlRenderer {
    type Mesh = MeshId;

    fn visible_size(&self) -> Viewport {
        let rect = self.canvas.get_bounding_client_rect();
        let scale = |css: f64| (css.max(0.0) * self.device_pixel_ratio).round() as u32;
        Viewport::new(scale(rect.width()), scale(rect.height()))
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.canvas.set_width(viewport.width);
        self.canvas.set_height(viewport.height);
        let w = i32::try_from(viewport.width).unwrap_or(i32::MAX);
        let h = i32::try_from(viewport.height).unwrap_or(i32::MAX);
        self.gl.viewport(0, 0, w, h);
    }

    fn create_mesh(&mut self, geometry: &Geometry, color: Rgb) -> Result<MeshId, SurfaceError> {
        if !self.buffers.contains_key(geometry) {
            let gpu = self.upload(geometry)?;
            self.buffers.insert(*geometry, gpu);
        }
        if let Some(gpu) = self.buffers.get_mut(geometry) {
            gpu.users += 1;
        }
        let id = MeshId(self.next_mesh);
        self.next_mesh += 1;
        self.meshes.insert(
            id,
            MeshEntry {
                geometry: *geometry,
                model: Transform::default().matrix().to_cols_array(),
                color,
            },
        );
        Ok(id)
    }

    fn update_mesh(&mut self, mesh: &MeshId, transform: &Transform, color: Rgb) {
        if let Some(entry) = self.meshes.get_mut(mesh) {
            entry.model = transform.matrix().to_cols_array();
            entry.color = color;
        }
    }

    fn dispose_mesh(&mut self, mesh: MeshId) {
        let Some(entry) = self.meshes.remove(&mesh) else {
            return;
        };
        let unused = match self.buffers.get_mut(&entry.geometry) {
            Some(gpu) => {
                gpu.users = gpu.users.saturating_sub(1);
                gpu.users == 0
            }
            None => false,
        };
        if unused {
            if let Some(gpu) = self.buffers.remove(&entry.geometry) {
                self.free(&gpu);
            }
        }
    }

    fn present(&mut self, camera: &Camera) {
        let gl = &self.gl;
        let Some(program) = self.program.as_ref() else {
            return;
        };
        gl.use_program(Some(program));
        gl.clear(GL::COLOR_BUFFER_BIT | GL::DEPTH_BUFFER_BIT);
        gl.uniform_matrix4fv_with_f32_array(
            self.uniforms.view_projection.as_ref(),
            false,
            &camera.view_projection().to_cols_array(),
        );
        for entry in self.meshes.values() {
            let Some(gpu) = self.buffers.get(&entry.geometry) else {
                continue;
            };
            gl.uniform_matrix4fv_with_f32_array(self.uniforms.model.as_ref(), false, &entry.model);
            gl.uniform3fv_with_f32_array(self.uniforms.color.as_ref(), &entry.color.to_array());
            gl.bind_vertex_array(Some(&gpu.vao));
            gl.draw_arrays(GL::TRIANGLES, 0, gpu.vertex_count);
        }
        gl.bind_vertex_array(None);
    }

    fn release(&mut self) {
        self.meshes.clear();
        for (_, gpu) in std::mem::take(&mut self.buffers) {
            self.free(&gpu);
        }
        if let Some(program) = self.program.take() {
            self.gl.delete_program(Some(&program));
        }
        self.gl.clear(GL::COLOR_BUFFER_BIT | GL::DEPTH_BUFFER_BIT);
    }
}

fn compile_shader(gl: &GL, kind: u32, source: &str) -> Result<WebGlShader, String> {
    let shader = gl.create_shader(kind).ok_or("could not create shader")?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);
    if gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let info = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        Err(format!("shader compile failed: {info}"))
    }
}

fn link_program(gl: &GL, vertex: &str, fragment: &str) -> Result<WebGlProgram, String> {
    let vs = compile_shader(gl, GL::VERTEX_SHADER, vertex)?;
    let fs = compile_shader(gl, GL::FRAGMENT_SHADER, fragment)?;
    let program = gl.create_program().ok_or("could not create program")?;
    gl.attach_shader(&program, &vs);
    gl.attach_shader(&program, &fs);
    gl.link_program(&program);
    // Shaders are owned by the program once linked.
    gl.delete_shader(Some(&vs));
    gl.delete_shader(Some(&fs));
    if gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        let info = gl.get_program_info_log(&program).unwrap_or_default();
        gl.delete_program(Some(&program));
        Err(format!("program link failed: {info}"))
    }
}

fn context_failed(target: &str, reason: &str) -> SurfaceError {
    SurfaceError::ContextCreationFailed {
        target: target.to_owned(),
        reason: reason.to_owned(),
    }
}

pub(crate) fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
