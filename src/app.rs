use glutin::config::{Config, ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContextSurfaceAccessor,
    PossiblyCurrentContext, Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SurfaceAttributesBuilder, WindowSurface};

use glutin_winit::DisplayBuilder;

use raw_window_handle::HasRawWindowHandle;

use std::ffi::CString;
use std::num::NonZeroU32;
use std::path::PathBuf;

use thiserror::Error;

use winit::dpi::{PhysicalSize, Size};
use winit::event::{ElementState, Event, KeyboardInput, StartCause, VirtualKeyCode, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::platform::run_return::EventLoopExtRunReturn;
use winit::window::{Window, WindowBuilder};

use gl_wrapper::geometry::{GBError, Geometry, GeometryBuilder, Layout, VertexAttribute};
use gl_wrapper::program::{PBError, Program, ProgramBuilder};
use gl_wrapper::renderer::GlRenderer;

use colorcube::capture::{self, CaptureError, CaptureSchedule};
use colorcube::config::ViewerConfig;
use colorcube::cube::Cube;

const POSITION_ATTRIBUTE: &str = "vPosition";
const COLOR_ATTRIBUTE: &str = "vColor";
/// Frames presented before `--capture` reads back, the window may not be
/// mapped yet for the first few.
const CAPTURE_WARMUP_FRAMES: u32 = 3;

pub struct App {
    event_loop: EventLoop<()>,
    scene: Scene,
    gl_context: PossiblyCurrentContext,
    gl_window: GlWindow,
    clear_color: [f32; 4],
    capture: Option<PathBuf>,
}

/// GL objects owned by the app. Kept apart so they can be released while the
/// context is still current.
struct Scene {
    geometry: Geometry,
    program: Program,
    renderer: GlRenderer,
}

impl App {
    pub fn new(config: &ViewerConfig, capture: Option<PathBuf>) -> Result<Self, AppError> {
        let event_loop = EventLoop::new();
        let window_builder = WindowBuilder::new()
            .with_inner_size(Size::Physical(PhysicalSize::new(
                config.window.width,
                config.window.height,
            )))
            .with_resizable(config.window.resizable)
            .with_title(config.window.title.as_str());
        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));

        let mut template = ConfigTemplateBuilder::new();
        if config.window.samples > 0 {
            template = template.with_multisampling(config.window.samples);
        }

        let requested = config.window.samples;
        let (window, gl_config) = display_builder
            .build(&event_loop, template, |configs| {
                // glutin reports BadConfig before calling the picker when nothing matches
                pick_config(configs, requested, |c| c.num_samples())
                    .expect("display offered no GL configs")
            })
            .map_err(|e| AppError::Display(e.to_string()))?;

        let window = window.ok_or_else(|| AppError::Display("no window was created".into()))?;

        log::info!(
            "created {}x{} window with {} samples",
            config.window.width,
            config.window.height,
            gl_config.num_samples()
        );

        let handle = window.raw_window_handle();
        let gl_display = gl_config.display();

        let context_attr = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .with_profile(GlProfile::Core)
            .build(Some(handle));

        let gl_window = GlWindow::new(window, &gl_config)?;

        let gl_context = unsafe { gl_display.create_context(&gl_config, &context_attr)? }
            .make_current(&gl_window.surface)?;

        gl::load_with(|s| {
            CString::new(s)
                .map(|s| gl_display.get_proc_address(s.as_c_str()).cast())
                .unwrap_or(std::ptr::null())
        });

        if !gl::CreateShader::is_loaded() {
            return Err(AppError::Loader);
        }

        log::info!(
            "OpenGL {}",
            gl_wrapper::gl_version().unwrap_or_else(|| "version unknown".into())
        );

        let program =
            ProgramBuilder::from_paths(&config.shaders.vertex, &config.shaders.fragment)?.build()?;

        log::info!(
            "loaded shaders {:?} and {:?}",
            config.shaders.vertex,
            config.shaders.fragment
        );

        let cube = Cube::new();
        let data = cube.vertex_data();

        let geometry = GeometryBuilder::new(&data)
            .with_layout(Layout::Planar)
            .with_attribute_at(
                program.attrib_location(POSITION_ATTRIBUTE)?,
                VertexAttribute::Vec4,
            )
            .with_attribute_at(
                program.attrib_location(COLOR_ATTRIBUTE)?,
                VertexAttribute::Vec4,
            )
            .build()?;

        log::info!("uploaded cube with {} vertices", geometry.vertices());

        let renderer = GlRenderer::new();
        let (width, height): (u32, u32) = gl_window.window.inner_size().into();
        renderer.resize(width, height);

        Ok(Self {
            event_loop,
            scene: Scene {
                geometry,
                program,
                renderer,
            },
            gl_context,
            gl_window,
            clear_color: config.clear_color,
            capture,
        })
    }

    /// Renders until escape is pressed or the window is closed, then tears
    /// everything down.
    pub fn run(self) -> Result<(), AppError> {
        let Self {
            mut event_loop,
            mut scene,
            gl_context,
            gl_window,
            clear_color,
            capture: capture_path,
        } = self;

        let mut result = Ok(());
        let mut schedule = CaptureSchedule::new(CAPTURE_WARMUP_FRAMES);
        let [r, g, b, a] = clear_color;

        event_loop.run_return(|event, _window_target, control_flow| match event {
            Event::NewEvents(StartCause::Init) => {
                *control_flow = ControlFlow::Poll;
            }
            Event::MainEventsCleared => {
                gl_window.window.request_redraw();
            }
            Event::RedrawRequested(_) => {
                scene.renderer.clear_color(r, g, b, a);
                scene.renderer.draw(&scene.geometry, &scene.program);

                if let Some(path) = capture_path.as_ref().filter(|_| schedule.is_due()) {
                    let (width, height): (u32, u32) = gl_window.window.inner_size().into();
                    let pixels = scene.renderer.read_pixels(width, height);

                    result = capture::write_out(path, &pixels, width, height)
                        .map_err(AppError::from);
                    if result.is_ok() {
                        log::info!("saved frame to {:?}", path);
                    }
                    control_flow.set_exit();
                }

                match gl_window.surface.swap_buffers(&gl_context) {
                    Ok(()) => schedule.frame_presented(),
                    Err(e) => {
                        result = Err(e.into());
                        control_flow.set_exit();
                    }
                }
            }
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::Resized(size) => {
                    if let (Some(w), Some(h)) =
                        (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
                    {
                        gl_window.surface.resize(&gl_context, w, h);
                        scene.renderer.resize(size.width, size.height);
                    }
                }
                WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            state: ElementState::Pressed,
                            virtual_keycode: Some(VirtualKeyCode::Escape),
                            ..
                        },
                    ..
                } => {
                    log::info!("escape pressed, exiting");
                    control_flow.set_exit();
                }
                WindowEvent::CloseRequested => {
                    log::info!("window closed, exiting");
                    control_flow.set_exit();
                }
                _ => (),
            },
            _ => (),
        });

        // GL objects go first, while the context is still current
        drop(scene);
        drop(gl_window.surface);
        drop(gl_context);
        drop(gl_window.window);

        log::debug!("teardown complete");

        result
    }
}

/// Picks the config whose sample count is closest to `requested`, preferring
/// counts above it over counts below. `requested == 0` favours configs
/// without multisampling.
fn pick_config<C>(
    configs: impl Iterator<Item = C>,
    requested: u8,
    samples: impl Fn(&C) -> u8,
) -> Option<C> {
    configs.min_by_key(|c| {
        let s = samples(c);
        if s >= requested {
            (0, s - requested)
        } else {
            (1, requested - s)
        }
    })
}

pub struct GlWindow {
    // XXX the surface must be dropped before the window.
    pub surface: Surface<WindowSurface>,
    pub window: Window,
}

impl GlWindow {
    pub fn new(window: Window, config: &Config) -> Result<Self, AppError> {
        let (width, height): (u32, u32) = window.inner_size().into();
        let (width, height) = NonZeroU32::new(width)
            .zip(NonZeroU32::new(height))
            .ok_or_else(|| AppError::Display("window has zero size".into()))?;

        let raw_window_handle = window.raw_window_handle();
        let attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            raw_window_handle,
            width,
            height,
        );

        let surface = unsafe { config.display().create_window_surface(config, &attrs)? };

        Ok(Self { window, surface })
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to create window: {0}")]
    Display(String),
    #[error("Failed to create OpenGL context: {0}")]
    Context(#[from] glutin::error::Error),
    #[error("Failed to load OpenGL functions")]
    Loader,
    #[error("Failed to build shader program: {0}")]
    Shader(#[from] PBError),
    #[error("Failed to upload geometry: {0}")]
    Geometry(#[from] GBError),
    #[error("Failed to capture frame: {0}")]
    Capture(#[from] CaptureError),
}
