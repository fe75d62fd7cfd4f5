//! Window and event loop for hosts, that draw point clouds with the glium backend.

use crate::renderer::backends::glium::GliumBackend;
use crate::renderer::error::{RendererError, RendererResult};
use glium::glutin::dpi::LogicalSize;
use glium::glutin::event::{Event, WindowEvent};
use glium::glutin::event_loop::{ControlFlow, EventLoop};
use glium::{Display, Frame, Surface, glutin};
use log::{debug, error, trace};
use std::convert::Infallible;
use std::time::Instant;

/// Settings for the window, that the glium backend draws into.
#[derive(Debug, Clone)]
pub struct GliumRenderOptions {
    /// The multisampling level used during rendering.
    /// The value **must** be a power of 2. Any other value will result in an error during window creation.
    /// A value of `0` indicates, that multisampling is disabled.
    pub multisampling: u16,

    pub window_title: String,

    /// Initial size of the window, in logical pixels.
    pub window_size: (u32, u32),

    pub vsync: bool,
}

impl Default for GliumRenderOptions {
    fn default() -> Self {
        GliumRenderOptions {
            multisampling: 2,
            window_title: "Point Cloud Viewer".to_string(),
            window_size: (800, 600),
            vsync: true,
        }
    }
}

/// Receives the events of the window.
pub trait FrameHandler: 'static {
    /// Draws the next frame. The frame has already been cleared.
    fn draw(&mut self, backend: &mut GliumBackend, frame: &mut Frame) -> RendererResult<()>;

    /// Called after the frame has been presented.
    fn frame_finished(&mut self, _backend: &mut GliumBackend) {}

    /// A character has been typed while the window had the focus.
    fn key_typed(&mut self, _backend: &mut GliumBackend, _key: char) {}

    /// The window is about to close.
    fn exit(&mut self, backend: &mut GliumBackend);
}

/// Opens a window and runs the event loop, until the window is closed.
///
/// This only returns, if the window could not be opened. Otherwise, the process exits once the
/// event loop ends.
pub fn run<H>(options: &GliumRenderOptions, handler: H) -> RendererResult<Infallible>
where
    H: FrameHandler,
{
    let event_loop = EventLoop::new();

    let (width, height) = options.window_size;
    let wb = glutin::window::WindowBuilder::new()
        .with_title(options.window_title.clone())
        .with_inner_size(LogicalSize::new(width, height));
    let gl_window = glutin::ContextBuilder::new()
        .with_gl(glutin::GlRequest::Specific(glutin::Api::OpenGl, (4, 3)))
        .with_gl_profile(glutin::GlProfile::Core)
        .with_multisampling(options.multisampling)
        .with_depth_buffer(24)
        .with_vsync(options.vsync)
        .build_windowed(wb, &event_loop)
        .map_err(RendererError::graphics)?;
    let display = Display::from_gl_window(gl_window).map_err(RendererError::graphics)?;

    debug!("Window opened: {:?}", display.gl_window().window().id());
    debug!("OpenGL version: {}", display.get_opengl_version_string());
    debug!("OpenGL vendor: {}", display.get_opengl_vendor_string());
    debug!("OpenGL renderer: {}", display.get_opengl_renderer_string());

    let mut backend = GliumBackend::new(display);
    let mut handler = handler;
    let mut exited = false;

    debug!("Start event loop");
    event_loop.run(move |event, _window_target, control_flow| {
        *control_flow = ControlFlow::Poll;

        match event {
            Event::WindowEvent { window_id, event } => {
                trace!("Window event: {:?} - {:?}", window_id, event);
                match event {
                    WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                        if !exited {
                            handler.exit(&mut backend);
                            exited = true;
                        }
                        *control_flow = ControlFlow::Exit;
                    }
                    WindowEvent::ReceivedCharacter(key) => handler.key_typed(&mut backend, key),
                    _ => {}
                }
            }
            Event::MainEventsCleared => {
                if !exited {
                    backend.display().gl_window().window().request_redraw();
                }
            }
            Event::RedrawRequested(window_id) => {
                if exited {
                    return;
                }
                let time_start = Instant::now();
                let mut frame = backend.display().draw();
                frame.clear_color_and_depth((0.1, 0.1, 0.1, 1.0), 1.0);
                let drawn = handler.draw(&mut backend, &mut frame);
                let finished = frame.finish().map_err(RendererError::graphics);
                match drawn.and(finished) {
                    Ok(()) => {
                        handler.frame_finished(&mut backend);
                        let time = Instant::now().duration_since(time_start);
                        trace!("Window draw: {:?} - {} ms", window_id, time.as_millis());
                    }
                    Err(e) => {
                        error!("Failed to draw frame: {}", e);
                        handler.exit(&mut backend);
                        exited = true;
                        *control_flow = ControlFlow::Exit;
                    }
                }
            }
            Event::LoopDestroyed => {
                debug!("Event loop destroyed. This terminates the application.");
            }
            _ => {}
        }
    })
}
