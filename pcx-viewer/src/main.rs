use crate::cli::AppOptions;
use crate::config::ViewerConfig;
use crate::scene::{OrbitCamera, fibonacci_sphere};
use clap::Parser;
use human_panic::setup_panic;
use log::{debug, error, info};
use pcx_renderer::glium::{Frame, Surface};
use pcx_renderer::renderer::backends::RenderBackend;
use pcx_renderer::renderer::backends::glium::{
    DeferredDestroy, FrameHandler, GliumBackend, GliumMaterial, GliumRenderOptions, GliumShader,
    ImmediateDestroy, run,
};
use pcx_renderer::renderer::camera::Camera;
use pcx_renderer::renderer::error::RendererResult;
use pcx_renderer::renderer::material::{Material, MaterialDestroyer};
use pcx_renderer::renderer::point_data::{
    PointCloudData, PointRecord, point_records_from_pasture,
};
use pcx_renderer::renderer::render_pass::PointCloudRenderer;
use pasture_core::nalgebra::Matrix4;
use std::process::ExitCode;
use std::time::Instant;

mod cli;
mod config;
mod scene;

/// Keyword of the point shader, that ignores the point colors and draws everything in the tint color.
const TINT_ONLY_KEYWORD: &str = "_TINT_ONLY";

fn main() -> ExitCode {
    setup_panic!();
    let args = AppOptions::parse();
    simple_logger::init_with_level(args.log_level).expect("Failed to initialize logger.");
    match main_result(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            debug!("{e:?}");
            ExitCode::FAILURE
        }
    }
}

fn main_result(args: AppOptions) -> anyhow::Result<()> {
    // create default config file
    if let Some(path) = &args.write_default_config {
        info!("Creating default config file at: {}", path.display());
        ViewerConfig::write_default(path)?;
        return Ok(());
    }

    // read config file
    let mut config = match &args.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };
    if let Some(point_size) = args.point_size {
        config.render.point_size = point_size;
    }
    if args.force_point_shader {
        config.render.force_point_shader = true;
    }
    if let Some(point_count) = args.point_count {
        config.scene.point_count = point_count;
    }
    debug!("{:?}", config);

    // generate points
    let points = fibonacci_sphere(config.scene.point_count, config.scene.radius);
    let records = point_records_from_pasture(&points)?;
    info!("Generated {} points.", records.len());

    let options = GliumRenderOptions {
        multisampling: args.multisampling,
        window_title: "Pcx Viewer".to_string(),
        ..Default::default()
    };
    let viewer = Viewer::new(&config, records, args.custom_point_material, args.edit_mode);
    match run(&options, viewer) {
        Ok(never) => match never {},
        Err(e) => Err(e.into()),
    }
}

/// Destroys materials the way the host mode requires.
enum HostDestroyer {
    /// Edit mode
    Immediate(ImmediateDestroy),

    /// Live mode
    Deferred(DeferredDestroy),
}

impl HostDestroyer {
    fn as_destroyer(&mut self) -> &mut dyn MaterialDestroyer<GliumMaterial> {
        match self {
            HostDestroyer::Immediate(d) => d,
            HostDestroyer::Deferred(d) => d,
        }
    }

    fn end_of_frame(&mut self) {
        if let HostDestroyer::Deferred(d) = self {
            d.flush();
        }
    }
}

struct Viewer {
    renderer: PointCloudRenderer<GliumBackend>,
    pending_points: Option<Vec<PointRecord>>,
    camera: Camera,
    orbit: OrbitCamera,
    custom_material: Option<GliumMaterial>,
    use_custom_material: bool,
    destroyer: HostDestroyer,
    last_frame: Instant,
}

impl Viewer {
    fn new(
        config: &ViewerConfig,
        points: Vec<PointRecord>,
        use_custom_material: bool,
        edit_mode: bool,
    ) -> Self {
        let mut renderer = PointCloudRenderer::new(GliumShader::point(), GliumShader::disk())
            .with_settings(config.render.clone());
        renderer.set_layer(config.scene.layer);
        let destroyer = if edit_mode {
            HostDestroyer::Immediate(ImmediateDestroy)
        } else {
            HostDestroyer::Deferred(DeferredDestroy::new())
        };
        Viewer {
            renderer,
            pending_points: Some(points),
            camera: config.camera.to_camera(),
            orbit: OrbitCamera::new(
                config.camera.distance,
                config.camera.orbit_speed,
                config.camera.fov_y_degrees,
            ),
            custom_material: None,
            use_custom_material,
            destroyer,
            last_frame: Instant::now(),
        }
    }

    /// Creates the GPU resources, that need the backend.
    fn initialize(&mut self, backend: &mut GliumBackend) -> RendererResult<()> {
        if let Some(points) = self.pending_points.take() {
            let data = PointCloudData::new(backend.create_point_buffer(&points)?);
            info!("Uploaded {} points.", data.point_count());
            self.renderer.set_source_data(Some(data));
        }
        if self.use_custom_material && self.renderer.custom_point_material().is_none() {
            self.apply_custom_material(backend)?;
        }
        Ok(())
    }

    fn apply_custom_material(&mut self, backend: &mut GliumBackend) -> RendererResult<()> {
        let custom = if self.use_custom_material {
            Some(self.custom_material(backend)?)
        } else {
            None
        };
        self.renderer.set_custom_point_material(custom);
        self.renderer.revalidate(self.destroyer.as_destroyer());
        Ok(())
    }

    fn custom_material(&mut self, backend: &mut GliumBackend) -> RendererResult<GliumMaterial> {
        if let Some(material) = &self.custom_material {
            return Ok(material.clone());
        }
        let mut material = backend.create_material(&GliumShader::point())?;
        material.enable_keyword(TINT_ONLY_KEYWORD);
        self.custom_material = Some(material.clone());
        Ok(material)
    }

    fn log_settings(&self) {
        let settings = self.renderer.settings();
        info!(
            "Point size: {}, force point shader: {}, custom material: {}",
            settings.point_size, settings.force_point_shader, self.use_custom_material
        );
    }
}

impl FrameHandler for Viewer {
    fn draw(&mut self, backend: &mut GliumBackend, frame: &mut Frame) -> RendererResult<()> {
        self.initialize(backend)?;

        let now = Instant::now();
        self.orbit.advance(now.duration_since(self.last_frame));
        self.last_frame = now;

        // nothing to draw into, while the window is minimized
        let (width, height) = frame.get_dimensions();
        let Some(matrices) = self.orbit.matrices(width, height) else {
            return Ok(());
        };
        let transform = Matrix4::identity();

        if let Some(command) = self
            .renderer
            .render_frame(backend, Some(&self.camera), &transform)?
        {
            backend.submit(frame, &command, &matrices)?;
        }
        Ok(())
    }

    fn frame_finished(&mut self, _backend: &mut GliumBackend) {
        self.destroyer.end_of_frame();
    }

    fn key_typed(&mut self, backend: &mut GliumBackend, key: char) {
        if key == 'c' || key == 'C' {
            self.use_custom_material = !self.use_custom_material;
            if let Err(e) = self.apply_custom_material(backend) {
                error!("Could not change the custom material: {}", e);
            }
            self.log_settings();
            return;
        }

        let settings = self.renderer.settings_mut();
        match key {
            'f' | 'F' => settings.force_point_shader = !settings.force_point_shader,
            '+' | '=' if settings.point_size == 0.0 => settings.point_size = 0.01,
            '+' | '=' => settings.point_size *= 1.25,
            '-' => settings.point_size /= 1.25,
            '0' => settings.point_size = 0.0,
            _ => return,
        }
        self.renderer.revalidate(self.destroyer.as_destroyer());
        self.log_settings();
    }

    fn exit(&mut self, _backend: &mut GliumBackend) {
        self.renderer.release(self.destroyer.as_destroyer());
        if let Some(custom) = self.custom_material.take() {
            self.destroyer.as_destroyer().destroy(custom);
        }
        self.destroyer.end_of_frame();
        info!("Bye.");
    }
}
