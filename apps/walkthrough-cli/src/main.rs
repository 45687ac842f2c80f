use anyhow::Context as _;
use clap::{Parser, Subcommand};
use glam::Mat4;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use walkthrough_camera::{Camera, CameraConfig, simple_mvp};
use walkthrough_input::Key;
use walkthrough_render::{DebugTextRenderer, FrameView, Primitive, Renderer};

#[derive(Parser)]
#[command(name = "walkthrough-cli", about = "Headless driver for the walkthrough camera")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions and the default camera config
    Info,
    /// Hold keys for a number of frames and print the resulting frame
    Simulate {
        /// Keys held for the whole run (w, a, s, d, left, right, up, down)
        #[arg(long = "hold", value_delimiter = ',')]
        hold: Vec<Key>,
        /// Number of frames to advance
        #[arg(short, long, default_value = "60")]
        frames: u32,
        /// Milliseconds per frame
        #[arg(long, default_value = "16.0")]
        frame_ms: f32,
        /// Viewport aspect ratio (width / height)
        #[arg(short, long, default_value = "1.7777778")]
        aspect: f32,
        /// Shape named in the output
        #[arg(long, default_value = "tetrahedron")]
        primitive: Primitive,
        /// Camera config file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print a frame every N frames instead of only the last one
        #[arg(long)]
        every: Option<u32>,
    },
    /// Print the fixed-camera MVP matrix for an identity model
    Mvp {
        #[arg(short, long, default_value = "1.7777778")]
        aspect: f32,
    },
    /// List primitives with their vertex and index counts
    Primitives,
}

fn load_camera(config: Option<PathBuf>) -> anyhow::Result<Camera> {
    let config = match config {
        Some(path) => CameraConfig::load(&path)
            .with_context(|| format!("failed to load camera config {}", path.display()))?,
        None => CameraConfig::default(),
    };
    Ok(Camera::new(config)?)
}

fn print_matrix(m: Mat4) {
    for row in 0..4 {
        let r = m.row(row);
        println!("  [{:>9.4} {:>9.4} {:>9.4} {:>9.4}]", r.x, r.y, r.z, r.w);
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("walkthrough-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("input: {}", walkthrough_input::crate_info());
            println!("camera: {}", walkthrough_camera::crate_info());
            println!("render: {}", walkthrough_render::crate_info());
            println!("default camera config:");
            println!("{:#?}", CameraConfig::default());
        }
        Commands::Simulate {
            hold,
            frames,
            frame_ms,
            aspect,
            primitive,
            config,
            every,
        } => {
            let mut camera = load_camera(config)?;
            tracing::debug!(frames, frame_ms, aspect, "starting simulation");
            for key in &hold {
                camera.on_key(*key, true);
            }
            let held: Vec<String> = hold.iter().map(Key::to_string).collect();
            println!(
                "Simulating {frames} frames of {frame_ms} ms holding [{}]",
                held.join(", ")
            );

            let renderer = DebugTextRenderer::new();
            for frame in 1..=frames {
                camera.advance(frame_ms);
                if every.is_some_and(|n| n > 0 && frame % n == 0) && frame != frames {
                    println!("-- frame {frame}");
                    print!("{}", renderer.render(&FrameView::new(&camera, aspect, primitive)));
                }
            }
            println!("-- frame {frames}");
            print!("{}", renderer.render(&FrameView::new(&camera, aspect, primitive)));
        }
        Commands::Mvp { aspect } => {
            println!("Fixed-camera MVP (aspect={aspect}):");
            print_matrix(simple_mvp(aspect, Mat4::IDENTITY));
        }
        Commands::Primitives => {
            for primitive in Primitive::ALL {
                let mesh = primitive.mesh();
                let vertices = mesh.validate()?;
                let indices = mesh.indices.as_ref().map_or(0, Vec::len);
                println!(
                    "{:<12} vertices={vertices} indices={indices} draw={:?}",
                    primitive.name(),
                    mesh.draw_call()
                );
            }
        }
    }

    Ok(())
}
