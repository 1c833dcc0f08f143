use std::path::PathBuf;

use clap::Parser;

use colorcube::config::ViewerConfig;

#[derive(Debug, Parser)]
#[command(about = "Draws a vertex-colored cube")]
pub struct Args {
    /// Path to a JSON5 viewer config
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Vertex shader source file
    #[arg(long)]
    pub vertex: Option<PathBuf>,
    /// Fragment shader source file
    #[arg(long)]
    pub fragment: Option<PathBuf>,
    /// Width of the window
    #[arg(long)]
    pub width: Option<u32>,
    /// Height of the window
    #[arg(long)]
    pub height: Option<u32>,
    /// Window title
    #[arg(long)]
    pub title: Option<String>,
    /// Multisample count (0 disables multisampling)
    #[arg(short, long)]
    pub samples: Option<u8>,
    /// Render a frame, save it to this PNG and exit
    #[arg(long)]
    pub capture: Option<PathBuf>,
    /// Log filter in env_logger syntax, overrides RUST_LOG
    #[arg(long)]
    pub log_filter: Option<String>,
}

impl Args {
    /// Applies flags given on the command line on top of `config`.
    pub fn apply(&self, config: &mut ViewerConfig) {
        if let Some(vertex) = &self.vertex {
            config.shaders.vertex = vertex.clone();
        }
        if let Some(fragment) = &self.fragment {
            config.shaders.fragment = fragment.clone();
        }
        if let Some(width) = self.width {
            config.window.width = width;
        }
        if let Some(height) = self.height {
            config.window.height = height;
        }
        if let Some(title) = &self.title {
            config.window.title = title.clone();
        }
        if let Some(samples) = self.samples {
            config.window.samples = samples;
        }
    }
}
