//! # GutterKit
//!
//! Blueprint diagram editor core and material take-off for gutter and
//! downpipe systems.
//!
//! ## Architecture
//!
//! GutterKit is organized as a workspace with multiple crates:
//!
//! 1. **gutterkit-core** - Asset classification, colours, units, constants
//! 2. **gutterkit-settings** - Editor configuration (TOML)
//! 3. **gutterkit-takeoff** - Stock optimizer, quote aggregation, accessories
//! 4. **gutterkit-designer** - Document model, interaction, history, render loop
//! 5. **gutterkit** - CLI that quotes saved diagrams
//!
//! ## Features
//!
//! - **Diagram editing**: place, move, resize, rotate, group and restack parts
//!   over a blueprint, with separate undo streams for the two
//! - **Rotation bands**: per-family forbidden angle ranges
//! - **Quotes**: cheapest stock combination for every gutter and downpipe
//!   run plus derived brackets, outlets and screws

use std::path::Path;

use anyhow::Context;

pub use gutterkit_core as core;
pub use gutterkit_designer as designer;
pub use gutterkit_settings as settings;
pub use gutterkit_takeoff as takeoff;

pub use gutterkit_core::{AssetKind, Color, DownpipeSize, GutterProfile};
pub use gutterkit_designer::{
    DiagramData, Document, EditorState, Element, ElementId, FrameHost, Point, RenderLoop, Viewport,
};
pub use gutterkit_settings::EditorConfig;
pub use gutterkit_takeoff::{MaterialLine, Takeoff, TakeoffItem};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Logs go to stderr so command output on stdout stays clean. `RUST_LOG`
/// overrides the default `info` level; `json` switches to one JSON object
/// per event.
pub fn init_logging(json: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?;
    } else {
        registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true)
                    .with_line_number(true),
            )
            .try_init()?;
    }
    Ok(())
}

/// Load a configuration file, or the defaults when `path` is `None`
pub fn load_config(path: Option<&Path>) -> anyhow::Result<EditorConfig> {
    let Some(path) = path else {
        return Ok(EditorConfig::default());
    };
    EditorConfig::load_from_file(path)
        .with_context(|| format!("Failed to load config {}", path.display()))
}

/// Open a saved diagram in a fresh editor
pub fn open_diagram(path: &Path, config: EditorConfig) -> anyhow::Result<EditorState> {
    let data = DiagramData::load_from_file(path)?;
    let mut editor = EditorState::new(config);
    editor.load_diagram(data);
    Ok(editor)
}

/// Material lines for a saved diagram
pub fn quote_diagram(
    path: &Path,
    config: EditorConfig,
    accessories: bool,
) -> anyhow::Result<Vec<MaterialLine>> {
    let editor = open_diagram(path, config)?;
    let lines = if accessories {
        editor.material_lines_with_accessories()
    } else {
        editor.material_lines()
    };
    lines.with_context(|| format!("Failed to quote {}", path.display()))
}
