use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use slidecanvas::config::EditorConfig;
use slidecanvas::consts::FIT_PADDING_PX;
use slidecanvas::doc::{DocStore, DrawingConfig};
use slidecanvas::element::Element;
use slidecanvas::engine::{Action, EngineCore};
use slidecanvas::error::EditorError;
use slidecanvas::input::{Button, Key, Modifiers};
use slidecanvas::viewport::{Point, fit_scale};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("snapshot rejected: {0}")]
    Editor(#[from] EditorError),
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "slidecanvas", about = "Replay editor gestures against a slide snapshot")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a JSON event script through the editor and print the emitted actions.
    Replay {
        /// Event script: a JSON array of input events.
        script: PathBuf,
        /// Initial slide elements as a JSON array.
        #[arg(long)]
        snapshot: Option<PathBuf>,
        /// Print only the final document.
        #[arg(long)]
        doc_only: bool,
    },
    /// Print the fit-to-container zoom for a container size.
    Fit {
        width: f64,
        height: f64,
        #[arg(long, env = "SLIDECANVAS_FIT_PADDING", default_value_t = FIT_PADDING_PX)]
        padding: f64,
    },
}

/// One recorded host event. Coordinates are container-relative screen pixels.
#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
enum ScriptEvent {
    PointerDown {
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerMove {
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerUp {
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    DoubleClick {
        x: f64,
        y: f64,
    },
    KeyDown {
        key: String,
        #[serde(default)]
        modifiers: Modifiers,
    },
    TextInput {
        text: String,
        #[serde(default)]
        height: f64,
    },
    TextBlur,
    Resize {
        width: f64,
        height: f64,
    },
    Zoom {
        zoom: f64,
    },
    Drawing {
        #[serde(default)]
        drawing: DrawingConfig,
    },
    CommitTransform,
}

#[derive(Debug, Serialize)]
struct ReplayReport<'a> {
    actions: Vec<Action>,
    elements: &'a [Element],
}

fn read_file(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read { path: path.to_path_buf(), source })
}

fn dispatch(core: &mut EngineCore, event: ScriptEvent) -> Vec<Action> {
    match event {
        ScriptEvent::PointerDown { x, y, modifiers } => core.on_pointer_down(Point::new(x, y), Button::Primary, modifiers),
        ScriptEvent::PointerMove { x, y, modifiers } => core.on_pointer_move(Point::new(x, y), modifiers),
        ScriptEvent::PointerUp { x, y, modifiers } => core.on_pointer_up(Point::new(x, y), Button::Primary, modifiers),
        ScriptEvent::DoubleClick { x, y } => core.on_double_click(Point::new(x, y)),
        ScriptEvent::KeyDown { key, modifiers } => core.on_key_down(&Key(key), modifiers),
        ScriptEvent::TextInput { text, height } => core.text_edit_input(&text, height),
        ScriptEvent::TextBlur => core.text_edit_blur(),
        ScriptEvent::Resize { width, height } => core.on_container_resize(width, height),
        ScriptEvent::Zoom { zoom } => core.set_zoom(zoom),
        ScriptEvent::Drawing { drawing } => core.set_drawing(drawing),
        ScriptEvent::CommitTransform => core.commit_transform(),
    }
}

fn replay(script: &Path, snapshot: Option<&Path>, doc_only: bool) -> Result<(), CliError> {
    let mut doc = DocStore::new();
    if let Some(path) = snapshot {
        doc.load_json(&read_file(path)?)?;
    }
    let events: Vec<ScriptEvent> = serde_json::from_str(&read_file(script)?)?;
    tracing::info!(events = events.len(), elements = doc.len(), "replaying script");

    let mut core = EngineCore::with_doc(doc, EditorConfig::from_env());
    let mut actions = Vec::new();
    for event in events {
        actions.extend(dispatch(&mut core, event));
    }

    if doc_only {
        println!("{}", serde_json::to_string_pretty(core.doc.elements())?);
    } else {
        let report = ReplayReport { actions, elements: core.doc.elements() };
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Replay { script, snapshot, doc_only } => replay(&script, snapshot.as_deref(), doc_only),
        Command::Fit { width, height, padding } => {
            println!("{}", fit_scale(width, height, padding));
            Ok(())
        }
    }
}
