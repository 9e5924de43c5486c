use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use scene_compiler_core::{
    inject_scene, presets, AppConfig, PulleySystem, SceneCompiler, SceneDocument,
};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compile { input, output } => run_compile(&input, &output),
        Commands::Preset { kind, output } => run_preset(kind, &output),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(?err, "scene compilation failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_compile(input: &Path, output: &OutputArgs) -> scene_compiler_core::Result<()> {
    tracing::info!(?input, "compiling scene document");

    let source = read_input(input)?;
    let value: serde_json::Value = serde_json::from_str(&source)?;
    if !SceneDocument::looks_like_scene(&value) {
        tracing::warn!("document has no `world` or `objects` section");
    }

    let document = SceneDocument::from_value(&value)?;
    emit(&document, output)
}

fn run_preset(kind: PresetKind, output: &OutputArgs) -> scene_compiler_core::Result<()> {
    tracing::info!(?kind, "building preset scene");

    let document = match kind {
        PresetKind::FreeFall { height } => presets::free_fall(height)?,
        PresetKind::Projectile {
            speed,
            angle,
            height,
        } => presets::projectile(speed, angle, height)?,
        PresetKind::Pulley { description } => {
            let system = match description {
                Some(path) => PulleySystem::from_json_str(&read_input(&path)?)?,
                None => PulleySystem::double_pulley(),
            };
            presets::pulley_system(&system)?
        }
    };

    emit(&document, output)
}

fn emit(document: &SceneDocument, output: &OutputArgs) -> scene_compiler_core::Result<()> {
    let config = match &output.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    let compiler = SceneCompiler::new(config.compiler);
    let envelope = compiler.compile(document)?;

    let rendered = match &output.template {
        Some(path) => inject_scene(&std::fs::read_to_string(path)?, &envelope.planck_scene)?,
        None => envelope.to_json(output.pretty)?,
    };

    match &output.output {
        Some(path) => {
            std::fs::write(path, rendered)?;
            tracing::info!(?path, "wrote compiled scene");
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

fn read_input(path: &Path) -> scene_compiler_core::Result<String> {
    if path == Path::new("-") {
        let mut source = String::new();
        std::io::stdin().read_to_string(&mut source)?;
        Ok(source)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Compiles physics scene descriptions for the browser renderer",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile a scene document into a renderer-ready scene.
    Compile {
        /// Path to the scene document, or `-` to read standard input.
        input: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Build and compile one of the ready-made scenes.
    Preset {
        #[command(subcommand)]
        kind: PresetKind,
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Subcommand, Debug)]
enum PresetKind {
    /// A ball dropped from rest.
    FreeFall {
        /// Drop height above the ground.
        #[arg(long)]
        height: f64,
    },
    /// A ball launched at an angle.
    Projectile {
        /// Launch speed.
        #[arg(long)]
        speed: f64,
        /// Launch angle above the horizontal, in degrees.
        #[arg(long, allow_negative_numbers = true)]
        angle: f64,
        /// Launch height above the ground.
        #[arg(long, default_value_t = 0.0)]
        height: f64,
    },
    /// Blocks connected by ropes over fixed pulleys.
    Pulley {
        /// Pulley system description; the built-in double pulley when omitted.
        #[arg(long)]
        description: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Write the result here instead of standard output.
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,
    /// HTML template with a `%%SCENE_DATA%%` placeholder to fill in.
    #[arg(long, global = true)]
    template: Option<PathBuf>,
    /// JSON configuration file overriding compiler defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Pretty-print the JSON output.
    #[arg(long, global = true)]
    pretty: bool,
}
