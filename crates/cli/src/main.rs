#![deny(unsafe_code)]
//! CLI binary for the constellation site animations.
//!
//! Subcommands:
//! - `render <scene>`: run a scene N frames, write PNG
//! - `list`: print available scenes and themes
//! - `schema <scene>`: print a scene's parameters and their schema
//! - `theme get|set|toggle|clear`: manage the persisted theme

mod error;
mod store;

use clap::{Parser, Subcommand};
use constellation_core::seed::SceneSeed;
use constellation_core::theme::{MemoryStore, ThemeId, ThemeManager};
use constellation_core::{Scene, StyleSheet};
use constellation_scenes::SceneKind;
use error::CliError;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use store::FileStore;

#[derive(Parser)]
#[command(name = "constellation", about = "Portfolio canvas animations, rendered headless")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// JSON file holding the persisted theme.
    #[arg(long, global = true, default_value = "constellation-theme.json")]
    store: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a scene for N frames and write a PNG snapshot.
    Render {
        /// Scene name (hero, about, contact, judo, intro).
        scene: Option<String>,

        /// Canvas width in pixels.
        #[arg(short = 'W', long, default_value_t = 800)]
        width: usize,

        /// Canvas height in pixels.
        #[arg(short = 'H', long, default_value_t = 600)]
        height: usize,

        /// Number of animation frames (60 per simulated second).
        #[arg(short, long, default_value_t = 120)]
        frames: usize,

        /// PRNG seed for deterministic output.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Theme id; defaults to the persisted theme.
        #[arg(short, long)]
        theme: Option<String>,

        /// JSON object of custom properties merged over the theme's sheet.
        #[arg(long)]
        style: Option<PathBuf>,

        /// Scene parameters as a JSON string.
        #[arg(long, default_value = "{}")]
        params: String,

        /// Read the whole request from a scene seed JSON file instead.
        #[arg(long, conflicts_with_all = ["scene", "width", "height", "frames", "seed", "theme", "params"])]
        from_seed: Option<PathBuf>,

        /// Also write the scene seed that reproduces this render.
        #[arg(long)]
        save_seed: Option<PathBuf>,

        /// Output file path.
        #[arg(short, long, default_value = "output.png")]
        output: PathBuf,
    },
    /// List available scenes and themes.
    List,
    /// Print a scene's current parameters and parameter schema.
    Schema {
        scene: String,
        #[arg(long, default_value = "{}")]
        params: String,
    },
    /// Read or change the persisted theme.
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },
}

#[derive(Subcommand)]
enum ThemeAction {
    /// Print the active theme.
    Get,
    /// Persist a theme by id.
    Set { theme: String },
    /// Switch between the light and dark theme.
    Toggle,
    /// Remove every persisted theme key.
    Clear,
}

fn parse_params(raw: &str) -> Result<serde_json::Value, CliError> {
    serde_json::from_str(raw).map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))
}

fn load_style(theme: ThemeId, path: Option<&Path>) -> Result<StyleSheet, CliError> {
    let builtin = StyleSheet::builtin(theme);
    let Some(path) = path else {
        return Ok(builtin);
    };
    let text =
        fs::read_to_string(path).map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?;
    let custom: StyleSheet = serde_json::from_str(&text)
        .map_err(|e| CliError::Input(format!("invalid style sheet {}: {e}", path.display())))?;
    Ok(builtin.merged(&custom))
}

fn theme_manager(store: &Path) -> Result<ThemeManager<FileStore, MemoryStore>, CliError> {
    Ok(ThemeManager::new(FileStore::open(store)?, MemoryStore::new()))
}

fn print(json_mode: bool, info: serde_json::Value, text: &str) -> Result<(), CliError> {
    if json_mode {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("{text}");
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let scenes = SceneKind::list_scenes();
            let themes: Vec<&str> = ThemeId::ALL.iter().map(|t| t.as_str()).collect();
            if cli.json {
                let info = serde_json::json!({ "scenes": scenes, "themes": themes });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Scenes:");
                for name in scenes {
                    println!("  {name}");
                }
                println!("Themes:");
                println!("  {}", themes.join(", "));
            }
        }
        Command::Schema { scene, params } => {
            let params = parse_params(&params)?;
            let scene = SceneKind::from_name(&scene, 0, &params)?;
            let info = serde_json::json!({
                "scene": scene.name(),
                "params": scene.params(),
                "schema": scene.param_schema(),
            });
            // Schema output is JSON either way.
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        Command::Theme { action } => {
            let mut themes = theme_manager(&cli.store)?;
            match action {
                ThemeAction::Get => {
                    let theme = themes.active_theme();
                    let info = serde_json::json!({"theme": theme, "dark": theme.is_dark()});
                    print(cli.json, info, theme.as_str())?;
                }
                ThemeAction::Set { theme } => {
                    let theme: ThemeId = theme.parse()?;
                    themes.set_theme(theme)?;
                    let info = serde_json::json!({"theme": theme});
                    print(cli.json, info, &format!("theme set to {theme}"))?;
                }
                ThemeAction::Toggle => {
                    let theme = themes.active_theme().toggled();
                    themes.set_theme(theme)?;
                    let info = serde_json::json!({"theme": theme});
                    print(cli.json, info, &format!("theme set to {theme}"))?;
                }
                ThemeAction::Clear => {
                    themes.clear()?;
                    print(cli.json, serde_json::json!({"cleared": true}), "theme cleared")?;
                }
            }
        }
        Command::Render {
            scene,
            width,
            height,
            frames,
            seed,
            theme,
            style,
            params,
            from_seed,
            save_seed,
            output,
        } => {
            let request = match from_seed {
                Some(path) => {
                    let text = fs::read_to_string(&path)
                        .map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?;
                    serde_json::from_str::<SceneSeed>(&text).map_err(|e| {
                        CliError::Input(format!("invalid scene seed {}: {e}", path.display()))
                    })?
                }
                None => {
                    let scene = scene
                        .ok_or_else(|| CliError::Input("missing scene name".into()))?;
                    let theme = match theme {
                        Some(name) => name.parse()?,
                        None => theme_manager(&cli.store)?.active_theme(),
                    };
                    SceneSeed {
                        theme,
                        params: parse_params(&params)?,
                        frames,
                        ..SceneSeed::new(&scene, width, height, seed)
                    }
                }
            };

            let sheet = load_style(request.theme, style.as_deref())?;
            let raster = constellation_scenes::render_seed(&request, &sheet)?;
            constellation_scenes::snapshot::write_png(&raster, &output)?;

            if let Some(path) = &save_seed {
                fs::write(path, serde_json::to_string_pretty(&request)?)
                    .map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?;
            }

            if cli.json {
                let info = serde_json::json!({
                    "seed": request,
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {} ({}x{}, {} frames, seed {}, {}) -> {}",
                    request.scene,
                    request.width,
                    request.height,
                    request.frames,
                    request.seed,
                    request.theme,
                    output.display()
                );
            }
        }
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use constellation_core::StyleSource;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn render_defaults() {
        let cli = Cli::try_parse_from(["constellation", "render", "hero"]).unwrap();
        match cli.command {
            Command::Render {
                scene,
                width,
                height,
                frames,
                theme,
                ..
            } => {
                assert_eq!(scene.as_deref(), Some("hero"));
                assert_eq!((width, height, frames), (800, 600, 120));
                assert!(theme.is_none());
            }
            _ => panic!("expected render"),
        }
    }

    #[test]
    fn from_seed_conflicts_with_scene() {
        assert!(Cli::try_parse_from(["constellation", "render", "hero", "--from-seed", "s.json"])
            .is_err());
    }

    #[test]
    fn style_file_overrides_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("style.json");
        fs::write(&path, r##"{"--particle-color": "#ff0000"}"##).unwrap();
        let sheet = load_style(ThemeId::LucidBlue, Some(&path)).unwrap();
        assert_eq!(sheet.property("--particle-color").as_deref(), Some("#ff0000"));
        assert!(sheet.property("--line-color").is_some());
    }

    #[test]
    fn bad_style_file_is_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("style.json");
        fs::write(&path, "[]").unwrap();
        let err = load_style(ThemeId::LucidBlue, Some(&path)).unwrap_err();
        assert_eq!(err.exit_code(), 12);
    }

    #[test]
    fn render_then_replay_from_saved_seed() {
        let dir = tempfile::tempdir().unwrap();
        let store = dir.path().join("theme.json");
        let first = dir.path().join("a.png");
        let second = dir.path().join("b.png");
        let seed = dir.path().join("seed.json");

        let cli = Cli::try_parse_from([
            "constellation",
            "--store",
            store.to_str().unwrap(),
            "render",
            "contact",
            "-W",
            "64",
            "-H",
            "48",
            "-f",
            "5",
            "--save-seed",
            seed.to_str().unwrap(),
            "-o",
            first.to_str().unwrap(),
        ])
        .unwrap();
        assert!(run(cli).is_ok());

        let cli = Cli::try_parse_from([
            "constellation",
            "render",
            "--from-seed",
            seed.to_str().unwrap(),
            "-o",
            second.to_str().unwrap(),
        ])
        .unwrap();
        assert!(run(cli).is_ok());
        assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
    }

    #[test]
    fn theme_set_then_get_through_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = dir.path().join("theme.json");
        let store_arg = store.to_str().unwrap();
        let set = Cli::try_parse_from([
            "constellation",
            "--store",
            store_arg,
            "theme",
            "set",
            "theme-metallic-sky",
        ])
        .unwrap();
        assert!(run(set).is_ok());
        let mut m = theme_manager(&store).unwrap();
        assert_eq!(m.active_theme(), ThemeId::MetallicSky);

        let bad = Cli::try_parse_from(["constellation", "--store", store_arg, "theme", "set", "sepia"])
            .unwrap();
        assert_eq!(run(bad).err().map(|e| e.exit_code()), Some(12));
    }

    #[test]
    fn corrupt_store_falls_back_to_default_theme() {
        let dir = tempfile::tempdir().unwrap();
        let store = dir.path().join("theme.json");
        let output = dir.path().join("out.png");
        let seed = dir.path().join("seed.json");
        fs::write(&store, "{not json").unwrap();
        let store_arg = store.to_str().unwrap();

        let render = Cli::try_parse_from([
            "constellation",
            "--store",
            store_arg,
            "render",
            "contact",
            "-W",
            "32",
            "-H",
            "24",
            "-f",
            "2",
            "--save-seed",
            seed.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ])
        .unwrap();
        assert!(run(render).is_ok());
        let saved: SceneSeed = serde_json::from_str(&fs::read_to_string(&seed).unwrap()).unwrap();
        assert_eq!(saved.theme, ThemeId::LucidBlue);

        let get = Cli::try_parse_from(["constellation", "--store", store_arg, "theme", "get"]).unwrap();
        assert!(run(get).is_ok());
    }
}
