//! Replay a scripted canvas session and print the resulting SVG and HTML.

#[cfg(feature = "native")]
use clap::Parser;
#[cfg(feature = "native")]
use std::path::PathBuf;

/// Replay a scripted drawing-canvas session
#[cfg(feature = "native")]
#[derive(Parser, Debug)]
#[command(name = "sketchblock-replay")]
#[command(version, about, long_about = None)]
struct Args {
    /// Script to replay (JSON array of steps). Reads stdin when omitted.
    #[arg(value_name = "SCRIPT")]
    script: Option<PathBuf>,

    /// Keep the cache in memory instead of on disk
    #[arg(long)]
    memory: bool,
}

#[cfg(feature = "native")]
fn run(args: Args) -> Result<(), sketchblock_editor::EditorError> {
    use sketchblock_core::storage::{MemoryCache, create_default_cache};
    use sketchblock_editor::{CanvasNodeOptions, parse_script, replay};
    use std::io::Read;
    use std::sync::Arc;

    let script = match &args.script {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let steps = parse_script(&script)?;
    log::info!("Replaying {} steps", steps.len());

    let options = CanvasNodeOptions::default();
    let output = if args.memory {
        replay(&steps, Arc::new(MemoryCache::new()), &options)?
    } else {
        replay(&steps, create_default_cache()?, &options)?
    };

    println!("{}", output.svg);
    println!("{}", output.html);
    Ok(())
}

#[cfg(feature = "native")]
fn main() {
    let args = Args::parse();
    sketchblock_editor::init_logging();
    if let Err(e) = run(args) {
        log::error!("Replay failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "native"))]
fn main() {
    panic!("Native feature not enabled. Use `cargo run --features native`");
}

#[cfg(all(test, feature = "native"))]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults_to_stdin_and_disk_cache() {
        let args = Args::try_parse_from(["sketchblock-replay"]).unwrap();
        assert_eq!(args.script, None);
        assert!(!args.memory);
    }

    #[test]
    fn test_args_script_and_memory() {
        let args = Args::try_parse_from(["sketchblock-replay", "--memory", "session.json"]).unwrap();
        assert_eq!(args.script, Some(PathBuf::from("session.json")));
        assert!(args.memory);
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        assert!(Args::try_parse_from(["sketchblock-replay", "--memroy"]).is_err());
    }

    #[test]
    fn test_second_script_is_rejected() {
        assert!(Args::try_parse_from(["sketchblock-replay", "a.json", "b.json"]).is_err());
    }
}
