//! End-to-End Tool Tests
//!
//! Drive the tool the way the binary does: files on disk, startup commands
//! and a session read from an input stream.

use std::fs;
use std::io::Cursor;
use std::path::PathBuf;

use clap::Parser as ClapParser;
use dump_cli::bootstrap::{load_image, run_with_input};
use dump_cli::cli::normalize_args;
use dump_cli::input::{BufReadLines, LineReader};
use dump_cli::session::PROMPT;
use dump_cli::{Cli, CliResult};
use integration_tests::fixtures::{sample_image_bytes, sample_profile, SUM};
use tempfile::TempDir;

struct Workspace {
    _dir: TempDir,
    image: PathBuf,
    profile: PathBuf,
    out: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let image = dir.path().join("sum.bc");
        let profile = dir.path().join("sum.profile.json");
        let out = dir.path().join("dump.txt");
        fs::write(&image, sample_image_bytes()).unwrap();
        fs::write(&profile, sample_profile().to_json().unwrap()).unwrap();
        Self {
            _dir: dir,
            image,
            profile,
            out,
        }
    }

    fn cli(&self, extra: &[&str]) -> Cli {
        let mut args = vec![
            "bcdump".to_string(),
            self.image.display().to_string(),
            "-profile-file".to_string(),
            self.profile.display().to_string(),
            "-out".to_string(),
            self.out.display().to_string(),
        ];
        args.extend(extra.iter().map(|s| s.to_string()));
        Cli::try_parse_from(normalize_args(args)).unwrap()
    }

    fn output(&self) -> String {
        fs::read_to_string(&self.out).unwrap()
    }
}

fn lines(input: &str) -> impl FnOnce() -> CliResult<Box<dyn LineReader>> {
    let bytes = input.as_bytes().to_vec();
    move || Ok(Box::new(BufReadLines::new(Cursor::new(bytes))))
}

/// Test: a batch run with startup commands never prompts
#[test]
fn test_batch_startup_commands() {
    let ws = Workspace::new();
    let cli = ws.cli(&[
        "-c",
        "summary;function;dis 1 -offsets;at-virtual 999999;offsets 1 -json;quit",
    ]);
    run_with_input(&cli, lines("epilogue\n")).unwrap();

    let text = ws.output();
    assert!(!text.contains(PROMPT));
    assert!(!text.contains("Epilogue:"));
    assert!(text.starts_with("Image: "));
    assert!(text.contains("Executed instructions: 52\n"));
    assert!(text.contains("Functions ranked by executed instructions:\n"));

    let base = load_image(&ws.image).unwrap().function(SUM).unwrap().offset;
    assert!(text.contains(&format!("    [@ {}] LoadConstUInt8    r0, 0\n", base)));
    assert!(text.contains(&format!("    [@ {}] Ret               r0\n", base + 28)));

    let (before, json) = text.split_once("Virtual offset 999999 is invalid.\n").unwrap();
    assert!(before.ends_with("\n\n"));
    let value: serde_json::Value = serde_json::from_str(json.trim_end()).unwrap();
    assert_eq!(value["function_id"], SUM);
    assert_eq!(value["name"], "sum");
    assert_eq!(value["virtual_offset"], base);
}

/// Test: disassembly options are restored after `-offsets`
#[test]
fn test_offsets_flag_is_scoped() {
    let ws = Workspace::new();
    let cli = ws.cli(&["-c", "dis 1 -offsets;dis 1"]);
    run_with_input(&cli, lines("")).unwrap();

    let text = ws.output();
    let (first, second) = text.split_once("\n\n").unwrap();
    assert!(first.contains("[@ "));
    assert!(second.starts_with("Function<sum>1(1 params, 3 registers):"));
    assert!(!second.contains("[@ "));
}

/// Test: an interactive session with aliases and help
#[test]
fn test_interactive_session() {
    let ws = Workspace::new();
    let cli = ws.cli(&[]);
    let session = "h\n\nhelp fun\ninst\nat_virtual 0x9c\nfrobnicate\nstr 1\nq\nquit\nio\n";
    run_with_input(&cli, lines(session)).unwrap();

    let text = ws.output();
    assert!(text.starts_with(PROMPT));
    assert!(text.contains("function"));
    assert!(text.contains("Instructions by execution count (52 executed):\n"));
    assert!(text.contains("Invalid command: frobnicate\n"));
    assert!(text.contains("Invalid command: q\n"));
    assert!(text.contains("String 1: \"hi\"\n"));
    assert!(!text.contains("Page working set"));
    assert!(text.ends_with(PROMPT));
}

/// Test: the baseline can turn off pretty rendering
#[test]
fn test_plain_disassembly_flag() {
    let ws = Workspace::new();
    let cli = ws.cli(&["-pretty-disassemble=false", "-c", "dis 1"]);
    run_with_input(&cli, lines("")).unwrap();

    let text = ws.output();
    assert!(text.contains("    JmpFalse 19, r1\n"));
    assert!(!text.contains("L1:"));
}

/// Test: the function mode ranks by entry count
#[test]
fn test_function_mode_flag() {
    let ws = Workspace::new();
    let cli = ws.cli(&["-mode", "function", "-c", "function"]);
    run_with_input(&cli, lines("")).unwrap();

    assert!(ws.output().starts_with("Functions ranked by entry count:\n"));
}
