//! Interactive command-line entry point.
//!
//! Loads any files given on the command line, then drives the workspace
//! from stdin commands, pumping deferred work and printing notices
//! between commands.

use std::io::{self, BufRead, Write};
use std::path::Path;
use textmark_app::{Viewer, Workspace, OVERLAY_LINES};
use textmark_core::file::{FileInput, FileKind};
use textmark_core::notice::{Notice, NoticeLevel};

const HELP: &str = "\
commands:
  lines              list the selectable overlay lines
  select N           select overlay line N
  sel TEXT           select arbitrary text
  add LABEL          annotate the current selection as LABEL
  list               show annotations
  find QUERY         filter annotations
  del N              delete annotation N (from `list`)
  edit N LABEL       rename annotation N to LABEL
  load PATH          load a PDF or JSON template from disk
  export PATH        write the JSON export to PATH
  toggle             flip the uploader/viewer display state
  save               save annotations (stub)
  help               this text
  quit               exit";

fn main() {
    env_logger::init();
    log::info!("Starting TextMark");

    let mut workspace = Workspace::new();
    let viewer = Viewer::new();

    for arg in std::env::args().skip(1) {
        load_path(&mut workspace, Path::new(&arg));
        workspace.pump();
        print_notices(workspace.drain_notices());
    }

    println!("TextMark — type `help` for commands");
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                log::error!("stdin read failed: {}", e);
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (command, rest) = match line.split_once(' ') {
            Some((c, r)) => (c, r.trim()),
            None => (line, ""),
        };

        match command {
            "help" => println!("{}", HELP),
            "lines" => {
                for (i, text) in OVERLAY_LINES.iter().enumerate() {
                    println!("  {}: {}", i, text);
                }
            }
            "select" => match rest.parse::<usize>().ok().and_then(|i| viewer.select_line(i)) {
                Some(text) => workspace.select_text(text),
                None => println!("no overlay line {:?}", rest),
            },
            "sel" => workspace.select_text(rest),
            "add" => {
                workspace.add_annotation(rest);
            }
            "list" => print_annotations(&workspace, ""),
            "find" => print_annotations(&workspace, rest),
            "del" => match nth_id(&workspace, rest) {
                Some(id) => workspace.delete_annotation(id),
                None => println!("no annotation {:?}", rest),
            },
            "edit" => {
                let (index, label) = match rest.split_once(' ') {
                    Some((i, l)) => (i, l.trim()),
                    None => (rest, ""),
                };
                match nth_id(&workspace, index) {
                    Some(id) => workspace.commit_edit(id, label),
                    None => println!("no annotation {:?}", index),
                }
            }
            "load" => load_path(&mut workspace, Path::new(rest)),
            "export" => {
                let artifact = workspace.download_json();
                match std::fs::write(rest, &artifact.bytes) {
                    Ok(()) => println!("wrote {} ({} bytes)", rest, artifact.bytes.len()),
                    Err(e) => println!("write failed: {}", e),
                }
            }
            "toggle" => {
                workspace.toggle_uploader();
                println!("view: {:?}", workspace.view());
            }
            "save" => workspace.save_annotations(),
            "quit" | "exit" => break,
            other => println!("unknown command {:?}; try `help`", other),
        }

        workspace.pump();
        print_notices(workspace.drain_notices());
        let _ = io::stdout().flush();
    }

    // Deliver anything still pending so final notices are not lost.
    workspace.pump();
    print_notices(workspace.drain_notices());
}

fn load_path(workspace: &mut Workspace, path: &Path) {
    let file = match FileInput::from_path(path) {
        Ok(file) => file,
        Err(e) => {
            println!("cannot read {}: {}", path.display(), e);
            return;
        }
    };
    match file.kind() {
        Some(FileKind::Pdf) => workspace.upload_pdf(&file),
        Some(FileKind::Json) => workspace.upload_json(&file),
        _ => println!("unsupported file: {}", path.display()),
    }
}

fn nth_id(workspace: &Workspace, index: &str) -> Option<textmark_core::AnnotationId> {
    let index = index.parse::<usize>().ok()?;
    workspace.store().annotations().get(index).map(|a| a.id)
}

fn print_annotations(workspace: &Workspace, query: &str) {
    let annotations = workspace.filtered(query);
    if annotations.is_empty() {
        println!("no annotations found");
        return;
    }
    for (i, a) in annotations.iter().enumerate() {
        println!("  {}: [{}] {}", i, a.context, a.text);
    }
}

fn print_notices(notices: Vec<Notice>) {
    for notice in notices {
        let tag = match notice.level {
            NoticeLevel::Success => "ok",
            NoticeLevel::Error => "error",
            NoticeLevel::Info => "info",
        };
        println!("[{}] {}", tag, notice.message);
    }
}
