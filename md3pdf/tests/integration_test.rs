//! End-to-end conversions with stand-in engines
//!
//! The TeX engine and raster converter are replaced by `sh -c` scripts so
//! the tests run without a TeX installation. A script receives the file it
//! should process as `$0`.

#![cfg(unix)]

use md3pdf::build::{build, BuildError, BuildRequest};
use md3pdf::config::BuildConfig;
use md3pdf::figures::FigureError;
use md3pdf::{convert_file, ConvertError, ConvertOptions};
use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::thread;

/// Engine script that turns `<base>.tex` into `<base>.pdf` when the class file is present
const COPYING_ENGINE: &str = "test -f md3pdf.cls && cp \"$0\" \"${0%.tex}.pdf\"";

/// Scratch directories for one test
struct Fixture {
    _root: tempfile::TempDir,
    source: PathBuf,
    output: PathBuf,
    workspaces: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let source = root.path().join("src");
        let output = root.path().join("out");
        let workspaces = root.path().join("work");
        for dir in [&source, &output, &workspaces] {
            fs::create_dir(dir).unwrap();
        }

        Self {
            _root: root,
            source,
            output,
            workspaces,
        }
    }

    /// Configuration running `engine_script` as the TeX engine
    fn config(&self, engine_script: &str) -> BuildConfig {
        BuildConfig {
            engine: "sh".to_string(),
            engine_args: vec!["-c".to_string(), engine_script.to_string()],
            converter: "sh".to_string(),
            converter_args: vec!["-c".to_string(), "cp \"$0\" \"$1\"".to_string()],
            workspace_root: Some(self.workspaces.clone()),
            ..BuildConfig::default()
        }
    }

    fn write_markdown(&self, name: &str, content: &str) -> PathBuf {
        let path = self.source.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn options(&self) -> ConvertOptions {
        ConvertOptions {
            output_dir: self.output.clone(),
            ..ConvertOptions::default()
        }
    }

    fn workspaces_left(&self) -> usize {
        fs::read_dir(&self.workspaces).unwrap().count()
    }
}

/// Serve one request with a canned status and body, on 127.0.0.1
fn serve_once(status: &'static str, body: &'static [u8]) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let address = format!("http://{}", listener.local_addr().unwrap());

    thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut line = String::new();
        while reader.read_line(&mut line).unwrap() > 0 && line != "\r\n" {
            line.clear();
        }

        let mut stream = stream;
        write!(
            stream,
            "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        )
        .unwrap();
        stream.write_all(body).unwrap();
    });

    address
}

#[test]
fn test_successful_build_writes_pdf_and_cleans_up() {
    // Arrange
    let fixture = Fixture::new();
    let input = fixture.write_markdown(
        "notes.v2.md",
        "# Notes\n\n| a | b |\n|---|:-:|\n| 1 | 2 |\n\n![local](./figure.png)\n",
    );

    // Act
    let pdf = convert_file(&input, &fixture.config(COPYING_ENGINE), &fixture.options()).unwrap();

    // Assert
    assert_eq!(pdf, fixture.output.join("notes.pdf"));
    let content = fs::read_to_string(&pdf).unwrap();
    assert!(content.starts_with("\\documentclass{md3pdf}\n\\begin{document}\n"));
    assert!(content.contains("\\includegraphics[max width=0.9\\linewidth]{./figure.png}"));
    assert_eq!(fixture.workspaces_left(), 0);
}

#[test]
fn test_engine_sees_source_directory_in_texinputs() {
    let fixture = Fixture::new();
    let input = fixture.write_markdown("doc.md", "text\n");
    let script = "printf '%s' \"$TEXINPUTS\" > \"${0%.tex}.pdf\"";

    let pdf = convert_file(&input, &fixture.config(script), &fixture.options()).unwrap();

    let texinputs = fs::read_to_string(pdf).unwrap();
    assert_eq!(texinputs, format!("{}:", fixture.source.display()));
}

#[test]
fn test_compile_failure_reports_engine_errors() {
    // Arrange
    let fixture = Fixture::new();
    let input = fixture.write_markdown("broken.md", "# Broken\n");
    let script = "echo 'This is pdfTeX'; echo '! Undefined control sequence.'; exit 1";

    // Act
    let err = convert_file(&input, &fixture.config(script), &fixture.options()).unwrap_err();

    // Assert
    match err {
        ConvertError::Build(BuildError::Compile {
            engine,
            diagnostics,
            ..
        }) => {
            assert_eq!(engine, "sh");
            assert_eq!(diagnostics, vec!["! Undefined control sequence."]);
        }
        other => panic!("expected compile failure, got {other:?}"),
    }
    assert!(!fixture.output.join("broken.pdf").exists());
    assert_eq!(fixture.workspaces_left(), 0);
}

#[test]
fn test_engine_without_output_is_missing_output() {
    let fixture = Fixture::new();
    let input = fixture.write_markdown("quiet.md", "text\n");

    let err = convert_file(&input, &fixture.config("true"), &fixture.options()).unwrap_err();

    assert!(matches!(
        err,
        ConvertError::Build(BuildError::MissingOutput { .. })
    ));
    assert_eq!(fixture.workspaces_left(), 0);
}

#[test]
fn test_unreachable_figure_aborts_before_engine_runs() {
    // Arrange: a port nothing listens on
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let fixture = Fixture::new();
    let marker = fixture.output.join("engine-ran");
    let input = fixture.write_markdown(
        "remote.md",
        &format!("![chart](http://127.0.0.1:{port}/charts/chart.svg)\n"),
    );
    let script = format!("touch '{}'", marker.display());

    // Act
    let err = convert_file(&input, &fixture.config(&script), &fixture.options()).unwrap_err();

    // Assert
    match err {
        ConvertError::Build(BuildError::Figure(FigureError::Fetch { figure, .. })) => {
            assert_eq!(figure, format!("http://127.0.0.1:{port}/charts/chart.svg"));
        }
        other => panic!("expected fetch failure, got {other:?}"),
    }
    assert!(!marker.exists());
    assert_eq!(fixture.workspaces_left(), 0);
}

#[test]
fn test_remote_figure_is_placed_before_engine_runs() {
    // Arrange
    let address = serve_once("200 OK", b"<svg/>");
    let fixture = Fixture::new();
    let input = fixture.write_markdown(
        "remote.md",
        &format!("![chart]({address}/charts/chart.svg)\n"),
    );
    let script = "test -f chart.svg && test -f chart.svg.png && cp \"$0\" \"${0%.tex}.pdf\"";

    // Act
    let pdf = convert_file(&input, &fixture.config(script), &fixture.options()).unwrap();

    // Assert
    let latex = fs::read_to_string(pdf).unwrap();
    assert!(latex.contains("\\includesvg[max width=0.9\\linewidth]{chart.svg}"));
}

#[test]
fn test_missing_class_file_is_asset_missing() {
    // Arrange
    let fixture = Fixture::new();
    let config = BuildConfig {
        class_file: Some(PathBuf::from("/nonexistent/custom.cls")),
        ..fixture.config(COPYING_ENGINE)
    };
    let request = BuildRequest {
        latex: "\\documentclass{md3pdf}\n".to_string(),
        figures: Vec::new(),
        base_name: "doc".to_string(),
        source_dir: None,
        output_dir: fixture.output.clone(),
    };

    // Act
    let err = build(&request, &config).unwrap_err();

    // Assert
    assert!(matches!(
        err,
        BuildError::AssetMissing { ref path, .. } if path == Path::new("/nonexistent/custom.cls")
    ));
    assert_eq!(fixture.workspaces_left(), 0);
}

#[test]
fn test_configured_class_file_replaces_bundled_one() {
    let fixture = Fixture::new();
    let class = fixture.source.join("custom.cls");
    fs::write(&class, "% custom class\n").unwrap();
    let config = BuildConfig {
        class_file: Some(class),
        ..fixture.config("cp md3pdf.cls \"${0%.tex}.pdf\"")
    };
    let request = BuildRequest {
        latex: String::new(),
        figures: Vec::new(),
        base_name: "doc".to_string(),
        source_dir: None,
        output_dir: fixture.output.clone(),
    };

    let pdf = build(&request, &config).unwrap();

    assert_eq!(fs::read_to_string(pdf).unwrap(), "% custom class\n");
}

#[test]
fn test_unsupported_markdown_fails_before_build() {
    let fixture = Fixture::new();
    let input = fixture.write_markdown("code.md", "para\n\n    indented code\n");

    let err = convert_file(&input, &fixture.config(COPYING_ENGINE), &fixture.options()).unwrap_err();

    assert!(matches!(err, ConvertError::Render { .. }));
    assert_eq!(fixture.workspaces_left(), 0);
}

#[test]
fn test_cli_latex_only() {
    // Arrange
    let fixture = Fixture::new();
    let input = fixture.write_markdown("cli.md", "# From the CLI\n");

    // Act
    let output = Command::new(env!("CARGO_BIN_EXE_md3pdf"))
        .arg(&input)
        .arg("--output-dir")
        .arg(&fixture.output)
        .arg("--latex-only")
        .arg("--print-latex")
        .output()
        .unwrap();

    // Assert
    assert!(output.status.success());
    let tex = fs::read_to_string(fixture.output.join("cli.tex")).unwrap();
    assert!(tex.contains("\\chapter{From the CLI}"));
    assert_eq!(String::from_utf8_lossy(&output.stdout), tex);
}

#[test]
fn test_cli_failure_exits_with_error() {
    let fixture = Fixture::new();

    let output = Command::new(env!("CARGO_BIN_EXE_md3pdf"))
        .arg(fixture.source.join("missing.md"))
        .arg("--latex-only")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("Error: Failed to convert"));
}
