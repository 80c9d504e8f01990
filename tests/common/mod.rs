#![allow(dead_code)]

use spa_deploy::core::CommandRunner;
use spa_deploy::domain::model::{CommandOutput, CommandSpec};
use spa_deploy::Result;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use walkdir::WalkDir;

pub const APP_NAME: &str = "portfolio";

/// Stands in for `npm`: records every call and writes a build output like the Angular CLI does.
pub struct FakeBuildRunner {
    pub calls: Mutex<Vec<CommandSpec>>,
    fail_build: bool,
}

impl FakeBuildRunner {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_build: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_build: true,
        }
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }

    pub fn build_calls(&self) -> Vec<CommandSpec> {
        self.calls()
            .into_iter()
            .filter(|c| c.args.iter().any(|a| a == "build"))
            .collect()
    }
}

#[async_trait::async_trait]
impl CommandRunner for FakeBuildRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        self.calls.lock().unwrap().push(spec.clone());

        if spec.args.first().map(String::as_str) == Some("ci") {
            fs::create_dir_all(spec.current_dir.join("node_modules"))?;
            return Ok(CommandOutput {
                code: Some(0),
                ..Default::default()
            });
        }

        if self.fail_build {
            return Ok(CommandOutput {
                code: Some(1),
                stdout: String::new(),
                stderr: "Error: NG0201 build failed".to_string(),
            });
        }

        write_build_output(&spec.current_dir.join("dist").join(APP_NAME).join("browser"));
        Ok(CommandOutput {
            code: Some(0),
            stdout: "Application bundle generation complete.".to_string(),
            stderr: String::new(),
        })
    }
}

pub fn translations(greeting: &str) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    map.insert("greeting".to_string(), serde_json::json!(greeting));
    for i in 0..60 {
        map.insert(
            format!("section_{:02}", i),
            serde_json::json!({ "title": format!("Section {}", i), "body": "Lorem ipsum dolor sit amet" }),
        );
    }
    serde_json::Value::Object(map)
}

pub fn write_build_output(out: &Path) {
    fs::create_dir_all(out.join("assets/i18n")).unwrap();
    fs::create_dir_all(out.join("data")).unwrap();

    fs::write(
        out.join("index.html"),
        "<!doctype html>\n<html lang=\"en\">\n  <head>\n    <!-- app shell -->\n    <base href=\"/\">\n    <link rel=\"stylesheet\" href=\"styles-XYZ.css\">\n  </head>\n  <body>\n    <app-root></app-root>\n    <script src=\"main-ABC.js\" type=\"module\"></script>\n  </body>\n</html>\n",
    )
    .unwrap();
    fs::write(
        out.join("main-ABC.js"),
        format!(
            "const logo=\"/assets/logo.svg\";const cv='/data/projects.json';\n{}",
            "console.log('portfolio ready');\n".repeat(100)
        ),
    )
    .unwrap();
    fs::write(out.join("chunk-QRS.js"), "export const lazy=1;\n").unwrap();
    fs::write(out.join("polyfills-P1.js"), "globalThis.zone=true;\n").unwrap();
    fs::write(out.join("styles-XYZ.css"), "body{margin:0;padding:0}\n".repeat(80)).unwrap();
    fs::write(out.join("3rdpartylicenses.txt"), "MIT License\n".repeat(200)).unwrap();
    fs::write(out.join("assets/logo.svg"), "<svg xmlns=\"http://www.w3.org/2000/svg\"/>").unwrap();

    for (locale, greeting) in [("en", "Hello"), ("pl", "Cześć")] {
        fs::write(
            out.join(format!("assets/i18n/{}.json", locale)),
            serde_json::to_string_pretty(&translations(greeting)).unwrap(),
        )
        .unwrap();
    }
    fs::write(
        out.join("data/projects.json"),
        "{\n  \"projects\": [\n    { \"name\": \"weather-dashboard\" }\n  ]\n}\n",
    )
    .unwrap();
}

/// Project skeleton with the files a real checkout carries next to the deployed site.
pub fn create_project(root: &Path) {
    fs::write(root.join("package.json"), "{\"name\":\"portfolio\",\"private\":true}").unwrap();
    fs::write(root.join("test-server.js"), "require('http').createServer();\n").unwrap();

    let i18n = root.join("src/assets/i18n");
    fs::create_dir_all(&i18n).unwrap();
    for (locale, greeting) in [("en", "Hello"), ("pl", "Cześć")] {
        fs::write(
            i18n.join(format!("{}.json", locale)),
            serde_json::to_string_pretty(&translations(greeting)).unwrap(),
        )
        .unwrap();
    }

    fs::create_dir_all(root.join("public")).unwrap();
    fs::write(root.join("public/favicon.ico"), [0u8, 0, 1, 0]).unwrap();
}

pub fn build_output(root: &Path) -> PathBuf {
    root.join("dist").join(APP_NAME).join("browser")
}

/// Every file under `root` with its bytes, keyed by relative path.
pub fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let relative = e.path().strip_prefix(root).unwrap().to_path_buf();
            (relative, fs::read(e.path()).unwrap())
        })
        .collect()
}
