//! Shared utilities for Strata benchmarks.

// Benchmark utilities - pedantic lints not critical here
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]

use std::fmt::Write;
use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

/// Create a temporary project with the given files.
/// Returns the temp directory (must be kept alive) and the project path.
pub fn create_project(files: &[(String, String)]) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");

    for (path, content) in files {
        let full_path = dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("failed to write file");
    }

    let path = dir.path().to_path_buf();
    (dir, path)
}

/// A PHP model class with properties and typed methods.
pub fn php_model(name: &str, num_methods: usize) -> String {
    let mut code = format!("<?php\n\nnamespace App\\Models;\n\nclass {name} extends Model\n{{\n");
    code.push_str("    protected $table;\n    private ?int $ownerId = null;\n\n");
    for i in 0..num_methods {
        let _ = writeln!(code, "    public function action{i}(int $id): ?{name}");
        code.push_str("    {\n        return $this->find($id);\n    }\n\n");
    }
    code.push_str("}\n");
    code
}

/// A TypeScript module with an interface, a class and function bindings.
pub fn ts_module(name: &str, num_methods: usize) -> String {
    let mut code = format!("export interface {name}Props {{\n");
    code.push_str("    id: number;\n    label: string;\n}\n\n");
    let _ = writeln!(code, "export class {name}Service extends BaseService {{");
    code.push_str("    private cache: Map<string, number>;\n\n");
    for i in 0..num_methods {
        let _ = write!(
            code,
            "    method{i}(input: number): number {{\n        return input * {i};\n    }}\n\n"
        );
    }
    code.push_str("}\n\n");
    let _ = writeln!(code, "export const use{name} = (props: {name}Props) => props.id;\n");
    let _ = writeln!(code, "function helper{name}() {{}}");
    code
}

/// A mixed Laravel-style project: PHP models, TS modules and vendor noise.
pub fn generate_project(num_modules: usize) -> Vec<(String, String)> {
    let mut files = Vec::new();
    for i in 0..num_modules {
        files.push((format!("app/Models/Model{i}.php"), php_model(&format!("Model{i}"), 8)));
        files.push((
            format!("resources/js/module{i}/index.ts"),
            ts_module(&format!("Module{i}"), 8),
        ));
        files.push((
            format!("vendor/package{i}/src/Lib.php"),
            php_model(&format!("Lib{i}"), 2),
        ));
    }
    files
}
