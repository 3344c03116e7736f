//! Client/server boundary lint.
//!
//! Everything under src/app compiles for wasm, where the server-only
//! modules (auth, store, storage, config, api) do not exist. A stray
//! reference breaks the client build, so this test flags any mention of
//! a server module inside the app tree.

use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Paths only the server half of the crate may use
const SERVER_ONLY: &[&str] = &[
    "crate::api::",
    "crate::auth::",
    "crate::config::",
    "crate::storage::",
    "crate::store::",
    "use crate::api;",
    "use crate::auth;",
    "use crate::config;",
    "use crate::storage;",
    "use crate::store;",
];

fn analyze_file(path: &Path) -> Vec<(String, String)> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => return vec![],
    };

    let mut violations = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.starts_with("//") {
            continue;
        }
        for pattern in SERVER_ONLY {
            if trimmed.contains(pattern) {
                violations.push((
                    format!("{}:{}", path.display(), idx + 1),
                    (*pattern).to_string(),
                ));
            }
        }
    }

    violations
}

#[test]
fn app_tree_never_imports_server_modules() {
    let app_dir = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("src")
        .join("app");

    let mut all_violations = Vec::new();

    for entry in WalkDir::new(&app_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "rs"))
    {
        all_violations.extend(analyze_file(entry.path()));
    }

    if !all_violations.is_empty() {
        let mut msg =
            String::from("\n\nBOUNDARY VIOLATION: src/app must stay wasm-compilable.\n\n");
        for (location, pattern) in &all_violations {
            msg.push_str(&format!("  {}  uses {}\n", location, pattern));
        }
        msg.push_str(
            "\nMove shared types into src/app/api.rs DTOs instead of importing server modules.\n",
        );
        panic!("{}", msg);
    }
}

#[test]
fn server_modules_are_feature_gated() {
    let lib = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("src")
        .join("lib.rs");
    let content = fs::read_to_string(&lib).expect("Failed to read lib.rs");

    for module in ["api", "auth", "config", "storage", "store"] {
        let declaration = format!("pub mod {};", module);
        let pos = content
            .find(&declaration)
            .unwrap_or_else(|| panic!("lib.rs must declare `{}`", declaration));
        let before = &content[..pos];
        assert!(
            before.trim_end().ends_with("#[cfg(feature = \"server\")]"),
            "`{}` must sit behind #[cfg(feature = \"server\")]",
            declaration
        );
    }
}
