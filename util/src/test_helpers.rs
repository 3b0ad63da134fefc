use std::env;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::config::AppConfig;

/// Creates a unique temporary directory and points `REPORT_STORAGE_ROOT`
/// at its absolute path for the duration of the test. The directory is
/// automatically cleaned up when the returned `TempDir` is dropped.
///
/// Keep the returned `TempDir` in scope for as long as you need the files.
pub fn setup_test_storage_root() -> TempDir {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let abs = tmp
        .path()
        .canonicalize()
        .unwrap_or_else(|_| tmp.path().to_path_buf());
    unsafe {
        env::set_var("REPORT_STORAGE_ROOT", &abs);
    }
    AppConfig::set_report_storage_root(abs.to_string_lossy());
    tmp
}

/// Writes a report file at `{root}/{rel}`, creating parent folders.
pub fn write_report(root: &Path, rel: &str, body: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("failed to create report folder");
    }
    fs::write(path, body).expect("failed to write report");
}

/// Builds a minimal test-run document with the given `(fullname, result)`
/// test cases nested three suites deep.
pub fn test_run_xml(cases: &[(&str, &str)]) -> String {
    let mut body = String::new();
    for (name, result) in cases {
        body.push_str(&format!(
            "        <test-case fullname=\"{name}\" result=\"{result}\" />\n"
        ));
    }
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
         <test-run id=\"2\" result=\"Failed\">\n\
         <test-suite type=\"Assembly\" name=\"Lab.dll\">\n\
         <test-suite type=\"TestSuite\" name=\"Lab\">\n\
         <test-suite type=\"TestFixture\" name=\"Tests\">\n\
         {body}\
         </test-suite>\n\
         </test-suite>\n\
         </test-suite>\n\
         </test-run>\n"
    )
}
