use std::io;
use std::path::PathBuf;

use carve::error::Error;

#[test]
fn test_io_errors_carry_their_path() {
    let err = Error::file(
        "app/app.tsx",
        io::Error::new(io::ErrorKind::NotFound, "file not found"),
    );

    match &err {
        Error::FileError { path, .. } => assert_eq!(path, &PathBuf::from("app/app.tsx")),
        other => panic!("Expected FileError variant, got {:?}", other),
    }
    let source = std::error::Error::source(&err).unwrap();
    assert_eq!(source.to_string(), "file not found");
}

#[test]
fn test_error_display() {
    let err = Error::ConfigError("invalid config".to_string());
    assert_eq!(err.to_string(), "Configuration error: invalid config.");

    let err = Error::InvalidRootError { root: "/tmp/missing".to_string() };
    assert_eq!(
        err.to_string(),
        "Target directory '/tmp/missing' does not exist or is not a directory."
    );

    let err = Error::file(
        PathBuf::from("app/app.tsx"),
        io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
    );
    assert_eq!(err.to_string(), "IO error on 'app/app.tsx': denied.");
}
