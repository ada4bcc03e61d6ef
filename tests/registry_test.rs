use anyhow::Result;
use dirstream::services::stream::registry::{self, ProtocolRegistry};
use dirstream::{Error, ReadableStream, DEFAULT_PROTOCOL_NAME};
use std::fs;
use std::io::Read;
use tempfile::tempdir;

#[test]
fn register_default_protocol() -> Result<()> {
    assert_eq!(registry::register(DEFAULT_PROTOCOL_NAME)?, DEFAULT_PROTOCOL_NAME);
    assert!(registry::global().is_registered(DEFAULT_PROTOCOL_NAME));
    Ok(())
}

#[test]
fn register_custom_protocol() -> Result<()> {
    assert_eq!(registry::register("custom")?, "custom");
    assert!(matches!(
        registry::register("custom"),
        Err(Error::ProtocolTaken(_))
    ));
    Ok(())
}

#[test]
fn register_rejects_bad_protocol_name() {
    assert!(matches!(
        registry::register("invalid_protocol_name"),
        Err(Error::InvalidProtocol(_))
    ));
}

#[test]
fn open_directory_by_absolute_path() -> Result<()> {
    let dir = tempdir()?;
    fs::write(dir.path().join("only.txt"), "only")?;

    let mut protocols = ProtocolRegistry::new();
    protocols.register("absolute")?;
    let mut stream = protocols.open(&format!("absolute://{}", dir.path().display()), "r")?;

    let mut content = String::new();
    stream.read_to_string(&mut content)?;
    assert_eq!(content, "only");
    stream.close();
    Ok(())
}

#[test]
fn open_directory_by_relative_path() -> Result<()> {
    let mut protocols = ProtocolRegistry::new();
    protocols.register("relative")?;
    let stream = protocols.open("relative://.", "r")?;
    assert_eq!(stream.directory(), std::path::Path::new("."));
    Ok(())
}

#[test]
fn open_missing_directory_fails() -> Result<()> {
    let dir = tempdir()?;
    let missing = dir.path().join("directory-missing");

    let mut protocols = ProtocolRegistry::new();
    protocols.register("not-existing")?;
    let result = protocols.open(&format!("not-existing://{}", missing.display()), "r");
    assert!(matches!(result, Err(Error::DirectoryUnreadable(p)) if p == missing));
    Ok(())
}

#[test]
fn read_many_files_through_registry() -> Result<()> {
    let dir = tempdir()?;
    fs::write(dir.path().join("file1.txt"), "This is file 1 content.")?;
    fs::write(dir.path().join("file2.txt"), "This is file 2 content.")?;
    fs::write(dir.path().join("file3.txt"), "This is file 3 content.")?;

    let mut protocols = ProtocolRegistry::new();
    protocols.register("read-many")?;
    let mut stream = protocols.open(&format!("read-many://{}", dir.path().display()), "r")?;

    let mut content = String::new();
    stream.read_to_string(&mut content)?;
    assert_eq!(
        content,
        "This is file 1 content.This is file 2 content.This is file 3 content."
    );
    Ok(())
}

#[test]
fn unregistered_scheme_is_refused() {
    let protocols = ProtocolRegistry::new();
    let result = protocols.open("directory-files:///tmp", "r");
    assert!(matches!(result, Err(Error::UnknownProtocol(_))));
}
