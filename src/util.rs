use std::path::PathBuf;

pub fn manifest_path<'a>(segments: impl IntoIterator<Item = &'a str>) -> PathBuf {
    let segments = segments.into_iter();
    let full_path = [env!("CARGO_MANIFEST_DIR")].into_iter().chain(segments);
    full_path.collect()
}

/// reflection dumps bundled with the crate
pub fn fixture_path(file_name: &str) -> PathBuf {
    manifest_path(["fixtures", file_name])
}
