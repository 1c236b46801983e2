//! Feed address classification

use std::path::PathBuf;

/// Directory behind a feed address, or `None` for a remote feed
///
/// Local when the address is:
/// - a `file://` URL
/// - absolute on Unix: /srv/feed
/// - absolute on Windows: C:\feed or C:/feed
/// - a UNC share: \\server\share\feed
/// - relative: ./feed, ../feed, or a bare directory name
///
/// Anything with a scheme (`https://...`) is remote.
pub fn feed_directory(source: &str) -> Option<PathBuf> {
  let source = source.trim();
  if source.is_empty() {
    return None;
  }

  if let Some(rest) = source.strip_prefix("file://") {
    // file:///srv/feed -> /srv/feed, file://C:/feed -> C:/feed
    return Some(PathBuf::from(rest));
  }

  // Windows drive letter must be checked before the scheme test since it contains ':'
  let bytes = source.as_bytes();
  if bytes.len() >= 2
    && bytes[0].is_ascii_alphabetic()
    && bytes[1] == b':'
    && (bytes.len() == 2 || bytes[2] == b'\\' || bytes[2] == b'/')
  {
    return Some(PathBuf::from(source));
  }

  if source.contains("://") {
    return None;
  }

  Some(PathBuf::from(source))
}
