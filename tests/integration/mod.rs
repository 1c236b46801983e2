//! End-to-end tests driving the feedrail binary

mod helpers;
mod test_git_info;
mod test_metadata;
mod test_publish;
mod test_tools;
