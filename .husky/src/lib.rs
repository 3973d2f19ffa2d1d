//! Installs the git pre-commit hook (`cargo fmt` and `cargo clippy`) on the first `cargo test`.
