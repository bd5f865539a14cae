// CV generation and download.
// Rendering is pure (form data in, PDF bytes out); handlers own the
// storage naming and the path traversal guard.

pub mod handlers;
pub mod models;
pub mod pdf;
