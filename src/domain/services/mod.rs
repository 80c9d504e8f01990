pub mod compress;
pub mod minify;
pub mod rewrite;
