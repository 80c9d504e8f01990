pub mod build;
pub mod clean;
pub mod compress;
pub mod copy;
pub mod marker;
pub mod minify;
pub mod report;
pub mod rewrite;
pub mod translations;
pub mod verify;

use crate::core::Step;
use crate::domain::ports::CommandRunner;
use std::sync::Arc;

pub use build::{BuildStep, InstallDepsStep};
pub use clean::CleanStep;
pub use compress::CompressStep;
pub use copy::CopyToRootStep;
pub use marker::GithubPagesMarkerStep;
pub use minify::{MinifyHtmlStep, MinifyJsonStep};
pub use report::ReportStep;
pub use rewrite::RewritePathsStep;
pub use translations::SyncTranslationsStep;
pub use verify::VerifyStep;

/// 標準部署步驟，依執行順序排列
///
/// 文字轉換都在建置輸出上進行，因此壓縮檔與複製到根目錄的內容一致。
pub fn standard_steps(runner: Arc<dyn CommandRunner>) -> Vec<Box<dyn Step>> {
    vec![
        Box::new(CleanStep),
        Box::new(InstallDepsStep::new(runner.clone())),
        Box::new(BuildStep::new(runner)),
        Box::new(MinifyJsonStep),
        Box::new(RewritePathsStep),
        Box::new(MinifyHtmlStep),
        Box::new(CompressStep),
        Box::new(CopyToRootStep),
        Box::new(SyncTranslationsStep),
        Box::new(GithubPagesMarkerStep),
        Box::new(VerifyStep),
        Box::new(ReportStep),
    ]
}
