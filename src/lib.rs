//! 週1回、用意済みのエピソード断片をフィードに1件ずつ公開する。
//!
//! 外部のスケジューラ（cron等）から定期的に起動される前提で、
//! 同時に複数起動しないこと。

pub mod app;
pub mod domain;
pub mod infra;
pub mod types;
