//! # Neurorad Core
//!
//! 影像报告结构化标注的核心模块：报告与标注数据模型、受控词表、字段校验、
//! 存储接口定义以及统一错误类型。

pub mod error;
pub mod models;
pub mod repository;
pub mod validation;
pub mod vocabulary;

pub use error::{NeuroradError, Result};
pub use models::*;
pub use repository::{features_for, FeatureStore, ReportFeatures, ReportStore};
pub use validation::{Validate, Validation};
pub use vocabulary::{all_vocabularies, Vocabulary};
