//! # 农场摊位产品目录
//!
//! 服务端渲染的产品增删改查应用：
//! - `app`：产品模型、存储、页面渲染和路由
//! - `core`：错误类型和中间件
//! - `infrastructure`：配置、数据库和日志

pub mod app;
pub mod core;
pub mod infrastructure;

pub use crate::app::products::handler::AppState;
pub use crate::app::routes::build_router;
pub use crate::core::error::CoreError;
