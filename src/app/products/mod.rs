//! 产品目录：模型、存储、页面和处理器

pub mod handler;
pub mod model;
pub mod repository;
pub mod view;
