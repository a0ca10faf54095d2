//! API 模块
//!
//! 对外暴露四个相互独立的 HTTP 端点，彼此之间不共享可变状态

pub mod dto;
pub mod handlers;
pub mod routes;

// 重新导出常用类型
pub use handlers::NotesHandlers;
pub use routes::{build_router, notes_routes};
