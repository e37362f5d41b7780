//! External service clients.

pub mod wechat;

pub use wechat::WeChatIdentityProvider;
