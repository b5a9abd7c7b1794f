//! Client-side state containers mirroring the server's collections. A UI
//! shell owns one [`posts::PostStore`] and one [`auth::AuthStore`], passes
//! them down by reference, and funnels every mutation through their action
//! methods.

pub mod api;
pub mod auth;
pub mod notify;
pub mod posts;
