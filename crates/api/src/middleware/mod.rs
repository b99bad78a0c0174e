//! Request extractors.
//!
//! - [`shop_session::ShopSession`] -- Requires an active offline session for
//!   the requesting shop; otherwise redirects to the login page.

pub mod shop_session;
