pub mod session_repo;
pub mod setting_repo;

pub use session_repo::SessionRepo;
pub use setting_repo::SettingRepo;
