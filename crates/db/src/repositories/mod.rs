pub mod dapp_repo;
pub mod flow_repo;
pub mod image_repo;
pub mod user_repo;

pub use dapp_repo::DappRepo;
pub use flow_repo::FlowRepo;
pub use image_repo::ImageRepo;
pub use user_repo::UserRepo;
