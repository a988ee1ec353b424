pub mod preorder;
pub mod success_banner;

pub use preorder::{CampaignStats, PreorderController, SessionView};
pub use success_banner::SuccessBanner;
