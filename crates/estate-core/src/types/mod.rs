//! Record model: identifiers, amounts, status and the asset record

mod amount;
mod asset;
mod identifiers;
mod status;

pub use amount::Amount;
pub use asset::AssetRecord;
pub use identifiers::{AssetId, ReportHandle};
pub use status::AssetStatus;
